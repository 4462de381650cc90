//! Product group rules.

use std::collections::BTreeSet;

use mizan_shared::types::SupplierId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, not_blank};

/// Input for creating a product group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateProductGroupInput {
    /// Globally unique name.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    /// Free text.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Suppliers of the group.
    #[serde(default)]
    pub supplier_ids: Vec<SupplierId>,
    /// Preferred supplier; must be one of `supplier_ids`.
    pub primary_supplier_id: Option<SupplierId>,
}

/// Join rows to write for a group: `(supplier, is_primary)`.
pub type SupplierLinks = Vec<(SupplierId, bool)>;

/// Normalises a supplier set: drops duplicates and flags the primary supplier.
///
/// A primary supplier not listed in `supplier_ids` is added to the set.
#[must_use]
pub fn supplier_links(supplier_ids: &[SupplierId], primary: Option<SupplierId>) -> SupplierLinks {
    let mut ids: BTreeSet<SupplierId> = supplier_ids.iter().copied().collect();
    if let Some(p) = primary {
        ids.insert(p);
    }
    ids.into_iter().map(|id| (id, Some(id) == primary)).collect()
}

impl CreateProductGroupInput {
    /// Validates the name and returns the name trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for a blank or overlong name.
    pub fn validate_input(&self) -> Result<String, DomainError> {
        check(self)?;
        Ok(self.name.trim().to_string())
    }

    /// Join rows for this group.
    #[must_use]
    pub fn links(&self) -> SupplierLinks {
        supplier_links(&self.supplier_ids, self.primary_supplier_id)
    }
}

/// Fails while products still reference the group.
///
/// # Errors
///
/// Returns [`DomainError::Conflict`] when `product_count > 0`.
pub fn ensure_group_deletable(product_count: u64) -> Result<(), DomainError> {
    if product_count > 0 {
        return Err(DomainError::conflict(format!(
            "product group still has {product_count} product(s)"
        )));
    }
    Ok(())
}
