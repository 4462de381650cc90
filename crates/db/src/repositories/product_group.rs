//! Product group repository.

use mizan_core::DomainError;
use mizan_core::catalog::{
    CreateProductGroupInput, SupplierLinks, ensure_group_deletable, supplier_links,
};
use mizan_shared::types::{ProductGroupId, SupplierId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use super::lookup::require;
use crate::entities::{product_group_suppliers, product_groups, products, suppliers};
use crate::error::ServiceResult;

/// A group with its supplier links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGroupWithSuppliers {
    /// Group row.
    pub group: product_groups::Model,
    /// Supplier links, ordered by supplier id.
    pub suppliers: Vec<product_group_suppliers::Model>,
}

/// Product group repository.
#[derive(Debug, Clone)]
pub struct ProductGroupRepository {
    db: DatabaseConnection,
}

impl ProductGroupRepository {
    /// Creates a new product group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a group linked to its suppliers.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, `Conflict` for a duplicate name,
    /// `NotFound` for an unknown supplier, or a database error.
    pub async fn create_group(
        &self,
        input: CreateProductGroupInput,
    ) -> ServiceResult<ProductGroupWithSuppliers> {
        let name = input.validate_input()?;
        let links = input.links();

        let txn = self.db.begin().await?;
        ensure_suppliers(&txn, &links).await?;

        let taken = product_groups::Entity::find()
            .filter(product_groups::Column::Name.eq(name.as_str()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(
                DomainError::conflict(format!("product group '{name}' already exists")).into(),
            );
        }

        let group = product_groups::ActiveModel {
            name: Set(name),
            description: Set(input.description.clone()),
            primary_supplier_id: Set(input.primary_supplier_id.map(|s| s.0)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let suppliers = write_links(&txn, group.id, &links).await?;
        txn.commit().await?;

        tracing::info!(group_id = group.id, suppliers = suppliers.len(), "Product group created");
        Ok(ProductGroupWithSuppliers { group, suppliers })
    }

    /// Replaces the supplier set of a group.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown group or supplier, or a database error.
    pub async fn set_suppliers(
        &self,
        group_id: ProductGroupId,
        supplier_ids: &[SupplierId],
        primary: Option<SupplierId>,
    ) -> ServiceResult<ProductGroupWithSuppliers> {
        let links = supplier_links(supplier_ids, primary);

        let txn = self.db.begin().await?;
        let group =
            require::<product_groups::Entity, _>(&txn, "product group", group_id.0).await?;
        ensure_suppliers(&txn, &links).await?;

        product_group_suppliers::Entity::delete_many()
            .filter(product_group_suppliers::Column::GroupId.eq(group.id))
            .exec(&txn)
            .await?;
        let suppliers = write_links(&txn, group.id, &links).await?;

        let mut active: product_groups::ActiveModel = group.into();
        active.primary_supplier_id = Set(primary.map(|s| s.0));
        let group = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            group_id = group.id,
            suppliers = suppliers.len(),
            "Product group suppliers replaced"
        );
        Ok(ProductGroupWithSuppliers { group, suppliers })
    }

    /// Loads a group with its suppliers.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find(&self, group_id: ProductGroupId) -> ServiceResult<ProductGroupWithSuppliers> {
        let group =
            require::<product_groups::Entity, _>(&self.db, "product group", group_id.0).await?;
        let suppliers = product_group_suppliers::Entity::find()
            .filter(product_group_suppliers::Column::GroupId.eq(group.id))
            .order_by_asc(product_group_suppliers::Column::SupplierId)
            .all(&self.db)
            .await?;
        Ok(ProductGroupWithSuppliers { group, suppliers })
    }

    /// Deletes a group no product belongs to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Conflict` while products reference the group, or a
    /// database error.
    pub async fn delete_group(&self, group_id: ProductGroupId) -> ServiceResult<()> {
        let txn = self.db.begin().await?;
        require::<product_groups::Entity, _>(&txn, "product group", group_id.0).await?;

        let product_count = products::Entity::find()
            .filter(products::Column::GroupId.eq(group_id.0))
            .count(&txn)
            .await?;
        ensure_group_deletable(product_count)?;

        product_group_suppliers::Entity::delete_many()
            .filter(product_group_suppliers::Column::GroupId.eq(group_id.0))
            .exec(&txn)
            .await?;
        product_groups::Entity::delete_by_id(group_id.0)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(group_id = %group_id, "Product group deleted");
        Ok(())
    }
}

async fn ensure_suppliers<C: ConnectionTrait>(
    conn: &C,
    links: &SupplierLinks,
) -> ServiceResult<()> {
    for &(supplier_id, _) in links {
        require::<suppliers::Entity, _>(conn, "supplier", supplier_id.0).await?;
    }
    Ok(())
}

async fn write_links<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    links: &SupplierLinks,
) -> ServiceResult<Vec<product_group_suppliers::Model>> {
    let mut rows = Vec::with_capacity(links.len());
    for &(supplier_id, is_primary) in links {
        let row = product_group_suppliers::ActiveModel {
            group_id: Set(group_id),
            supplier_id: Set(supplier_id.0),
            is_primary: Set(is_primary),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}
