//! Company hierarchy rules.
//!
//! A company is either a parent (`is_parent = true`, no parent of its own), a branch
//! (points at a parent), or standalone (neither). Forbidding `is_parent` together with a
//! parent id keeps the hierarchy one level deep and free of cycles.

use mizan_shared::types::CompanyId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, not_blank};

/// Input for creating a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateCompanyInput {
    /// Display name.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    /// Globally unique short code.
    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub code: String,
    /// Whether the company may have branches.
    #[serde(default)]
    pub is_parent: bool,
    /// Parent company for a branch.
    pub parent_id: Option<CompanyId>,
}

/// Partial update of a company. `None` leaves a field untouched; `parent_id: Some(None)`
/// detaches a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateCompanyInput {
    /// New name.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: Option<String>,
    /// New code.
    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub code: Option<String>,
    /// New parent flag.
    pub is_parent: Option<bool>,
    /// New parent.
    #[allow(clippy::option_option)]
    pub parent_id: Option<Option<CompanyId>>,
}

/// What the rules need to know about a prospective parent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentInfo {
    /// Parent's id.
    pub id: CompanyId,
    /// Parent's `is_parent` flag.
    pub is_parent: bool,
}

/// Checks the shape of a create request before anything is read or written.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for blank fields or a parent company that names a
/// parent of its own.
pub fn validate_create(input: &CreateCompanyInput) -> Result<(), DomainError> {
    check(input)?;
    check_flags(input.is_parent, input.parent_id)
}

/// Checks `is_parent` against `parent_id`.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] if both are set.
pub fn check_flags(is_parent: bool, parent_id: Option<CompanyId>) -> Result<(), DomainError> {
    if is_parent && parent_id.is_some() {
        return Err(DomainError::validation(
            "a parent company cannot itself have a parent",
        ));
    }
    Ok(())
}

/// Checks the looked-up parent row of a branch.
///
/// `found` is `None` when the row does not exist.
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] if the parent is missing, or
/// [`DomainError::Validation`] if it is not flagged as a parent.
pub fn check_parent(requested: CompanyId, found: Option<ParentInfo>) -> Result<(), DomainError> {
    let parent = found.ok_or(DomainError::not_found("company", requested.0))?;
    if !parent.is_parent {
        return Err(DomainError::validation(format!(
            "company {} is not a parent company",
            parent.id
        )));
    }
    Ok(())
}

/// Current state of a company being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyState {
    /// Company id.
    pub id: CompanyId,
    /// Current parent flag.
    pub is_parent: bool,
    /// Current parent.
    pub parent_id: Option<CompanyId>,
    /// Number of branches pointing at this company.
    pub branch_count: u64,
}

/// Resolves an update against the current state and returns the resulting
/// `(is_parent, parent_id)` pair.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for self-reference or inconsistent flags, and
/// [`DomainError::Conflict`] when a company with branches would stop being a parent.
pub fn apply_update(
    current: CompanyState,
    input: &UpdateCompanyInput,
) -> Result<(bool, Option<CompanyId>), DomainError> {
    check(input)?;

    let is_parent = input.is_parent.unwrap_or(current.is_parent);
    let parent_id = input.parent_id.unwrap_or(current.parent_id);

    if parent_id == Some(current.id) {
        return Err(DomainError::validation("a company cannot be its own parent"));
    }
    check_flags(is_parent, parent_id)?;

    if current.branch_count > 0 && (!is_parent || parent_id.is_some()) {
        return Err(DomainError::conflict(format!(
            "company {} still has {} branch(es)",
            current.id, current.branch_count
        )));
    }

    Ok((is_parent, parent_id))
}

/// Counts of rows that keep a company from being deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyDependents {
    /// Branch companies.
    pub branches: u64,
    /// Customers booked under the company.
    pub customers: u64,
    /// Employees.
    pub employees: u64,
    /// Stock and price rows.
    pub inventory_rows: u64,
    /// Projects.
    pub projects: u64,
    /// Treasuries.
    pub treasuries: u64,
    /// External stores.
    pub stores: u64,
}

impl CompanyDependents {
    /// Fails with the first kind of dependent found.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] naming what blocks the deletion.
    pub fn ensure_none(&self) -> Result<(), DomainError> {
        let blockers = [
            (self.branches, "branch companies"),
            (self.customers, "customers"),
            (self.employees, "employees"),
            (self.inventory_rows, "stock or price rows"),
            (self.projects, "projects"),
            (self.treasuries, "treasuries"),
            (self.stores, "external stores"),
        ];
        match blockers.iter().find(|(n, _)| *n > 0) {
            Some((n, what)) => Err(DomainError::conflict(format!(
                "company still has {n} {what}"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(is_parent: bool, parent_id: Option<i64>) -> CreateCompanyInput {
        CreateCompanyInput {
            name: "Branch".into(),
            code: "BR-1".into(),
            is_parent,
            parent_id: parent_id.map(CompanyId::new),
        }
    }

    #[rstest]
    #[case(true, None, true)]
    #[case(false, Some(1), true)]
    #[case(false, None, true)]
    #[case(true, Some(1), false)]
    fn test_flag_combinations(
        #[case] is_parent: bool,
        #[case] parent_id: Option<i64>,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_create(&input(is_parent, parent_id)).is_ok(), ok);
    }

    #[test]
    fn test_blank_code_rejected() {
        let mut i = input(true, None);
        i.code = " ".into();
        assert!(matches!(validate_create(&i), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_parent_must_exist_and_be_parent() {
        let id = CompanyId::new(3);
        assert_eq!(
            check_parent(id, None),
            Err(DomainError::not_found("company", 3))
        );
        assert!(matches!(
            check_parent(id, Some(ParentInfo { id, is_parent: false })),
            Err(DomainError::Validation(_))
        ));
        assert!(check_parent(id, Some(ParentInfo { id, is_parent: true })).is_ok());
    }

    fn state(branch_count: u64) -> CompanyState {
        CompanyState {
            id: CompanyId::new(5),
            is_parent: true,
            parent_id: None,
            branch_count,
        }
    }

    #[test]
    fn test_update_rejects_self_reference() {
        let upd = UpdateCompanyInput {
            is_parent: Some(false),
            parent_id: Some(Some(CompanyId::new(5))),
            ..Default::default()
        };
        assert!(matches!(
            apply_update(state(0), &upd),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_parent_with_branches_cannot_be_demoted() {
        let upd = UpdateCompanyInput {
            is_parent: Some(false),
            ..Default::default()
        };
        assert!(matches!(
            apply_update(state(2), &upd),
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(apply_update(state(0), &upd), Ok((false, None)));
    }

    #[test]
    fn test_dependents_block_deletion() {
        assert!(CompanyDependents::default().ensure_none().is_ok());
        let deps = CompanyDependents {
            treasuries: 1,
            ..Default::default()
        };
        let Err(DomainError::Conflict(msg)) = deps.ensure_none() else {
            panic!("expected conflict");
        };
        assert!(msg.contains("treasuries"));
    }
}
