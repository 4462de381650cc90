//! Domain error taxonomy shared by every workflow.
//!
//! Each variant maps one-to-one onto an [`AppError`] variant so that a presentation
//! layer never has to know which workflow produced it.

use mizan_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by business rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"employee"`.
        entity: &'static str,
        /// Raw key that was looked up.
        id: i64,
    },

    /// Unique constraint or state conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stock row holds fewer boxes than requested.
    #[error(
        "Insufficient stock for product {product_id} in company {company_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        /// Company owning the stock row.
        company_id: i64,
        /// Product requested.
        product_id: i64,
        /// Boxes currently on hand.
        available: Decimal,
        /// Boxes requested.
        requested: Decimal,
    },

    /// Treasury balance is lower than the amount to pay out.
    #[error(
        "Insufficient funds in treasury {treasury_id}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        /// Treasury being debited.
        treasury_id: i64,
        /// Current balance.
        available: Decimal,
        /// Amount requested.
        requested: Decimal,
    },

    /// Cross-company access. Deliberately carries no detail.
    #[error("Access denied")]
    Forbidden,
}

impl DomainError {
    /// Shorthand for [`DomainError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Shorthand for [`DomainError::Conflict`].
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            e @ DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            e @ DomainError::InsufficientStock { .. } => Self::InsufficientStock(e.to_string()),
            e @ DomainError::InsufficientFunds { .. } => Self::InsufficientFunds(e.to_string()),
            DomainError::Forbidden => Self::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_display() {
        assert_eq!(
            DomainError::not_found("employee", 2).to_string(),
            "employee not found: 2"
        );
    }

    #[test]
    fn test_insufficient_stock_display() {
        let err = DomainError::InsufficientStock {
            company_id: 1,
            product_id: 9,
            available: dec!(2),
            requested: dec!(3),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 9 in company 1: available 2, requested 3"
        );
    }

    #[test]
    fn test_maps_onto_app_error() {
        assert_eq!(
            AppError::from(DomainError::validation("bad")).status_code(),
            400
        );
        assert_eq!(AppError::from(DomainError::not_found("project", 1)).status_code(), 404);
        assert_eq!(AppError::from(DomainError::conflict("dup")).status_code(), 409);
        assert_eq!(AppError::from(DomainError::Forbidden).status_code(), 403);
        assert_eq!(
            AppError::from(DomainError::InsufficientFunds {
                treasury_id: 1,
                available: dec!(0),
                requested: dec!(5),
            })
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
    }

    #[test]
    fn test_forbidden_leaks_nothing() {
        assert_eq!(AppError::from(DomainError::Forbidden).to_string(), "Access denied");
    }
}
