//! Treasury rules.

use mizan_shared::types::{CompanyId, TreasuryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Direction of a treasury movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementDirection {
    /// Money in.
    In,
    /// Money out.
    Out,
}

/// Checks that a treasury may pay on behalf of `company_id`.
///
/// # Errors
///
/// Returns [`DomainError::Forbidden`] when the treasury belongs to another company.
pub fn ensure_same_company(
    treasury_company: CompanyId,
    company_id: CompanyId,
) -> Result<(), DomainError> {
    if treasury_company == company_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Validates a movement amount.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] unless `amount > 0`.
pub fn ensure_positive(amount: Decimal) -> Result<(), DomainError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(DomainError::validation("amount: must be greater than zero"))
    }
}

/// Error for a withdrawal the balance cannot cover.
#[must_use]
pub fn insufficient_funds(
    treasury_id: TreasuryId,
    available: Decimal,
    requested: Decimal,
) -> DomainError {
    DomainError::InsufficientFunds {
        treasury_id: treasury_id.0,
        available,
        requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cross_company_is_forbidden() {
        assert!(ensure_same_company(CompanyId::new(1), CompanyId::new(1)).is_ok());
        assert_eq!(
            ensure_same_company(CompanyId::new(1), CompanyId::new(2)),
            Err(DomainError::Forbidden)
        );
    }

    #[test]
    fn test_amount_positive() {
        assert!(ensure_positive(dec!(0.01)).is_ok());
        assert!(ensure_positive(Decimal::ZERO).is_err());
    }
}
