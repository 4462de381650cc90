//! Ledger domain types for party account entries.
//!
//! Every monetary event that changes what a company owes or is owed is recorded as one
//! immutable DEBIT or CREDIT row against a party.

use chrono::NaiveDate;
use mizan_shared::types::{CustomerId, EmployeeId, SupplierId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, positive};

/// Entry type: either Debit or Credit.
///
/// A CREDIT raises the party's balance (funds received or owed to the party), a DEBIT
/// lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Signed contribution of `amount` to the running balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

/// Kind of counterpart a ledger row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// Customer account.
    Customer,
    /// Supplier account.
    Supplier,
    /// Generic contact with no dedicated table.
    Contact,
    /// Employee account.
    Employee,
}

/// Business event that produced a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceType {
    /// Project contract value billed to a customer.
    Project,
    /// Sale invoice.
    Sale,
    /// Sales or purchase return.
    Return,
    /// Purchase invoice.
    Purchase,
    /// Salary payment.
    Salary,
    /// Bonus payment.
    Bonus,
    /// Money received from the party.
    Receipt,
    /// Money paid to the party.
    Payment,
    /// Manual correction.
    Adjustment,
    /// Carried-over balance.
    OpeningBalance,
}

/// Identifies one party's account.
///
/// Customers, suppliers and employees live in separate tables, so the id alone is
/// ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyRef {
    /// Raw key in the party's own table.
    pub party_id: i64,
    /// Which table `party_id` refers to.
    pub party_type: PartyType,
}

impl PartyRef {
    /// Customer account.
    #[must_use]
    pub const fn customer(id: CustomerId) -> Self {
        Self {
            party_id: id.0,
            party_type: PartyType::Customer,
        }
    }

    /// Supplier account.
    #[must_use]
    pub const fn supplier(id: SupplierId) -> Self {
        Self {
            party_id: id.0,
            party_type: PartyType::Supplier,
        }
    }

    /// Employee account.
    #[must_use]
    pub const fn employee(id: EmployeeId) -> Self {
        Self {
            party_id: id.0,
            party_type: PartyType::Employee,
        }
    }

    /// Generic contact account.
    #[must_use]
    pub const fn contact(id: i64) -> Self {
        Self {
            party_id: id,
            party_type: PartyType::Contact,
        }
    }
}

/// Inclusive range of transaction dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when the range is inverted.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::validation(format!(
                "date range start {from} is after end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// True if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Input for appending one ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewLedgerEntry {
    /// Account being posted to.
    pub party: PartyRef,
    /// DEBIT or CREDIT.
    pub entry_type: EntryType,
    /// Always positive; direction is carried by `entry_type`.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// Originating business event.
    pub reference_type: ReferenceType,
    /// Key of the originating row, if any.
    pub reference_id: Option<i64>,
    /// Free text shown on statements.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Accounting date of the movement.
    pub transaction_date: NaiveDate,
}

impl NewLedgerEntry {
    /// Validates the entry before it is written.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the amount is not strictly positive or the
    /// description is too long.
    pub fn validate_entry(&self) -> Result<(), DomainError> {
        check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Decimal) -> NewLedgerEntry {
        NewLedgerEntry {
            party: PartyRef::customer(CustomerId::new(7)),
            entry_type: EntryType::Debit,
            amount,
            reference_type: ReferenceType::Project,
            reference_id: Some(1),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(EntryType::Credit.signed(dec!(10)), dec!(10));
        assert_eq!(EntryType::Debit.signed(dec!(10)), dec!(-10));
    }

    #[test]
    fn test_entry_amount_must_be_positive() {
        assert!(entry(dec!(0.01)).validate_entry().is_ok());
        assert!(matches!(
            entry(Decimal::ZERO).validate_entry(),
            Err(DomainError::Validation(_))
        ));
        assert!(entry(dec!(-5)).validate_entry().is_err());
    }

    #[test]
    fn test_description_length_limit() {
        let mut e = entry(dec!(1));
        e.description = Some("x".repeat(501));
        assert!(e.validate_entry().is_err());
    }

    #[test]
    fn test_date_range() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let range = DateRange::new(d(1), d(31)).unwrap();
        assert!(range.contains(d(1)));
        assert!(range.contains(d(31)));
        assert!(DateRange::new(d(2), d(1)).is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&EntryType::Debit).unwrap(), "\"DEBIT\"");
        assert_eq!(
            serde_json::to_string(&ReferenceType::OpeningBalance).unwrap(),
            "\"OPENING_BALANCE\""
        );
        assert_eq!(serde_json::to_string(&PartyType::Supplier).unwrap(), "\"supplier\"");
    }
}
