//! Persisted ledger rows as seen by the projector.

use chrono::NaiveDate;
use mizan_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EntryType, PartyRef, ReferenceType};

/// One committed party account entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row key; breaks ties between entries on the same date.
    pub id: LedgerEntryId,
    /// Account the entry belongs to.
    pub party: PartyRef,
    /// DEBIT or CREDIT.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Originating business event.
    pub reference_type: ReferenceType,
    /// Key of the originating row, if any.
    pub reference_id: Option<i64>,
    /// Free text.
    pub description: Option<String>,
    /// Accounting date.
    pub transaction_date: NaiveDate,
}

impl LedgerEntry {
    /// Contribution of this entry to the party balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.entry_type.signed(self.amount)
    }

    /// Chronological sort key.
    #[must_use]
    pub fn sort_key(&self) -> (NaiveDate, LedgerEntryId) {
        (self.transaction_date, self.id)
    }
}
