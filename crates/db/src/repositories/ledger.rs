//! Party account ledger repository.
//!
//! Rows are append-only. Balances are never stored; statements are projected from
//! the rows with [`mizan_core::ledger::project_statement`].

use chrono::Utc;
use mizan_core::ledger::{
    DateRange, LedgerEntry, NewLedgerEntry, PartyRef, Statement, final_balance, project_statement,
};
use mizan_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

use crate::entities::party_account_entries::{self, Column};
use crate::entities::sea_orm_active_enums::PartyType as DbPartyType;
use crate::error::ServiceResult;

impl From<party_account_entries::Model> for LedgerEntry {
    fn from(row: party_account_entries::Model) -> Self {
        Self {
            id: LedgerEntryId::new(row.id),
            party: PartyRef {
                party_id: row.party_id,
                party_type: row.party_type.into(),
            },
            entry_type: row.transaction_type.into(),
            amount: row.amount,
            reference_type: row.reference_type.into(),
            reference_id: row.reference_id,
            description: row.description,
            transaction_date: row.transaction_date,
        }
    }
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one entry inside the caller's open transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount or an overlong
    /// description, or a database error if the insert fails.
    pub async fn record_entry(
        txn: &DatabaseTransaction,
        input: NewLedgerEntry,
    ) -> ServiceResult<LedgerEntry> {
        input.validate_entry()?;

        let row = party_account_entries::ActiveModel {
            party_id: Set(input.party.party_id),
            party_type: Set(input.party.party_type.into()),
            transaction_type: Set(input.entry_type.into()),
            amount: Set(input.amount),
            reference_type: Set(input.reference_type.into()),
            reference_id: Set(input.reference_id),
            description: Set(input.description),
            transaction_date: Set(input.transaction_date),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(row.into())
    }

    /// Appends one entry in its own transaction.
    ///
    /// # Errors
    ///
    /// See [`LedgerRepository::record_entry`].
    pub async fn append(&self, input: NewLedgerEntry) -> ServiceResult<LedgerEntry> {
        let txn = self.db.begin().await?;
        let entry = Self::record_entry(&txn, input).await?;
        txn.commit().await?;

        tracing::info!(
            entry_id = %entry.id,
            party_id = entry.party.party_id,
            amount = %entry.amount,
            "Ledger entry recorded"
        );
        Ok(entry)
    }

    /// Statement of one party, optionally limited to an inclusive date range.
    ///
    /// With a range, entries dated before `range.from` fold into the opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_statement(
        &self,
        party: PartyRef,
        range: Option<DateRange>,
    ) -> ServiceResult<Statement> {
        let txn = self.db.begin().await?;

        let (opening, rows) = match range {
            Some(range) => {
                let earlier = Self::party_rows(party)
                    .filter(Column::TransactionDate.lt(range.from))
                    .all(&txn)
                    .await?;
                let opening: Decimal = earlier
                    .into_iter()
                    .map(|row| LedgerEntry::from(row).signed_amount())
                    .sum();
                let rows = Self::party_rows(party)
                    .filter(Column::TransactionDate.between(range.from, range.to))
                    .all(&txn)
                    .await?;
                (opening, rows)
            }
            None => (Decimal::ZERO, Self::party_rows(party).all(&txn).await?),
        };

        txn.commit().await?;

        Ok(project_statement(
            party,
            rows.into_iter().map(LedgerEntry::from),
            opening,
        ))
    }

    /// Current balance of one party.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance(&self, party: PartyRef) -> ServiceResult<Decimal> {
        let entries: Vec<LedgerEntry> = Self::party_rows(party)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LedgerEntry::from)
            .collect();
        Ok(final_balance(&entries))
    }

    fn party_rows(party: PartyRef) -> Select<party_account_entries::Entity> {
        party_account_entries::Entity::find()
            .filter(Column::PartyId.eq(party.party_id))
            .filter(Column::PartyType.eq(DbPartyType::from(party.party_type)))
            .order_by_asc(Column::TransactionDate)
            .order_by_asc(Column::Id)
    }
}
