//! `SeaORM` Entity for party_account_entries table.
//!
//! Append only: rows are inserted through the ledger writer and never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryType, PartyType, ReferenceType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "party_account_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub party_id: i64,
    pub party_type: PartyType,
    pub transaction_type: EntryType,
    pub amount: Decimal,
    pub reference_type: ReferenceType,
    pub reference_id: Option<i64>,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
