//! Party account ledger.
//!
//! - Entry types and the validated input for appending a row
//! - Committed entries as read back from storage
//! - The balance projector that turns entries into a statement

pub mod balance;
pub mod entry;
pub mod types;

pub use balance::{
    RunningBalance, Statement, StatementLine, StatementTotals, final_balance, project_statement,
};
pub use entry::LedgerEntry;
pub use types::{DateRange, EntryType, NewLedgerEntry, PartyRef, PartyType, ReferenceType};
