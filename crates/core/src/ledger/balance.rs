//! Balance projection over party account entries.
//!
//! A statement is a left fold over a party's entries in `(transaction_date, id)` order:
//! `balance[i] = balance[i-1] + (CREDIT ? amount : -amount)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;
use super::types::{EntryType, PartyRef};

/// One statement row: the entry and the balance right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// The ledger entry.
    pub entry: LedgerEntry,
    /// Balance before this entry.
    pub previous_balance: Decimal,
    /// Balance after this entry.
    pub balance: Decimal,
}

/// Lazy running-balance adapter.
///
/// Yields a [`StatementLine`] per input entry without buffering; the caller is
/// responsible for feeding entries in chronological order.
#[derive(Debug, Clone)]
pub struct RunningBalance<I> {
    entries: I,
    balance: Decimal,
}

impl<I> RunningBalance<I>
where
    I: Iterator<Item = LedgerEntry>,
{
    /// Starts the fold at zero.
    pub fn new(entries: I) -> Self {
        Self::with_opening(entries, Decimal::ZERO)
    }

    /// Starts the fold at `opening`, e.g. the balance carried into a date range.
    pub fn with_opening(entries: I, opening: Decimal) -> Self {
        Self {
            entries,
            balance: opening,
        }
    }

    /// Balance after the lines yielded so far.
    #[must_use]
    pub fn current(&self) -> Decimal {
        self.balance
    }
}

impl<I> Iterator for RunningBalance<I>
where
    I: Iterator<Item = LedgerEntry>,
{
    type Item = StatementLine;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        let previous_balance = self.balance;
        self.balance += entry.signed_amount();
        Some(StatementLine {
            entry,
            previous_balance,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// Summary totals of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatementTotals {
    /// Balance carried in from before the statement's range.
    pub opening_balance: Decimal,
    /// Sum of CREDIT amounts in range.
    pub total_credit: Decimal,
    /// Sum of DEBIT amounts in range.
    pub total_debit: Decimal,
    /// `opening_balance + total_credit - total_debit`.
    pub final_balance: Decimal,
}

impl StatementTotals {
    fn opening(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            final_balance: opening_balance,
            ..Self::default()
        }
    }

    fn add(&mut self, line: &StatementLine) {
        match line.entry.entry_type {
            EntryType::Credit => self.total_credit += line.entry.amount,
            EntryType::Debit => self.total_debit += line.entry.amount,
        }
        self.final_balance = line.balance;
    }
}

/// A party statement: ordered lines plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Account the statement is for.
    pub party: PartyRef,
    /// Chronological lines with running balance.
    pub lines: Vec<StatementLine>,
    /// Summary totals.
    pub totals: StatementTotals,
}

/// Folds `entries` into a statement for `party`, starting from `opening`.
///
/// Entries are sorted by `(transaction_date, id)` first, so input order does not matter.
#[must_use]
pub fn project_statement(
    party: PartyRef,
    entries: impl IntoIterator<Item = LedgerEntry>,
    opening: Decimal,
) -> Statement {
    let mut sorted: Vec<LedgerEntry> = entries.into_iter().collect();
    sorted.sort_by_key(LedgerEntry::sort_key);

    let mut totals = StatementTotals::opening(opening);
    let lines: Vec<StatementLine> = RunningBalance::with_opening(sorted.into_iter(), opening)
        .inspect(|line| totals.add(line))
        .collect();

    Statement {
        party,
        lines,
        totals,
    }
}

/// Final balance of a set of entries without materialising lines.
#[must_use]
pub fn final_balance<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Decimal {
    entries.into_iter().map(LedgerEntry::signed_amount).sum()
}
