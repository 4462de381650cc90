//! Payroll rules: salary and bonus inputs, receipt numbering, month closing.

use mizan_shared::types::{EmployeeId, TreasuryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, positive};

/// Salary payment kind. A FINAL payment closes the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalaryPaymentType {
    /// Advance against the month's salary.
    Partial,
    /// Settles the month.
    Final,
}

/// Bonus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BonusType {
    /// One-off bonus.
    Bonus,
    /// Raise paid as a lump sum.
    Raise,
    /// Performance incentive.
    Incentive,
    /// Overtime pay.
    Overtime,
}

/// Receipt number series. Each series is numbered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReceiptKind {
    /// Salary receipts.
    Salary,
    /// Bonus receipts.
    Bonus,
}

impl ReceiptKind {
    /// Prefix printed before the sequence number.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Salary => "SAL",
            Self::Bonus => "BON",
        }
    }

    /// Key of the counter row this kind draws from.
    #[must_use]
    pub const fn sequence_key(self) -> &'static str {
        match self {
            Self::Salary => "SALARY",
            Self::Bonus => "BONUS",
        }
    }

    /// Formats sequence value `n` as a receipt number, e.g. `SAL-000042`.
    #[must_use]
    pub fn format(self, n: i64) -> String {
        format!("{}-{n:06}", self.prefix())
    }
}

/// Input for a single salary payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaySalaryInput {
    /// Employee being paid.
    pub employee_id: EmployeeId,
    /// Month paid for.
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: u32,
    /// Year paid for.
    #[validate(range(min = 2000, max = 2100, message = "year must be between 2000 and 2100"))]
    pub year: i32,
    /// Amount paid out.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// PARTIAL or FINAL.
    pub payment_type: SalaryPaymentType,
    /// Treasury the money leaves from.
    pub treasury_id: TreasuryId,
}

impl PaySalaryInput {
    /// Validates field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for an out-of-range month or year or a
    /// non-positive amount.
    pub fn validate_input(&self) -> Result<(), DomainError> {
        check(self)
    }
}

/// Input for a bonus payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PayBonusInput {
    /// Employee being paid.
    pub employee_id: EmployeeId,
    /// Bonus kind.
    pub bonus_type: BonusType,
    /// Amount paid out.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// Treasury the money leaves from.
    pub treasury_id: TreasuryId,
    /// Free text.
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl PayBonusInput {
    /// Validates the amount and notes.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for a non-positive amount.
    pub fn validate_input(&self) -> Result<(), DomainError> {
        check(self)
    }
}

/// Validates a month/year pair outside an input struct.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when either value is out of range.
pub fn validate_period(month: u32, year: i32) -> Result<(), DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::validation("month must be between 1 and 12"));
    }
    if !(2000..=2100).contains(&year) {
        return Err(DomainError::validation("year must be between 2000 and 2100"));
    }
    Ok(())
}

/// Salary already paid for one employee and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthPayments {
    /// Sum of PARTIAL payments.
    pub partial_total: Decimal,
    /// Sum of FINAL payments.
    pub final_total: Decimal,
    /// Whether a FINAL payment exists.
    pub closed: bool,
}

impl MonthPayments {
    /// Total paid so far.
    #[must_use]
    pub fn paid(&self) -> Decimal {
        self.partial_total + self.final_total
    }

    /// Fails once the month has been closed by a FINAL payment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] if the month is closed.
    pub fn ensure_open(&self, month: u32, year: i32) -> Result<(), DomainError> {
        if self.closed {
            return Err(DomainError::conflict(format!(
                "salary for {month:02}/{year} has already been settled"
            )));
        }
        Ok(())
    }

    /// What a batch run pays as the FINAL payment: base salary minus advances.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when advances already cover the salary.
    pub fn remaining(&self, base_salary: Decimal) -> Result<Decimal, DomainError> {
        let remaining = base_salary - self.partial_total;
        if remaining <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "nothing left to pay: advances {} cover base salary {base_salary}",
                self.partial_total
            )));
        }
        Ok(remaining)
    }
}

/// Salary position of one employee for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySummary {
    /// Employee.
    pub employee_id: EmployeeId,
    /// Month.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Configured monthly salary.
    pub base_salary: Decimal,
    /// Paid so far.
    pub paid: Decimal,
    /// `base_salary - paid`, floored at zero.
    pub remaining: Decimal,
    /// Whether a FINAL payment exists.
    pub closed: bool,
}

impl SalarySummary {
    /// Builds the summary from the payments made so far.
    #[must_use]
    pub fn new(
        employee_id: EmployeeId,
        month: u32,
        year: i32,
        base_salary: Decimal,
        payments: MonthPayments,
    ) -> Self {
        let paid = payments.paid();
        Self {
            employee_id,
            month,
            year,
            base_salary,
            paid,
            remaining: (base_salary - paid).max(Decimal::ZERO),
            closed: payments.closed,
        }
    }
}

/// Outcome of one employee in a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// Employee.
    pub employee_id: EmployeeId,
    /// Whether the payment was committed.
    pub success: bool,
    /// Receipt number on success.
    pub receipt_number: Option<String>,
    /// Amount paid on success.
    pub amount: Option<Decimal>,
    /// Failure reason.
    pub error: Option<String>,
}

/// Outcome of a best-effort batch salary run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayrollResult {
    /// Employees paid.
    pub total_paid: usize,
    /// Employees not paid.
    pub total_failed: usize,
    /// Per-employee outcome, in input order.
    pub results: Vec<BatchItemResult>,
}

impl BatchPayrollResult {
    /// Records a committed payment.
    pub fn push_success(&mut self, employee_id: EmployeeId, receipt: String, amount: Decimal) {
        self.total_paid += 1;
        self.results.push(BatchItemResult {
            employee_id,
            success: true,
            receipt_number: Some(receipt),
            amount: Some(amount),
            error: None,
        });
    }

    /// Records a failed payment.
    pub fn push_failure(&mut self, employee_id: EmployeeId, error: &impl std::fmt::Display) {
        self.total_failed += 1;
        self.results.push(BatchItemResult {
            employee_id,
            success: false,
            receipt_number: None,
            amount: None,
            error: Some(error.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn salary(month: u32, year: i32, amount: Decimal) -> PaySalaryInput {
        PaySalaryInput {
            employee_id: EmployeeId::new(1),
            month,
            year,
            amount,
            payment_type: SalaryPaymentType::Partial,
            treasury_id: TreasuryId::new(1),
        }
    }

    #[rstest]
    #[case(1, 2025, true)]
    #[case(12, 2100, true)]
    #[case(0, 2025, false)]
    #[case(13, 2025, false)]
    #[case(6, 1999, false)]
    #[case(6, 2101, false)]
    fn test_period_bounds(#[case] month: u32, #[case] year: i32, #[case] ok: bool) {
        assert_eq!(salary(month, year, dec!(100)).validate_input().is_ok(), ok);
        assert_eq!(validate_period(month, year).is_ok(), ok);
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(salary(1, 2025, Decimal::ZERO).validate_input().is_err());
    }

    #[test]
    fn test_receipt_format() {
        assert_eq!(ReceiptKind::Salary.format(1), "SAL-000001");
        assert_eq!(ReceiptKind::Bonus.format(42), "BON-000042");
        assert_eq!(ReceiptKind::Salary.format(1_234_567), "SAL-1234567");
    }

    #[test]
    fn test_closed_month_conflicts() {
        let closed = MonthPayments {
            final_total: dec!(1000),
            closed: true,
            ..Default::default()
        };
        assert!(matches!(
            closed.ensure_open(3, 2025),
            Err(DomainError::Conflict(_))
        ));
        assert!(MonthPayments::default().ensure_open(3, 2025).is_ok());
    }

    #[test]
    fn test_remaining_after_advances() {
        let p = MonthPayments {
            partial_total: dec!(300),
            ..Default::default()
        };
        assert_eq!(p.remaining(dec!(1000)), Ok(dec!(700)));
        assert!(p.remaining(dec!(300)).is_err());
    }

    #[test]
    fn test_summary_floors_remaining() {
        let s = SalarySummary::new(
            EmployeeId::new(1),
            1,
            2025,
            dec!(500),
            MonthPayments {
                partial_total: dec!(600),
                ..Default::default()
            },
        );
        assert_eq!(s.paid, dec!(600));
        assert_eq!(s.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_batch_counts() {
        let mut r = BatchPayrollResult::default();
        r.push_success(EmployeeId::new(1), "SAL-000001".into(), dec!(10));
        r.push_failure(EmployeeId::new(2), &DomainError::validation("inactive"));
        assert_eq!((r.total_paid, r.total_failed), (1, 1));
        assert!(!r.results[1].success);
    }
}
