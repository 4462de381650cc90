//! Payroll repository: salary and bonus payouts from a treasury.
//!
//! A payout debits the treasury, draws the next receipt number, records the payment
//! and writes the treasury movement in one transaction. Batch runs give each employee
//! their own transaction so one failure never undoes another employee's payment.

use chrono::Utc;
use mizan_core::DomainError;
use mizan_core::ledger::ReferenceType;
use mizan_core::payroll::{
    BatchPayrollResult, MonthPayments, PayBonusInput, PaySalaryInput, ReceiptKind,
    SalaryPaymentType, SalarySummary, validate_period,
};
use mizan_core::treasury::{MovementDirection, ensure_same_company};
use mizan_shared::types::{CompanyId, EmployeeId, TreasuryId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

use super::lookup::require;
use super::treasury::{debit, record_movement};
use crate::entities::sea_orm_active_enums::SalaryPaymentType as DbPaymentType;
use crate::entities::{bonuses, employees, receipt_sequences, salary_payments, treasuries};
use crate::error::{ServiceError, ServiceResult};

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pays one salary instalment.
    ///
    /// A `FINAL` payment closes the month; nothing more can be paid for it afterwards.
    ///
    /// # Errors
    ///
    /// - `Validation` for bad input or an inactive employee
    /// - `NotFound` for an unknown employee or treasury
    /// - `Forbidden` when the treasury belongs to another company
    /// - `Conflict` when the month is already closed
    /// - `InsufficientFunds` when the treasury cannot cover the amount
    pub async fn pay_employee(
        &self,
        input: PaySalaryInput,
    ) -> ServiceResult<salary_payments::Model> {
        input.validate_input()?;

        let txn = self.db.begin().await?;
        let payment = pay_in(&txn, &input).await?;
        txn.commit().await?;

        tracing::info!(
            employee_id = %input.employee_id,
            receipt = %payment.receipt_number,
            amount = %payment.amount,
            payment_type = ?input.payment_type,
            "Salary paid"
        );
        Ok(payment)
    }

    /// Pays every listed employee the remainder of their month as a `FINAL` payment.
    ///
    /// Failures are collected per employee; the batch itself only fails for an
    /// invalid period.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a month outside 1..=12 or a year outside 2000..=2100.
    pub async fn pay_multiple_salaries(
        &self,
        employee_ids: &[EmployeeId],
        month: u32,
        year: i32,
        treasury_id: TreasuryId,
    ) -> ServiceResult<BatchPayrollResult> {
        validate_period(month, year)?;

        let mut result = BatchPayrollResult::default();
        for &employee_id in employee_ids {
            match self
                .pay_remaining(employee_id, month, year, treasury_id)
                .await
            {
                Ok(payment) => {
                    result.push_success(employee_id, payment.receipt_number, payment.amount);
                }
                Err(err) => {
                    tracing::warn!(
                        employee_id = %employee_id,
                        month,
                        year,
                        error = %err,
                        "Batch salary payment failed"
                    );
                    result.push_failure(employee_id, &err);
                }
            }
        }

        tracing::info!(
            month,
            year,
            paid = result.total_paid,
            failed = result.total_failed,
            "Batch payroll finished"
        );
        Ok(result)
    }

    async fn pay_remaining(
        &self,
        employee_id: EmployeeId,
        month: u32,
        year: i32,
        treasury_id: TreasuryId,
    ) -> ServiceResult<salary_payments::Model> {
        let txn = self.db.begin().await?;

        let employee = active_employee(&txn, employee_id).await?;
        let payments = month_payments(&txn, employee_id, month, year).await?;
        payments.ensure_open(month, year)?;
        let amount = payments.remaining(employee.base_salary)?;

        let input = PaySalaryInput {
            employee_id,
            month,
            year,
            amount,
            payment_type: SalaryPaymentType::Final,
            treasury_id,
        };
        let payment = pay_in(&txn, &input).await?;
        txn.commit().await?;
        Ok(payment)
    }

    /// Pays a bonus.
    ///
    /// # Errors
    ///
    /// Same as [`PayrollRepository::pay_employee`] except there is no month to close.
    pub async fn pay_bonus(&self, input: PayBonusInput) -> ServiceResult<bonuses::Model> {
        input.validate_input()?;

        let txn = self.db.begin().await?;
        let employee = active_employee(&txn, input.employee_id).await?;
        check_treasury(&txn, input.treasury_id, CompanyId::new(employee.company_id)).await?;

        debit(&txn, input.treasury_id, input.amount).await?;
        let receipt_number = next_receipt(&txn, ReceiptKind::Bonus).await?;

        let bonus = bonuses::ActiveModel {
            employee_id: Set(input.employee_id.0),
            bonus_type: Set(input.bonus_type.into()),
            amount: Set(input.amount),
            treasury_id: Set(input.treasury_id.0),
            receipt_number: Set(receipt_number),
            notes: Set(input.notes.clone()),
            paid_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        record_movement(
            &txn,
            input.treasury_id,
            MovementDirection::Out,
            input.amount,
            ReferenceType::Bonus,
            Some(bonus.id),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            employee_id = %input.employee_id,
            receipt = %bonus.receipt_number,
            amount = %bonus.amount,
            "Bonus paid"
        );
        Ok(bonus)
    }

    /// What has been paid and what remains for one employee and month.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad period, `NotFound` for an unknown employee, or a
    /// database error.
    pub async fn salary_summary(
        &self,
        employee_id: EmployeeId,
        month: u32,
        year: i32,
    ) -> ServiceResult<SalarySummary> {
        validate_period(month, year)?;

        let employee =
            require::<employees::Entity, _>(&self.db, "employee", employee_id.0).await?;
        let payments = month_payments(&self.db, employee_id, month, year).await?;

        Ok(SalarySummary::new(
            employee_id,
            month,
            year,
            employee.base_salary,
            payments,
        ))
    }
}

/// Runs one salary payment inside `txn`. The input is already validated.
async fn pay_in<C: ConnectionTrait>(
    txn: &C,
    input: &PaySalaryInput,
) -> ServiceResult<salary_payments::Model> {
    let employee = active_employee(txn, input.employee_id).await?;
    check_treasury(txn, input.treasury_id, CompanyId::new(employee.company_id)).await?;

    month_payments(txn, input.employee_id, input.month, input.year)
        .await?
        .ensure_open(input.month, input.year)?;

    debit(txn, input.treasury_id, input.amount).await?;
    let receipt_number = next_receipt(txn, ReceiptKind::Salary).await?;

    let payment = salary_payments::ActiveModel {
        employee_id: Set(input.employee_id.0),
        month: Set(month_column(input.month)?),
        year: Set(input.year),
        amount: Set(input.amount),
        payment_type: Set(input.payment_type.into()),
        treasury_id: Set(input.treasury_id.0),
        receipt_number: Set(receipt_number),
        paid_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    record_movement(
        txn,
        input.treasury_id,
        MovementDirection::Out,
        input.amount,
        ReferenceType::Salary,
        Some(payment.id),
    )
    .await?;

    Ok(payment)
}

/// Loads the employee with a row lock held until `conn`'s transaction ends.
///
/// Every payout for the same employee queues here, so the month's payments read
/// afterwards cannot change before this transaction commits.
async fn active_employee<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
) -> ServiceResult<employees::Model> {
    let employee = employees::Entity::find_by_id(employee_id.0)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("employee", employee_id.0))?;
    if !employee.is_active {
        return Err(DomainError::validation(format!("employee {employee_id} is inactive")).into());
    }
    Ok(employee)
}

async fn check_treasury<C: ConnectionTrait>(
    conn: &C,
    treasury_id: TreasuryId,
    company_id: CompanyId,
) -> ServiceResult<()> {
    let treasury = require::<treasuries::Entity, _>(conn, "treasury", treasury_id.0).await?;
    ensure_same_company(CompanyId::new(treasury.company_id), company_id)?;
    Ok(())
}

async fn month_payments<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
    month: u32,
    year: i32,
) -> ServiceResult<MonthPayments> {
    let rows = salary_payments::Entity::find()
        .filter(salary_payments::Column::EmployeeId.eq(employee_id.0))
        .filter(salary_payments::Column::Month.eq(month_column(month)?))
        .filter(salary_payments::Column::Year.eq(year))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .fold(MonthPayments::default(), |mut acc, row| {
            match row.payment_type {
                DbPaymentType::Partial => acc.partial_total += row.amount,
                DbPaymentType::Final => {
                    acc.final_total += row.amount;
                    acc.closed = true;
                }
            }
            acc
        }))
}

fn month_column(month: u32) -> Result<i32, DomainError> {
    i32::try_from(month).map_err(|_| DomainError::validation("month: must be between 1 and 12"))
}

/// Draws the next receipt number of `kind`.
///
/// The increment is one `UPDATE`, so the row stays locked until the surrounding
/// transaction ends and two payouts can never draw the same number.
pub(crate) async fn next_receipt<C: ConnectionTrait>(
    conn: &C,
    kind: ReceiptKind,
) -> ServiceResult<String> {
    let key = kind.sequence_key();

    let result = receipt_sequences::Entity::update_many()
        .col_expr(
            receipt_sequences::Column::LastValue,
            Expr::col(receipt_sequences::Column::LastValue).add(1),
        )
        .filter(receipt_sequences::Column::Kind.eq(key))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::Database(sea_orm::DbErr::RecordNotFound(
            format!("receipt sequence {key}"),
        )));
    }

    let row = receipt_sequences::Entity::find_by_id(key.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::Database(sea_orm::DbErr::RecordNotFound(format!(
                "receipt sequence {key}"
            )))
        })?;

    Ok(kind.format(row.last_value))
}
