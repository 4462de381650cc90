//! Salary and bonus payouts.

mod common;

use mizan_core::DomainError;
use mizan_core::payroll::{BonusType, PayBonusInput, PaySalaryInput, SalaryPaymentType};
use mizan_db::entities::sea_orm_active_enums::SalaryPaymentType as DbPaymentType;
use mizan_db::entities::{salary_payments, treasury_movements};
use mizan_db::{PayrollRepository, ServiceError, TreasuryRepository};
use mizan_shared::types::{EmployeeId, TreasuryId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

fn payment_row(
    employee_id: i64,
    treasury_id: i64,
    receipt: &str,
    payment_type: DbPaymentType,
) -> salary_payments::ActiveModel {
    salary_payments::ActiveModel {
        employee_id: Set(employee_id),
        month: Set(3),
        year: Set(2026),
        amount: Set(dec!(100)),
        payment_type: Set(payment_type),
        treasury_id: Set(treasury_id),
        receipt_number: Set(receipt.to_string()),
        paid_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
}

fn salary(
    employee_id: i64,
    treasury_id: i64,
    amount: Decimal,
    payment_type: SalaryPaymentType,
) -> PaySalaryInput {
    PaySalaryInput {
        employee_id: EmployeeId::new(employee_id),
        month: 3,
        year: 2026,
        amount,
        payment_type,
        treasury_id: TreasuryId::new(treasury_id),
    }
}

#[tokio::test]
async fn test_payments_draw_sequential_receipts_and_debit_treasury() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let employee = common::employee(&db, company.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, company.id, dec!(5000)).await;
    let payroll = PayrollRepository::new(db.clone());

    let first = payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(300), SalaryPaymentType::Partial))
        .await
        .unwrap();
    let second = payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(200), SalaryPaymentType::Partial))
        .await
        .unwrap();

    assert_eq!(first.receipt_number, "SAL-000001");
    assert_eq!(second.receipt_number, "SAL-000002");

    let treasuries = TreasuryRepository::new(db.clone());
    assert_eq!(
        treasuries.balance(TreasuryId::new(treasury.id)).await.unwrap(),
        dec!(4500)
    );
    let movements = treasuries.movements(TreasuryId::new(treasury.id)).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].reference_id, Some(first.id));
}

#[tokio::test]
async fn test_insufficient_funds_rolls_everything_back() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let employee = common::employee(&db, company.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, company.id, dec!(100)).await;
    let payroll = PayrollRepository::new(db.clone());

    let err = payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(300), SalaryPaymentType::Final))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InsufficientFunds { .. })
    ));

    assert_eq!(salary_payments::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(treasury_movements::Entity::find().count(&db).await.unwrap(), 0);

    // The failed attempt must not have consumed a receipt number.
    common::treasury(&db, company.id, dec!(1000)).await;
    let ok = payroll
        .pay_employee(salary(employee.id, treasury.id + 1, dec!(300), SalaryPaymentType::Final))
        .await
        .unwrap();
    assert_eq!(ok.receipt_number, "SAL-000001");
}

#[tokio::test]
async fn test_final_payment_closes_the_month() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let employee = common::employee(&db, company.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, company.id, dec!(5000)).await;
    let payroll = PayrollRepository::new(db.clone());

    payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(1000), SalaryPaymentType::Final))
        .await
        .unwrap();
    let err = payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(50), SalaryPaymentType::Partial))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));

    let summary = payroll
        .salary_summary(EmployeeId::new(employee.id), 3, 2026)
        .await
        .unwrap();
    assert!(summary.closed);
    assert_eq!(summary.paid, dec!(1000));
    assert_eq!(summary.remaining, dec!(0));
}

#[tokio::test]
async fn test_schema_allows_one_final_payment_per_month() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let employee = common::employee(&db, company.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, company.id, dec!(5000)).await;

    payment_row(employee.id, treasury.id, "X-1", DbPaymentType::Partial)
        .insert(&db)
        .await
        .unwrap();
    payment_row(employee.id, treasury.id, "X-2", DbPaymentType::Partial)
        .insert(&db)
        .await
        .unwrap();
    payment_row(employee.id, treasury.id, "X-3", DbPaymentType::Final)
        .insert(&db)
        .await
        .unwrap();

    let err = payment_row(employee.id, treasury.id, "X-4", DbPaymentType::Final)
        .insert(&db)
        .await
        .unwrap_err();
    assert!(matches!(
        ServiceError::from(err),
        ServiceError::Domain(DomainError::Conflict(_))
    ));
    assert_eq!(salary_payments::Entity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_foreign_treasury_is_forbidden() {
    let db = common::setup().await;
    let mine = common::company(&db, "C1", true, None).await;
    let other = common::company(&db, "C2", true, None).await;
    let employee = common::employee(&db, mine.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, other.id, dec!(5000)).await;

    let err = PayrollRepository::new(db.clone())
        .pay_employee(salary(employee.id, treasury.id, dec!(10), SalaryPaymentType::Partial))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden)));
}

#[tokio::test]
async fn test_bad_month_rejected_before_any_read() {
    let db = common::setup().await;
    let mut input = salary(1, 1, dec!(10), SalaryPaymentType::Partial);
    input.month = 13;

    let err = PayrollRepository::new(db.clone())
        .pay_employee(input)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_batch_pays_remainders_and_reports_failures() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let partly_paid = common::employee(&db, company.id, dec!(1000), true).await;
    let unpaid = common::employee(&db, company.id, dec!(800), true).await;
    let inactive = common::employee(&db, company.id, dec!(900), false).await;
    let treasury = common::treasury(&db, company.id, dec!(5000)).await;
    let payroll = PayrollRepository::new(db.clone());

    payroll
        .pay_employee(salary(partly_paid.id, treasury.id, dec!(400), SalaryPaymentType::Partial))
        .await
        .unwrap();

    let ids = [
        EmployeeId::new(partly_paid.id),
        EmployeeId::new(inactive.id),
        EmployeeId::new(unpaid.id),
        EmployeeId::new(9999),
    ];
    let result = payroll
        .pay_multiple_salaries(&ids, 3, 2026, TreasuryId::new(treasury.id))
        .await
        .unwrap();

    assert_eq!(result.total_paid, 2);
    assert_eq!(result.total_failed, 2);
    assert_eq!(result.results.len(), 4);
    assert_eq!(result.results[0].amount, Some(dec!(600)));
    assert!(!result.results[1].success);
    assert_eq!(result.results[2].amount, Some(dec!(800)));
    assert!(result.results[3].error.is_some());

    // 5000 - 400 - 600 - 800
    assert_eq!(
        TreasuryRepository::new(db.clone())
            .balance(TreasuryId::new(treasury.id))
            .await
            .unwrap(),
        dec!(3200)
    );

    // A second run finds every month closed.
    let rerun = payroll
        .pay_multiple_salaries(&ids[..1], 3, 2026, TreasuryId::new(treasury.id))
        .await
        .unwrap();
    assert_eq!(rerun.total_failed, 1);
}

#[tokio::test]
async fn test_batch_rejects_bad_period_outright() {
    let db = common::setup().await;
    let err = PayrollRepository::new(db.clone())
        .pay_multiple_salaries(&[EmployeeId::new(1)], 0, 2026, TreasuryId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_bonus_uses_its_own_sequence() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let employee = common::employee(&db, company.id, dec!(1000), true).await;
    let treasury = common::treasury(&db, company.id, dec!(5000)).await;
    let payroll = PayrollRepository::new(db.clone());

    payroll
        .pay_employee(salary(employee.id, treasury.id, dec!(100), SalaryPaymentType::Partial))
        .await
        .unwrap();
    let bonus = payroll
        .pay_bonus(PayBonusInput {
            employee_id: EmployeeId::new(employee.id),
            bonus_type: BonusType::Incentive,
            amount: dec!(250),
            treasury_id: TreasuryId::new(treasury.id),
            notes: Some("Q1 target".into()),
        })
        .await
        .unwrap();

    assert_eq!(bonus.receipt_number, "BON-000001");
    assert_eq!(
        TreasuryRepository::new(db.clone())
            .balance(TreasuryId::new(treasury.id))
            .await
            .unwrap(),
        dec!(4650)
    );
}
