//! Treasury balance changes and their audit trail.

mod common;

use mizan_core::DomainError;
use mizan_core::ledger::ReferenceType;
use mizan_db::entities::sea_orm_active_enums::MovementDirection;
use mizan_db::repositories::treasury::CreateTreasuryInput;
use mizan_db::{ServiceError, TreasuryRepository};
use mizan_shared::types::{CompanyId, TreasuryId};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_deposit_and_withdraw_keep_an_audit_trail() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let repo = TreasuryRepository::new(db.clone());

    let treasury = repo
        .create_treasury(
            CompanyId::new(company.id),
            CreateTreasuryInput {
                name: "Cash".into(),
                opening_balance: dec!(100),
            },
        )
        .await
        .unwrap();
    let id = TreasuryId::new(treasury.id);

    assert_eq!(
        repo.deposit(id, dec!(50), ReferenceType::Receipt, None).await.unwrap(),
        dec!(150)
    );
    assert_eq!(
        repo.withdraw(id, dec!(120), ReferenceType::Payment, Some(9)).await.unwrap(),
        dec!(30)
    );

    let movements = repo.movements(id).await.unwrap();
    let trail: Vec<_> = movements.iter().map(|m| (m.direction, m.amount)).collect();
    assert_eq!(
        trail,
        vec![
            (MovementDirection::In, dec!(50)),
            (MovementDirection::Out, dec!(120)),
        ]
    );
    assert_eq!(movements[1].reference_id, Some(9));
}

#[tokio::test]
async fn test_overdraft_is_refused_without_side_effects() {
    let db = common::setup().await;
    let company = common::company(&db, "C1", true, None).await;
    let treasury = common::treasury(&db, company.id, dec!(40)).await;
    let repo = TreasuryRepository::new(db.clone());
    let id = TreasuryId::new(treasury.id);

    let err = repo
        .withdraw(id, dec!(41), ReferenceType::Payment, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InsufficientFunds { available, .. })
            if available == dec!(40)
    ));
    assert_eq!(repo.balance(id).await.unwrap(), dec!(40));
    assert!(repo.movements(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_treasury_is_not_found() {
    let db = common::setup().await;
    let repo = TreasuryRepository::new(db.clone());

    let err = repo
        .deposit(TreasuryId::new(5), dec!(1), ReferenceType::Receipt, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotFound { entity: "treasury", id: 5 })
    ));
}
