//! Treasury (cash box) repository.
//!
//! Withdrawals are a single conditional `UPDATE ... WHERE balance >= amount`, so two
//! concurrent payouts can never both pass a stale balance check.

use chrono::Utc;
use mizan_core::DomainError;
use mizan_core::ledger::ReferenceType;
use mizan_core::treasury::{MovementDirection, ensure_positive, insufficient_funds};
use mizan_core::validation::{check, non_negative, not_blank};
use mizan_shared::types::{CompanyId, TreasuryId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::lookup::require;
use crate::entities::{companies, treasuries, treasury_movements};
use crate::error::ServiceResult;

/// Input for opening a treasury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateTreasuryInput {
    /// Display name.
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub name: String,
    /// Starting balance.
    #[validate(custom(function = "non_negative"))]
    pub opening_balance: Decimal,
}

/// Treasury repository.
#[derive(Debug, Clone)]
pub struct TreasuryRepository {
    db: DatabaseConnection,
}

impl TreasuryRepository {
    /// Creates a new treasury repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a treasury for a company.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, not-found for an unknown company, or a
    /// database error.
    pub async fn create_treasury(
        &self,
        company_id: CompanyId,
        input: CreateTreasuryInput,
    ) -> ServiceResult<treasuries::Model> {
        check(&input)?;

        let txn = self.db.begin().await?;
        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;

        let treasury = treasuries::ActiveModel {
            company_id: Set(company_id.0),
            name: Set(input.name.trim().to_string()),
            balance: Set(input.opening_balance),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(treasury_id = treasury.id, company_id = %company_id, "Treasury created");
        Ok(treasury)
    }

    /// Adds money to a treasury.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, not-found for an unknown
    /// treasury, or a database error.
    pub async fn deposit(
        &self,
        treasury_id: TreasuryId,
        amount: Decimal,
        reference_type: ReferenceType,
        reference_id: Option<i64>,
    ) -> ServiceResult<Decimal> {
        ensure_positive(amount)?;

        let txn = self.db.begin().await?;
        credit(&txn, treasury_id, amount).await?;
        record_movement(
            &txn,
            treasury_id,
            MovementDirection::In,
            amount,
            reference_type,
            reference_id,
        )
        .await?;
        let balance = require::<treasuries::Entity, _>(&txn, "treasury", treasury_id.0)
            .await?
            .balance;
        txn.commit().await?;

        tracing::info!(treasury_id = %treasury_id, amount = %amount, "Treasury deposit");
        Ok(balance)
    }

    /// Takes money out of a treasury.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` when the balance cannot cover `amount`, plus the
    /// errors of [`TreasuryRepository::deposit`].
    pub async fn withdraw(
        &self,
        treasury_id: TreasuryId,
        amount: Decimal,
        reference_type: ReferenceType,
        reference_id: Option<i64>,
    ) -> ServiceResult<Decimal> {
        ensure_positive(amount)?;

        let txn = self.db.begin().await?;
        debit(&txn, treasury_id, amount).await?;
        record_movement(
            &txn,
            treasury_id,
            MovementDirection::Out,
            amount,
            reference_type,
            reference_id,
        )
        .await?;
        let balance = require::<treasuries::Entity, _>(&txn, "treasury", treasury_id.0)
            .await?
            .balance;
        txn.commit().await?;

        tracing::info!(treasury_id = %treasury_id, amount = %amount, "Treasury withdrawal");
        Ok(balance)
    }

    /// Current balance.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown treasury, or a database error.
    pub async fn balance(&self, treasury_id: TreasuryId) -> ServiceResult<Decimal> {
        Ok(
            require::<treasuries::Entity, _>(&self.db, "treasury", treasury_id.0)
                .await?
                .balance,
        )
    }

    /// Movements of a treasury, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn movements(
        &self,
        treasury_id: TreasuryId,
    ) -> ServiceResult<Vec<treasury_movements::Model>> {
        Ok(treasury_movements::Entity::find()
            .filter(treasury_movements::Column::TreasuryId.eq(treasury_id.0))
            .order_by_asc(treasury_movements::Column::Id)
            .all(&self.db)
            .await?)
    }
}

/// Conditionally lowers the balance by `amount`.
///
/// # Errors
///
/// Returns not-found for an unknown treasury and `InsufficientFunds` when the balance
/// is lower than `amount`.
pub(crate) async fn debit<C: ConnectionTrait>(
    conn: &C,
    treasury_id: TreasuryId,
    amount: Decimal,
) -> ServiceResult<()> {
    let result = treasuries::Entity::update_many()
        .col_expr(
            treasuries::Column::Balance,
            Expr::col(treasuries::Column::Balance).sub(amount),
        )
        .filter(treasuries::Column::Id.eq(treasury_id.0))
        .filter(treasuries::Column::Balance.gte(amount))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let treasury = require::<treasuries::Entity, _>(conn, "treasury", treasury_id.0).await?;
        return Err(insufficient_funds(treasury_id, treasury.balance, amount).into());
    }
    Ok(())
}

/// Raises the balance by `amount`.
///
/// # Errors
///
/// Returns not-found for an unknown treasury.
pub(crate) async fn credit<C: ConnectionTrait>(
    conn: &C,
    treasury_id: TreasuryId,
    amount: Decimal,
) -> ServiceResult<()> {
    let result = treasuries::Entity::update_many()
        .col_expr(
            treasuries::Column::Balance,
            Expr::col(treasuries::Column::Balance).add(amount),
        )
        .filter(treasuries::Column::Id.eq(treasury_id.0))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::not_found("treasury", treasury_id.0).into());
    }
    Ok(())
}

/// Writes the audit row for a balance change.
pub(crate) async fn record_movement<C: ConnectionTrait>(
    conn: &C,
    treasury_id: TreasuryId,
    direction: MovementDirection,
    amount: Decimal,
    reference_type: ReferenceType,
    reference_id: Option<i64>,
) -> ServiceResult<treasury_movements::Model> {
    Ok(treasury_movements::ActiveModel {
        treasury_id: Set(treasury_id.0),
        direction: Set(direction.into()),
        amount: Set(amount),
        reference_type: Set(reference_type.into()),
        reference_id: Set(reference_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}
