//! Stock and price repository.
//!
//! Reads resolve through the company hierarchy (see [`mizan_core::stock::resolve`]).
//! Writes only ever touch the company's own rows; a decrement is one conditional
//! `UPDATE` so concurrent consumers cannot oversell.

use std::sync::Arc;

use mizan_core::DomainError;
use mizan_core::stock::{CompanyRows, StockResolution, is_low_stock, resolve};
use mizan_shared::BusinessDefaults;
use mizan_shared::types::{CompanyId, ProductId};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use serde::{Deserialize, Serialize};

use super::lookup::require;
use crate::entities::{companies, prices, products, stocks};
use crate::error::ServiceResult;
use crate::settings::{self, SettingsLookup};

/// A product at or below the low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    /// Product.
    pub product_id: ProductId,
    /// Boxes on hand.
    pub boxes: Decimal,
}

/// Stock repository.
#[derive(Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
    settings: Arc<dyn SettingsLookup>,
    defaults: BusinessDefaults,
}

impl std::fmt::Debug for StockRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockRepository")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl StockRepository {
    /// Creates a new stock repository reading tunables from `settings`.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        settings: Arc<dyn SettingsLookup>,
        defaults: BusinessDefaults,
    ) -> Self {
        Self {
            db,
            settings,
            defaults,
        }
    }

    /// Effective stock and sell price of a product for a company.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown company, or a database error.
    pub async fn resolve_stock_and_price(
        &self,
        company_id: CompanyId,
        product_id: ProductId,
    ) -> ServiceResult<StockResolution> {
        let margin = settings::profit_margin_percent(self.settings.as_ref(), &self.defaults).await?;

        let company = require::<companies::Entity, _>(&self.db, "company", company_id.0).await?;
        let own = load_rows(&self.db, company.id, product_id.0).await?;
        let parent = match company.parent_id {
            Some(parent_id) => Some(load_rows(&self.db, parent_id, product_id.0).await?),
            None => None,
        };

        let resolution = resolve(own, parent, margin);
        tracing::debug!(
            company_id = %company_id,
            product_id = %product_id,
            source = ?resolution.source,
            "Resolved stock and price"
        );
        Ok(resolution)
    }

    /// Sets the company's own sell price for a product.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative price, not-found for an unknown
    /// company or product, or a database error.
    pub async fn set_price(
        &self,
        company_id: CompanyId,
        product_id: ProductId,
        sell_price: Decimal,
    ) -> ServiceResult<prices::Model> {
        if sell_price < Decimal::ZERO {
            return Err(DomainError::validation("sell_price: must not be negative").into());
        }

        let txn = self.db.begin().await?;
        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;
        require::<products::Entity, _>(&txn, "product", product_id.0).await?;

        prices::Entity::insert(prices::ActiveModel {
            company_id: Set(company_id.0),
            product_id: Set(product_id.0),
            sell_price: Set(sell_price),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([prices::Column::CompanyId, prices::Column::ProductId])
                .update_column(prices::Column::SellPrice)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let row = prices::Entity::find()
            .filter(prices::Column::CompanyId.eq(company_id.0))
            .filter(prices::Column::ProductId.eq(product_id.0))
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("price", product_id.0))?;

        txn.commit().await?;
        Ok(row)
    }

    /// Adds `delta` boxes (negative to remove) to the company's own stock row and
    /// returns the new level.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero delta, `InsufficientStock` when removing
    /// more than is on hand, not-found for an unknown company or product, or a
    /// database error.
    pub async fn adjust_stock(
        &self,
        company_id: CompanyId,
        product_id: ProductId,
        delta: Decimal,
    ) -> ServiceResult<Decimal> {
        if delta.is_zero() {
            return Err(DomainError::validation("delta: must not be zero").into());
        }

        let txn = self.db.begin().await?;
        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;
        require::<products::Entity, _>(&txn, "product", product_id.0).await?;

        if delta.is_sign_positive() {
            increment(&txn, company_id, product_id, delta).await?;
        } else {
            decrement(&txn, company_id, product_id, -delta).await?;
        }
        let boxes = own_boxes(&txn, company_id, product_id)
            .await?
            .unwrap_or(Decimal::ZERO);

        txn.commit().await?;

        tracing::info!(
            company_id = %company_id,
            product_id = %product_id,
            delta = %delta,
            boxes = %boxes,
            "Stock adjusted"
        );
        Ok(boxes)
    }

    /// Products of a company whose own stock is at or below the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn low_stock(&self, company_id: CompanyId) -> ServiceResult<Vec<LowStockItem>> {
        let threshold =
            settings::low_stock_threshold(self.settings.as_ref(), &self.defaults).await?;

        let rows = stocks::Entity::find()
            .filter(stocks::Column::CompanyId.eq(company_id.0))
            .order_by_asc(stocks::Column::ProductId)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|row| is_low_stock(row.boxes, threshold))
            .map(|row| LowStockItem {
                product_id: ProductId::new(row.product_id),
                boxes: row.boxes,
            })
            .collect())
    }
}

async fn load_rows<C: ConnectionTrait>(
    conn: &C,
    company_id: i64,
    product_id: i64,
) -> ServiceResult<CompanyRows> {
    let boxes = stocks::Entity::find()
        .filter(stocks::Column::CompanyId.eq(company_id))
        .filter(stocks::Column::ProductId.eq(product_id))
        .one(conn)
        .await?
        .map(|row| row.boxes);
    let sell_price = prices::Entity::find()
        .filter(prices::Column::CompanyId.eq(company_id))
        .filter(prices::Column::ProductId.eq(product_id))
        .one(conn)
        .await?
        .map(|row| row.sell_price);
    Ok(CompanyRows { boxes, sell_price })
}

async fn own_boxes<C: ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
    product_id: ProductId,
) -> ServiceResult<Option<Decimal>> {
    Ok(load_rows(conn, company_id.0, product_id.0).await?.boxes)
}

/// Removes `quantity` boxes from the company's own row.
///
/// # Errors
///
/// Returns `InsufficientStock` if the row is missing or holds fewer boxes.
pub(crate) async fn decrement<C: ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
    product_id: ProductId,
    quantity: Decimal,
) -> ServiceResult<()> {
    let result = stocks::Entity::update_many()
        .col_expr(
            stocks::Column::Boxes,
            Expr::col(stocks::Column::Boxes).sub(quantity),
        )
        .filter(stocks::Column::CompanyId.eq(company_id.0))
        .filter(stocks::Column::ProductId.eq(product_id.0))
        .filter(stocks::Column::Boxes.gte(quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let available = own_boxes(conn, company_id, product_id)
            .await?
            .unwrap_or(Decimal::ZERO);
        return Err(DomainError::InsufficientStock {
            company_id: company_id.0,
            product_id: product_id.0,
            available,
            requested: quantity,
        }
        .into());
    }
    Ok(())
}

/// Adds `quantity` boxes to the company's own row, creating it if missing.
///
/// One upsert, so concurrent restocks of a missing row add up instead of racing
/// on the `(company_id, product_id)` index.
pub(crate) async fn increment<C: ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
    product_id: ProductId,
    quantity: Decimal,
) -> ServiceResult<()> {
    stocks::Entity::insert(stocks::ActiveModel {
        company_id: Set(company_id.0),
        product_id: Set(product_id.0),
        boxes: Set(quantity),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([stocks::Column::CompanyId, stocks::Column::ProductId])
            .value(
                stocks::Column::Boxes,
                Expr::col((stocks::Entity, stocks::Column::Boxes)).add(quantity),
            )
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;
    Ok(())
}
