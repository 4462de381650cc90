//! Stock and price resolution through the company hierarchy.

mod common;

use std::sync::Arc;

use mizan_core::DomainError;
use mizan_core::stock::ResolutionSource;
use mizan_db::settings::{PROFIT_MARGIN_KEY, SettingsRepository};
use mizan_db::{ServiceError, StaticSettings, StockRepository};
use mizan_shared::BusinessDefaults;
use mizan_shared::types::{CompanyId, ProductId};
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

fn repo(db: &DatabaseConnection, margin: &str) -> StockRepository {
    let settings = StaticSettings::new().with(PROFIT_MARGIN_KEY, margin);
    StockRepository::new(db.clone(), Arc::new(settings), BusinessDefaults::default())
}

#[tokio::test]
async fn test_branch_inherits_parent_rows_with_margin() {
    let db = common::setup().await;
    let parent = common::company(&db, "P", true, None).await;
    let branch = common::company(&db, "B", false, Some(parent.id)).await;
    let product = common::product(&db, "SKU-1").await;
    common::stock(&db, parent.id, product.id, dec!(40)).await;
    common::price(&db, parent.id, product.id, dec!(100)).await;

    let resolution = repo(&db, "10")
        .resolve_stock_and_price(CompanyId::new(branch.id), ProductId::new(product.id))
        .await
        .unwrap();

    assert_eq!(resolution.source, ResolutionSource::Parent);
    assert_eq!(resolution.boxes, dec!(40));
    assert_eq!(resolution.sell_price, Some(dec!(110)));
}

#[tokio::test]
async fn test_own_rows_win_over_parent() {
    let db = common::setup().await;
    let parent = common::company(&db, "P", true, None).await;
    let branch = common::company(&db, "B", false, Some(parent.id)).await;
    let product = common::product(&db, "SKU-1").await;
    common::stock(&db, parent.id, product.id, dec!(40)).await;
    common::price(&db, parent.id, product.id, dec!(100)).await;
    common::stock(&db, branch.id, product.id, dec!(7)).await;
    common::price(&db, branch.id, product.id, dec!(95)).await;

    let resolution = repo(&db, "10")
        .resolve_stock_and_price(CompanyId::new(branch.id), ProductId::new(product.id))
        .await
        .unwrap();

    assert_eq!(resolution.source, ResolutionSource::Own);
    assert_eq!(resolution.boxes, dec!(7));
    assert_eq!(resolution.sell_price, Some(dec!(95)));
}

#[tokio::test]
async fn test_nothing_anywhere_resolves_to_none() {
    let db = common::setup().await;
    let parent = common::company(&db, "P", true, None).await;
    let product = common::product(&db, "SKU-1").await;

    let resolution = repo(&db, "10")
        .resolve_stock_and_price(CompanyId::new(parent.id), ProductId::new(product.id))
        .await
        .unwrap();

    assert_eq!(resolution.source, ResolutionSource::None);
    assert_eq!(resolution.boxes, dec!(0));
    assert_eq!(resolution.sell_price, None);
}

#[tokio::test]
async fn test_margin_is_read_from_settings_table() {
    let db = common::setup().await;
    let parent = common::company(&db, "P", true, None).await;
    let branch = common::company(&db, "B", false, Some(parent.id)).await;
    let product = common::product(&db, "SKU-1").await;
    common::price(&db, parent.id, product.id, dec!(200)).await;

    let settings = SettingsRepository::new(db.clone());
    settings.set(PROFIT_MARGIN_KEY, "25").await.unwrap();
    let stock = StockRepository::new(db.clone(), Arc::new(settings), BusinessDefaults::default());

    let resolution = stock
        .resolve_stock_and_price(CompanyId::new(branch.id), ProductId::new(product.id))
        .await
        .unwrap();
    assert_eq!(resolution.sell_price, Some(dec!(250)));
}

#[tokio::test]
async fn test_unknown_company_is_not_found() {
    let db = common::setup().await;
    let product = common::product(&db, "SKU-1").await;

    let err = repo(&db, "0")
        .resolve_stock_and_price(CompanyId::new(999), ProductId::new(product.id))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotFound { entity: "company", id: 999 })
    ));
}

#[tokio::test]
async fn test_adjust_stock_creates_and_guards_rows() {
    let db = common::setup().await;
    let company = common::company(&db, "P", true, None).await;
    let product = common::product(&db, "SKU-1").await;
    let stock = repo(&db, "0");
    let (c, p) = (CompanyId::new(company.id), ProductId::new(product.id));

    assert_eq!(stock.adjust_stock(c, p, dec!(5)).await.unwrap(), dec!(5));
    assert_eq!(stock.adjust_stock(c, p, dec!(3)).await.unwrap(), dec!(8));
    assert_eq!(stock.adjust_stock(c, p, dec!(-6)).await.unwrap(), dec!(2));

    let err = stock.adjust_stock(c, p, dec!(-3)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InsufficientStock { .. })
    ));
    assert_eq!(
        stock.resolve_stock_and_price(c, p).await.unwrap().boxes,
        dec!(2)
    );
}

#[tokio::test]
async fn test_set_price_overwrites_existing_row() {
    let db = common::setup().await;
    let company = common::company(&db, "P", true, None).await;
    let product = common::product(&db, "SKU-1").await;
    let stock = repo(&db, "0");
    let (c, p) = (CompanyId::new(company.id), ProductId::new(product.id));

    stock.set_price(c, p, dec!(10)).await.unwrap();
    let row = stock.set_price(c, p, dec!(12)).await.unwrap();

    assert_eq!(row.sell_price, dec!(12));
    assert_eq!(
        stock.resolve_stock_and_price(c, p).await.unwrap().sell_price,
        Some(dec!(12))
    );
}

#[tokio::test]
async fn test_low_stock_uses_inclusive_threshold() {
    let db = common::setup().await;
    let company = common::company(&db, "P", true, None).await;
    let low = common::product(&db, "LOW").await;
    let edge = common::product(&db, "EDGE").await;
    let plenty = common::product(&db, "PLENTY").await;
    common::stock(&db, company.id, low.id, dec!(2)).await;
    common::stock(&db, company.id, edge.id, dec!(10)).await;
    common::stock(&db, company.id, plenty.id, dec!(11)).await;

    let items = repo(&db, "0")
        .low_stock(CompanyId::new(company.id))
        .await
        .unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.product_id.0).collect();
    assert_eq!(ids, vec![low.id, edge.id]);
}
