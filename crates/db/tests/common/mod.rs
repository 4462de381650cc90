//! Fixtures shared by the integration tests.
//!
//! Every test gets its own migrated in-memory SQLite database.

#![allow(dead_code)]

use chrono::Utc;
use mizan_db::entities::{
    companies, customers, employees, prices, products, stocks, suppliers, treasuries,
};
use mizan_db::migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn company(
    db: &DatabaseConnection,
    code: &str,
    is_parent: bool,
    parent_id: Option<i64>,
) -> companies::Model {
    companies::ActiveModel {
        name: Set(format!("Company {code}")),
        code: Set(code.to_string()),
        is_parent: Set(is_parent),
        parent_id: Set(parent_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert company")
}

pub async fn customer(db: &DatabaseConnection, company_id: i64, name: &str) -> customers::Model {
    customers::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        phone: Set(None),
        address: Set(None),
        linked_company_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert customer")
}

pub async fn supplier(db: &DatabaseConnection, name: &str) -> suppliers::Model {
    suppliers::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert supplier")
}

pub async fn product(db: &DatabaseConnection, sku: &str) -> products::Model {
    products::ActiveModel {
        name: Set(format!("Product {sku}")),
        sku: Set(sku.to_string()),
        group_id: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert product")
}

pub async fn stock(
    db: &DatabaseConnection,
    company_id: i64,
    product_id: i64,
    boxes: Decimal,
) -> stocks::Model {
    stocks::ActiveModel {
        company_id: Set(company_id),
        product_id: Set(product_id),
        boxes: Set(boxes),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert stock")
}

pub async fn price(
    db: &DatabaseConnection,
    company_id: i64,
    product_id: i64,
    sell_price: Decimal,
) -> prices::Model {
    prices::ActiveModel {
        company_id: Set(company_id),
        product_id: Set(product_id),
        sell_price: Set(sell_price),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert price")
}

pub async fn employee(
    db: &DatabaseConnection,
    company_id: i64,
    base_salary: Decimal,
    is_active: bool,
) -> employees::Model {
    employees::ActiveModel {
        company_id: Set(company_id),
        full_name: Set("Employee".to_string()),
        base_salary: Set(base_salary),
        is_active: Set(is_active),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert employee")
}

pub async fn treasury(
    db: &DatabaseConnection,
    company_id: i64,
    balance: Decimal,
) -> treasuries::Model {
    treasuries::ActiveModel {
        company_id: Set(company_id),
        name: Set("Main".to_string()),
        balance: Set(balance),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert treasury")
}
