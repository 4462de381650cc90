//! `SeaORM` entity definitions, one module per table.

#![allow(missing_docs)]

pub mod bonuses;
pub mod companies;
pub mod customers;
pub mod employees;
pub mod external_store_products;
pub mod external_store_users;
pub mod external_stores;
pub mod party_account_entries;
pub mod prices;
pub mod product_group_suppliers;
pub mod product_groups;
pub mod products;
pub mod projects;
pub mod project_expenses;
pub mod receipt_sequences;
pub mod salary_payments;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod stocks;
pub mod suppliers;
pub mod treasuries;
pub mod treasury_movements;
