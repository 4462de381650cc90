//! Core business rules for Mizan.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Inputs are validated here and the repositories in `mizan-db` apply these rules inside
//! a database transaction.
//!
//! # Modules
//!
//! - `ledger` - Party account entries and the balance projector
//! - `stock` - Stock/price resolution across the company hierarchy
//! - `company` - Parent/branch rules
//! - `payroll` - Salary, bonus and receipt numbering rules
//! - `project` - Projects and expense lines
//! - `catalog` - Product groups
//! - `store` - External stores
//! - `treasury` - Treasury movements

pub mod catalog;
pub mod company;
pub mod error;
pub mod ledger;
pub mod payroll;
pub mod project;
pub mod stock;
pub mod store;
pub mod treasury;
pub mod validation;

pub use error::DomainError;
