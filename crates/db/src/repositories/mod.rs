//! Repository implementations.
//!
//! Every mutating workflow opens one database transaction, runs its reads and
//! writes through it and commits at the end. Dropping the transaction on an early
//! `?` return rolls everything back.

mod lookup;

pub mod company;
pub mod external_store;
pub mod ledger;
pub mod payroll;
pub mod product_group;
pub mod project;
pub mod stock;
pub mod treasury;

pub use company::CompanyRepository;
pub use external_store::{CreatedStore, ExternalStoreRepository};
pub use ledger::LedgerRepository;
pub use payroll::PayrollRepository;
pub use product_group::{ProductGroupRepository, ProductGroupWithSuppliers};
pub use project::ProjectRepository;
pub use stock::{LowStockItem, StockRepository};
pub use treasury::TreasuryRepository;
