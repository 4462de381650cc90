//! Initial schema migration.
//!
//! Built with the backend-agnostic schema builder so the same migration runs on
//! PostgreSQL and on SQLite:
//!
//! - company hierarchy, customers, suppliers
//! - catalog: products, product groups and their suppliers
//! - per-company stock and price rows
//! - the append-only party ledger
//! - treasuries, payroll and receipt sequences
//! - projects and their expense lines
//! - external stores
//! - runtime settings

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Companies {
    Table,
    Id,
    Name,
    Code,
    IsParent,
    ParentId,
    CreatedAt,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    CompanyId,
    Name,
    Phone,
    Address,
    LinkedCompanyId,
    CreatedAt,
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    Name,
    Phone,
    CreatedAt,
}

#[derive(Iden)]
enum ProductGroups {
    Table,
    Id,
    Name,
    Description,
    PrimarySupplierId,
}

#[derive(Iden)]
enum ProductGroupSuppliers {
    Table,
    Id,
    GroupId,
    SupplierId,
    IsPrimary,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Sku,
    GroupId,
    IsActive,
}

#[derive(Iden)]
enum Stocks {
    Table,
    Id,
    CompanyId,
    ProductId,
    Boxes,
}

#[derive(Iden)]
enum Prices {
    Table,
    Id,
    CompanyId,
    ProductId,
    SellPrice,
}

#[derive(Iden)]
enum PartyAccountEntries {
    Table,
    Id,
    PartyId,
    PartyType,
    TransactionType,
    Amount,
    ReferenceType,
    ReferenceId,
    Description,
    TransactionDate,
    CreatedAt,
}

#[derive(Iden)]
enum Treasuries {
    Table,
    Id,
    CompanyId,
    Name,
    Balance,
    CreatedAt,
}

#[derive(Iden)]
enum TreasuryMovements {
    Table,
    Id,
    TreasuryId,
    Direction,
    Amount,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    CompanyId,
    FullName,
    BaseSalary,
    IsActive,
}

#[derive(Iden)]
enum SalaryPayments {
    Table,
    Id,
    EmployeeId,
    Month,
    Year,
    Amount,
    PaymentType,
    TreasuryId,
    ReceiptNumber,
    PaidAt,
}

#[derive(Iden)]
enum Bonuses {
    Table,
    Id,
    EmployeeId,
    BonusType,
    Amount,
    TreasuryId,
    ReceiptNumber,
    Notes,
    PaidAt,
}

#[derive(Iden)]
enum ReceiptSequences {
    Table,
    Kind,
    LastValue,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    CompanyId,
    CustomerId,
    Name,
    ContractValue,
    EstimatedBudget,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum ProjectExpenses {
    Table,
    Id,
    ProjectId,
    CompanyId,
    ProductId,
    ItemType,
    ExpenseType,
    Description,
    Quantity,
    UnitPrice,
    Total,
    CreatedAt,
}

#[derive(Iden)]
enum ExternalStores {
    Table,
    Id,
    CompanyId,
    CustomerId,
    Name,
    Code,
    Address,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum ExternalStoreUsers {
    Table,
    Id,
    StoreId,
    Username,
    FullName,
    IsActive,
}

#[derive(Iden)]
enum ExternalStoreProducts {
    Table,
    Id,
    StoreId,
    ProductId,
}

#[derive(Iden)]
enum Settings {
    Table,
    Key,
    Value,
}

// ─────────────────────────────────────────────────────────────────────────────
// Column helpers
// ─────────────────────────────────────────────────────────────────────────────

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn fk_col(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).decimal().not_null().to_owned()
}

fn label(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).string_len(20).not_null().to_owned()
}

fn stamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn unique_index(name: &str, table: impl IntoIden + 'static, cols: [DynIden; 2]) -> IndexCreateStatement {
    let mut index = Index::create();
    index.name(name).table(table).unique();
    for col in cols {
        index.col(col);
    }
    index.to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Companies and parties
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(pk(Companies::Id))
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Companies::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Companies::IsParent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Companies::ParentId).big_integer())
                    .col(stamp(Companies::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-companies-parent_id")
                            .from(Companies::Table, Companies::ParentId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(pk(Suppliers::Id))
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Phone).string())
                    .col(stamp(Suppliers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk(Customers::Id))
                    .col(fk_col(Customers::CompanyId))
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(ColumnDef::new(Customers::Address).string())
                    .col(ColumnDef::new(Customers::LinkedCompanyId).big_integer())
                    .col(stamp(Customers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customers-company_id")
                            .from(Customers::Table, Customers::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customers-linked_company_id")
                            .from(Customers::Table, Customers::LinkedCompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Catalog
        manager
            .create_table(
                Table::create()
                    .table(ProductGroups::Table)
                    .if_not_exists()
                    .col(pk(ProductGroups::Id))
                    .col(
                        ColumnDef::new(ProductGroups::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProductGroups::Description).string())
                    .col(ColumnDef::new(ProductGroups::PrimarySupplierId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_groups-primary_supplier_id")
                            .from(ProductGroups::Table, ProductGroups::PrimarySupplierId)
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductGroupSuppliers::Table)
                    .if_not_exists()
                    .col(pk(ProductGroupSuppliers::Id))
                    .col(fk_col(ProductGroupSuppliers::GroupId))
                    .col(fk_col(ProductGroupSuppliers::SupplierId))
                    .col(
                        ColumnDef::new(ProductGroupSuppliers::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_group_suppliers-group_id")
                            .from(ProductGroupSuppliers::Table, ProductGroupSuppliers::GroupId)
                            .to(ProductGroups::Table, ProductGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_group_suppliers-supplier_id")
                            .from(
                                ProductGroupSuppliers::Table,
                                ProductGroupSuppliers::SupplierId,
                            )
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "idx-product_group_suppliers-group_id-supplier_id-unique",
                ProductGroupSuppliers::Table,
                [
                    ProductGroupSuppliers::GroupId.into_iden(),
                    ProductGroupSuppliers::SupplierId.into_iden(),
                ],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk(Products::Id))
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(
                        ColumnDef::new(Products::Sku)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::GroupId).big_integer())
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-group_id")
                            .from(Products::Table, Products::GroupId)
                            .to(ProductGroups::Table, ProductGroups::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Per-company stock and price rows
        manager
            .create_table(
                Table::create()
                    .table(Stocks::Table)
                    .if_not_exists()
                    .col(pk(Stocks::Id))
                    .col(fk_col(Stocks::CompanyId))
                    .col(fk_col(Stocks::ProductId))
                    .col(money(Stocks::Boxes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stocks-company_id")
                            .from(Stocks::Table, Stocks::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stocks-product_id")
                            .from(Stocks::Table, Stocks::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "idx-stocks-company_id-product_id-unique",
                Stocks::Table,
                [Stocks::CompanyId.into_iden(), Stocks::ProductId.into_iden()],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prices::Table)
                    .if_not_exists()
                    .col(pk(Prices::Id))
                    .col(fk_col(Prices::CompanyId))
                    .col(fk_col(Prices::ProductId))
                    .col(money(Prices::SellPrice))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prices-company_id")
                            .from(Prices::Table, Prices::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prices-product_id")
                            .from(Prices::Table, Prices::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "idx-prices-company_id-product_id-unique",
                Prices::Table,
                [Prices::CompanyId.into_iden(), Prices::ProductId.into_iden()],
            ))
            .await?;

        // 4. Party ledger (append only, party_id is polymorphic so no foreign key)
        manager
            .create_table(
                Table::create()
                    .table(PartyAccountEntries::Table)
                    .if_not_exists()
                    .col(pk(PartyAccountEntries::Id))
                    .col(fk_col(PartyAccountEntries::PartyId))
                    .col(label(PartyAccountEntries::PartyType))
                    .col(label(PartyAccountEntries::TransactionType))
                    .col(money(PartyAccountEntries::Amount))
                    .col(label(PartyAccountEntries::ReferenceType))
                    .col(ColumnDef::new(PartyAccountEntries::ReferenceId).big_integer())
                    .col(ColumnDef::new(PartyAccountEntries::Description).string_len(500))
                    .col(
                        ColumnDef::new(PartyAccountEntries::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(stamp(PartyAccountEntries::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-party_account_entries-party-date")
                    .table(PartyAccountEntries::Table)
                    .col(PartyAccountEntries::PartyType)
                    .col(PartyAccountEntries::PartyId)
                    .col(PartyAccountEntries::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // 5. Treasuries
        manager
            .create_table(
                Table::create()
                    .table(Treasuries::Table)
                    .if_not_exists()
                    .col(pk(Treasuries::Id))
                    .col(fk_col(Treasuries::CompanyId))
                    .col(ColumnDef::new(Treasuries::Name).string().not_null())
                    .col(money(Treasuries::Balance))
                    .col(stamp(Treasuries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-treasuries-company_id")
                            .from(Treasuries::Table, Treasuries::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TreasuryMovements::Table)
                    .if_not_exists()
                    .col(pk(TreasuryMovements::Id))
                    .col(fk_col(TreasuryMovements::TreasuryId))
                    .col(label(TreasuryMovements::Direction))
                    .col(money(TreasuryMovements::Amount))
                    .col(label(TreasuryMovements::ReferenceType))
                    .col(ColumnDef::new(TreasuryMovements::ReferenceId).big_integer())
                    .col(stamp(TreasuryMovements::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-treasury_movements-treasury_id")
                            .from(TreasuryMovements::Table, TreasuryMovements::TreasuryId)
                            .to(Treasuries::Table, Treasuries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. Payroll
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk(Employees::Id))
                    .col(fk_col(Employees::CompanyId))
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(money(Employees::BaseSalary))
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employees-company_id")
                            .from(Employees::Table, Employees::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalaryPayments::Table)
                    .if_not_exists()
                    .col(pk(SalaryPayments::Id))
                    .col(fk_col(SalaryPayments::EmployeeId))
                    .col(ColumnDef::new(SalaryPayments::Month).integer().not_null())
                    .col(ColumnDef::new(SalaryPayments::Year).integer().not_null())
                    .col(money(SalaryPayments::Amount))
                    .col(label(SalaryPayments::PaymentType))
                    .col(fk_col(SalaryPayments::TreasuryId))
                    .col(
                        ColumnDef::new(SalaryPayments::ReceiptNumber)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(stamp(SalaryPayments::PaidAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-salary_payments-employee_id")
                            .from(SalaryPayments::Table, SalaryPayments::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-salary_payments-treasury_id")
                            .from(SalaryPayments::Table, SalaryPayments::TreasuryId)
                            .to(Treasuries::Table, Treasuries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-salary_payments-employee-period")
                    .table(SalaryPayments::Table)
                    .col(SalaryPayments::EmployeeId)
                    .col(SalaryPayments::Year)
                    .col(SalaryPayments::Month)
                    .to_owned(),
            )
            .await?;

        // One FINAL payment per employee and month. Partial indexes share this
        // syntax on PostgreSQL and SQLite.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-salary_payments-final-period\" \
                 ON salary_payments (employee_id, year, month) \
                 WHERE payment_type = 'FINAL'",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bonuses::Table)
                    .if_not_exists()
                    .col(pk(Bonuses::Id))
                    .col(fk_col(Bonuses::EmployeeId))
                    .col(label(Bonuses::BonusType))
                    .col(money(Bonuses::Amount))
                    .col(fk_col(Bonuses::TreasuryId))
                    .col(
                        ColumnDef::new(Bonuses::ReceiptNumber)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bonuses::Notes).string_len(500))
                    .col(stamp(Bonuses::PaidAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bonuses-employee_id")
                            .from(Bonuses::Table, Bonuses::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bonuses-treasury_id")
                            .from(Bonuses::Table, Bonuses::TreasuryId)
                            .to(Treasuries::Table, Treasuries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReceiptSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReceiptSequences::Kind)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReceiptSequences::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(ReceiptSequences::Table)
            .columns([ReceiptSequences::Kind, ReceiptSequences::LastValue])
            .values_panic(["SALARY".into(), 0i64.into()])
            .values_panic(["BONUS".into(), 0i64.into()])
            .to_owned();
        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&seed)).await?;

        // 7. Projects
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(pk(Projects::Id))
                    .col(fk_col(Projects::CompanyId))
                    .col(fk_col(Projects::CustomerId))
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(money(Projects::ContractValue))
                    .col(money(Projects::EstimatedBudget))
                    .col(label(Projects::Status))
                    .col(stamp(Projects::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-company_id")
                            .from(Projects::Table, Projects::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-customer_id")
                            .from(Projects::Table, Projects::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectExpenses::Table)
                    .if_not_exists()
                    .col(pk(ProjectExpenses::Id))
                    .col(fk_col(ProjectExpenses::ProjectId))
                    .col(fk_col(ProjectExpenses::CompanyId))
                    .col(ColumnDef::new(ProjectExpenses::ProductId).big_integer())
                    .col(label(ProjectExpenses::ItemType))
                    .col(label(ProjectExpenses::ExpenseType))
                    .col(ColumnDef::new(ProjectExpenses::Description).string_len(500))
                    .col(money(ProjectExpenses::Quantity))
                    .col(money(ProjectExpenses::UnitPrice))
                    .col(money(ProjectExpenses::Total))
                    .col(stamp(ProjectExpenses::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_expenses-project_id")
                            .from(ProjectExpenses::Table, ProjectExpenses::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_expenses-product_id")
                            .from(ProjectExpenses::Table, ProjectExpenses::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 8. External stores
        manager
            .create_table(
                Table::create()
                    .table(ExternalStores::Table)
                    .if_not_exists()
                    .col(pk(ExternalStores::Id))
                    .col(fk_col(ExternalStores::CompanyId))
                    .col(fk_col(ExternalStores::CustomerId).unique_key())
                    .col(ColumnDef::new(ExternalStores::Name).string().not_null())
                    .col(
                        ColumnDef::new(ExternalStores::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ExternalStores::Address).string_len(500))
                    .col(
                        ColumnDef::new(ExternalStores::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(stamp(ExternalStores::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-external_stores-company_id")
                            .from(ExternalStores::Table, ExternalStores::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-external_stores-customer_id")
                            .from(ExternalStores::Table, ExternalStores::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalStoreUsers::Table)
                    .if_not_exists()
                    .col(pk(ExternalStoreUsers::Id))
                    .col(fk_col(ExternalStoreUsers::StoreId))
                    .col(
                        ColumnDef::new(ExternalStoreUsers::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ExternalStoreUsers::FullName).string().not_null())
                    .col(
                        ColumnDef::new(ExternalStoreUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-external_store_users-store_id")
                            .from(ExternalStoreUsers::Table, ExternalStoreUsers::StoreId)
                            .to(ExternalStores::Table, ExternalStores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalStoreProducts::Table)
                    .if_not_exists()
                    .col(pk(ExternalStoreProducts::Id))
                    .col(fk_col(ExternalStoreProducts::StoreId))
                    .col(fk_col(ExternalStoreProducts::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-external_store_products-store_id")
                            .from(ExternalStoreProducts::Table, ExternalStoreProducts::StoreId)
                            .to(ExternalStores::Table, ExternalStores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-external_store_products-product_id")
                            .from(
                                ExternalStoreProducts::Table,
                                ExternalStoreProducts::ProductId,
                            )
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "idx-external_store_products-store_id-product_id-unique",
                ExternalStoreProducts::Table,
                [
                    ExternalStoreProducts::StoreId.into_iden(),
                    ExternalStoreProducts::ProductId.into_iden(),
                ],
            ))
            .await?;

        // 9. Settings
        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::Key)
                            .string_len(100)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settings::Value).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables: [DynIden; 21] = [
            Settings::Table.into_iden(),
            ExternalStoreProducts::Table.into_iden(),
            ExternalStoreUsers::Table.into_iden(),
            ExternalStores::Table.into_iden(),
            ProjectExpenses::Table.into_iden(),
            Projects::Table.into_iden(),
            ReceiptSequences::Table.into_iden(),
            Bonuses::Table.into_iden(),
            SalaryPayments::Table.into_iden(),
            Employees::Table.into_iden(),
            TreasuryMovements::Table.into_iden(),
            Treasuries::Table.into_iden(),
            PartyAccountEntries::Table.into_iden(),
            Prices::Table.into_iden(),
            Stocks::Table.into_iden(),
            Products::Table.into_iden(),
            ProductGroupSuppliers::Table.into_iden(),
            ProductGroups::Table.into_iden(),
            Customers::Table.into_iden(),
            Suppliers::Table.into_iden(),
            Companies::Table.into_iden(),
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
