//! Company repository.
//!
//! Creating a branch also books the branch as a customer of its parent (the
//! "shadow customer"), so goods the parent hands over can be invoiced through the
//! normal ledger. That secondary insert is best effort.

use chrono::Utc;
use mizan_core::DomainError;
use mizan_core::company::{
    CompanyDependents, CompanyState, CreateCompanyInput, ParentInfo, UpdateCompanyInput,
    apply_update, check_parent, validate_create,
};
use mizan_shared::types::CompanyId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait, sea_query::Expr,
};

use super::lookup::require;
use crate::entities::{
    companies, customers, employees, external_stores, prices, projects, stocks, treasuries,
};
use crate::error::ServiceResult;

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a company by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find(&self, company_id: CompanyId) -> ServiceResult<companies::Model> {
        require::<companies::Entity, _>(&self.db, "company", company_id.0).await
    }

    /// Creates a parent, branch or standalone company.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input or a parent that is not flagged as one,
    /// `NotFound` for an unknown parent, `Conflict` for a duplicate code, or a
    /// database error.
    pub async fn create_company(
        &self,
        input: CreateCompanyInput,
    ) -> ServiceResult<companies::Model> {
        validate_create(&input)?;

        let txn = self.db.begin().await?;
        ensure_code_free(&txn, input.code.trim(), None).await?;
        if let Some(parent_id) = input.parent_id {
            check_parent(parent_id, parent_info(&txn, parent_id).await?)?;
        }

        let company = companies::ActiveModel {
            name: Set(input.name.trim().to_string()),
            code: Set(input.code.trim().to_string()),
            is_parent: Set(input.is_parent),
            parent_id: Set(input.parent_id.map(|p| p.0)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            company_id = company.id,
            code = %company.code,
            parent_id = ?company.parent_id,
            "Company created"
        );

        if let Some(parent_id) = company.parent_id {
            if let Err(err) = self.create_shadow_customer(&company, parent_id).await {
                tracing::warn!(
                    company_id = company.id,
                    parent_id,
                    error = %err,
                    "Failed to create shadow customer for branch"
                );
            }
        }

        Ok(company)
    }

    async fn create_shadow_customer(
        &self,
        branch: &companies::Model,
        parent_id: i64,
    ) -> ServiceResult<customers::Model> {
        let customer = customers::ActiveModel {
            company_id: Set(parent_id),
            name: Set(branch.name.clone()),
            phone: Set(None),
            address: Set(None),
            linked_company_id: Set(Some(branch.id)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(
            customer_id = customer.id,
            branch_id = branch.id,
            "Shadow customer created"
        );
        Ok(customer)
    }

    /// The customer row that represents `branch_id` inside its parent, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn shadow_customer(
        &self,
        branch_id: CompanyId,
    ) -> ServiceResult<Option<customers::Model>> {
        Ok(customers::Entity::find()
            .filter(customers::Column::LinkedCompanyId.eq(branch_id.0))
            .one(&self.db)
            .await?)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown company or parent, `Validation` for
    /// self-reference or inconsistent flags, `Conflict` for a duplicate code or a
    /// parent with branches losing its flag, or a database error.
    pub async fn update_company(
        &self,
        company_id: CompanyId,
        input: UpdateCompanyInput,
    ) -> ServiceResult<companies::Model> {
        let txn = self.db.begin().await?;

        let company = require::<companies::Entity, _>(&txn, "company", company_id.0).await?;
        let state = CompanyState {
            id: company_id,
            is_parent: company.is_parent,
            parent_id: company.parent_id.map(CompanyId::new),
            branch_count: count_branches(&txn, company_id).await?,
        };
        let (is_parent, parent_id) = apply_update(state, &input)?;

        if let Some(parent_id) = parent_id.filter(|p| Some(p.0) != company.parent_id) {
            check_parent(parent_id, parent_info(&txn, parent_id).await?)?;
        }

        let mut active: companies::ActiveModel = company.into();
        if let Some(name) = &input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(code) = &input.code {
            ensure_code_free(&txn, code.trim(), Some(company_id)).await?;
            active.code = Set(code.trim().to_string());
        }
        active.is_parent = Set(is_parent);
        active.parent_id = Set(parent_id.map(|p| p.0));
        let company = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(company_id = company.id, "Company updated");
        Ok(company)
    }

    /// Deletes a company that nothing depends on.
    ///
    /// A shadow customer representing the company inside its parent stays, unlinked.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Conflict` naming the first kind of dependent row, or a
    /// database error.
    pub async fn delete_company(&self, company_id: CompanyId) -> ServiceResult<()> {
        let txn = self.db.begin().await?;

        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;
        dependents(&txn, company_id).await?.ensure_none()?;

        customers::Entity::update_many()
            .col_expr(
                customers::Column::LinkedCompanyId,
                Expr::value(Option::<i64>::None),
            )
            .filter(customers::Column::LinkedCompanyId.eq(company_id.0))
            .exec(&txn)
            .await?;
        companies::Entity::delete_by_id(company_id.0)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(company_id = %company_id, "Company deleted");
        Ok(())
    }
}

async fn parent_info<C: ConnectionTrait>(
    conn: &C,
    parent_id: CompanyId,
) -> ServiceResult<Option<ParentInfo>> {
    Ok(companies::Entity::find_by_id(parent_id.0)
        .one(conn)
        .await?
        .map(|row| ParentInfo {
            id: CompanyId::new(row.id),
            is_parent: row.is_parent,
        }))
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    except: Option<CompanyId>,
) -> ServiceResult<()> {
    let mut query = companies::Entity::find().filter(companies::Column::Code.eq(code));
    if let Some(id) = except {
        query = query.filter(companies::Column::Id.ne(id.0));
    }
    if query.count(conn).await? > 0 {
        return Err(
            DomainError::conflict(format!("company code '{code}' is already in use")).into(),
        );
    }
    Ok(())
}

async fn count_branches<C: ConnectionTrait>(conn: &C, company_id: CompanyId) -> ServiceResult<u64> {
    Ok(companies::Entity::find()
        .filter(companies::Column::ParentId.eq(company_id.0))
        .count(conn)
        .await?)
}

async fn dependents<C: ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
) -> ServiceResult<CompanyDependents> {
    let id = company_id.0;
    let stock_rows = stocks::Entity::find()
        .filter(stocks::Column::CompanyId.eq(id))
        .count(conn)
        .await?;
    let price_rows = prices::Entity::find()
        .filter(prices::Column::CompanyId.eq(id))
        .count(conn)
        .await?;

    Ok(CompanyDependents {
        branches: count_branches(conn, company_id).await?,
        customers: customers::Entity::find()
            .filter(customers::Column::CompanyId.eq(id))
            .count(conn)
            .await?,
        employees: employees::Entity::find()
            .filter(employees::Column::CompanyId.eq(id))
            .count(conn)
            .await?,
        inventory_rows: stock_rows + price_rows,
        projects: projects::Entity::find()
            .filter(projects::Column::CompanyId.eq(id))
            .count(conn)
            .await?,
        treasuries: treasuries::Entity::find()
            .filter(treasuries::Column::CompanyId.eq(id))
            .count(conn)
            .await?,
        stores: external_stores::Entity::find()
            .filter(external_stores::Column::CompanyId.eq(id))
            .count(conn)
            .await?,
    })
}
