//! Project repository.
//!
//! Creating a project with a contract value bills the customer through the ledger in
//! the same transaction. ACTUAL material expenses consume the company's own stock and
//! give it back when deleted.

use chrono::Utc;
use mizan_core::DomainError;
use mizan_core::ledger::{EntryType, NewLedgerEntry, PartyRef, ReferenceType};
use mizan_core::project::{
    CreateProjectInput, ExpenseType, NewExpenseInput, ProjectStatus, ProjectSummary,
    affects_stock,
};
use mizan_shared::types::{CompanyId, CustomerId, ProductId, ProjectExpenseId, ProjectId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::ledger::LedgerRepository;
use super::lookup::require;
use super::stock::{decrement, increment};
use crate::entities::{companies, customers, products, project_expenses, projects};
use crate::error::ServiceResult;

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project and, for a positive contract value, debits the customer.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` for an unknown company or
    /// customer, `Forbidden` when the customer belongs to another company, or a
    /// database error.
    pub async fn create_project(
        &self,
        input: CreateProjectInput,
        company_id: CompanyId,
    ) -> ServiceResult<projects::Model> {
        input.validate_input()?;

        let txn = self.db.begin().await?;
        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;
        let customer =
            require::<customers::Entity, _>(&txn, "customer", input.customer_id.0).await?;
        if customer.company_id != company_id.0 {
            return Err(DomainError::Forbidden.into());
        }

        let name = input.name.trim().to_string();
        let project = projects::ActiveModel {
            company_id: Set(company_id.0),
            customer_id: Set(customer.id),
            name: Set(name.clone()),
            contract_value: Set(input.contract_value),
            estimated_budget: Set(input.estimated_budget),
            status: Set(ProjectStatus::Planned.into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if input.bills_customer() {
            LedgerRepository::record_entry(
                &txn,
                NewLedgerEntry {
                    party: PartyRef::customer(CustomerId::new(customer.id)),
                    entry_type: EntryType::Debit,
                    amount: input.contract_value,
                    reference_type: ReferenceType::Project,
                    reference_id: Some(project.id),
                    description: Some(format!("Project: {name}")),
                    transaction_date: Utc::now().date_naive(),
                },
            )
            .await?;
        }

        txn.commit().await?;

        tracing::info!(
            project_id = project.id,
            company_id = %company_id,
            contract_value = %project.contract_value,
            "Project created"
        );
        Ok(project)
    }

    /// Records an expense line. ACTUAL material lines take the quantity out of the
    /// company's own stock.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` for an unknown project or product,
    /// `Forbidden` when the project belongs to another company, `InsufficientStock`
    /// when stock cannot cover the quantity, or a database error.
    pub async fn add_project_expense(
        &self,
        input: NewExpenseInput,
        company_id: CompanyId,
    ) -> ServiceResult<project_expenses::Model> {
        input.validate_input()?;

        let txn = self.db.begin().await?;
        let project = owned_project(&txn, input.project_id, company_id).await?;
        if let Some(product_id) = input.product_id {
            require::<products::Entity, _>(&txn, "product", product_id.0).await?;
        }

        if let (true, Some(product_id)) = (input.affects_stock(), input.product_id) {
            decrement(&txn, company_id, product_id, input.quantity).await?;
        }

        let expense = project_expenses::ActiveModel {
            project_id: Set(project.id),
            company_id: Set(company_id.0),
            product_id: Set(input.product_id.map(|p| p.0)),
            item_type: Set(input.item_type.into()),
            expense_type: Set(input.expense_type.into()),
            description: Set(input.description.clone()),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total: Set(input.total()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            expense_id = expense.id,
            project_id = project.id,
            total = %expense.total,
            "Project expense recorded"
        );
        Ok(expense)
    }

    /// Deletes an expense line, returning stock consumed by an ACTUAL material line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown expense, `Forbidden` when it belongs to another
    /// company, or a database error.
    pub async fn delete_project_expense(
        &self,
        expense_id: ProjectExpenseId,
        company_id: CompanyId,
    ) -> ServiceResult<project_expenses::Model> {
        let txn = self.db.begin().await?;

        let expense =
            require::<project_expenses::Entity, _>(&txn, "project expense", expense_id.0).await?;
        if expense.company_id != company_id.0 {
            return Err(DomainError::Forbidden.into());
        }

        let consumed = affects_stock(expense.item_type.into(), expense.expense_type.into());
        if let (true, Some(product_id)) = (consumed, expense.product_id) {
            increment(&txn, company_id, ProductId::new(product_id), expense.quantity).await?;
        }

        project_expenses::Entity::delete_by_id(expense.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(expense_id = expense.id, restocked = consumed, "Project expense deleted");
        Ok(expense)
    }

    /// Expense lines of a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or a database error.
    pub async fn list_expenses(
        &self,
        project_id: ProjectId,
        company_id: CompanyId,
    ) -> ServiceResult<Vec<project_expenses::Model>> {
        owned_project(&self.db, project_id, company_id).await?;
        Ok(project_expenses::Entity::find()
            .filter(project_expenses::Column::ProjectId.eq(project_id.0))
            .order_by_asc(project_expenses::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Estimated against actual cost of a project.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or a database error.
    pub async fn project_summary(
        &self,
        project_id: ProjectId,
        company_id: CompanyId,
    ) -> ServiceResult<ProjectSummary> {
        let project = owned_project(&self.db, project_id, company_id).await?;
        let lines = self.list_expenses(project_id, company_id).await?;

        Ok(ProjectSummary::build(
            project.contract_value,
            project.estimated_budget,
            lines
                .into_iter()
                .map(|line| (ExpenseType::from(line.expense_type), line.total)),
        ))
    }

    /// Moves a project to a new status.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a transition out of a finished state, plus the errors of
    /// [`ProjectRepository::project_summary`].
    pub async fn update_project_status(
        &self,
        project_id: ProjectId,
        company_id: CompanyId,
        status: ProjectStatus,
    ) -> ServiceResult<projects::Model> {
        let txn = self.db.begin().await?;

        let project = owned_project(&txn, project_id, company_id).await?;
        let current = ProjectStatus::from(project.status);
        let next = current.transition_to(status)?;

        let mut active: projects::ActiveModel = project.into();
        active.status = Set(next.into());
        let project = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            project_id = project.id,
            from = ?current,
            to = ?next,
            "Project status changed"
        );
        Ok(project)
    }
}

async fn owned_project<C: ConnectionTrait>(
    conn: &C,
    project_id: ProjectId,
    company_id: CompanyId,
) -> ServiceResult<projects::Model> {
    let project = require::<projects::Entity, _>(conn, "project", project_id.0).await?;
    if project.company_id != company_id.0 {
        return Err(DomainError::Forbidden.into());
    }
    Ok(project)
}
