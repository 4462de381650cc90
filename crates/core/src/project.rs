//! Project and project expense rules.
//!
//! An ACTUAL expense for a MATERIAL line consumes the company's stock when it is added
//! and gives it back when it is deleted. Estimated lines and services never touch stock.

use mizan_shared::types::{CustomerId, ProductId, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, non_negative, not_blank, positive};

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Not started.
    Planned,
    /// Work under way.
    InProgress,
    /// Finished.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// True once the project can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks a status transition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] when leaving a terminal state or moving back to
    /// PLANNED from IN_PROGRESS.
    pub fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        let allowed = match self {
            _ if self == next => true,
            Self::Planned => true,
            Self::InProgress => next != Self::Planned,
            Self::Completed | Self::Cancelled => false,
        };
        if allowed {
            Ok(next)
        } else {
            Err(DomainError::conflict(format!(
                "project cannot move from {self:?} to {next:?}"
            )))
        }
    }
}

/// Expense line kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    /// Stocked product.
    Material,
    /// Labour or other service.
    Service,
}

/// Whether a line is planned or incurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseType {
    /// Budget line.
    Estimated,
    /// Incurred cost.
    Actual,
}

/// True when a line of this kind moves stock.
#[must_use]
pub const fn affects_stock(item_type: ItemType, expense_type: ExpenseType) -> bool {
    matches!(
        (item_type, expense_type),
        (ItemType::Material, ExpenseType::Actual)
    )
}

/// `quantity * unit_price`.
#[must_use]
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateProjectInput {
    /// Customer billed for the project.
    pub customer_id: CustomerId,
    /// Display name.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    /// Agreed price. Zero means nothing is billed yet.
    #[validate(custom(function = "non_negative"))]
    pub contract_value: Decimal,
    /// Expected cost.
    #[validate(custom(function = "non_negative"))]
    pub estimated_budget: Decimal,
}

impl CreateProjectInput {
    /// Validates field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for a blank name or negative amounts.
    pub fn validate_input(&self) -> Result<(), DomainError> {
        check(self)
    }

    /// True if creating the project bills the customer.
    #[must_use]
    pub fn bills_customer(&self) -> bool {
        self.contract_value > Decimal::ZERO
    }
}

/// Input for adding an expense line to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewExpenseInput {
    /// Project the line belongs to.
    pub project_id: ProjectId,
    /// Product consumed; required for MATERIAL lines.
    pub product_id: Option<ProductId>,
    /// MATERIAL or SERVICE.
    pub item_type: ItemType,
    /// ESTIMATED or ACTUAL.
    pub expense_type: ExpenseType,
    /// Free text.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Quantity, in boxes for materials.
    #[validate(custom(function = "positive"))]
    pub quantity: Decimal,
    /// Price per unit.
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,
}

impl NewExpenseInput {
    /// Validates field constraints and the product requirement for materials.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for bad quantities or a MATERIAL line without
    /// a product.
    pub fn validate_input(&self) -> Result<(), DomainError> {
        check(self)?;
        if self.item_type == ItemType::Material && self.product_id.is_none() {
            return Err(DomainError::validation(
                "product_id: required for material expenses",
            ));
        }
        Ok(())
    }

    /// Line total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        line_total(self.quantity, self.unit_price)
    }

    /// True if adding this line decrements stock.
    #[must_use]
    pub fn affects_stock(&self) -> bool {
        affects_stock(self.item_type, self.expense_type)
    }
}

/// Cost position of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Agreed price.
    pub contract_value: Decimal,
    /// Expected cost as entered on the project.
    pub estimated_budget: Decimal,
    /// Sum of ESTIMATED lines.
    pub estimated_total: Decimal,
    /// Sum of ACTUAL lines.
    pub actual_total: Decimal,
    /// `contract_value - actual_total`.
    pub margin: Decimal,
    /// `estimated_budget - actual_total`.
    pub budget_remaining: Decimal,
}

impl ProjectSummary {
    /// Aggregates expense lines given as `(expense_type, total)` pairs.
    #[must_use]
    pub fn build(
        contract_value: Decimal,
        estimated_budget: Decimal,
        lines: impl IntoIterator<Item = (ExpenseType, Decimal)>,
    ) -> Self {
        let (estimated_total, actual_total) = lines.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(est, act), (kind, total)| match kind {
                ExpenseType::Estimated => (est + total, act),
                ExpenseType::Actual => (est, act + total),
            },
        );
        Self {
            contract_value,
            estimated_budget,
            estimated_total,
            actual_total,
            margin: contract_value - actual_total,
            budget_remaining: estimated_budget - actual_total,
        }
    }
}
