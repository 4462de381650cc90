//! External store repository.
//!
//! An external store is a reseller outside the company hierarchy. Each store is backed
//! by its own customer row, so its account lives in the normal party ledger.

use chrono::Utc;
use mizan_core::DomainError;
use mizan_core::ledger::{DateRange, PartyRef, Statement};
use mizan_core::store::{CreateExternalStoreInput, NewStoreUserInput};
use mizan_shared::types::{CompanyId, CustomerId, ExternalStoreId, ProductId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use super::ledger::LedgerRepository;
use super::lookup::require;
use crate::entities::{
    companies, customers, external_store_products, external_store_users, external_stores,
    products,
};
use crate::error::ServiceResult;

/// A newly created store and the customer row that carries its account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedStore {
    /// Store row.
    pub store: external_stores::Model,
    /// Backing customer row.
    pub customer: customers::Model,
}

/// External store repository.
#[derive(Debug, Clone)]
pub struct ExternalStoreRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
}

impl ExternalStoreRepository {
    /// Creates a new external store repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a store together with its backing customer.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` for an unknown company,
    /// `Conflict` for a duplicate code, or a database error.
    pub async fn create_external_store(
        &self,
        input: CreateExternalStoreInput,
        company_id: CompanyId,
    ) -> ServiceResult<CreatedStore> {
        input.validate_input()?;
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();

        let txn = self.db.begin().await?;
        require::<companies::Entity, _>(&txn, "company", company_id.0).await?;

        let taken = external_stores::Entity::find()
            .filter(external_stores::Column::Code.eq(code.as_str()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(
                DomainError::conflict(format!("store code '{code}' is already in use")).into(),
            );
        }

        let customer = customers::ActiveModel {
            company_id: Set(company_id.0),
            name: Set(name.clone()),
            phone: Set(input.phone.clone()),
            address: Set(input.address.clone()),
            linked_company_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let store = external_stores::ActiveModel {
            company_id: Set(company_id.0),
            customer_id: Set(customer.id),
            name: Set(name),
            code: Set(code),
            address: Set(input.address.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            store_id = store.id,
            customer_id = customer.id,
            code = %store.code,
            "External store created"
        );
        Ok(CreatedStore { store, customer })
    }

    /// Adds a login for a store.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` for an unknown store, `Conflict`
    /// for a taken username, or a database error.
    pub async fn add_store_user(
        &self,
        store_id: ExternalStoreId,
        input: NewStoreUserInput,
    ) -> ServiceResult<external_store_users::Model> {
        let username = input.validate_input()?;

        let txn = self.db.begin().await?;
        require::<external_stores::Entity, _>(&txn, "external store", store_id.0).await?;

        let taken = external_store_users::Entity::find()
            .filter(external_store_users::Column::Username.eq(username.as_str()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(
                DomainError::conflict(format!("username '{username}' is already taken")).into(),
            );
        }

        let user = external_store_users::ActiveModel {
            store_id: Set(store_id.0),
            username: Set(username),
            full_name: Set(input.full_name.trim().to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(store_id = %store_id, user_id = user.id, "Store user added");
        Ok(user)
    }

    /// Makes products available to a store. Already assigned products are skipped.
    ///
    /// Returns the number of new assignments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown store or product, or a database error.
    pub async fn assign_products(
        &self,
        store_id: ExternalStoreId,
        product_ids: &[ProductId],
    ) -> ServiceResult<usize> {
        let txn = self.db.begin().await?;
        require::<external_stores::Entity, _>(&txn, "external store", store_id.0).await?;

        let mut existing: Vec<i64> = external_store_products::Entity::find()
            .filter(external_store_products::Column::StoreId.eq(store_id.0))
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| row.product_id)
            .collect();

        let mut added = 0;
        for &product_id in product_ids {
            if existing.contains(&product_id.0) {
                continue;
            }
            require::<products::Entity, _>(&txn, "product", product_id.0).await?;
            external_store_products::ActiveModel {
                store_id: Set(store_id.0),
                product_id: Set(product_id.0),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            existing.push(product_id.0);
            added += 1;
        }

        txn.commit().await?;

        tracing::info!(store_id = %store_id, added, "Products assigned to store");
        Ok(added)
    }

    /// Removes a product from a store. Returns `false` if it was not assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn unassign_product(
        &self,
        store_id: ExternalStoreId,
        product_id: ProductId,
    ) -> ServiceResult<bool> {
        let result = external_store_products::Entity::delete_many()
            .filter(external_store_products::Column::StoreId.eq(store_id.0))
            .filter(external_store_products::Column::ProductId.eq(product_id.0))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Products assigned to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn assigned_products(
        &self,
        store_id: ExternalStoreId,
    ) -> ServiceResult<Vec<ProductId>> {
        Ok(external_store_products::Entity::find()
            .filter(external_store_products::Column::StoreId.eq(store_id.0))
            .order_by_asc(external_store_products::Column::ProductId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| ProductId::new(row.product_id))
            .collect())
    }

    /// Account statement of a store, read from its backing customer's ledger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown store, or a database error.
    pub async fn statement(
        &self,
        store_id: ExternalStoreId,
        range: Option<DateRange>,
    ) -> ServiceResult<Statement> {
        let store =
            require::<external_stores::Entity, _>(&self.db, "external store", store_id.0).await?;
        self.ledger
            .get_statement(PartyRef::customer(CustomerId::new(store.customer_id)), range)
            .await
    }
}
