//! External store inputs.
//!
//! A store is backed by a shadow customer so that its sales and payments post to the
//! ordinary customer ledger.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::validation::{check, not_blank};

/// Input for creating an external store with its customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateExternalStoreInput {
    /// Store name; also used for the customer.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    /// Globally unique store code.
    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub code: String,
    /// Contact phone, copied to the customer.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Address, copied to the customer.
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

impl CreateExternalStoreInput {
    /// Validates field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for blank or overlong fields.
    pub fn validate_input(&self) -> Result<(), DomainError> {
        check(self)
    }
}

/// Input for a store login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewStoreUserInput {
    /// Globally unique login name.
    #[validate(custom(function = "not_blank"), length(min = 3, max = 50))]
    pub username: String,
    /// Display name.
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub full_name: String,
}

impl NewStoreUserInput {
    /// Validates field constraints and returns the normalised username.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for blank or out-of-range fields.
    pub fn validate_input(&self) -> Result<String, DomainError> {
        check(self)?;
        Ok(self.username.trim().to_lowercase())
    }
}
