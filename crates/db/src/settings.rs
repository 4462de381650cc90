//! Runtime business settings.
//!
//! Workflows read tunables such as the branch profit margin through the
//! [`SettingsLookup`] capability instead of global state, so tests can swap in a
//! [`StaticSettings`] map.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use mizan_shared::BusinessDefaults;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};

use crate::entities::settings;
use crate::error::ServiceResult;

/// Key of the markup applied to a parent's price for a branch.
pub const PROFIT_MARGIN_KEY: &str = "profit_margin_percent";

/// Key of the stock level at or below which a product is reported as low.
pub const LOW_STOCK_THRESHOLD_KEY: &str = "low_stock_threshold";

/// Key/value settings source.
#[async_trait]
pub trait SettingsLookup: Send + Sync {
    /// Raw value for `key`, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    async fn get(&self, key: &str) -> ServiceResult<Option<String>>;
}

/// Reads `key` as a decimal, falling back when it is unset or malformed.
///
/// # Errors
///
/// Returns an error if the backing store cannot be read.
pub async fn decimal_setting(
    lookup: &dyn SettingsLookup,
    key: &str,
    fallback: Decimal,
) -> ServiceResult<Decimal> {
    let Some(raw) = lookup.get(key).await? else {
        return Ok(fallback);
    };
    match Decimal::from_str(raw.trim()) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, "Ignoring malformed setting");
            Ok(fallback)
        }
    }
}

/// Profit margin percentage for branch price fallback.
///
/// # Errors
///
/// Returns an error if the backing store cannot be read.
pub async fn profit_margin_percent(
    lookup: &dyn SettingsLookup,
    defaults: &BusinessDefaults,
) -> ServiceResult<Decimal> {
    decimal_setting(lookup, PROFIT_MARGIN_KEY, defaults.profit_margin_percent).await
}

/// Low-stock threshold in boxes.
///
/// # Errors
///
/// Returns an error if the backing store cannot be read.
pub async fn low_stock_threshold(
    lookup: &dyn SettingsLookup,
    defaults: &BusinessDefaults,
) -> ServiceResult<Decimal> {
    decimal_setting(lookup, LOW_STOCK_THRESHOLD_KEY, defaults.low_stock_threshold).await
}

/// Settings backed by the `settings` table.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts or replaces a setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn set(&self, key: &str, value: &str) -> ServiceResult<()> {
        let row = settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };
        settings::Entity::insert(row)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_column(settings::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsLookup for SettingsRepository {
    async fn get(&self, key: &str) -> ServiceResult<Option<String>> {
        let row = settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|r| r.value))
    }
}

/// In-memory settings.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, String>,
}

impl StaticSettings {
    /// Empty settings; every typed accessor falls back to its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings pre-filled from configured defaults.
    #[must_use]
    pub fn from_defaults(defaults: &BusinessDefaults) -> Self {
        Self::new()
            .with(PROFIT_MARGIN_KEY, defaults.profit_margin_percent.to_string())
            .with(LOW_STOCK_THRESHOLD_KEY, defaults.low_stock_threshold.to_string())
    }

    /// Adds or replaces one value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl SettingsLookup for StaticSettings {
    async fn get(&self, key: &str) -> ServiceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }
}
