//! Configuration for an OpenBroker ledger instance.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, OpenbrokerError, Result};

/// Runtime configuration shared by the store, the ledger and the
/// order lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Asset code of the base settlement currency (e.g., "TRY").
    pub cash_asset: String,
    /// Maximum wait for an exclusive row lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Shortest accepted asset code on new orders.
    pub min_asset_name_len: usize,
    /// Longest accepted asset code on new orders.
    pub max_asset_name_len: usize,
    /// Upper bound on the page size of listings.
    pub max_page_size: usize,
}

impl BrokerConfig {
    /// Parse a JSON document, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OpenbrokerError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cash_asset.trim().is_empty() {
            return Err(OpenbrokerError::Configuration(
                "cash_asset must not be blank".to_string(),
            ));
        }
        if self.min_asset_name_len == 0 || self.min_asset_name_len > self.max_asset_name_len {
            return Err(OpenbrokerError::Configuration(format!(
                "invalid asset name bounds {}..={}",
                self.min_asset_name_len, self.max_asset_name_len
            )));
        }
        if self.lock_timeout_ms == 0 {
            return Err(OpenbrokerError::Configuration(
                "lock_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    #[must_use]
    pub fn with_cash_asset(mut self, cash_asset: impl Into<String>) -> Self {
        self.cash_asset = cash_asset.into();
        self
    }

    #[must_use]
    pub fn with_lock_timeout_ms(mut self, lock_timeout_ms: u64) -> Self {
        self.lock_timeout_ms = lock_timeout_ms;
        self
    }

    #[must_use]
    pub fn is_cash(&self, asset_name: &str) -> bool {
        self.cash_asset == asset_name
    }

    /// The fixed price every cash-asset order must carry.
    #[must_use]
    pub fn cash_price() -> Decimal {
        Decimal::ONE
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            cash_asset: constants::DEFAULT_CASH_ASSET.to_string(),
            lock_timeout_ms: constants::DEFAULT_LOCK_TIMEOUT_MS,
            min_asset_name_len: constants::MIN_ASSET_NAME_LEN,
            max_asset_name_len: constants::MAX_ASSET_NAME_LEN,
            max_page_size: constants::MAX_PAGE_SIZE,
        }
    }
}
