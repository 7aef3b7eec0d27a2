//! RON configuration for a session

use crate::error::{Error, Result};
use onceupon_core::{CheckInCode, Price};
use onceupon_db::{KeyValueStore, NativeStore};
use onceupon_payments::{ProviderMode, PREMIUM_ENTITLEMENT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that overrides `payments.api_key`
pub const API_KEY_ENV: &str = "ONCEUPON_PAYMENTS_API_KEY";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Where the profile is stored
    #[serde(default)]
    pub storage: StorageConfig,
    /// Entitlement provider settings
    #[serde(default)]
    pub payments: PaymentsConfig,
    /// Words handed out as check-in codes
    #[serde(default = "default_check_in_codes")]
    pub check_in_codes: Vec<CheckInCode>,
    /// Seed for check-in code selection; the clock is used when absent
    #[serde(default)]
    pub check_in_seed: Option<u64>,
    /// List price of a club event
    #[serde(default = "default_event_price")]
    pub event_price: Price,
}

fn default_check_in_codes() -> Vec<CheckInCode> {
    CheckInCode::ALL.to_vec()
}

fn default_event_price() -> Price {
    Price::dollars(25)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            payments: PaymentsConfig::default(),
            check_in_codes: default_check_in_codes(),
            check_in_seed: None,
            event_price: default_event_price(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// Parse configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        let config: SessionConfig =
            ron::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory storage with the simulated provider
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::InMemory,
            ..Self::default()
        }
    }

    /// Take the API key from the environment when it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.payments.api_key = Some(key);
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.check_in_codes.is_empty() {
            return Err(Error::Config("check_in_codes must not be empty".into()));
        }
        if self.check_in_codes.contains(&CheckInCode::Unknown) {
            return Err(Error::Config("check_in_codes contains an unknown code".into()));
        }
        if self.payments.entitlement.is_empty() {
            return Err(Error::Config("payments.entitlement must not be empty".into()));
        }
        if self.payments.simulated_failure_percent > 100 {
            return Err(Error::Config(
                "payments.simulated_failure_percent must be at most 100".into(),
            ));
        }
        Ok(())
    }
}

/// Storage backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum StorageConfig {
    /// Embedded database file
    File(PathBuf),
    /// Embedded database kept in memory; nothing survives the process
    InMemory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File(PathBuf::from("onceupon.db"))
    }
}

impl StorageConfig {
    /// Open the configured store
    pub fn open(&self) -> Result<Arc<dyn KeyValueStore>> {
        let store = match self {
            StorageConfig::File(path) => NativeStore::open(path)?,
            StorageConfig::InMemory => NativeStore::in_memory()?,
        };
        Ok(Arc::new(store))
    }
}

/// Entitlement provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentsConfig {
    /// Provider implementation
    #[serde(default)]
    pub mode: ProviderMode,
    /// Store API key, required in live mode
    #[serde(default)]
    pub api_key: Option<String>,
    /// Entitlement that grants premium
    #[serde(default = "default_entitlement")]
    pub entitlement: String,
    /// Artificial delay for the simulated provider, in milliseconds
    #[serde(default)]
    pub simulated_latency_ms: u64,
    /// Share of simulated purchases that fail
    #[serde(default)]
    pub simulated_failure_percent: u8,
}

fn default_entitlement() -> String {
    PREMIUM_ENTITLEMENT.to_string()
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            api_key: None,
            entitlement: default_entitlement(),
            simulated_latency_ms: 0,
            simulated_failure_percent: 0,
        }
    }
}
