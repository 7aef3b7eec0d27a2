//! Key-value model for database storage.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// A text value stored under a string key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredValue {
    /// Primary key.
    #[primary_key]
    pub key: String,
    /// Stored text.
    pub value: String,
    /// Unix timestamp (seconds) of the last write.
    pub updated_at: i64,
}
