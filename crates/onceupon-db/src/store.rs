//! Key-value stores.

use crate::error::{Error, Result};
use crate::models::*;
use async_trait::async_trait;
use native_db::*;
use std::path::Path;
use std::sync::{Arc, LazyLock};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models
        .define::<StoredValue>()
        .expect("StoredValue model definition is valid");
    models
});

/// Asynchronous text store addressed by string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Embedded database store.
pub struct NativeStore {
    pub(crate) db: Database<'static>,
}

impl NativeStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        tracing::debug!(path = %path.as_ref().display(), "opened native store");
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    fn read(&self, key: &str) -> Result<Option<StoredValue>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredValue> = r.get().primary(key.to_string())?;
        Ok(stored)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let stored = StoredValue {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: chrono::Utc::now().timestamp(),
        };
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredValue> = rw.get().primary(key.to_string())?;
        if let Some(s) = stored {
            rw.remove(s)?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Unix timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.read(key)?.map(|s| s.updated_at))
    }
}

// redb transactions are synchronous and short; they run inline.
#[async_trait]
impl KeyValueStore for NativeStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read(key)?.map(|s| s.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write(key, value)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delete(key)
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(e: native_db::db_type::Error) -> Self {
        Error::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_in_memory_set_get_remove() {
        let store = NativeStore::in_memory().unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);

        store.set("user", r#"{"name":"Ada"}"#).await.unwrap();
        assert_eq!(
            store.get("user").await.unwrap().as_deref(),
            Some(r#"{"name":"Ada"}"#)
        );

        store.set("user", r#"{"name":"Grace"}"#).await.unwrap();
        assert_eq!(
            store.get("user").await.unwrap().as_deref(),
            Some(r#"{"name":"Grace"}"#)
        );

        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);
        // removing twice is fine
        store.remove("user").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("onceupon.db");

        {
            let store = NativeStore::open(&path).unwrap();
            store.set("user", "hello").await.unwrap();
            assert!(store.updated_at("user").unwrap().is_some());
        }

        let store = NativeStore::open(&path).unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_through_trait_object() {
        let store: Arc<dyn KeyValueStore> = Arc::new(NativeStore::in_memory().unwrap());
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
