//! In-process store with failure injection.

use crate::error::{Error, Result};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A write seen by a [`MemoryStore`], in the order it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

/// Key-value store held in memory.
///
/// Reads and writes can be made to fail, and writes can be delayed, so
/// callers can exercise their recovery and ordering paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    history: Mutex<Vec<WriteOp>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` already stored under `key`.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        lock(&self.values).insert(key.into(), value.into());
        self
    }

    /// Sleep this long before applying each write.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value under `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// Every successful write so far.
    pub fn history(&self) -> Vec<WriteOp> {
        lock(&self.history).clone()
    }

    async fn before_write(&self) -> Result<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("reads disabled".into()));
        }
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.before_write().await?;
        lock(&self.values).insert(key.to_string(), value.to_string());
        lock(&self.history).push(WriteOp::Set {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.before_write().await?;
        lock(&self.values).remove(key);
        lock(&self.history).push(WriteOp::Remove { key: key.to_string() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_history_records_writes_in_order() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        store.remove("a").await.unwrap();

        assert_eq!(
            store.history(),
            vec![
                WriteOp::Set { key: "a".into(), value: "1".into() },
                WriteOp::Set { key: "a".into(), value: "2".into() },
                WriteOp::Remove { key: "a".into() },
            ]
        );
        assert_eq!(store.peek("a"), None);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new().with_value("user", "{}");
        store.fail_reads(true);
        assert!(matches!(store.get("user").await, Err(Error::Unavailable(_))));

        store.fail_reads(false);
        store.fail_writes(true);
        assert!(store.set("user", "x").await.is_err());
        // failed writes leave the value and history alone
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("{}"));
        assert!(store.history().is_empty());
    }
}
