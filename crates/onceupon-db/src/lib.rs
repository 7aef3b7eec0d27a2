//! Once Upon Us DB - key-value persistence for the user record
//!
//! Provides:
//! - [`KeyValueStore`], the asynchronous text store the session writes through
//! - [`NativeStore`], an embedded `native_db` database (file or in-memory)
//! - [`MemoryStore`], an in-process store with failure injection
//! - [`ProfileRepository`], which keeps the profile as JSON under one key

mod error;
mod memory;
mod models;
mod repository;
mod store;

pub use error::{Error, Result};
pub use memory::{MemoryStore, WriteOp};
pub use models::StoredValue;
pub use repository::{ProfileRepository, PROFILE_KEY};
pub use store::{KeyValueStore, NativeStore};
