//! Once Upon Us Session - the profile store runtime
//!
//! Ties the pure reducers in `onceupon-core` to storage and payments:
//! - [`ProfileStore`] owns the user record, reduces [`Msg`]s and runs the
//!   resulting commands, writing through one ordered background writer
//! - [`ProfileStore::register_for_event`] prices and records event seats
//! - [`SubscriptionFlow`] runs paywall purchases and restores
//! - [`SessionConfig`] is read from RON
//!
//! ## Example
//!
//! ```rust,no_run
//! use onceupon_core::SystemClock;
//! use onceupon_session::{select_provider, ProfileStore, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> onceupon_session::Result<()> {
//! let config = SessionConfig::load("session.ron")?.with_env_overrides();
//! let provider = select_provider(&config.payments, None).await?;
//! let mut store = ProfileStore::open(&config, provider, Arc::new(SystemClock)).await?;
//! store.check_and_reset_monthly_status().await;
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! [`Msg`]: onceupon_core::Msg

mod config;
mod error;
mod providers;
mod registration;
mod store;
mod subscription;
mod writer;

pub use config::{PaymentsConfig, SessionConfig, StorageConfig, API_KEY_ENV};
pub use error::{Error, Result};
pub use providers::{select_provider, simulated_provider};
pub use registration::Registration;
pub use store::ProfileStore;
pub use subscription::{FlowState, PurchaseOutcome, SubscriptionFlow};
