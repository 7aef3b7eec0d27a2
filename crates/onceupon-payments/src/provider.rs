//! The entitlement provider seam.

use crate::error::Result;
use crate::types::{CustomerInfo, Offerings, PurchaseResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the customer-info broadcast channel.
pub const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// A source of offerings, purchases and entitlements.
///
/// Implementations push every customer-info change they observe to
/// subscribers, so the profile can follow renewals and expirations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the offerings currently for sale.
    async fn list_offerings(&self) -> Result<Offerings>;

    /// Buy the package with this identifier from the current offering.
    async fn purchase(&self, package_id: &str) -> Result<PurchaseResult>;

    /// Ask the store to re-grant anything the user already bought.
    async fn restore(&self) -> Result<CustomerInfo>;

    /// Fetch the latest customer info.
    async fn customer_info(&self) -> Result<CustomerInfo>;

    /// Receive customer info whenever it changes.
    fn subscribe(&self) -> broadcast::Receiver<CustomerInfo>;

    /// Forget cached subscription state.
    async fn reset(&self) -> Result<()>;
}

#[async_trait]
impl<T: PaymentProvider + ?Sized> PaymentProvider for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn list_offerings(&self) -> Result<Offerings> {
        (**self).list_offerings().await
    }

    async fn purchase(&self, package_id: &str) -> Result<PurchaseResult> {
        (**self).purchase(package_id).await
    }

    async fn restore(&self) -> Result<CustomerInfo> {
        (**self).restore().await
    }

    async fn customer_info(&self) -> Result<CustomerInfo> {
        (**self).customer_info().await
    }

    fn subscribe(&self) -> broadcast::Receiver<CustomerInfo> {
        (**self).subscribe()
    }

    async fn reset(&self) -> Result<()> {
        (**self).reset().await
    }
}

/// Which provider implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderMode {
    /// In-process simulator, no store account needed.
    #[default]
    Simulated,
    /// The platform store through the purchases SDK.
    Live,
}
