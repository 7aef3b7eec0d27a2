//! Shapes returned by the platform purchases SDK.
//!
//! These mirror the SDK's JSON payloads field for field; [`LiveProvider`]
//! converts them into the crate's own types.
//!
//! [`LiveProvider`]: crate::LiveProvider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub identifier: String,
    pub title: String,
    pub description: String,
    /// Price in major currency units
    pub price: f64,
    pub price_string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackage {
    pub identifier: String,
    pub package_type: String,
    pub product: RawProduct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffering {
    pub identifier: String,
    #[serde(default)]
    pub server_description: String,
    pub available_packages: Vec<RawPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOfferings {
    pub current: Option<RawOffering>,
    #[serde(default)]
    pub all: HashMap<String, RawOffering>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntitlementInfo {
    pub identifier: String,
    pub is_active: bool,
    pub product_identifier: String,
    /// ISO-8601 timestamp
    pub latest_purchase_date: Option<String>,
    /// ISO-8601 timestamp, absent for lifetime purchases
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntitlements {
    #[serde(default)]
    pub active: HashMap<String, RawEntitlementInfo>,
    #[serde(default)]
    pub all: HashMap<String, RawEntitlementInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomerInfo {
    pub original_app_user_id: String,
    #[serde(default)]
    pub entitlements: RawEntitlements,
    #[serde(default)]
    pub active_subscriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPurchase {
    pub customer_info: RawCustomerInfo,
    pub product_identifier: String,
}

/// SDK error codes the provider distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SdkErrorCode {
    PurchaseCancelled,
    ProductAlreadyPurchased,
    Network,
    Store,
    Configuration,
    #[serde(other)]
    Unknown,
}

/// Error thrown by the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkError {
    pub code: SdkErrorCode,
    pub message: String,
    #[serde(default)]
    pub user_cancelled: bool,
}

impl SdkError {
    pub fn new(code: SdkErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            user_cancelled: code == SdkErrorCode::PurchaseCancelled,
        }
    }
}

/// Calls into the platform purchases SDK.
#[async_trait]
pub trait PurchasesClient: Send + Sync {
    async fn configure(&self, api_key: &str) -> Result<(), SdkError>;

    async fn get_offerings(&self) -> Result<RawOfferings, SdkError>;

    async fn purchase_package(&self, package: &RawPackage) -> Result<RawPurchase, SdkError>;

    async fn get_customer_info(&self) -> Result<RawCustomerInfo, SdkError>;

    async fn restore_purchases(&self) -> Result<RawCustomerInfo, SdkError>;
}

#[async_trait]
impl<T: PurchasesClient + ?Sized> PurchasesClient for std::sync::Arc<T> {
    async fn configure(&self, api_key: &str) -> Result<(), SdkError> {
        (**self).configure(api_key).await
    }

    async fn get_offerings(&self) -> Result<RawOfferings, SdkError> {
        (**self).get_offerings().await
    }

    async fn purchase_package(&self, package: &RawPackage) -> Result<RawPurchase, SdkError> {
        (**self).purchase_package(package).await
    }

    async fn get_customer_info(&self) -> Result<RawCustomerInfo, SdkError> {
        (**self).get_customer_info().await
    }

    async fn restore_purchases(&self) -> Result<RawCustomerInfo, SdkError> {
        (**self).restore_purchases().await
    }
}
