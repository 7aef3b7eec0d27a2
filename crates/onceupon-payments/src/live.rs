//! Provider backed by the platform purchases SDK.

use crate::error::{PaymentError, Result};
use crate::provider::{PaymentProvider, UPDATE_CHANNEL_CAPACITY};
use crate::sdk::*;
use crate::types::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use onceupon_core::{Clock, Price, SystemClock};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Live store provider over a [`PurchasesClient`].
pub struct LiveProvider<C> {
    client: C,
    clock: Arc<dyn Clock>,
    updates: broadcast::Sender<CustomerInfo>,
}

impl<C: PurchasesClient> LiveProvider<C> {
    /// Configure the SDK with `api_key` and wrap it.
    pub async fn connect(client: C, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(PaymentError::Configuration("missing API key".into()));
        }
        client.configure(api_key).await.map_err(map_error)?;
        tracing::info!("purchases SDK configured");

        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Ok(Self {
            client,
            clock: Arc::new(SystemClock),
            updates,
        })
    }

    /// Date purchases with this clock when the SDK reports no purchase date.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Forward a customer-info update pushed by the SDK's listener.
    pub fn notify(&self, raw: RawCustomerInfo) {
        self.publish(map_customer_info(raw));
    }

    fn publish(&self, info: CustomerInfo) {
        tracing::debug!(
            user = %info.original_app_user_id,
            entitlements = ?info.entitlement_ids(),
            "customer info updated"
        );
        let _ = self.updates.send(info);
    }
}

impl<C> std::fmt::Debug for LiveProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveProvider")
            .field("subscribers", &self.updates.receiver_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: PurchasesClient> PaymentProvider for LiveProvider<C> {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn list_offerings(&self) -> Result<Offerings> {
        let raw = self.client.get_offerings().await.map_err(map_error)?;
        Ok(map_offerings(raw))
    }

    async fn purchase(&self, package_id: &str) -> Result<PurchaseResult> {
        let offerings = self.client.get_offerings().await.map_err(map_error)?;
        let offering = offerings.current.ok_or(PaymentError::NoOfferings)?;
        let package = offering
            .available_packages
            .iter()
            .find(|p| p.identifier == package_id)
            .ok_or_else(|| PaymentError::PackageNotFound(package_id.to_string()))?;

        tracing::info!(
            package = package_id,
            product = %package.product.identifier,
            "purchasing package"
        );
        let purchase = self
            .client
            .purchase_package(package)
            .await
            .map_err(map_error)?;

        let customer_info = map_customer_info(purchase.customer_info);
        let purchase_date = customer_info
            .active_entitlements
            .values()
            .filter(|e| e.product_identifier == purchase.product_identifier)
            .find_map(|e| e.purchase_date)
            .unwrap_or_else(|| self.clock.now());
        self.publish(customer_info.clone());
        Ok(PurchaseResult {
            customer_info,
            product_identifier: purchase.product_identifier,
            purchase_date,
        })
    }

    async fn restore(&self) -> Result<CustomerInfo> {
        let raw = self.client.restore_purchases().await.map_err(map_error)?;
        let info = map_customer_info(raw);
        self.publish(info.clone());
        Ok(info)
    }

    async fn customer_info(&self) -> Result<CustomerInfo> {
        let raw = self.client.get_customer_info().await.map_err(map_error)?;
        Ok(map_customer_info(raw))
    }

    fn subscribe(&self) -> broadcast::Receiver<CustomerInfo> {
        self.updates.subscribe()
    }

    async fn reset(&self) -> Result<()> {
        // store-side subscriptions outlive a local reset
        tracing::debug!("live provider has no local subscription state to reset");
        Ok(())
    }
}

fn map_error(e: SdkError) -> PaymentError {
    if e.user_cancelled {
        return PaymentError::UserCancelled;
    }
    match e.code {
        SdkErrorCode::PurchaseCancelled => PaymentError::UserCancelled,
        SdkErrorCode::ProductAlreadyPurchased => PaymentError::AlreadyOwned,
        SdkErrorCode::Configuration => PaymentError::Configuration(e.message),
        SdkErrorCode::Network | SdkErrorCode::Store | SdkErrorCode::Unknown => {
            PaymentError::Provider(e.message)
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn price_from_major(amount: f64) -> Price {
    Price::from_cents((amount.max(0.0) * 100.0).round() as u64)
}

fn map_package(raw: RawPackage) -> Package {
    Package {
        identifier: raw.identifier,
        package_type: PackageType::from_store(&raw.package_type),
        product: Product {
            identifier: raw.product.identifier,
            title: raw.product.title,
            description: raw.product.description,
            price: price_from_major(raw.product.price),
            price_string: raw.product.price_string,
        },
    }
}

fn map_offering(raw: RawOffering) -> Offering {
    Offering {
        identifier: raw.identifier,
        server_description: raw.server_description,
        packages: raw.available_packages.into_iter().map(map_package).collect(),
    }
}

fn map_offerings(raw: RawOfferings) -> Offerings {
    let mut all: Vec<(String, RawOffering)> = raw.all.into_iter().collect();
    all.sort_by(|a, b| a.0.cmp(&b.0));
    Offerings {
        current: raw.current.map(map_offering),
        all: all
            .into_iter()
            .map(|(key, offering)| (key, map_offering(offering)))
            .collect(),
    }
}

fn map_customer_info(raw: RawCustomerInfo) -> CustomerInfo {
    let mut active: Vec<(String, RawEntitlementInfo)> =
        raw.entitlements.active.into_iter().collect();
    active.sort_by(|a, b| a.0.cmp(&b.0));

    CustomerInfo {
        original_app_user_id: raw.original_app_user_id,
        active_entitlements: active
            .into_iter()
            .map(|(key, e)| {
                let entitlement = Entitlement {
                    purchase_date: parse_date(e.latest_purchase_date.as_deref()),
                    expiration_date: parse_date(e.expiration_date.as_deref()),
                    identifier: e.identifier,
                    is_active: e.is_active,
                    product_identifier: e.product_identifier,
                };
                (key, entitlement)
            })
            .collect(),
        active_subscriptions: raw.active_subscriptions,
    }
}
