//! Provider selection from configuration.

use crate::config::PaymentsConfig;
use crate::error::{Error, Result};
use onceupon_payments::{LiveProvider, PaymentProvider, ProviderMode, PurchasesClient, SimulatedProvider};
use std::sync::Arc;
use std::time::Duration;

/// Build the provider named by `config.mode`.
///
/// Live mode needs both an SDK client and an API key. This runs once at
/// startup; the rest of the session only sees the trait object.
pub async fn select_provider(
    config: &PaymentsConfig,
    live_client: Option<Arc<dyn PurchasesClient>>,
) -> Result<Arc<dyn PaymentProvider>> {
    let provider: Arc<dyn PaymentProvider> = match config.mode {
        ProviderMode::Simulated => Arc::new(simulated_provider(config)),
        ProviderMode::Live => {
            let client = live_client.ok_or_else(|| {
                Error::Config("live payments selected but no purchases client is available".into())
            })?;
            let api_key = config
                .api_key
                .as_deref()
                .ok_or_else(|| Error::Config("live payments need payments.api_key".into()))?;
            Arc::new(LiveProvider::connect(client, api_key).await?)
        }
    };
    tracing::info!(provider = provider.name(), "payment provider selected");
    Ok(provider)
}

/// The simulated provider with the configured latency and failure rate.
pub fn simulated_provider(config: &PaymentsConfig) -> SimulatedProvider {
    let mut provider =
        SimulatedProvider::new().with_latency(Duration::from_millis(config.simulated_latency_ms));
    if config.simulated_failure_percent > 0 {
        provider = provider.with_failure_rate(config.simulated_failure_percent, 0x5eed);
    }
    provider
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use onceupon_payments::sdk::*;

    struct OfflineClient;

    #[async_trait]
    impl PurchasesClient for OfflineClient {
        async fn configure(&self, _api_key: &str) -> std::result::Result<(), SdkError> {
            Ok(())
        }

        async fn get_offerings(&self) -> std::result::Result<RawOfferings, SdkError> {
            Err(SdkError::new(SdkErrorCode::Network, "offline"))
        }

        async fn purchase_package(
            &self,
            _package: &RawPackage,
        ) -> std::result::Result<RawPurchase, SdkError> {
            Err(SdkError::new(SdkErrorCode::Network, "offline"))
        }

        async fn get_customer_info(&self) -> std::result::Result<RawCustomerInfo, SdkError> {
            Err(SdkError::new(SdkErrorCode::Network, "offline"))
        }

        async fn restore_purchases(&self) -> std::result::Result<RawCustomerInfo, SdkError> {
            Err(SdkError::new(SdkErrorCode::Network, "offline"))
        }
    }

    #[tokio::test]
    async fn test_simulated_by_default() {
        let provider = select_provider(&PaymentsConfig::default(), None)
            .await
            .unwrap();
        assert_eq!(provider.name(), "simulated");
    }

    #[tokio::test]
    async fn test_live_needs_client_and_key() {
        let config = PaymentsConfig {
            mode: ProviderMode::Live,
            ..PaymentsConfig::default()
        };
        assert_matches!(
            select_provider(&config, None).await.err(),
            Some(Error::Config(_))
        );
        assert_matches!(
            select_provider(&config, Some(Arc::new(OfflineClient))).await.err(),
            Some(Error::Config(_))
        );

        let config = PaymentsConfig {
            api_key: Some("appl_123".into()),
            ..config
        };
        let provider = select_provider(&config, Some(Arc::new(OfflineClient))).await.unwrap();
        assert_eq!(provider.name(), "live");
    }
}
