//! Subscription purchase flow driven from the paywall.

use crate::store::ProfileStore;
use onceupon_payments::{CustomerInfo, Offering, PaymentError, Paywall};
use tokio::sync::watch;

/// What the paywall shows while a provider call runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Loading,
    /// Message for the user; the call can be retried
    Failed(String),
}

/// How a purchase attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The store granted (or had already granted) the product
    Completed { premium: bool },
    /// The user backed out; nothing to show
    Cancelled,
    /// The purchase failed with this message
    Failed(String),
}

/// Provider calls for one paywall visit, syncing premium status into the
/// profile after each successful call.
pub struct SubscriptionFlow<'a> {
    store: &'a mut ProfileStore,
    state: watch::Sender<FlowState>,
}

impl ProfileStore {
    /// Start a subscription flow against this store's provider.
    pub fn subscription(&mut self) -> SubscriptionFlow<'_> {
        SubscriptionFlow {
            store: self,
            state: watch::Sender::new(FlowState::Idle),
        }
    }
}

impl SubscriptionFlow<'_> {
    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    /// Observe state changes while a call is pending.
    pub fn watch_state(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state() == FlowState::Loading
    }

    pub fn error(&self) -> Option<String> {
        match self.state() {
            FlowState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn set(&self, state: FlowState) {
        self.state.send_replace(state);
    }

    fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(provider = self.store.provider.name(), %message, "subscription call failed");
        self.set(FlowState::Failed(message));
    }

    /// The current offering, or `None` with the state set to `Failed`.
    pub async fn offerings(&mut self) -> Option<Offering> {
        self.set(FlowState::Loading);
        match self.store.provider.list_offerings().await {
            Ok(offerings) => match offerings.current {
                Some(current) => {
                    tracing::debug!(
                        offering = %current.identifier,
                        packages = current.packages.len(),
                        "offerings received"
                    );
                    self.set(FlowState::Idle);
                    Some(current)
                }
                None => {
                    self.fail("No subscription packages available");
                    None
                }
            },
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    /// Paywall display data for the current offering.
    pub async fn paywall(&mut self) -> Option<Paywall> {
        self.offerings().await.map(|o| Paywall::from_offering(&o))
    }

    /// Fetch customer info and sync premium status.
    ///
    /// Failures are logged only; the paywall stays usable.
    pub async fn refresh(&mut self) -> Option<CustomerInfo> {
        match self.store.provider.customer_info().await {
            Ok(info) => {
                self.store.apply_customer_info(&info).await;
                Some(info)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch customer info");
                None
            }
        }
    }

    /// Buy `package_id`.
    pub async fn purchase(&mut self, package_id: &str) -> PurchaseOutcome {
        self.set(FlowState::Loading);
        let info = match self.store.provider.purchase(package_id).await {
            Ok(result) => result.customer_info,
            Err(PaymentError::UserCancelled) => {
                tracing::info!(package = package_id, "purchase cancelled by user");
                self.set(FlowState::Idle);
                return PurchaseOutcome::Cancelled;
            }
            Err(PaymentError::AlreadyOwned) => {
                tracing::info!(package = package_id, "package already owned");
                match self.store.provider.customer_info().await {
                    Ok(info) => info,
                    Err(e) => return self.purchase_failed(e),
                }
            }
            Err(e) => return self.purchase_failed(e),
        };

        self.store.apply_customer_info(&info).await;
        self.set(FlowState::Idle);
        PurchaseOutcome::Completed {
            premium: self.store.profile().is_premium_subscriber,
        }
    }

    fn purchase_failed(&self, error: PaymentError) -> PurchaseOutcome {
        let message = error.to_string();
        self.fail(message.clone());
        PurchaseOutcome::Failed(message)
    }

    /// Ask the store to restore purchases.
    ///
    /// Returns whether any entitlement is active afterwards.
    pub async fn restore(&mut self) -> bool {
        self.set(FlowState::Loading);
        match self.store.provider.restore().await {
            Ok(info) => {
                self.store.apply_customer_info(&info).await;
                self.set(FlowState::Idle);
                info.has_any_entitlement()
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }
}
