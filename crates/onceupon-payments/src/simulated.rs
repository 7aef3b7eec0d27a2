//! In-process provider for environments without a store account.

use crate::error::{PaymentError, Result};
use crate::provider::{PaymentProvider, UPDATE_CHANNEL_CAPACITY};
use crate::types::*;
use async_trait::async_trait;
use onceupon_core::{Clock, CodeRng, Price, SystemClock};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Customer id reported by the simulator.
pub const SIMULATED_USER_ID: &str = "simulated_user";

/// Days a simulated subscription runs before it would renew.
const SUBSCRIPTION_DAYS: i64 = 30;

/// The premium offering sold by the club: one monthly plan at $30.00.
pub fn premium_offering() -> Offering {
    Offering {
        identifier: "premium_offering".into(),
        server_description: "Once Upon Us Premium Membership".into(),
        packages: vec![Package {
            identifier: "premium_monthly".into(),
            package_type: PackageType::Monthly,
            product: Product {
                identifier: "premium_monthly_30".into(),
                title: "Once Upon Us Premium".into(),
                description: "Unlimited event access and early booking privileges".into(),
                price: Price::dollars(30),
                price_string: "$30.00".into(),
            },
        }],
    }
}

struct SimState {
    customer: CustomerInfo,
    scripted: VecDeque<PaymentError>,
    rng: CodeRng,
}

/// Deterministic in-memory provider.
///
/// Purchases grant the premium entitlement immediately. Failures can be
/// scripted one call at a time with [`fail_next`](Self::fail_next) or drawn
/// from a seeded generator with [`with_failure_rate`](Self::with_failure_rate).
pub struct SimulatedProvider {
    offerings: Offerings,
    state: Mutex<SimState>,
    clock: Arc<dyn Clock>,
    latency: Duration,
    failure_percent: u8,
    updates: broadcast::Sender<CustomerInfo>,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            offerings: Offerings::single(premium_offering()),
            state: Mutex::new(SimState {
                customer: CustomerInfo::empty(SIMULATED_USER_ID),
                scripted: VecDeque::new(),
                rng: CodeRng::default(),
            }),
            clock: Arc::new(SystemClock),
            latency: Duration::ZERO,
            failure_percent: 0,
            updates,
        }
    }

    /// Sell these offerings instead of the premium offering.
    pub fn with_offerings(mut self, offerings: Offerings) -> Self {
        self.offerings = offerings;
        self
    }

    /// Date purchases with this clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wait this long before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail roughly `percent` of purchases, drawing from a generator seeded
    /// with `seed`.
    pub fn with_failure_rate(mut self, percent: u8, seed: u64) -> Self {
        self.failure_percent = percent.min(100);
        self.lock().rng = CodeRng::new(seed);
        self
    }

    /// Make the next call fail with `error`. Calls queue up in order.
    pub fn fail_next(&self, error: PaymentError) {
        self.lock().scripted.push_back(error);
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, info: &CustomerInfo) {
        // nobody listening is fine
        let _ = self.updates.send(info.clone());
    }

    async fn begin(&self, op: &'static str, may_fail_randomly: bool) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut state = self.lock();
        if let Some(error) = state.scripted.pop_front() {
            tracing::debug!(op, %error, "simulated provider scripted failure");
            return Err(error);
        }
        if may_fail_randomly && state.rng.chance(self.failure_percent) {
            tracing::debug!(op, "simulated provider random failure");
            return Err(PaymentError::Provider(
                "Payment failed. Please try again.".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn list_offerings(&self) -> Result<Offerings> {
        self.begin("list_offerings", false).await?;
        Ok(self.offerings.clone())
    }

    async fn purchase(&self, package_id: &str) -> Result<PurchaseResult> {
        self.begin("purchase", true).await?;

        let offering = self
            .offerings
            .current
            .as_ref()
            .ok_or(PaymentError::NoOfferings)?;
        let package = offering
            .package(package_id)
            .ok_or_else(|| PaymentError::PackageNotFound(package_id.to_string()))?;

        let now = self.clock.now();
        let customer = {
            let mut state = self.lock();
            if state.customer.is_premium() {
                return Err(PaymentError::AlreadyOwned);
            }
            state.customer.active_entitlements.insert(
                PREMIUM_ENTITLEMENT.to_string(),
                Entitlement {
                    identifier: PREMIUM_ENTITLEMENT.to_string(),
                    is_active: true,
                    product_identifier: package.product.identifier.clone(),
                    purchase_date: Some(now),
                    expiration_date: Some(now + chrono::Duration::days(SUBSCRIPTION_DAYS)),
                },
            );
            state
                .customer
                .active_subscriptions
                .push(package.product.identifier.clone());
            state.customer.clone()
        };

        tracing::info!(
            package = package_id,
            product = %package.product.identifier,
            "simulated purchase completed"
        );
        self.publish(&customer);

        Ok(PurchaseResult {
            customer_info: customer,
            product_identifier: package.product.identifier.clone(),
            purchase_date: now,
        })
    }

    async fn restore(&self) -> Result<CustomerInfo> {
        self.begin("restore", false).await?;
        let customer = self.lock().customer.clone();
        tracing::info!(entitlements = ?customer.entitlement_ids(), "simulated restore");
        Ok(customer)
    }

    async fn customer_info(&self) -> Result<CustomerInfo> {
        self.begin("customer_info", false).await?;
        Ok(self.lock().customer.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<CustomerInfo> {
        self.updates.subscribe()
    }

    async fn reset(&self) -> Result<()> {
        let customer = {
            let mut state = self.lock();
            state.customer = CustomerInfo::empty(SIMULATED_USER_ID);
            state.customer.clone()
        };
        tracing::info!("simulated subscription reset");
        self.publish(&customer);
        Ok(())
    }
}
