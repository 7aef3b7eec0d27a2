//! Once Upon Us Payments - subscriptions and entitlements
//!
//! The session talks to a [`PaymentProvider`]. Two implementations exist:
//! - [`SimulatedProvider`]: deterministic and in-process, for development and tests
//! - [`LiveProvider`]: the platform store, through a [`PurchasesClient`]
//!
//! Presence of the [`PREMIUM_ENTITLEMENT`] entitlement in a [`CustomerInfo`]
//! marks a premium member.

mod error;
mod live;
mod paywall;
mod provider;
pub mod sdk;
mod simulated;
mod types;

pub use error::{PaymentError, Result};
pub use live::LiveProvider;
pub use paywall::{Paywall, PaywallPackage, PAYWALL_FEATURES, PAYWALL_SUBTITLE, PAYWALL_TITLE};
pub use provider::{PaymentProvider, ProviderMode, UPDATE_CHANNEL_CAPACITY};
pub use sdk::PurchasesClient;
pub use simulated::{premium_offering, SimulatedProvider, SIMULATED_USER_ID};
pub use types::{
    CustomerInfo, Entitlement, Offering, Offerings, Package, PackageType, Product,
    PurchaseResult, PREMIUM_ENTITLEMENT,
};
