//! Paywall presentation data

use crate::error::{PaymentError, Result};
use crate::provider::PaymentProvider;
use crate::types::{Offering, Package, PackageType};
use serde::Serialize;

pub const PAYWALL_TITLE: &str = "Once Upon Us Premium";
pub const PAYWALL_SUBTITLE: &str =
    "Unlock unlimited access to literary events and exclusive features";
pub const PAYWALL_FEATURES: [&str; 6] = [
    "Free attendance to all literary events",
    "Early booking privileges (24 hours early)",
    "Priority support and assistance",
    "Exclusive premium content and stories",
    "Access to premium-only events",
    "Ad-free experience",
];

/// One plan as shown on the paywall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaywallPackage {
    pub identifier: String,
    pub title: &'static str,
    pub description: String,
    pub price: String,
    pub duration: &'static str,
    /// Monthly plans are highlighted
    pub is_popular: bool,
}

impl PaywallPackage {
    fn from_package(package: &Package) -> Self {
        Self {
            identifier: package.identifier.clone(),
            title: package.package_type.display_title(),
            description: package.product.description.clone(),
            price: package.product.price_string.clone(),
            duration: package.package_type.duration(),
            is_popular: package.package_type == PackageType::Monthly,
        }
    }
}

/// Everything the paywall screen renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paywall {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub features: Vec<&'static str>,
    pub packages: Vec<PaywallPackage>,
}

impl Paywall {
    pub fn from_offering(offering: &Offering) -> Self {
        Self {
            title: PAYWALL_TITLE,
            subtitle: PAYWALL_SUBTITLE,
            features: PAYWALL_FEATURES.to_vec(),
            packages: offering
                .packages
                .iter()
                .map(PaywallPackage::from_package)
                .collect(),
        }
    }

    /// Build from the provider's current offering
    pub async fn load(provider: &dyn PaymentProvider) -> Result<Self> {
        let offerings = provider.list_offerings().await?;
        let current = offerings.current.ok_or(PaymentError::NoOfferings)?;
        Ok(Self::from_offering(&current))
    }

    /// The package to preselect: the popular one, else the first
    pub fn primary_package(&self) -> Option<&PaywallPackage> {
        self.packages
            .iter()
            .find(|p| p.is_popular)
            .or_else(|| self.packages.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{premium_offering, SimulatedProvider};
    use crate::types::{Offerings, Product};
    use onceupon_core::Price;

    fn package(id: &str, package_type: PackageType) -> Package {
        Package {
            identifier: id.into(),
            package_type,
            product: Product {
                identifier: format!("{id}_product"),
                title: "Premium".into(),
                description: "Events".into(),
                price: Price::dollars(30),
                price_string: "$30.00".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_paywall_from_simulated_provider() {
        let paywall = Paywall::load(&SimulatedProvider::new()).await.unwrap();
        assert_eq!(paywall.title, "Once Upon Us Premium");
        assert_eq!(paywall.features.len(), 6);

        let primary = paywall.primary_package().unwrap();
        assert_eq!(primary.identifier, "premium_monthly");
        assert_eq!(primary.title, "Monthly");
        assert_eq!(primary.duration, "per month");
        assert_eq!(primary.price, "$30.00");
    }

    #[test]
    fn test_primary_prefers_monthly() {
        let offering = Offering {
            packages: vec![
                package("annual", PackageType::Annual),
                package("monthly", PackageType::Monthly),
            ],
            ..premium_offering()
        };
        let paywall = Paywall::from_offering(&offering);
        assert_eq!(paywall.primary_package().unwrap().identifier, "monthly");
    }

    #[test]
    fn test_primary_falls_back_to_first() {
        let offering = Offering {
            packages: vec![
                package("lifetime", PackageType::Lifetime),
                package("weekly", PackageType::Weekly),
            ],
            ..premium_offering()
        };
        let paywall = Paywall::from_offering(&offering);
        let primary = paywall.primary_package().unwrap();
        assert_eq!(primary.identifier, "lifetime");
        assert_eq!(primary.duration, "one time");
    }

    #[tokio::test]
    async fn test_no_offering() {
        let provider = SimulatedProvider::new().with_offerings(Offerings::default());
        assert_eq!(Paywall::load(&provider).await, Err(PaymentError::NoOfferings));
    }
}
