//! Offerings, packages and customer entitlements

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use onceupon_core::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entitlement that marks a premium member
pub const PREMIUM_ENTITLEMENT: &str = "premium_access";

/// Billing period of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageType {
    Weekly,
    Monthly,
    Annual,
    Lifetime,
    Custom,
}

impl PackageType {
    /// Parse the store's package type name; unknown names become `Custom`
    pub fn from_store(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "WEEKLY" => PackageType::Weekly,
            "MONTHLY" => PackageType::Monthly,
            "ANNUAL" => PackageType::Annual,
            "LIFETIME" => PackageType::Lifetime,
            _ => PackageType::Custom,
        }
    }

    /// Short label shown on the paywall
    pub fn display_title(self) -> &'static str {
        match self {
            PackageType::Monthly => "Monthly",
            PackageType::Annual => "Annual",
            PackageType::Weekly => "Weekly",
            PackageType::Lifetime => "Lifetime",
            PackageType::Custom => "Subscription",
        }
    }

    /// Billing period shown next to the price
    pub fn duration(self) -> &'static str {
        match self {
            PackageType::Monthly => "per month",
            PackageType::Annual => "per year",
            PackageType::Weekly => "per week",
            PackageType::Lifetime => "one time",
            PackageType::Custom => "subscription",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_title())
    }
}

/// A store product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    /// Localized price as the store formats it
    pub price_string: String,
}

/// A purchasable plan wrapping one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub identifier: String,
    pub package_type: PackageType,
    pub product: Product,
}

/// A named set of packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub identifier: String,
    pub server_description: String,
    pub packages: Vec<Package>,
}

impl Offering {
    /// Find a package by identifier
    pub fn package(&self, identifier: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.identifier == identifier)
    }

    /// The first monthly package
    pub fn monthly(&self) -> Option<&Package> {
        self.packages
            .iter()
            .find(|p| p.package_type == PackageType::Monthly)
    }
}

/// Every offering, plus the one the store wants shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offerings {
    pub current: Option<Offering>,
    pub all: IndexMap<String, Offering>,
}

impl Offerings {
    /// Offerings with a single current offering
    pub fn single(offering: Offering) -> Self {
        let mut all = IndexMap::new();
        all.insert(offering.identifier.clone(), offering.clone());
        Self {
            current: Some(offering),
            all,
        }
    }
}

/// A granted entitlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub identifier: String,
    pub is_active: bool,
    pub product_identifier: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// What the provider knows about the current customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub original_app_user_id: String,
    /// Entitlements currently in force, keyed by entitlement id
    pub active_entitlements: IndexMap<String, Entitlement>,
    pub active_subscriptions: Vec<String>,
}

impl CustomerInfo {
    /// A customer with nothing purchased
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            original_app_user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Whether `entitlement` is present and active
    pub fn has_entitlement(&self, entitlement: &str) -> bool {
        self.active_entitlements
            .get(entitlement)
            .is_some_and(|e| e.is_active)
    }

    /// Whether the premium entitlement is present
    pub fn is_premium(&self) -> bool {
        self.has_entitlement(PREMIUM_ENTITLEMENT)
    }

    /// Whether anything at all is active
    pub fn has_any_entitlement(&self) -> bool {
        !self.active_entitlements.is_empty()
    }

    /// Active entitlement ids, for logging
    pub fn entitlement_ids(&self) -> Vec<&str> {
        self.active_entitlements.keys().map(String::as_str).collect()
    }
}

/// A completed purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResult {
    pub customer_info: CustomerInfo,
    pub product_identifier: String,
    pub purchase_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_type_from_store() {
        assert_eq!(PackageType::from_store("MONTHLY"), PackageType::Monthly);
        assert_eq!(PackageType::from_store("annual"), PackageType::Annual);
        assert_eq!(PackageType::from_store("SIX_MONTH"), PackageType::Custom);
    }

    #[test]
    fn test_package_type_labels() {
        assert_eq!(PackageType::Monthly.display_title(), "Monthly");
        assert_eq!(PackageType::Lifetime.duration(), "one time");
        assert_eq!(PackageType::Custom.duration(), "subscription");
    }

    #[test]
    fn test_inactive_entitlement_is_not_premium() {
        let mut info = CustomerInfo::empty("u1");
        info.active_entitlements.insert(
            PREMIUM_ENTITLEMENT.into(),
            Entitlement {
                identifier: PREMIUM_ENTITLEMENT.into(),
                is_active: false,
                product_identifier: "p".into(),
                purchase_date: None,
                expiration_date: None,
            },
        );
        assert!(!info.is_premium());
        assert!(info.has_any_entitlement());
    }
}
