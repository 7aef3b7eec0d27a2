//! Error types for payment operations.

use thiserror::Error;

/// Errors reported by a payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The user dismissed the store sheet.
    #[error("Purchase cancelled")]
    UserCancelled,

    /// The store says the user already owns this product.
    #[error("Product already owned")]
    AlreadyOwned,

    /// No package with this identifier in the current offering.
    #[error("Package with identifier {0} not found")]
    PackageNotFound(String),

    /// The provider has no current offering.
    #[error("No offerings available")]
    NoOfferings,

    /// The provider was not set up correctly.
    #[error("Payments not configured: {0}")]
    Configuration(String),

    /// Anything else the provider reported.
    #[error("{0}")]
    Provider(String),
}

impl PaymentError {
    /// Cancellation is not shown to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, PaymentError::UserCancelled)
    }

    /// Whether trying the same call again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Provider(_) | PaymentError::NoOfferings)
    }
}

/// Result type for payment operations.
pub type Result<T> = std::result::Result<T, PaymentError>;
