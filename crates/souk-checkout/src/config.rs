//! Checkout configuration.

use serde::Deserialize;
use souk_commerce::cart::CartStore;
use std::time::Duration;

/// Tunables for the checkout pipeline.
///
/// Timeouts are bounded per network step and distinct from the host
/// page's own lifecycle; a timeout is a retryable outcome, not a
/// generic error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Bound on the order-creation call, in milliseconds.
    pub submit_timeout_ms: u64,
    /// Bound on revalidation calls, in milliseconds.
    pub validate_timeout_ms: u64,
    /// Tolerated difference between a cart-held price and the canonical
    /// one, in minor units.
    pub price_drift_epsilon_minor: i64,
    /// Per-line quantity cap for cart stores built from this config.
    pub max_quantity_per_line: i64,
}

impl CheckoutConfig {
    /// The order-creation timeout as a `Duration`.
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    /// The revalidation timeout as a `Duration`.
    pub fn validate_timeout(&self) -> Duration {
        Duration::from_millis(self.validate_timeout_ms)
    }

    /// An empty cart store honoring this config's quantity cap.
    pub fn new_cart_store(&self) -> CartStore {
        CartStore::with_max_quantity(self.max_quantity_per_line)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submit_timeout_ms: 8_000,
            validate_timeout_ms: 5_000,
            price_drift_epsilon_minor: 1,
            max_quantity_per_line: 9_999,
        }
    }
}
