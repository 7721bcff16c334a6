//! Service contracts and wire types for the backing commerce services.
//!
//! The gateway is the authority on item existence, status, stock and
//! price; the cart store is never trusted for purchase decisions.

mod orders;
mod validate;

pub use orders::{
    CreateOrderRequest, CreateOrderResponse, Order, OrderRequestLine, OrderService, OrderStatus,
    PaymentMethod, PaymentMethodDirectory,
};
pub use validate::{
    CanonicalItem, RejectReason, ValidateResponse, ValidationGateway, ValidationOutcome,
};

use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of a gateway call.
///
/// Distinct from stale-state rejections: a transport fault means the
/// authority could not be reached, so nothing may be concluded about
/// the item and the caller is told to retry, not that its order is
/// invalid.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Non-success HTTP status.
    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: String },

    /// The bounded timeout elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body could not be decoded.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl GatewayError {
    /// Whether retrying the same call can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Http { status, .. } => (500..600).contains(status),
            GatewayError::Timeout(_) | GatewayError::Connection(_) => true,
            GatewayError::Deserialization(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(GatewayError::Timeout(Duration::from_secs(8)).is_retryable());
        assert!(GatewayError::Http {
            status: 503,
            endpoint: "orders/create".into()
        }
        .is_retryable());
        assert!(!GatewayError::Http {
            status: 404,
            endpoint: "validate-item".into()
        }
        .is_retryable());
        assert!(!GatewayError::Deserialization("bad json".into()).is_retryable());
    }
}
