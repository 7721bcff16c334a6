//! Item revalidation: the single external check behind every
//! cart-mutating or purchase-intent action.
//!
//! Called redundantly at add-time and again at checkout-time: time
//! elapses between the two and other buyers may have acted. This is the
//! sole gate against overselling and price drift.

use crate::gateway::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use souk_commerce::catalog::ItemStatus;
use souk_commerce::ids::{ItemId, SellerId};
use souk_commerce::money::Money;

/// Canonical snapshot of an item at validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalItem {
    /// Item identifier.
    pub id: ItemId,
    /// Owning seller.
    pub seller_id: SellerId,
    /// Current name.
    pub name: String,
    /// Current price.
    pub price: Money,
    /// Current stock.
    pub stock: i64,
    /// Current listing status.
    pub status: ItemStatus,
    /// Current primary image.
    pub image: Option<String>,
}

/// Why an item failed revalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No such item.
    NotFound,
    /// Item exists but is not active.
    Inactive,
    /// Item is active with no stock.
    OutOfStock,
    /// The validator itself failed; retryable.
    ServerError,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotFound => "not_found",
            RejectReason::Inactive => "inactive",
            RejectReason::OutOfStock => "out_of_stock",
            RejectReason::ServerError => "server_error",
        }
    }

    /// Whether retrying can reasonably succeed without the item changing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RejectReason::ServerError)
    }
}

/// Per-item outcome of a revalidation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    /// The item is purchasable; here is its canonical record.
    Valid(CanonicalItem),
    /// The item is not purchasable.
    Rejected(RejectReason),
}

impl ValidationOutcome {
    /// Whether the item validated.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    /// The canonical record, when valid.
    pub fn canonical(&self) -> Option<&CanonicalItem> {
        match self {
            ValidationOutcome::Valid(item) => Some(item),
            ValidationOutcome::Rejected(_) => None,
        }
    }
}

/// Wire shape of the `validate-item` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<CanonicalItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl ValidateResponse {
    /// Fold the wire shape into an outcome.
    ///
    /// An `ok` response missing its product, or a failure missing its
    /// reason, reads as a server error: the conservative classification.
    pub fn into_outcome(self) -> ValidationOutcome {
        if self.ok {
            match self.product {
                Some(item) => ValidationOutcome::Valid(item),
                None => ValidationOutcome::Rejected(RejectReason::ServerError),
            }
        } else {
            ValidationOutcome::Rejected(self.reason.unwrap_or(RejectReason::ServerError))
        }
    }
}

/// The revalidation service.
///
/// Implementations wrap the `validate-item` and `checkout/validate-items`
/// endpoints; fakes implement it in-memory for tests.
#[async_trait]
pub trait ValidationGateway: Send + Sync {
    /// Re-check a single item.
    async fn validate(&self, item_id: &ItemId) -> Result<ValidationOutcome, GatewayError>;

    /// Re-check many items in one call. The result is order-aligned
    /// with the request.
    async fn validate_bulk(
        &self,
        item_ids: &[ItemId],
    ) -> Result<Vec<ValidationOutcome>, GatewayError>;
}
