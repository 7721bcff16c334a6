//! Order creation and payment-method directory contracts.

use crate::checkout::Address;
use crate::gateway::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use souk_commerce::ids::{ItemId, OrderGroupId, OrderId, SellerId};
use souk_commerce::money::{Currency, Money};
use std::collections::HashMap;

/// A payment rail accepted by sellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    Alipay,
    WechatPay,
}

impl PaymentMethod {
    /// Every rail, in the stable order intersections are reported in.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Stripe,
        PaymentMethod::Paypal,
        PaymentMethod::Alipay,
        PaymentMethod::WechatPay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Alipay => "alipay",
            PaymentMethod::WechatPay => "wechat_pay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stripe" => Some(PaymentMethod::Stripe),
            "paypal" => Some(PaymentMethod::Paypal),
            "alipay" => Some(PaymentMethod::Alipay),
            "wechat_pay" | "wechatpay" => Some(PaymentMethod::WechatPay),
            _ => None,
        }
    }
}

/// Order lifecycle status as reported by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// One item in an order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequestLine {
    /// Item being purchased.
    pub item_id: ItemId,
    /// Quantity.
    pub quantity: i64,
    /// Unit price the buyer saw; the service re-checks it.
    pub unit_price: Money,
}

/// The order-creation request.
///
/// One request covers every seller in the submission; the backing
/// service splits it by seller and returns one order each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Items across all sellers.
    pub lines: Vec<OrderRequestLine>,
    /// Rail to charge through; accepted by every seller involved.
    pub payment_method: PaymentMethod,
    /// Where to ship.
    pub shipping_address: Address,
    /// Settlement currency.
    pub currency: Currency,
    /// Key the service deduplicates by across retries of one attempt.
    pub idempotency_key: String,
}

/// An authoritative order, created only by the backing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// The single seller this order covers.
    pub seller_id: SellerId,
    /// Amount charged for this order.
    pub total: Money,
    /// Rail charged through.
    pub payment_method: PaymentMethod,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

/// The order service's response.
///
/// `requires_deposit`, a non-empty `details` array, or an empty order
/// set are business-rule rejections, not transport errors; they carry
/// their own message and leave the cart untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateOrderResponse {
    /// One order per distinct seller.
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Correlates the orders of one submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_group_id: Option<OrderGroupId>,
    /// Non-fatal notes to surface alongside a confirmation.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// The purchase needs a deposit flow first.
    #[serde(default)]
    pub requires_deposit: bool,
    /// Structured rejection details from the service.
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
    /// Service-side error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateOrderResponse {
    /// Whether the service rejected the submission on business rules.
    pub fn is_rejection(&self) -> bool {
        self.requires_deposit || !self.details.is_empty() || self.orders.is_empty()
    }
}

/// The authoritative order-creation service.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Create the orders for one submission. Callers bound this with a
    /// timeout; the service deduplicates by the idempotency key.
    async fn create_orders(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, GatewayError>;
}

/// Per-seller accepted payment rails.
#[async_trait]
pub trait PaymentMethodDirectory: Send + Sync {
    /// The rails each listed seller accepts. Sellers absent from the
    /// result accept none.
    async fn methods_for(
        &self,
        seller_ids: &[SellerId],
    ) -> Result<HashMap<SellerId, Vec<PaymentMethod>>, GatewayError>;
}
