//! Checkout pipeline for Souk.
//!
//! The asynchronous half of the commerce core:
//!
//! - **Gateway**: the revalidation, order-creation and payment-method
//!   service contracts, with their wire types
//! - **Checkout**: line reconciliation, payment-method intersection and
//!   the checkout phase machine
//! - **Actions**: cart-mutating viewer actions (add-to-cart, buy-now)
//!   with optimistic apply and exact rollback
//!
//! The cart store (`souk_commerce::cart`) is advisory; every commitment
//! point here re-checks the canonical record through the gateway. Stock
//! is a shared resource mutated by any number of concurrent buyers,
//! which is why revalidation happens immediately before submission
//! rather than being trusted from an earlier point.

pub mod actions;
pub mod checkout;
pub mod config;
pub mod gateway;

pub use config::CheckoutConfig;
pub use gateway::GatewayError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::actions::{add_to_cart, buy_now, ActionError, PurchaseIntent};
    pub use crate::checkout::{
        Address, BusinessRejection, CheckoutError, CheckoutPhase, CheckoutPipeline, Confirmation,
        DroppedLine, LineRejection, ReconcileReport,
    };
    pub use crate::config::CheckoutConfig;
    pub use crate::gateway::{
        CanonicalItem, CreateOrderRequest, CreateOrderResponse, GatewayError, Order,
        OrderRequestLine, OrderService, OrderStatus, PaymentMethod, PaymentMethodDirectory,
        RejectReason, ValidationGateway, ValidationOutcome,
    };
}
