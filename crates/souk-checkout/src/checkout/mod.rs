//! Checkout module.
//!
//! Reconciliation of cart lines against canonical records, per-seller
//! payment-method intersection, and the checkout phase machine.

mod address;
mod payment;
mod pipeline;
mod reconcile;

pub use address::Address;
pub use payment::intersect_methods;
pub use pipeline::{
    BusinessRejection, CheckoutError, CheckoutPhase, CheckoutPipeline, Confirmation,
};
pub use reconcile::{reconcile, DroppedLine, LineRejection, ReconcileReport};
