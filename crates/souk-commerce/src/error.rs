//! Domain error types.

use thiserror::Error;

/// Errors from the synchronous domain core.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Quantity must be positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds the per-line maximum.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Amounts in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in an amount calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// No cart line for the given item.
    #[error("Item not in cart: {0}")]
    LineNotFound(String),
}
