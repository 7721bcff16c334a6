//! Marketplace transaction domain for Souk.
//!
//! This crate holds the synchronous half of the commerce core:
//!
//! - **Catalog**: normalized item DTOs, card state resolution, capability policy
//! - **Cart**: the session-local cart store with exact-rollback mutation
//! - **Money**: minor-unit amounts with drift comparison
//!
//! Everything here is pure, in-process logic. Stock, price and listing
//! status are owned by the backing inventory service; the types in this
//! crate only carry snapshots of them. The asynchronous half (revalidation,
//! order creation, the checkout pipeline) lives in `souk-checkout`.
//!
//! # Example
//!
//! ```rust,ignore
//! use souk_commerce::prelude::*;
//!
//! let dto = ListItemDTO::from_listing(raw);
//! let state = resolve(&dto, &ViewerIdentity::user(viewer_id));
//! let caps = ItemCardCapabilities::derive(&state);
//!
//! if caps.can_add_to_cart {
//!     cart.upsert(CartLine::from_dto(&dto, 1))?;
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::MarketError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::MarketError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        resolve, ItemCardCapabilities, ItemCardState, ItemStats, ItemStatus, ListItemDTO,
        SellerRef, StockStatus, ViewerIdentity, ViewerInteraction, ViewerRole,
    };

    // Cart
    pub use crate::cart::{CartLine, CartStore, MAX_QUANTITY_PER_LINE};
}
