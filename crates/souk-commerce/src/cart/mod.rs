//! Shopping cart module.
//!
//! The cart is the session's working memory of intended purchases:
//! client-local, advisory, never a purchase authority.

mod store;

pub use store::{CartLine, CartStore, MAX_QUANTITY_PER_LINE};
