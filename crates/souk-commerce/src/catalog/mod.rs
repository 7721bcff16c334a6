//! Item catalog module.
//!
//! Normalizes heterogeneous storage records into one DTO, derives the
//! viewer-relative card state, and derives capability flags from it.

mod capabilities;
mod dto;
mod state;

pub use capabilities::ItemCardCapabilities;
pub use dto::{
    ItemStats, ItemStatus, ListItemDTO, RawFavorite, RawListing, RawPostEmbed, RawSearchHit,
    SellerRef, ViewerInteraction,
};
pub use state::{resolve, ItemCardState, StockStatus, ViewerIdentity, ViewerRole};
