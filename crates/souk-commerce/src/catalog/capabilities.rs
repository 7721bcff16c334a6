//! Capability policy: which actions the card may offer.
//!
//! This table is the single source of truth for what a view renders as
//! enabled. It is a pure function of card state, re-derivable
//! byte-for-byte on every call. The flags are a UX gate only: the server
//! must re-derive authorization independently before any mutation.

use crate::catalog::state::{ItemCardState, StockStatus, ViewerRole};
use serde::{Deserialize, Serialize};

/// Boolean capability set for one item card.
///
/// A hidden item (delisted or draft) blocks every social and commerce
/// action uniformly. A sold-out item blocks only the transactional ones,
/// preserving social engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemCardCapabilities {
    pub can_like: bool,
    pub can_favorite: bool,
    pub can_repost: bool,
    pub can_share: bool,
    pub can_report: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_buy: bool,
    pub can_add_to_cart: bool,
    pub can_message_seller: bool,
}

impl ItemCardCapabilities {
    /// Derive the capability set from card state.
    pub fn derive(state: &ItemCardState) -> Self {
        let visible = state.stock != StockStatus::Hidden;
        let signed_in = state.viewer != ViewerRole::Guest;
        let owner = state.viewer == ViewerRole::Owner;
        let admin = state.viewer == ViewerRole::Admin;
        let purchasable = state.stock == StockStatus::Available;

        let social = signed_in && visible;
        let third_party = signed_in && !owner && visible;

        Self {
            can_like: social,
            can_favorite: social,
            can_repost: social,
            can_share: visible,
            can_report: third_party,
            can_edit: visible && (owner || admin),
            can_delete: visible && (owner || admin),
            can_buy: purchasable,
            can_add_to_cart: purchasable,
            can_message_seller: third_party,
        }
    }

    /// The all-false set.
    pub fn none() -> Self {
        Self::default()
    }
}
