//! Viewer-relative card state.
//!
//! `resolve` is recomputed from a fresh DTO on every render or request
//! and never cached across a mutation.

use crate::catalog::dto::{ItemStatus, ListItemDTO};
use crate::ids::ViewerId;
use serde::{Deserialize, Serialize};

/// Who the viewer is, as established by the session layer.
///
/// Admin-ness is an external fact supplied by the caller; it is never
/// derived from item data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerIdentity {
    /// Viewer id; `None` for an unauthenticated guest.
    pub id: Option<ViewerId>,
    /// Whether the session carries an admin override.
    pub is_admin: bool,
}

impl ViewerIdentity {
    /// An unauthenticated guest.
    pub fn guest() -> Self {
        Self::default()
    }

    /// An authenticated viewer.
    pub fn user(id: ViewerId) -> Self {
        Self {
            id: Some(id),
            is_admin: false,
        }
    }

    /// An authenticated viewer with the admin override.
    pub fn admin(id: ViewerId) -> Self {
        Self {
            id: Some(id),
            is_admin: true,
        }
    }
}

/// The viewer's role relative to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    Guest,
    Owner,
    Admin,
    Other,
}

impl ViewerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerRole::Guest => "guest",
            ViewerRole::Owner => "owner",
            ViewerRole::Admin => "admin",
            ViewerRole::Other => "other",
        }
    }
}

/// Availability classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Active with stock.
    Available,
    /// Active with no stock.
    SoldOut,
    /// Not active (delisted or draft).
    Hidden,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Available => "available",
            StockStatus::SoldOut => "sold_out",
            StockStatus::Hidden => "hidden",
        }
    }
}

/// Derived, transient state of one item card for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCardState {
    /// Viewer role relative to the item.
    pub viewer: ViewerRole,
    /// Availability classification.
    pub stock: StockStatus,
    /// Whether the item is in the viewer's cart.
    pub is_in_cart: bool,
}

/// Derive the card state from a DTO snapshot and the viewer identity.
///
/// Pure and total: absent data yields the least-permissive state.
pub fn resolve(dto: &ListItemDTO, viewer: &ViewerIdentity) -> ItemCardState {
    let role = match &viewer.id {
        None => ViewerRole::Guest,
        Some(id) if id.as_str() == dto.seller.id.as_str() => ViewerRole::Owner,
        Some(_) if viewer.is_admin => ViewerRole::Admin,
        Some(_) => ViewerRole::Other,
    };

    let stock = if dto.status != ItemStatus::Active {
        StockStatus::Hidden
    } else if dto.stock <= 0 {
        StockStatus::SoldOut
    } else {
        StockStatus::Available
    };

    ItemCardState {
        viewer: role,
        stock,
        is_in_cart: dto.viewer_interaction.is_in_cart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dto::RawListing;

    fn dto(status: &str, stock: i64) -> ListItemDTO {
        ListItemDTO::from_listing(RawListing {
            id: "item-1".into(),
            seller_id: "seller-1".into(),
            status: Some(status.into()),
            stock: Some(stock),
            ..RawListing::default()
        })
    }

    #[test]
    fn test_guest_role() {
        let state = resolve(&dto("active", 5), &ViewerIdentity::guest());
        assert_eq!(state.viewer, ViewerRole::Guest);
    }

    #[test]
    fn test_owner_beats_admin() {
        let viewer = ViewerIdentity::admin(ViewerId::new("seller-1"));
        let state = resolve(&dto("active", 5), &viewer);
        assert_eq!(state.viewer, ViewerRole::Owner);
    }

    #[test]
    fn test_admin_role() {
        let viewer = ViewerIdentity::admin(ViewerId::new("someone-else"));
        let state = resolve(&dto("active", 5), &viewer);
        assert_eq!(state.viewer, ViewerRole::Admin);
    }

    #[test]
    fn test_inactive_is_hidden_regardless_of_stock() {
        let state = resolve(&dto("inactive", 10), &ViewerIdentity::guest());
        assert_eq!(state.stock, StockStatus::Hidden);
    }

    #[test]
    fn test_zero_stock_is_sold_out() {
        let state = resolve(&dto("active", 0), &ViewerIdentity::guest());
        assert_eq!(state.stock, StockStatus::SoldOut);
    }

    #[test]
    fn test_available() {
        let state = resolve(&dto("active", 1), &ViewerIdentity::guest());
        assert_eq!(state.stock, StockStatus::Available);
    }

    #[test]
    fn test_in_cart_copied_verbatim() {
        let d = dto("active", 1).with_in_cart(true);
        let state = resolve(&d, &ViewerIdentity::guest());
        assert!(state.is_in_cart);
    }
}
