//! Cart-mutating viewer actions.
//!
//! Add-to-cart is a two-phase tentative write: the line goes in
//! optimistically, then the item is revalidated, and on any failure the
//! store is rolled back to exactly its prior value — a remembered prior
//! line is reinstated, an optimistic insert is deleted. The rollback
//! rides a drop guard, so a cancelled (dropped) action also leaves the
//! store as of the last committed step.

use crate::gateway::{
    CanonicalItem, GatewayError, RejectReason, ValidationGateway, ValidationOutcome,
};
use souk_commerce::cart::{CartLine, CartStore};
use souk_commerce::catalog::{
    resolve, ItemCardCapabilities, ItemStatus, ListItemDTO, StockStatus, ViewerIdentity,
};
use souk_commerce::error::MarketError;
use souk_commerce::ids::ItemId;
use souk_commerce::money::Money;
use thiserror::Error;
use tracing::debug;

/// Errors from viewer actions.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Blocked by the capability policy before any network call.
    #[error("Item is not purchasable ({})", .stock.as_str())]
    NotPurchasable { stock: StockStatus },

    /// The gateway rejected the item.
    #[error("Item failed revalidation: {}", .0.as_str())]
    Rejected(RejectReason),

    /// Stock no longer covers the requested quantity.
    #[error("Only {available} left in stock")]
    InsufficientStock { available: i64 },

    /// Cart store refused the mutation.
    #[error(transparent)]
    Cart(#[from] MarketError),

    /// The gateway could not be reached; retryable.
    #[error("Service unreachable: {0}")]
    Transport(#[from] GatewayError),
}

/// A validated intent to buy one item immediately.
///
/// Handed to the host's payment redirect; no cart mutation involved.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseIntent {
    /// Canonical record at validation time.
    pub item: CanonicalItem,
    /// Quantity to purchase.
    pub quantity: i64,
}

impl PurchaseIntent {
    /// Total at the canonical price, checked.
    pub fn total(&self) -> Result<Money, MarketError> {
        self.item
            .price
            .try_mul(self.quantity)
            .ok_or(MarketError::Overflow)
    }
}

/// Restores an item to its pre-action value unless disarmed.
struct Rollback<'a> {
    store: &'a mut CartStore,
    item_id: ItemId,
    prior: Option<CartLine>,
    armed: bool,
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.restore(&self.item_id, self.prior.take());
            debug!(item = %self.item_id, "optimistic cart line rolled back");
        }
    }
}

/// Add an item to the cart, revalidating synchronously.
///
/// The DTO may be stale from a list rendered seconds earlier; the
/// gateway decides. On success the stored line carries the canonical
/// price current at add time.
pub async fn add_to_cart<V: ValidationGateway>(
    store: &mut CartStore,
    gateway: &V,
    dto: &ListItemDTO,
    viewer: &ViewerIdentity,
    quantity: i64,
) -> Result<(), ActionError> {
    let state = resolve(dto, viewer);
    let caps = ItemCardCapabilities::derive(&state);
    if !caps.can_add_to_cart {
        return Err(ActionError::NotPurchasable { stock: state.stock });
    }

    let prior = store.upsert(CartLine::from_dto(dto, quantity))?;
    let mut guard = Rollback {
        store,
        item_id: dto.id.clone(),
        prior,
        armed: true,
    };

    let canonical = match gateway.validate(&dto.id).await? {
        ValidationOutcome::Rejected(reason) => return Err(ActionError::Rejected(reason)),
        ValidationOutcome::Valid(item) => item,
    };
    if canonical.status != ItemStatus::Active {
        return Err(ActionError::Rejected(RejectReason::Inactive));
    }
    if canonical.stock < quantity {
        return Err(ActionError::InsufficientStock {
            available: canonical.stock,
        });
    }

    let mut confirmed = CartLine::from_dto(dto, quantity);
    confirmed.unit_price = canonical.price;
    if canonical.image.is_some() {
        confirmed.image = canonical.image.clone();
    }
    guard.store.upsert(confirmed)?;
    guard.armed = false;
    Ok(())
}

/// Validate an immediate purchase before the payment redirect.
pub async fn buy_now<V: ValidationGateway>(
    gateway: &V,
    dto: &ListItemDTO,
    viewer: &ViewerIdentity,
    quantity: i64,
) -> Result<PurchaseIntent, ActionError> {
    if quantity <= 0 {
        return Err(MarketError::InvalidQuantity(quantity).into());
    }
    let state = resolve(dto, viewer);
    let caps = ItemCardCapabilities::derive(&state);
    if !caps.can_buy {
        return Err(ActionError::NotPurchasable { stock: state.stock });
    }

    let canonical = match gateway.validate(&dto.id).await? {
        ValidationOutcome::Rejected(reason) => return Err(ActionError::Rejected(reason)),
        ValidationOutcome::Valid(item) => item,
    };
    if canonical.status != ItemStatus::Active {
        return Err(ActionError::Rejected(RejectReason::Inactive));
    }
    if canonical.stock < quantity {
        return Err(ActionError::InsufficientStock {
            available: canonical.stock,
        });
    }

    Ok(PurchaseIntent {
        item: canonical,
        quantity,
    })
}
