//! Cart lines and the session-local cart store.

use crate::catalog::ListItemDTO;
use crate::error::MarketError;
use crate::ids::{ItemId, SellerId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// One intended purchase.
///
/// Lines hold the last-known price and display fields, never the
/// authoritative ones; revalidation happens outside the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Item being purchased.
    pub item_id: ItemId,
    /// Seller who owns the item.
    pub seller_id: SellerId,
    /// Quantity intended.
    pub quantity: i64,
    /// Unit price as last seen.
    pub unit_price: Money,
    /// Name for display (translated when the DTO carried one).
    pub display_name: String,
    /// Thumbnail URL.
    pub image: Option<String>,
    /// Language code of the original content.
    pub content_lang: Option<String>,
    /// Whether the display name is a translation.
    pub name_translated: bool,
    /// Whether the line is selected for checkout.
    pub selected: bool,
}

impl CartLine {
    /// Build a line from an item DTO snapshot.
    pub fn from_dto(dto: &ListItemDTO, quantity: i64) -> Self {
        Self {
            item_id: dto.id.clone(),
            seller_id: dto.seller.id.clone(),
            quantity,
            unit_price: dto.price,
            display_name: dto.display_name().to_string(),
            image: dto.primary_image().map(str::to_string),
            content_lang: dto.content_lang.clone(),
            name_translated: dto.name_translated.is_some(),
            selected: true,
        }
    }

    /// Line total (unit price times quantity), checked.
    pub fn line_total(&self) -> Result<Money, MarketError> {
        self.unit_price
            .try_mul(self.quantity)
            .ok_or(MarketError::Overflow)
    }
}

/// Session-local collection of cart lines.
///
/// Owned by a single viewer session (single writer). Serializable so a
/// host can persist it across navigation within the session; it is a
/// cache of intent, not an order, and is never durable across devices.
/// The store never touches the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartStore {
    lines: Vec<CartLine>,
    /// All lines share one currency, fixed by the first insert.
    currency: Currency,
    max_quantity: i64,
}

impl CartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            currency: Currency::default(),
            max_quantity: MAX_QUANTITY_PER_LINE,
        }
    }

    /// Create an empty store with a custom per-line quantity cap.
    pub fn with_max_quantity(max_quantity: i64) -> Self {
        Self {
            max_quantity,
            ..Self::new()
        }
    }

    /// Insert a line, replacing any existing line for the same item.
    ///
    /// Returns the replaced line so the caller can roll the mutation
    /// back to exactly the prior value if a revalidation fails.
    pub fn upsert(&mut self, line: CartLine) -> Result<Option<CartLine>, MarketError> {
        if line.quantity <= 0 {
            return Err(MarketError::InvalidQuantity(line.quantity));
        }
        if line.quantity > self.max_quantity {
            return Err(MarketError::QuantityExceedsLimit(
                line.quantity,
                self.max_quantity,
            ));
        }
        if self.lines.is_empty() {
            self.currency = line.unit_price.currency;
        } else if line.unit_price.currency != self.currency {
            return Err(MarketError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: line.unit_price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.item_id == line.item_id) {
            let prior = std::mem::replace(existing, line);
            return Ok(Some(prior));
        }
        self.lines.push(line);
        Ok(None)
    }

    /// Remove the line for an item, returning it if present.
    pub fn remove(&mut self, item_id: &ItemId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| &l.item_id == item_id)?;
        Some(self.lines.remove(idx))
    }

    /// Roll an item back to a prior value.
    ///
    /// `Some(prior)` reinstates the remembered line; `None` deletes the
    /// optimistic insert. The counterpart of the value `upsert` returns.
    pub fn restore(&mut self, item_id: &ItemId, prior: Option<CartLine>) {
        match prior {
            Some(line) => match self.lines.iter().position(|l| &l.item_id == item_id) {
                Some(idx) => self.lines[idx] = line,
                None => self.lines.push(line),
            },
            None => {
                self.remove(item_id);
            }
        }
    }

    /// Change the quantity of a line. A non-positive quantity removes it.
    pub fn update_quantity(&mut self, item_id: &ItemId, quantity: i64) -> Result<(), MarketError> {
        if quantity <= 0 {
            self.remove(item_id);
            return Ok(());
        }
        if quantity > self.max_quantity {
            return Err(MarketError::QuantityExceedsLimit(
                quantity,
                self.max_quantity,
            ));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.item_id == item_id)
            .ok_or_else(|| MarketError::LineNotFound(item_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Mark one line selected or not for checkout.
    pub fn set_selected(&mut self, item_id: &ItemId, selected: bool) -> bool {
        match self.lines.iter_mut().find(|l| &l.item_id == item_id) {
            Some(line) => {
                line.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Select every line.
    pub fn select_all(&mut self) {
        for line in &mut self.lines {
            line.selected = true;
        }
    }

    /// Deselect every line.
    pub fn deselect_all(&mut self) {
        for line in &mut self.lines {
            line.selected = false;
        }
    }

    /// The currently selected lines.
    pub fn selected(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| l.selected)
    }

    /// Cloned snapshot of the selected lines, for a checkout attempt.
    pub fn selected_lines(&self) -> Vec<CartLine> {
        self.selected().cloned().collect()
    }

    /// Total of the selected lines, checked.
    pub fn selected_total(&self) -> Result<Money, MarketError> {
        let totals = self
            .selected()
            .map(|l| l.line_total())
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(totals.iter(), self.currency).ok_or(MarketError::Overflow)
    }

    /// Look up a line by item.
    pub fn get(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }

    /// Whether an item has a line.
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.get(item_id).is_some()
    }

    /// All lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the store has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The store currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Serialize for session persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a persisted store.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
