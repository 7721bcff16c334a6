//! Normalized item DTO and the raw storage shapes it is mapped from.
//!
//! Storage hands back items in several shapes depending on where they
//! were loaded: a full listing record, a partial record from a favorites
//! list, an item embedded in a post, or a search hit. The mapper folds
//! all of them into `ListItemDTO` with safe defaults; absence of an
//! optional field is normal, not an error. A missing price or stock maps
//! to zero so the state resolver classifies it conservatively (sold out)
//! rather than available — the mapper never invents a value.

use crate::ids::{ItemId, SellerId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Listing visibility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Listed and purchasable.
    Active,
    /// Withdrawn by the seller.
    Inactive,
    /// Not yet listed.
    #[default]
    Draft,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Draft => "draft",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(ItemStatus::Active),
            "inactive" => Some(ItemStatus::Inactive),
            "draft" => Some(ItemStatus::Draft),
            _ => None,
        }
    }
}

/// Reference to the seller who owns an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRef {
    /// Seller identifier.
    pub id: SellerId,
    /// Display name, when the record carried one.
    pub display_name: Option<String>,
}

/// Aggregate engagement counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemStats {
    pub likes: i64,
    pub favorites: i64,
    pub shares: i64,
    pub sales: i64,
}

/// The viewer's relationship to this item, populated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewerInteraction {
    /// Whether the item is in the viewer's cart.
    pub is_in_cart: bool,
}

/// Canonical read-only view of a purchasable item.
///
/// A snapshot, never a source of truth: stock, price and status here are
/// whatever the backing store said at load time and must be revalidated
/// before any commitment point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemDTO {
    /// Item identifier.
    pub id: ItemId,
    /// Owning seller.
    pub seller: SellerRef,
    /// Item name in the seller's language.
    pub name: String,
    /// Full description, if present.
    pub description: Option<String>,
    /// Image URLs, possibly empty.
    pub images: Vec<String>,
    /// Translated name for the viewer's locale.
    pub name_translated: Option<String>,
    /// Translated description for the viewer's locale.
    pub description_translated: Option<String>,
    /// Language code of the original content.
    pub content_lang: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Last-known price.
    pub price: Money,
    /// Last-known stock count.
    pub stock: i64,
    /// Last-known listing status.
    pub status: ItemStatus,
    /// Engagement counters.
    pub stats: ItemStats,
    /// Viewer-specific interaction flags.
    pub viewer_interaction: ViewerInteraction,
}

impl ListItemDTO {
    /// The name to show the viewer: translated when available.
    pub fn display_name(&self) -> &str {
        self.name_translated.as_deref().unwrap_or(&self.name)
    }

    /// First image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Map a full listing record.
    pub fn from_listing(raw: RawListing) -> Self {
        Self {
            id: ItemId::new(raw.id),
            seller: SellerRef {
                id: SellerId::new(raw.seller_id),
                display_name: raw.seller_name,
            },
            name: raw.name.unwrap_or_default(),
            description: raw.description,
            images: raw.images.unwrap_or_default(),
            name_translated: raw.name_translated,
            description_translated: raw.description_translated,
            content_lang: raw.content_lang,
            category: raw.category,
            price: map_price(raw.price, raw.currency.as_deref()),
            stock: raw.stock.unwrap_or(0),
            status: map_status(raw.status.as_deref()),
            stats: ItemStats {
                likes: raw.likes.unwrap_or(0),
                favorites: raw.favorites.unwrap_or(0),
                shares: raw.shares.unwrap_or(0),
                sales: raw.sales.unwrap_or(0),
            },
            viewer_interaction: ViewerInteraction {
                is_in_cart: raw.in_cart.unwrap_or(false),
            },
        }
    }

    /// Map an item embedded in a post.
    pub fn from_post_embed(raw: RawPostEmbed) -> Self {
        Self {
            id: ItemId::new(raw.id),
            seller: SellerRef {
                id: SellerId::new(raw.seller_id),
                display_name: None,
            },
            name: raw.name.unwrap_or_default(),
            description: None,
            images: raw.image.into_iter().collect(),
            name_translated: None,
            description_translated: None,
            content_lang: raw.content_lang,
            category: None,
            price: map_price(raw.price, raw.currency.as_deref()),
            stock: raw.stock.unwrap_or(0),
            status: map_status(raw.status.as_deref()),
            stats: ItemStats::default(),
            viewer_interaction: ViewerInteraction::default(),
        }
    }

    /// Map a favorites-list record.
    pub fn from_favorite(raw: RawFavorite) -> Self {
        Self {
            id: ItemId::new(raw.id),
            seller: SellerRef {
                id: SellerId::new(raw.seller_id),
                display_name: raw.seller_name,
            },
            name: raw.name.unwrap_or_default(),
            description: None,
            images: raw.thumbnail.into_iter().collect(),
            name_translated: raw.name_translated,
            description_translated: None,
            content_lang: raw.content_lang,
            category: None,
            price: map_price(raw.price, raw.currency.as_deref()),
            stock: raw.stock.unwrap_or(0),
            status: map_status(raw.status.as_deref()),
            stats: ItemStats {
                favorites: raw.favorites.unwrap_or(0),
                ..ItemStats::default()
            },
            viewer_interaction: ViewerInteraction::default(),
        }
    }

    /// Map a search hit.
    pub fn from_search_hit(raw: RawSearchHit) -> Self {
        Self {
            id: ItemId::new(raw.id),
            seller: SellerRef {
                id: SellerId::new(raw.seller_id),
                display_name: None,
            },
            name: raw.name.unwrap_or_default(),
            description: None,
            images: raw.thumbnail.into_iter().collect(),
            name_translated: raw.name_translated,
            description_translated: None,
            content_lang: None,
            category: raw.category,
            price: map_price(raw.price, raw.currency.as_deref()),
            stock: raw.stock.unwrap_or(0),
            status: map_status(raw.status.as_deref()),
            stats: ItemStats {
                sales: raw.sales.unwrap_or(0),
                ..ItemStats::default()
            },
            viewer_interaction: ViewerInteraction::default(),
        }
    }

    /// Set the in-cart flag, cross-referenced from the cart store by the caller.
    pub fn with_in_cart(mut self, in_cart: bool) -> Self {
        self.viewer_interaction.is_in_cart = in_cart;
        self
    }
}

/// Decimal wire price to minor units; absent price stays zero.
fn map_price(price: Option<f64>, currency: Option<&str>) -> Money {
    let currency = currency.and_then(Currency::from_code).unwrap_or_default();
    match price {
        Some(p) => Money::from_decimal(p, currency),
        None => Money::zero(currency),
    }
}

/// Unknown or absent status reads as draft, the least-permissive state.
fn map_status(status: Option<&str>) -> ItemStatus {
    status.and_then(ItemStatus::from_str).unwrap_or_default()
}

/// Full listing record as stored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawListing {
    pub id: String,
    pub seller_id: String,
    pub seller_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub name_translated: Option<String>,
    pub description_translated: Option<String>,
    pub content_lang: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<String>,
    pub likes: Option<i64>,
    pub favorites: Option<i64>,
    pub shares: Option<i64>,
    pub sales: Option<i64>,
    pub in_cart: Option<bool>,
}

/// Item record embedded in a post. Single image, no stats.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPostEmbed {
    pub id: String,
    pub seller_id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub content_lang: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<String>,
}

/// Partial record from a favorites list.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawFavorite {
    pub id: String,
    pub seller_id: String,
    pub seller_name: Option<String>,
    pub name: Option<String>,
    pub name_translated: Option<String>,
    pub content_lang: Option<String>,
    pub thumbnail: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<String>,
    pub favorites: Option<i64>,
    pub favorited_at: Option<i64>,
}

/// Search-result record.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSearchHit {
    pub id: String,
    pub seller_id: String,
    pub name: Option<String>,
    pub name_translated: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<String>,
    pub sales: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_maps_fields() {
        let dto = ListItemDTO::from_listing(RawListing {
            id: "item-1".into(),
            seller_id: "seller-1".into(),
            name: Some("Teapot".into()),
            price: Some(25.00),
            currency: Some("USD".into()),
            stock: Some(3),
            status: Some("active".into()),
            likes: Some(7),
            ..RawListing::default()
        });

        assert_eq!(dto.id.as_str(), "item-1");
        assert_eq!(dto.price.amount_minor, 2500);
        assert_eq!(dto.stock, 3);
        assert_eq!(dto.status, ItemStatus::Active);
        assert_eq!(dto.stats.likes, 7);
    }

    #[test]
    fn test_missing_fields_default_safely() {
        let dto = ListItemDTO::from_listing(RawListing {
            id: "item-2".into(),
            seller_id: "seller-1".into(),
            ..RawListing::default()
        });

        assert!(dto.images.is_empty());
        assert_eq!(dto.stock, 0);
        assert_eq!(dto.status, ItemStatus::Draft);
        assert!(dto.price.is_zero());
    }

    #[test]
    fn test_unknown_status_reads_as_draft() {
        let dto = ListItemDTO::from_listing(RawListing {
            id: "item-3".into(),
            seller_id: "seller-1".into(),
            status: Some("banana".into()),
            ..RawListing::default()
        });
        assert_eq!(dto.status, ItemStatus::Draft);
    }

    #[test]
    fn test_post_embed_single_image() {
        let dto = ListItemDTO::from_post_embed(RawPostEmbed {
            id: "item-4".into(),
            seller_id: "seller-2".into(),
            image: Some("https://img/4.jpg".into()),
            ..RawPostEmbed::default()
        });
        assert_eq!(dto.primary_image(), Some("https://img/4.jpg"));
    }

    #[test]
    fn test_translated_name_preferred() {
        let dto = ListItemDTO::from_search_hit(RawSearchHit {
            id: "item-5".into(),
            seller_id: "seller-2".into(),
            name: Some("茶壺".into()),
            name_translated: Some("Teapot".into()),
            ..RawSearchHit::default()
        });
        assert_eq!(dto.display_name(), "Teapot");
    }

    #[test]
    fn test_unknown_currency_falls_back() {
        let dto = ListItemDTO::from_listing(RawListing {
            id: "item-6".into(),
            seller_id: "seller-1".into(),
            price: Some(5.0),
            currency: Some("XPF".into()),
            ..RawListing::default()
        });
        assert_eq!(dto.price.currency, Currency::USD);
    }
}
