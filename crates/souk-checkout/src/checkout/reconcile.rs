//! Reconciliation of selected cart lines against canonical records.
//!
//! Checks run in a fixed order and the first failure classifies the
//! line: record exists, record is active, stock covers the quantity,
//! price within drift tolerance. Reconciliation is pure; removing the
//! invalid lines from the cart store is the pipeline's job.

use crate::gateway::{CanonicalItem, RejectReason, ValidationOutcome};
use serde::{Deserialize, Serialize};
use souk_commerce::cart::CartLine;
use souk_commerce::catalog::ItemStatus;
use souk_commerce::money::Money;

/// Why a line was dropped from a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum LineRejection {
    /// The item no longer exists.
    NotFound,
    /// The seller withdrew the listing.
    Inactive,
    /// Stock no longer covers the requested quantity.
    InsufficientStock { available: i64 },
    /// The canonical price moved beyond tolerance.
    PriceDrift { current: Money },
    /// The validator failed for this item; retryable.
    ServerError,
}

impl LineRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineRejection::NotFound => "not_found",
            LineRejection::Inactive => "inactive",
            LineRejection::InsufficientStock { .. } => "insufficient_stock",
            LineRejection::PriceDrift { .. } => "price_drift",
            LineRejection::ServerError => "server_error",
        }
    }

    /// Whether the line should be removed from the cart store.
    ///
    /// Stale-state rejections are auto-corrected by removal so repeated
    /// checkout attempts don't re-surface dead lines. A validator
    /// server error says nothing about the item, so the line stays and
    /// only this submission skips it.
    pub fn removes_line(&self) -> bool {
        !matches!(self, LineRejection::ServerError)
    }
}

/// A line excluded from the submission, with its reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedLine {
    pub line: CartLine,
    pub rejection: LineRejection,
}

/// Outcome of reconciling one submission's lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcileReport {
    /// Lines that passed every check, prices refreshed to canonical.
    pub valid: Vec<CartLine>,
    /// Lines excluded, in input order.
    pub dropped: Vec<DroppedLine>,
}

impl ReconcileReport {
    /// Whether every line was dropped.
    pub fn all_invalid(&self) -> bool {
        self.valid.is_empty() && !self.dropped.is_empty()
    }

    /// Whether no line was dropped.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Reconcile lines against their validation outcomes.
///
/// `outcomes` must be order-aligned with `lines` (as `validate_bulk`
/// returns them). A missing outcome reads as a server error for that
/// line: the conservative classification.
pub fn reconcile(
    lines: Vec<CartLine>,
    outcomes: &[ValidationOutcome],
    epsilon_minor: i64,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for (i, line) in lines.into_iter().enumerate() {
        match outcomes.get(i) {
            None => report.dropped.push(DroppedLine {
                line,
                rejection: LineRejection::ServerError,
            }),
            Some(ValidationOutcome::Rejected(reason)) => {
                let rejection = match reason {
                    RejectReason::NotFound => LineRejection::NotFound,
                    RejectReason::Inactive => LineRejection::Inactive,
                    RejectReason::OutOfStock => LineRejection::InsufficientStock { available: 0 },
                    RejectReason::ServerError => LineRejection::ServerError,
                };
                report.dropped.push(DroppedLine { line, rejection });
            }
            Some(ValidationOutcome::Valid(item)) => match check_line(&line, item, epsilon_minor) {
                Some(rejection) => report.dropped.push(DroppedLine { line, rejection }),
                None => {
                    let mut line = line;
                    line.unit_price = item.price;
                    report.valid.push(line);
                }
            },
        }
    }

    report
}

/// Apply the ordered checks to one line; `None` means the line passes.
fn check_line(line: &CartLine, item: &CanonicalItem, epsilon_minor: i64) -> Option<LineRejection> {
    if item.status != ItemStatus::Active {
        return Some(LineRejection::Inactive);
    }
    if item.stock < line.quantity {
        return Some(LineRejection::InsufficientStock {
            available: item.stock,
        });
    }
    match line.unit_price.drift_from(&item.price) {
        Some(drift) if drift <= epsilon_minor => None,
        // A currency change reads as drift too.
        _ => Some(LineRejection::PriceDrift {
            current: item.price,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souk_commerce::ids::{ItemId, SellerId};
    use souk_commerce::money::Currency;

    fn line(item: &str, qty: i64, price_minor: i64) -> CartLine {
        CartLine {
            item_id: ItemId::new(item),
            seller_id: SellerId::new("seller-1"),
            quantity: qty,
            unit_price: Money::new(price_minor, Currency::USD),
            display_name: item.to_string(),
            image: None,
            content_lang: None,
            name_translated: false,
            selected: true,
        }
    }

    fn canonical(item: &str, stock: i64, price_minor: i64) -> ValidationOutcome {
        ValidationOutcome::Valid(CanonicalItem {
            id: ItemId::new(item),
            seller_id: SellerId::new("seller-1"),
            name: item.to_string(),
            price: Money::new(price_minor, Currency::USD),
            stock,
            status: ItemStatus::Active,
            image: None,
        })
    }

    #[test]
    fn test_clean_reconciliation() {
        let report = reconcile(
            vec![line("a", 2, 1000)],
            &[canonical("a", 5, 1000)],
            1,
        );
        assert!(report.is_clean());
        assert_eq!(report.valid.len(), 1);
    }

    #[test]
    fn test_rejection_reasons_map() {
        let report = reconcile(
            vec![line("a", 1, 1000), line("b", 1, 1000)],
            &[
                ValidationOutcome::Rejected(RejectReason::NotFound),
                ValidationOutcome::Rejected(RejectReason::Inactive),
            ],
            1,
        );
        assert!(report.all_invalid());
        assert_eq!(report.dropped[0].rejection, LineRejection::NotFound);
        assert_eq!(report.dropped[1].rejection, LineRejection::Inactive);
    }

    #[test]
    fn test_stock_below_quantity() {
        let report = reconcile(vec![line("a", 3, 1000)], &[canonical("a", 2, 1000)], 1);
        assert_eq!(
            report.dropped[0].rejection,
            LineRejection::InsufficientStock { available: 2 }
        );
    }

    #[test]
    fn test_price_drift_beyond_epsilon() {
        let report = reconcile(vec![line("a", 1, 1000)], &[canonical("a", 5, 1100)], 1);
        assert_eq!(
            report.dropped[0].rejection,
            LineRejection::PriceDrift {
                current: Money::new(1100, Currency::USD)
            }
        );
    }

    #[test]
    fn test_drift_within_epsilon_passes_and_refreshes() {
        let report = reconcile(vec![line("a", 1, 1000)], &[canonical("a", 5, 1001)], 1);
        assert!(report.is_clean());
        // The valid line carries the canonical price forward.
        assert_eq!(report.valid[0].unit_price.amount_minor, 1001);
    }

    #[test]
    fn test_check_order_inactive_before_stock() {
        let outcome = ValidationOutcome::Valid(CanonicalItem {
            id: ItemId::new("a"),
            seller_id: SellerId::new("seller-1"),
            name: "a".into(),
            price: Money::new(9999, Currency::USD),
            stock: 0,
            status: ItemStatus::Inactive,
            image: None,
        });
        let report = reconcile(vec![line("a", 1, 1000)], &[outcome], 1);
        assert_eq!(report.dropped[0].rejection, LineRejection::Inactive);
    }

    #[test]
    fn test_server_error_keeps_line_in_cart() {
        let rejection = LineRejection::ServerError;
        assert!(!rejection.removes_line());
        assert!(LineRejection::NotFound.removes_line());
    }

    #[test]
    fn test_missing_outcome_is_server_error() {
        let report = reconcile(vec![line("a", 1, 1000), line("b", 1, 1000)], &[canonical("a", 5, 1000)], 1);
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.dropped[0].rejection, LineRejection::ServerError);
    }
}
