//! Per-seller payment-method intersection.

use crate::gateway::PaymentMethod;
use souk_commerce::ids::SellerId;
use std::collections::HashMap;

/// The payment methods accepted by every seller in a submission.
///
/// A method must be accepted by each seller whose items are being
/// purchased together; the result is in `PaymentMethod::ALL` order. A
/// seller absent from the directory accepts nothing, so its presence in
/// `sellers` empties the intersection. An empty result blocks checkout
/// and must be surfaced explicitly, never silently defaulted.
pub fn intersect_methods(
    sellers: &[SellerId],
    directory: &HashMap<SellerId, Vec<PaymentMethod>>,
) -> Vec<PaymentMethod> {
    if sellers.is_empty() {
        return Vec::new();
    }

    PaymentMethod::ALL
        .into_iter()
        .filter(|method| {
            sellers.iter().all(|seller| {
                directory
                    .get(seller)
                    .is_some_and(|accepted| accepted.contains(method))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(entries: &[(&str, &[PaymentMethod])]) -> HashMap<SellerId, Vec<PaymentMethod>> {
        entries
            .iter()
            .map(|(id, methods)| (SellerId::new(*id), methods.to_vec()))
            .collect()
    }

    #[test]
    fn test_single_seller_passthrough() {
        let dir = directory(&[("s1", &[PaymentMethod::Paypal, PaymentMethod::Stripe])]);
        let methods = intersect_methods(&[SellerId::new("s1")], &dir);
        // Stable ALL order, not the directory's.
        assert_eq!(methods, vec![PaymentMethod::Stripe, PaymentMethod::Paypal]);
    }

    #[test]
    fn test_two_sellers_intersect() {
        let dir = directory(&[
            ("s1", &[PaymentMethod::Stripe, PaymentMethod::Alipay]),
            ("s2", &[PaymentMethod::Alipay, PaymentMethod::WechatPay]),
        ]);
        let methods = intersect_methods(&[SellerId::new("s1"), SellerId::new("s2")], &dir);
        assert_eq!(methods, vec![PaymentMethod::Alipay]);
    }

    #[test]
    fn test_disjoint_sets_empty() {
        let dir = directory(&[
            ("s1", &[PaymentMethod::Stripe]),
            ("s2", &[PaymentMethod::WechatPay]),
        ]);
        let methods = intersect_methods(&[SellerId::new("s1"), SellerId::new("s2")], &dir);
        assert!(methods.is_empty());
    }

    #[test]
    fn test_unknown_seller_empties_intersection() {
        let dir = directory(&[("s1", &[PaymentMethod::Stripe])]);
        let methods = intersect_methods(&[SellerId::new("s1"), SellerId::new("ghost")], &dir);
        assert!(methods.is_empty());
    }

    #[test]
    fn test_no_sellers_no_methods() {
        assert!(intersect_methods(&[], &HashMap::new()).is_empty());
    }
}
