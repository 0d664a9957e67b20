use checkout_core::CartItem;
use serde::{Deserialize, Serialize};

use crate::calculator::{price_line_items, subtotal, PricedLineItem};
use crate::normalizer::normalize;
use crate::promotions::PromoTable;
use crate::PricingError;

/// What to do when a discount is larger than the subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeTotalPolicy {
    /// Keep the discount as resolved; the total may go below zero
    #[default]
    Allow,
    /// Cap the discount at the subtotal
    Clamp,
    /// Refuse to price the cart
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub promotions: PromoTable,
    pub negative_total: NegativeTotalPolicy,
}

/// Outcome of pricing one cart. All amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub line_items: Vec<PricedLineItem>,
    pub subtotal_minor: i64,
    pub discount_minor: i64,
    pub total_minor: i64,
}

/// Stateless cart pricer: normalize, price, discount.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn price(&self, items: &[CartItem], promo_code: Option<&str>) -> Result<PricingResult, PricingError> {
        if items.is_empty() {
            return Err(PricingError::EmptyCart);
        }

        let line_items = price_line_items(normalize(items)?)?;
        let subtotal_minor = subtotal(&line_items)?;
        let resolved = self.config.promotions.resolve(subtotal_minor, promo_code)?;

        let discount_minor = match self.config.negative_total {
            NegativeTotalPolicy::Allow => resolved,
            NegativeTotalPolicy::Clamp => resolved.min(subtotal_minor),
            NegativeTotalPolicy::Reject if resolved > subtotal_minor => {
                return Err(PricingError::NegativeTotal {
                    subtotal: subtotal_minor,
                    discount: resolved,
                });
            }
            NegativeTotalPolicy::Reject => resolved,
        };

        // subtotal >= 0 and discount >= 0, so this cannot overflow
        let total_minor = subtotal_minor - discount_minor;

        tracing::debug!(
            lines = line_items.len(),
            subtotal_minor,
            discount_minor,
            total_minor,
            "Priced cart"
        );

        Ok(PricingResult {
            line_items,
            subtotal_minor,
            discount_minor,
            total_minor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn engine_with(policy: NegativeTotalPolicy) -> PricingEngine {
        PricingEngine::new(PricingConfig {
            promotions: PromoTable::default(),
            negative_total: policy,
        })
    }

    #[test]
    fn test_duplicate_mug_without_code() {
        let items = vec![
            CartItem::new("Mug", dec!(9.99), 2),
            CartItem::new("Mug", dec!(9.99), 1),
        ];

        let result = PricingEngine::default().price(&items, None).unwrap();
        assert_eq!(result.line_items.len(), 1);
        assert_eq!(result.line_items[0].quantity, 3);
        assert_eq!(result.line_items[0].unit_amount, 999);
        assert_eq!(result.subtotal_minor, 2997);
        assert_eq!(result.discount_minor, 0);
        assert_eq!(result.total_minor, 2997);
    }

    #[test]
    fn test_percentage_code() {
        let items = vec![CartItem::new("Shirt", dec!(20.00), 1)];

        let result = PricingEngine::default().price(&items, Some("DISCOUNT10")).unwrap();
        assert_eq!(result.subtotal_minor, 2000);
        assert_eq!(result.discount_minor, 200);
        assert_eq!(result.total_minor, 1800);
    }

    #[test]
    fn test_flat_code_goes_negative_by_default() {
        let items = vec![CartItem::new("Pin", dec!(1.00), 1)];

        let result = PricingEngine::default().price(&items, Some("FLAT5")).unwrap();
        assert_eq!(result.subtotal_minor, 100);
        assert_eq!(result.discount_minor, 500);
        assert_eq!(result.total_minor, -400);
    }

    #[test]
    fn test_flat_code_clamped() {
        let items = vec![CartItem::new("Pin", dec!(1.00), 1)];

        let result = engine_with(NegativeTotalPolicy::Clamp).price(&items, Some("FLAT5")).unwrap();
        assert_eq!(result.discount_minor, 100);
        assert_eq!(result.total_minor, 0);
    }

    #[test]
    fn test_flat_code_rejected() {
        let items = vec![CartItem::new("Pin", dec!(1.00), 1)];

        let err = engine_with(NegativeTotalPolicy::Reject).price(&items, Some("FLAT5")).unwrap_err();
        assert!(matches!(err, PricingError::NegativeTotal { subtotal: 100, discount: 500 }));

        // Discounts that fit are unaffected
        let items = vec![CartItem::new("Hat", dec!(5.00), 1)];
        let result = engine_with(NegativeTotalPolicy::Reject).price(&items, Some("FLAT5")).unwrap();
        assert_eq!(result.total_minor, 0);
    }

    #[test]
    fn test_empty_cart() {
        assert!(matches!(PricingEngine::default().price(&[], None), Err(PricingError::EmptyCart)));
    }

    #[test]
    fn test_policy_parses_from_config_strings() {
        let policy: NegativeTotalPolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(policy, NegativeTotalPolicy::Clamp);
    }

    fn arb_cart() -> impl Strategy<Value = Vec<CartItem>> {
        proptest::collection::vec((0usize..5, 0i64..100_000, 1u32..50), 1..20).prop_map(|lines| {
            lines
                .into_iter()
                .map(|(n, cents, q)| CartItem::new(format!("item-{}", n), Decimal::new(cents, 2), q))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn total_is_subtotal_minus_discount(
            items in arb_cart(),
            code in prop_oneof![
                Just(None),
                Just(Some("DISCOUNT10")),
                Just(Some("FLAT5")),
                Just(Some("UNKNOWN")),
            ],
        ) {
            let engine = PricingEngine::default();
            let first = engine.price(&items, code).unwrap();
            prop_assert_eq!(first.total_minor, first.subtotal_minor - first.discount_minor);
            prop_assert!(first.discount_minor >= 0);

            let second = engine.price(&items, code).unwrap();
            prop_assert_eq!(first.subtotal_minor, second.subtotal_minor);
        }
    }
}
