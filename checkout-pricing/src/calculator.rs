use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::normalizer::NormalizedLineItem;
use crate::PricingError;

/// A merged line with its unit price converted to minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLineItem {
    pub name: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub unit_amount: i64,
}

impl PricedLineItem {
    pub fn line_total(&self) -> Option<i64> {
        self.unit_amount.checked_mul(i64::from(self.quantity))
    }
}

/// Convert a major-unit price to minor units, rounding half away from zero.
pub fn to_minor_units(price: Decimal) -> Option<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Round each distinct item once; everything after this is integer math.
pub fn price_line_items(items: Vec<NormalizedLineItem>) -> Result<Vec<PricedLineItem>, PricingError> {
    items
        .into_iter()
        .map(|item| {
            let unit_amount = to_minor_units(item.price).ok_or_else(|| {
                PricingError::AmountOverflow(format!("unit price of {}", item.name))
            })?;

            Ok(PricedLineItem {
                name: item.name,
                image: item.image,
                price: item.price,
                quantity: item.quantity,
                unit_amount,
            })
        })
        .collect()
}

/// Sum of `unit_amount * quantity` over all lines.
pub fn subtotal(items: &[PricedLineItem]) -> Result<i64, PricingError> {
    items.iter().try_fold(0i64, |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| PricingError::AmountOverflow("subtotal".to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(9.99), 999)]
    #[case(dec!(20.00), 2000)]
    #[case(dec!(20), 2000)]
    #[case(dec!(0), 0)]
    #[case(dec!(1.005), 101)]
    #[case(dec!(1.004), 100)]
    #[case(dec!(0.125), 13)]
    fn test_to_minor_units(#[case] price: Decimal, #[case] expected: i64) {
        assert_eq!(to_minor_units(price), Some(expected));
    }

    #[test]
    fn test_rounds_once_per_item_not_per_unit() {
        // 0.125 * 100 = 12.5 -> 13 per unit; rounding the line total instead would give 38
        let items = vec![NormalizedLineItem {
            name: "Sticker".to_string(),
            price: dec!(0.125),
            quantity: 3,
            image: None,
        }];

        let priced = price_line_items(items).unwrap();
        assert_eq!(priced[0].unit_amount, 13);
        assert_eq!(subtotal(&priced).unwrap(), 39);
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let items = vec![
            NormalizedLineItem { name: "Mug".into(), price: dec!(9.99), quantity: 3, image: None },
            NormalizedLineItem { name: "Shirt".into(), price: dec!(20.00), quantity: 1, image: None },
        ];

        let priced = price_line_items(items).unwrap();
        assert_eq!(subtotal(&priced).unwrap(), 2997 + 2000);
    }

    #[test]
    fn test_subtotal_overflow() {
        let items = vec![NormalizedLineItem {
            name: "Yacht".into(),
            price: Decimal::from(i64::MAX / 100),
            quantity: u32::MAX,
            image: None,
        }];

        let priced = price_line_items(items).unwrap();
        assert!(matches!(subtotal(&priced), Err(PricingError::AmountOverflow(_))));
    }

    #[test]
    fn test_unit_price_overflow() {
        let items = vec![NormalizedLineItem {
            name: "Planet".into(),
            price: Decimal::MAX,
            quantity: 1,
            image: None,
        }];

        assert!(matches!(price_line_items(items), Err(PricingError::AmountOverflow(_))));
    }
}
