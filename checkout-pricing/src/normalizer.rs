use std::collections::HashMap;

use checkout_core::CartItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PricingError;

/// All cart lines sharing one product name, merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLineItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
}

impl From<&CartItem> for NormalizedLineItem {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}

/// Merge cart items by name.
///
/// Quantities are summed. Price and image come from the last occurrence of a
/// name. Output keeps the order in which each name was first seen.
pub fn normalize(items: &[CartItem]) -> Result<Vec<NormalizedLineItem>, PricingError> {
    let mut merged: Vec<NormalizedLineItem> = Vec::with_capacity(items.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match positions.get(item.name.as_str()) {
            Some(&pos) => {
                let entry = &mut merged[pos];
                entry.quantity = entry.quantity.checked_add(item.quantity).ok_or_else(|| {
                    PricingError::AmountOverflow(format!("quantity of {}", item.name))
                })?;
                entry.price = item.price;
                entry.image = item.image.clone();
            }
            None => {
                positions.insert(item.name.as_str(), merged.len());
                merged.push(NormalizedLineItem::from(item));
            }
        }
    }

    Ok(merged)
}
