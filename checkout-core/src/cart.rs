use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Cart entry exactly as the storefront sends it.
///
/// Every field is optional on the wire so that a missing name or quantity is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItemPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub image: Option<String>,
}

/// A validated cart entry. Price is in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Validate a single wire entry. `index` is only used in error messages.
    pub fn from_payload(index: usize, payload: CartItemPayload) -> CoreResult<Self> {
        let name = match payload.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(invalid(index, "name is required")),
        };

        let price = payload.price.ok_or_else(|| invalid(index, "price is required"))?;
        if price < Decimal::ZERO {
            return Err(invalid(index, "price must not be negative"));
        }

        let quantity = payload
            .quantity
            .ok_or_else(|| invalid(index, "quantity is required"))?;
        if quantity < 1 {
            return Err(invalid(index, "quantity must be at least 1"));
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| invalid(index, "quantity is too large"))?;

        // Storefronts send "" for products without artwork
        let image = payload.image.filter(|url| !url.is_empty());

        Ok(Self {
            name,
            price,
            quantity,
            image,
        })
    }
}

/// Validate a whole cart. An empty cart is rejected.
pub fn validate_items(payloads: Vec<CartItemPayload>) -> CoreResult<Vec<CartItem>> {
    if payloads.is_empty() {
        return Err(CoreError::ValidationError("cart is empty".to_string()));
    }

    payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| CartItem::from_payload(index, payload))
        .collect()
}

fn invalid(index: usize, reason: &str) -> CoreError {
    CoreError::ValidationError(format!("items[{}]: {}", index, reason))
}
