use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::PricingError;

/// What a recognized promo code grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromoRule {
    /// Percentage of the subtotal, rounded half-up to a whole minor unit
    Percent { percent: u32 },
    /// Fixed amount in minor units, independent of subtotal and currency
    Flat { amount_off: u32 },
}

impl PromoRule {
    pub fn discount_for(&self, subtotal: i64) -> Result<i64, PricingError> {
        match *self {
            PromoRule::Percent { percent } => subtotal
                .checked_mul(i64::from(percent))
                .and_then(|scaled| scaled.checked_add(50))
                .map(|scaled| scaled / 100)
                .ok_or_else(|| PricingError::AmountOverflow("percentage discount".to_string())),
            PromoRule::Flat { amount_off } => Ok(i64::from(amount_off)),
        }
    }
}

/// One configured promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub code: String,
    #[serde(flatten)]
    pub rule: PromoRule,
}

/// Static lookup from promo code to discount rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoTable {
    rules: HashMap<String, PromoRule>,
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::from_promotions(default_promotions())
    }
}

impl PromoTable {
    pub fn from_promotions(promotions: Vec<Promotion>) -> Self {
        let rules = promotions
            .into_iter()
            .map(|promotion| (promotion.code, promotion.rule))
            .collect();
        Self { rules }
    }

    pub fn rule(&self, code: &str) -> Option<&PromoRule> {
        self.rules.get(code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Discount in minor units for `code`. Unknown, empty or absent codes give 0.
    ///
    /// Matching is exact: no trimming, no case folding. The result is not
    /// clamped to the subtotal.
    pub fn resolve(&self, subtotal: i64, code: Option<&str>) -> Result<i64, PricingError> {
        match code.and_then(|code| self.rules.get(code)) {
            Some(rule) => rule.discount_for(subtotal),
            None => Ok(0),
        }
    }
}

pub fn default_promotions() -> Vec<Promotion> {
    vec![
        Promotion {
            code: "DISCOUNT10".to_string(),
            rule: PromoRule::Percent { percent: 10 },
        },
        Promotion {
            code: "FLAT5".to_string(),
            rule: PromoRule::Flat { amount_off: 500 },
        },
    ]
}
