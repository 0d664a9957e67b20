pub mod normalizer;
pub mod calculator;
pub mod promotions;
pub mod engine;

pub use normalizer::{normalize, NormalizedLineItem};
pub use calculator::{price_line_items, subtotal, to_minor_units, PricedLineItem};
pub use promotions::{PromoRule, PromoTable, Promotion};
pub use engine::{NegativeTotalPolicy, PricingConfig, PricingEngine, PricingResult};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Discount of {discount} exceeds subtotal of {subtotal}")]
    NegativeTotal { subtotal: i64, discount: i64 },
}
