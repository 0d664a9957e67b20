pub mod cart;
pub mod payment;

pub use cart::{CartItem, CartItemPayload};
pub use payment::{CheckoutSession, Coupon, PaymentError, PaymentGateway, SessionLineItem, SessionRequest};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
