use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One priced line of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLineItem {
    pub name: String,
    pub image: Option<String>,
    /// Unit price in minor units (cents)
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything the provider needs to open a payable session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub currency: String,
    pub line_items: Vec<SessionLineItem>,
    /// Provider coupon to apply, if a discount was granted
    pub coupon_id: Option<String>,
}

/// A one-off fixed-amount discount registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub amount_off: i64,
    pub currency: String,
}

/// Provider-issued handle for a pending payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider unreachable: {0}")]
    Transport(String),

    #[error("Payment provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Payment provider returned an unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Payment provider did not answer within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a fixed-amount coupon (amount in minor units)
    async fn create_coupon(&self, amount_off: i64, currency: &str) -> Result<Coupon, PaymentError>;

    /// Open a checkout session for the given line items
    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError>;

    /// Remove a coupon that never got attached to a session
    async fn delete_coupon(&self, coupon_id: &str) -> Result<(), PaymentError>;
}
