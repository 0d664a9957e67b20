use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use checkout_core::payment::{CheckoutSession, Coupon, PaymentError, PaymentGateway, SessionRequest};
use uuid::Uuid;

/// Offline gateway for running the service without provider credentials.
#[derive(Debug, Default)]
pub struct MockGateway {
    fail_sessions: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent session creation fail, e.g. to exercise coupon cleanup
    pub fn set_fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_coupon(&self, amount_off: i64, currency: &str) -> Result<Coupon, PaymentError> {
        Ok(Coupon {
            id: format!("coupon_mock_{}", Uuid::new_v4().simple()),
            amount_off,
            currency: currency.to_string(),
        })
    }

    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(PaymentError::Transport("Simulated payment gateway failure".into()));
        }

        tracing::debug!("Mock session for {} line items", request.line_items.len());
        let id = format!("cs_mock_{}", Uuid::new_v4().simple());
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.invalid/pay/{}", id)),
            id,
        })
    }

    async fn delete_coupon(&self, _coupon_id: &str) -> Result<(), PaymentError> {
        Ok(())
    }
}
