use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use checkout_core::payment::{CheckoutSession, PaymentError, PaymentGateway, SessionLineItem, SessionRequest};
use checkout_pricing::PricingResult;

/// Drives the provider calls for one priced cart.
///
/// A discount becomes a provider coupon which the session then references.
/// If the session cannot be created the coupon is deleted again so it does
/// not linger unattached.
pub struct SessionOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    call_timeout: Duration,
}

impl SessionOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>, call_timeout: Duration) -> Self {
        Self {
            gateway,
            currency: currency.into(),
            call_timeout,
        }
    }

    /// Line items as the provider sees them.
    pub fn line_items(&self, pricing: &PricingResult) -> Vec<SessionLineItem> {
        pricing
            .line_items
            .iter()
            .map(|item| SessionLineItem {
                name: item.name.clone(),
                image: item.image.clone(),
                unit_amount: item.unit_amount,
                quantity: item.quantity,
            })
            .collect()
    }

    pub async fn open_session(&self, pricing: &PricingResult) -> Result<CheckoutSession, PaymentError> {
        let coupon = if pricing.discount_minor > 0 {
            let coupon = self
                .bounded(self.gateway.create_coupon(pricing.discount_minor, &self.currency))
                .await?;
            tracing::debug!("Created coupon {} for {} minor units", coupon.id, coupon.amount_off);
            Some(coupon)
        } else {
            None
        };

        let request = SessionRequest {
            currency: self.currency.clone(),
            line_items: self.line_items(pricing),
            coupon_id: coupon.as_ref().map(|c| c.id.clone()),
        };

        match self.bounded(self.gateway.create_session(&request)).await {
            Ok(session) => {
                tracing::info!("Opened checkout session {}", session.id);
                Ok(session)
            }
            Err(err) => {
                if let Some(coupon) = coupon {
                    match self.bounded(self.gateway.delete_coupon(&coupon.id)).await {
                        Ok(()) => tracing::info!("Released coupon {} after failed session", coupon.id),
                        Err(cleanup) => {
                            tracing::warn!("Failed to release coupon {}: {}", coupon.id, cleanup)
                        }
                    }
                }
                Err(err)
            }
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, PaymentError>>) -> Result<T, PaymentError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| PaymentError::Timeout(self.call_timeout))?
    }
}
