use std::time::Duration;

use async_trait::async_trait;
use checkout_core::payment::{CheckoutSession, Coupon, PaymentError, PaymentGateway, SessionRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::app_config::StripeConfig;

type Form = Vec<(String, String)>;

/// Stripe Checkout over its form-encoded REST API.
pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
    secret_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CouponObject {
    id: String,
    amount_off: Option<i64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(config: StripeConfig, timeout: Duration) -> Result<Self, PaymentError> {
        let secret_key = config
            .secret_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PaymentError::Transport("no Stripe secret key configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            config,
            secret_key,
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// `/v1/coupons/{id}` with the id escaped as a single path segment
    fn coupon_url(&self, coupon_id: &str) -> Result<reqwest::Url, PaymentError> {
        let mut url = reqwest::Url::parse(&self.url("/v1/coupons"))
            .map_err(|e| PaymentError::Transport(format!("invalid api_base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::Transport("api_base cannot carry a path".to_string()))?
            .push(coupon_id);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> PaymentError {
        if err.is_timeout() {
            PaymentError::Timeout(self.timeout)
        } else {
            PaymentError::Transport(err.to_string())
        }
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &Form) -> Result<T, PaymentError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_coupon(&self, amount_off: i64, currency: &str) -> Result<Coupon, PaymentError> {
        let coupon: CouponObject = self
            .post_form("/v1/coupons", &coupon_form(amount_off, currency))
            .await?;

        Ok(Coupon {
            id: coupon.id,
            amount_off: coupon.amount_off.unwrap_or(amount_off),
            currency: coupon.currency.unwrap_or_else(|| currency.to_string()),
        })
    }

    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError> {
        let session: SessionObject = self
            .post_form("/v1/checkout/sessions", &session_form(&self.config, request))
            .await?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<(), PaymentError> {
        let response = self
            .client
            .delete(self.coupon_url(coupon_id)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let _: serde_json::Value = self.decode(response).await?;
        Ok(())
    }
}

fn coupon_form(amount_off: i64, currency: &str) -> Form {
    vec![
        ("amount_off".to_string(), amount_off.to_string()),
        ("currency".to_string(), currency.to_string()),
        ("duration".to_string(), "once".to_string()),
    ]
}

/// Flatten a session request into Stripe's bracketed form keys.
fn session_form(config: &StripeConfig, request: &SessionRequest) -> Form {
    let mut form: Form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), config.success_url.clone()),
        ("cancel_url".to_string(), config.cancel_url.clone()),
        ("billing_address_collection".to_string(), config.billing_address_collection.clone()),
    ];

    for (i, method) in config.payment_method_types.iter().enumerate() {
        form.push((format!("payment_method_types[{}]", i), method.clone()));
    }

    for (i, country) in config.allowed_countries.iter().enumerate() {
        form.push((format!("shipping_address_collection[allowed_countries][{}]", i), country.clone()));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        form.push((format!("{}[price_data][currency]", prefix), request.currency.clone()));
        form.push((format!("{}[price_data][unit_amount]", prefix), item.unit_amount.to_string()));
        form.push((format!("{}[price_data][product_data][name]", prefix), item.name.clone()));
        if let Some(image) = &item.image {
            form.push((format!("{}[price_data][product_data][images][0]", prefix), image.clone()));
        }
        form.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    if let Some(coupon_id) = &request.coupon_id {
        form.push(("discounts[0][coupon]".to_string(), coupon_id.clone()));
    }

    form
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .unwrap_or_else(|| body.to_string())
}
