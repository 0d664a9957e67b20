use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use checkout_core::cart::{validate_items, CartItemPayload};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckoutSessionResponse {
    pub id: String,
}

/// POST /create-checkout-session
/// Price the cart, apply the promo code and open a provider session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

    tracing::debug!("Received items: {:?}", req.items);
    tracing::debug!("Promo code: {:?}", req.promo_code);

    let items = validate_items(req.items)?;
    let pricing = state.pricing.price(&items, req.promo_code.as_deref())?;

    tracing::info!(
        subtotal = pricing.subtotal_minor,
        discount = pricing.discount_minor,
        total = pricing.total_minor,
        "Priced cart of {} line items",
        pricing.line_items.len()
    );

    let session = state.sessions.open_session(&pricing).await?;

    Ok(Json(CreateCheckoutSessionResponse { id: session.id }))
}
