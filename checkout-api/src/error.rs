use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use checkout_core::payment::PaymentError;
use checkout_core::CoreError;
use checkout_pricing::PricingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    PaymentError(PaymentError),
    Anyhow(anyhow::Error),
}

impl AppError {
    /// Any unexpected failure; logged and answered with a generic 500
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Anyhow(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => {
                tracing::warn!("Rejected checkout request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::PaymentError(err) => {
                tracing::error!("Error creating session: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::PaymentError(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_error_is_generic_500() {
        let err = AppError::internal(std::io::Error::other("disk full"));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn test_anyhow_context_is_not_leaked() {
        let err: AppError = anyhow::anyhow!("secret key rejected").into();
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_pricing_error_is_client_error() {
        let (status, body) = render(PricingError::EmptyCart.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cart is empty");
    }
}
