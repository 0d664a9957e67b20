use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use checkout_api::{app, AppState};
use checkout_core::PaymentGateway;
use checkout_gateway::{app_config::Config, MockGateway, StripeGateway};
use checkout_pricing::PricingEngine;
use checkout_session::SessionOrchestrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkout_api=debug,checkout_pricing=debug,checkout_session=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting checkout API on port {}", config.server.port);

    let timeout = config.checkout.request_timeout();
    let has_key = config.stripe.secret_key.as_deref().is_some_and(|key| !key.is_empty());
    let gateway: Arc<dyn PaymentGateway> = if has_key {
        Arc::new(StripeGateway::new(config.stripe.clone(), timeout).context("Failed to build Stripe client")?)
    } else {
        tracing::warn!("No Stripe secret key configured, using the offline mock gateway");
        Arc::new(MockGateway::new())
    };

    let pricing = PricingEngine::new(config.checkout.pricing());
    let sessions = SessionOrchestrator::new(gateway, config.checkout.currency.clone(), timeout);
    let app_state = AppState::new(pricing, sessions, config.server.static_dir.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Server running on http://localhost:{}", config.server.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state))
        .await
        .context("Server error")?;

    Ok(())
}
