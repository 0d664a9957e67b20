use std::sync::Arc;

use checkout_pricing::PricingEngine;
use checkout_session::SessionOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingEngine>,
    pub sessions: Arc<SessionOrchestrator>,
    /// Directory served for every path without a route (success/cancel pages)
    pub static_dir: String,
}

impl AppState {
    pub fn new(pricing: PricingEngine, sessions: SessionOrchestrator, static_dir: impl Into<String>) -> Self {
        Self {
            pricing: Arc::new(pricing),
            sessions: Arc::new(sessions),
            static_dir: static_dir.into(),
        }
    }
}
