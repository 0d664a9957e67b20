pub mod app_config;
pub mod stripe;
pub mod mock;

pub use stripe::StripeGateway;
pub use mock::MockGateway;
