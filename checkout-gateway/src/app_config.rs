use checkout_pricing::{NegativeTotalPolicy, PricingConfig, PromoTable, Promotion};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub checkout: CheckoutConfig,
    pub stripe: StripeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String { "public".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct CheckoutConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub negative_total: NegativeTotalPolicy,
    #[serde(default = "checkout_pricing::promotions::default_promotions")]
    pub promotions: Vec<Promotion>,
}

fn default_currency() -> String { "usd".to_string() }
fn default_timeout() -> u64 { 10 }

impl CheckoutConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            promotions: PromoTable::from_promotions(self.promotions.clone()),
            negative_total: self.negative_total,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(default = "default_countries")]
    pub allowed_countries: Vec<String>,
    #[serde(default = "default_payment_methods")]
    pub payment_method_types: Vec<String>,
    #[serde(default = "default_billing_collection")]
    pub billing_address_collection: String,
}

fn default_api_base() -> String { "https://api.stripe.com".to_string() }
fn default_countries() -> Vec<String> { vec!["US".to_string(), "CA".to_string()] }
fn default_payment_methods() -> Vec<String> { vec!["card".to_string()] }
fn default_billing_collection() -> String { "required".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `CHECKOUT__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("CHECKOUT").separator("__"))
            .set_override_option("stripe.secret_key", env::var("STRIPE_SECRET_KEY").ok())?
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_pricing::PromoRule;

    #[test]
    fn test_default_file_parses() {
        let config = Config::from_toml(include_str!("../../config/default.toml")).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.checkout.currency, "usd");
        assert_eq!(config.checkout.negative_total, NegativeTotalPolicy::Allow);
        assert_eq!(config.stripe.allowed_countries, vec!["US", "CA"]);
        assert_eq!(config.stripe.billing_address_collection, "required");
        assert!(config.stripe.secret_key.is_none());

        let table = config.checkout.pricing().promotions;
        assert_eq!(table.rule("DISCOUNT10"), Some(&PromoRule::Percent { percent: 10 }));
        assert_eq!(table.rule("FLAT5"), Some(&PromoRule::Flat { amount_off: 500 }));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 3000

            [checkout]
            negative_total = "clamp"

            [stripe]
            success_url = "https://shop.example.com/success.html"
            cancel_url = "https://shop.example.com/cancel.html"
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.checkout.negative_total, NegativeTotalPolicy::Clamp);
        assert_eq!(config.checkout.promotions.len(), 2);
        assert_eq!(config.stripe.api_base, "https://api.stripe.com");
        assert_eq!(config.stripe.payment_method_types, vec!["card"]);
    }
}
