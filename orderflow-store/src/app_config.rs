use serde::Deserialize;
use std::env;
use orderflow_core::{Channel, PaymentTag};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingRules,
    #[serde(default)]
    pub payments: PaymentSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Tax and shipping rules, in decimal major units
#[derive(Debug, Deserialize, Clone)]
pub struct PricingRules {
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: f64,
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: f64,
}

fn default_tax_rate() -> f64 { 0.23 }
fn default_shipping_fee() -> f64 { 9.99 }
fn default_free_shipping_threshold() -> f64 { 100.0 }

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            shipping_fee: default_shipping_fee(),
            free_shipping_threshold: default_free_shipping_threshold(),
        }
    }
}

/// Payment methods to register at startup
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_methods")]
    pub enabled: Vec<PaymentTag>,
}

fn default_payment_methods() -> Vec<PaymentTag> {
    vec![PaymentTag::Card, PaymentTag::Paypal, PaymentTag::Crypto, PaymentTag::ApplePay]
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self { enabled: default_payment_methods() }
    }
}

/// Notification channels to register at startup
#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    #[serde(default = "default_channels")]
    pub enabled: Vec<Channel>,
}

fn default_channels() -> Vec<Channel> {
    vec![Channel::Email, Channel::Sms]
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { enabled: default_channels() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// ORDERFLOW__STORAGE__BACKEND=postgres, ORDERFLOW__PAYMENTS__ENABLED=card,paypal
fn environment() -> config::Environment {
    config::Environment::with_prefix("ORDERFLOW")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("payments.enabled")
        .with_list_parse_key("notifications.enabled")
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        s.try_deserialize()
    }

    /// Build from a single TOML document, without files or environment
    pub fn from_toml(document: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
