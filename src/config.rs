//! Storefront configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is a valid
//! configuration.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Tax rate outside `0..=1`
    #[error("Tax rate must be between 0 and 1, got {0}")]
    InvalidTaxRate(Decimal),

    /// Negative monetary amount
    #[error("{0} must not be negative")]
    NegativeAmount(String),

    /// Page size of zero
    #[error("Catalog page size must be at least 1")]
    InvalidPageSize,
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// ISO currency code for all prices
    pub currency: String,

    /// Tax rate as a fraction of the subtotal, e.g. `0.10`
    pub tax_rate: Decimal,

    /// Shipping fees
    pub shipping: ShippingConfig,

    /// Promo code → flat discount
    pub promo_codes: FxHashMap<String, Decimal>,

    /// Persistent storage settings
    pub storage: StorageConfig,

    /// Product catalog settings
    pub catalog: CatalogConfig,

    /// Checkout settings
    pub checkout: CheckoutConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let mut promo_codes = FxHashMap::default();
        promo_codes.insert("DISCOUNT20".to_string(), Decimal::new(20, 0));

        Self {
            currency: "USD".to_string(),
            tax_rate: Decimal::new(10, 2),
            shipping: ShippingConfig::default(),
            promo_codes,
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            checkout: CheckoutConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or contains unknown fields.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_norway::from_str(yaml)?)
    }

    /// Resolve the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes other than GBP, USD and EUR.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        parse_currency(&self.currency)
    }
}

/// Shipping fee per method.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShippingConfig {
    /// Standard delivery fee
    pub standard: Decimal,

    /// Express delivery fee
    pub express: Decimal,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            standard: Decimal::new(5, 0),
            express: Decimal::new(15, 0),
        }
    }
}

/// Storage keys and limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Key holding the serialized cart
    pub cart_key: String,

    /// Key holding the recently viewed products
    pub recently_viewed_key: String,

    /// Maximum number of recently viewed products kept
    pub recently_viewed_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_key: "cart".to_string(),
            recently_viewed_key: "recentlyViewed".to_string(),
            recently_viewed_limit: 4,
        }
    }
}

/// Product catalog settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base URL of the product API
    pub base_url: String,

    /// Products shown per page
    pub per_page: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fakestoreapi.com".to_string(),
            per_page: 8,
        }
    }
}

impl CatalogConfig {
    /// Check the page size is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPageSize`] when `per_page` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(())
    }
}

/// Checkout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckoutConfig {
    /// How long the simulated gateway takes to "process" an order
    pub processing_delay_ms: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Compact,

    /// Structured JSON output
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(ConfigError::UnknownCurrency(code.to_string())),
    }
}
