//! Shipping methods

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ShippingConfig;

/// Flat-fee delivery option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Base delivery option, also used when an unknown method is requested
    #[default]
    Standard,

    /// Faster, pricier delivery
    Express,
}

impl ShippingMethod {
    /// Every available method, in display order.
    pub const ALL: [ShippingMethod; 2] = [ShippingMethod::Standard, ShippingMethod::Express];

    /// Resolve a method key, falling back to [`ShippingMethod::Standard`] when the key
    /// is not recognised.
    pub fn from_key(key: &str) -> Self {
        Self::parse(key).unwrap_or_default()
    }

    /// Resolve a method key, returning `None` when the key is not recognised.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(ShippingMethod::Standard),
            "express" => Some(ShippingMethod::Express),
            _ => None,
        }
    }

    /// Key used in forms and storage.
    pub fn key(self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fee for each shipping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRates {
    standard: Decimal,
    express: Decimal,
}

impl ShippingRates {
    /// Creates a rate table.
    pub fn new(standard: Decimal, express: Decimal) -> Self {
        Self { standard, express }
    }

    /// Fee charged for `method`.
    pub fn fee(&self, method: ShippingMethod) -> Decimal {
        match method {
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        ShippingConfig::default().into()
    }
}

impl From<ShippingConfig> for ShippingRates {
    fn from(config: ShippingConfig) -> Self {
        Self::new(config.standard, config.express)
    }
}
