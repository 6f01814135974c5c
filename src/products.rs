//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier.
///
/// Catalogs hand out either numeric or string identifiers, so both are accepted and
/// serialized back in the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier, e.g. `1`
    Number(u64),

    /// String identifier, e.g. `"sku-123"`
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(id) => write!(f, "{id}"),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Text(id)
    }
}

/// Customer rating summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, usually between 0 and 5
    pub rate: f64,

    /// Number of ratings
    pub count: u32,
}

/// Product, as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Catalog category
    #[serde(default)]
    pub category: String,

    /// Customer rating
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Creates a product with the given identifier, title and price, leaving the rest empty.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: String::new(),
            description: String::new(),
            category: String::new(),
            rating: Rating::default(),
        }
    }
}
