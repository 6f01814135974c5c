//! Product catalog
//!
//! The catalog is fetched in full and filtered, sorted and paginated locally.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::warn;

use crate::products::{Product, ProductId};

#[cfg(feature = "http-catalog")]
pub mod http;
pub mod query;

#[cfg(feature = "http-catalog")]
pub use http::HttpCatalog;
pub use query::{ProductPage, ProductQuery, SortOrder, SortOrderError};

/// Message shown to customers when products cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch products. Please try again later.";

/// Errors that can occur when fetching products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP transport or deserialization error occurred.
    #[cfg(feature = "http-catalog")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The catalog answered with a body that is not a valid product record.
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The requested product does not exist.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The catalog is unavailable for another reason.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Message suitable for showing to the customer.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "Product not found.",
            _ => LOAD_FAILED_MESSAGE,
        }
    }
}

/// Source of product records.
#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Retrieves every product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog could not be reached or read.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Retrieves a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown ids, otherwise as
    /// [`fetch_products`](Self::fetch_products).
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, CatalogError>;
}

/// Fetch the full catalog and apply `query` to it.
///
/// On failure the error is returned as-is; no partial or previously fetched page is
/// substituted.
///
/// # Errors
///
/// Returns the [`CatalogError`] raised by the catalog.
pub async fn browse<C: ProductCatalog + ?Sized>(
    catalog: &C,
    query: &ProductQuery,
) -> Result<ProductPage, CatalogError> {
    let products = catalog
        .fetch_products()
        .await
        .inspect_err(|err| warn!(error = %err, "failed to fetch products"))?;

    Ok(query.apply(&products))
}

/// Distinct, non-empty categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();

    for product in products {
        let category = product.category.as_str();

        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }

    seen
}
