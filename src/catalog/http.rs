//! HTTP product catalog

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::{
    catalog::{CatalogError, ProductCatalog},
    config::CatalogConfig,
    products::{Product, ProductId},
};

/// Product catalog served by a JSON REST API (`GET /products`, `GET /products/{id}`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    http: Client,
}

impl HttpCatalog {
    /// Create a catalog client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a catalog client reusing an existing HTTP client.
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { base_url, http }
    }

    /// Create a catalog client from configuration.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// URL listing every product.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    /// URL of a single product.
    pub fn product_url(&self, id: &ProductId) -> String {
        format!("{}/products/{id}", self.base_url)
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.products_url();

        debug!(%url, "fetching products");

        let response = ensure_success(self.http.get(&url).send().await?).await?;
        let products: Vec<Product> = response.json().await?;

        debug!(count = products.len(), "fetched products");

        Ok(products)
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let url = self.product_url(id);

        debug!(%url, "fetching product");

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.clone()));
        }

        let body = ensure_success(response).await?.text().await?;

        parse_product(id, &body)
    }
}

/// Decode a single-product body. Some APIs answer an unknown id with `200` and an
/// empty or `null` body.
fn parse_product(id: &ProductId, body: &str) -> Result<Product, CatalogError> {
    let body = body.trim();

    if body.is_empty() || body == "null" {
        return Err(CatalogError::NotFound(id.clone()));
    }

    Ok(serde_json::from_str(body)?)
}

async fn ensure_success(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(CatalogError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slashes() {
        let catalog = HttpCatalog::new("https://fakestoreapi.com/");

        assert_eq!(catalog.products_url(), "https://fakestoreapi.com/products");
        assert_eq!(
            catalog.product_url(&ProductId::from(3)),
            "https://fakestoreapi.com/products/3"
        );
    }

    #[test]
    fn from_config_uses_base_url() {
        let catalog = HttpCatalog::from_config(&CatalogConfig::default());

        assert_eq!(catalog.products_url(), "https://fakestoreapi.com/products");
    }

    #[test]
    fn empty_or_null_body_is_not_found() {
        let id = ProductId::from(7);

        for body in ["", "  ", "null"] {
            let result = parse_product(&id, body);

            assert!(
                matches!(&result, Err(CatalogError::NotFound(found)) if *found == id),
                "expected not found for {body:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn malformed_body_keeps_the_decode_error() {
        let result = parse_product(&ProductId::from(7), r#"{"id": 7, "title": }"#);

        assert!(
            matches!(&result, Err(CatalogError::Decode(err)) if err.is_syntax()),
            "expected decode error, got {result:?}"
        );
        assert_eq!(
            result.as_ref().err().map(CatalogError::user_message),
            Some("Failed to fetch products. Please try again later.")
        );
    }

    #[test]
    fn valid_body_parses() -> testresult::TestResult {
        let product = parse_product(
            &ProductId::from(7),
            r#"{"id": 7, "title": "Lamp", "price": 19.99}"#,
        )?;

        assert_eq!(product.title, "Lamp");

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_catalog_is_an_http_error() {
        // Port 9 (discard) is closed on test hosts, so the connection is refused.
        let catalog = HttpCatalog::new("http://127.0.0.1:9");

        let err = catalog.fetch_products().await.err();

        assert!(
            matches!(err, Some(CatalogError::Http(_))),
            "expected http error, got {err:?}"
        );
    }
}
