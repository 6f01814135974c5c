//! Client-side product queries

use std::{cmp::Ordering, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use thiserror::Error;

use crate::{
    config::{CatalogConfig, ConfigError},
    products::Product,
};

/// Default number of products per page.
pub const DEFAULT_PER_PAGE: usize = 8;

/// Product listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Alphabetical by title
    #[default]
    Name,

    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,

    /// Best rated first
    Rating,
}

/// Sort key parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortOrderError {
    /// The key is not one of `name`, `price_asc`, `price_desc` or `rating`.
    #[error("unknown sort order: {0}")]
    Unknown(String),
}

impl FromStr for SortOrder {
    type Err = SortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(SortOrder::Name),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "rating" => Ok(SortOrder::Rating),
            other => Err(SortOrderError::Unknown(other.to_string())),
        }
    }
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortOrder::PriceAsc => a.price.cmp(&b.price),
            SortOrder::PriceDesc => b.price.cmp(&a.price),
            SortOrder::Rating => b.rating.rate.total_cmp(&a.rating.rate),
        }
    }
}

/// Search, filter, sort and pagination options for a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the title
    pub search: Option<String>,

    /// Exact category, case-insensitive
    pub category: Option<String>,

    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,

    /// Listing order
    pub sort: SortOrder,

    /// 1-based page number
    pub page: usize,

    /// Products per page, at least 1
    pub per_page: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            max_price: None,
            sort: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Products on this page
    pub products: Vec<Product>,

    /// 1-based page number
    pub page: usize,

    /// Number of pages for the whole listing
    pub total_pages: usize,

    /// Products matching the filters across all pages
    pub total_matches: usize,
}

impl ProductPage {
    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

impl ProductQuery {
    /// Query for the first page of everything, sorted by name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query for the first page using the configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPageSize`] when the configured page size is zero.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self::new().per_page(config.per_page))
    }

    /// Filter by title substring. A blank term matches everything.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter by category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Only include products at or below `price`.
    #[must_use]
    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Order the listing.
    #[must_use]
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Select a page (1-based; 0 is treated as 1).
    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Products per page (at least 1).
    #[must_use]
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Whether `product` passes the search and filters.
    pub fn matches(&self, product: &Product) -> bool {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        if let Some(term) = search {
            if !product.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        self.max_price.is_none_or(|max| product.price <= max)
    }

    /// Filter, sort and paginate `products`.
    pub fn apply(&self, products: &[Product]) -> ProductPage {
        let per_page = self.per_page.max(1);
        let page = self.page.max(1);

        let mut matching: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();

        matching.sort_by(|a, b| self.sort.compare(a, b));

        let total_matches = matching.len();

        ProductPage {
            products: matching
                .into_iter()
                .skip((page - 1).saturating_mul(per_page))
                .take(per_page)
                .cloned()
                .collect(),
            page,
            total_pages: total_matches.div_ceil(per_page),
            total_matches,
        }
    }
}
