//! Recently viewed products
//!
//! A short, most-recent-first list of products the customer looked at, persisted
//! alongside the cart.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::{
    config::StorageConfig,
    products::Product,
    storage::{KeyValueStore, PersistError, load_json, save_json},
};

/// Default storage key for the recently viewed list.
pub const DEFAULT_RECENTLY_VIEWED_KEY: &str = "recentlyViewed";

/// Default number of products remembered.
pub const DEFAULT_RECENTLY_VIEWED_LIMIT: usize = 4;

/// Bounded, de-duplicated list of recently viewed products.
#[derive(Debug)]
pub struct RecentlyViewed<S: KeyValueStore> {
    storage: S,
    key: String,
    limit: usize,
    products: VecDeque<Product>,
}

impl<S: KeyValueStore> RecentlyViewed<S> {
    /// Restore the list from the default key with the default limit.
    pub fn load(storage: S) -> Self {
        Self::load_with(
            storage,
            DEFAULT_RECENTLY_VIEWED_KEY,
            DEFAULT_RECENTLY_VIEWED_LIMIT,
        )
    }

    /// Restore the list from `key`, keeping at most `limit` products (at least 1).
    ///
    /// Missing or corrupt data yields an empty list.
    pub fn load_with(storage: S, key: impl Into<String>, limit: usize) -> Self {
        let key = key.into();
        let limit = limit.max(1);

        let mut products = VecDeque::with_capacity(limit);

        let saved: Vec<Product> = load_json(&storage, &key).unwrap_or_default();

        for product in saved {
            if products.len() == limit {
                break;
            }

            if !products.iter().any(|p: &Product| p.id == product.id) {
                products.push_back(product);
            }
        }

        Self {
            storage,
            key,
            limit,
            products,
        }
    }

    /// Restore the list using the configured key and limit.
    pub fn from_config(storage: S, config: &StorageConfig) -> Self {
        Self::load_with(
            storage,
            config.recently_viewed_key.clone(),
            config.recently_viewed_limit,
        )
    }

    /// Products, most recently viewed first.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of remembered products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether nothing has been viewed.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Record a product view, moving it to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the list could not be saved. The in-memory list is
    /// updated regardless.
    pub fn record(&mut self, product: &Product) -> Result<(), PersistError> {
        self.products.retain(|p| p.id != product.id);
        self.products.push_front(product.clone());
        self.products.truncate(self.limit);

        debug!(product = %product.id, remembered = self.products.len(), "recorded product view");

        self.persist()
    }

    /// Forget every viewed product.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the stored list could not be removed.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.products.clear();

        self.storage.remove(&self.key).map_err(|err| {
            warn!(key = %self.key, error = %err, "failed to clear recently viewed products");

            PersistError::from(err)
        })
    }

    fn persist(&self) -> Result<(), PersistError> {
        save_json(&self.storage, &self.key, &self.products)
    }
}
