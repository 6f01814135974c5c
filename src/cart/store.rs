//! Cart store
//!
//! Owns the session's cart and mirrors every change into a [`KeyValueStore`].

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError, CartLineItem},
    config::StorageConfig,
    products::{Product, ProductId},
    storage::{KeyValueStore, PersistError, load_json, save_json},
};

/// Default storage key for the serialized cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Authoritative cart state for a session, synchronised with persistent storage.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    storage: S,
    key: String,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restore the cart saved under the default key.
    ///
    /// Never fails: missing, unreadable or corrupt data yields an empty cart.
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, DEFAULT_CART_KEY)
    }

    /// Restore the cart saved under `key`.
    ///
    /// Never fails: missing, unreadable or corrupt data yields an empty cart.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_json::<_, Vec<CartLineItem>>(&storage, &key)
            .map(Cart::from_items)
            .unwrap_or_default();

        Self { storage, key, cart }
    }

    /// Restore the cart saved under the configured key.
    pub fn from_config(storage: S, config: &StorageConfig) -> Self {
        Self::load_with_key(storage, config.cart_key.clone())
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Find the line for `id`.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.cart.get(id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Total number of units in the cart.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of price × quantity.
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Storage key the cart is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add `quantity` units of `product`, merging with an existing line for the same id.
    ///
    /// A quantity of 0 adds a single unit.
    ///
    /// # Errors
    ///
    /// - [`CartError::NegativePrice`]: the product is priced below zero; nothing changes.
    /// - [`CartError::Persist`]: the updated cart could not be saved. The item is added
    ///   regardless.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if product.price.is_sign_negative() && !product.price.is_zero() {
            warn!(product = %product.id, price = %product.price, "refusing product with negative price");

            return Err(CartError::NegativePrice {
                id: product.id.clone(),
                price: product.price,
            });
        }

        self.cart.add(product, quantity);

        debug!(product = %product.id, quantity, lines = self.cart.len(), "added item to cart");

        Ok(self.persist()?)
    }

    /// Set the quantity of the line for `id` to `max(1, quantity)`.
    ///
    /// Does nothing when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the updated cart could not be saved. The quantity is
    /// changed regardless.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), PersistError> {
        if !self.cart.set_quantity(id, quantity) {
            debug!(product = %id, "quantity update for product not in cart");

            return Ok(());
        }

        debug!(product = %id, quantity, "updated cart quantity");

        self.persist()
    }

    /// Remove the line for `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the updated cart could not be saved. The line is
    /// removed regardless.
    pub fn remove_item(&mut self, id: &ProductId) -> Result<(), PersistError> {
        let removed = self.cart.remove(id);

        debug!(product = %id, removed, "removed item from cart");

        self.persist()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the empty cart could not be saved. The cart is
    /// emptied regardless.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.cart.clear();

        debug!("cleared cart");

        self.persist()
    }

    fn persist(&self) -> Result<(), PersistError> {
        save_json(&self.storage, &self.key, &self.cart)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::{MemoryStore, StorageError};

    use super::*;

    fn product(id: u64, cents: i64) -> Product {
        Product::new(id, format!("Product {id}"), Decimal::new(cents, 2))
    }

    /// Store whose reads and writes always fail.
    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required: 1,
                quota: 0,
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn load_missing_key_is_empty() {
        let store = CartStore::load(MemoryStore::new());

        assert!(store.is_empty());
        assert_eq!(store.key(), DEFAULT_CART_KEY);
    }

    #[test]
    fn load_corrupt_json_is_empty() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(DEFAULT_CART_KEY, "{not json")?;

        let store = CartStore::load(&storage);

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn load_read_failure_is_empty() {
        let store = CartStore::load(BrokenStore);

        assert!(store.is_empty());
    }

    #[test]
    fn mutations_are_persisted() -> TestResult {
        let storage = MemoryStore::new();

        let mut store = CartStore::load(&storage);
        store.add_item(&product(1, 2999), 2)?;

        let restored = CartStore::load(&storage);

        assert_eq!(restored.cart(), store.cart());
        assert_eq!(restored.item_count(), 2);

        Ok(())
    }

    #[test]
    fn custom_key_is_used() -> TestResult {
        let storage = MemoryStore::new();

        let mut store = CartStore::load_with_key(&storage, "basket");
        store.add_item(&product(1, 100), 1)?;

        assert!(storage.get("basket")?.is_some());
        assert_eq!(storage.get(DEFAULT_CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn write_failure_still_mutates_in_memory() {
        let mut store = CartStore::load(BrokenStore);

        let result = store.add_item(&product(1, 100), 1);

        assert!(
            matches!(
                result,
                Err(CartError::Persist(PersistError::Storage(StorageError::QuotaExceeded { .. })))
            ),
            "expected persist warning, got {result:?}"
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_quantity_missing_line_does_not_write() -> TestResult {
        let storage = MemoryStore::new();

        let mut store = CartStore::load(&storage);
        store.update_quantity(&ProductId::from(9), 3)?;

        assert_eq!(storage.get(DEFAULT_CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn clear_persists_empty_cart() -> TestResult {
        let storage = MemoryStore::new();

        let mut store = CartStore::load(&storage);
        store.add_item(&product(1, 100), 1)?;
        store.clear()?;

        assert!(store.is_empty());
        assert_eq!(storage.get(DEFAULT_CART_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected_without_writing() -> TestResult {
        let storage = MemoryStore::new();
        let mut store = CartStore::load(&storage);

        let result = store.add_item(&product(1, -5000), 1);

        assert!(
            matches!(&result, Err(CartError::NegativePrice { price, .. }) if *price == Decimal::new(-50, 0)),
            "expected negative price error, got {result:?}"
        );
        assert!(store.is_empty());
        assert_eq!(storage.get(DEFAULT_CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn load_drops_negative_priced_lines() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(
            DEFAULT_CART_KEY,
            r#"[
                {"id":1,"title":"A","price":-50.0,"image":"","quantity":1},
                {"id":2,"title":"B","price":12.5,"image":"","quantity":2}
            ]"#,
        )?;

        let store = CartStore::load(&storage);

        assert_eq!(store.len(), 1);
        assert_eq!(store.subtotal(), Decimal::new(25, 0));

        Ok(())
    }

    #[test]
    fn oversized_saved_cart_does_not_overflow() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(
            DEFAULT_CART_KEY,
            r#"[{"id":1,"title":"A","price":1e20,"image":"","quantity":1}]"#,
        )?;

        let mut store = CartStore::load(&storage);
        store.update_quantity(&ProductId::from(1), i64::MAX)?;

        assert_eq!(store.subtotal(), Decimal::MAX);

        Ok(())
    }

    #[test]
    fn load_normalises_saved_cart() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(
            DEFAULT_CART_KEY,
            r#"[
                {"id":1,"title":"A","price":1.5,"image":"","quantity":0},
                {"id":1,"title":"A","price":1.5,"image":"","quantity":2}
            ]"#,
        )?;

        let store = CartStore::load(&storage);

        assert_eq!(store.len(), 1);
        assert_eq!(store.item_count(), 3);

        Ok(())
    }
}
