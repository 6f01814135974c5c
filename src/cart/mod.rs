//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    products::{Product, ProductId},
    storage::PersistError,
};

pub mod store;

pub use store::CartStore;

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product's price is below zero; the cart was not changed.
    #[error("product {id} has a negative price ({price})")]
    NegativePrice {
        /// Product that was rejected
        id: ProductId,

        /// Its price
        price: Decimal,
    },

    /// The change was applied in memory but could not be saved.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier, unique within the cart
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Number of units, always at least 1
    pub quantity: u32,
}

impl CartLineItem {
    /// Creates a line for `product` with the given quantity, clamped to at least 1.
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: quantity.max(1),
        }
    }

    /// Price multiplied by quantity, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered list of cart line items, at most one per product.
///
/// Serializes as a plain JSON array. Saved carts are restored through
/// [`Cart::from_items`], which re-establishes the invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw line items, restoring the cart invariants.
    ///
    /// Quantities of 0 become 1, lines sharing an id are merged into the first one and
    /// lines with a negative price are dropped.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Cart::new();

        for mut item in items {
            if item.price.is_sign_negative() && !item.price.is_zero() {
                warn!(product = %item.id, price = %item.price, "dropping line with negative price");

                continue;
            }

            item.quantity = item.quantity.max(1);

            match cart.get_mut(&item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }

        cart
    }

    /// Line items in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Iterate over the line items.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Find the line for `id`.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity over all lines, saturating at [`Decimal::MAX`].
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub(crate) fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);

        match self.get_mut(&product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.items.push(CartLineItem::new(product, quantity)),
        }
    }

    /// Returns `true` when the line exists.
    pub(crate) fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        let Some(existing) = self.get_mut(id) else {
            return false;
        };

        existing.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        true
    }

    /// Returns `true` when a line was removed.
    pub(crate) fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| &item.id != id);

        self.items.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
