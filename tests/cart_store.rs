//! Integration tests for the persisted cart and order pricing.
//!
//! Scenario: a customer adds a £29.99 mouse and two £49.99 backpacks, then checks the
//! order summary.
//!
//! - Subtotal: 29.99 + 2 × 49.99 = 129.97
//! - Tax (10%): 12.997, not rounded
//! - Standard shipping: 5.00
//! - DISCOUNT20: 20.00 off
//! - Total: 129.97 + 5 + 12.997 - 20 = 127.967, charged as 127.97

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use testresult::TestResult;

use storefront::{
    cart::{CartError, CartStore},
    pricing::{Pricing, PromoStatus, ShippingMethod},
    products::{Product, ProductId},
    promotions::PromoCodeError,
    storage::{FileStore, KeyValueStore, MemoryStore},
};

fn mouse() -> Product {
    Product::new(1, "Wireless Mouse", Decimal::new(2999, 2))
}

fn backpack() -> Product {
    Product::new(2, "Backpack", Decimal::new(4999, 2))
}

#[test]
fn cart_scenario_totals() -> TestResult {
    let storage = MemoryStore::new();
    let mut cart = CartStore::load(&storage);

    cart.add_item(&mouse(), 1)?;
    cart.add_item(&backpack(), 1)?;
    cart.add_item(&backpack(), 1)?;

    assert_eq!(cart.len(), 2, "backpacks should share one line");
    assert_eq!(cart.item_count(), 3);

    let summary = Pricing::default().summarise(cart.cart(), "standard", Some("DISCOUNT20"));

    assert_eq!(summary.subtotal(), Decimal::new(12997, 2));
    assert_eq!(summary.tax(), Decimal::new(12997, 3));
    assert_eq!(summary.shipping(), Decimal::new(5, 0));
    assert_eq!(summary.discount(), Decimal::new(20, 0));
    assert_eq!(summary.total(), Decimal::new(127_967, 3));
    assert_eq!(summary.amount_due(), Decimal::new(12797, 2));

    Ok(())
}

#[test]
fn adding_the_same_product_twice_merges_lines() -> TestResult {
    let mut cart = CartStore::load(MemoryStore::new());
    let product = Product::new(5, "Hard drive", Decimal::new(64, 0));

    cart.add_item(&product, 1)?;
    cart.add_item(&product, 1)?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(&ProductId::from(5)).map(|item| item.quantity), Some(2));

    Ok(())
}

#[test]
fn express_shipping_without_promo() -> TestResult {
    let mut cart = CartStore::load(MemoryStore::new());

    cart.add_item(&mouse(), 2)?;

    let summary = Pricing::default().summarise(cart.cart(), "express", None);

    assert_eq!(summary.shipping_method(), ShippingMethod::Express);
    assert_eq!(summary.shipping(), Decimal::new(15, 0));
    assert_eq!(summary.discount(), Decimal::ZERO);
    assert_eq!(summary.promo(), &PromoStatus::NotSubmitted);
    assert_eq!(summary.total(), Decimal::new(80_978, 3));

    Ok(())
}

#[test]
fn unrecognised_promo_is_reported_and_ignored() -> TestResult {
    let mut cart = CartStore::load(MemoryStore::new());

    cart.add_item(&mouse(), 1)?;

    let summary = Pricing::default().summarise(cart.cart(), "standard", Some("XYZ"));

    assert_eq!(summary.discount(), Decimal::ZERO);
    assert_eq!(
        summary.promo_error(),
        Some(&PromoCodeError::Unrecognised("XYZ".to_string()))
    );

    Ok(())
}

#[test]
fn quantity_updates_clamp_and_ignore_missing_products() -> TestResult {
    let storage = MemoryStore::new();
    let mut cart = CartStore::load(&storage);

    cart.add_item(&mouse(), 3)?;
    cart.update_quantity(&ProductId::from(1), 0)?;

    assert_eq!(cart.item_count(), 1, "quantity should clamp to 1");

    cart.update_quantity(&ProductId::from(1), -7)?;
    cart.update_quantity(&ProductId::from(42), 5)?;

    assert_eq!(cart.item_count(), 1);
    assert!(cart.get(&ProductId::from(42)).is_none());

    cart.update_quantity(&ProductId::from(1), 4)?;

    assert_eq!(CartStore::load(&storage).item_count(), 4);

    Ok(())
}

#[test]
fn removing_last_item_leaves_an_empty_saved_cart() -> TestResult {
    let storage = MemoryStore::new();
    let mut cart = CartStore::load(&storage);

    cart.add_item(&mouse(), 1)?;
    cart.remove_item(&ProductId::from(1))?;
    cart.remove_item(&ProductId::from(1))?;

    assert!(cart.is_empty());
    assert_eq!(storage.get("cart")?.as_deref(), Some("[]"));

    Ok(())
}

#[test]
fn cart_survives_a_restart_on_disk() -> TestResult {
    let dir = tempfile::tempdir()?;

    {
        let mut cart = CartStore::load(FileStore::new(dir.path()));

        cart.add_item(&mouse(), 1)?;
        cart.add_item(&backpack(), 2)?;
    }

    let cart = CartStore::load(FileStore::new(dir.path()));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.subtotal(), Decimal::new(12997, 2));
    assert!(dir.path().join("cart.json").exists());

    Ok(())
}

#[test]
fn corrupt_saved_cart_starts_empty() -> TestResult {
    let storage = MemoryStore::new();

    storage.set("cart", "{not json")?;

    let mut cart = CartStore::load(&storage);

    assert!(cart.is_empty());

    cart.add_item(&mouse(), 1)?;

    assert_eq!(CartStore::load(&storage).len(), 1);

    Ok(())
}

#[test]
fn full_storage_keeps_the_in_memory_change() {
    let storage = MemoryStore::with_quota(8);
    let mut cart = CartStore::load(&storage);

    let result = cart.add_item(&mouse(), 1);

    assert!(result.is_err(), "saving should exceed the quota");
    assert_eq!(cart.len(), 1);
    assert!(CartStore::load(&storage).is_empty());
}

#[test]
fn negative_catalog_price_is_refused() -> TestResult {
    let storage = MemoryStore::new();
    let mut cart = CartStore::load(&storage);

    cart.add_item(&mouse(), 1)?;

    let result = cart.add_item(&Product::new(3, "Refund", Decimal::new(-1999, 2)), 1);

    assert!(
        matches!(result, Err(CartError::NegativePrice { .. })),
        "expected negative price error"
    );
    assert_eq!(CartStore::load(&storage).len(), 1);

    Ok(())
}

#[test]
fn saved_negative_price_is_dropped_before_pricing() -> TestResult {
    let storage = MemoryStore::new();

    storage.set("cart", r#"[{"id":1,"title":"A","price":-50.0,"quantity":1}]"#)?;

    let cart = CartStore::load(&storage);
    let summary = Pricing::default().summarise(cart.cart(), "standard", None);

    assert!(cart.is_empty());
    assert_eq!(summary.subtotal(), Decimal::ZERO);
    assert_eq!(summary.tax(), Decimal::ZERO);

    Ok(())
}

#[test]
fn extreme_quantities_price_without_panicking() -> TestResult {
    let storage = MemoryStore::new();

    storage.set("cart", r#"[{"id":1,"title":"A","price":1e20,"quantity":1}]"#)?;

    let mut cart = CartStore::load(&storage);
    cart.update_quantity(&ProductId::from(1), i64::MAX)?;

    let summary = Pricing::default().summarise(cart.cart(), "express", Some("DISCOUNT20"));

    assert_eq!(cart.subtotal(), Decimal::MAX);
    assert!(summary.total() > Decimal::ZERO);

    Ok(())
}

fn product_strategy() -> impl Strategy<Value = Product> {
    (1u64..6, 1i64..100_000).prop_map(|(id, cents)| {
        Product::new(id, format!("Product {id}"), Decimal::new(cents, 2))
    })
}

proptest! {
    /// Adding always increases the unit count by the clamped quantity
    #[test]
    fn adding_accumulates_units(
        adds in prop::collection::vec((product_strategy(), 0u32..20), 1..20)
    ) {
        let mut cart = CartStore::load(MemoryStore::new());
        let mut expected = 0u64;

        for (product, quantity) in &adds {
            prop_assert!(cart.add_item(product, *quantity).is_ok());
            expected += u64::from((*quantity).max(1));
        }

        let distinct_ids: HashSet<&ProductId> = adds.iter().map(|(product, _)| &product.id).collect();

        prop_assert_eq!(cart.item_count(), expected);
        prop_assert_eq!(cart.len(), distinct_ids.len());
        prop_assert!(cart.cart().iter().all(|item| item.quantity >= 1));
    }

    /// Quantity updates never leave a line below 1
    #[test]
    fn updates_clamp_to_one(quantity in any::<i64>()) {
        let mut cart = CartStore::load(MemoryStore::new());

        prop_assert!(cart.add_item(&mouse(), 1).is_ok());
        prop_assert!(cart.update_quantity(&ProductId::from(1), quantity).is_ok());

        let line = cart.get(&ProductId::from(1));

        prop_assert!(line.is_some_and(|item| item.quantity >= 1));
    }

    /// Removing twice is the same as removing once
    #[test]
    fn remove_is_idempotent(products in prop::collection::vec(product_strategy(), 1..10), id in 1u64..6) {
        let mut once = CartStore::load(MemoryStore::new());
        let mut twice = CartStore::load(MemoryStore::new());

        for product in &products {
            prop_assert!(once.add_item(product, 1).is_ok());
            prop_assert!(twice.add_item(product, 1).is_ok());
        }

        let id = ProductId::from(id);

        prop_assert!(once.remove_item(&id).is_ok());
        prop_assert!(twice.remove_item(&id).is_ok());
        prop_assert!(twice.remove_item(&id).is_ok());

        prop_assert_eq!(once.cart(), twice.cart());
    }

    /// The total follows the pricing formula and is never negative
    #[test]
    fn total_matches_formula(
        products in prop::collection::vec(product_strategy(), 0..8),
        express in any::<bool>(),
        promo in any::<bool>(),
    ) {
        let mut cart = CartStore::load(MemoryStore::new());

        for product in &products {
            prop_assert!(cart.add_item(product, 1).is_ok());
        }

        let shipping_key = if express { "express" } else { "standard" };
        let promo = promo.then_some("DISCOUNT20");

        let summary = Pricing::default().summarise(cart.cart(), shipping_key, promo);

        let expected = (summary.subtotal() + summary.shipping() + summary.tax() - summary.discount())
            .max(Decimal::ZERO);

        prop_assert_eq!(summary.tax(), summary.subtotal() * Decimal::new(10, 2));
        prop_assert_eq!(summary.total(), expected);
        prop_assert!(summary.total() >= Decimal::ZERO);
    }

    /// What is saved is what is loaded
    #[test]
    fn saved_cart_reloads_unchanged(adds in prop::collection::vec((product_strategy(), 1u32..5), 0..10)) {
        let storage = MemoryStore::new();
        let mut cart = CartStore::load(&storage);

        for (product, quantity) in &adds {
            prop_assert!(cart.add_item(product, *quantity).is_ok());
        }

        let reloaded = CartStore::load(&storage);

        prop_assert_eq!(reloaded.cart(), cart.cart());
    }
}
