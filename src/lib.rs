//! Storefront
//!
//! Storefront is the client-side core of a small online shop: a persisted shopping cart,
//! order pricing with shipping, tax and promo codes, a recently viewed list, product
//! catalog browsing and a simulated checkout.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod recently_viewed;
pub mod storage;
