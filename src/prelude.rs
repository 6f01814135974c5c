//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

#[cfg(feature = "http-catalog")]
pub use crate::catalog::HttpCatalog;
pub use crate::{
    cart::{Cart, CartError, CartLineItem, CartStore},
    catalog::{
        CatalogError, ProductCatalog, ProductPage, ProductQuery, SortOrder, SortOrderError, browse,
    },
    checkout::{
        Checkout, CheckoutError, CheckoutForm, CheckoutGateway, FormField, GatewayError,
        OrderConfirmation, OrderRequest, SimulatedGateway, ValidatedCheckout, ValidationErrors,
    },
    config::{ConfigError, StorefrontConfig},
    logging::LoggingError,
    pricing::{OrderSummary, Pricing, PromoStatus, ShippingMethod, ShippingRates},
    products::{Product, ProductId, Rating},
    promotions::{AppliedPromo, PromoCodeError, PromoCodes},
    recently_viewed::RecentlyViewed,
    storage::{FileStore, KeyValueStore, MemoryStore, PersistError, StorageError},
};
