//! Checkout
//!
//! Validates the checkout form, prices the cart, hands the order to a
//! [`CheckoutGateway`] and clears the cart once the gateway accepts it.

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::CartStore,
    pricing::{Pricing, PromoStatus},
    promotions::PromoCodeError,
    storage::KeyValueStore,
};

pub mod form;
pub mod gateway;

pub use form::{CheckoutForm, FormField, ValidatedCheckout, ValidationErrors};
pub use gateway::{
    CheckoutGateway, GatewayError, MockCheckoutGateway, OrderConfirmation, OrderRequest,
    SimulatedGateway,
};

/// Generic message shown when an order could not be placed.
pub const RETRY_MESSAGE: &str = "Something went wrong while placing your order. Please try again.";

/// Reasons an order was not placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// One or more form fields are invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The submitted promo code is not valid.
    #[error(transparent)]
    Promo(#[from] PromoCodeError),

    /// The gateway refused or failed to process the order.
    #[error("order submission failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    /// Message suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
            CheckoutError::Invalid(_) => "Please correct the highlighted fields.".to_string(),
            CheckoutError::Promo(err) => err.to_string(),
            CheckoutError::Gateway(_) => RETRY_MESSAGE.to_string(),
        }
    }
}

/// Places orders through a gateway.
#[derive(Debug, Clone)]
pub struct Checkout<G: CheckoutGateway> {
    gateway: G,
    pricing: Pricing,
}

impl<G: CheckoutGateway> Checkout<G> {
    /// Creates a checkout using `gateway` and `pricing`.
    pub fn new(gateway: G, pricing: Pricing) -> Self {
        Self { gateway, pricing }
    }

    /// Pricing rules used for orders.
    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// Validate, price and submit the cart held by `cart`.
    ///
    /// On success the cart is cleared; failing to save the cleared cart is logged but
    /// does not fail the order. On any error the cart is left untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no items.
    /// - [`CheckoutError::Invalid`]: form validation failed; nothing was submitted.
    /// - [`CheckoutError::Promo`]: the promo code is not recognised.
    /// - [`CheckoutError::Gateway`]: the gateway did not accept the order.
    pub async fn place_order<S: KeyValueStore>(
        &self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
        shipping_key: &str,
        promo: Option<&str>,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer = form.validate()?;
        let summary = self.pricing.summarise(cart.cart(), shipping_key, promo);

        if let PromoStatus::Rejected(err) = summary.promo() {
            return Err(err.clone().into());
        }

        let order = OrderRequest {
            order_id: Uuid::now_v7(),
            customer,
            lines: cart.cart().items().to_vec(),
            summary,
        };

        let order_id = order.order_id;

        let confirmation = self
            .gateway
            .submit(order)
            .await
            .inspect_err(|err| warn!(%order_id, error = %err, "order submission failed"))?;

        info!(
            order_id = %confirmation.order_id,
            amount = %confirmation.amount_charged,
            "order placed"
        );

        if let Err(err) = cart.clear() {
            warn!(%order_id, error = %err, "order placed but the emptied cart was not saved");
        }

        Ok(confirmation)
    }
}
