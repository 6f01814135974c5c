//! Checkout gateway
//!
//! The boundary where a real payment provider would sit. [`SimulatedGateway`] waits a
//! fixed delay and accepts every order.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    cart::CartLineItem,
    checkout::form::ValidatedCheckout,
    config::CheckoutConfig,
    pricing::OrderSummary,
};

/// Order submitted to a gateway.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Identifier assigned to the order
    pub order_id: Uuid,

    /// Customer, shipping and card details
    pub customer: ValidatedCheckout,

    /// Purchased lines
    pub lines: Vec<CartLineItem>,

    /// Derived totals
    pub summary: OrderSummary,
}

impl OrderRequest {
    /// Amount the gateway should charge, rounded to the currency's minor unit.
    pub fn amount_due(&self) -> Decimal {
        self.summary.amount_due()
    }
}

/// Gateway acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Identifier of the placed order
    pub order_id: Uuid,

    /// Amount charged
    pub amount_charged: Decimal,

    /// When the order was accepted
    pub placed_at: Timestamp,
}

/// Errors returned by a [`CheckoutGateway`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The payment was refused.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The gateway could not be reached or failed internally.
    #[error("checkout gateway unavailable: {0}")]
    Unavailable(String),
}

/// Something that accepts orders and takes payment.
#[automock]
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Submit an order for payment.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the order was not accepted.
    async fn submit(&self, order: OrderRequest) -> Result<OrderConfirmation, GatewayError>;
}

/// Gateway that pretends to process each order for a fixed time, then accepts it.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::from_config(&CheckoutConfig::default())
    }
}

impl SimulatedGateway {
    /// Creates a gateway that takes `delay` to accept an order.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates a gateway using the configured processing delay.
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(Duration::from_millis(config.processing_delay_ms))
    }

    /// Processing delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedGateway {
    async fn submit(&self, order: OrderRequest) -> Result<OrderConfirmation, GatewayError> {
        info!(
            order_id = %order.order_id,
            email = order.customer.email(),
            card = %order.customer.masked_card(),
            lines = order.lines.len(),
            amount = %order.amount_due(),
            "processing order"
        );

        tokio::time::sleep(self.delay).await;

        Ok(OrderConfirmation {
            order_id: order.order_id,
            amount_charged: order.amount_due(),
            placed_at: Timestamp::now(),
        })
    }
}
