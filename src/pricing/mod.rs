//! Pricing
//!
//! Turns a cart, a shipping method and an optional promo code into an
//! [`OrderSummary`]:
//!
//! - `subtotal = Σ price × quantity`
//! - `tax = subtotal × tax rate`
//! - `total = max(0, subtotal + shipping + tax - discount)`
//!
//! Arithmetic saturates at [`Decimal::MAX`] rather than overflowing.

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, USD};
use tracing::warn;

use crate::{
    cart::Cart,
    config::{ConfigError, StorefrontConfig},
    promotions::PromoCodes,
};

pub mod shipping;
pub mod summary;

pub use shipping::{ShippingMethod, ShippingRates};
pub use summary::{OrderSummary, PromoStatus};

/// Pricing rules: currency, tax rate, shipping fees and promo codes.
#[derive(Debug, Clone)]
pub struct Pricing {
    currency: &'static Currency,
    tax_rate: Decimal,
    shipping: ShippingRates,
    promo_codes: PromoCodes,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            currency: USD,
            tax_rate: Decimal::new(10, 2),
            shipping: ShippingRates::default(),
            promo_codes: PromoCodes::new().with_code("DISCOUNT20", Decimal::new(20, 0)),
        }
    }
}

impl Pricing {
    /// Creates pricing rules.
    pub fn new(
        currency: &'static Currency,
        tax_rate: Decimal,
        shipping: ShippingRates,
        promo_codes: PromoCodes,
    ) -> Self {
        Self {
            currency,
            tax_rate,
            shipping,
            promo_codes,
        }
    }

    /// Build pricing rules from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown currency, a tax rate outside `0..=1`
    /// or a negative fee or discount.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ConfigError> {
        let currency = config.currency()?;

        if config.tax_rate.is_sign_negative() || config.tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidTaxRate(config.tax_rate));
        }

        ensure_not_negative("standard shipping fee", config.shipping.standard)?;
        ensure_not_negative("express shipping fee", config.shipping.express)?;

        let mut promo_codes = PromoCodes::new();

        for (code, amount) in &config.promo_codes {
            ensure_not_negative(&format!("discount for promo code {code}"), *amount)?;

            promo_codes.insert(code, *amount);
        }

        Ok(Self::new(
            currency,
            config.tax_rate,
            config.shipping.clone().into(),
            promo_codes,
        ))
    }

    /// Currency every amount is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Fraction of the subtotal charged as tax.
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Shipping fee table.
    pub fn shipping_rates(&self) -> &ShippingRates {
        &self.shipping
    }

    /// Known promo codes.
    pub fn promo_codes(&self) -> &PromoCodes {
        &self.promo_codes
    }

    /// Compute the order totals for `cart`.
    ///
    /// Unknown shipping keys are charged at the standard rate. A blank promo code
    /// counts as not submitted; an unknown one applies no discount and is reported
    /// through [`OrderSummary::promo_error`].
    pub fn summarise(&self, cart: &Cart, shipping_key: &str, promo: Option<&str>) -> OrderSummary {
        let shipping_method = ShippingMethod::from_key(shipping_key);
        let subtotal = cart.subtotal();
        let shipping = self.shipping.fee(shipping_method);
        let tax = subtotal.saturating_mul(self.tax_rate);

        let promo = match promo.map(str::trim).filter(|code| !code.is_empty()) {
            None => PromoStatus::NotSubmitted,
            Some(code) => match self.promo_codes.validate(code) {
                Ok(applied) => PromoStatus::Applied(applied),
                Err(err) => {
                    warn!(code, "rejected promo code");

                    PromoStatus::Rejected(err)
                }
            },
        };

        let discount = match &promo {
            PromoStatus::Applied(applied) => applied.amount,
            PromoStatus::NotSubmitted | PromoStatus::Rejected(_) => Decimal::ZERO,
        };

        let total = subtotal
            .saturating_add(shipping)
            .saturating_add(tax)
            .saturating_sub(discount)
            .max(Decimal::ZERO);

        OrderSummary {
            subtotal,
            shipping,
            tax,
            discount,
            total,
            shipping_method,
            promo,
            currency: self.currency,
        }
    }
}

/// Compute order totals for `cart` with the given pricing rules.
///
/// See [`Pricing::summarise`].
pub fn compute_summary(
    pricing: &Pricing,
    cart: &Cart,
    shipping_key: &str,
    promo: Option<&str>,
) -> OrderSummary {
    pricing.summarise(cart, shipping_key, promo)
}

fn ensure_not_negative(what: &str, amount: Decimal) -> Result<(), ConfigError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::NegativeAmount(what.to_string()));
    }

    Ok(())
}
