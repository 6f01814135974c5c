//! Order summary

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::shipping::ShippingMethod,
    promotions::{AppliedPromo, PromoCodeError},
};

/// What happened to the promo code submitted with an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoStatus {
    /// No code was submitted
    NotSubmitted,

    /// The code was recognised and its discount applied
    Applied(AppliedPromo),

    /// The code was not recognised; no discount applied
    Rejected(PromoCodeError),
}

/// Derived order totals. Amounts are exact; see [`OrderSummary::amount_due`] for the
/// figure rounded to the currency's minor unit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub(crate) subtotal: Decimal,
    pub(crate) shipping: Decimal,
    pub(crate) tax: Decimal,
    pub(crate) discount: Decimal,
    pub(crate) total: Decimal,
    pub(crate) shipping_method: ShippingMethod,
    pub(crate) promo: PromoStatus,
    pub(crate) currency: &'static Currency,
}

impl OrderSummary {
    /// Sum of price × quantity over all lines.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Flat shipping fee.
    pub fn shipping(&self) -> Decimal {
        self.shipping
    }

    /// Tax on the subtotal.
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Promo discount, zero unless a recognised code was applied.
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// `subtotal + shipping + tax - discount`, never below zero.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Shipping method the fee was taken from.
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Outcome of the submitted promo code.
    pub fn promo(&self) -> &PromoStatus {
        &self.promo
    }

    /// The promo code rejection to show the customer, if any.
    pub fn promo_error(&self) -> Option<&PromoCodeError> {
        match &self.promo {
            PromoStatus::Rejected(err) => Some(err),
            PromoStatus::NotSubmitted | PromoStatus::Applied(_) => None,
        }
    }

    /// Currency of every amount in the summary.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total rounded half away from zero to the currency's minor unit.
    pub fn amount_due(&self) -> Decimal {
        self.total
            .round_dp_with_strategy(self.currency.exponent, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Subtotal as money.
    pub fn subtotal_money(&self) -> Money<'static, Currency> {
        Money::from_decimal(self.subtotal, self.currency)
    }

    /// Exact total as money.
    pub fn total_money(&self) -> Money<'static, Currency> {
        Money::from_decimal(self.total, self.currency)
    }

    /// Amount due as money.
    pub fn amount_due_money(&self) -> Money<'static, Currency> {
        Money::from_decimal(self.amount_due(), self.currency)
    }
}
