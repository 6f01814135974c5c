//! Promo codes

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Promo code validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoCodeError {
    /// The submitted code is not a known promotion.
    #[error("Promo code {0:?} is not valid")]
    Unrecognised(String),
}

/// A validated promo code and the flat discount it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPromo {
    /// Canonical (upper-case) code
    pub code: String,

    /// Flat discount amount
    pub amount: Decimal,
}

/// Known promo codes, each granting a flat discount.
///
/// Codes are matched case-insensitively after trimming surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct PromoCodes {
    codes: FxHashMap<String, Decimal>,
}

impl PromoCodes {
    /// Creates an empty set of codes; every submission will be rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code` with a flat discount of `amount`.
    #[must_use]
    pub fn with_code(mut self, code: &str, amount: Decimal) -> Self {
        self.insert(code, amount);
        self
    }

    /// Register `code` with a flat discount of `amount`, replacing any existing entry.
    pub fn insert(&mut self, code: &str, amount: Decimal) {
        self.codes.insert(normalise(code), amount);
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no codes are known.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Look up a submitted code.
    ///
    /// # Errors
    ///
    /// Returns [`PromoCodeError::Unrecognised`] if the code is unknown.
    pub fn validate(&self, code: &str) -> Result<AppliedPromo, PromoCodeError> {
        let canonical = normalise(code);

        self.codes
            .get(&canonical)
            .map(|amount| AppliedPromo {
                code: canonical.clone(),
                amount: *amount,
            })
            .ok_or_else(|| PromoCodeError::Unrecognised(code.trim().to_string()))
    }
}

impl<'a> FromIterator<(&'a str, Decimal)> for PromoCodes {
    fn from_iter<I: IntoIterator<Item = (&'a str, Decimal)>>(iter: I) -> Self {
        let mut codes = PromoCodes::new();

        for (code, amount) in iter {
            codes.insert(code, amount);
        }

        codes
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn codes() -> PromoCodes {
        PromoCodes::new().with_code("DISCOUNT20", Decimal::new(20, 0))
    }

    #[test]
    fn known_code_is_applied() -> TestResult {
        let applied = codes().validate("DISCOUNT20")?;

        assert_eq!(applied.code, "DISCOUNT20");
        assert_eq!(applied.amount, Decimal::new(20, 0));

        Ok(())
    }

    #[test]
    fn matching_ignores_case_and_whitespace() -> TestResult {
        let applied = codes().validate("  discount20 ")?;

        assert_eq!(applied.code, "DISCOUNT20");

        Ok(())
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(
            codes().validate(" XYZ "),
            Err(PromoCodeError::Unrecognised("XYZ".to_string()))
        );
    }

    #[test]
    fn collects_from_pairs() {
        let codes: PromoCodes = [("a", Decimal::ONE), ("A", Decimal::TWO), ("b", Decimal::TEN)]
            .into_iter()
            .collect();

        assert_eq!(codes.len(), 2);
        assert_eq!(codes.validate("a").map(|p| p.amount), Ok(Decimal::TWO));
    }
}
