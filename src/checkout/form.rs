//! Checkout form validation

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;
use smallvec::SmallVec;
use zeroize::Zeroizing;

#[expect(clippy::expect_used, reason = "patterns are literals covered by tests")]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));

#[expect(clippy::expect_used, reason = "patterns are literals covered by tests")]
static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip code regex"));

#[expect(clippy::expect_used, reason = "patterns are literals covered by tests")]
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("card number regex"));

#[expect(clippy::expect_used, reason = "patterns are literals covered by tests")]
static EXPIRATION_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiration date regex"));

#[expect(clippy::expect_used, reason = "patterns are literals covered by tests")]
static CVV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("cvv regex"));

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Street address
    Address,
    /// City
    City,
    /// ZIP code
    ZipCode,
    /// Card number
    CardNumber,
    /// Card expiration date (MM/YY)
    ExpirationDate,
    /// Card verification value
    Cvv,
}

impl FormField {
    /// Form input name of the field.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Address => "address",
            FormField::City => "city",
            FormField::ZipCode => "zipCode",
            FormField::CardNumber => "cardNumber",
            FormField::ExpirationDate => "expirationDate",
            FormField::Cvv => "cvv",
        }
    }

    /// Message shown next to the field when it is invalid.
    pub fn error_message(self) -> &'static str {
        match self {
            FormField::Name => "Name is required",
            FormField::Email => "Email is invalid",
            FormField::Address => "Address is required",
            FormField::City => "City is required",
            FormField::ZipCode => "Invalid ZIP code",
            FormField::CardNumber => "Invalid card number",
            FormField::ExpirationDate => "Invalid expiration date (MM/YY)",
            FormField::Cvv => "Invalid CVV",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-level validation failures. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: SmallVec<[FormField; 8]>,
}

impl ValidationErrors {
    /// Invalid fields, in form order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.fields.iter().copied()
    }

    /// Whether `field` failed validation.
    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }

    /// The message to show for `field`, if it failed validation.
    pub fn message(&self, field: FormField) -> Option<&'static str> {
        self.contains(field).then(|| field.error_message())
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field failed; never the case for errors returned by validation.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields().map(FormField::name).collect();

        write!(f, "invalid checkout form: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw checkout form input, as typed by the customer.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// ZIP code, `12345` or `12345-6789`
    pub zip_code: String,
    /// Card number, spaces allowed
    pub card_number: String,
    /// Expiration date, `MM/YY`
    pub expiration_date: String,
    /// Card verification value
    pub cvv: String,
}

impl fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .field("card_number", &"<redacted>")
            .field("expiration_date", &self.expiration_date)
            .field("cvv", &"<redacted>")
            .finish()
    }
}

impl CheckoutForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every invalid field.
    pub fn validate(&self) -> Result<ValidatedCheckout, ValidationErrors> {
        let card_number: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let checks = [
            (FormField::Name, !self.name.trim().is_empty()),
            (FormField::Email, EMAIL.is_match(&self.email)),
            (FormField::Address, !self.address.trim().is_empty()),
            (FormField::City, !self.city.trim().is_empty()),
            (FormField::ZipCode, ZIP_CODE.is_match(&self.zip_code)),
            (FormField::CardNumber, CARD_NUMBER.is_match(&card_number)),
            (
                FormField::ExpirationDate,
                EXPIRATION_DATE.is_match(&self.expiration_date),
            ),
            (FormField::Cvv, CVV.is_match(&self.cvv)),
        ];

        let fields: SmallVec<[FormField; 8]> = checks
            .into_iter()
            .filter_map(|(field, valid)| (!valid).then_some(field))
            .collect();

        if !fields.is_empty() {
            return Err(ValidationErrors { fields });
        }

        Ok(ValidatedCheckout {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.clone(),
            card_number: Zeroizing::new(card_number),
            expiration_date: self.expiration_date.clone(),
            cvv: Zeroizing::new(self.cvv.clone()),
        })
    }
}

/// Checkout details that passed validation.
///
/// Card data is wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct ValidatedCheckout {
    name: String,
    email: String,
    address: String,
    city: String,
    zip_code: String,
    card_number: Zeroizing<String>,
    expiration_date: String,
    cvv: Zeroizing<String>,
}

impl ValidatedCheckout {
    /// Customer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Customer email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Street address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// City.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// ZIP code.
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    /// Card number digits, spaces removed.
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// Expiration date, `MM/YY`.
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    /// Card verification value.
    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// Card number with all but the last four digits hidden.
    pub fn masked_card(&self) -> String {
        let last_four: String = self
            .card_number
            .chars()
            .skip(self.card_number.len().saturating_sub(4))
            .collect();

        format!("**** **** **** {last_four}")
    }
}

impl fmt::Debug for ValidatedCheckout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCheckout")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .field("card_number", &self.masked_card())
            .field("expiration_date", &self.expiration_date)
            .finish_non_exhaustive()
    }
}
