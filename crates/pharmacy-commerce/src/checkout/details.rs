//! Checkout form details and their validation.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::checkout::DeliveryOption;

/// Who the order is for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// A delivery address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Street line.
    pub line1: String,
    /// Apartment, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.as_str()];
        if let Some(ref line2) = self.line2 {
            parts.push(line2);
        }
        parts.extend([self.city.as_str(), self.postcode.as_str(), self.country.as_str()]);
        parts.join(", ")
    }
}

/// Card details as typed into the payment form.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentCard {
    /// Card number; spaces and dashes are allowed.
    pub number: String,
    /// Expiry as `MM/YY`.
    pub expiry: String,
}

impl PaymentCard {
    pub fn new(number: impl Into<String>, expiry: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            expiry: expiry.into(),
        }
    }

    /// Last four digits, for receipts.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCard")
            .field("number", &format_args!("**** {}", self.last_four()))
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// How the shopper pays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card(PaymentCard),
    CashOnDelivery,
}

impl PaymentMethod {
    /// Receipt line that never includes the full card number.
    pub fn summary(&self) -> String {
        match self {
            PaymentMethod::Card(card) => format!("Card ending {}", card.last_four()),
            PaymentMethod::CashOnDelivery => "Cash on delivery".to_string(),
        }
    }
}

/// Everything the checkout form collects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub contact: Contact,
    pub address: Address,
    pub delivery: DeliveryOption,
    pub payment: Option<PaymentMethod>,
}

/// One invalid form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, e.g. `contact.email`.
    pub field: String,
    /// Message shown next to the field.
    pub message: String,
}

/// Every invalid field found in one validation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check whether `field` failed.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Names of the failed fields in form order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl CheckoutDetails {
    /// Validate contact and, unless collecting in store, the address.
    pub fn validate_contact(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.check_contact(&mut errors);
        errors.into_result()
    }

    /// Validate the payment method against today's date.
    pub fn validate_payment(&self) -> Result<(), ValidationErrors> {
        self.validate_payment_at(Utc::now().date_naive())
    }

    /// Validate the payment method against `today`.
    pub fn validate_payment_at(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.check_payment(today, &mut errors);
        errors.into_result()
    }

    /// Validate the whole form.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_at(Utc::now().date_naive())
    }

    /// Validate the whole form against `today`.
    pub fn validate_at(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.check_contact(&mut errors);
        self.check_payment(today, &mut errors);
        errors.into_result()
    }

    fn check_contact(&self, errors: &mut ValidationErrors) {
        let contact = &self.contact;
        if contact.full_name.trim().is_empty() {
            errors.push("contact.full_name", "Full name is required");
        }
        if contact.email.trim().is_empty() {
            errors.push("contact.email", "Email is required");
        } else if !is_valid_email(contact.email.trim()) {
            errors.push("contact.email", "Enter a valid email address");
        }
        if contact.phone.trim().is_empty() {
            errors.push("contact.phone", "Phone number is required");
        } else if !is_valid_phone(&contact.phone) {
            errors.push("contact.phone", "Enter a valid phone number");
        }

        if !self.delivery.requires_address() {
            return;
        }
        let address = &self.address;
        for (field, value, label) in [
            ("address.line1", &address.line1, "Street address"),
            ("address.city", &address.city, "City"),
            ("address.postcode", &address.postcode, "Postcode"),
            ("address.country", &address.country, "Country"),
        ] {
            if value.trim().is_empty() {
                errors.push(field, format!("{label} is required"));
            }
        }
    }

    fn check_payment(&self, today: NaiveDate, errors: &mut ValidationErrors) {
        let card = match &self.payment {
            None => {
                errors.push("payment", "Choose a payment method");
                return;
            }
            Some(PaymentMethod::CashOnDelivery) => {
                if !self.delivery.requires_address() {
                    errors.push("payment", "Cash on delivery needs a delivery option");
                }
                return;
            }
            Some(PaymentMethod::Card(card)) => card,
        };

        if !is_valid_card_number(&card.number) {
            errors.push("payment.number", "Enter a valid card number");
        }
        match parse_expiry(&card.expiry) {
            None => errors.push("payment.expiry", "Use the format MM/YY"),
            Some((year, month)) if (year, month) < (today.year(), today.month()) => {
                errors.push("payment.expiry", "Card has expired")
            }
            Some(_) => {}
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

fn is_valid_phone(phone: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+');
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    phone.trim().chars().all(allowed) && (7..=15).contains(&digits)
}

fn is_valid_card_number(number: &str) -> bool {
    if !number.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return false;
    }
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    (12..=19).contains(&digits.len()) && luhn(&digits)
}

fn luhn(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Parse `MM/YY` into a four-digit year and month.
fn parse_expiry(expiry: &str) -> Option<(i32, u32)> {
    let (month, year) = expiry.trim().split_once('/')?;
    if month.len() != 2 || year.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((2000 + year, month))
}
