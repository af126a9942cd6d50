//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::INR => "\u{20b9}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "INR" => Some(Currency::INR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from whole currency units (e.g., dollars).
    ///
    /// ```
    /// use pharmacy_commerce::money::{Money, Currency};
    /// let price = Money::from_major(10, Currency::USD);
    /// assert_eq!(price.amount_cents, 1000);
    /// ```
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(units.saturating_mul(currency.minor_per_major()), currency)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use pharmacy_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(12.49, Currency::USD);
    /// assert_eq!(price.amount_cents, 1249);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a Money value from hundredths of a major unit (499 = 4.99).
    ///
    /// Currencies with fewer decimal places round half up, so 4.99 becomes
    /// 5 yen.
    ///
    /// ```
    /// use pharmacy_commerce::money::{Money, Currency};
    /// assert_eq!(Money::from_hundredths(499, Currency::USD).amount_cents, 499);
    /// assert_eq!(Money::from_hundredths(499, Currency::JPY).amount_cents, 5);
    /// ```
    pub fn from_hundredths(hundredths: i64, currency: Currency) -> Self {
        let scaled = i128::from(hundredths) * i128::from(currency.minor_per_major());
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        let amount = rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        Self::new(amount, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Subtract another Money value, returning None on currency mismatch or overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, clamping at the numeric bounds.
    pub fn saturating_multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }

    /// Calculate a share of this amount expressed in basis points (1/100 of a percent).
    ///
    /// Rounds half away from zero to the nearest minor unit.
    pub fn basis_points(&self, bps: u32) -> Option<Money> {
        let scaled = i128::from(self.amount_cents) * i128::from(bps);
        let rounded = if scaled >= 0 {
            (scaled + 5_000) / 10_000
        } else {
            (scaled - 5_000) / 10_000
        };
        i64::try_from(rounded)
            .ok()
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(10, Currency::USD);
        assert_eq!(m.amount_cents, 1000);

        let m = Money::from_major(10, Currency::JPY);
        assert_eq!(m.amount_cents, 10);
    }

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_cents, 4999);
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.display(), "$49.99");
        assert_eq!(m.to_string(), "$49.99");

        let m = Money::new(100, Currency::JPY);
        assert_eq!(m.display(), "\u{00a5}100");
    }

    #[test]
    fn test_money_try_add_rejects_mixed_currencies() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert_eq!(usd.try_add(&eur), None);
        assert_eq!(usd.try_add(&usd).unwrap().amount_cents, 2000);
    }

    #[test]
    fn test_money_multiply_overflow() {
        let m = Money::new(i64::MAX / 2, Currency::USD);
        assert!(m.try_multiply(3).is_none());
        assert_eq!(m.saturating_multiply(3).amount_cents, i64::MAX);
    }

    #[test]
    fn test_money_basis_points() {
        let m = Money::new(10_000, Currency::USD);
        assert_eq!(m.basis_points(825).unwrap().amount_cents, 825);

        // 8.25% of $0.99 = 8.1675 cents, rounds to 8
        let m = Money::new(99, Currency::USD);
        assert_eq!(m.basis_points(825).unwrap().amount_cents, 8);
    }

    #[test]
    fn test_money_try_sum() {
        let values = [
            Money::new(1000, Currency::USD),
            Money::new(250, Currency::USD),
        ];
        let total = Money::try_sum(values.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 1250);

        let empty: [Money; 0] = [];
        assert!(Money::try_sum(empty.iter(), Currency::EUR).unwrap().is_zero());

        let mixed = [Money::new(1, Currency::USD), Money::new(1, Currency::EUR)];
        assert_eq!(Money::try_sum(mixed.iter(), Currency::USD), None);
    }

    #[test]
    fn test_money_from_hundredths_follows_decimal_places() {
        assert_eq!(Money::from_hundredths(999, Currency::EUR).amount_cents, 999);
        assert_eq!(Money::from_hundredths(999, Currency::JPY).amount_cents, 10);
        assert_eq!(Money::from_hundredths(449, Currency::JPY).amount_cents, 4);
        assert_eq!(Money::from_hundredths(0, Currency::JPY).amount_cents, 0);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
