//! Delivery options and their fees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Standard delivery fee in hundredths of a major unit (4.99).
pub const STANDARD_DELIVERY_FEE: i64 = 499;
/// Express delivery fee in hundredths of a major unit (9.99).
pub const EXPRESS_DELIVERY_FEE: i64 = 999;

/// How the order reaches the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOption {
    /// Tracked post; free above the configured threshold.
    #[default]
    Standard,
    /// Next-day courier.
    Express,
    /// Collect at the pharmacy counter.
    Pickup,
}

impl DeliveryOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOption::Standard => "standard",
            DeliveryOption::Express => "express",
            DeliveryOption::Pickup => "pickup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeliveryOption::Standard => "Standard Delivery",
            DeliveryOption::Express => "Express Delivery",
            DeliveryOption::Pickup => "In-store Pickup",
        }
    }

    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> &'static str {
        match self {
            DeliveryOption::Standard => "3-5 days",
            DeliveryOption::Express => "1 day",
            DeliveryOption::Pickup => "Ready in 2 hours",
        }
    }

    /// Whether a postal address is needed.
    pub fn requires_address(&self) -> bool {
        !matches!(self, DeliveryOption::Pickup)
    }

    /// Fee for an order with `subtotal`.
    ///
    /// Standard delivery is free once the subtotal reaches
    /// `free_standard_from` (in minor units).
    pub fn fee(&self, subtotal: Money, free_standard_from: Option<i64>) -> Money {
        let hundredths = match self {
            DeliveryOption::Standard => match free_standard_from {
                Some(threshold) if subtotal.amount_cents >= threshold => 0,
                _ => STANDARD_DELIVERY_FEE,
            },
            DeliveryOption::Express => EXPRESS_DELIVERY_FEE,
            DeliveryOption::Pickup => 0,
        };
        Money::from_hundredths(hundredths, subtotal.currency)
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliveryOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(DeliveryOption::Standard),
            "express" => Ok(DeliveryOption::Express),
            "pickup" => Ok(DeliveryOption::Pickup),
            other => Err(format!("unknown delivery option '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_standard_fee_waived_above_threshold() {
        let small = Money::new(4999, Currency::USD);
        let large = Money::new(5000, Currency::USD);

        assert_eq!(DeliveryOption::Standard.fee(small, Some(5000)).amount_cents, 499);
        assert_eq!(DeliveryOption::Standard.fee(large, Some(5000)).amount_cents, 0);
        assert_eq!(DeliveryOption::Standard.fee(large, None).amount_cents, 499);
    }

    #[test]
    fn test_express_and_pickup_fees() {
        let subtotal = Money::new(10_000, Currency::USD);
        assert_eq!(DeliveryOption::Express.fee(subtotal, Some(5000)).amount_cents, 999);
        assert!(DeliveryOption::Pickup.fee(subtotal, None).is_zero());
    }

    #[test]
    fn test_fees_scale_to_currency_decimals() {
        let subtotal = Money::new(1000, Currency::JPY);
        assert_eq!(DeliveryOption::Standard.fee(subtotal, None), Money::new(5, Currency::JPY));
        assert_eq!(DeliveryOption::Express.fee(subtotal, None), Money::new(10, Currency::JPY));

        let subtotal = Money::new(1000, Currency::GBP);
        assert_eq!(DeliveryOption::Express.fee(subtotal, None), Money::new(999, Currency::GBP));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Express".parse::<DeliveryOption>(), Ok(DeliveryOption::Express));
        assert!("drone".parse::<DeliveryOption>().is_err());
    }
}
