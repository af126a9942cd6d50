//! Order summary arithmetic and placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineItem};
use crate::checkout::{Address, Contact, DeliveryOption};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;

/// Default subtotal (in minor units) from which standard delivery is free.
pub const DEFAULT_FREE_STANDARD_FROM: i64 = 5000;

/// Knobs for the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Sales tax in basis points of the subtotal (825 = 8.25%).
    pub tax_basis_points: u32,
    /// Subtotal in minor units from which standard delivery is free.
    pub free_standard_from: Option<i64>,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_basis_points: 0,
            free_standard_from: Some(DEFAULT_FREE_STANDARD_FROM),
        }
    }
}

/// What the shopper pays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub item_count: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    /// subtotal + shipping + tax.
    pub grand_total: Money,
}

impl OrderSummary {
    /// Price `cart` for `delivery` under `rules`.
    pub fn calculate(
        cart: &Cart,
        delivery: DeliveryOption,
        rules: &PricingRules,
    ) -> Result<Self, CommerceError> {
        let pricing = cart.calculate_pricing()?;
        let subtotal = pricing.subtotal;
        let shipping = delivery.fee(subtotal, rules.free_standard_from);
        let tax = subtotal
            .basis_points(rules.tax_basis_points)
            .ok_or(CommerceError::Overflow)?;
        let grand_total = subtotal
            .try_add(&shipping)
            .and_then(|m| m.try_add(&tax))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            item_count: pricing.item_count,
            subtotal,
            shipping,
            tax,
            grand_total,
        })
    }
}

/// A placed order.
///
/// Orders are values handed back to the caller; nothing stores them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Lines copied from the cart at placement time.
    pub lines: Vec<LineItem>,
    pub summary: OrderSummary,
    pub contact: Contact,
    /// Delivery address; `None` for pickup.
    pub address: Option<Address>,
    pub delivery: DeliveryOption,
    /// Masked payment description.
    pub payment: String,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Number of units ordered.
    pub fn item_count(&self) -> i64 {
        self.summary.item_count
    }

    pub fn total(&self) -> Money {
        self.summary.grand_total
    }
}
