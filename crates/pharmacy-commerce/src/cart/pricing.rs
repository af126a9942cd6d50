//! Cart pricing calculations.

use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Checked pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Units across all lines.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Per-line-item pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Find the breakdown for one item.
    pub fn line(&self, id: &ItemId) -> Option<&LineItemPricing> {
        self.line_items.iter().find(|l| &l.item_id == id)
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Line item ID.
    pub item_id: ItemId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// unit_price * quantity.
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_line_lookup() {
        let pricing = CartPricing {
            item_count: 2,
            subtotal: Money::new(2000, Currency::USD),
            line_items: vec![LineItemPricing {
                item_id: ItemId::new("item-1"),
                unit_price: Money::new(1000, Currency::USD),
                quantity: 2,
                total: Money::new(2000, Currency::USD),
            }],
        };

        assert_eq!(pricing.line(&ItemId::new("item-1")).unwrap().quantity, 2);
        assert!(pricing.line(&ItemId::new("item-2")).is_none());
    }
}
