//! Cart and line item types.

use crate::cart::{CartPricing, LineItemPricing};
use crate::catalog::ItemDescriptor;
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// The two observable shapes of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    /// No line items.
    Empty,
    /// At least one line item.
    NonEmpty,
}

/// A shopping cart.
///
/// Holds line items in insertion order, at most one per item id. Count and
/// total are derived on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<LineItem>,
    /// Cart currency.
    #[serde(default)]
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same id exists its quantity grows; otherwise a new
    /// line is appended with defaulted display metadata. Returns the line's
    /// quantity after the add.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The price is in a different currency than the cart
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(&mut self, item: &ItemDescriptor, quantity: i64) -> Result<i64, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if item.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: item.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            return Ok(new_quantity);
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items.push(LineItem::from_descriptor(item, quantity));
        Ok(quantity)
    }

    /// Update item quantity.
    ///
    /// If quantity is <= 0, removes the item.
    /// Returns whether a line matched, or an error if quantity exceeds the limit.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of price times quantity over all lines.
    ///
    /// Saturates instead of overflowing; use [`Cart::calculate_pricing`] for
    /// a checked breakdown.
    pub fn total(&self) -> Money {
        let cents = self
            .items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.line_total().amount_cents));
        Money::new(cents, self.currency)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current observable shape.
    pub fn state(&self) -> CartState {
        if self.items.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    /// Check the invariants `add_item` and `update_quantity` maintain.
    ///
    /// Carts built through this API always pass; snapshots read back from
    /// storage may not.
    pub fn validate(&self) -> Result<(), CommerceError> {
        for (index, line) in self.items.iter().enumerate() {
            if line.quantity <= 0 {
                return Err(CommerceError::InvalidQuantity(line.quantity));
            }
            if line.quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    line.quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            if line.price.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: line.price.currency.code().to_string(),
                });
            }
            if self.items[..index].iter().any(|other| other.id == line.id) {
                return Err(CommerceError::DuplicateLine(line.id.to_string()));
            }
        }
        Ok(())
    }

    /// Get an item by ID.
    pub fn get_item(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Calculate cart pricing.
    ///
    /// Returns error if arithmetic overflow occurs.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                let total = item
                    .price
                    .try_multiply(item.quantity)
                    .ok_or(CommerceError::Overflow)?;
                Ok(LineItemPricing {
                    item_id: item.id.clone(),
                    unit_price: item.price,
                    quantity: item.quantity,
                    total,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal = Money::try_sum(line_items.iter().map(|l| &l.total), self.currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            item_count: self.item_count(),
            subtotal,
            line_items,
        })
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Item being purchased.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price at the time the item was added.
    pub price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub brand: String,
    pub dosage: String,
    pub pack_size: String,
}

impl LineItem {
    /// Create a line from a descriptor, filling in default metadata.
    pub fn from_descriptor(item: &ItemDescriptor, quantity: i64) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
            image: item.image.clone(),
            brand: item.brand_or_default().to_string(),
            dosage: item.dosage_or_default().to_string(),
            pack_size: item.pack_size_or_default().to_string(),
        }
    }

    /// Price times quantity, saturating at the numeric bounds.
    pub fn line_total(&self) -> Money {
        self.price.saturating_multiply(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn usd(units: i64) -> Money {
        Money::from_major(units, Currency::USD)
    }

    fn aspirin() -> ItemDescriptor {
        ItemDescriptor::new("a", "Aspirin", usd(10))
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new(Currency::USD);
        assert!(cart.is_empty());
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.total(), Money::zero(Currency::USD));
    }

    #[test]
    fn test_add_item_defaults_metadata() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 2).unwrap();

        let line = cart.get_item(&ItemId::new("a")).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.image, None);
        assert_eq!(line.brand, "Generic");
        assert_eq!(line.dosage, "\u{2014}");
        assert_eq!(line.pack_size, "Standard Pack");
        assert_eq!(cart.state(), CartState::NonEmpty);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 1).unwrap();
        let quantity = cart.add_item(&aspirin(), 2).unwrap();

        assert_eq!(quantity, 3);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_re_add_keeps_original_price() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 1).unwrap();
        cart.add_item(&ItemDescriptor::new("a", "Aspirin", usd(12)), 1)
            .unwrap();

        assert_eq!(cart.get_item(&ItemId::new("a")).unwrap().price, usd(10));
        assert_eq!(cart.total(), usd(20));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 1).unwrap();

        assert!(cart.update_quantity(&ItemId::new("a"), 5).unwrap());
        assert_eq!(cart.item_count(), 5);
        assert!(!cart.update_quantity(&ItemId::new("missing"), 5).unwrap());
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 3).unwrap();

        assert!(cart.update_quantity(&ItemId::new("a"), 0).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 1).unwrap();

        assert!(cart.remove_item(&ItemId::new("a")));
        assert!(!cart.remove_item(&ItemId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_pricing() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 2).unwrap();
        cart.add_item(&ItemDescriptor::new("b", "Bandages", usd(5)), 1)
            .unwrap();

        let pricing = cart.calculate_pricing().unwrap();
        assert_eq!(pricing.subtotal, usd(25));
        assert_eq!(pricing.item_count, 3);
        assert_eq!(pricing.line_items.len(), 2);
        assert_eq!(pricing.line_items[0].total, usd(20));
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new(Currency::USD);
        let result = cart.add_item(&aspirin(), MAX_QUANTITY_PER_ITEM + 1);
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(10000, MAX_QUANTITY_PER_ITEM))
        ));

        cart.add_item(&aspirin(), MAX_QUANTITY_PER_ITEM).unwrap();
        assert!(cart.add_item(&aspirin(), 1).is_err());
        assert_eq!(cart.item_count(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::new(Currency::USD);
        assert!(matches!(
            cart.add_item(&aspirin(), 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::new(Currency::USD);
        let euro = ItemDescriptor::new("e", "Euro Item", Money::from_major(3, Currency::EUR));
        assert!(matches!(
            cart.add_item(&euro, 1),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    fn cart_with_lines(lines: &[(&str, i64, Currency)]) -> Cart {
        let mut cart = Cart::new(Currency::USD);
        for (id, quantity, currency) in lines {
            let item = ItemDescriptor::new(*id, "Item", Money::from_major(1, *currency));
            cart.items.push(LineItem::from_descriptor(&item, *quantity));
        }
        cart
    }

    #[test]
    fn test_validate_accepts_built_carts() {
        let mut cart = Cart::new(Currency::USD);
        assert!(cart.validate().is_ok());
        cart.add_item(&aspirin(), 3).unwrap();
        cart.add_item(&ItemDescriptor::new("b", "Bandages", usd(5)), MAX_QUANTITY_PER_ITEM)
            .unwrap();
        assert!(cart.validate().is_ok());
    }

    #[rstest]
    #[case::zero_quantity(&[("a", 0, Currency::USD)], "Invalid quantity: 0")]
    #[case::negative_quantity(&[("a", 2, Currency::USD), ("b", -3, Currency::USD)], "Invalid quantity: -3")]
    #[case::over_limit(&[("a", 50_000, Currency::USD)], "Quantity 50000 exceeds maximum allowed (9999)")]
    #[case::foreign_price(&[("a", 1, Currency::EUR)], "Currency mismatch: expected USD, got EUR")]
    #[case::duplicate_id(&[("a", 2, Currency::USD), ("a", 1, Currency::USD)], "Duplicate line for item a")]
    fn test_validate_rejects_broken_snapshots(
        #[case] lines: &[(&str, i64, Currency)],
        #[case] message: &str,
    ) {
        let err = cart_with_lines(lines).validate().unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&aspirin(), 2).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["items"][0]["id"], "a");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["price"]["amount_cents"], 1000);
        assert!(json["items"][0].get("image").is_none());
    }
}
