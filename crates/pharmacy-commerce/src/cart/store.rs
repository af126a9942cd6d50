//! The cart store shared by every storefront view.
//!
//! Wraps a [`Cart`] with a persistence adapter and a list of listeners.
//! Every effective mutation is written through the adapter and then
//! announced to listeners; lookups and derived values read the cart directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cart::{Cart, CartPersistence, CartState, LineItem, NoopPersistence};
use crate::catalog::ItemDescriptor;
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// Units of an item were added; `quantity` is the line's new quantity.
    ItemAdded { id: ItemId, quantity: i64 },
    /// A line was removed.
    ItemRemoved { id: ItemId },
    /// A line's quantity was replaced.
    QuantityUpdated { id: ItemId, quantity: i64 },
    /// Every line was removed.
    Cleared,
    /// The cart was reloaded from persistence.
    Restored,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartEvent, &Cart)>;

/// Authoritative cart for a browsing session.
pub struct CartStore {
    cart: Cart,
    persistence: Box<dyn CartPersistence>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore {
    /// Create an empty, memory-only store.
    pub fn new(currency: Currency) -> Self {
        Self::with_persistence(currency, NoopPersistence)
    }

    /// Create an empty store that writes through `persistence`.
    ///
    /// Nothing is read from the adapter; call [`CartStore::restore`] for that.
    pub fn with_persistence(currency: Currency, persistence: impl CartPersistence + 'static) -> Self {
        Self {
            cart: Cart::new(currency),
            persistence: Box::new(persistence),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and load any snapshot the adapter holds.
    pub fn open(
        currency: Currency,
        persistence: impl CartPersistence + 'static,
    ) -> Result<Self, CommerceError> {
        let mut store = Self::with_persistence(currency, persistence);
        store.restore()?;
        Ok(store)
    }

    /// Replace the in-memory cart with the adapter's snapshot.
    ///
    /// Returns `false` when the adapter holds nothing, leaving the cart as is.
    /// A snapshot in another currency is rejected, and so is one that breaks
    /// the cart's line invariants; the in-memory cart is then left untouched.
    pub fn restore(&mut self) -> Result<bool, CommerceError> {
        let Some(cart) = self.persistence.load()? else {
            return Ok(false);
        };

        if cart.currency != self.cart.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.cart.currency.code().to_string(),
                got: cart.currency.code().to_string(),
            });
        }
        cart.validate().map_err(|e| {
            CommerceError::Persistence(format!("saved cart rejected: {}", e))
        })?;

        debug!(
            adapter = self.persistence.name(),
            lines = cart.items.len(),
            "cart restored"
        );
        self.cart = cart;
        self.notify(&CartEvent::Restored);
        Ok(true)
    }

    /// Add `quantity` units of `item`.
    ///
    /// An existing line with the same id grows; otherwise a new line is
    /// appended with defaulted metadata. On error the cart is unchanged.
    pub fn add_to_cart(&mut self, item: &ItemDescriptor, quantity: i64) -> Result<(), CommerceError> {
        let new_quantity = self.cart.add_item(item, quantity)?;
        debug!(item_id = %item.id, added = quantity, quantity = new_quantity, "item added to cart");
        self.commit(CartEvent::ItemAdded {
            id: item.id.clone(),
            quantity: new_quantity,
        });
        Ok(())
    }

    /// Add a single unit of `item`.
    pub fn add_one(&mut self, item: &ItemDescriptor) -> Result<(), CommerceError> {
        self.add_to_cart(item, 1)
    }

    /// Remove the line for `id`. Unknown ids are a no-op.
    pub fn remove_from_cart(&mut self, id: &ItemId) -> bool {
        if !self.cart.remove_item(id) {
            return false;
        }
        debug!(item_id = %id, "item removed from cart");
        self.commit(CartEvent::ItemRemoved { id: id.clone() });
        true
    }

    /// Replace the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are a no-op
    /// and return `Ok(false)`.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_from_cart(id));
        }

        if !self.cart.update_quantity(id, quantity)? {
            return Ok(false);
        }
        debug!(item_id = %id, quantity, "cart quantity updated");
        self.commit(CartEvent::QuantityUpdated {
            id: id.clone(),
            quantity,
        });
        Ok(true)
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        let had_items = !self.cart.is_empty();
        self.cart.clear();

        if let Err(error) = self.persistence.clear() {
            warn!(adapter = self.persistence.name(), %error, "failed to clear persisted cart");
        }

        if had_items {
            debug!("cart cleared");
            self.notify(&CartEvent::Cleared);
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.cart.items
    }

    /// Units across all lines.
    pub fn count(&self) -> i64 {
        self.cart.item_count()
    }

    /// Sum of price times quantity across all lines.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Line for `id`, if present.
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.cart.get_item(id)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.cart.unique_item_count()
    }

    /// Empty or non-empty.
    pub fn state(&self) -> CartState {
        self.cart.state()
    }

    /// Currency every line is priced in.
    pub fn currency(&self) -> Currency {
        self.cart.currency
    }

    /// Borrow the underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Owned copy that does not follow later mutations.
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// Register a listener called after every effective mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent, &Cart) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() < len_before
    }

    /// Write the current snapshot, surfacing adapter errors.
    pub fn flush(&self) -> Result<(), CommerceError> {
        if self.cart.is_empty() {
            self.persistence.clear()
        } else {
            self.persistence.save(&self.cart)
        }
    }

    fn commit(&mut self, event: CartEvent) {
        // The in-memory cart stays authoritative when the adapter fails.
        if let Err(error) = self.persistence.save(&self.cart) {
            warn!(adapter = self.persistence.name(), %error, "failed to persist cart");
        }
        self.notify(&event);
    }

    fn notify(&self, event: &CartEvent) {
        for (_, listener) in &self.listeners {
            listener(event, &self.cart);
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("persistence", &self.persistence.name())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
