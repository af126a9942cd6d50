//! Persistence adapters the cart store writes through.
//!
//! The store calls [`CartPersistence::save`] after every mutation and
//! [`CartPersistence::clear`] when the cart is emptied, so whichever adapter
//! is plugged in always holds the same snapshot the store serves.

use std::sync::{Arc, Mutex};

use crate::cart::Cart;
use crate::error::CommerceError;

/// Storage key the storefront uses for the cart snapshot.
pub const CART_STORAGE_KEY: &str = "shoppingCart";

/// A sink for cart snapshots.
pub trait CartPersistence {
    /// Short adapter name for logs.
    fn name(&self) -> &'static str;

    /// Read the stored snapshot, if any.
    fn load(&self) -> Result<Option<Cart>, CommerceError>;

    /// Replace the stored snapshot.
    fn save(&self, cart: &Cart) -> Result<(), CommerceError>;

    /// Remove the stored snapshot.
    fn clear(&self) -> Result<(), CommerceError>;
}

/// Keeps nothing. The cart lives only as long as the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl CartPersistence for NoopPersistence {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn load(&self) -> Result<Option<Cart>, CommerceError> {
        Ok(None)
    }

    fn save(&self, _cart: &Cart) -> Result<(), CommerceError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Shared in-process slot.
///
/// Clones share the same slot, so a test can hand one clone to a store and
/// inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    cart: Option<Cart>,
    saves: usize,
    clears: usize,
}

impl MemoryPersistence {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds a snapshot.
    pub fn with_cart(cart: Cart) -> Self {
        let persistence = Self::default();
        if let Ok(mut slot) = persistence.inner.lock() {
            slot.cart = Some(cart);
        }
        persistence
    }

    /// The snapshot currently stored.
    pub fn stored(&self) -> Option<Cart> {
        self.inner.lock().ok().and_then(|slot| slot.cart.clone())
    }

    /// Number of saves received.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|slot| slot.saves).unwrap_or(0)
    }

    /// Number of clears received.
    pub fn clear_count(&self) -> usize {
        self.inner.lock().map(|slot| slot.clears).unwrap_or(0)
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut MemorySlot) -> T) -> Result<T, CommerceError> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| CommerceError::Persistence("memory slot poisoned".to_string()))?;
        Ok(f(&mut slot))
    }
}

impl CartPersistence for MemoryPersistence {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Option<Cart>, CommerceError> {
        self.with_slot(|slot| slot.cart.clone())
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        self.with_slot(|slot| {
            slot.cart = Some(cart.clone());
            slot.saves += 1;
        })
    }

    fn clear(&self) -> Result<(), CommerceError> {
        self.with_slot(|slot| {
            slot.cart = None;
            slot.clears += 1;
        })
    }
}

/// Stores the cart as JSON in the key-value cache.
#[cfg(feature = "storage")]
pub struct KvPersistence {
    cache: pharmacy_cache::Cache,
    key: String,
}

#[cfg(feature = "storage")]
impl KvPersistence {
    /// Use the storefront's default key.
    pub fn new(cache: pharmacy_cache::Cache) -> Self {
        Self::with_key(cache, CART_STORAGE_KEY)
    }

    /// Use a custom key.
    pub fn with_key(cache: pharmacy_cache::Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// Namespace the default key by session, e.g. `shoppingCart:sess-1`.
    pub fn for_session(cache: pharmacy_cache::Cache, session: &str) -> Self {
        Self::with_key(cache, pharmacy_cache::cache_key!(CART_STORAGE_KEY, session))
    }

    /// The key snapshots are written under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(feature = "storage")]
impl CartPersistence for KvPersistence {
    fn name(&self) -> &'static str {
        "kv"
    }

    fn load(&self) -> Result<Option<Cart>, CommerceError> {
        Ok(self.cache.get::<Cart>(&self.key)?)
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        Ok(self.cache.set(&self.key, cart)?)
    }

    fn clear(&self) -> Result<(), CommerceError> {
        Ok(self.cache.delete(&self.key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemDescriptor;
    use crate::money::{Currency, Money};

    fn sample_cart() -> Cart {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(
            &ItemDescriptor::new("a", "Aspirin", Money::from_major(10, Currency::USD)),
            2,
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_noop_never_stores() {
        let persistence = NoopPersistence;
        persistence.save(&sample_cart()).unwrap();
        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_clones_share_slot() {
        let persistence = MemoryPersistence::new();
        let observer = persistence.clone();

        persistence.save(&sample_cart()).unwrap();
        assert_eq!(observer.stored(), Some(sample_cart()));
        assert_eq!(observer.save_count(), 1);

        persistence.clear().unwrap();
        assert_eq!(observer.stored(), None);
        assert_eq!(observer.clear_count(), 1);
    }

    #[test]
    fn test_memory_with_cart_preloads() {
        let persistence = MemoryPersistence::with_cart(sample_cart());
        assert_eq!(persistence.load().unwrap(), Some(sample_cart()));
        assert_eq!(persistence.save_count(), 0);
    }

    #[cfg(feature = "storage")]
    #[test]
    fn test_kv_round_trip() {
        let cache = pharmacy_cache::Cache::in_memory();
        let persistence = KvPersistence::new(cache.clone());
        assert_eq!(persistence.key(), "shoppingCart");

        persistence.save(&sample_cart()).unwrap();
        assert!(cache.exists("shoppingCart").unwrap());
        assert_eq!(persistence.load().unwrap(), Some(sample_cart()));

        persistence.clear().unwrap();
        assert!(persistence.load().unwrap().is_none());
    }

    #[cfg(feature = "storage")]
    #[test]
    fn test_kv_session_key() {
        let persistence = KvPersistence::for_session(pharmacy_cache::Cache::in_memory(), "sess-1");
        assert_eq!(persistence.key(), "shoppingCart:sess-1");
    }
}
