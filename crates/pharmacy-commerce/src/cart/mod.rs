//! Shopping cart module.
//!
//! Contains the cart reducer, its pricing breakdown, the shared store and
//! the persistence adapters the store writes through.

mod cart;
mod persistence;
mod pricing;
mod store;

pub use cart::{Cart, CartState, LineItem, MAX_QUANTITY_PER_ITEM};
#[cfg(feature = "storage")]
pub use persistence::KvPersistence;
pub use persistence::{CartPersistence, MemoryPersistence, NoopPersistence, CART_STORAGE_KEY};
pub use pricing::{CartPricing, LineItemPricing};
pub use store::{CartEvent, CartStore, SubscriptionId};
