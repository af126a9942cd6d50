//! Cart, catalog and checkout logic for the pharmacy storefront.
//!
//! This crate provides the client-held state behind the storefront pages:
//!
//! - **Catalog**: item descriptors and the sample pharmacy range
//! - **Cart**: the cart store every view shares, with derived count/total,
//!   change listeners and a pluggable persistence adapter
//! - **Checkout**: the multi-step wizard, form validation, order summary
//!   and order placement
//!
//! # Example
//!
//! ```rust
//! use pharmacy_commerce::prelude::*;
//!
//! let mut store = CartStore::new(Currency::USD);
//! let aspirin = ItemDescriptor::new("a", "Aspirin", Money::from_major(10, Currency::USD));
//!
//! store.add_to_cart(&aspirin, 2)?;
//! store.add_to_cart(&aspirin, 3)?;
//!
//! assert_eq!(store.count(), 5);
//! assert_eq!(store.total(), Money::from_major(50, Currency::USD));
//! # Ok::<(), CommerceError>(())
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, ItemDescriptor};

    // Cart
    pub use crate::cart::{
        Cart, CartEvent, CartPersistence, CartPricing, CartState, CartStore, LineItem,
        LineItemPricing, MemoryPersistence, NoopPersistence, SubscriptionId,
        MAX_QUANTITY_PER_ITEM,
    };
    #[cfg(feature = "storage")]
    pub use crate::cart::KvPersistence;

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutDetails, CheckoutFlow, CheckoutStep, Contact, DeliveryOption, Order,
        OrderSummary, PaymentCard, PaymentMethod, PricingRules, ValidationErrors,
    };
}
