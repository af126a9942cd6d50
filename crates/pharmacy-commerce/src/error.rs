//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Item not in the catalog.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Two lines share an item id.
    #[error("Duplicate line for item {0}")]
    DuplicateLine(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout started on an empty cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Form validation failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] crate::checkout::ValidationErrors),

    /// Persistence adapter failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

#[cfg(feature = "storage")]
impl From<pharmacy_cache::CacheError> for CommerceError {
    fn from(e: pharmacy_cache::CacheError) -> Self {
        CommerceError::Persistence(e.to_string())
    }
}
