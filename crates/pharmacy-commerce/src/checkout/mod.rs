//! Checkout module.
//!
//! Contains the checkout wizard, form details and validation, delivery
//! options, and order placement.

mod details;
mod flow;
mod order;
mod shipping;

pub use details::{
    Address, CheckoutDetails, Contact, FieldError, PaymentCard, PaymentMethod, ValidationErrors,
};
pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{Order, OrderSummary, PricingRules, DEFAULT_FREE_STANDARD_FROM};
pub use shipping::{DeliveryOption, EXPRESS_DELIVERY_FEE, STANDARD_DELIVERY_FEE};
