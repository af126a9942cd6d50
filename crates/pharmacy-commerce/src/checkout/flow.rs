//! Checkout flow state machine.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cart::{Cart, CartStore};
use crate::checkout::{CheckoutDetails, Order, OrderSummary, PricingRules};
use crate::error::CommerceError;
use crate::ids::OrderId;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Cart review.
    Cart,
    /// Contact details and delivery address.
    Details,
    /// Payment details.
    Payment,
    /// Order review before submission.
    Review,
    /// Order placed.
    Complete,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Details => "details",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Details => "Your Details",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Complete => "Order Placed",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Details => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
            CheckoutStep::Complete => 5,
        }
    }

    fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => Some(CheckoutStep::Details),
            CheckoutStep::Details => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => Some(CheckoutStep::Complete),
            CheckoutStep::Complete => None,
        }
    }
}

/// Checkout wizard state.
///
/// The flow never holds its own copy of the cart: every check reads the
/// store the caller passes in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    /// Current step.
    pub step: CheckoutStep,
    /// Completed steps.
    pub completed_steps: Vec<CheckoutStep>,
    /// Form contents.
    pub details: CheckoutDetails,
    /// Tax and delivery rules.
    pub rules: PricingRules,
}

impl CheckoutFlow {
    /// Create a new checkout flow.
    pub fn new(rules: PricingRules) -> Self {
        Self {
            step: CheckoutStep::Cart,
            completed_steps: Vec::new(),
            details: CheckoutDetails::default(),
            rules,
        }
    }

    /// Advance to the next step.
    ///
    /// Each step checks what the following one needs. Moving from Review
    /// to Complete only happens through [`CheckoutFlow::place_order`].
    pub fn advance(&mut self, cart: &Cart) -> Result<CheckoutStep, CommerceError> {
        let next = match self.step.next() {
            Some(CheckoutStep::Complete) | None => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: CheckoutStep::Complete.as_str().to_string(),
                })
            }
            Some(next) => next,
        };

        match next {
            CheckoutStep::Details if cart.is_empty() => return Err(CommerceError::EmptyCart),
            CheckoutStep::Payment => self.details.validate_contact()?,
            CheckoutStep::Review => self.details.validate_payment()?,
            _ => {}
        }

        self.complete_current();
        debug!(from = self.step.as_str(), to = next.as_str(), "checkout advanced");
        self.step = next;
        Ok(next)
    }

    /// Go back to a previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = match self.step {
            CheckoutStep::Details => CheckoutStep::Cart,
            CheckoutStep::Payment => CheckoutStep::Details,
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Cart | CheckoutStep::Complete => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: "previous".to_string(),
                })
            }
        };

        self.step = prev;
        Ok(prev)
    }

    /// Price the cart with the current delivery choice.
    pub fn summary(&self, cart: &Cart) -> Result<OrderSummary, CommerceError> {
        OrderSummary::calculate(cart, self.details.delivery, &self.rules)
    }

    /// Turn the store's contents into an order and empty the store.
    ///
    /// Only allowed from Review. The whole form is validated again, since
    /// details may have changed after the step checks ran.
    pub fn place_order(&mut self, store: &mut CartStore) -> Result<Order, CommerceError> {
        if self.step != CheckoutStep::Review {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }
        if store.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        self.details.validate()?;

        let snapshot = store.snapshot();
        let summary = self.summary(&snapshot)?;
        let payment = self
            .details
            .payment
            .as_ref()
            .map(|p| p.summary())
            .ok_or_else(|| CommerceError::CheckoutIncomplete("payment method".to_string()))?;

        let order = Order {
            id: OrderId::generate(),
            lines: snapshot.items,
            summary,
            contact: self.details.contact.clone(),
            address: self
                .details
                .delivery
                .requires_address()
                .then(|| self.details.address.clone()),
            delivery: self.details.delivery,
            payment,
            placed_at: Utc::now(),
        };

        store.clear_cart();
        self.complete_current();
        self.step = CheckoutStep::Complete;

        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.total(),
            delivery = order.delivery.as_str(),
            "order placed"
        );
        Ok(order)
    }

    /// Check if checkout is complete.
    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Complete
    }

    /// Get progress percentage.
    pub fn progress_percent(&self) -> u8 {
        self.step.number() * 20
    }

    fn complete_current(&mut self) {
        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new(PricingRules::default())
    }
}
