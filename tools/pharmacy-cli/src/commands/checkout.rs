//! Place an order for the cart contents.

use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Local;
use dialoguer::Confirm;
use pharmacy_commerce::checkout::{
    Address, CheckoutDetails, CheckoutFlow, CheckoutStep, Contact, Order, OrderSummary,
    PaymentCard, PaymentMethod,
};
use pharmacy_commerce::CommerceError;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let mut flow = CheckoutFlow::new(ctx.config.pricing_rules());
    let yes = args.yes;
    flow.details = details_from_args(args);

    ctx.output.header("Checkout");

    // Walk the wizard up to Review, stopping at the first step that fails.
    while flow.step != CheckoutStep::Review {
        let next = flow.advance(store.cart()).map_err(|e| report(e, ctx))?;
        ctx.output.step(
            next.number(),
            CheckoutStep::Complete.number(),
            next.display_name(),
        );
    }

    let summary = flow.summary(store.cart())?;
    print_review(&flow, &summary, ctx);

    if !yes && !ctx.output.is_json() {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", summary.grand_total))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled, cart kept");
            return Ok(());
        }
    }

    let latency = Duration::from_millis(ctx.config.checkout.latency_ms);
    let spinner = ctx.output.spinner("Placing order...");
    tokio::time::sleep(latency).await;
    let order = flow.place_order(&mut store);
    spinner.finish_and_clear();

    let order = order.map_err(|e| report(e, ctx))?;
    store.flush().context("Order placed but the saved cart could not be cleared")?;

    print_order(&order, ctx);
    Ok(())
}

fn details_from_args(args: CheckoutArgs) -> CheckoutDetails {
    let payment = match (args.card, args.expiry) {
        (Some(number), Some(expiry)) => PaymentMethod::Card(PaymentCard::new(number, expiry)),
        _ => PaymentMethod::CashOnDelivery,
    };

    CheckoutDetails {
        contact: Contact {
            full_name: args.name,
            email: args.email,
            phone: args.phone,
        },
        address: Address {
            line1: args.line1,
            line2: args.line2,
            city: args.city,
            postcode: args.postcode,
            country: args.country,
        },
        delivery: args.delivery,
        payment: Some(payment),
    }
}

/// Print every field error before handing the error back.
fn report(err: CommerceError, ctx: &Context) -> anyhow::Error {
    match err {
        CommerceError::Validation(errors) => {
            for e in &errors.errors {
                ctx.output.warn(&format!("{}: {}", e.field, e.message));
            }
            anyhow::anyhow!("Checkout details have {} problem(s)", errors.errors.len())
        }
        CommerceError::EmptyCart => {
            anyhow::anyhow!("Your cart is empty. Add products with `pharmacy cart add`.")
        }
        other => other.into(),
    }
}

fn print_review(flow: &CheckoutFlow, summary: &OrderSummary, ctx: &Context) {
    if ctx.output.is_json() {
        return;
    }

    let details = &flow.details;
    ctx.output.info("");
    ctx.output.kv("Name", &details.contact.full_name);
    ctx.output.kv("Email", &details.contact.email);
    ctx.output.kv(
        "Delivery",
        &format!(
            "{} ({})",
            details.delivery.display_name(),
            details.delivery.delivery_estimate()
        ),
    );
    if details.delivery.requires_address() {
        ctx.output.kv("Address", &details.address.one_line());
    }
    if let Some(payment) = &details.payment {
        ctx.output.kv("Payment", &payment.summary());
    }

    ctx.output.info("");
    ctx.output
        .kv("Subtotal", &format!("{} ({} items)", summary.subtotal, summary.item_count));
    ctx.output.kv("Shipping", &summary.shipping.display());
    if !summary.tax.is_zero() {
        ctx.output.kv("Tax", &summary.tax.display());
    }
    ctx.output.kv("Total", &summary.grand_total.display());
}

fn print_order(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    ctx.output.success(&format!("Order {} placed", order.id));
    ctx.output.kv(
        "Placed",
        &order
            .placed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
    for line in &order.lines {
        ctx.output.list_item(&format!(
            "{} x {} ({})",
            line.quantity,
            line.name,
            line.line_total()
        ));
    }
    ctx.output.kv("Charged", &order.total().display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_commerce::checkout::DeliveryOption;

    fn args() -> CheckoutArgs {
        CheckoutArgs {
            name: "Alex Morgan".to_string(),
            email: "alex@example.org".to_string(),
            phone: "0161 496 0000".to_string(),
            line1: "3 Mill Lane".to_string(),
            line2: None,
            city: "Manchester".to_string(),
            postcode: "M1 1AA".to_string(),
            country: "UK".to_string(),
            delivery: DeliveryOption::Express,
            card: None,
            expiry: None,
            yes: true,
        }
    }

    #[test]
    fn test_details_without_card_pay_on_delivery() {
        let details = details_from_args(args());
        assert_eq!(details.payment, Some(PaymentMethod::CashOnDelivery));
        assert_eq!(details.delivery, DeliveryOption::Express);
        assert_eq!(details.address.city, "Manchester");
    }

    #[test]
    fn test_details_with_card() {
        let mut args = args();
        args.card = Some("4111 1111 1111 1111".to_string());
        args.expiry = Some("12/99".to_string());

        let details = details_from_args(args);
        match details.payment {
            Some(PaymentMethod::Card(card)) => assert_eq!(card.last_four(), "1111"),
            other => panic!("expected card payment, got {:?}", other),
        }
    }
}
