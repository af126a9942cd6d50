//! Show and edit the shopping cart.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use pharmacy_commerce::cart::{CartStore, LineItem};
use pharmacy_commerce::ids::ItemId;
use pharmacy_commerce::Money;
use serde::Serialize;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    match args.command {
        CartCommand::Show => {}
        CartCommand::Add { id, quantity } => add(&mut store, &id, quantity, ctx)?,
        CartCommand::Remove { id } => remove(&mut store, &id, ctx),
        CartCommand::Update { id, quantity } => update(&mut store, &id, quantity, ctx)?,
        CartCommand::Clear { yes } => {
            if !clear(&mut store, yes, ctx)? {
                return Ok(());
            }
        }
    }

    store.flush().context("Failed to save cart")?;
    show(&store, ctx);
    Ok(())
}

fn add(store: &mut CartStore, id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let item = ctx
        .catalog
        .lookup(&ItemId::new(id))
        .context("Run `pharmacy catalog list` to see product ids")?;

    store.add_to_cart(item, quantity)?;
    ctx.output
        .success(&format!("Added {} x {}", quantity, item.name));
    Ok(())
}

fn remove(store: &mut CartStore, id: &str, ctx: &Context) {
    if store.remove_from_cart(&ItemId::new(id)) {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.warn(&format!("{} is not in the cart", id));
    }
}

fn update(store: &mut CartStore, id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let id = ItemId::new(id);
    if !store.update_quantity(&id, quantity)? {
        ctx.output.warn(&format!("{} is not in the cart", id));
    } else if quantity <= 0 {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.success(&format!("{} quantity set to {}", id, quantity));
    }
    Ok(())
}

/// Returns `false` if the shopper backed out.
fn clear(store: &mut CartStore, yes: bool, ctx: &Context) -> Result<bool> {
    if store.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(true);
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", store.count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(false);
        }
    }

    store.clear_cart();
    ctx.output.success("Cart cleared");
    Ok(true)
}

#[derive(Serialize)]
struct CartView<'a> {
    items: &'a [LineItem],
    count: i64,
    total: Money,
}

/// Print the cart lines and totals.
pub fn show(store: &CartStore, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            items: store.items(),
            count: store.count(),
            total: store.total(),
        });
        return;
    }

    ctx.output.header("Your Cart");
    if store.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [18, 24, 10, 5, 10];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "QTY", "TOTAL"], &widths);
    for line in store.items() {
        ctx.output.table_row(
            &[
                line.id.as_str(),
                &truncate(&line.name, widths[1]),
                &line.price.display(),
                &line.quantity.to_string(),
                &line.line_total().display(),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("Items", &store.count().to_string());
    ctx.output.kv("Total", &store.total().display());
}
