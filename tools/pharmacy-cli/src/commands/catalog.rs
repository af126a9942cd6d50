//! Browse the product catalog.

use anyhow::Result;
use pharmacy_commerce::catalog::ItemDescriptor;
use serde::Serialize;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List { search } => list(search.as_deref(), ctx),
    }
}

#[derive(Serialize)]
struct ProductRow<'a> {
    id: &'a str,
    name: &'a str,
    brand: &'a str,
    dosage: &'a str,
    pack_size: &'a str,
    price: String,
}

impl<'a> From<&'a ItemDescriptor> for ProductRow<'a> {
    fn from(item: &'a ItemDescriptor) -> Self {
        Self {
            id: item.id.as_str(),
            name: &item.name,
            brand: item.brand_or_default(),
            dosage: item.dosage_or_default(),
            pack_size: item.pack_size_or_default(),
            price: item.price.display(),
        }
    }
}

fn list(search: Option<&str>, ctx: &Context) -> Result<()> {
    let rows: Vec<ProductRow> = match search {
        Some(query) => ctx.catalog.search(query).map(ProductRow::from).collect(),
        None => ctx.catalog.iter().map(ProductRow::from).collect(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    match search {
        Some(query) => ctx.output.header(&format!("Products matching '{}'", query)),
        None => ctx.output.header("Products"),
    }

    if rows.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    let widths = [18, 24, 10, 8, 14, 10];
    ctx.output
        .table_row(&["ID", "NAME", "BRAND", "DOSAGE", "PACK", "PRICE"], &widths);
    for row in &rows {
        ctx.output.table_row(
            &[
                row.id,
                &truncate(row.name, widths[1]),
                &truncate(row.brand, widths[2]),
                row.dosage,
                &truncate(row.pack_size, widths[4]),
                &row.price,
            ],
            &widths,
        );
    }

    Ok(())
}
