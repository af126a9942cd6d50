//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};
use pharmacy_commerce::checkout::DeliveryOption;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only show products whose name or brand matches.
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart contents and totals.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product id from `catalog list`.
        id: String,
        /// Units to add.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line from the cart.
    Remove {
        /// Product id.
        id: String,
    },
    /// Set a line's quantity; zero or less removes it.
    Update {
        /// Product id.
        id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,

    /// Email address.
    #[arg(long)]
    pub email: String,

    /// Phone number.
    #[arg(long)]
    pub phone: String,

    /// Street line.
    #[arg(long, default_value = "")]
    pub line1: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    pub line2: Option<String>,

    /// City.
    #[arg(long, default_value = "")]
    pub city: String,

    /// Postcode.
    #[arg(long, default_value = "")]
    pub postcode: String,

    /// Country.
    #[arg(long, default_value = "")]
    pub country: String,

    /// Delivery option (standard, express, pickup).
    #[arg(long, default_value = "standard")]
    pub delivery: DeliveryOption,

    /// Card number; omit to pay cash on delivery.
    #[arg(long, requires = "expiry")]
    pub card: Option<String>,

    /// Card expiry as MM/YY.
    #[arg(long, requires = "card")]
    pub expiry: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// Write pharmacy.json instead of pharmacy.toml.
        #[arg(long = "as-json")]
        as_json: bool,
    },
    /// Validate the config file.
    Validate,
}
