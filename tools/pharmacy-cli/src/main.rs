//! Pharmacy CLI - Terminal storefront for the pharmacy cart.
//!
//! Commands:
//! - `pharmacy catalog` - Browse the product range
//! - `pharmacy cart` - Show and edit the shopping cart
//! - `pharmacy checkout` - Place an order for the cart contents
//! - `pharmacy config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs};
use config::LoggingConfig;

/// Pharmacy CLI - Browse, fill a cart and check out from the terminal
#[derive(Parser)]
#[command(name = "pharmacy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Show and edit the shopping cart
    Cart(CartArgs),

    /// Place an order for the cart contents
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose, &ctx.config.logging);

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Install the log subscriber.
///
/// `RUST_LOG` wins over `--verbose`, which wins over `[logging] level`.
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let fallback = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing init failed: {}", e);
    }
}
