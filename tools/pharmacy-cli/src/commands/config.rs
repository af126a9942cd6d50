//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, as_json } => init_config(force, as_json, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults, no config file found)"),
    }

    // Store section
    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("currency", &ctx.config.store.currency);
    ctx.output.kv(
        "data_dir",
        &format!("{} ({})", ctx.config.store.data_dir, ctx.data_dir().display()),
    );
    ctx.output.kv("storage_key", &ctx.config.store.storage_key);

    // Checkout section
    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv(
        "tax_basis_points",
        &ctx.config.checkout.tax_basis_points.to_string(),
    );
    match ctx.config.checkout.free_shipping_from {
        Some(cents) => ctx.output.kv("free_shipping_from", &cents.to_string()),
        None => ctx.output.kv("free_shipping_from", "never"),
    }
    ctx.output
        .kv("latency_ms", &ctx.config.checkout.latency_ms.to_string());

    // Logging section
    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("json", &ctx.config.logging.json.to_string());

    Ok(())
}

fn init_config(force: bool, as_json: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.default_config_path(as_json);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if as_json {
        // JSON has no comments, so write the plain defaults.
        CliConfig::default().save(&config_path)?;
    } else {
        fs::write(&config_path, generate_default_config())?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.problems(&ctx.catalog);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
