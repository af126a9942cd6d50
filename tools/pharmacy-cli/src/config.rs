//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use pharmacy_commerce::cart::CART_STORAGE_KEY;
use pharmacy_commerce::catalog::Catalog;
use pharmacy_commerce::checkout::{PricingRules, DEFAULT_FREE_STANDARD_FROM};
use pharmacy_commerce::Currency;
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["pharmacy.toml", ".pharmacy.toml", "pharmacy.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Cart storage.
    #[serde(default)]
    pub store: StoreConfig,

    /// Order pricing and checkout behaviour.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// The store currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.store.currency)
            .with_context(|| format!("Unsupported currency: {}", self.store.currency))
    }

    /// Pricing rules for the order summary.
    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules {
            tax_basis_points: self.checkout.tax_basis_points,
            free_standard_from: self.checkout.free_shipping_from,
        }
    }

    /// Check the config against the catalog it will sell from, returning
    /// `(errors, warnings)`.
    pub fn problems(&self, catalog: &Catalog) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match (Currency::from_code(&self.store.currency), catalog.currency()) {
            (None, _) => {
                errors.push(format!("store.currency '{}' is not supported", self.store.currency))
            }
            (Some(currency), Some(priced_in)) if currency != priced_in => errors.push(format!(
                "store.currency '{}' does not match the catalog, which is priced in {}",
                self.store.currency, priced_in
            )),
            _ => {}
        }
        if self.store.data_dir.trim().is_empty() {
            errors.push("store.data_dir is required".to_string());
        }
        if self.store.storage_key.trim().is_empty() {
            errors.push("store.storage_key is required".to_string());
        }

        if self.checkout.tax_basis_points > 10_000 {
            errors.push("checkout.tax_basis_points must be 0-10000".to_string());
        }
        if matches!(self.checkout.free_shipping_from, Some(t) if t < 0) {
            errors.push("checkout.free_shipping_from must not be negative".to_string());
        }
        if self.checkout.latency_ms > 10_000 {
            warnings.push(format!(
                "checkout.latency_ms {} will make checkout feel stuck",
                self.checkout.latency_ms
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            warnings.push(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        (errors, warnings)
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where and how the cart is kept between invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// ISO currency code for prices and totals.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Directory for the key-value files, relative to the config file.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

fn default_data_dir() -> String {
    ".pharmacy".to_string()
}

fn default_storage_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    /// Sales tax in basis points (825 = 8.25%).
    #[serde(default)]
    pub tax_basis_points: u32,

    /// Subtotal in minor units from which standard delivery is free.
    #[serde(
        default = "default_free_shipping_from",
        skip_serializing_if = "Option::is_none"
    )]
    pub free_shipping_from: Option<i64>,

    /// Simulated order-submission delay.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_free_shipping_from() -> Option<i64> {
    Some(DEFAULT_FREE_STANDARD_FROM)
}

fn default_latency_ms() -> u64 {
    1200
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_basis_points: 0,
            free_shipping_from: default_free_shipping_from(),
            latency_ms: default_latency_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter when neither `RUST_LOG` nor `--verbose` is set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Generate a default pharmacy.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Pharmacy storefront configuration

[store]
currency = "USD"
# Relative paths resolve against this file's directory.
data_dir = ".pharmacy"
storage_key = "{key}"

[checkout]
# 825 = 8.25% sales tax
tax_basis_points = 0
# Standard delivery is free from this subtotal, in cents
free_shipping_from = {free}
latency_ms = 1200

[logging]
level = "warn"
json = false
"#,
        key = CART_STORAGE_KEY,
        free = DEFAULT_FREE_STANDARD_FROM,
    )
}
