//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use pharmacy_cache::Cache;
use pharmacy_commerce::cart::{CartStore, KvPersistence};
use pharmacy_commerce::catalog::Catalog;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Products the shopper can add.
    pub catalog: Catalog,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&cwd, config_path, output)
    }

    fn load_from(cwd: &Path, config_path: Option<&str>, output: Output) -> Result<Self> {
        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd: cwd.to_path_buf(),
            catalog: Catalog::pharmacy(),
        })
    }

    /// Directory the cart files live in.
    ///
    /// Relative `store.data_dir` values resolve against the config file's
    /// directory, or the working directory without one.
    pub fn data_dir(&self) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd);
        resolve(base, &self.config.store.data_dir)
    }

    /// Open the cart store, restoring the saved cart.
    pub fn open_store(&self) -> Result<CartStore> {
        let data_dir = self.data_dir();
        let cache = Cache::open_dir(&data_dir)
            .with_context(|| format!("Failed to open cart storage: {}", data_dir.display()))?;
        let persistence = KvPersistence::with_key(cache, &self.config.store.storage_key);

        self.output.debug(&format!(
            "Cart storage: {} (key {})",
            data_dir.display(),
            persistence.key()
        ));

        let currency = self.config.currency()?;
        if let Some(priced_in) = self.catalog.currency() {
            if priced_in != currency {
                bail!(
                    "store.currency is {} but the catalog is priced in {}. Run `pharmacy config validate`.",
                    currency,
                    priced_in
                );
            }
        }

        CartStore::open(currency, persistence).context("Failed to load saved cart")
    }

    /// Where `config init` writes.
    pub fn default_config_path(&self, json: bool) -> PathBuf {
        let name = if json {
            CONFIG_FILE_NAMES[2]
        } else {
            CONFIG_FILE_NAMES[0]
        };
        self.cwd.join(name)
    }
}

/// Find the nearest config file walking up from `start`.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_commerce::prelude::*;

    fn quiet() -> Output {
        Output::new(false, true)
    }

    #[test]
    fn test_finds_config_in_parent_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("pharmacy.toml"),
            "[store]\ndata_dir = \"carts\"\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = Context::load_from(&nested, None, quiet()).unwrap();
        assert_eq!(ctx.config_path, Some(root.path().join("pharmacy.toml")));
        assert_eq!(ctx.data_dir(), root.path().join("carts"));
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::load_from(dir.path(), None, quiet()).unwrap();

        // A pharmacy.toml further up the real filesystem would be picked up,
        // so only assert on what does not depend on it.
        if ctx.config_path.is_none() {
            assert_eq!(ctx.data_dir(), dir.path().join(".pharmacy"));
        }
        assert!(!ctx.catalog.is_empty());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Context::load_from(dir.path(), Some("missing.toml"), quiet()).is_err());
    }

    #[test]
    fn test_store_refuses_currency_the_catalog_lacks() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pharmacy.toml");
        std::fs::write(&config, "[store]\ncurrency = \"EUR\"\n").unwrap();

        let ctx = Context::load_from(dir.path(), config.to_str(), quiet()).unwrap();
        let err = ctx.open_store().unwrap_err();
        assert!(err.to_string().contains("priced in USD"));
    }

    #[test]
    fn test_cart_survives_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pharmacy.toml");
        std::fs::write(&config, "[store]\nstorage_key = \"cli-cart\"\n").unwrap();
        let path = config.to_str().unwrap();

        {
            let ctx = Context::load_from(dir.path(), Some(path), quiet()).unwrap();
            let mut store = ctx.open_store().unwrap();
            let aspirin = ctx.catalog.get(&ItemId::new("aspirin-300")).unwrap().clone();
            store.add_to_cart(&aspirin, 2).unwrap();
        }

        let ctx = Context::load_from(dir.path(), Some(path), quiet()).unwrap();
        let store = ctx.open_store().unwrap();
        assert_eq!(store.count(), 2);
        assert!(dir.path().join(".pharmacy").join("cli-cart.json").is_file());
    }
}
