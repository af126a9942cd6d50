//! Type-safe Key-Value caching layer for the pharmacy storefront.
//!
//! Provides a simple, ergonomic API for caching data with automatic JSON
//! serialization. Inside a Spin component the cache talks to Spin's
//! Key-Value Store; natively it runs over process memory or a directory of
//! JSON files.
//!
//! # Example
//!
//! ```rust
//! use pharmacy_cache::Cache;
//!
//! let cache = Cache::in_memory();
//!
//! // Store a value
//! cache.set("shoppingCart", &vec!["aspirin-300"])?;
//!
//! // Retrieve a value
//! let items: Option<Vec<String>> = cache.get("shoppingCart")?;
//! assert_eq!(items, Some(vec!["aspirin-300".to_string()]));
//!
//! // Delete a value
//! cache.delete("shoppingCart")?;
//! # Ok::<(), pharmacy_cache::CacheError>(())
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError};
}
