//! Key-Value store wrapper with automatic serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

type MemoryMap = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Type-safe cache over a key-value backend.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Clones share the same backend.
///
/// Backends:
/// - Spin's Key-Value Store (wasm32 only)
/// - process memory, optionally shared by store name
/// - a directory with one JSON file per key (native only)
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    #[cfg(target_arch = "wasm32")]
    Spin(Arc<spin_sdk::key_value::Store>),
    Memory(MemoryMap),
    #[cfg(not(target_arch = "wasm32"))]
    Dir(PathBuf),
}

impl Cache {
    /// Open the default Key-Value store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_default()?;
    /// ```
    pub fn open_default() -> Result<Self, CacheError> {
        Self::open("default")
    }

    /// Open a named Key-Value store.
    ///
    /// Outside wasm this is a process-wide memory store: opening the same
    /// name twice yields the same data.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = if name == "default" {
            spin_sdk::key_value::Store::open_default()
        } else {
            spin_sdk::key_value::Store::open(name)
        }
        .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(Arc::new(store)),
        })
    }

    /// Open a named Key-Value store.
    ///
    /// Outside wasm this is a process-wide memory store: opening the same
    /// name twice yields the same data.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        use std::sync::OnceLock;

        static STORES: OnceLock<Mutex<HashMap<String, MemoryMap>>> = OnceLock::new();

        let mut stores = STORES
            .get_or_init(Default::default)
            .lock()
            .map_err(|_| CacheError::OpenError(format!("store registry poisoned ({})", name)))?;
        let map = stores.entry(name.to_string()).or_default().clone();
        Ok(Self {
            backend: Backend::Memory(map),
        })
    }

    /// A private in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryMap::default()),
        }
    }

    /// Open a directory-backed store, creating the directory if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir(".pharmacy")?;
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            backend: Backend::Dir(path.to_path_buf()),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("shoppingCart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("shoppingCart", &cart)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, &bytes)
    }

    /// Get the raw bytes stored under `key`.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(dir) => match std::fs::read(key_path(dir, key)) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Store raw bytes under `key`.
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .set(key, bytes)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes.to_vec());
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(dir) => {
                // Write then rename so readers never see a partial file.
                let path = key_path(dir, key);
                let tmp = path.with_extension("json.tmp");
                std::fs::write(&tmp, bytes)?;
                std::fs::rename(&tmp, &path)?;
                Ok(())
            }
        }
    }

    /// Delete a value from the cache. Missing keys are not an error.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.delete("shoppingCart")?;
    /// ```
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .delete(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(dir) => match std::fs::remove_file(key_path(dir, key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .exists(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(dir) => Ok(key_path(dir, key).is_file()),
        }
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get_keys()
                .map_err(|e| CacheError::StoreError(e.to_string()))?,
            Backend::Memory(map) => lock(map)?.keys().cloned().collect(),
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(dir) => {
                let mut keys = Vec::new();
                for entry in std::fs::read_dir(dir)? {
                    let name = entry?.file_name();
                    let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                        continue;
                    };
                    if let Some(key) = decode_key(stem) {
                        keys.push(key);
                    }
                }
                keys
            }
        };
        keys.sort();
        Ok(keys)
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(_) => "spin",
            Backend::Memory(_) => "memory",
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Dir(_) => "dir",
        }
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend_name())
            .finish()
    }
}

fn lock(map: &MemoryMap) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
    map.lock()
        .map_err(|_| CacheError::StoreError("memory store poisoned".to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", encode_key(key)))
}

/// Percent-encode everything outside `[A-Za-z0-9_-]` so any key maps to a
/// single safe file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = pharmacy_cache::cache_key!("shoppingCart", "user123");
/// assert_eq!(key, "shoppingCart:user123");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
