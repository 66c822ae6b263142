//! Cache facade
//!
//! Fail-safe, JSON-typed operations over a [`KeyStorePort`]. Backend faults
//! are logged and turned into a miss or a no-op; they never reach callers.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::ports::{BackendKind, KeyStorePort};

/// TTL used when a caller passes none or zero
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Derive the key used by [`CacheService::cached`]
///
/// The arguments are hashed with blake3 over their JSON encoding, so equal
/// arguments map to the same key across processes.
pub fn derive_cache_key<A>(namespace: &str, function: &str, args: &A) -> Option<String>
where
    A: Serialize + ?Sized,
{
    let encoded = serde_json::to_vec(args).ok()?;
    let hash = blake3::hash(&encoded);
    Some(format!("{namespace}{function}:{}", hash.to_hex()))
}

/// Read-through cache over the bound key store
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyStorePort>,
    default_ttl: Duration,
}

impl fmt::Debug for CacheService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheService")
            .field("backend", &self.store.kind())
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl CacheService {
    /// Create a cache over `store` with the standard default TTL
    #[must_use]
    pub fn new(store: Arc<dyn KeyStorePort>) -> Self {
        Self {
            store,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Override the default TTL; zero keeps the standard default
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        if !ttl.is_zero() {
            self.default_ttl = ttl;
        }
        self
    }

    /// Backend this cache is bound to
    pub fn backend_kind(&self) -> BackendKind {
        self.store.kind()
    }

    /// Whether the bound backend answers a liveness probe
    pub async fn is_responsive(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(ttl) if !ttl.is_zero() => ttl,
            _ => self.default_ttl,
        }
    }

    /// Read a typed value
    ///
    /// Absent, expired, undecodable and JSON `null` values are all misses, as
    /// is any backend fault.
    #[instrument(skip(self), level = "debug")]
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            },
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            },
        };

        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Null) => {
                debug!(key, "Cached null treated as miss");
                return None;
            },
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Cached value is not valid JSON");
                return None;
            },
        };

        match serde_json::from_value(value) {
            Ok(typed) => {
                debug!(key, "Cache hit");
                Some(typed)
            },
            Err(e) => {
                warn!(key, error = %e, "Cached value has unexpected shape");
                None
            },
        }
    }

    /// Write a typed value; `false` on any failure
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool
    where
        T: Serialize + ?Sized,
    {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache value");
                return false;
            },
        };

        match self.store.set(key, &raw, self.effective_ttl(ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Cache write failed");
                false
            },
        }
    }

    /// Remove a key; `true` iff something was removed
    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, key: &str) -> bool {
        self.store.delete(key).await.unwrap_or_else(|e| {
            warn!(key, error = %e, "Cache delete failed");
            false
        })
    }

    /// Whether a live key exists
    #[instrument(skip(self), level = "debug")]
    pub async fn exists(&self, key: &str) -> bool {
        self.store.exists(key).await.unwrap_or_else(|e| {
            warn!(key, error = %e, "Cache exists check failed");
            false
        })
    }

    /// Remove every key matching a wildcard-suffix pattern such as `user:*`
    #[instrument(skip(self), level = "debug")]
    pub async fn clear_by_prefix(&self, pattern: &str) -> u64 {
        self.store.clear_by_prefix(pattern).await.unwrap_or_else(|e| {
            warn!(pattern, error = %e, "Cache prefix clear failed");
            0
        })
    }

    /// Return the cached value or compute, store and return it
    ///
    /// `compute` runs at most once per call. Concurrent misses on the same key
    /// each run their own computation.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(hit) = self.get(key).await {
            return hit;
        }
        let value = compute().await;
        self.set(key, &value, ttl).await;
        value
    }

    /// Like [`Self::get_or_compute`] for fallible computations
    ///
    /// Only `Ok` results are stored.
    pub async fn try_get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    /// Wrap a computation keyed by its name and arguments
    ///
    /// The key is `{namespace}{function}:{hash(args)}`. Arguments that cannot
    /// be encoded bypass the cache.
    pub async fn cached<A, T, F, Fut>(
        &self,
        namespace: &str,
        function: &str,
        args: &A,
        ttl: Option<Duration>,
        compute: F,
    ) -> T
    where
        A: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        match derive_cache_key(namespace, function, args) {
            Some(key) => self.get_or_compute(&key, ttl, compute).await,
            None => compute().await,
        }
    }

    /// Fallible form of [`Self::cached`]; only `Ok` results are stored
    pub async fn try_cached<A, T, E, F, Fut>(
        &self,
        namespace: &str,
        function: &str,
        args: &A,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        A: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match derive_cache_key(namespace, function, args) {
            Some(key) => self.try_get_or_compute(&key, ttl, compute).await,
            None => compute().await,
        }
    }
}
