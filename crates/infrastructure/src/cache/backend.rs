//! Startup backend selection
//!
//! Redis is probed exactly once. On success both facades share the one
//! connection; on any failure each facade gets its own process-local store.
//! The binding never changes afterwards.

use std::{fmt, sync::Arc};

use application::ports::{BackendKind, Clock, KeyStorePort};
use tracing::{info, instrument, warn};

use super::{MemoryKeyStore, RedisKeyStore};
use crate::config::RedisConfig;

/// Key stores bound for the process lifetime
#[derive(Clone)]
pub struct KeyStoreBackends {
    /// Store behind the cache facade
    pub cache: Arc<dyn KeyStorePort>,
    /// Store behind the rate limiter
    pub rate_limit: Arc<dyn KeyStorePort>,
    /// Which backend both are bound to
    pub kind: BackendKind,
}

impl fmt::Debug for KeyStoreBackends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStoreBackends")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl KeyStoreBackends {
    /// Independent local stores for the cache and the rate limiter
    #[must_use]
    pub fn memory(prefix: &str, clock: &Arc<dyn Clock>) -> Self {
        Self {
            cache: Arc::new(MemoryKeyStore::new(prefix, Arc::clone(clock))),
            rate_limit: Arc::new(MemoryKeyStore::new(prefix, Arc::clone(clock))),
            kind: BackendKind::Memory,
        }
    }

    /// Both facades on one shared Redis store
    #[must_use]
    pub fn redis(store: RedisKeyStore) -> Self {
        let shared: Arc<dyn KeyStorePort> = Arc::new(store);
        Self {
            cache: Arc::clone(&shared),
            rate_limit: shared,
            kind: BackendKind::Redis,
        }
    }
}

/// Probe Redis and bind the key stores
///
/// Connection refusals, timeouts and auth failures are treated alike. There is
/// no retry and no later re-probe.
#[instrument(skip_all, fields(redis_enabled = config.enabled))]
pub async fn select_backend(
    config: &RedisConfig,
    prefix: &str,
    clock: Arc<dyn Clock>,
) -> KeyStoreBackends {
    if !config.enabled {
        info!("Redis disabled, using in-memory key stores");
        return KeyStoreBackends::memory(prefix, &clock);
    }

    match RedisKeyStore::connect(config, prefix).await {
        Ok(store) => {
            info!(backend = %BackendKind::Redis, "Key store backend selected");
            KeyStoreBackends::redis(store)
        },
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory key stores");
            KeyStoreBackends::memory(prefix, &clock)
        },
    }
}
