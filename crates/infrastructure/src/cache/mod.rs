//! Key store adapters
//!
//! Implementations of `KeyStorePort`:
//! - `RedisKeyStore`: shared store over a Redis connection manager
//! - `MemoryKeyStore`: process-local fallback with lazy expiry
//!
//! `select_backend` probes Redis once at startup and binds both facades to
//! whichever store answered.

mod backend;
mod memory_store;
mod redis_store;

pub use backend::{KeyStoreBackends, select_backend};
pub use memory_store::MemoryKeyStore;
pub use redis_store::RedisKeyStore;

/// Namespaced key for a logical key
#[must_use]
pub fn namespaced(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// Literal part of a wildcard-suffix pattern (`user:*` -> `user:`)
#[must_use]
pub fn pattern_stem(pattern: &str) -> &str {
    pattern.trim_end_matches('*')
}

/// Redis `SCAN MATCH` pattern for a wildcard-suffix pattern
///
/// Glob metacharacters inside the stem are escaped so that only the trailing
/// wildcard matches.
#[must_use]
pub fn scan_pattern(prefix: &str, pattern: &str) -> String {
    let stem = pattern_stem(pattern);
    let mut escaped = String::with_capacity(stem.len() + 4);
    for c in stem.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{prefix}{escaped}*")
}
