//! Key store port definition
//!
//! The contract shared by the networked store and the in-process fallback.
//! Keys passed here are logical keys; implementations apply the process-wide
//! namespace prefix themselves.

use std::{fmt, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::KeyStoreError;

/// Which backend a store is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Shared, networked store
    Redis,
    /// Process-local fallback
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store with expiry and an atomic sliding-window primitive
///
/// Every operation reports backend faults as [`KeyStoreError`]; callers decide
/// how to degrade.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyStorePort: Send + Sync {
    /// Read a raw value, `None` if missing or expired
    async fn get(&self, key: &str) -> Result<Option<String>, KeyStoreError>;

    /// Write a raw value that expires after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KeyStoreError>;

    /// Write only if the key is absent; returns whether the write happened
    ///
    /// An existing key keeps its value and its remaining TTL.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, KeyStoreError>;

    /// Remove a key; `true` iff something was removed
    async fn delete(&self, key: &str) -> Result<bool, KeyStoreError>;

    /// Whether a live key exists
    async fn exists(&self, key: &str) -> Result<bool, KeyStoreError>;

    /// Remove every key matching a wildcard-suffix pattern such as `user:*`
    ///
    /// Returns the number of keys removed.
    async fn clear_by_prefix(&self, pattern: &str) -> Result<u64, KeyStoreError>;

    /// Record a request at `now_ms` in the window stored under `key`
    ///
    /// Atomically drops timestamps at or before `now_ms - window`, inserts
    /// `now_ms`, refreshes the key's expiry to `window` and returns the count
    /// including the inserted request.
    async fn atomic_window_update(
        &self,
        key: &str,
        window: Duration,
        now_ms: u64,
    ) -> Result<u64, KeyStoreError>;

    /// Count timestamps after `now_ms - window` without recording anything
    async fn window_count(
        &self,
        key: &str,
        window: Duration,
        now_ms: u64,
    ) -> Result<u64, KeyStoreError>;

    /// Liveness probe
    async fn ping(&self) -> Result<(), KeyStoreError>;

    /// Which backend this store is bound to
    fn kind(&self) -> BackendKind;
}

/// Start of a window ending at `now_ms`, saturating at zero
#[must_use]
pub fn window_start_ms(now_ms: u64, window: Duration) -> u64 {
    let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
    now_ms.saturating_sub(window_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn KeyStorePort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn KeyStorePort>();
    }

    #[test]
    fn backend_kind_names() {
        assert_eq!(BackendKind::Redis.to_string(), "redis");
        assert_eq!(BackendKind::Memory.as_str(), "memory");
        assert_eq!(serde_json::to_string(&BackendKind::Memory).unwrap(), "\"memory\"");
    }

    #[test]
    fn window_start_subtracts_window() {
        assert_eq!(window_start_ms(70_000, Duration::from_secs(60)), 10_000);
    }

    #[test]
    fn window_start_saturates() {
        assert_eq!(window_start_ms(5_000, Duration::from_secs(60)), 0);
    }
}
