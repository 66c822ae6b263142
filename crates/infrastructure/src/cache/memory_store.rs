//! Process-local key store
//!
//! A mutex-guarded map with absolute expiry instants. Expired entries are
//! evicted lazily when touched; prefix clears scan every key.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use application::{
    error::KeyStoreError,
    ports::{BackendKind, Clock, KeyStorePort, window_start_ms},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use super::{namespaced, pattern_stem};

#[derive(Debug, Clone)]
enum Slot {
    Value(String),
    /// Request timestamps in insertion order, duplicates allowed
    Window(Vec<u64>),
}

#[derive(Debug, Clone)]
struct Entry {
    slot: Slot,
    expires_at_ms: u64,
}

impl Entry {
    const fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// In-memory `KeyStorePort` used when Redis is unavailable
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, Entry>>,
    prefix: String,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryKeyStore")
            .field("prefix", &self.prefix)
            .field("entries", &self.entries.lock().len())
            .finish_non_exhaustive()
    }
}

impl MemoryKeyStore {
    #[must_use]
    pub fn new(prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            prefix: prefix.into(),
            clock,
        }
    }

    /// Number of stored entries, including expired ones not yet evicted
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(&self, key: &str) -> String {
        namespaced(&self.prefix, key)
    }

    /// Live entry under `key`, evicting it first if it has expired
    fn live<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now_ms: u64,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|e| e.is_expired(now_ms)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl KeyStorePort for MemoryKeyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyStoreError> {
        let now = self.clock.now_ms();
        let full = self.key(key);
        let mut entries = self.entries.lock();
        match Self::live(&mut entries, &full, now) {
            None => Ok(None),
            Some(Entry {
                slot: Slot::Value(v),
                ..
            }) => Ok(Some(v.clone())),
            Some(_) => Err(KeyStoreError::WrongType(key.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KeyStoreError> {
        let now = self.clock.now_ms();
        self.entries.lock().insert(
            self.key(key),
            Entry {
                slot: Slot::Value(value.to_string()),
                expires_at_ms: now.saturating_add(duration_ms(ttl)),
            },
        );
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, KeyStoreError> {
        let now = self.clock.now_ms();
        let full = self.key(key);
        let mut entries = self.entries.lock();
        if Self::live(&mut entries, &full, now).is_some() {
            return Ok(false);
        }
        entries.insert(
            full,
            Entry {
                slot: Slot::Value(value.to_string()),
                expires_at_ms: now.saturating_add(duration_ms(ttl)),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool, KeyStoreError> {
        let now = self.clock.now_ms();
        let full = self.key(key);
        let mut entries = self.entries.lock();
        let existed = Self::live(&mut entries, &full, now).is_some();
        entries.remove(&full);
        Ok(existed)
    }

    async fn exists(&self, key: &str) -> Result<bool, KeyStoreError> {
        let now = self.clock.now_ms();
        let full = self.key(key);
        Ok(Self::live(&mut self.entries.lock(), &full, now).is_some())
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear_by_prefix(&self, pattern: &str) -> Result<u64, KeyStoreError> {
        let now = self.clock.now_ms();
        let stem = self.key(pattern_stem(pattern));
        let mut removed = 0u64;
        self.entries.lock().retain(|key, entry| {
            if !key.starts_with(&stem) {
                return true;
            }
            if !entry.is_expired(now) {
                removed += 1;
            }
            false
        });
        debug!(removed, "Cleared keys");
        Ok(removed)
    }

    async fn atomic_window_update(
        &self,
        key: &str,
        window: Duration,
        now_ms: u64,
    ) -> Result<u64, KeyStoreError> {
        let start = window_start_ms(now_ms, window);
        let expires_at_ms = now_ms.saturating_add(duration_ms(window));
        let full = self.key(key);
        let mut entries = self.entries.lock();

        match Self::live(&mut entries, &full, self.clock.now_ms()) {
            Some(Entry {
                slot: Slot::Window(stamps),
                expires_at_ms: expiry,
            }) => {
                stamps.retain(|&t| t > start);
                stamps.push(now_ms);
                *expiry = expires_at_ms;
                Ok(stamps.len() as u64)
            },
            Some(_) => Err(KeyStoreError::WrongType(key.to_string())),
            None => {
                entries.insert(
                    full,
                    Entry {
                        slot: Slot::Window(vec![now_ms]),
                        expires_at_ms,
                    },
                );
                Ok(1)
            },
        }
    }

    async fn window_count(
        &self,
        key: &str,
        window: Duration,
        now_ms: u64,
    ) -> Result<u64, KeyStoreError> {
        let start = window_start_ms(now_ms, window);
        let full = self.key(key);
        let mut entries = self.entries.lock();
        match Self::live(&mut entries, &full, self.clock.now_ms()) {
            None => Ok(0),
            Some(Entry {
                slot: Slot::Window(stamps),
                ..
            }) => Ok(stamps.iter().filter(|&&t| t > start).count() as u64),
            Some(_) => Err(KeyStoreError::WrongType(key.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), KeyStoreError> {
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }
}
