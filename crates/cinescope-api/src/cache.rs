//! Time-windowed response cache with size-bounded eviction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Default time-to-live for cached responses (5 minutes).
const DEFAULT_DURATION_MS: u64 = 300_000;

/// Default maximum number of cached responses.
const DEFAULT_MAX_SIZE: usize = 100;

/// Cache shared by every client of one process.
pub type SharedCache = Arc<Mutex<ResponseCache<serde_json::Value>>>;

/// Cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live of each entry in milliseconds.
    pub duration_ms: u64,
    /// Maximum number of entries kept.
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Partial configuration applied by [`ResponseCache::update_config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfigUpdate {
    /// New time-to-live in milliseconds.
    pub duration_ms: Option<u64>,
    /// New capacity.
    pub max_size: Option<usize>,
}

/// Snapshot returned by [`ResponseCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Number of entries currently stored (expired ones included until swept).
    pub size: usize,
    /// Configured capacity.
    pub max_size: usize,
    /// Approximate bytes held: keys plus serialized values.
    pub memory_usage: usize,
    /// Fraction of `get` calls answered from the cache, `0.0` before any lookup.
    pub hit_rate: f64,
}

/// A single cached value.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    expires_at: Instant,
    /// Insertion sequence, breaks `stored_at` ties on eviction.
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Key/value store with per-entry expiry and oldest-first eviction.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    config: CacheConfig,
    next_seq: u64,
    hits: u32,
    misses: u32,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V> ResponseCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            next_seq: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> CacheConfig {
        self.config
    }

    /// Number of stored entries, expired ones included until swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key` if present and fresh.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    /// [`Self::get`] evaluated at `now`.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<&V> {
        if self.evict_if_expired(key, now) {
            self.hits = self.hits.saturating_add(1);
            self.entries.get(key).map(|entry| &entry.value)
        } else {
            self.misses = self.misses.saturating_add(1);
            None
        }
    }

    /// Stores `value` under `key`, then sweeps expired entries and enforces capacity.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// [`Self::set`] evaluated at `now`.
    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: Instant) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let expires_at = now
            .checked_add(self.config.duration())
            .unwrap_or(now);

        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: now,
                expires_at,
                seq,
            },
        );

        self.sweep_expired(now);
        self.enforce_max_size();
    }

    /// Whether `key` holds a fresh value. Expired entries are removed.
    pub fn has(&mut self, key: &str) -> bool {
        self.has_at(key, Instant::now())
    }

    /// [`Self::has`] evaluated at `now`.
    pub fn has_at(&mut self, key: &str, now: Instant) -> bool {
        self.evict_if_expired(key, now)
    }

    /// Removes `key`. Returns whether an entry existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every key starting with `prefix`. Returns the number removed.
    pub fn remove_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before.saturating_sub(self.entries.len())
    }

    /// Empties the cache and resets hit/miss counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Merges `update` into the configuration and re-enforces capacity.
    pub fn update_config(&mut self, update: CacheConfigUpdate) {
        if let Some(duration_ms) = update.duration_ms {
            self.config.duration_ms = duration_ms;
        }
        if let Some(max_size) = update.max_size {
            self.config.max_size = max_size;
        }
        self.enforce_max_size();
    }

    /// Keeps `key` only if fresh at `now`; returns whether it is still present.
    fn evict_if_expired(&mut self, key: &str, now: Instant) -> bool {
        match self.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                false
            }
            Some(_) => true,
        }
    }

    fn sweep_expired(&mut self, now: Instant) {
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    fn enforce_max_size(&mut self) {
        while self.entries.len() > self.config.max_size {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.stored_at, entry.seq))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    tracing::trace!(%key, "evicting oldest cache entry");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    fn hit_rate(&self) -> f64 {
        let total = u64::from(self.hits).saturating_add(u64::from(self.misses));
        if total == 0 {
            0.0
        } else {
            f64::from(self.hits) / total as f64
        }
    }
}

impl<V: Serialize> ResponseCache<V> {
    /// Size, capacity, approximate memory usage and hit rate.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let memory_usage = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let value_len = serde_json::to_vec(&entry.value).map_or(0, |bytes| bytes.len());
                key.len().saturating_add(value_len)
            })
            .fold(0_usize, usize::saturating_add);

        CacheStats {
            size: self.entries.len(),
            max_size: self.config.max_size,
            memory_usage,
            hit_rate: self.hit_rate(),
        }
    }
}

/// Builds the cache key for `endpoint` called with `params`.
///
/// Parameters are serialized as a JSON object with sorted keys, so the same
/// mapping always yields the same key regardless of argument order.
#[must_use]
pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::from(endpoint);
    }
    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    let serialized = serde_json::to_string(&sorted).unwrap_or_default();
    format!("{endpoint}{serialized}")
}
