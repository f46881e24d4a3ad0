//! In-memory memoization of producer calls.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use sheetproxy_core::constants::{DEFAULT_CACHE_TTL_SECONDS, MIN_SWEEP_INTERVAL_SECONDS};

use crate::key::cache_key;

/// One memoized result.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Cached results of one producer, keyed by argument key.
struct ProducerRegistration<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> ProducerRegistration<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a result stays fresh, in seconds
    pub ttl_seconds: u64,
    /// Period of the background sweep; defaults to the TTL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_interval_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            sweep_interval_seconds: None,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given TTL.
    pub fn with_ttl_seconds(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            ..Default::default()
        }
    }

    /// Time-to-live of a cached result.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Period of the background sweep, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        let secs = self.sweep_interval_seconds.unwrap_or(self.ttl_seconds);
        Duration::from_secs(secs.max(MIN_SWEEP_INTERVAL_SECONDS))
    }
}

/// Memoizing proxy in front of asynchronous producers.
///
/// Results are partitioned by a caller-supplied producer id and keyed by the
/// serialized argument list. A result is served from the cache while it is
/// younger than the TTL; older entries are ignored on lookup and removed by
/// [`ProxyCache::purge_expired`], which the
/// [`ExpiryScheduler`](crate::ExpiryScheduler) runs periodically.
///
/// There is no single-flight coalescing: concurrent misses for the same
/// producer and arguments each invoke the producer, and the last one to
/// finish overwrites the entry.
pub struct ProxyCache<V> {
    registrations: RwLock<HashMap<String, ProducerRegistration<V>>>,
    config: CacheConfig,
}

impl<V: Clone> ProxyCache<V> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Time-to-live of a cached result.
    pub fn ttl(&self) -> Duration {
        self.config.ttl()
    }

    /// Calls `producer` with `args`, or returns its fresh cached result.
    ///
    /// On a hit the producer is not invoked. On a miss it is invoked exactly
    /// once; a successful result is stored under `producer_id` and the key of
    /// `args`, a failure is returned unchanged and nothing is stored.
    ///
    /// Arguments that cannot be serialized are a caller bug; such calls are
    /// logged and go straight to the producer without caching.
    pub async fn memoized_call<A, F, Fut, E>(
        &self,
        producer_id: &str,
        args: A,
        producer: F,
    ) -> Result<V, E>
    where
        A: Serialize,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = match cache_key(&args) {
            Ok(key) => key,
            Err(e) => {
                warn!(producer_id, error = %e, "Arguments not serializable, bypassing cache");
                return producer(args).await;
            }
        };

        if let Some(value) = self.lookup(producer_id, &key) {
            debug!(producer_id, key = %key, "Cache hit");
            return Ok(value);
        }

        debug!(producer_id, key = %key, "Cache miss");
        let value = producer(args).await?;
        self.store(producer_id, key, value.clone());
        Ok(value)
    }

    fn lookup(&self, producer_id: &str, key: &str) -> Option<V> {
        let registrations = self.registrations.read();
        let entry = registrations.get(producer_id)?.entries.get(key)?;
        if entry.is_expired(self.ttl(), Instant::now()) {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    fn store(&self, producer_id: &str, key: String, value: V) {
        let mut registrations = self.registrations.write();
        let registration = registrations
            .entry(producer_id.to_string())
            .or_insert_with(ProducerRegistration::new);
        registration.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Returns the number of entries held, stale ones included.
    pub fn count_cached_entries(&self) -> usize {
        self.registrations
            .read()
            .values()
            .map(|r| r.entries.len())
            .sum()
    }

    /// Removes every entry older than the TTL and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl();
        let now = Instant::now();
        let mut registrations = self.registrations.write();

        let mut removed = 0;
        for registration in registrations.values_mut() {
            let before = registration.entries.len();
            registration.entries.retain(|_, e| !e.is_expired(ttl, now));
            removed += before - registration.entries.len();
        }
        removed
    }

    /// Clears all cached entries. Producer registrations are kept.
    pub fn clear(&self) {
        for registration in self.registrations.write().values_mut() {
            registration.entries.clear();
        }
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let ttl = self.ttl();
        let now = Instant::now();
        let registrations = self.registrations.read();

        let total = registrations.values().map(|r| r.entries.len()).sum::<usize>();
        let expired = registrations
            .values()
            .flat_map(|r| r.entries.values())
            .filter(|e| e.is_expired(ttl, now))
            .count();

        CacheStats {
            producers: registrations.len(),
            total_entries: total,
            expired_entries: expired,
            valid_entries: total - expired,
        }
    }
}

impl<V: Clone> Default for ProxyCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Producers that have stored at least one result
    pub producers: usize,
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries not yet swept
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
}
