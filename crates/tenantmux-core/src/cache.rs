//! Expiring key-value cache
//!
//! `TtlCache` stores values together with the instant they were written.
//!
//! Key principles:
//! - Liveness is checked on every read: an entry older than the TTL is a miss,
//!   whether or not a sweep has removed it yet
//! - `sweep` only reclaims memory; correctness never depends on it running
//! - No size bound. Growth is limited only by the periodic sweep
//!
//! Time comes from `tokio::time::Instant` so tests can drive it with a paused clock.

use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// A cached value and the instant it was written
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    written_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.written_at) < ttl
    }
}

/// Generic time-bounded cache.
///
/// All operations take the internal lock for the duration of a single map
/// operation, so `get`, `set` and `sweep` are atomic with respect to each other.
pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read a live value
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    /// Read a value as of `now`
    pub fn get_at<Q>(&self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_live(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Write a value, replacing any previous entry and restarting its TTL
    pub fn set(&self, key: K, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Write a value with an explicit write time
    pub fn set_at(&self, key: K, value: V, written_at: Instant) {
        self.entries
            .write()
            .insert(key, CacheEntry { value, written_at });
    }

    /// Drop an entry regardless of its age
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.write().remove(key).map(|entry| entry.value)
    }

    /// Remove every entry that is no longer live at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.is_live(now, ttl));
        let removed = before - entries.len();
        if removed > 0 {
            trace!(cache = self.name, removed, "[TtlCache] Swept expired entries");
        }
        removed
    }

    /// Number of physically stored entries, live or not
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether the key is physically stored (ignores liveness)
    pub fn contains_entry<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.read().contains_key(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Anything the periodic cleanup can sweep
pub trait Sweep: Send + Sync {
    fn cache_name(&self) -> &'static str;

    /// Remove expired entries, returning how many were dropped
    fn sweep_expired(&self, now: Instant) -> usize;

    fn entry_count(&self) -> usize;
}

impl<K, V> Sweep for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache_name(&self) -> &'static str {
        self.name
    }

    fn sweep_expired(&self, now: Instant) -> usize {
        self.sweep(now)
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}
