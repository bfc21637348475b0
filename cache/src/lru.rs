use std::fmt;
use std::hash::Hash;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builder::{CacheBuilder, OnMiss};
use crate::error::{BuildError, CacheMiss};
use crate::list::RecencyList;
use crate::metrics::{Metrics, MetricsSnapshot};

/// A thread-safe, bounded cache that evicts the least-recently-used entry.
///
/// Every successful read or write marks its entry most recent, so the
/// entry at the cold end of the recency list is always the one whose last
/// access is oldest. Inserting into a full cache silently evicts that
/// entry first.
///
/// Values are stored as `Arc<V>`, so lookups hand out owned handles
/// without requiring `V: Clone`.
///
/// All operations on one instance serialize on a single internal lock;
/// separate instances are fully independent. A configured miss handler
/// runs with the lock released, so it may take its time (or re-enter the
/// cache) without wedging other callers.
///
/// ```
/// use weft_cache::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.insert("x", 1);
/// cache.insert("y", 2);
/// cache.get(&"x").unwrap();
/// cache.insert("z", 3);
///
/// assert!(!cache.contains_key(&"y"), "the read kept 'x' warm, so 'y' went");
/// assert!(cache.contains_key(&"x"));
/// assert!(cache.contains_key(&"z"));
/// ```
pub struct LruCache<K, V> {
  pub(crate) state: Mutex<RecencyList<K, V>>,
  pub(crate) metrics: Metrics,
  pub(crate) max_size: usize,
  pub(crate) on_miss: Option<OnMiss<K, V>>,
}

impl<K, V> LruCache<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Creates a cache holding at most `max_size` entries.
  pub fn new(max_size: usize) -> Result<Self, BuildError> {
    CacheBuilder::new().max_size(max_size).build_lru()
  }

  pub fn builder() -> CacheBuilder<K, V> {
    CacheBuilder::new()
  }

  /// Inserts an entry, evicting the least-recently-used one first when a
  /// new key would exceed capacity. The entry becomes the most recent
  /// either way. Returns the replaced value, if any.
  pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
    self.insert_arc(key, Arc::new(value))
  }

  pub(crate) fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
    let mut state = self.state.lock();
    if !state.contains(&key) && state.len() >= self.max_size && state.pop_tail().is_some() {
      self.metrics.evictions.fetch_add(1, Ordering::Relaxed);
    }
    let replaced = state.insert(key, value);
    self.metrics.inserts.fetch_add(1, Ordering::Relaxed);
    replaced
  }

  /// Looks up `key`, marking the entry most recent on a hit.
  ///
  /// A miss is counted first; then, when a miss handler is configured,
  /// its value is inserted as if by [`insert`](Self::insert) and returned
  /// instead of an error. The handler runs with the lock released, so two
  /// racing misses may both compute and the later insert wins.
  pub fn get(&self, key: &K) -> Result<Arc<V>, CacheMiss<K>> {
    {
      let mut state = self.state.lock();
      if let Some(value) = state.touch(key) {
        self.metrics.hits.fetch_add(1, Ordering::Relaxed);
        return Ok(value);
      }
    }
    self.metrics.misses.fetch_add(1, Ordering::Relaxed);

    match &self.on_miss {
      Some(on_miss) => {
        let value = Arc::new(on_miss(key));
        self.insert_arc(key.clone(), value.clone());
        Ok(value)
      }
      None => Err(CacheMiss::new(key.clone())),
    }
  }

  /// Looks up `key`, tolerating absence: a hit promotes and counts as
  /// usual, while a miss only counts a soft miss and returns `None`. The
  /// miss handler is never consulted.
  pub fn try_get(&self, key: &K) -> Option<Arc<V>> {
    let mut state = self.state.lock();
    match state.touch(key) {
      Some(value) => {
        self.metrics.hits.fetch_add(1, Ordering::Relaxed);
        Some(value)
      }
      None => {
        self.metrics.soft_misses.fetch_add(1, Ordering::Relaxed);
        None
      }
    }
  }

  /// Reads `key` without updating recency order or any counter.
  pub fn peek(&self, key: &K) -> Option<Arc<V>> {
    self.state.lock().peek(key)
  }

  /// Removes the entry for `key` and returns its value.
  ///
  /// Removal touches none of the lookup counters; it is tallied as an
  /// invalidation only.
  pub fn remove(&self, key: &K) -> Result<Arc<V>, CacheMiss<K>> {
    let mut state = self.state.lock();
    match state.remove(key) {
      Some(value) => {
        self.metrics.invalidations.fetch_add(1, Ordering::Relaxed);
        Ok(value)
      }
      None => Err(CacheMiss::new(key.clone())),
    }
  }

  /// Drops every entry. Counters keep their values.
  pub fn clear(&self) {
    self.state.lock().clear();
  }

  pub fn len(&self) -> usize {
    self.state.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.state.lock().is_empty()
  }

  /// Whether `key` is present. Does not promote the entry and counts
  /// neither a hit nor a miss.
  pub fn contains_key(&self, key: &K) -> bool {
    self.state.lock().contains(key)
  }

  /// A snapshot of the keys from most to least recently used.
  pub fn keys(&self) -> Vec<K> {
    self.state.lock().keys_front_to_back()
  }

  pub fn max_size(&self) -> usize {
    self.max_size
  }

  /// The number of lookups that found their key.
  pub fn hit_count(&self) -> u64 {
    self.metrics.hits.load(Ordering::Relaxed)
  }

  /// The number of strict lookups that failed, counted before any miss
  /// handler runs.
  pub fn miss_count(&self) -> u64 {
    self.metrics.misses.load(Ordering::Relaxed)
  }

  /// The number of tolerant lookups that came back empty.
  pub fn soft_miss_count(&self) -> u64 {
    self.metrics.soft_misses.load(Ordering::Relaxed)
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.metrics.snapshot()
  }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LruCache")
      .field("max_size", &self.max_size)
      .field("has_on_miss", &self.on_miss.is_some())
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}
