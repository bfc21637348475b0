use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::mem;

use crate::builder::{CacheBuilder, OnMiss};
use crate::error::{BuildError, CacheMiss};

/// A bounded cache that evicts the least-recently-*inserted* entry.
///
/// Eviction order is fixed at insertion time: reads never reorder
/// anything, which makes this strictly cheaper than [`LruCache`]: no
/// lock, no recency links, no counters. It is not thread-safe by design;
/// callers that need concurrent access should reach for [`LruCache`] or
/// wrap this one in their own lock.
///
/// [`LruCache`]: crate::LruCache
///
/// ```
/// use weft_cache::LriCache;
///
/// let mut cache = LriCache::new(2).unwrap();
/// cache.insert("x", 1);
/// cache.insert("y", 2);
/// cache.get(&"x").unwrap();
/// cache.insert("z", 3);
///
/// assert!(!cache.contains_key(&"x"), "reads do not protect an entry");
/// assert!(cache.contains_key(&"y"));
/// assert!(cache.contains_key(&"z"));
/// ```
pub struct LriCache<K, V> {
  pub(crate) entries: HashMap<K, V, ahash::RandomState>,
  // Keys in insertion order; the front is the next eviction candidate.
  pub(crate) queue: VecDeque<K>,
  pub(crate) max_size: usize,
  pub(crate) on_miss: Option<OnMiss<K, V>>,
}

impl<K, V> LriCache<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Creates a cache holding at most `max_size` entries.
  pub fn new(max_size: usize) -> Result<Self, BuildError> {
    CacheBuilder::new().max_size(max_size).build_lri()
  }

  pub fn builder() -> CacheBuilder<K, V> {
    CacheBuilder::new()
  }

  /// Inserts an entry, evicting the oldest-inserted one first when a new
  /// key would exceed capacity.
  ///
  /// Overwriting an existing key replaces its value in place and keeps
  /// its original queue slot: the first insertion owns the eviction
  /// position.
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    if let Some(slot) = self.entries.get_mut(&key) {
      return Some(mem::replace(slot, value));
    }

    if self.entries.len() >= self.max_size {
      if let Some(oldest) = self.queue.pop_front() {
        self.entries.remove(&oldest);
      }
    }
    self.queue.push_back(key.clone());
    self.entries.insert(key, value);
    None
  }

  /// Looks up `key` without disturbing the eviction order.
  ///
  /// On a miss with a miss handler configured, the handler's value is
  /// inserted (evicting as usual) and returned.
  pub fn get(&mut self, key: &K) -> Result<&V, CacheMiss<K>> {
    if !self.entries.contains_key(key) {
      let on_miss = match &self.on_miss {
        Some(handler) => handler.clone(),
        None => return Err(CacheMiss::new(key.clone())),
      };
      let value = on_miss(key);
      self.insert(key.clone(), value);
    }
    Ok(&self.entries[key])
  }

  /// Reads `key` without consulting the miss handler.
  pub fn peek(&self, key: &K) -> Option<&V> {
    self.entries.get(key)
  }

  /// Removes the entry for `key`, dropping its queue slot as well.
  pub fn remove(&mut self, key: &K) -> Result<V, CacheMiss<K>> {
    match self.entries.remove(key) {
      Some(value) => {
        self.queue.retain(|queued| queued != key);
        Ok(value)
      }
      None => Err(CacheMiss::new(key.clone())),
    }
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.queue.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn contains_key(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  /// A snapshot of the keys from oldest to newest insertion.
  pub fn keys(&self) -> Vec<K> {
    self.queue.iter().cloned().collect()
  }

  pub fn max_size(&self) -> usize {
    self.max_size
  }
}

impl<K, V> fmt::Debug for LriCache<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LriCache")
      .field("max_size", &self.max_size)
      .field("len", &self.entries.len())
      .field("has_on_miss", &self.on_miss.is_some())
      .finish_non_exhaustive()
  }
}
