use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BuildError;
use crate::list::RecencyList;
use crate::lri::LriCache;
use crate::lru::LruCache;
use crate::metrics::Metrics;

/// The capacity used when a builder is not given an explicit size.
pub const DEFAULT_MAX_SIZE: usize = 128;

/// A cache's miss handler: computes the value to store for an absent key.
pub type OnMiss<K, V> = Arc<dyn Fn(&K) -> V + Send + Sync>;

/// A builder for creating [`LruCache`] and [`LriCache`] instances.
///
/// ```
/// use weft_cache::CacheBuilder;
///
/// let cache = CacheBuilder::new()
///   .max_size(64)
///   .on_miss(|key: &u32| key * 10)
///   .build_lru()
///   .unwrap();
///
/// assert_eq!(*cache.get(&3).unwrap(), 30);
/// ```
pub struct CacheBuilder<K, V> {
  max_size: usize,
  on_miss: Option<OnMiss<K, V>>,
  seed: Vec<(K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
  /// Creates a new `CacheBuilder` with default settings.
  pub fn new() -> Self {
    Self {
      max_size: DEFAULT_MAX_SIZE,
      on_miss: None,
      seed: Vec::new(),
    }
  }

  /// Sets the maximum number of entries the cache may hold.
  pub fn max_size(mut self, max_size: usize) -> Self {
    self.max_size = max_size;
    self
  }

  /// Sets the miss handler.
  ///
  /// The handler is called by `get` when a key is not present; its return
  /// value is inserted and handed back to the caller.
  pub fn on_miss(mut self, handler: impl Fn(&K) -> V + Send + Sync + 'static) -> Self {
    self.on_miss = Some(Arc::new(handler));
    self
  }

  /// Queues entries to insert into the cache as soon as it is built.
  ///
  /// Seed entries are inserted in iteration order and are subject to the
  /// size bound like any other insert.
  pub fn populate(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self {
    self.seed.extend(entries);
    self
  }

  /// Validates the builder configuration.
  fn validate(&self) -> Result<(), BuildError> {
    if self.max_size == 0 {
      return Err(BuildError::ZeroCapacity);
    }
    Ok(())
  }
}

impl<K, V> CacheBuilder<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Builds a thread-safe, least-recently-used cache.
  pub fn build_lru(self) -> Result<LruCache<K, V>, BuildError> {
    self.validate()?;
    let cache = LruCache {
      state: Mutex::new(RecencyList::with_capacity(self.max_size)),
      metrics: Metrics::new(),
      max_size: self.max_size,
      on_miss: self.on_miss,
    };
    for (key, value) in self.seed {
      cache.insert(key, value);
    }
    Ok(cache)
  }

  /// Builds a single-threaded, least-recently-inserted cache.
  pub fn build_lri(self) -> Result<LriCache<K, V>, BuildError> {
    self.validate()?;
    let mut cache = LriCache {
      entries: HashMap::with_capacity_and_hasher(self.max_size, ahash::RandomState::default()),
      queue: VecDeque::with_capacity(self.max_size),
      max_size: self.max_size,
      on_miss: self.on_miss,
    };
    for (key, value) in self.seed {
      cache.insert(key, value);
    }
    Ok(cache)
  }
}

impl<K, V> Default for CacheBuilder<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("max_size", &self.max_size)
      .field("has_on_miss", &self.on_miss.is_some())
      .field("seed_len", &self.seed.len())
      .finish_non_exhaustive()
  }
}
