use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// The cache was configured with a maximum size of zero, which is not
  /// allowed for a bounded cache.
  ZeroCapacity,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ZeroCapacity => write!(f, "bounded cache capacity cannot be zero"),
    }
  }
}

impl std::error::Error for BuildError {}

/// A lookup failed and no miss handler was available to satisfy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMiss<K> {
  key: K,
}

impl<K> CacheMiss<K> {
  pub(crate) fn new(key: K) -> Self {
    Self { key }
  }

  /// The key that was not found.
  pub fn key(&self) -> &K {
    &self.key
  }

  pub fn into_key(self) -> K {
    self.key
  }
}

impl<K: fmt::Debug> fmt::Display for CacheMiss<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "key {:?} is not present in the cache", self.key)
  }
}

impl<K: fmt::Debug> std::error::Error for CacheMiss<K> {}
