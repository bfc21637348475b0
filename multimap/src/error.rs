use std::fmt;

/// Errors returned by the removing accessors of an
/// [`OrderedMultiMap`](crate::OrderedMultiMap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopError<K> {
  /// The requested key holds no values.
  Missing(K),
  /// The map holds no pairs at all.
  Empty,
}

impl<K: fmt::Debug> fmt::Display for PopError<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PopError::Missing(key) => write!(f, "no values stored under key {:?}", key),
      PopError::Empty => write!(f, "the map holds no pairs"),
    }
  }
}

impl<K: fmt::Debug> std::error::Error for PopError<K> {}
