use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use generational_arena::Index;

use crate::chain::PairChain;
use crate::error::PopError;
use crate::iter::{
  IntoIter, Iter, IterMulti, Keys, KeysMulti, ReverseKeys, Values, ValuesIter, ValuesMulti,
};

/// An insertion-ordered map that stores multiple values per key.
///
/// Every stored pair keeps its position in one global insertion order, so
/// the map offers two views: the *collapsed* view behaves like an ordinary
/// ordered map (one entry per key, last stored value wins), while the
/// *multi* view exposes every stored pair, duplicates included.
///
/// Internally the pairs live in an arena-backed doubly-linked chain, and a
/// hash map points each key at the ordered list of its chain nodes. All
/// single-pair operations are O(1); removing a key is proportional to the
/// number of values it holds.
///
/// ```
/// use weft_multimap::OrderedMultiMap;
///
/// let mut map = OrderedMultiMap::new();
/// map.append("a", 1);
/// map.append("b", 2);
/// map.append("a", 3);
///
/// assert_eq!(map.get(&"a"), Some(&3));
/// assert_eq!(map.get_all(&"a").copied().collect::<Vec<_>>(), vec![1, 3]);
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.multi_len(), 3);
/// ```
pub struct OrderedMultiMap<K, V, S = ahash::RandomState> {
  chain: PairChain<K, V>,
  // Each key's chain indices, ordered oldest to newest. Never holds an
  // empty vec once an operation returns.
  buckets: HashMap<K, Vec<Index>, S>,
}

impl<K, V> OrderedMultiMap<K, V, ahash::RandomState> {
  pub fn new() -> Self {
    Self::with_hasher(ahash::RandomState::default())
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self::with_capacity_and_hasher(capacity, ahash::RandomState::default())
  }

  /// Builds a map from an iterator of pairs, keeping every pair.
  ///
  /// Duplicate keys are preserved as multiple values, in iterator order.
  pub fn from_pairs<I>(pairs: I) -> Self
  where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, V)>,
  {
    let mut map = Self::new();
    map.extend(pairs);
    map
  }
}

impl<K, V, S> OrderedMultiMap<K, V, S> {
  pub fn with_hasher(hasher: S) -> Self {
    Self {
      chain: PairChain::new(),
      buckets: HashMap::with_hasher(hasher),
    }
  }

  pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
    Self {
      chain: PairChain::with_capacity(capacity),
      buckets: HashMap::with_capacity_and_hasher(capacity, hasher),
    }
  }

  /// The number of unique keys.
  pub fn len(&self) -> usize {
    self.buckets.len()
  }

  /// The number of stored pairs, duplicates included.
  pub fn multi_len(&self) -> usize {
    self.chain.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chain.is_empty()
  }

  pub fn clear(&mut self) {
    self.chain.clear();
    self.buckets.clear();
  }

  pub fn hasher(&self) -> &S {
    self.buckets.hasher()
  }

  /// Multi iteration: every stored pair in insertion order.
  pub fn iter_multi(&self) -> IterMulti<'_, K, V> {
    IterMulti {
      chain: &self.chain,
      front: self.chain.first(),
      back: self.chain.last(),
      remaining: self.chain.len(),
    }
  }

  pub fn keys_multi(&self) -> KeysMulti<'_, K, V> {
    KeysMulti {
      inner: self.iter_multi(),
    }
  }

  pub fn values_multi(&self) -> ValuesMulti<'_, K, V> {
    ValuesMulti {
      inner: self.iter_multi(),
    }
  }
}

impl<K, V, S> OrderedMultiMap<K, V, S>
where
  K: Eq + Hash + Clone,
  S: BuildHasher,
{
  /// Stores an additional value under `key`, leaving existing values for
  /// the key untouched. The new pair becomes the newest in the map.
  pub fn append(&mut self, key: K, value: V) {
    let index = self.chain.push_back(key.clone(), value);
    self.buckets.entry(key).or_default().push(index);
  }

  /// Stores `value` as the only value for `key`, dropping any values the
  /// key previously held. The fresh pair becomes the newest in the map.
  ///
  /// Returns the previously newest value for the key, if any.
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    let mut previous = None;
    if let Some(indices) = self.buckets.get_mut(&key) {
      for index in indices.drain(..) {
        previous = Some(self.chain.remove(index).value);
      }
    }

    let index = self.chain.push_back(key.clone(), value);
    self.buckets.entry(key).or_default().push(index);
    previous
  }

  /// Returns the newest value stored under `key`.
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let newest = *self.buckets.get(key)?.last()?;
    Some(&self.chain.get(newest).value)
  }

  /// Returns the newest value stored under `key`, mutably.
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let newest = *self.buckets.get(key)?.last()?;
    Some(&mut self.chain.get_mut(newest).value)
  }

  /// Iterates over every value stored under `key`, oldest first.
  ///
  /// The iterator is empty when the key is absent.
  pub fn get_all<Q>(&self, key: &Q) -> ValuesIter<'_, K, V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let indices = self
      .buckets
      .get(key)
      .map(|indices| indices.as_slice())
      .unwrap_or(&[]);
    ValuesIter {
      chain: &self.chain,
      indices: indices.iter(),
    }
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.buckets.contains_key(key)
  }

  /// Removes every value stored under `key` and returns the newest one.
  pub fn pop(&mut self, key: &K) -> Result<V, PopError<K>> {
    let indices = self
      .buckets
      .remove(key)
      .ok_or_else(|| PopError::Missing(key.clone()))?;

    let mut newest = None;
    for index in indices {
      newest = Some(self.chain.remove(index).value);
    }
    Ok(newest.expect("bucket held no chain indices"))
  }

  /// Removes every value stored under `key` and returns them all,
  /// oldest first.
  pub fn pop_all(&mut self, key: &K) -> Result<Vec<V>, PopError<K>> {
    let indices = self
      .buckets
      .remove(key)
      .ok_or_else(|| PopError::Missing(key.clone()))?;

    let values = indices
      .into_iter()
      .map(|index| self.chain.remove(index).value)
      .collect();
    Ok(values)
  }

  /// Removes only the newest value stored under `key`. When that was the
  /// key's last value the key disappears from the map.
  pub fn pop_last(&mut self, key: &K) -> Result<V, PopError<K>> {
    let indices = self
      .buckets
      .get_mut(key)
      .ok_or_else(|| PopError::Missing(key.clone()))?;

    let index = indices.pop().expect("bucket held no chain indices");
    if indices.is_empty() {
      self.buckets.remove(key);
    }
    Ok(self.chain.remove(index).value)
  }

  /// Removes and returns the globally newest pair.
  pub fn pop_newest(&mut self) -> Result<(K, V), PopError<K>> {
    let tail = self.chain.last().ok_or(PopError::Empty)?;
    let node = self.chain.remove(tail);

    // The globally newest node is also the newest node of its key, so it
    // sits at the end of the key's bucket.
    if let Some(indices) = self.buckets.get_mut(&node.key) {
      indices.pop();
      if indices.is_empty() {
        self.buckets.remove(&node.key);
      }
    }
    Ok((node.key, node.value))
  }

  /// Replaces this map's values for every key present in `other` with
  /// `other`'s values for that key. Keys absent from `other` are left
  /// untouched.
  pub fn update_from(&mut self, other: &Self)
  where
    V: Clone,
  {
    for key in other.buckets.keys() {
      if let Some(indices) = self.buckets.remove(key) {
        for index in indices {
          self.chain.remove(index);
        }
      }
    }
    for (key, value) in other.iter_multi() {
      self.append(key.clone(), value.clone());
    }
  }

  /// Appends every pair of `other` in its insertion order, never
  /// disturbing values already present.
  pub fn extend_from(&mut self, other: &Self)
  where
    V: Clone,
  {
    for (key, value) in other.iter_multi() {
      self.append(key.clone(), value.clone());
    }
  }

  /// Returns a new map with keys and values swapped, preserving the global
  /// pair order.
  ///
  /// When two distinct keys share a value, their histories merge under the
  /// shared inverted key in encounter order; inverting twice restores the
  /// original map only when no such collisions exist.
  pub fn inverted(&self) -> OrderedMultiMap<V, K, S>
  where
    V: Eq + Hash + Clone,
    S: Clone,
  {
    let mut inverted = OrderedMultiMap::with_hasher(self.buckets.hasher().clone());
    for (key, value) in self.iter_multi() {
      inverted.append(value.clone(), key.clone());
    }
    inverted
  }

  /// Returns a new map holding this map's collapsed pairs, sorted by the
  /// given comparator. The result carries one value per key.
  pub fn sorted_by<F>(&self, mut cmp: F) -> Self
  where
    V: Clone,
    S: Clone,
    F: FnMut(&(K, V), &(K, V)) -> Ordering,
  {
    let mut pairs: Vec<(K, V)> = self
      .iter()
      .map(|(key, value)| (key.clone(), value.clone()))
      .collect();
    pairs.sort_by(|a, b| cmp(a, b));

    let mut sorted = Self::with_hasher(self.buckets.hasher().clone());
    sorted.extend(pairs);
    sorted
  }

  /// Collapses the map into a plain `HashMap`, one value per key.
  pub fn to_map(&self) -> HashMap<K, V, S>
  where
    V: Clone,
    S: Clone,
  {
    let mut map = HashMap::with_capacity_and_hasher(self.len(), self.buckets.hasher().clone());
    for (key, value) in self.iter() {
      map.insert(key.clone(), value.clone());
    }
    map
  }

  /// Collapsed iteration: one entry per unique key, in order of first
  /// appearance, carrying the newest value.
  pub fn iter(&self) -> Iter<'_, K, V, S> {
    Iter {
      chain: &self.chain,
      buckets: &self.buckets,
      cursor: self.chain.first(),
      remaining: self.buckets.len(),
    }
  }

  pub fn keys(&self) -> Keys<'_, K, V, S> {
    Keys { inner: self.iter() }
  }

  pub fn values(&self) -> Values<'_, K, V, S> {
    Values { inner: self.iter() }
  }

  /// Unique keys in reverse of first-appearance order.
  pub fn reverse_keys(&self) -> ReverseKeys<'_, K, V, S> {
    ReverseKeys {
      chain: &self.chain,
      buckets: &self.buckets,
      cursor: self.chain.last(),
      remaining: self.buckets.len(),
    }
  }
}

impl<K, V, S: Default> Default for OrderedMultiMap<K, V, S> {
  fn default() -> Self {
    Self::with_hasher(S::default())
  }
}

impl<K: Clone, V: Clone, S: Clone> Clone for OrderedMultiMap<K, V, S> {
  fn clone(&self) -> Self {
    // The arena clone keeps every index stable, so the cloned buckets
    // point at the cloned chain's own nodes.
    Self {
      chain: self.chain.clone(),
      buckets: self.buckets.clone(),
    }
  }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMultiMap<K, V, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter_multi()).finish()
  }
}

impl<K, V, S> Extend<(K, V)> for OrderedMultiMap<K, V, S>
where
  K: Eq + Hash + Clone,
  S: BuildHasher,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
    for (key, value) in pairs {
      self.append(key, value);
    }
  }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMultiMap<K, V, S>
where
  K: Eq + Hash + Clone,
  S: BuildHasher + Default,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
    let mut map = Self::with_hasher(S::default());
    map.extend(pairs);
    map
  }
}

impl<K, V, S, S2> PartialEq<OrderedMultiMap<K, V, S2>> for OrderedMultiMap<K, V, S>
where
  K: Eq + Hash,
  V: PartialEq,
{
  /// Two maps are equal when their full pair sequences match, order and
  /// duplicates included.
  fn eq(&self, other: &OrderedMultiMap<K, V, S2>) -> bool {
    self.multi_len() == other.multi_len() && self.iter_multi().eq(other.iter_multi())
  }
}

impl<K, V, S> Eq for OrderedMultiMap<K, V, S>
where
  K: Eq + Hash,
  V: Eq,
{
}

impl<K, V, S, S2> PartialEq<HashMap<K, V, S2>> for OrderedMultiMap<K, V, S>
where
  K: Eq + Hash + Clone,
  V: PartialEq,
  S: BuildHasher,
  S2: BuildHasher,
{
  /// A map equals a plain `HashMap` when every key's collapsed value
  /// matches; the multi view plays no part in this comparison.
  fn eq(&self, other: &HashMap<K, V, S2>) -> bool {
    self.len() == other.len()
      && self
        .iter()
        .all(|(key, value)| other.get(key).map_or(false, |found| found == value))
  }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMultiMap<K, V, S>
where
  K: Eq + Hash + Clone,
  S: BuildHasher,
{
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V, S>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<K, V, S> IntoIterator for OrderedMultiMap<K, V, S> {
  type Item = (K, V);
  type IntoIter = IntoIter<K, V>;

  /// Consumes the map, yielding every stored pair in insertion order.
  fn into_iter(self) -> Self::IntoIter {
    IntoIter { chain: self.chain }
  }
}
