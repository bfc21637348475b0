use std::collections::HashMap;
use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use generational_arena::{Arena, Index};

#[derive(Debug)]
pub(crate) struct Node<K, V> {
  pub(crate) key: K,
  pub(crate) value: Arc<V>,
  pub(crate) next: Option<Index>,
  pub(crate) prev: Option<Index>,
}

// A self-contained recency list: a doubly-linked list of entries over an
// arena, addressed by key through a lookup map.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
  // Arena stores all nodes contiguously.
  pub(crate) nodes: Arena<Node<K, V>>,
  // HashMap for O(1) lookup of a key to its node index in the arena.
  pub(crate) lookup: HashMap<K, Index, ahash::RandomState>,
  // Head is the most-recently-used entry.
  pub(crate) head: Option<Index>,
  // Tail is the least-recently-used entry, the eviction candidate.
  pub(crate) tail: Option<Index>,
}

impl<K: Eq + Hash + Clone, V> RecencyList<K, V> {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      nodes: Arena::with_capacity(capacity),
      lookup: HashMap::with_capacity_and_hasher(capacity, ahash::RandomState::default()),
      head: None,
      tail: None,
    }
  }

  // Helper to unlink a node from the list.
  // This is a private method as it doesn't handle arena/map removal.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_node_idx = node.prev;
    let next_node_idx = node.next;

    // Update the 'next' pointer of the previous node.
    if let Some(prev_idx) = prev_node_idx {
      self.nodes[prev_idx].next = next_node_idx;
    } else {
      // We are unlinking the head of the list.
      self.head = next_node_idx;
    }

    // Update the 'prev' pointer of the next node.
    if let Some(next_idx) = next_node_idx {
      self.nodes[next_idx].prev = prev_node_idx;
    } else {
      // We are unlinking the tail of the list.
      self.tail = prev_node_idx;
    }
  }

  // Helper to push a node to the front (making it the new head).
  // This is a private method as it assumes the node is already in the arena.
  fn push_front_node(&mut self, index: Index) {
    let old_head_idx = self.head;
    self.nodes[index].next = old_head_idx;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head_idx {
      self.nodes[old_head].prev = Some(index);
    }

    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  // Re-links a node at the head unless it is already there.
  fn promote(&mut self, index: Index) {
    if self.head != Some(index) {
      self.unlink(index);
      self.push_front_node(index);
    }
  }

  pub fn len(&self) -> usize {
    self.lookup.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lookup.is_empty()
  }

  pub fn contains(&self, key: &K) -> bool {
    self.lookup.contains_key(key)
  }

  // Inserts or replaces the entry for `key`; either way the entry ends up
  // most recent. Returns the replaced value, if any.
  pub fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
    if let Some(&index) = self.lookup.get(&key) {
      let old = mem::replace(&mut self.nodes[index].value, value);
      self.promote(index);
      Some(old)
    } else {
      let index = self.nodes.insert(Node {
        key: key.clone(),
        value,
        next: None,
        prev: None,
      });
      self.lookup.insert(key, index);
      self.push_front_node(index);
      None
    }
  }

  // Reads the entry for `key` and marks it most recent.
  pub fn touch(&mut self, key: &K) -> Option<Arc<V>> {
    let &index = self.lookup.get(key)?;
    self.promote(index);
    Some(self.nodes[index].value.clone())
  }

  // Reads the entry for `key` without disturbing the recency order.
  pub fn peek(&self, key: &K) -> Option<Arc<V>> {
    let &index = self.lookup.get(key)?;
    Some(self.nodes[index].value.clone())
  }

  pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
    let index = self.lookup.remove(key)?;
    self.unlink(index);
    let node = self.nodes.remove(index).expect("lookup index not in arena");
    Some(node.value)
  }

  // Removes and returns the least-recently-used entry.
  pub fn pop_tail(&mut self) -> Option<(K, Arc<V>)> {
    let tail_index = self.tail?;
    let key = self.nodes[tail_index].key.clone();
    let value = self.remove(&key)?;
    Some((key, value))
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  // The keys from most to least recently used.
  pub fn keys_front_to_back(&self) -> Vec<K> {
    let mut keys = Vec::with_capacity(self.lookup.len());
    let mut current = self.head;
    while let Some(index) = current {
      keys.push(self.nodes[index].key.clone());
      current = self.nodes[index].next;
    }
    keys
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn value(n: i32) -> Arc<i32> {
    Arc::new(n)
  }

  #[test]
  fn new_list_is_empty() {
    let list = RecencyList::<i32, i32>::with_capacity(4);
    assert_eq!(list.len(), 0, "New list should hold no entries");
    assert!(list.keys_front_to_back().is_empty());
    assert!(!list.contains(&123), "New list should not contain any key");
  }

  #[test]
  fn insert_new_entries_front_to_back() {
    let mut list = RecencyList::with_capacity(4);

    list.insert(10, value(1));
    list.insert(20, value(2));
    assert_eq!(list.len(), 2);
    assert_eq!(
      list.keys_front_to_back(),
      vec![20, 10],
      "Newest entry should be at the front"
    );
  }

  #[test]
  fn insert_existing_key_replaces_and_promotes() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));
    list.insert(3, value(30));
    assert_eq!(list.keys_front_to_back(), vec![3, 2, 1]);

    let old = list.insert(1, value(11));
    assert_eq!(old.as_deref(), Some(&10), "Replaced value is returned");
    assert_eq!(list.len(), 3, "Length should not change");
    assert_eq!(
      list.keys_front_to_back(),
      vec![1, 3, 2],
      "Replaced entry should move to the front"
    );
    assert_eq!(list.peek(&1).as_deref(), Some(&11));
  }

  #[test]
  fn touch_promotes_without_replacing() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));
    list.insert(3, value(30));

    assert_eq!(list.touch(&1).as_deref(), Some(&10));
    assert_eq!(
      list.keys_front_to_back(),
      vec![1, 3, 2],
      "Touched entry should move to the front"
    );
    assert_eq!(list.touch(&99), None);
  }

  #[test]
  fn peek_leaves_order_alone() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));

    assert_eq!(list.peek(&1).as_deref(), Some(&10));
    assert_eq!(
      list.keys_front_to_back(),
      vec![2, 1],
      "Peek should not change recency order"
    );
  }

  #[test]
  fn pop_tail_returns_least_recent() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));
    list.insert(3, value(30));

    list.touch(&1);
    let popped = list.pop_tail();
    assert_eq!(
      popped.map(|(k, v)| (k, *v)),
      Some((2, 20)),
      "The untouched oldest entry is the eviction candidate"
    );
    assert_eq!(list.keys_front_to_back(), vec![1, 3]);
  }

  #[test]
  fn pop_tail_from_empty_list() {
    let mut list = RecencyList::<i32, i32>::with_capacity(4);
    assert!(list.pop_tail().is_none());
  }

  #[test]
  fn remove_from_middle_relinks() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));
    list.insert(3, value(30));

    assert_eq!(list.remove(&2).as_deref(), Some(&20));
    assert!(!list.contains(&2));
    assert_eq!(list.keys_front_to_back(), vec![3, 1]);
    assert_eq!(list.remove(&99), None);
  }

  #[test]
  fn clear_resets_list() {
    let mut list = RecencyList::with_capacity(4);
    list.insert(1, value(10));
    list.insert(2, value(20));

    list.clear();

    assert!(list.is_empty());
    assert!(list.keys_front_to_back().is_empty());
    assert!(list.pop_tail().is_none());
  }
}
