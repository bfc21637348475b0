use generational_arena::{Arena, Index};

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
  pub(crate) key: K,
  pub(crate) value: V,
  pub(crate) next: Option<Index>,
  pub(crate) prev: Option<Index>,
}

// A self-contained doubly-linked list of key/value pairs, in insertion
// order. The arena stores all nodes contiguously; links are arena indices,
// so there are no raw pointers to invalidate.
#[derive(Debug, Clone)]
pub(crate) struct PairChain<K, V> {
  pub(crate) nodes: Arena<Node<K, V>>,
  // Head is the oldest pair.
  pub(crate) head: Option<Index>,
  // Tail is the newest pair.
  pub(crate) tail: Option<Index>,
}

impl<K, V> PairChain<K, V> {
  pub fn new() -> Self {
    Self {
      nodes: Arena::new(),
      head: None,
      tail: None,
    }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      nodes: Arena::with_capacity(capacity),
      head: None,
      tail: None,
    }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn get(&self, index: Index) -> &Node<K, V> {
    &self.nodes[index]
  }

  pub fn get_mut(&mut self, index: Index) -> &mut Node<K, V> {
    &mut self.nodes[index]
  }

  pub fn first(&self) -> Option<Index> {
    self.head
  }

  pub fn last(&self) -> Option<Index> {
    self.tail
  }

  // Appends a new pair at the tail (newest end) and returns its index.
  pub fn push_back(&mut self, key: K, value: V) -> Index {
    let old_tail = self.tail;
    let index = self.nodes.insert(Node {
      key,
      value,
      next: None,
      prev: old_tail,
    });

    if let Some(tail) = old_tail {
      self.nodes[tail].next = Some(index);
    } else {
      // The chain was empty, so the new node is also the head.
      self.head = Some(index);
    }
    self.tail = Some(index);

    index
  }

  // Helper to unlink a node from the chain without releasing its slot.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_idx = node.prev;
    let next_idx = node.next;

    if let Some(prev) = prev_idx {
      self.nodes[prev].next = next_idx;
    } else {
      // We are unlinking the head.
      self.head = next_idx;
    }

    if let Some(next) = next_idx {
      self.nodes[next].prev = prev_idx;
    } else {
      // We are unlinking the tail.
      self.tail = prev_idx;
    }
  }

  // Unlinks a node and releases its arena slot, returning the pair.
  pub fn remove(&mut self, index: Index) -> Node<K, V> {
    self.unlink(index);
    self.nodes.remove(index).expect("chain index not in arena")
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.head = None;
    self.tail = None;
  }

  // A helper for tests, to read pairs from oldest to newest.
  #[cfg(test)]
  pub(crate) fn pairs_as_vec(&self) -> Vec<(K, V)>
  where
    K: Clone,
    V: Clone,
  {
    let mut pairs = Vec::new();
    let mut current = self.head;
    while let Some(index) = current {
      let node = &self.nodes[index];
      pairs.push((node.key.clone(), node.value.clone()));
      current = node.next;
    }
    pairs
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_chain_is_empty() {
    let chain = PairChain::<i32, i32>::new();
    assert_eq!(chain.len(), 0, "New chain should hold no pairs");
    assert!(chain.first().is_none(), "New chain should have no head");
    assert!(chain.last().is_none(), "New chain should have no tail");
  }

  #[test]
  fn push_back_preserves_insertion_order() {
    let mut chain = PairChain::new();
    chain.push_back("a", 1);
    chain.push_back("b", 2);
    chain.push_back("a", 3);

    assert_eq!(chain.len(), 3);
    assert_eq!(
      chain.pairs_as_vec(),
      vec![("a", 1), ("b", 2), ("a", 3)],
      "Pairs should read oldest to newest"
    );
  }

  #[test]
  fn remove_from_middle_relinks_neighbors() {
    let mut chain = PairChain::new();
    chain.push_back(1, 1);
    let middle = chain.push_back(2, 2);
    chain.push_back(3, 3);

    let node = chain.remove(middle);
    assert_eq!((node.key, node.value), (2, 2));
    assert_eq!(chain.pairs_as_vec(), vec![(1, 1), (3, 3)]);
  }

  #[test]
  fn remove_head_and_tail_update_ends() {
    let mut chain = PairChain::new();
    let first = chain.push_back(1, 1);
    chain.push_back(2, 2);
    let last = chain.push_back(3, 3);

    chain.remove(first);
    assert_eq!(chain.pairs_as_vec(), vec![(2, 2), (3, 3)]);

    chain.remove(last);
    assert_eq!(chain.pairs_as_vec(), vec![(2, 2)]);
    assert_eq!(chain.first(), chain.last(), "Single node is both ends");
  }

  #[test]
  fn remove_last_node_empties_chain() {
    let mut chain = PairChain::new();
    let only = chain.push_back(9, 9);
    chain.remove(only);

    assert!(chain.is_empty());
    assert!(chain.first().is_none());
    assert!(chain.last().is_none());
  }

  #[test]
  fn push_after_removal_reuses_slots() {
    let mut chain = PairChain::new();
    let first = chain.push_back(1, 1);
    chain.push_back(2, 2);
    chain.remove(first);

    chain.push_back(3, 3);
    assert_eq!(chain.pairs_as_vec(), vec![(2, 2), (3, 3)]);
    assert_eq!(chain.len(), 2);
  }

  #[test]
  fn clear_resets_chain() {
    let mut chain = PairChain::new();
    chain.push_back(1, 1);
    chain.push_back(2, 2);

    chain.clear();

    assert!(chain.is_empty());
    assert!(chain.first().is_none());
    assert!(chain.last().is_none());
  }
}
