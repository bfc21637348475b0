use std::sync::Arc;

use weft_cache::LruCache;

// Helper to create a cache for testing.
fn new_test_cache(max_size: usize) -> LruCache<String, i32> {
  LruCache::new(max_size).unwrap()
}

#[test]
fn insert_and_get() {
  let cache = new_test_cache(100);
  cache.insert("key1".to_string(), 10);

  // Test get hit
  assert_eq!(cache.get(&"key1".to_string()).unwrap(), Arc::new(10));

  // Test get miss
  let miss = cache.get(&"absent".to_string()).unwrap_err();
  assert_eq!(miss.key(), &"absent".to_string());

  assert_eq!(cache.hit_count(), 1);
  assert_eq!(cache.miss_count(), 1);
  assert_eq!(cache.soft_miss_count(), 0);
}

#[test]
fn try_get_counts_soft_misses() {
  let cache = new_test_cache(100);
  cache.insert("key1".to_string(), 10);

  assert_eq!(cache.try_get(&"key1".to_string()), Some(Arc::new(10)));
  assert_eq!(cache.try_get(&"absent".to_string()), None);
  assert_eq!(
    cache.try_get(&"absent".to_string()).map(|v| *v).unwrap_or(-1),
    -1,
    "Callers supply their own default on a soft miss"
  );

  assert_eq!(cache.hit_count(), 1);
  assert_eq!(cache.miss_count(), 0, "Soft misses are tallied separately");
  assert_eq!(cache.soft_miss_count(), 2);
}

#[test]
fn replacement_keeps_length_and_returns_old_value() {
  let cache = new_test_cache(100);
  cache.insert("key1".to_string(), 10);

  let replaced = cache.insert("key1".to_string(), 20);
  assert_eq!(replaced, Some(Arc::new(10)));
  assert_eq!(cache.len(), 1);
  assert_eq!(cache.get(&"key1".to_string()).unwrap(), Arc::new(20));
  assert_eq!(
    cache.metrics().inserts,
    2,
    "Replacement counts as a second insert"
  );
}

#[test]
fn remove_bypasses_lookup_counters() {
  let cache = new_test_cache(100);
  cache.insert("key1".to_string(), 10);

  assert_eq!(cache.remove(&"key1".to_string()).unwrap(), Arc::new(10));
  assert!(
    cache.remove(&"key1".to_string()).is_err(),
    "Double remove should fail"
  );
  assert!(!cache.contains_key(&"key1".to_string()));

  assert_eq!(cache.hit_count(), 0, "Removal is not a hit");
  assert_eq!(cache.miss_count(), 0, "A failed removal is not a miss");
  assert_eq!(cache.soft_miss_count(), 0);
  assert_eq!(cache.metrics().invalidations, 1);
}

#[test]
fn clear_empties_but_keeps_counters() {
  let cache = new_test_cache(100);
  cache.insert("key1".to_string(), 10);
  cache.insert("key2".to_string(), 20);
  cache.get(&"key1".to_string()).unwrap();
  cache.get(&"gone".to_string()).unwrap_err();

  cache.clear();

  assert!(cache.is_empty());
  assert!(cache.get(&"key1".to_string()).is_err());
  assert_eq!(cache.hit_count(), 1, "Counters survive clear");
  assert_eq!(cache.miss_count(), 2);
}

#[test]
fn contains_key_has_no_side_effects() {
  let cache = new_test_cache(2);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);

  assert!(cache.contains_key(&"a".to_string()));
  assert!(!cache.contains_key(&"zzz".to_string()));
  assert_eq!(cache.hit_count(), 0);
  assert_eq!(cache.miss_count(), 0);
  assert_eq!(
    cache.keys(),
    vec!["b".to_string(), "a".to_string()],
    "Existence checks should not promote"
  );
}

#[test]
fn peek_does_not_promote() {
  let cache = new_test_cache(2);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);

  assert_eq!(cache.peek(&"a".to_string()), Some(Arc::new(1)));
  assert_eq!(
    cache.keys(),
    vec!["b".to_string(), "a".to_string()],
    "Peek should not change recency order"
  );
  assert_eq!(cache.hit_count(), 0, "Peek is not instrumented");
}

#[test]
fn metrics_snapshot_derives_hit_ratio() {
  let cache = new_test_cache(10);
  assert_eq!(cache.metrics().hit_ratio, 0.0, "No lookups yet");

  cache.insert("a".to_string(), 1);
  cache.get(&"a".to_string()).unwrap();
  cache.get(&"gone".to_string()).unwrap_err();

  let metrics = cache.metrics();
  assert_eq!(metrics.hits, 1);
  assert_eq!(metrics.misses, 1);
  assert!((metrics.hit_ratio - 0.5).abs() < f64::EPSILON);
}

#[test]
fn values_do_not_require_clone() {
  // A value type without Clone still works behind the Arc.
  #[derive(Debug, PartialEq)]
  struct Payload(Vec<u8>);

  let cache: LruCache<&str, Payload> = LruCache::new(4).unwrap();
  cache.insert("blob", Payload(vec![1, 2, 3]));

  let fetched = cache.get(&"blob").unwrap();
  assert_eq!(*fetched, Payload(vec![1, 2, 3]));
}
