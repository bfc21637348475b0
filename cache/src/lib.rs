//! Bounded in-memory caches with pluggable miss handling.
//!
//! # Features
//! - **Two eviction disciplines**: [`LruCache`] drops the entry whose last
//!   *use* is oldest; [`LriCache`] drops the entry whose *insertion* is
//!   oldest, regardless of reads.
//! - **O(1) operations**: the LRU's recency order lives in an arena-backed
//!   doubly-linked list addressed by a hash map, so promotion and eviction
//!   never scan.
//! - **Miss handling**: an optional `on_miss` handler turns a cache into a
//!   memoizing loader that computes, stores, and returns absent keys.
//! - **Observability**: the LRU tracks hits, misses, and soft misses with
//!   lock-free counters and exposes a [`MetricsSnapshot`] for reporting.
//! - **Thread-safety where it pays**: the LRU serializes all access on one
//!   internal lock; the LRI skips locking entirely and stays single-owner.

pub mod builder;
pub mod error;
pub mod lri;
pub mod lru;
pub mod metrics;

mod list;

pub use builder::{CacheBuilder, OnMiss, DEFAULT_MAX_SIZE};
pub use error::{BuildError, CacheMiss};
pub use lri::LriCache;
pub use lru::LruCache;
pub use metrics::MetricsSnapshot;
