//! An insertion-ordered, multi-value map.
//!
//! # Features
//! - **Multiple values per key**: `append` keeps every stored value;
//!   `insert` gives ordinary last-write-wins map semantics.
//! - **Two views**: collapsed iteration (one entry per key, newest value)
//!   and multi iteration (every pair in true insertion order).
//! - **O(1) single-pair operations**: pairs live in an arena-backed
//!   doubly-linked chain addressed by a hash map, so there are no raw
//!   pointers and no per-node allocations to chase.
//! - **Map interop**: equality against plain `HashMap`s, collapsed
//!   conversion, inversion, and comparator-driven reordering.

pub mod error;
pub mod iter;

mod chain;
mod map;

pub use error::PopError;
pub use map::OrderedMultiMap;
