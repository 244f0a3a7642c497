//! vector-map: an insertion-ordered sequence of `(key, value)` pairs that is
//! addressable both by position and by key.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a dynamic array with map-style lookup. Keys may repeat, order is
//!   strictly positional, and every entry can be reached by index or by
//!   "the Nth entry with this key".
//! - Layers:
//!   - ChunkedStore<T, DELTA>: storage manager. Owns the one contiguous
//!     buffer, tracks length and capacity, grows in fixed chunks of `DELTA`
//!     slots using fallible allocation.
//!   - Shift engine (`gap`): opens and closes runs of slots at arbitrary
//!     positions. All inserts, erases, moves and swaps go through it.
//!   - VectorMap<K, V, DELTA>: public type. Insertion, erase/move/swap,
//!     lifecycle, lookups and iteration built on the two layers above.
//!
//! Constraints
//! - Lookups are linear scans comparing keys with `Eq`; no hashing or
//!   ordering is required of `K`.
//! - Growth is chunked, never doubled, and never shrinks as a side effect.
//! - A failed grow leaves the map untouched: the live length only ever
//!   counts entries that were actually written.
//! - Single-threaded by contract; shared mutation needs external locking
//!   around the whole map.
//!
//! Failure signalling
//! - Inserts return `Result<Position, InsertError>`; an `Err` means nothing
//!   changed.
//! - `reserve`/`resize`/`shrink` return `Result<(), CapacityError>`.
//! - Positional accessors return `Option`; an absent key yields an empty
//!   `Vec` or `None`. Nothing panics on a bad position.
//!
//! Position stability
//! - A `Position` is a plain index. Any insert, erase, move, swap or resize
//!   may shift entries and make it name something else.
//!
//! Notes and non-goals
//! - No secondary key index, no thread safety, no persistence.
//! - The optional `serde` feature encodes a map as a sequence of pairs.

mod error;
mod gap;
pub mod iter;
mod lookup;
#[cfg(feature = "serde")]
mod serde_impl;
mod storage;
mod storage_proptest;
mod vector_map;

// Public surface
pub use error::{CapacityError, InsertError};
pub use lookup::Match;
pub use vector_map::{Position, VectorMap, DEFAULT_CHUNK};
