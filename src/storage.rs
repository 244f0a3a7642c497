//! ChunkedStore: the single contiguous entry buffer and its growth policy.
//!
//! The store tracks a logical `capacity` next to the `Vec` it owns. The
//! logical value is what the container reports and what the growth policy
//! reasons about; the `Vec` is always allocated at least that large.
//! Invariant: `slots.len() <= capacity <= slots.capacity()`.

use crate::error::CapacityError;
use tracing::{debug, trace};

#[derive(Debug)]
pub(crate) struct ChunkedStore<T, const DELTA: usize> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T, const DELTA: usize> ChunkedStore<T, DELTA> {
    /// Growth increment. Referencing it rejects `DELTA == 0` at compile time.
    pub(crate) const CHUNK: usize = {
        assert!(DELTA > 0, "chunk size must be non-zero");
        DELTA
    };

    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            capacity: 0,
        }
    }

    /// Adopt already-built entries. Capacity is the smallest chunk multiple
    /// holding them, never less than one chunk.
    pub(crate) fn from_vec(mut slots: Vec<T>) -> Self {
        let capacity = Self::round_up(slots.len())
            .unwrap_or(slots.len())
            .max(Self::CHUNK);
        slots.reserve_exact(capacity - slots.len());
        Self { slots, capacity }
    }

    /// Smallest multiple of the chunk size that is `>= min`.
    pub(crate) fn round_up(min: usize) -> Result<usize, CapacityError> {
        min.div_ceil(Self::CHUNK)
            .checked_mul(Self::CHUNK)
            .ok_or(CapacityError::Overflow)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.slots
    }

    /// Make room for at least `min_capacity` entries. Never shrinks.
    pub(crate) fn reserve(&mut self, min_capacity: usize) -> Result<(), CapacityError> {
        let len = self.len();
        if min_capacity < len {
            debug!(requested = min_capacity, len, "reserve below live length rejected");
            return Err(CapacityError::BelowLength {
                requested: min_capacity,
                len,
            });
        }
        if min_capacity <= self.capacity {
            return Ok(());
        }
        let target = Self::round_up(min_capacity)?;
        self.resize(target)
    }

    /// Reallocate to exactly `new_capacity` slots, relocating live entries in
    /// order. The previous allocation is released on success.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> Result<(), CapacityError> {
        let len = self.len();
        if new_capacity < len {
            debug!(requested = new_capacity, len, "resize below live length rejected");
            return Err(CapacityError::BelowLength {
                requested: new_capacity,
                len,
            });
        }

        let mut fresh = Vec::new();
        if let Err(e) = fresh.try_reserve_exact(new_capacity) {
            debug!(requested = new_capacity, len, error = %e, "entry buffer allocation failed");
            return Err(e.into());
        }
        // `fresh` already holds `new_capacity >= len` slots, so this never reallocates.
        fresh.append(&mut self.slots);
        trace!(
            from = self.capacity,
            to = new_capacity,
            len,
            "relocated entry buffer"
        );
        self.slots = fresh;
        self.capacity = new_capacity;
        Ok(())
    }

    pub(crate) fn shrink(&mut self) -> Result<(), CapacityError> {
        self.resize(self.len())
    }

    /// Drop every live entry; the allocation stays.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Slots grew past the logical capacity behind our back (an iterator
    /// reported a shorter length than it yielded). Re-establish the invariant
    /// on a chunk boundary.
    pub(crate) fn sync_capacity(&mut self) {
        let len = self.slots.len();
        if len > self.capacity {
            let target = Self::round_up(len).unwrap_or(len);
            self.slots.reserve_exact(target - len);
            self.capacity = target;
        }
    }

    pub(crate) fn slots_mut(&mut self) -> &mut Vec<T> {
        &mut self.slots
    }
}

impl<T, const DELTA: usize> Default for ChunkedStore<T, DELTA> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const DELTA: usize> Clone for ChunkedStore<T, DELTA> {
    fn clone(&self) -> Self {
        let mut slots = Vec::with_capacity(self.capacity);
        slots.extend_from_slice(&self.slots);
        Self {
            slots,
            capacity: self.capacity,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.slots.clear();
        if source.len() > self.capacity {
            let target = Self::round_up(source.len()).unwrap_or(source.len());
            self.slots.reserve_exact(target);
            self.capacity = target;
        }
        self.slots.extend_from_slice(&source.slots);
    }
}
