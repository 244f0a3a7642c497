//! Shift engine: opening and closing runs of slots inside a `ChunkedStore`.
//!
//! Every structural mutation of the map goes through here. Growth happens
//! before anything moves, so a failed grow leaves the live length and the
//! entry order exactly as they were.

use crate::error::CapacityError;
use crate::storage::ChunkedStore;
use core::cmp::Ordering;
use std::vec::Drain;

impl<T, const DELTA: usize> ChunkedStore<T, DELTA> {
    /// Write `entries` as a contiguous run starting at `from`, shifting
    /// `[from, len)` right by the run's length. Requires `from <= len`.
    pub(crate) fn open_gap<I>(&mut self, from: usize, entries: I) -> Result<(), CapacityError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        debug_assert!(from <= self.len());
        let entries = entries.into_iter();
        let needed = self
            .len()
            .checked_add(entries.len())
            .ok_or(CapacityError::Overflow)?;
        if needed > self.capacity() {
            self.reserve(needed)?;
        }

        let slots = self.slots_mut();
        if from >= slots.len() {
            slots.extend(entries);
        } else {
            drop(slots.splice(from..from, entries));
        }
        self.sync_capacity();
        Ok(())
    }

    /// Remove `[from, from + length)` and shift the tail left over it.
    /// Capacity is unchanged. Requires the range to be live.
    pub(crate) fn close_gap(&mut self, from: usize, length: usize) -> Drain<'_, T> {
        debug_assert!(from.checked_add(length).is_some_and(|end| end <= self.len()));
        self.slots_mut().drain(from..from + length)
    }

    /// Move the entry at `from` to `to`, shifting everything in between by
    /// one slot toward `from`. Both indices must be live.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        let slots = self.as_mut_slice();
        match from.cmp(&to) {
            Ordering::Less => slots[from..=to].rotate_left(1),
            Ordering::Greater => slots[to..=from].rotate_right(1),
            Ordering::Equal => {}
        }
    }

    pub(crate) fn swap_slots(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap(a, b);
    }
}
