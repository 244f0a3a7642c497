//! Lookup family: positional access and linear key scans.
//!
//! Key queries scan positions in ascending order and compare with `Eq` only;
//! there is no secondary index. Ordinals are 1-based and count matches of one
//! key by ascending position. An ordinal of 0 is read as 1.

use crate::vector_map::{Position, VectorMap};
use core::borrow::Borrow;

/// One key match: where it is and what it holds.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'a, K, V> {
    pub pos: usize,
    pub key: &'a K,
    pub value: &'a V,
}

impl<K, V> Clone for Match<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Match<'_, K, V> {}

impl<'a, K, V> Match<'a, K, V> {
    pub fn position(&self) -> Position {
        Position::new(self.pos)
    }
}

impl<K, V, const DELTA: usize> VectorMap<K, V, DELTA> {
    /// All matches for `key`, lazily, in position order.
    fn matches<'a: 'q, 'q, Q>(&'a self, key: &'q Q) -> impl Iterator<Item = Match<'a, K, V>> + 'q
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.as_slice()
            .iter()
            .enumerate()
            .filter(move |(_, (k, _))| k.borrow() == key)
            .map(|(pos, (key, value))| Match { pos, key, value })
    }

    /// Matches `ordinal ..` for at most `number` results.
    fn select<'a: 'q, 'q, Q>(
        &'a self,
        key: &'q Q,
        ordinal: usize,
        number: usize,
    ) -> impl Iterator<Item = Match<'a, K, V>> + 'q
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).skip(ordinal.max(1) - 1).take(number)
    }

    pub(crate) fn nth_pos<Q>(&self, key: &Q, ordinal: usize) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.select(key, ordinal, 1).next().map(|m| m.pos)
    }

    // ---- by position ----

    pub fn get(&self, pos: usize) -> Option<(&K, &V)> {
        self.as_slice().get(pos).map(|(k, v)| (k, v))
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<(&K, &mut V)> {
        self.store
            .as_mut_slice()
            .get_mut(pos)
            .map(|(k, v)| (&*k, v))
    }

    /// `Some(Position)` if `pos` names a live entry.
    pub fn position(&self, pos: usize) -> Option<Position> {
        (pos < self.len()).then(|| Position::new(pos))
    }

    pub fn get_key(&self, pos: usize) -> Option<&K> {
        self.as_slice().get(pos).map(|(k, _)| k)
    }

    pub fn value_at(&self, pos: usize) -> Option<&V> {
        self.as_slice().get(pos).map(|(_, v)| v)
    }

    pub fn value_at_mut(&mut self, pos: usize) -> Option<&mut V> {
        self.store.as_mut_slice().get_mut(pos).map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.get(0)
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.as_slice().last().map(|(k, v)| (k, v))
    }

    // ---- by key ----

    /// Up to `number` consecutive matches starting at the `ordinal`-th one.
    /// Fewer come back when matches run out; none if the `ordinal`-th match
    /// does not exist.
    pub fn get_by_key<Q>(&self, key: &Q, ordinal: usize, number: usize) -> Vec<Match<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.select(key, ordinal, number).collect()
    }

    pub fn get_all<Q>(&self, key: &Q) -> Vec<Match<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).collect()
    }

    pub fn get_value<Q>(&self, key: &Q, ordinal: usize, number: usize) -> Vec<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.select(key, ordinal, number).map(|m| m.value).collect()
    }

    pub fn get_all_values<Q>(&self, key: &Q) -> Vec<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).map(|m| m.value).collect()
    }

    pub fn get_pos<Q>(&self, key: &Q, ordinal: usize, number: usize) -> Vec<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.select(key, ordinal, number).map(|m| m.pos).collect()
    }

    pub fn get_all_pos<Q>(&self, key: &Q) -> Vec<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).map(|m| m.pos).collect()
    }

    /// Position of the first entry with this key.
    pub fn find<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).next().map(|m| m.position())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).next().is_some()
    }

    /// Number of entries with this key.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.matches(key).count()
    }
}
