//! VectorMap: insertion-ordered key/value sequence over one chunked buffer.

use crate::error::{CapacityError, InsertError};
use crate::storage::ChunkedStore;
use core::borrow::Borrow;
use core::fmt;
use tracing::trace;

/// Chunk size used when none is given.
pub const DEFAULT_CHUNK: usize = 100;

/// Index of a live entry, as returned by the insertion family.
///
/// A `Position` is a plain index: any insert, erase, move or resize may shift
/// entries, after which it can name a different entry or none at all.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Position(usize);

impl Position {
    pub(crate) fn new(index: usize) -> Self {
        Position(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn key<'a, K, V, const DELTA: usize>(
        &self,
        map: &'a VectorMap<K, V, DELTA>,
    ) -> Option<&'a K> {
        map.get_key(self.0)
    }

    pub fn value<'a, K, V, const DELTA: usize>(
        &self,
        map: &'a VectorMap<K, V, DELTA>,
    ) -> Option<&'a V> {
        map.value_at(self.0)
    }

    pub fn value_mut<'a, K, V, const DELTA: usize>(
        &self,
        map: &'a mut VectorMap<K, V, DELTA>,
    ) -> Option<&'a mut V> {
        map.value_at_mut(self.0)
    }

    pub fn entry<'a, K, V, const DELTA: usize>(
        &self,
        map: &'a VectorMap<K, V, DELTA>,
    ) -> Option<(&'a K, &'a V)> {
        map.get(self.0)
    }
}

/// An ordered sequence of `(key, value)` pairs with map-style lookup.
///
/// Keys may repeat. Iteration follows position order, which is insertion
/// order unless entries are moved explicitly. Storage grows in multiples of
/// `DELTA` slots.
pub struct VectorMap<K, V, const DELTA: usize = DEFAULT_CHUNK> {
    pub(crate) store: ChunkedStore<(K, V), DELTA>,
}

impl<K, V> VectorMap<K, V> {
    pub const fn new() -> Self {
        Self {
            store: ChunkedStore::new(),
        }
    }
}

impl<K, V, const DELTA: usize> Default for VectorMap<K, V, DELTA> {
    fn default() -> Self {
        Self {
            store: ChunkedStore::new(),
        }
    }
}

impl<K, V, const DELTA: usize> VectorMap<K, V, DELTA> {
    /// Empty map with at least `min_capacity` slots, rounded up to a chunk.
    pub fn with_capacity(min_capacity: usize) -> Result<Self, CapacityError> {
        let mut map = Self::default();
        map.reserve(min_capacity)?;
        Ok(map)
    }

    // ---- storage ----

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// The growth increment `DELTA`.
    pub fn chunk(&self) -> usize {
        ChunkedStore::<(K, V), DELTA>::CHUNK
    }

    /// Guarantee room for `min_capacity` entries. Fails when `min_capacity`
    /// is below `len()`; never shrinks.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), CapacityError> {
        self.store.reserve(min_capacity)
    }

    /// Reallocate to exactly `new_capacity` slots. Fails when
    /// `new_capacity < len()`. Entries keep their indices but move to a new
    /// allocation, so outstanding slice borrows cannot survive this call.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), CapacityError> {
        self.store.resize(new_capacity)
    }

    /// Reallocate to exactly `len()` slots.
    pub fn shrink(&mut self) -> Result<(), CapacityError> {
        self.store.shrink()
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Move the contents out, leaving `self` empty with no buffer.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Exchange the whole contents of two maps without touching entries.
    pub fn swap_with(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    pub fn as_slice(&self) -> &[(K, V)] {
        self.store.as_slice()
    }

    // ---- insertion ----

    fn check_insert_pos(&self, pos: usize) -> Result<(), InsertError> {
        let len = self.len();
        if pos > len {
            trace!(pos, len, "insert past the end rejected");
            return Err(InsertError::OutOfBounds { pos, len });
        }
        Ok(())
    }

    /// Insert one entry so that it ends up at `pos`. `pos == len()` appends.
    pub fn insert(&mut self, pos: usize, key: K, value: V) -> Result<Position, InsertError> {
        self.insert_entry(pos, (key, value))
    }

    pub fn insert_entry(&mut self, pos: usize, entry: (K, V)) -> Result<Position, InsertError> {
        self.check_insert_pos(pos)?;
        self.store.open_gap(pos, core::iter::once(entry))?;
        Ok(Position::new(pos))
    }

    /// Insert a run of entries starting at `pos`, keeping their order. The
    /// returned position is that of the first inserted entry (for an empty
    /// run it is simply `pos`).
    pub fn insert_many<I>(&mut self, pos: usize, entries: I) -> Result<Position, InsertError>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
    {
        self.check_insert_pos(pos)?;
        self.store.open_gap(pos, entries)?;
        Ok(Position::new(pos))
    }

    /// Insert clones of all of `other`'s entries at `pos`, in `other`'s order.
    pub fn insert_map<const D: usize>(
        &mut self,
        pos: usize,
        other: &VectorMap<K, V, D>,
    ) -> Result<Position, InsertError>
    where
        K: Clone,
        V: Clone,
    {
        self.insert_many(pos, other.as_slice().iter().cloned())
    }

    pub fn push_back(&mut self, key: K, value: V) -> Result<Position, InsertError> {
        self.insert(self.len(), key, value)
    }

    pub fn push_back_entry(&mut self, entry: (K, V)) -> Result<Position, InsertError> {
        self.insert_entry(self.len(), entry)
    }

    pub fn push_back_many<I>(&mut self, entries: I) -> Result<Position, InsertError>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
    {
        self.insert_many(self.len(), entries)
    }

    pub fn push_back_map<const D: usize>(
        &mut self,
        other: &VectorMap<K, V, D>,
    ) -> Result<Position, InsertError>
    where
        K: Clone,
        V: Clone,
    {
        self.insert_map(self.len(), other)
    }

    pub fn push_front(&mut self, key: K, value: V) -> Result<Position, InsertError> {
        self.insert(0, key, value)
    }

    pub fn push_front_entry(&mut self, entry: (K, V)) -> Result<Position, InsertError> {
        self.insert_entry(0, entry)
    }

    pub fn push_front_many<I>(&mut self, entries: I) -> Result<Position, InsertError>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
    {
        self.insert_many(0, entries)
    }

    pub fn push_front_map<const D: usize>(
        &mut self,
        other: &VectorMap<K, V, D>,
    ) -> Result<Position, InsertError>
    where
        K: Clone,
        V: Clone,
    {
        self.insert_map(0, other)
    }

    // ---- erase / move / swap ----

    /// Remove and return the entry at `pos`; `None` if `pos` is not live.
    pub fn erase(&mut self, pos: usize) -> Option<(K, V)> {
        if pos >= self.len() {
            return None;
        }
        self.store.close_gap(pos, 1).next()
    }

    /// Remove the first entry whose key equals `key`.
    pub fn erase_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let pos = self.find(key)?.index();
        self.erase(pos)
    }

    /// Erase each listed position in the order given. Earlier erasures shift
    /// later entries left, so callers wanting independent positions should
    /// list them in descending order. Returns how many entries were removed.
    pub fn erase_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        positions
            .into_iter()
            .filter(|&pos| self.erase(pos).is_some())
            .count()
    }

    /// Remove every entry whose key equals `key`. Returns how many were removed.
    pub fn erase_all<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let hits = self.get_all_pos(key);
        for &pos in hits.iter().rev() {
            self.erase(pos);
        }
        hits.len()
    }

    /// Move the entry at `from` so it ends up at `to`, shifting the entries
    /// in between. Returns `false` (and does nothing) if either is not live.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        let len = self.len();
        if from >= len || to >= len {
            return false;
        }
        self.store.relocate(from, to);
        true
    }

    /// Exchange the entries at `a` and `b`. Returns `false` (and does
    /// nothing) if either is not live.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        let len = self.len();
        if a >= len || b >= len {
            return false;
        }
        self.store.swap_slots(a, b);
        true
    }

    // ---- in-place modification ----

    /// Replace the entry at `pos`, returning the old one. Out of range drops
    /// the arguments and returns `None`.
    pub fn set(&mut self, pos: usize, key: K, value: V) -> Option<(K, V)> {
        let slot = self.store.as_mut_slice().get_mut(pos)?;
        Some(core::mem::replace(slot, (key, value)))
    }

    pub fn set_key(&mut self, pos: usize, key: K) -> Option<K> {
        let slot = self.store.as_mut_slice().get_mut(pos)?;
        Some(core::mem::replace(&mut slot.0, key))
    }

    pub fn set_value(&mut self, pos: usize, value: V) -> Option<V> {
        let slot = self.value_at_mut(pos)?;
        Some(core::mem::replace(slot, value))
    }

    /// Replace the `ordinal`-th entry (1-based) whose key equals `query`.
    pub fn set_by_key<Q>(&mut self, query: &Q, ordinal: usize, key: K, value: V) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let pos = self.nth_pos(query, ordinal)?;
        self.set(pos, key, value)
    }

    pub fn set_key_by_key<Q>(&mut self, query: &Q, ordinal: usize, key: K) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let pos = self.nth_pos(query, ordinal)?;
        self.set_key(pos, key)
    }

    pub fn set_value_by_key<Q>(&mut self, query: &Q, ordinal: usize, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let pos = self.nth_pos(query, ordinal)?;
        self.set_value(pos, value)
    }
}

impl<K: Clone, V: Clone, const DELTA: usize> Clone for VectorMap<K, V, DELTA> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.store.clone_from(&source.store);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const DELTA: usize> fmt::Debug for VectorMap<K, V, DELTA> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: equal maps hold equal entries at equal positions.
/// Capacity and chunk size do not participate.
impl<K, V, const A: usize, const B: usize> PartialEq<VectorMap<K, V, B>> for VectorMap<K, V, A>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &VectorMap<K, V, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq, V: Eq, const DELTA: usize> Eq for VectorMap<K, V, DELTA> {}

impl<K, V, const DELTA: usize> FromIterator<(K, V)> for VectorMap<K, V, DELTA> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            store: ChunkedStore::from_vec(iter.into_iter().collect()),
        }
    }
}

impl<K, V, const N: usize, const DELTA: usize> From<[(K, V); N]> for VectorMap<K, V, DELTA> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Appends in iteration order. Growth follows the chunk policy; an allocation
/// failure here aborts like any other infallible collection growth.
impl<K, V, const DELTA: usize> Extend<(K, V)> for VectorMap<K, V, DELTA> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let incoming: Vec<(K, V)> = iter.into_iter().collect();
        let at = self.len();
        if let Err(e) = self.store.open_gap(at, incoming) {
            panic!("VectorMap::extend could not grow: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> VectorMap<String, i32> {
        let mut m = VectorMap::new();
        m.push_back("a".to_string(), 1).unwrap();
        m.push_back("b".to_string(), 2).unwrap();
        m.push_back("c".to_string(), 3).unwrap();
        m
    }

    fn keys<V, const D: usize>(m: &VectorMap<String, V, D>) -> Vec<&str> {
        m.as_slice().iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Invariant: the default map owns no buffer.
    #[test]
    fn new_map_is_empty_without_buffer() {
        let m: VectorMap<String, i32> = VectorMap::new();
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
        assert_eq!(m.capacity(), 0);
        assert_eq!(m.chunk(), 100);
    }

    /// Invariant: the returned position names the inserted entry.
    #[test]
    fn insert_returns_position_of_new_entry() {
        let mut m = abc();
        let p = m.insert(1, "x".to_string(), 9).unwrap();
        assert_eq!(p.index(), 1);
        assert_eq!(p.key(&m), Some(&"x".to_string()));
        assert_eq!(p.value(&m), Some(&9));
        assert_eq!(keys(&m), ["a", "x", "b", "c"]);

        *p.value_mut(&mut m).unwrap() += 1;
        assert_eq!(p.entry(&m), Some((&"x".to_string(), &10)));
    }

    /// Invariant: inserting past the end fails without touching the map.
    #[test]
    fn insert_past_end_is_rejected() {
        let mut m = abc();
        let cap = m.capacity();
        let err = m.insert(4, "z".to_string(), 0).unwrap_err();
        assert_eq!(err, InsertError::OutOfBounds { pos: 4, len: 3 });
        assert_eq!(m.len(), 3);
        assert_eq!(m.capacity(), cap);
        assert_eq!(keys(&m), ["a", "b", "c"]);
    }

    #[test]
    fn push_front_and_back_variants() {
        let mut m = abc();
        m.push_front("f".to_string(), 0).unwrap();
        m.push_back_entry(("z".to_string(), 26)).unwrap();
        m.push_front_entry(("e".to_string(), -1)).unwrap();
        assert_eq!(keys(&m), ["e", "f", "a", "b", "c", "z"]);
    }

    /// Invariant: a run lands contiguously in input order and the returned
    /// position is its first slot.
    #[test]
    fn insert_many_keeps_input_order() {
        let mut m = abc();
        let p = m
            .insert_many(2, vec![("p".to_string(), 7), ("q".to_string(), 8)])
            .unwrap();
        assert_eq!(p.index(), 2);
        assert_eq!(keys(&m), ["a", "b", "p", "q", "c"]);

        m.push_front_many([("0".to_string(), 0)]).unwrap();
        m.push_back_many([("9".to_string(), 9)]).unwrap();
        assert_eq!(keys(&m), ["0", "a", "b", "p", "q", "c", "9"]);
    }

    #[test]
    fn insert_map_copies_in_source_order() {
        let mut m = abc();
        let src: VectorMap<String, i32, 7> = [("x".to_string(), 1), ("y".to_string(), 2)].into();
        m.insert_map(1, &src).unwrap();
        m.push_back_map(&src).unwrap();
        m.push_front_map(&src).unwrap();
        assert_eq!(keys(&m), ["x", "y", "a", "x", "y", "b", "c", "x", "y"]);
        assert_eq!(keys(&src), ["x", "y"]);
    }

    /// Invariant: insert followed by erase at the returned position restores
    /// the previous sequence.
    #[test]
    fn insert_then_erase_round_trips() {
        let mut m = abc();
        let before = m.clone();
        let p = m.insert(2, "t".to_string(), 0).unwrap();
        assert_eq!(m.erase(p.index()), Some(("t".to_string(), 0)));
        assert_eq!(m, before);
    }

    #[test]
    fn erase_out_of_range_is_a_no_op() {
        let mut m = abc();
        assert_eq!(m.erase(3), None);
        assert_eq!(m.len(), 3);
        let mut empty: VectorMap<String, i32> = VectorMap::new();
        assert_eq!(empty.erase(0), None);
    }

    /// Invariant: erase_key removes only the first match.
    #[test]
    fn erase_key_removes_first_match() {
        let mut m = abc();
        m.push_back("a".to_string(), 4).unwrap();
        assert_eq!(m.erase_key("a"), Some(("a".to_string(), 1)));
        assert_eq!(keys(&m), ["b", "c", "a"]);
        assert_eq!(m.erase_key("nope"), None);
    }

    /// Invariant: listed positions are applied one after another, so an
    /// ascending list sees shifted indices.
    #[test]
    fn erase_positions_applies_in_given_order() {
        let mut m = abc();
        m.push_back("d".to_string(), 4).unwrap();
        assert_eq!(m.erase_positions([3, 1]), 2);
        assert_eq!(keys(&m), ["a", "c"]);

        let mut m = abc();
        m.push_back("d".to_string(), 4).unwrap();
        // Erasing 1 shifts "c" into 1 and "d" into 2; 3 is then out of range.
        assert_eq!(m.erase_positions([1, 3]), 1);
        assert_eq!(keys(&m), ["a", "c", "d"]);
    }

    #[test]
    fn erase_all_removes_every_match() {
        let mut m = abc();
        m.insert(1, "c".to_string(), 30).unwrap();
        assert_eq!(m.erase_all("c"), 2);
        assert_eq!(keys(&m), ["a", "b"]);
        assert_eq!(m.erase_all("c"), 0);
    }

    #[test]
    fn move_entry_shifts_intervening_entries() {
        let mut m = abc();
        m.push_back("d".to_string(), 4).unwrap();
        assert!(m.move_entry(0, 2));
        assert_eq!(keys(&m), ["b", "c", "a", "d"]);
        assert!(m.move_entry(3, 0));
        assert_eq!(keys(&m), ["d", "b", "c", "a"]);
        assert!(!m.move_entry(0, 4));
        assert!(!m.move_entry(4, 0));
        assert_eq!(keys(&m), ["d", "b", "c", "a"]);
    }

    #[test]
    fn swap_exchanges_entries() {
        let mut m = abc();
        assert!(m.swap(0, 2));
        assert_eq!(keys(&m), ["c", "b", "a"]);
        assert!(!m.swap(0, 3));
        assert_eq!(keys(&m), ["c", "b", "a"]);
    }

    /// Invariant: swapping whole maps exchanges contents and capacities.
    #[test]
    fn swap_with_exchanges_ownership() {
        let mut a = abc();
        let mut b: VectorMap<String, i32> = VectorMap::with_capacity(250).unwrap();
        b.push_back("z".to_string(), 0).unwrap();
        a.swap_with(&mut b);
        assert_eq!(keys(&a), ["z"]);
        assert_eq!(a.capacity(), 300);
        assert_eq!(keys(&b), ["a", "b", "c"]);
        assert_eq!(b.capacity(), 100);
    }

    #[test]
    fn setters_replace_and_report_previous() {
        let mut m = abc();
        assert_eq!(m.set(0, "A".to_string(), 10), Some(("a".to_string(), 1)));
        assert_eq!(m.set_key(1, "B".to_string()), Some("b".to_string()));
        assert_eq!(m.set_value(2, 30), Some(3));
        assert_eq!(m.set_value(3, 99), None);
        assert_eq!(m.set_key(3, "x".to_string()), None);
        assert_eq!(keys(&m), ["A", "B", "c"]);
        assert_eq!(m.value_at(2), Some(&30));
    }

    /// Invariant: key-addressed setters resolve the ordinal-th match.
    #[test]
    fn setters_by_key_use_ordinal() {
        let mut m = abc();
        m.push_back("a".to_string(), 4).unwrap();
        assert_eq!(m.set_value_by_key("a", 2, 40), Some(4));
        assert_eq!(m.get_all_values("a"), vec![&1, &40]);
        assert_eq!(m.set_key_by_key("a", 1, "A".to_string()), Some("a".to_string()));
        assert_eq!(
            m.set_by_key("a", 1, "Z".to_string(), 0),
            Some(("a".to_string(), 40))
        );
        assert_eq!(m.set_value_by_key("a", 1, 5), None);
        assert_eq!(keys(&m), ["A", "b", "c", "Z"]);
    }

    /// Invariant: clear drops entries but keeps the buffer.
    #[test]
    fn clear_keeps_capacity() {
        let mut m = abc();
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), 100);
    }

    /// Invariant: the literal form rounds up to a whole chunk.
    #[test]
    fn literal_construction_capacity() {
        let m: VectorMap<&str, i32, 2> = [("a", 1), ("b", 2), ("c", 3)].into();
        assert_eq!(m.capacity(), 4);
        assert_eq!(m.len(), 3);
        let m: VectorMap<&str, i32> = [("a", 1)].into();
        assert_eq!(m.capacity(), 100);
    }

    #[test]
    fn extend_appends_in_order() {
        let mut m = abc();
        m.extend([("d".to_string(), 4), ("e".to_string(), 5)]);
        assert_eq!(keys(&m), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn debug_lists_entries_in_position_order() {
        let m: VectorMap<&str, i32> = [("b", 2), ("a", 1), ("b", 3)].into();
        assert_eq!(format!("{:?}", m), r#"{"b": 2, "a": 1, "b": 3}"#);
    }

    #[test]
    fn equality_ignores_capacity_and_chunk() {
        let a: VectorMap<&str, i32, 3> = [("a", 1), ("b", 2)].into();
        let mut b: VectorMap<&str, i32, 50> = VectorMap::default();
        b.push_back("a", 1).unwrap();
        b.push_back("b", 2).unwrap();
        assert!(a == b);
        b.swap(0, 1);
        assert!(a != b);
    }
}
