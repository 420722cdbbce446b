//! ChainSet: public set API over the raw chained table, plus the opaque
//! `Position` handle and the bucket-order iterator.

use crate::raw_table::RawTable;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use slotmap::DefaultKey;
use std::collections::hash_map::RandomState;

/// Opaque handle to a key inside a specific [`ChainSet`].
///
/// Minted by [`ChainSet::insert`] and [`ChainSet::find`]; resolved
/// against its owning set with [`Position::key`]. After the key is
/// removed the position stops resolving (the arena slot's generation has
/// moved on); it never aliases a later key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    bucket: usize,
    entry: DefaultKey,
}

impl Position {
    pub(crate) fn new(bucket: usize, entry: DefaultKey) -> Self {
        Position { bucket, entry }
    }

    /// The key this position names, or `None` if it has been removed.
    pub fn key<'a, K, S>(&self, set: &'a ChainSet<K, S>) -> Option<&'a K>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        set.table.key_at(self.entry)
    }
}

/// A hash set with separate chaining.
///
/// Distinct keys only: re-inserting a present key reports `false` and
/// stores nothing. Iteration order is ascending bucket order then chain
/// order, which is no ordering of the keys themselves. The bucket array
/// grows automatically (never past-shrinks; see [`ChainSet::clear`]).
pub struct ChainSet<K, S = RandomState> {
    table: RawTable<K, S>,
}

impl<K> ChainSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// A set pre-sized to `capacity` buckets (clamped to the minimum).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K> Default for ChainSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            table: RawTable::with_capacity_and_hasher(capacity, hasher),
        }
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current bucket count. Grows by rehashing; only [`ChainSet::clear`]
    /// resets it.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find(key).is_some()
    }

    /// Membership count for `key`: 1 if present, 0 otherwise (a set, not
    /// a multiset).
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains(key))
    }

    /// Locate `key`, returning an opaque position if present.
    pub fn find<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table
            .find(key)
            .map(|(bucket, entry)| Position::new(bucket, entry))
    }

    /// Borrow the stored key equal to `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, entry) = self.table.find(key)?;
        self.table.key_at(entry)
    }

    /// Add `key` to the set. Returns the key's position and whether this
    /// call inserted it; a present key is left untouched and reported
    /// with `false`.
    ///
    /// A size-increasing insert may first rehash the whole table to keep
    /// the load factor below its threshold.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        let ((bucket, entry), inserted) = self.table.insert(key);
        (Position::new(bucket, entry), inserted)
    }

    /// Remove `key` if present. Removing an absent key is a no-op
    /// returning `false`. Never shrinks the bucket array.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key).is_some()
    }

    /// Remove `key` and return it if it was present.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key)
    }

    /// Drop every key and reset capacity to the minimum. A subsequent
    /// insert behaves as on a fresh set.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grow so `additional` more keys fit without rehashing.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Exchange the entire contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Iterate all keys, ascending bucket order then chain order.
    pub fn iter(&self) -> Iter<'_, K, S> {
        Iter {
            table: &self.table,
            cursor: self.table.occupied_from(0),
        }
    }

    /// Resume iteration from `pos` (inclusive). A stale position yields
    /// an exhausted iterator. The resume point is recomputed from the
    /// entry's stored hash, so it is valid under the current capacity.
    pub fn iter_at(&self, pos: Position) -> Iter<'_, K, S> {
        Iter {
            table: &self.table,
            cursor: self.table.position_of(pos.entry),
        }
    }

    /// Write a human-readable rendering of `bucket index -> chain` with a
    /// terminal end-marker line. Debugging only; not a stable format.
    pub fn dump<W>(&self, out: &mut W) -> fmt::Result
    where
        K: fmt::Debug,
        W: fmt::Write,
    {
        self.table.dump(out)
    }

    /// Test hook, forwarded to the raw table.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.table.check_invariants();
    }
}

/// Set equality: same size and every key of one present in the other.
/// Order-independent by construction.
impl<K, S> PartialEq for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|k| self.contains(k))
    }
}

impl<K, S> Eq for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

/// Clone by re-insertion, not structural copy: the clone reserves room
/// for every key up front, then inserts them one by one. Element order is
/// not part of the contract, so the bucket layouts may differ.
impl<K, S> Clone for ChainSet<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(0, self.hasher().clone());
        out.reserve(self.len());
        for key in self {
            out.insert(key.clone());
        }
        out
    }
}

impl<K, S> fmt::Debug for ChainSet<K, S>
where
    K: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Bulk insert: per-key check-then-insert, skipping keys already present.
/// The growth condition is re-checked before each individual insertion.
impl<K, S> Extend<K> for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, S> FromIterator<K> for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<K, const N: usize> From<[K; N]> for ChainSet<K>
where
    K: Eq + Hash,
{
    fn from(keys: [K; N]) -> Self {
        Self::from_iter(keys)
    }
}

impl<'a, K, S> IntoIterator for &'a ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over a set's keys.
///
/// The cursor is `Some((bucket, entry))` at a live entry and `None` at
/// end. Advancing follows the chain's `next` link, then skips forward
/// over empty buckets; running off the last bucket is the end state. The
/// borrow of the set makes mutation during iteration a compile error, so
/// the cursor can never observe a relocated table.
pub struct Iter<'a, K, S> {
    pub(crate) table: &'a RawTable<K, S>,
    pub(crate) cursor: Option<(usize, DefaultKey)>,
}

impl<'a, K, S> Iterator for Iter<'a, K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let (bucket, entry) = self.cursor?;
        let key = self.table.key_at(entry)?;
        self.cursor = self.table.position_after(bucket, entry);
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(_) => (1, Some(self.table.len())),
            None => (0, Some(0)),
        }
    }
}

impl<K, S> FusedIterator for Iter<'_, K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> Clone for Iter<'_, K, S> {
    fn clone(&self) -> Self {
        Iter {
            table: self.table,
            cursor: self.cursor,
        }
    }
}
