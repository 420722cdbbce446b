//! RawTable: the structural separate-chaining layer.
//!
//! Bucket heads live in a `Vec<Option<DefaultKey>>`; the chain entries
//! themselves live in a `SlotMap` arena and link to each other through
//! arena keys. The slotmap doubles as the element count (`len`) and as a
//! free list for recycled entry slots, and its generational keys make
//! stale positions detectable instead of dangling.

use crate::guard::DebugAccess;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use slotmap::{DefaultKey, SlotMap};

/// Smallest bucket-array size the table ever uses. Rehash clamps to this,
/// so the modulus is never zero.
pub(crate) const MIN_CAPACITY: usize = 7;

/// Growth threshold: a prospective insert that would push
/// `len > capacity * MAX_LOAD_FACTOR` triggers a rehash first.
pub(crate) const MAX_LOAD_FACTOR: f64 = 0.7;

#[derive(Debug)]
struct Entry<K> {
    key: K,
    /// Hash computed once at insert; bucket selection and rehashing use
    /// this stored value, never `K: Hash`.
    hash: u64,
    next: Option<DefaultKey>,
}

pub(crate) struct RawTable<K, S> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>,
    entries: SlotMap<DefaultKey, Entry<K>>,
    access: DebugAccess,
}

impl<K, S> RawTable<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Build a table sized for `capacity` buckets (clamped to the
    /// minimum), so every invariant holds before the first operation.
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let mut table = Self {
            hasher,
            buckets: Vec::new(),
            entries: SlotMap::with_key(),
            access: DebugAccess::new(),
        };
        Self::rehash(&mut table.buckets, &mut table.entries, capacity);
        table
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Chain walk under a precomputed hash. No guard: callers hold one.
    fn probe<Q>(&self, hash: u64, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = self.bucket_of(hash);
        let mut cursor = self.buckets[bucket];
        while let Some(ek) = cursor {
            let entry = &self.entries[ek];
            if entry.key.borrow() == q {
                return Some((bucket, ek));
            }
            cursor = entry.next;
        }
        None
    }

    pub(crate) fn find<Q>(&self, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.access.enter();
        self.probe(self.make_hash(q), q)
    }

    /// Insert `key` unless an equal key is already present. Returns the
    /// key's position and whether this call added it.
    ///
    /// On a genuine insert the growth check runs *before* the bucket is
    /// selected: a rehash changes every key's bucket index.
    pub(crate) fn insert(&mut self, key: K) -> ((usize, DefaultKey), bool) {
        let _g = self.access.enter();
        let hash = self.make_hash(&key);
        if let Some(pos) = self.probe(hash, &key) {
            return (pos, false);
        }
        let target = self.entries.len() + 1;
        Self::grow_for(&mut self.buckets, &mut self.entries, target);
        let bucket = self.bucket_of(hash);
        let head = self.buckets[bucket];
        let ek = self.entries.insert(Entry { key, hash, next: head });
        self.buckets[bucket] = Some(ek);
        ((bucket, ek), true)
    }

    /// Unlink and free the entry for `q`, if present. The predecessor's
    /// link (or the bucket head) is repointed at the successor, so the
    /// rest of the chain stays live. Never shrinks the bucket array.
    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.access.enter();
        let bucket = self.bucket_of(self.make_hash(q));
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[bucket];
        while let Some(ek) = cursor {
            if self.entries[ek].key.borrow() == q {
                let successor = self.entries[ek].next;
                match prev {
                    Some(pk) => self.entries[pk].next = successor,
                    None => self.buckets[bucket] = successor,
                }
                return self.entries.remove(ek).map(|e| e.key);
            }
            prev = Some(ek);
            cursor = self.entries[ek].next;
        }
        None
    }

    /// Drop every entry and reset the bucket array to the minimum
    /// capacity. The one place capacity goes back down.
    pub(crate) fn clear(&mut self) {
        let _g = self.access.enter();
        self.entries.clear();
        self.buckets.clear();
        self.buckets.resize(MIN_CAPACITY, None);
    }

    /// Grow so `additional` more keys fit without another rehash.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let _g = self.access.enter();
        let target = self.entries.len() + additional;
        Self::grow_for(&mut self.buckets, &mut self.entries, target);
    }

    /// Growth policy: if `target` keys would exceed the load-factor
    /// threshold, double-and-add-one until they fit, then rehash. Odd
    /// capacities reduce clustering under weak hash functions.
    fn grow_for(
        buckets: &mut Vec<Option<DefaultKey>>,
        entries: &mut SlotMap<DefaultKey, Entry<K>>,
        target: usize,
    ) {
        if target as f64 > buckets.len() as f64 * MAX_LOAD_FACTOR {
            let mut capacity = buckets.len();
            while target as f64 > capacity as f64 * MAX_LOAD_FACTOR {
                capacity = capacity * 2 + 1;
            }
            Self::rehash(buckets, entries, capacity);
        }
    }

    /// Re-bucket every entry into a fresh bucket array of at least
    /// `capacity` slots (clamped so the load-factor invariant holds even
    /// for a small hint). Entries are moved by re-linking inside the
    /// arena: nothing is duplicated, dropped, or re-hashed, and `len` is
    /// unchanged.
    fn rehash(
        buckets: &mut Vec<Option<DefaultKey>>,
        entries: &mut SlotMap<DefaultKey, Entry<K>>,
        capacity: usize,
    ) {
        let floor = (entries.len() as f64 / MAX_LOAD_FACTOR).ceil() as usize;
        let capacity = capacity.max(MIN_CAPACITY).max(floor);
        let old = core::mem::replace(buckets, vec![None; capacity]);
        for head in old {
            let mut cursor = head;
            while let Some(ek) = cursor {
                cursor = entries[ek].next;
                let bucket = (entries[ek].hash % buckets.len() as u64) as usize;
                entries[ek].next = buckets[bucket];
                buckets[bucket] = Some(ek);
            }
        }
    }

    pub(crate) fn key_at(&self, entry: DefaultKey) -> Option<&K> {
        self.entries.get(entry).map(|e| &e.key)
    }

    /// Resolve an arena key back to its current (bucket, entry) position,
    /// or `None` if the entry was removed. The bucket index is recomputed
    /// from the stored hash, so the result is valid under the current
    /// capacity even if the position was minted before a rehash.
    pub(crate) fn position_of(&self, entry: DefaultKey) -> Option<(usize, DefaultKey)> {
        self.entries.get(entry).map(|e| (self.bucket_of(e.hash), entry))
    }

    /// First (bucket, entry) at or after `start`, skipping empty buckets.
    pub(crate) fn occupied_from(&self, start: usize) -> Option<(usize, DefaultKey)> {
        self.buckets
            .get(start..)?
            .iter()
            .enumerate()
            .find_map(|(i, head)| head.map(|ek| (start + i, ek)))
    }

    /// Iterator advance rule: successor in the same chain if there is
    /// one, otherwise the first entry of the next non-empty bucket.
    pub(crate) fn position_after(&self, bucket: usize, entry: DefaultKey) -> Option<(usize, DefaultKey)> {
        match self.entries.get(entry).and_then(|e| e.next) {
            Some(next) => Some((bucket, next)),
            None => self.occupied_from(bucket + 1),
        }
    }

    /// Render `bucket index -> chain` for debugging. Not a stable format.
    pub(crate) fn dump<W>(&self, out: &mut W) -> core::fmt::Result
    where
        K: core::fmt::Debug,
        W: core::fmt::Write,
    {
        writeln!(out, "len = {} capacity = {}", self.len(), self.capacity())?;
        for (bucket, head) in self.buckets.iter().enumerate() {
            write!(out, "{bucket}:")?;
            let mut cursor = *head;
            while let Some(ek) = cursor {
                let entry = &self.entries[ek];
                write!(out, " -> {:?}", entry.key)?;
                cursor = entry.next;
            }
            writeln!(out)?;
        }
        // Terminal marker: everything past the last bucket is end-of-table.
        writeln!(out, "end")
    }

    /// Test hook: walk the whole structure and assert every invariant.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let capacity = self.buckets.len();
        assert!(capacity >= MIN_CAPACITY, "capacity below minimum");
        assert!(
            self.entries.len() as f64 <= capacity as f64 * MAX_LOAD_FACTOR,
            "load factor exceeded: {} keys in {} buckets",
            self.entries.len(),
            capacity
        );

        let mut seen = std::collections::HashSet::new();
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(ek) = cursor {
                let entry = &self.entries[ek];
                assert!(seen.insert(ek), "entry linked into two chains");
                assert_eq!(
                    self.bucket_of(entry.hash),
                    bucket,
                    "entry chained under the wrong bucket"
                );
                // Set semantics: no equal key further down this chain.
                let mut rest = entry.next;
                while let Some(rk) = rest {
                    assert!(self.entries[rk].key != entry.key, "duplicate key in chain");
                    rest = self.entries[rk].next;
                }
                cursor = entry.next;
            }
        }
        assert_eq!(seen.len(), self.entries.len(), "unreachable entries in arena");
    }
}
