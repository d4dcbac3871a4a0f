//! Table: separate-chaining hash table over byte-string keys that remembers
//! insertion order.
//!
//! Entries live in a generational arena and are referenced by `EntryId`
//! handles. Every entry is threaded through two structures at once:
//! - its bucket's singly linked collision chain (`chain`), unordered;
//! - the global doubly linked list (`prev`/`next`) in insertion order.
//!
//! Rehashing walks the global list, never the old buckets, so growth cannot
//! disturb iteration order.

use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::iter::FusedIterator;
use core::mem;
use core::ops::Deref;

use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

use crate::cursor::{Cursor, Position};
use crate::error::{AllocError, MergeError, SetError};
use crate::hash::BuildFnv1a;

/// Bucket count of a freshly created table.
pub const INITIAL_CAPACITY: usize = 16;
/// Growth is triggered once `len / capacity` exceeds this after an insert.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

new_key_type! {
    struct EntryId;
}

/// Owned copy of a key's bytes. The table never aliases caller memory.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Box<[u8]>);

impl Key {
    fn try_copy(bytes: &[u8]) -> Result<Self, AllocError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes.len())?;
        buf.extend_from_slice(bytes);
        Ok(Key(buf.into_boxed_slice()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl Deref for Key {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Bytes(&self.0), f)
    }
}

struct Bytes<'a>(&'a [u8]);

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.0.escape_ascii())
    }
}

#[derive(Debug)]
struct Entry<V> {
    key: Key,
    value: V,
    hash: u64,
    chain: Option<EntryId>,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

/// Insertion-ordered hash table mapping byte strings to values of type `V`.
///
/// Not thread-safe by construction; share it behind a lock if needed.
pub struct Table<V, S = BuildFnv1a> {
    hasher: S,
    buckets: Vec<Option<EntryId>>,
    slots: SlotMap<EntryId, Entry<V>>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    #[cfg(test)]
    fail: FailPoints,
}

/// Allocation failures the unit tests can force.
#[cfg(test)]
#[derive(Debug, Default)]
struct FailPoints {
    /// Resizes to more buckets than this fail.
    max_buckets: Option<usize>,
    /// Key copies that still succeed before the next one fails.
    key_copies: Option<usize>,
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Option<EntryId>>, AllocError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

#[inline]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self::with_hasher(BuildFnv1a)
    }

    /// Like [`new`](Self::new) but reports a failed bucket allocation.
    pub fn try_new() -> Result<Self, AllocError> {
        Self::try_with_capacity_and_hasher(INITIAL_CAPACITY, BuildFnv1a)
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> Table<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; INITIAL_CAPACITY],
            slots: SlotMap::with_key(),
            head: None,
            tail: None,
            #[cfg(test)]
            fail: FailPoints::default(),
        }
    }

    /// Create a table with `capacity` buckets (at least one).
    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, AllocError> {
        let buckets = alloc_buckets(capacity.max(1))?;
        Ok(Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            head: None,
            tail: None,
            #[cfg(test)]
            fail: FailPoints::default(),
        })
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    fn make_hash(&self, key: &[u8]) -> u64 {
        let mut state = self.hasher.build_hasher();
        state.write(key);
        state.finish()
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        bucket_for(hash, self.buckets.len())
    }

    fn find_in(&self, bucket: usize, hash: u64, key: &[u8]) -> Option<EntryId> {
        let mut cur = self.buckets[bucket];
        while let Some(id) = cur {
            let entry = self.slots.get(id)?;
            if entry.hash == hash && *entry.key == *key {
                return Some(id);
            }
            cur = entry.chain;
        }
        None
    }

    fn find(&self, key: &[u8]) -> Option<EntryId> {
        let hash = self.make_hash(key);
        self.find_in(self.bucket_of(hash), hash, key)
    }

    /// Store `value` under `key`.
    ///
    /// Returns the previous value when the key was already present; its
    /// position in iteration order is kept. A new key is copied, appended to
    /// the end of the order and may trigger a doubling of the bucket array.
    ///
    /// # Errors
    /// - [`SetError::Allocation`]: the key copy failed, nothing changed.
    /// - [`SetError::Growth`]: the entry was stored but the resize failed.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<Option<V>, SetError>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let hash = self.make_hash(key);
        let bucket = self.bucket_of(hash);

        if let Some(id) = self.find_in(bucket, hash, key) {
            if let Some(entry) = self.slots.get_mut(id) {
                return Ok(Some(mem::replace(&mut entry.value, value)));
            }
        }

        let key = self.copy_key(key).map_err(SetError::Allocation)?;
        let id = self.slots.insert(Entry {
            key,
            value,
            hash,
            chain: self.buckets[bucket],
            prev: self.tail,
            next: None,
        });
        self.buckets[bucket] = Some(id);
        match self.tail.and_then(|t| self.slots.get_mut(t)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);

        if self.load_factor() > MAX_LOAD_FACTOR {
            let target = self.capacity().saturating_mul(2);
            if let Err(e) = self.resize(target) {
                debug!(
                    "table stored entry but could not grow to {} buckets: {}",
                    target, e
                );
                return Err(SetError::Growth(e));
            }
        }
        Ok(None)
    }

    fn copy_key(&mut self, key: &[u8]) -> Result<Key, AllocError> {
        #[cfg(test)]
        if let Some(left) = self.fail.key_copies.as_mut() {
            if *left == 0 {
                return Err(crate::test_util::alloc_failure());
            }
            *left -= 1;
        }
        Key::try_copy(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let id = self.find(key.as_ref())?;
        self.slots.get(id).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let id = self.find(key.as_ref())?;
        self.slots.get_mut(id).map(|e| &mut e.value)
    }

    /// Whether `key` is present, whatever value it maps to. A table of `()`
    /// values works as an ordered set.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.find(key.as_ref()).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove `key`, handing back the owned key copy along with its value.
    /// Capacity is never reduced.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(Key, V)>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let id = self.find(key.as_ref())?;
        self.detach(id).map(|e| (e.key, e.value))
    }

    /// Unlink `id` from its chain and from the order list, then free it.
    fn detach(&mut self, id: EntryId) -> Option<Entry<V>> {
        let (hash, chain, prev, next) = {
            let e = self.slots.get(id)?;
            (e.hash, e.chain, e.prev, e.next)
        };

        let bucket = self.bucket_of(hash);
        if self.buckets[bucket] == Some(id) {
            self.buckets[bucket] = chain;
        } else {
            let mut cur = self.buckets[bucket];
            while let Some(c) = cur {
                let link = self.slots.get_mut(c)?;
                if link.chain == Some(id) {
                    link.chain = chain;
                    break;
                }
                cur = link.chain;
            }
        }

        match prev.and_then(|p| self.slots.get_mut(p)) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.slots.get_mut(n)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }

        self.slots.remove(id)
    }

    /// Keep only the entries for which `keep` returns true, visiting them in
    /// insertion order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[u8], &mut V) -> bool,
    {
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(entry) = self.slots.get_mut(id) else {
                break;
            };
            cur = entry.next;
            if !keep(entry.key.as_bytes(), &mut entry.value) {
                self.detach(id);
            }
        }
    }

    /// Drop every entry. The bucket array keeps its size so refilling the
    /// table does not pay for growth again.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets.fill(None);
        self.head = None;
        self.tail = None;
    }

    /// Remove every entry, yielding owned `(key, value)` pairs in insertion
    /// order. The table is empty as soon as this returns; capacity is kept.
    pub fn drain(&mut self) -> Drain<V> {
        let slots = mem::take(&mut self.slots);
        let front = self.head.take();
        self.tail = None;
        self.buckets.fill(None);
        Drain { slots, front }
    }

    /// Rebuild the bucket array with `capacity` buckets, threading entries
    /// in global-list order.
    fn resize(&mut self, capacity: usize) -> Result<(), AllocError> {
        let capacity = capacity.max(1);
        #[cfg(test)]
        if self.fail.max_buckets.is_some_and(|max| capacity > max) {
            return Err(crate::test_util::alloc_failure());
        }
        let mut buckets = alloc_buckets(capacity)?;

        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(entry) = self.slots.get_mut(id) else {
                break;
            };
            let bucket = bucket_for(entry.hash, capacity);
            entry.chain = buckets[bucket];
            buckets[bucket] = Some(id);
            cur = entry.next;
        }

        trace!(
            "table resized from {} to {} buckets ({} entries)",
            self.buckets.len(),
            capacity,
            self.slots.len()
        );
        self.buckets = buckets;
        Ok(())
    }

    /// Copy every entry of `source` into `self`, in `source`'s insertion
    /// order. Where both hold a key, `source`'s value wins and the value it
    /// replaced is returned (in that same order) so the caller can dispose of
    /// it. `source` is not modified.
    ///
    /// The bucket array is grown once up front to fit both tables.
    ///
    /// # Errors
    /// - [`MergeError::Reserve`]: pre-sizing failed, `self` is unchanged.
    /// - [`MergeError::Insert`]: a key copy failed. Not transactional: the
    ///   entries merged so far stay merged, and the destination values they
    ///   replaced are dropped rather than returned.
    ///
    /// A failed growth step during an insert is not an error here; the entry
    /// is stored and merging continues above the load-factor target.
    pub fn merge<S2>(&mut self, source: &Table<V, S2>) -> Result<Vec<V>, MergeError>
    where
        V: Clone,
        S2: BuildHasher,
    {
        let total = self.len().saturating_add(source.len());
        if self.capacity() < total {
            trace!("merge pre-sizing table to {} buckets", total);
            self.resize(total).map_err(MergeError::Reserve)?;
        }

        let mut evicted = Vec::new();
        for (merged, (key, value)) in source.iter().enumerate() {
            match self.set(key, value.clone()) {
                Ok(Some(old)) => evicted.push(old),
                Ok(None) => {}
                Err(SetError::Growth(e)) => {
                    debug!("merge continuing below load-factor target: {}", e);
                }
                Err(SetError::Allocation(e)) => {
                    debug!("merge aborted after {} entries: {}", merged, e);
                    return Err(MergeError::Insert { merged, source: e });
                }
            }
        }
        Ok(evicted)
    }

    /// A new table holding the same mappings in the same order. Bucket
    /// layout is not preserved.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        V: Clone,
        S: Clone,
    {
        let mut clone = Self::try_with_capacity_and_hasher(INITIAL_CAPACITY, self.hasher.clone())?;
        clone.merge(self).map_err(|e| match e {
            MergeError::Reserve(e) | MergeError::Insert { source: e, .. } => e,
        })?;
        Ok(clone)
    }

    /// Oldest entry.
    pub fn first(&self) -> Option<(&[u8], &V)> {
        let e = self.slots.get(self.head?)?;
        Some((e.key.as_bytes(), &e.value))
    }

    /// Most recently inserted entry.
    pub fn last(&self) -> Option<(&[u8], &V)> {
        let e = self.slots.get(self.tail?)?;
        Some((e.key.as_bytes(), &e.value))
    }

    pub fn cursor(&self) -> TableCursor<'_, V> {
        TableCursor {
            slots: &self.slots,
            next: self.head,
            pos: Position::new(),
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Check every structural invariant, panicking with a description of
    /// the first violation.
    ///
    /// # Panics
    /// When the chains, the order list and the entry count disagree, or two
    /// entries share a key.
    pub fn validate(&self) {
        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut prev = None;
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(e) = self.slots.get(id) else {
                panic!("order list points at a dead entry {:?}", id);
            };
            assert_eq!(e.prev, prev, "prev link disagrees with walk order");
            assert!(seen.insert(e.key.as_bytes()), "duplicate key {:?}", e.key);
            assert_eq!(e.hash, self.make_hash(&e.key), "stale stored hash");

            let bucket = self.bucket_of(e.hash);
            let mut link = self.buckets[bucket];
            let mut found = false;
            while let Some(c) = link {
                if c == id {
                    found = true;
                    break;
                }
                match self.slots.get(c) {
                    Some(next) => link = next.chain,
                    None => panic!("chain of bucket {} points at a dead entry {:?}", bucket, c),
                }
            }
            assert!(found, "entry {:?} missing from bucket {}", e.key, bucket);

            count += 1;
            prev = cur;
            cur = e.next;
        }
        assert_eq!(prev, self.tail, "tail is not the last entry of the walk");
        assert_eq!(count, self.slots.len(), "order list misses entries");

        let chained: usize = (0..self.buckets.len()).map(|b| self.chain_len(b)).sum();
        assert_eq!(chained, self.slots.len(), "an entry sits in more than one chain");
    }

    fn chain_len(&self, bucket: usize) -> usize {
        let mut n = 0;
        let mut cur = self.buckets[bucket];
        while let Some(id) = cur {
            n += 1;
            cur = self.slots.get(id).and_then(|e| e.chain);
        }
        n
    }

    #[cfg(feature = "stats")]
    pub fn chain_stats(&self) -> ChainStats {
        let mut occupied = 0;
        let mut longest = 0;
        for b in 0..self.buckets.len() {
            let n = self.chain_len(b);
            if n > 0 {
                occupied += 1;
            }
            longest = longest.max(n);
        }
        ChainStats {
            buckets: self.buckets.len(),
            occupied,
            longest,
            average: if occupied == 0 {
                0.0
            } else {
                self.len() as f64 / occupied as f64
            },
        }
    }
}

/// Chain-length summary of a table's buckets.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStats {
    pub buckets: usize,
    pub occupied: usize,
    pub longest: usize,
    /// Mean chain length over occupied buckets.
    pub average: f64,
}

impl<V: fmt::Debug, S> fmt::Debug for Table<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iter = Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        };
        f.debug_map()
            .entries(iter.map(|(k, v)| (Bytes(k), v)))
            .finish()
    }
}

/// One entry as seen through a [`TableCursor`].
pub struct EntryRef<'a, V> {
    key: &'a Key,
    value: &'a V,
}

impl<'a, V> EntryRef<'a, V> {
    pub fn key(&self) -> &'a [u8] {
        self.key.as_bytes()
    }

    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    pub fn value(&self) -> &'a V {
        self.value
    }
}

impl<V> Clone for EntryRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for EntryRef<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for EntryRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRef")
            .field("key", self.key)
            .field("value", self.value)
            .finish()
    }
}

/// Forward cursor over a table in insertion order. Borrows the table, so
/// the table cannot be mutated while the cursor is alive.
pub struct TableCursor<'a, V> {
    slots: &'a SlotMap<EntryId, Entry<V>>,
    next: Option<EntryId>,
    pos: Position,
}

impl<'a, V> Cursor for TableCursor<'a, V> {
    type Item = EntryRef<'a, V>;

    fn advance(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        let item = match self.next.and_then(|id| slots.get(id)) {
            Some(e) => {
                self.next = e.next;
                Some(EntryRef {
                    key: &e.key,
                    value: &e.value,
                })
            }
            None => None,
        };
        self.pos.record(item)
    }

    fn index(&self) -> Option<usize> {
        self.pos.index()
    }
}

impl<'a, V> Iterator for TableCursor<'a, V> {
    type Item = EntryRef<'a, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<V> FusedIterator for TableCursor<'_, V> {}

/// Double-ended iterator over `(key, value)` in insertion order.
pub struct Iter<'a, V> {
    slots: &'a SlotMap<EntryId, Entry<V>>,
    front: Option<EntryId>,
    back: Option<EntryId>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.slots.get(self.front?)?;
        self.front = e.next;
        self.remaining -= 1;
        Some((e.key.as_bytes(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.slots.get(self.back?)?;
        self.back = e.prev;
        self.remaining -= 1;
        Some((e.key.as_bytes(), &e.value))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V, S> IntoIterator for &'a Table<V, S>
where
    S: BuildHasher,
{
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator returned by [`Table::drain`]. Entries not consumed are
/// dropped with it.
pub struct Drain<V> {
    slots: SlotMap<EntryId, Entry<V>>,
    front: Option<EntryId>,
}

impl<V> Iterator for Drain<V> {
    type Item = (Key, V);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.remove(self.front?)?;
        self.front = e.next;
        Some((e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<V> ExactSizeIterator for Drain<V> {}
impl<V> FusedIterator for Drain<V> {}
