//! RobinHoodMap: linear probing with PSL-ordered displacement.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;

use crate::probe::ProbeSeq;
use crate::resize::{Options, ResizePolicy};
use crate::slot::{PslEntry, Slot, SlotStore};

/// Open-addressing map with Robin Hood hashing: insertion swaps the
/// traveling entry into any slot whose resident has a strictly smaller
/// probe-sequence length, so richer (closer-to-home) entries never sit
/// behind poorer ones. Removal backward-shifts the following run while
/// PSLs stay positive; no tombstones ever exist.
///
/// The PSL ordering buys two things over plain linear probing: lookups
/// terminate as soon as the resident's PSL drops below the steps taken,
/// and probe-length variance is bounded even at high load.
pub struct RobinHoodMap<K, V, S = ahash::RandomState> {
    store: SlotStore<PslEntry<K, V>>,
    resize: ResizePolicy,
    hasher: S,
}

impl<K, V> RobinHoodMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(Options::with_capacity(capacity))
    }
}

impl<K, V> Default for RobinHoodMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> RobinHoodMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_options(options: Options) -> Self
    where
        S: Default,
    {
        Self::with_options_and_hasher(options, S::default())
    }

    pub fn with_options_and_hasher(options: Options, hasher: S) -> Self {
        let (resize, capacity) = ResizePolicy::new(options);
        Self {
            store: SlotStore::with_capacity(capacity),
            resize,
            hasher,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.store.live()
    }

    pub fn is_empty(&self) -> bool {
        self.store.live() == 0
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Always zero; Robin Hood removal never buries an entry. Present so
    /// all variants expose the same accounting surface.
    pub fn tombstone_count(&self) -> usize {
        self.store.tombstones()
    }

    pub fn load_factor(&self) -> f64 {
        self.store.used() as f64 / self.store.capacity() as f64
    }

    /// Inserts or updates (last write wins). A new key travels the probe
    /// sequence and takes the first slot whose resident is richer than it,
    /// displacing that resident onward.
    pub fn insert(&mut self, key: K, value: V) {
        let hash = self.make_hash(&key);
        if let Some(index) = self.find_index(hash, &key) {
            if let Slot::Occupied(e) = self.store.slot_mut(index) {
                e.value = value;
            }
            return;
        }
        if self.resize.should_grow(self.store.used() + 1) {
            self.grow();
        }
        self.place(PslEntry {
            key,
            value,
            hash,
            psl: 0,
        });
    }

    /// Looks up a key; does not mutate table state.
    pub fn emplace<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        let index = self.find_index(hash, key)?;
        self.store.slot(index).entry().map(|e| &e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        self.find_index(hash, key).is_some()
    }

    /// Removes a key; true if an entry was removed. The vacated slot is
    /// closed by sliding the immediately following run back one step,
    /// decrementing each moved entry's PSL, until a resident already at
    /// home (PSL 0) or an Empty slot ends the run.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        let Some(index) = self.find_index(hash, key) else {
            return false;
        };
        self.store.vacate(index);
        let mask = self.store.mask();
        let mut hole = index;
        loop {
            let cursor = (hole + 1) & mask;
            match self.store.slot_mut(cursor) {
                Slot::Occupied(e) if e.psl > 0 => {
                    e.psl -= 1;
                    self.store.relocate(cursor, hole);
                    hole = cursor;
                }
                _ => break,
            }
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.entries().map(|e| (&e.key, &e.value))
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Probe for `q`. Terminates on Empty, or early once the resident's
    /// PSL is smaller than the steps taken: insertion would have displaced
    /// the sought key into this slot or earlier, so it cannot rest beyond.
    fn find_index<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut probe = ProbeSeq::new(hash, self.store.mask());
        let mut psl = 0;
        loop {
            let index = probe.next();
            match self.store.slot(index) {
                Slot::Occupied(e) => {
                    if e.hash == hash && e.key.borrow() == q {
                        return Some(index);
                    }
                    if e.psl < psl {
                        return None;
                    }
                }
                _ => return None,
            }
            psl += 1;
        }
    }

    /// Robin Hood placement of an entry known to be absent. The traveling
    /// entry's PSL grows with every step; whenever it exceeds the
    /// resident's, the two swap and the displaced resident travels on with
    /// its own hash and PSL.
    fn place(&mut self, entry: PslEntry<K, V>) {
        let mut probe = ProbeSeq::new(entry.hash, self.store.mask());
        let mut travel = entry;
        // probe starts at the traveling entry's own home
        debug_assert_eq!(travel.psl, 0);
        loop {
            let index = probe.next();
            match self.store.slot_mut(index) {
                Slot::Empty => {
                    self.store.occupy(index, travel);
                    return;
                }
                Slot::Occupied(resident) => {
                    if resident.psl < travel.psl {
                        mem::swap(resident, &mut travel);
                        // The probe sequence continues from this slot;
                        // linear stepping is home-agnostic, so the steps
                        // are the displaced resident's own.
                    }
                }
                Slot::Tombstone => unreachable!("robin hood tables never bury entries"),
            }
            travel.psl += 1;
        }
    }

    /// Stop-the-world rehash into twice the capacity; every live entry is
    /// re-placed from its stored hash with a fresh PSL.
    fn grow(&mut self) {
        let new_capacity = self.resize.next_capacity(self.store.capacity());
        let old = mem::replace(&mut self.store, SlotStore::with_capacity(new_capacity));
        self.resize.rebound(new_capacity);
        for mut entry in old.into_entries() {
            entry.psl = 0;
            self.place(entry);
        }
    }
}

#[cfg(test)]
impl<K, V, S> RobinHoodMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn slot_index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(self.make_hash(key), key)
    }

    pub(crate) fn psl_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.slot_index_of(key)?;
        self.store.slot(index).entry().map(|e| e.psl)
    }

    pub(crate) fn psl_sum(&self) -> usize {
        self.store.entries().map(|e| e.psl).sum()
    }

    /// Structural check: counts match the slots, no tombstones, at least
    /// one Empty slot, and every entry's stored PSL equals its actual
    /// displacement from home.
    pub(crate) fn assert_invariants(&self) {
        let mask = self.store.mask();
        let mut live = 0;
        let mut empties = 0;
        for i in 0..self.store.capacity() {
            match self.store.slot(i) {
                Slot::Empty => empties += 1,
                Slot::Tombstone => panic!("tombstone in a robin hood table"),
                Slot::Occupied(e) => {
                    live += 1;
                    assert_eq!(
                        e.psl,
                        crate::probe::displacement(e.hash, i, mask),
                        "stored PSL disagrees with displacement at slot {i}"
                    );
                }
            }
        }
        assert_eq!(live, self.store.live());
        assert_eq!(self.store.tombstones(), 0);
        assert!(empties >= 1, "a full table can never terminate a probe");
    }
}
