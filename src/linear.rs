//! LinearMap: linear probing with a pluggable deletion policy.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::mem;

use crate::policy::{DeletionPolicy, Tombstone};
use crate::probe::ProbeSeq;
use crate::resize::{Options, ResizePolicy};
use crate::slot::{Entry, Slot, SlotStore};

/// Open-addressing map with linear probing. The deletion policy `D` is a
/// zero-sized type fixed at construction: [`Tombstone`] marks removed
/// slots, [`BackwardShift`](crate::BackwardShift) closes the hole instead.
///
/// Inserting an existing key overwrites its value; removal of an absent
/// key is a no-op returning false.
pub struct LinearMap<K, V, D = Tombstone, S = ahash::RandomState> {
    store: SlotStore<Entry<K, V>>,
    resize: ResizePolicy,
    hasher: S,
    _policy: PhantomData<D>,
}

/// Linear probing with tombstone deletion.
pub type TombstoneMap<K, V, S = ahash::RandomState> = LinearMap<K, V, Tombstone, S>;

/// Linear probing with backward-shift deletion; never holds a tombstone.
pub type BackwardShiftMap<K, V, S = ahash::RandomState> =
    LinearMap<K, V, crate::policy::BackwardShift, S>;

impl<K, V, D> LinearMap<K, V, D>
where
    K: Eq + Hash,
    D: DeletionPolicy,
{
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(Options::with_capacity(capacity))
    }
}

impl<K, V, D> Default for LinearMap<K, V, D>
where
    K: Eq + Hash,
    D: DeletionPolicy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, D, S> LinearMap<K, V, D, S>
where
    K: Eq + Hash,
    D: DeletionPolicy,
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
            _policy: PhantomData,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.store.live()
    }

    pub fn is_empty(&self) -> bool {
        self.store.live() == 0
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of tombstone slots. Always zero under backward-shift
    /// deletion; under tombstone deletion it returns to zero only when a
    /// resize rebuilds the table.
    pub fn tombstone_count(&self) -> usize {
        self.store.tombstones()
    }

    /// Current `(live + tombstones) / capacity` ratio.
    pub fn load_factor(&self) -> f64 {
        self.store.used() as f64 / self.store.capacity() as f64
    }

    /// Inserts or updates; an existing key keeps its slot and gets the new
    /// value (last write wins). May trigger a synchronous grow-and-rehash
    /// before placement.
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
        self.place(Entry { key, value, hash });
    }

    /// Looks up a key, returning a borrowed view of its value. Does not
    /// mutate table state.
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

    /// Removes a key; true if an entry was removed. The deletion policy
    /// decides whether the slot becomes a tombstone or the following run
    /// is shifted back over it.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        match self.find_index(hash, key) {
            Some(index) => {
                D::vacate(&mut self.store, index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.entries().map(|e| (&e.key, &e.value))
    }

    /// Drops every entry; capacity is retained.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Walk the probe sequence for `hash` looking for `q`. Empty is a
    /// definitive miss; a tombstone does not terminate the scan, since the
    /// key may rest further along its original probe path.
    fn find_index<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut probe = ProbeSeq::new(hash, self.store.mask());
        loop {
            let index = probe.next();
            match self.store.slot(index) {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(e) => {
                    if e.hash == hash && e.key.borrow() == q {
                        return Some(index);
                    }
                }
            }
        }
    }

    /// Place an entry known to be absent. The first tombstone on the probe
    /// path is preferred over the terminating Empty slot, reclaiming the
    /// marker and shortening future probes.
    fn place(&mut self, entry: Entry<K, V>) {
        let mut probe = ProbeSeq::new(entry.hash, self.store.mask());
        let mut reclaim = None;
        let index = loop {
            let index = probe.next();
            match self.store.slot(index) {
                Slot::Empty => break index,
                Slot::Tombstone => {
                    if D::USES_TOMBSTONES && reclaim.is_none() {
                        reclaim = Some(index);
                    }
                }
                Slot::Occupied(_) => {}
            }
        };
        self.store.occupy(reclaim.unwrap_or(index), entry);
    }

    /// Stop-the-world rehash into a table of twice the capacity. Live
    /// entries are reinserted in table order from their stored hashes;
    /// tombstones are dropped wholesale.
    fn grow(&mut self) {
        let new_capacity = self.resize.next_capacity(self.store.capacity());
        let old = mem::replace(&mut self.store, SlotStore::with_capacity(new_capacity));
        self.resize.rebound(new_capacity);
        for entry in old.into_entries() {
            self.place(entry);
        }
    }
}

#[cfg(test)]
impl<K, V, D, S> LinearMap<K, V, D, S>
where
    K: Eq + Hash,
    D: DeletionPolicy,
    S: BuildHasher,
{
    /// Slot index a key currently rests in.
    pub(crate) fn slot_index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(self.make_hash(key), key)
    }

    /// Sum of all live entries' probe-sequence lengths.
    pub(crate) fn psl_sum(&self) -> usize {
        let mask = self.store.mask();
        (0..self.store.capacity())
            .filter_map(|i| self.store.slot(i).entry().map(|e| (i, e)))
            .map(|(i, e)| crate::probe::displacement(e.hash, i, mask))
            .sum()
    }

    /// Structural check: counts match the slots, at least one slot is
    /// Empty, tombstones exist only under the tombstone policy, and every
    /// live entry is reachable along its own probe sequence without
    /// crossing an Empty slot.
    pub(crate) fn assert_invariants(&self) {
        let mask = self.store.mask();
        let mut live = 0;
        let mut tombstones = 0;
        let mut empties = 0;
        for i in 0..self.store.capacity() {
            match self.store.slot(i) {
                Slot::Empty => empties += 1,
                Slot::Tombstone => tombstones += 1,
                Slot::Occupied(e) => {
                    live += 1;
                    let mut probe = ProbeSeq::new(e.hash, mask);
                    loop {
                        let j = probe.next();
                        if j == i {
                            break;
                        }
                        assert!(
                            !matches!(self.store.slot(j), Slot::Empty),
                            "entry at {i} is cut off from its home by an Empty slot at {j}"
                        );
                    }
                }
            }
        }
        assert_eq!(live, self.store.live());
        assert_eq!(tombstones, self.store.tombstones());
        assert!(empties >= 1, "a full table can never terminate a probe");
        if !D::USES_TOMBSTONES {
            assert_eq!(tombstones, 0, "backward shift must not leave tombstones");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::BackwardShift;
    use crate::test_util::IdentityBuildHasher;

    fn options_cap8() -> Options {
        Options {
            initial_capacity: 8,
            load_factor: 0.75,
        }
    }

    fn colliding_map<D: DeletionPolicy>() -> LinearMap<u64, i32, D, IdentityBuildHasher> {
        let mut m = LinearMap::with_options(options_cap8());
        for k in [0u64, 8, 16, 32] {
            m.insert(k, 1);
        }
        m
    }

    /// Keys {0, 8, 16, 32} all have home index 0 at capacity 8 and must
    /// land at indices 0..=3 in insertion order.
    #[test]
    fn colliding_run_placement() {
        let m = colliding_map::<Tombstone>();
        assert_eq!(m.slot_index_of(&0), Some(0));
        assert_eq!(m.slot_index_of(&8), Some(1));
        assert_eq!(m.slot_index_of(&16), Some(2));
        assert_eq!(m.slot_index_of(&32), Some(3));
        m.assert_invariants();
    }

    /// Tombstone removal leaves the run intact: index 1 becomes a marker
    /// that lookups probe past, and the later keys stay reachable in
    /// place.
    #[test]
    fn tombstone_remove_marks_slot() {
        let mut m = colliding_map::<Tombstone>();
        assert!(m.remove(&8));
        assert_eq!(m.tombstone_count(), 1);
        assert_eq!(m.emplace(&16), Some(&1));
        assert_eq!(m.emplace(&32), Some(&1));
        assert_eq!(m.slot_index_of(&16), Some(2));
        assert_eq!(m.slot_index_of(&32), Some(3));
        m.assert_invariants();
    }

    /// Backward-shift removal closes the hole: 16 moves into index 1,
    /// 32 into index 2, and index 3 becomes Empty.
    #[test]
    fn backward_shift_remove_closes_hole() {
        let mut m = colliding_map::<BackwardShift>();
        assert!(m.remove(&8));
        assert_eq!(m.tombstone_count(), 0);
        assert_eq!(m.slot_index_of(&16), Some(1));
        assert_eq!(m.slot_index_of(&32), Some(2));
        assert_eq!(m.emplace(&32), Some(&1));
        assert_eq!(m.len(), 3);
        m.assert_invariants();
    }

    /// Backward shift must skip an unmovable entry (one sitting at its
    /// home index) and keep scanning: a later entry with an earlier home
    /// still needs the hole, or it would become unreachable.
    #[test]
    fn backward_shift_skips_pinned_entry() {
        let mut m: LinearMap<u64, i32, BackwardShift, IdentityBuildHasher> =
            LinearMap::with_options(options_cap8());
        m.insert(0, 10); // home 0, lands at 0
        m.insert(1, 11); // home 1, lands at 1
        m.insert(8, 12); // home 0, lands at 2
        assert_eq!(m.slot_index_of(&8), Some(2));

        // Hole at 0; key 1 is pinned at its home and must not move, but
        // key 8 behind it must still slide back to index 0.
        assert!(m.remove(&0));
        assert_eq!(m.slot_index_of(&1), Some(1));
        assert_eq!(m.slot_index_of(&8), Some(0));
        assert_eq!(m.emplace(&8), Some(&12));
        m.assert_invariants();
    }

    /// A wrapped run shifts correctly across the table boundary.
    #[test]
    fn backward_shift_across_wraparound() {
        let mut m: LinearMap<u64, i32, BackwardShift, IdentityBuildHasher> =
            LinearMap::with_options(options_cap8());
        m.insert(7, 1); // home 7, lands at 7
        m.insert(15, 2); // home 7, wraps to 0
        m.insert(23, 3); // home 7, wraps to 1
        assert_eq!(m.slot_index_of(&23), Some(1));

        assert!(m.remove(&7));
        assert_eq!(m.slot_index_of(&15), Some(7));
        assert_eq!(m.slot_index_of(&23), Some(0));
        m.assert_invariants();
    }

    /// Inserting after a removal reclaims the first tombstone on the probe
    /// path instead of extending the run.
    #[test]
    fn insert_reclaims_first_tombstone() {
        let mut m = colliding_map::<Tombstone>();
        assert!(m.remove(&8));
        assert_eq!(m.tombstone_count(), 1);
        m.insert(40, 5); // home 0; first tombstone sits at index 1
        assert_eq!(m.slot_index_of(&40), Some(1));
        assert_eq!(m.tombstone_count(), 0);
        m.assert_invariants();
    }

    /// A tombstone must not shadow a key that still rests further along
    /// the probe path: reinserting a removed-then-reinserted key's
    /// colliding successor updates in place, never duplicates.
    #[test]
    fn tombstone_does_not_duplicate_later_key() {
        let mut m = colliding_map::<Tombstone>();
        assert!(m.remove(&8));
        // Key 16 still rests at index 2 behind the tombstone; its insert
        // must find it there, not occupy the tombstone.
        m.insert(16, 99);
        assert_eq!(m.slot_index_of(&16), Some(2));
        assert_eq!(m.emplace(&16), Some(&99));
        assert_eq!(m.len(), 3);
        m.assert_invariants();
    }

    /// Growing rehashes from the stored hash, drops tombstones, and keeps
    /// the (key, value) set intact.
    #[test]
    fn grow_sheds_tombstones_and_preserves_entries() {
        let mut m: TombstoneMap<u64, u64, IdentityBuildHasher> = LinearMap::with_options_and_hasher(
            Options {
                initial_capacity: 8,
                load_factor: 0.5,
            },
            IdentityBuildHasher,
        );
        for k in 0..4u64 {
            m.insert(k, k * 10);
        }
        assert!(m.remove(&0));
        assert!(m.remove(&1));
        assert_eq!(m.tombstone_count(), 2);
        assert_eq!(m.capacity(), 8);

        // The next insert pushes used-plus-one past the threshold: the
        // rehash drops both tombstones and re-places the live entries
        // from their stored hashes before the new entry lands.
        m.insert(4, 40);
        assert_eq!(m.capacity(), 16);
        assert_eq!(m.tombstone_count(), 0);
        assert_eq!(m.len(), 3);
        for k in 2..5u64 {
            assert_eq!(m.emplace(&k), Some(&(k * 10)));
        }
        assert_eq!(m.emplace(&0), None);
        m.assert_invariants();
    }
}
