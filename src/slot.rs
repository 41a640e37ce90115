//! SlotStore: the contiguous backing array of slots plus count bookkeeping.

use core::mem;

/// A linear-probing entry. The hash is computed once on insert and reused
/// for every probe and for rehashing.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
    pub hash: u64,
}

/// A Robin Hood entry. `psl` is the entry's probe-sequence length: the
/// number of steps between its home index and the slot it rests in.
#[derive(Debug)]
pub(crate) struct PslEntry<K, V> {
    pub key: K,
    pub value: V,
    pub hash: u64,
    pub psl: usize,
}

#[derive(Debug)]
pub(crate) enum Slot<E> {
    Empty,
    Occupied(E),
    Tombstone,
}

impl<E> Slot<E> {
    pub(crate) fn entry(&self) -> Option<&E> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }
}

/// Fixed-capacity slot array. Capacity is a power of two and only changes
/// when the owning map swaps in a whole new store during a resize.
///
/// All state transitions go through `occupy`/`bury`/`vacate`/`relocate` so
/// the live and tombstone counts can never drift from the slot contents.
#[derive(Debug)]
pub(crate) struct SlotStore<E> {
    slots: Box<[Slot<E>]>,
    live: usize,
    tombstones: usize,
}

impl<E> SlotStore<E> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        Self {
            slots: slots.into_boxed_slice(),
            live: 0,
            tombstones: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Occupied plus tombstone slots; the quantity the resize threshold
    /// is measured against.
    pub(crate) fn used(&self) -> usize {
        self.live + self.tombstones
    }

    pub(crate) fn slot(&self, index: usize) -> &Slot<E> {
        &self.slots[index]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<E> {
        &mut self.slots[index]
    }

    /// Write an entry into an Empty or Tombstone slot.
    pub(crate) fn occupy(&mut self, index: usize, entry: E) {
        match mem::replace(&mut self.slots[index], Slot::Occupied(entry)) {
            Slot::Empty => self.live += 1,
            Slot::Tombstone => {
                self.tombstones -= 1;
                self.live += 1;
            }
            Slot::Occupied(_) => unreachable!("occupy over a live entry"),
        }
    }

    /// Occupied -> Tombstone, returning the evicted entry.
    pub(crate) fn bury(&mut self, index: usize) -> E {
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(e) => {
                self.live -= 1;
                self.tombstones += 1;
                e
            }
            _ => unreachable!("bury on a slot without a live entry"),
        }
    }

    /// Occupied -> Empty, returning the evicted entry.
    pub(crate) fn vacate(&mut self, index: usize) -> E {
        match mem::replace(&mut self.slots[index], Slot::Empty) {
            Slot::Occupied(e) => {
                self.live -= 1;
                e
            }
            _ => unreachable!("vacate on a slot without a live entry"),
        }
    }

    /// Move a live entry from one slot into an Empty slot; `from` becomes
    /// Empty. Counts are unchanged.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        debug_assert!(matches!(self.slots[to], Slot::Empty));
        let entry = match mem::replace(&mut self.slots[from], Slot::Empty) {
            Slot::Occupied(e) => e,
            _ => unreachable!("relocate from a slot without a live entry"),
        };
        self.slots[to] = Slot::Occupied(entry);
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &E> {
        self.slots.iter().filter_map(Slot::entry)
    }

    /// Consume the store, yielding live entries in table order. Tombstones
    /// are dropped here; this is the resize path.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = E> {
        self.slots.into_vec().into_iter().filter_map(|s| match s {
            Slot::Occupied(e) => Some(e),
            _ => None,
        })
    }

    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.live = 0;
        self.tombstones = 0;
    }
}
