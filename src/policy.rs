//! Deletion policies for the linear-probing maps.

use crate::probe::displacement;
use crate::slot::{Entry, Slot, SlotStore};

mod sealed {
    pub trait Sealed {}
}

/// How a linear-probing map vacates a slot on removal. Sealed: the two
/// implementations below are the only ones the probe loops are written
/// against.
pub trait DeletionPolicy: sealed::Sealed {
    /// Whether removal leaves tombstones behind. When false, Empty is the
    /// only probe terminator and lookups never skip a slot.
    #[doc(hidden)]
    const USES_TOMBSTONES: bool;

    #[doc(hidden)]
    fn vacate<K, V>(store: &mut SlotStore<Entry<K, V>>, index: usize);
}

/// Tombstone marking: removal writes a marker that lookups probe past.
/// Cheap removal, but long tombstone runs degrade probe length until the
/// next resize sheds them.
pub struct Tombstone;

/// Backward-shift deletion: removal closes the hole by sliding subsequent
/// probe-reachable entries one slot earlier. No tombstones ever exist.
pub struct BackwardShift;

impl sealed::Sealed for Tombstone {}
impl sealed::Sealed for BackwardShift {}

impl DeletionPolicy for Tombstone {
    const USES_TOMBSTONES: bool = true;

    fn vacate<K, V>(store: &mut SlotStore<Entry<K, V>>, index: usize) {
        store.bury(index);
    }
}

impl DeletionPolicy for BackwardShift {
    const USES_TOMBSTONES: bool = false;

    // Knuth's deletion algorithm, generalized to wraparound: scan forward
    // from the hole; an entry at `cursor` may move into the hole iff its
    // home index lies cyclically outside (hole, cursor], i.e. the move
    // never carries it before its home. Unmovable entries are skipped,
    // not terminal: a later entry with an earlier home may still need the
    // hole. The scan ends at the first Empty slot.
    fn vacate<K, V>(store: &mut SlotStore<Entry<K, V>>, index: usize) {
        store.vacate(index);
        let mask = store.mask();
        let mut hole = index;
        let mut cursor = index;
        loop {
            cursor = (cursor + 1) & mask;
            let hash = match store.slot(cursor) {
                Slot::Occupied(e) => e.hash,
                _ => break,
            };
            let from_home = displacement(hash, cursor, mask);
            let from_hole = cursor.wrapping_sub(hole) & mask;
            if from_home >= from_hole {
                store.relocate(cursor, hole);
                hole = cursor;
            }
        }
    }
}
