//! oa-hashmap: a family of open-addressing hash maps built from one set
//! of probing/storage primitives and three interchangeable deletion or
//! displacement policies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: make the probing, deletion, and resizing logic of each variant
//!   small enough to reason about independently, and share everything
//!   that is policy-free.
//! - Layers:
//!   - SlotStore<E>: the contiguous slot array (Empty / Occupied /
//!     Tombstone) plus live/tombstone bookkeeping. Pure storage, O(1)
//!     indexed access, no policy logic.
//!   - ProbeSeq: linear probe sequence over a power-of-two table,
//!     `hash & mask`, then +1 steps with wraparound.
//!   - DeletionPolicy: how a linear-probing map vacates a slot. Two
//!     zero-sized implementations: `Tombstone` (mark and skip) and
//!     `BackwardShift` (close the hole by sliding followers back).
//!   - LinearMap<K, V, D, S>: the linear-probing variants, assembled
//!     from the above; `TombstoneMap` and `BackwardShiftMap` aliases.
//!   - RobinHoodMap<K, V, S>: linear probing with the Robin Hood swap
//!     rule on insert and a PSL-decrementing shift on remove; stores a
//!     probe-sequence length (PSL) per entry.
//!
//! Constraints
//! - Single-threaded; every operation runs to completion before it
//!   returns. The map exclusively owns its slot array.
//! - Duplicate-key insert is last-write-wins, not an error.
//! - Capacity is always a power of two so the home index is a mask, and
//!   resizing keeps at least one Empty slot (load factor < 1), so every
//!   probe loop terminates without a step counter.
//! - `BackwardShift` and Robin Hood tables never contain a tombstone;
//!   tombstones exist only under the `Tombstone` policy and are dropped
//!   wholesale on resize.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its 64-bit hash; indexing and resizing always use
//!   the stored hash, so `K: Hash` is never invoked after insertion.
//! - The hasher is pluggable via `BuildHasher`; `ahash::RandomState` is
//!   the default.
//!
//! Notes and non-goals
//! - No thread-safety, no persistence, no iteration-order guarantees.
//! - Variant selection is a type parameter fixed at construction; there
//!   is no runtime strategy switching.

mod linear;
mod policy;
mod probe;
mod resize;
mod robin_hood;
mod slot;

mod map_proptest;
#[cfg(test)]
mod test_util;

// Public surface
pub use linear::{BackwardShiftMap, LinearMap, TombstoneMap};
pub use policy::{BackwardShift, DeletionPolicy, Tombstone};
pub use resize::{Options, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use robin_hood::RobinHoodMap;
