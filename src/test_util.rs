#![cfg(test)]

// Shared test support: a hasher that maps a u64 key to itself, so
// `key & (capacity - 1)` is the home index and collisions can be staged
// slot by slot.

use core::hash::{BuildHasher, Hasher};

#[derive(Clone, Default)]
pub(crate) struct IdentityBuildHasher;

pub(crate) struct IdentityHasher(u64);

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> IdentityHasher {
        IdentityHasher(0)
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("identity hasher is for u64 keys only");
    }
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}
