//! ProbeSeq: the linear probe sequence over a power-of-two table.

/// Candidate slot sequence for a hash: `hash & mask`, then +1 steps with
/// wraparound. All variants probe identically; the step number is the
/// probe-sequence length (PSL) of that slot.
///
/// The sequence is unbounded; callers terminate on an Empty slot, which
/// the resize threshold guarantees always exists.
pub(crate) struct ProbeSeq {
    index: usize,
    mask: usize,
}

impl ProbeSeq {
    pub(crate) fn new(hash: u64, mask: usize) -> Self {
        Self {
            index: hash as usize & mask,
            mask,
        }
    }

    /// The next candidate slot index.
    pub(crate) fn next(&mut self) -> usize {
        let index = self.index;
        self.index = (self.index + 1) & self.mask;
        index
    }
}

/// Probe distance from a hash's home index to `index`, in probe steps.
pub(crate) fn displacement(hash: u64, index: usize, mask: usize) -> usize {
    index.wrapping_sub(hash as usize) & mask
}
