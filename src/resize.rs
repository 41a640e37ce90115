//! Resize policy: construction options and the grow-and-rehash trigger.

/// Default initial capacity if unspecified.
pub const DEFAULT_CAPACITY: usize = 16;
/// Default load-factor threshold on `(live + tombstones) / capacity`.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Construction-time configuration shared by all map variants.
///
/// `initial_capacity` is rounded up to a power of two so the home index is
/// a mask. `load_factor` must lie in (0, 1): the table grows before it can
/// ever run out of Empty slots.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Options {
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }
}

/// Decides when a map must grow and to what capacity. The threshold is
/// measured against occupied-plus-tombstone slots, so a tombstone-heavy
/// table resizes (and sheds its tombstones) even if few entries are live.
#[derive(Debug)]
pub(crate) struct ResizePolicy {
    load_factor: f64,
    grow_at: usize,
}

impl ResizePolicy {
    /// Validates `options` and returns the policy plus the starting
    /// capacity. Parameter violations are programmer errors.
    pub(crate) fn new(options: Options) -> (Self, usize) {
        assert!(options.initial_capacity >= 1, "capacity must be at least 1");
        assert!(
            options.load_factor > 0.0 && options.load_factor < 1.0,
            "load factor must be in (0, 1)"
        );
        let capacity = options.initial_capacity.next_power_of_two();
        let mut policy = Self {
            load_factor: options.load_factor,
            grow_at: 0,
        };
        policy.rebound(capacity);
        (policy, capacity)
    }

    /// True if a table about to hold `used` occupied-plus-tombstone slots
    /// has crossed the threshold.
    pub(crate) fn should_grow(&self, used: usize) -> bool {
        used > self.grow_at
    }

    pub(crate) fn next_capacity(&self, capacity: usize) -> usize {
        capacity * 2
    }

    /// Recompute the grow threshold after a capacity change. Clamped to
    /// `capacity - 1` so at least one slot stays Empty and probe loops
    /// always terminate.
    pub(crate) fn rebound(&mut self, capacity: usize) {
        self.grow_at = ((capacity as f64 * self.load_factor) as usize).min(capacity - 1);
    }
}
