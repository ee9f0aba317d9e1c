//! Deterministic scheduler-level RNG.
//!
//! The movement controller itself is deterministic; randomness only enters
//! through the scheduler's optional shuffled update order.  Seeding is mixed
//! with the 64-bit fractional golden ratio so neighbouring seeds diverge.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand::seq::SliceRandom;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG.
///
/// Used only in single-threaded contexts; the scheduler owns exactly one.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed.wrapping_mul(MIXING_CONSTANT)))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
