//! Randomness for laying out a board.
//!
//! Board generation never touches a generator directly; it asks a
//! [`RandomIndex`] for slot numbers while running [`shuffle`]. [`BoardRng`]
//! is the production source. Tests pass a fixed seed or script the picks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Anything that can pick a uniformly random index.
pub trait RandomIndex {
    /// Return a value in `[0, max)`. `max` is always at least 1.
    fn gen_range(&mut self, max: usize) -> usize;
}

/// `SmallRng`-backed source used for real boards.
pub struct BoardRng {
    inner: SmallRng,
}

impl BoardRng {
    /// Seeded from OS entropy; `crypto.getRandomValues` in the browser.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Same seed, same sequence of boards.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for BoardRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIndex for BoardRng {
    #[inline(always)]
    fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}

/// In-place Durstenfeld shuffle: walk from the last index down to 1 and swap
/// each slot with a uniformly chosen slot in `[0, i]`.
pub fn shuffle<T, R: RandomIndex + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(i + 1);
        items.swap(i, j);
    }
}
