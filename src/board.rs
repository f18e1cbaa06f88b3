//! Board generation: size coercion, value padding and the shuffled layout.
//!
//! Generation is split so each step can be checked on its own: padding is
//! deterministic, the shuffle takes an injected [`RandomIndex`].

use crate::rng::{shuffle, RandomIndex};
use crate::types::Grid;

/// Round `size` down to an odd number so the board has a center cell.
///
/// `0` has no odd number at or below it and becomes `1`.
pub fn coerce_size(size: usize) -> usize {
    if size == 0 {
        1
    } else if size % 2 == 0 {
        size - 1
    } else {
        size
    }
}

/// Extend `pool` to `cell_count` entries by cycling over the original pool
/// from its first entry. A pool that is already long enough is copied as-is.
pub fn pad_values(pool: &[String], cell_count: usize) -> Vec<String> {
    let mut values = pool.to_vec();
    if pool.is_empty() {
        return values;
    }
    let mut i = 0;
    while values.len() < cell_count {
        values.push(pool[i].clone());
        i = (i + 1) % pool.len();
    }
    values
}

/// Shuffle a copy of `values` and lay the first `size²` of them out row-major.
///
/// A short `values` list is padded first; the caller's slice is left
/// untouched. `values` must not be empty.
pub(crate) fn generate_grid<R: RandomIndex + ?Sized>(values: &[String], size: usize, rng: &mut R) -> Grid {
    let mut randomized = pad_values(values, size * size);
    shuffle(&mut randomized, rng);
    randomized.truncate(size * size);
    log::debug!("generated {}x{} grid from {} values", size, size, values.len());
    Grid::from_values(randomized, size)
}
