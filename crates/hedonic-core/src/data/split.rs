//! Seeded train/test partition of row indices

use crate::errors::{StatsError, StatsResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split `0..n_rows` into shuffled train and test index sets
///
/// The same seed always produces the same partition.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> StatsResult<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&test_fraction) || test_fraction == 0.0 || test_fraction == 1.0 {
        return Err(StatsError::InvalidTestFraction(test_fraction));
    }
    if n_rows < 2 {
        return Err(StatsError::InsufficientDataMsg(format!(
            "cannot split {n_rows} rows into train and test"
        )));
    }

    let n_test = ((n_rows as f64) * test_fraction).round() as usize;
    let n_test = n_test.clamp(1, n_rows - 1);

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n_rows - n_test);
    Ok((indices, test))
}
