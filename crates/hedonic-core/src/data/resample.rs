//! Bootstrap resampling of row indices

use rand::Rng;

/// Draw `n_rows` indices with replacement from `0..n_rows`
///
/// Each resample has exactly the same row count as its source partition.
pub fn bootstrap_indices<R: Rng>(n_rows: usize, rng: &mut R) -> Vec<usize> {
    (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
}
