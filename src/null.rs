use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ScoreMode;

/// Builds the random number generator of a single (position, acid) cell
///
/// All cells share the run seed but draw from their own ChaCha stream, so the
/// null distributions do not depend on the order in which cells are evaluated.
pub fn cell_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Null distribution of scores under random rankings
///
/// Each trial shuffles a fresh copy of the increments, which keeps the number of
/// hits and misses fixed, and reduces the shuffled walk with `mode`. Scores are
/// returned in permutation order.
pub fn permutation_null<R: Rng + ?Sized>(
    increments: &[f64],
    n_perm: usize,
    mode: ScoreMode,
    rng: &mut R,
) -> Vec<f64> {
    let mut shuffled = increments.to_vec();
    (0..n_perm)
        .map(|_| {
            shuffled.copy_from_slice(increments);
            shuffled.shuffle(&mut *rng);
            mode.reduce_increments(&shuffled)
        })
        .collect()
}
