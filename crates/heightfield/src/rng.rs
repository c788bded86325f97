//! Seeded, call-local randomness.
//!
//! There is no process-wide generator to save and restore: each terrain call
//! owns a `StdRng` built here and threads it through the generator. A seeded
//! call can therefore never disturb randomness observed elsewhere, on any exit
//! path, and concurrent calls need no locking.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generator for one terrain call. `None` seeds from OS entropy.
pub fn terrain_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs `body` with a generator seeded from `seed`.
///
/// Two calls with the same `Some(seed)` see identical random streams. With
/// `None` the stream is unseeded and nothing is reproducible.
pub fn with_seed<T>(seed: Option<u64>, body: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut rng = terrain_rng(seed);
    body(&mut rng)
}

/// Derives a per-item seed from a pool seed, so item `i` gets the same terrain
/// no matter which other items are generated alongside it.
#[inline]
pub fn derive_seed(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index)
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(index.wrapping_mul(0x6c078965_u64))
        .rotate_right(32)
}
