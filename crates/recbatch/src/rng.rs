//! Thread-local randomness for the augmentation transforms.
//!
//! Random transforms (crop offsets, flips, rotation angles) draw from a
//! thread-local generator so that a seeded `BatchIter` produces reproducible
//! augmentations without threading an `&mut rng` through every transform.
//! When no generator has been installed (unseeded iterators, ad-hoc transform
//! use), draws fall back to process entropy.

use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::Rng as _;
use rand::SeedableRng;
use std::cell::RefCell;

thread_local! {
    /// Generator used by random transforms on this thread, if seeded.
    pub static ITER_RNG: RefCell<Option<StdRng>> = RefCell::new(None);
}

/// Installs a deterministic generator for the current thread.
///
/// Seed formula: `base_seed + (epoch << 32)`, so each epoch reshuffles the
/// augmentation stream while staying reproducible for a fixed base seed.
pub fn init_iter_rng(epoch: usize, base_seed: u64) {
    ITER_RNG.with(|rng| {
        let seed = base_seed.wrapping_add((epoch as u64) << 32);
        *rng.borrow_mut() = Some(StdRng::seed_from_u64(seed));
    })
}

/// Draws a bool with probability `p` from the thread generator, or from
/// process entropy if none was installed.
pub fn iter_gen_bool(p: f64) -> bool {
    ITER_RNG.with(|rng| {
        let mut rng_ref = rng.borrow_mut();
        match rng_ref.as_mut() {
            Some(rng) => rng.random_bool(p),
            None => rand::rng().random_bool(p),
        }
    })
}

/// Draws a value uniformly from `range`, same fallback rules as
/// [`iter_gen_bool`].
pub fn iter_gen_range<T, R>(range: R) -> T
where
    T: SampleUniform,
    R: SampleRange<T>,
{
    ITER_RNG.with(|rng| {
        let mut rng_ref = rng.borrow_mut();
        match rng_ref.as_mut() {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    })
}
