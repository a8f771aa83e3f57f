//! Default random word source.
//!
//! Random big-integer generation and Miller-Rabin witness selection only need
//! uniformly distributed 32-bit words, i.e. [`RngCore::next_u32`]. Callers can pass
//! any `RngCore`; when they don't, a thread-local ChaCha generator seeded from OS
//! entropy is used.

use std::cell::RefCell;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

thread_local! {
    static DEFAULT_RNG: RefCell<ChaCha8Rng> = RefCell::new(ChaCha8Rng::from_entropy());
}

/// Runs `f` with the current thread's default random source.
pub fn with_default_rng<T>(f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
    DEFAULT_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Reseeds the current thread's default random source, making it deterministic.
pub fn seed_default_rng(seed: u64) {
    DEFAULT_RNG.with(|rng| *rng.borrow_mut() = ChaCha8Rng::seed_from_u64(seed));
}

/// Draws one 16-bit limb from a word source.
pub(crate) fn next_limb(rng: &mut (impl RngCore + ?Sized)) -> u16 {
    (rng.next_u32() >> 16) as u16
}
