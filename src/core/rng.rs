//! Deterministic random number generation for deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same deck order
//! - **Context streams**: Independent sequences for different purposes
//!
//! ```
//! use rust_duel::core::DuelRng;
//!
//! let mut a = DuelRng::new(42);
//! let mut b = DuelRng::new(42);
//!
//! let mut deck_a = vec![1, 2, 3, 4, 5];
//! let mut deck_b = deck_a.clone();
//! a.shuffle(&mut deck_a);
//! b.shuffle(&mut deck_b);
//!
//! assert_eq!(deck_a, deck_b);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG used by duel setup.
///
/// Uses ChaCha8 for speed while keeping sequences reproducible from a seed.
#[derive(Clone, Debug)]
pub struct DuelRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DuelRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self::new(context_seed)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled(rng: &mut DuelRng) -> Vec<u32> {
        let mut deck: Vec<u32> = (0..40).collect();
        rng.shuffle(&mut deck);
        deck
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = DuelRng::new(42);
        let mut rng2 = DuelRng::new(42);

        for _ in 0..5 {
            assert_eq!(shuffled(&mut rng1), shuffled(&mut rng2));
        }
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(shuffled(&mut DuelRng::new(1)), shuffled(&mut DuelRng::new(2)));
    }

    #[test]
    fn test_context_is_deterministic() {
        let mut ctx1 = DuelRng::new(42).for_context("deck");
        let mut ctx2 = DuelRng::new(42).for_context("deck");
        let mut other = DuelRng::new(42).for_context("extra");

        let deck = shuffled(&mut ctx1);
        assert_eq!(deck, shuffled(&mut ctx2));
        assert_ne!(deck, shuffled(&mut other));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let deck = shuffled(&mut DuelRng::new(7));

        let mut sorted = deck.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..40).collect::<Vec<_>>());
        assert_ne!(deck, sorted);
    }
}
