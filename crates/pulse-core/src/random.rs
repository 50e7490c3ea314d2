//! Injected random choice.
//!
//! Daily affirmations, coping phrases and random ambient sounds all pick one
//! item out of a list. They take a [`Chooser`] so tests and replays can pin
//! the outcome.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Picks an index in `0..len`.
pub trait Chooser {
    /// Returns `None` only when `len == 0`.
    fn choose(&mut self, len: usize) -> Option<usize>;
}

/// Pick an element of `items` with `chooser`.
pub fn pick<'a, T>(chooser: &mut dyn Chooser, items: &'a [T]) -> Option<&'a T> {
    chooser.choose(items.len()).and_then(|i| items.get(i))
}

/// [`Chooser`] backed by a PCG generator.
#[derive(Debug, Clone)]
pub struct RngChooser {
    rng: Mcg128Xsl64,
}

impl RngChooser {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    /// `seeded` when a seed is given, `from_entropy` otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }
}

impl Chooser for RngChooser {
    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

/// Always returns the same position (clamped to the list).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl Chooser for FixedChooser {
    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.0.min(len - 1))
        }
    }
}
