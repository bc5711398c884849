//! dc-rng: random sources for the dungeon crawl
//!
//! Every random draw in the engine goes through [`RandomSource`], so a game
//! can be replayed exactly from a seed, or scripted draw by draw in tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform randomness.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn random(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    ///
    /// Returns `lo` if `hi < lo`.
    fn randint(&mut self, lo: i32, hi: i32) -> i32;

    /// Choose a uniformly random element from a slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let idx = self.randint(0, items.len() as i32 - 1) as usize;
        items.get(idx)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random(&mut self) -> f64 {
        (**self).random()
    }

    fn randint(&mut self, lo: i32, hi: i32) -> i32 {
        (**self).randint(lo, hi)
    }
}

/// Seeded game RNG
///
/// Wraps ChaCha8Rng so the same seed yields the same game.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRng {
    fn random(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn randint(&mut self, lo: i32, hi: i32) -> i32 {
        if hi < lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

/// Scripted source for deterministic tests.
///
/// Integer and real draws are served from two independent queues in the
/// order they were pushed. Integer values are clamped into the requested
/// range.
///
/// # Panics
///
/// Drawing from an exhausted queue panics; a test that runs out of script
/// has consumed more randomness than it declared.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    ints: VecDeque<i32>,
    reals: VecDeque<f64>,
}

impl ScriptedRng {
    pub fn new(
        ints: impl IntoIterator<Item = i32>,
        reals: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            ints: ints.into_iter().collect(),
            reals: reals.into_iter().collect(),
        }
    }

    pub fn push_int(&mut self, value: i32) {
        self.ints.push_back(value);
    }

    /// Number of unconsumed (integer, real) draws.
    pub fn remaining(&self) -> (usize, usize) {
        (self.ints.len(), self.reals.len())
    }

    pub fn is_exhausted(&self) -> bool {
        self.ints.is_empty() && self.reals.is_empty()
    }
}

impl RandomSource for ScriptedRng {
    fn random(&mut self) -> f64 {
        match self.reals.pop_front() {
            Some(value) => value,
            None => panic!("scripted random source ran out of real draws"),
        }
    }

    fn randint(&mut self, lo: i32, hi: i32) -> i32 {
        match self.ints.pop_front() {
            Some(_) if hi < lo => lo,
            Some(value) => value.clamp(lo, hi),
            None => panic!("scripted random source ran out of integer draws ({lo}..={hi})"),
        }
    }
}
