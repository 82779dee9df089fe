//! Deterministic random number generation for puzzle generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical puzzles
//! - **Injectable**: Engines draw through the `RandomSource` trait, so tests
//!   can substitute a `ScriptedRng` and assert exact generated values
//! - **Context streams**: Independent sequences per game from one master seed
//!
//! ## Usage
//!
//! ```
//! use puzzle_arcade::core::{GameRng, RandomSource};
//!
//! let master = GameRng::new(42);
//!
//! // Each game draws from its own stream
//! let mut knapsack = master.for_context("knapsack");
//! let mut nim = master.for_context("nim");
//!
//! let weight = knapsack.gen_range_inclusive(5..=25);
//! assert!((5..=25).contains(&weight));
//! let _ = nim.gen_bool(0.25);
//! ```

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness consumed by puzzle generation.
///
/// Engines never touch an ambient generator; they own a `RandomSource` and
/// draw every random decision through it.
pub trait RandomSource {
    /// Uniform integer in the inclusive range.
    fn gen_range_inclusive(&mut self, range: RangeInclusive<u32>) -> u32;

    /// `true` with the given probability.
    fn gen_bool(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn gen_index(&mut self, len: usize) -> usize;

    /// Choose an index with probability proportional to its integer weight.
    ///
    /// Returns `None` if weights are empty or all zero.
    fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }

        let mut threshold = self.gen_range_inclusive(1..=total);
        for (i, &weight) in weights.iter().enumerate() {
            if threshold <= weight {
                return Some(i);
            }
            threshold -= weight;
        }

        // Unreachable for in-range draws; scripted sources may overshoot
        weights.iter().rposition(|&w| w > 0)
    }
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
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
        Self::new(hasher.finish())
    }
}

impl RandomSource for GameRng {
    fn gen_range_inclusive(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

/// Replays a fixed list of values, for tests and reproductions.
///
/// - `gen_range_inclusive` returns the next value clamped into the range
/// - `gen_bool` returns `true` when the next value is non-zero
/// - `gen_index` returns the next value modulo `len`
///
/// Once the script is exhausted every call yields the lowest legal answer.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: VecDeque<u32>,
}

impl ScriptedRng {
    /// Create a source that replays `values` in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Append more values to the script.
    pub fn extend(&mut self, values: impl IntoIterator<Item = u32>) {
        self.values.extend(values);
    }

    /// Number of unconsumed values.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRng {
    fn gen_range_inclusive(&mut self, range: RangeInclusive<u32>) -> u32 {
        let (lo, hi) = (*range.start(), *range.end());
        self.values.pop_front().map_or(lo, |v| v.clamp(lo, hi))
    }

    fn gen_bool(&mut self, _probability: f64) -> bool {
        self.values.pop_front().is_some_and(|v| v != 0)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        self.values
            .pop_front()
            .map_or(0, |v| v as usize % len.max(1))
    }
}
