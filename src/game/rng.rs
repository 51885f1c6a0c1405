//! Injectable random source
//!
//! Every random draw in a match (dice, AI choices, bonus tokens, the opening
//! top/bottom assignment, the final coin-flip) goes through one
//! [`RandomSource`]. Production matches use a seeded ChaCha stream so a seed
//! reproduces a whole match; tests script the exact draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::collections::VecDeque;

/// A source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform integer in `[low, high)`. Callers guarantee `high > low`.
    fn next_in_range(&mut self, low: u32, high: u32) -> u32;

    /// Six-sided die, 1..=6
    fn roll_die(&mut self) -> u32 {
        self.next_in_range(1, 7)
    }

    /// Percentile roll, 0..100
    fn roll_percent(&mut self) -> u32 {
        self.next_in_range(0, 100)
    }

    /// Uniform index into a non-empty slice of length `len`
    fn pick_index(&mut self, len: usize) -> usize {
        self.next_in_range(0, len as u32) as usize
    }

    /// Fair coin
    fn coin_flip(&mut self) -> bool {
        self.next_in_range(0, 2) == 1
    }
}

impl RandomSource for ChaCha12Rng {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        self.gen_range(low..high)
    }
}

/// Seeded production source
pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(ChaCha12Rng::seed_from_u64(seed))
}

/// Unseeded production source
pub fn from_entropy() -> Box<dyn RandomSource> {
    Box::new(ChaCha12Rng::from_entropy())
}

/// A source that replays a fixed sequence of draws
///
/// Each scripted value is returned verbatim when it lies in the requested
/// range and wrapped into the range otherwise. Once the script is exhausted
/// every draw returns the range's lower bound.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u32>,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        ScriptedRandom {
            values: values.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Scripted values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        self.draws += 1;
        match self.values.pop_front() {
            Some(v) if (low..high).contains(&v) => v,
            Some(v) => low + v % (high - low),
            None => low,
        }
    }
}
