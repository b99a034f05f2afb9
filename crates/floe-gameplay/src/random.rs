//! Random number sources.
//!
//! All gameplay randomness flows through [`RandomSource`] so a simulation can
//! be replayed from a seed or driven by a fixed script in tests.

use std::collections::VecDeque;

/// Source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform value in `[-1, 1)`.
    fn signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

/// Seeded generator backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRandom {
    rng: fastrand::Rng,
}

impl FastRandom {
    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Creates a generator seeded from the environment.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl RandomSource for FastRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.f32()
    }
}

/// Scripted source that replays a fixed sequence, then repeats a fallback.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRandom {
    /// Creates a source that yields `values` in order, then `fallback` forever.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback,
        }
    }

    /// Creates a source that always yields `value`.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new([], value)
    }

    /// Appends a value to the script.
    pub fn push(&mut self, value: f32) {
        self.values.push_back(value);
    }

    /// Number of scripted values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
