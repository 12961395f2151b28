//! Random number source abstraction
//!
//! Draws, decoys, tick pitches and particle placement all pull from a
//! `NumberSource` so tests and the headless simulator can supply a seeded or
//! scripted sequence.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait NumberSource {
    /// Random `u32` in `[min, max]` inclusive
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Random `f64` in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// Random `f64` in `[min, max)`
    fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Production source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NumberSource for SeededSource {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
