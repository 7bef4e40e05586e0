//! RNG module - random sources for tile spawning
//!
//! Spawning needs two draws: a uniform index over the empty cells and a biased
//! coin deciding between a 2 and a 4. [`TileRng`] is the seam that makes both
//! injectable, so tests and replays can fix the spawn sequence.
//!
//! Provides a simple LCG for deterministic testing and a `fastrand`-backed
//! source for normal play.

use crate::error::GridError;
use crate::types::SPAWN_TWO_PROBABILITY;

/// A source of randomness for tile spawns
pub trait TileRng {
    /// Uniform index in `0..len`. `len` is never 0.
    fn next_index(&mut self, len: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl<R: TileRng + ?Sized> TileRng for &mut R {
    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: TileRng + ?Sized> TileRng for Box<R> {
    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits; the low bits of an LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl TileRng for SimpleRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    fn next_f64(&mut self) -> f64 {
        // 24 high bits fit an f64 mantissa exactly.
        (self.next_u32() >> 8) as f64 / (1u32 << 24) as f64
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// `fastrand`-backed source; the default for interactive play
#[derive(Debug, Clone)]
pub struct FastRng {
    rng: fastrand::Rng,
}

impl FastRng {
    /// Seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl TileRng for FastRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.usize(..len)
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Value distribution for spawned tiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    two_probability: f64,
}

impl SpawnPolicy {
    /// `two_probability` is the chance a spawn is a 2; the rest are 4s.
    pub fn new(two_probability: f64) -> Result<Self, GridError> {
        if !(0.0..=1.0).contains(&two_probability) {
            return Err(GridError::InvalidProbability(two_probability));
        }
        Ok(Self { two_probability })
    }

    /// Draw a tile value
    pub fn draw<R: TileRng + ?Sized>(&self, rng: &mut R) -> u32 {
        if rng.chance(self.two_probability) {
            2
        } else {
            4
        }
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            two_probability: SPAWN_TWO_PROBABILITY,
        }
    }
}
