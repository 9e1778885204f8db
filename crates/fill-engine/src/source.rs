//! Random sources.
//!
//! The engine draws every random decision through [`RandomSource`]. Any
//! `rand::Rng` is a source, so tests pass a seeded `StdRng` for
//! reproducibility while the default configuration uses the thread-local
//! generator. [`ZeroSource`] answers every draw with zero and turns the
//! engine into a zero-value filler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws used by the filler engine.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn int_n(&mut self, n: usize) -> usize;

    /// Uniform `i64` across its full range.
    fn int64(&mut self) -> i64;

    /// Uniform `u64` across its full range.
    fn uint64(&mut self) -> u64;

    /// Uniform `f64` in `[0, 1)`.
    fn float64(&mut self) -> f64;

    /// Uniform `f32` in `[0, 1)`.
    ///
    /// Built from the top 24 bits of a `u64` draw so the result is never
    /// rounded up to 1.0.
    fn float32(&mut self) -> f32 {
        (self.uint64() >> 40) as f32 / (1u32 << 24) as f32
    }
}

impl<R: Rng> RandomSource for R {
    fn int_n(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.random_range(0..n)
        }
    }

    fn int64(&mut self) -> i64 {
        self.random()
    }

    fn uint64(&mut self) -> u64 {
        self.random()
    }

    fn float64(&mut self) -> f64 {
        self.random()
    }
}

/// Source whose every draw is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroSource;

impl RandomSource for ZeroSource {
    fn int_n(&mut self, _n: usize) -> usize {
        0
    }

    fn int64(&mut self) -> i64 {
        0
    }

    fn uint64(&mut self) -> u64 {
        0
    }

    fn float64(&mut self) -> f64 {
        0.0
    }

    fn float32(&mut self) -> f32 {
        0.0
    }
}

/// Seeded source for reproducible fills.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
