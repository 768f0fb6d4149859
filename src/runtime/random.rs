use std::f64::consts::TAU;

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

/// Seeded pseudo-random stream; the same seed always yields the same sequence.
#[derive(Clone, Debug)]
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    /// Stream seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Uniform draw from `[min, max)`; `min` itself when the range is empty.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let t: f64 = self.rng.random();
        t * (max - min) + min
    }

    /// Normal draw via the Box-Muller transform.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // u1 in (0, 1] keeps the logarithm finite
        let u1 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        z * std_dev + mean
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/random.rs"]
mod tests;
