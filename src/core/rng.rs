// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-task random stream. Never shared between threads: every unit of
/// render work builds its own from a seed.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seed for the pixel `(x, y)` of a render seeded with `seed`.
    pub fn pixel_seed(seed: u64, x: usize, y: usize) -> u64 {
        let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
        for v in [x as u64, y as u64] {
            h = (h ^ v).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            h ^= h >> 31;
        }
        h
    }

    /// Uniform in `[0, 1)`.
    pub fn next_float(&mut self) -> Float {
        self.rng.gen::<Float>()
    }

    pub fn next_2d(&mut self) -> Vector2f {
        Vector2f::new(self.next_float(), self.next_float())
    }

    /// Uniform in `[0, n)`; `n` must be positive.
    pub fn next_index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.gen::<bool>()
    }
}
