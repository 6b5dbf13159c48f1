//! Coherent noise for surface heights.
//!
//! Everything in the crate samples noise through [`NoiseSampler`], so hosts and
//! tests can swap the field without touching the height math.

use noise::{NoiseFn, Perlin};

/// A deterministic, continuous 2D noise field with values in `[0, 1]`.
pub trait NoiseSampler {
    fn sample(&self, x: f32, y: f32) -> f32;
}

/// Seeded Perlin noise, range-normalized into `[0, 1]`
#[derive(Clone)]
pub struct PerlinSampler {
    perlin: Perlin,
}

impl PerlinSampler {
    /// Create new sampler with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for PerlinSampler {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSampler for PerlinSampler {
    fn sample(&self, x: f32, y: f32) -> f32 {
        let raw = self.perlin.get([x as f64, y as f64]) as f32;
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
