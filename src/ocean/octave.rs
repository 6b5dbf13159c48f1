//! Layered noise octaves summed into a single surface height.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::noise::NoiseSampler;

/// One noise layer of the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    /// Spatial frequency per axis (lattice units are divided by the grid dimension)
    pub scale: Vec2,

    /// Scroll velocity per axis; its magnitude drives the phase in oscillating mode
    #[serde(default)]
    pub speed: Vec2,

    /// Amplitude. Negative values invert the layer.
    pub height: f32,

    /// Oscillate in place (cosine of the sampled phase) instead of scrolling
    #[serde(default)]
    pub alternate: bool,
}

impl Octave {
    /// Scrolling layer: noise advected horizontally over time
    pub fn scrolling(scale: Vec2, speed: Vec2, height: f32) -> Self {
        Self {
            scale,
            speed,
            height,
            alternate: false,
        }
    }

    /// Oscillating layer: a fixed noise phase field rippling in time
    pub fn oscillating(scale: Vec2, speed: Vec2, height: f32) -> Self {
        Self {
            scale,
            speed,
            height,
            alternate: true,
        }
    }

    /// Contribution of this layer at lattice point `(x, z)`
    pub fn contribution<N: NoiseSampler>(
        &self,
        noise: &N,
        x: f32,
        z: f32,
        dimension: f32,
        time_s: f32,
    ) -> f32 {
        if self.alternate {
            let phase = noise.sample(x * self.scale.x / dimension, z * self.scale.y / dimension);
            (phase * TAU + self.speed.length() * time_s).cos() * self.height
        } else {
            let sample = noise.sample(
                (x * self.scale.x + time_s * self.speed.x) / dimension,
                (z * self.scale.y + time_s * self.speed.y) / dimension,
            );
            (sample - 0.5) * self.height
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedOctave {
            index,
            reason: reason.to_string(),
        };
        if !self.scale.is_finite() {
            return Err(malformed("scale must be finite"));
        }
        if !self.speed.is_finite() {
            return Err(malformed("speed must be finite"));
        }
        if !self.height.is_finite() {
            return Err(malformed("height must be finite"));
        }
        Ok(())
    }
}

/// Ordered octaves combined by summation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OctaveStack {
    octaves: Vec<Octave>,
}

impl OctaveStack {
    /// Build a stack, rejecting octaves with non-finite components
    pub fn new(octaves: Vec<Octave>) -> Result<Self, ConfigError> {
        for (index, octave) in octaves.iter().enumerate() {
            octave.validate(index)?;
        }
        Ok(Self { octaves })
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    pub fn is_empty(&self) -> bool {
        self.octaves.is_empty()
    }

    /// Surface height at lattice point `(x, z)` for a grid of `dimension` cells
    ///
    /// Pure in all of its inputs; an empty stack is a flat plane at 0.
    pub fn height<N: NoiseSampler>(
        &self,
        noise: &N,
        x: usize,
        z: usize,
        dimension: usize,
        time_s: f32,
    ) -> f32 {
        let (x, z, dimension) = (x as f32, z as f32, dimension as f32);
        self.octaves
            .iter()
            .map(|octave| octave.contribution(noise, x, z, dimension, time_s))
            .sum()
    }
}
