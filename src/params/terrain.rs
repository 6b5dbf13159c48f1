//! Terrain heightmap parameters.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::terrain::{validate_resolution, HeightmapBaker, NoiseScale};

/// Terrain heightmap parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Terrain patch extent along X (world units)
    pub terrain_width: f32,

    /// Terrain patch extent along Z (world units)
    pub terrain_length: f32,

    /// Heightmap columns per patch
    pub pix_width: usize,

    /// Heightmap rows per patch
    pub pix_height: usize,

    /// Perlin noise seed
    pub noise_seed: u32,

    /// Noise layers, summed in order
    pub scales: Vec<NoiseScale>,

    /// World positions of the terrain patches to bake
    pub positions: Vec<Vec3>,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            terrain_width: 1000.0,
            terrain_length: 1000.0,
            pix_width: 256,
            pix_height: 256,
            noise_seed: 0,
            scales: Vec::new(),
            positions: vec![Vec3::ZERO],
        }
    }
}

impl TerrainParams {
    pub fn terrain_size(&self) -> Vec2 {
        Vec2::new(self.terrain_width, self.terrain_length)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.terrain_size();
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(ConfigError::InvalidTerrainSize {
                width: self.terrain_width,
                length: self.terrain_length,
            });
        }
        validate_resolution(self.pix_width, self.pix_height)?;
        for (index, scale) in self.scales.iter().enumerate() {
            scale.validate(index)?;
        }
        Ok(())
    }

    /// Validated baker for these parameters
    pub fn baker(&self) -> Result<HeightmapBaker, ConfigError> {
        self.validate()?;
        HeightmapBaker::new(self.pix_width, self.pix_height, self.scales.clone())
    }
}
