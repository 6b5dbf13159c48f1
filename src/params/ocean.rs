//! Ocean surface parameters.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ocean::{Octave, OceanGrid};

/// Ocean surface parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanParams {
    /// Grid resolution (cells per side; (dimension + 1)^2 vertices)
    pub dimension: usize,

    /// Patch rows (along Z)
    pub patch_rows: usize,

    /// Patch columns (along X)
    pub patch_cols: usize,

    /// Lattice cells per texture span before the UVs mirror
    pub uv_scale: f32,

    /// Perlin noise seed
    pub noise_seed: u32,

    /// Shader name handed to the host with the shared material
    pub shader: String,

    /// Noise layers, summed in order
    pub octaves: Vec<Octave>,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            dimension: 100,
            patch_rows: 1,
            patch_cols: 1,
            uv_scale: 1.0,
            noise_seed: 0,
            shader: "Standard".to_string(),
            octaves: Vec::new(),
        }
    }
}

impl OceanParams {
    /// Validate once at startup; nothing here is re-checked per tick
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Checks dimension and uv_scale without allocating the grid
        OceanGrid::validate_shape(self.dimension, self.uv_scale)?;
        for (index, octave) in self.octaves.iter().enumerate() {
            octave.validate(index)?;
        }
        if self.octaves.is_empty() {
            warn!("Ocean has no octaves; surface will be flat");
        }
        Ok(())
    }
}
