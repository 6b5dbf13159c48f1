//! Scene parameters, loaded from TOML and validated once at startup.
//!
//! Nothing in the per-tick path re-checks configuration; everything that could
//! later index out of range is rejected here.

mod ocean;
mod terrain;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Re-export all types
pub use ocean::OceanParams;
pub use terrain::TerrainParams;

/// Complete scene: the tiled ocean plus optional baked terrain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ocean: OceanParams,
    pub terrain: Option<TerrainParams>,
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ocean.validate()?;
        if let Some(terrain) = &self.terrain {
            terrain.validate()?;
        }
        Ok(())
    }
}
