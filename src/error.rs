//! Configuration errors, raised once at startup before the first tick.

use thiserror::Error;

/// Everything that can be wrong with a scene before it starts simulating.
///
/// The per-tick path never fails; all of these are detected eagerly.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimension must be > 0")]
    InvalidDimension,

    #[error("grid dimension {dimension} produces more vertices than a u32 index can address")]
    DimensionTooLarge { dimension: usize },

    #[error("uv scale must be finite and > 0, got {0}")]
    InvalidUvScale(f32),

    #[error("octave {index} is malformed: {reason}")]
    MalformedOctave { index: usize, reason: String },

    #[error("heightmap resolution must be > 0, got {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("heightmap resolution {width}x{height} has more samples than fit in memory")]
    ResolutionTooLarge { width: usize, height: usize },

    #[error("patch layout {rows}x{cols} has more patches than can be counted")]
    LayoutTooLarge { rows: usize, cols: usize },

    #[error("simulation step must be finite and > 0, got {0}")]
    InvalidStep(f32),

    #[error("terrain size must be finite and > 0, got {width}x{length}")]
    InvalidTerrainSize { width: f32, length: f32 },

    #[error("noise scale {index} is malformed: {reason}")]
    MalformedScale { index: usize, reason: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
