//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::error::ConfigError;
use crate::host::FixedStepClock;
use crate::params::SceneConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "tidegrid")]
#[command(about = "Tileable procedural ocean surface and terrain heightmap generator", long_about = None)]
pub struct Args {
    /// Scene configuration (TOML); built-in defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of simulation ticks to run
    #[arg(long, value_name = "N", default_value_t = 50)]
    pub ticks: u32,

    /// Fixed simulation step (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = FixedStepClock::DEFAULT_STEP_S)]
    pub step: f32,

    /// Bake configured terrain patches and write one PNG per patch here
    #[arg(long, value_name = "DIR")]
    pub heightmap_dir: Option<PathBuf>,

    /// Write the final ocean height field as a PNG
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,
}

impl Args {
    /// Load the scene from `--config`, or fall back to defaults
    pub fn load_scene(&self) -> Result<SceneConfig, ConfigError> {
        match &self.config {
            Some(path) => {
                info!("Loading scene from {}", path.display());
                SceneConfig::load(path)
            }
            None => {
                info!("No config given, using default scene");
                Ok(SceneConfig::default())
            }
        }
    }

    /// Simulation clock for the configured step
    pub fn clock(&self) -> Result<FixedStepClock, ConfigError> {
        FixedStepClock::checked(self.step)
    }
}
