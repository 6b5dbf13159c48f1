//! Tidegrid library - Tileable procedural ocean surfaces and baked terrain heightmaps

pub mod cli;
pub mod error;
pub mod export;
pub mod host;
pub mod noise;
pub mod ocean;
pub mod params;
pub mod terrain;
