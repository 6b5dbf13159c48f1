//! Tileable ocean surface: grid mesh, octave heights, seam blending and patch layout.

mod mesh;
mod octave;
mod system;
mod tiles;
mod updater;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Re-export public types
pub use mesh::{grid_index, OceanGrid, Vertex};
pub use octave::{Octave, OctaveStack};
pub use system::OceanSystem;
pub use tiles::{Patch, TileLayout};
pub use updater::HeightFieldUpdater;

/// The one grid buffer every patch renders. Only the owning [`OceanSystem`]
/// takes the write lock.
pub type SharedGrid = Arc<RwLock<OceanGrid>>;

/// Read access to a shared grid. A panic mid-update cannot leave the buffer
/// structurally invalid, so poisoning is ignored.
pub fn read_grid(grid: &SharedGrid) -> RwLockReadGuard<'_, OceanGrid> {
    grid.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_grid(grid: &SharedGrid) -> RwLockWriteGuard<'_, OceanGrid> {
    grid.write().unwrap_or_else(PoisonError::into_inner)
}
