//! Patch layout: many placed copies of one shared surface.

use std::sync::{Arc, RwLockReadGuard};

use glam::Vec3;
use log::info;

use super::mesh::{validate_dimension, OceanGrid};
use super::{read_grid, SharedGrid};
use crate::error::ConfigError;
use crate::host::{Material, PatchHandle, PlacementSink, SurfaceHandle};

/// One placed instance of the shared surface
///
/// Holds only its placement plus handles to the shared grid and material;
/// it never writes to the grid.
#[derive(Debug, Clone)]
pub struct Patch {
    pub row: usize,
    pub col: usize,
    /// Centering node under the layout's parent
    pub pivot: PatchHandle,
    /// Surface-bearing node under `pivot`
    pub handle: PatchHandle,
    origin: Vec3,
    pivot_offset: Vec3,
    surface_offset: Vec3,
    grid: SharedGrid,
    material: Arc<Material>,
}

impl Patch {
    /// Offset from the parent container, before centering
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Offset of the rendered surface from the parent container
    pub fn world_offset(&self) -> Vec3 {
        self.origin + self.pivot_offset + self.surface_offset
    }

    /// Read the shared grid (blocks while a tick is being computed)
    pub fn grid(&self) -> RwLockReadGuard<'_, OceanGrid> {
        read_grid(&self.grid)
    }

    pub fn shares_grid_with(&self, other: &Patch) -> bool {
        Arc::ptr_eq(&self.grid, &other.grid)
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// `rows × cols` arrangement of patches, one grid dimension apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    rows: usize,
    cols: usize,
    dimension: usize,
}

impl TileLayout {
    pub fn new(rows: usize, cols: usize, dimension: usize) -> Result<Self, ConfigError> {
        validate_dimension(dimension)?;
        if rows.checked_mul(cols).is_none() {
            return Err(ConfigError::LayoutTooLarge { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uncentered offset of patch `(row, col)`; columns run along X, rows along Z
    pub fn origin(&self, row: usize, col: usize) -> Vec3 {
        let d = self.dimension as f32;
        Vec3::new(col as f32 * d, 0.0, row as f32 * d)
    }

    /// Pivot centering term (integer half dimension)
    fn pivot_offset(&self) -> Vec3 {
        let half = (self.dimension / 2) as f32;
        Vec3::new(half, 0.0, half)
    }

    /// Surface offset inside the pivot (exact half dimension)
    fn surface_offset(&self) -> Vec3 {
        let half = self.dimension as f32 / 2.0;
        Vec3::new(-half, 0.0, -half)
    }

    /// Place every patch under `parent` and attach the shared surface to each
    pub fn instantiate<P: PlacementSink + ?Sized>(
        &self,
        sink: &mut P,
        parent: Option<PatchHandle>,
        surface: SurfaceHandle,
        grid: &SharedGrid,
        material: &Arc<Material>,
    ) -> Vec<Patch> {
        let (pivot_offset, surface_offset) = (self.pivot_offset(), self.surface_offset());
        let mut patches = Vec::with_capacity(self.len());

        for row in 0..self.rows {
            for col in 0..self.cols {
                let origin = self.origin(row, col);
                let pivot = sink.place_patch(parent, origin + pivot_offset);
                let handle = sink.place_patch(Some(pivot), surface_offset);
                sink.attach_surface(handle, surface);

                patches.push(Patch {
                    row,
                    col,
                    pivot,
                    handle,
                    origin,
                    pivot_offset,
                    surface_offset,
                    grid: Arc::clone(grid),
                    material: Arc::clone(material),
                });
            }
        }

        info!(
            "Placed {}x{} ocean patches ({} total)",
            self.rows,
            self.cols,
            patches.len()
        );
        patches
    }
}
