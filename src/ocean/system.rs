//! High-level ocean system: owns the shared surface and drives it per tick.

use std::sync::{Arc, RwLock};

use log::{debug, info};

use super::mesh::OceanGrid;
use super::octave::OctaveStack;
use super::tiles::{Patch, TileLayout};
use super::updater::HeightFieldUpdater;
use super::{read_grid, write_grid, SharedGrid};
use crate::error::ConfigError;
use crate::host::{Clock, Material, PatchHandle, PlacementSink, SurfaceHandle, SurfaceSink};
use crate::noise::{NoiseSampler, PerlinSampler};
use crate::params::OceanParams;

/// Root ocean surface: the single writer of the shared grid
pub struct OceanSystem<N = PerlinSampler> {
    grid: SharedGrid,
    material: Arc<Material>,
    updater: HeightFieldUpdater<N>,
    layout: TileLayout,
    surface: Option<SurfaceHandle>,
    patches: Vec<Patch>,
}

impl OceanSystem<PerlinSampler> {
    /// Create ocean system with Perlin noise seeded from `params`
    pub fn from_params(params: &OceanParams) -> Result<Self, ConfigError> {
        Self::new(params, PerlinSampler::new(params.noise_seed))
    }
}

impl<N: NoiseSampler> OceanSystem<N> {
    /// Validate `params` and build the flat grid
    pub fn new(params: &OceanParams, noise: N) -> Result<Self, ConfigError> {
        params.validate()?;

        let grid = OceanGrid::new(params.dimension, params.uv_scale)?;
        let octaves = OctaveStack::new(params.octaves.clone())?;
        let layout = TileLayout::new(params.patch_rows, params.patch_cols, params.dimension)?;

        info!(
            "Ocean grid: {} cells per side, {} vertices, {} octave(s)",
            params.dimension,
            grid.vertices.len(),
            octaves.octaves().len()
        );

        Ok(Self {
            grid: Arc::new(RwLock::new(grid)),
            material: Arc::new(Material {
                shader: params.shader.clone(),
            }),
            updater: HeightFieldUpdater::new(octaves, noise),
            layout,
            surface: None,
            patches: Vec::new(),
        })
    }

    /// Register the root surface and lay out all child patches under `root`
    ///
    /// The root node renders the surface too when given.
    pub fn setup<H: SurfaceSink + PlacementSink + ?Sized>(
        &mut self,
        host: &mut H,
        root: Option<PatchHandle>,
    ) -> SurfaceHandle {
        let surface = self.create_surface(host);
        if let Some(root) = root {
            host.attach_surface(root, surface);
        }
        self.create_child_oceans(host, root, surface);
        surface
    }

    /// Hand the grid buffers and material to the host (once)
    pub fn create_surface<S: SurfaceSink + ?Sized>(&mut self, sink: &mut S) -> SurfaceHandle {
        if let Some(surface) = self.surface {
            return surface;
        }
        let surface = sink.create_surface(&read_grid(&self.grid), &self.material);
        self.surface = Some(surface);
        surface
    }

    /// Place the configured patch grid, each referencing `surface`
    pub fn create_child_oceans<P: PlacementSink + ?Sized>(
        &mut self,
        sink: &mut P,
        parent: Option<PatchHandle>,
        surface: SurfaceHandle,
    ) -> &[Patch] {
        self.patches = self
            .layout
            .instantiate(sink, parent, surface, &self.grid, &self.material);
        &self.patches
    }

    /// Recompute heights at `time_s` without publishing
    pub fn update(&mut self, time_s: f32) {
        let mut grid = write_grid(&self.grid);
        self.recompute(&mut grid, time_s);
    }

    /// One simulation tick: sample the clock, recompute, publish to the host
    ///
    /// The write lock is held until the host has the new vertices, so patch
    /// readers never see a partially updated buffer.
    pub fn tick<C: Clock + ?Sized, S: SurfaceSink + ?Sized>(&mut self, clock: &C, sink: &mut S) {
        let time_s = clock.now();
        let mut grid = write_grid(&self.grid);
        self.recompute(&mut grid, time_s);

        if let Some(surface) = self.surface {
            sink.update_vertices(surface, &grid.vertices);
            sink.recalculate_normals(surface);
        }
    }

    fn recompute(&self, grid: &mut OceanGrid, time_s: f32) {
        self.updater.update(grid, time_s);
        if log::log_enabled!(log::Level::Debug) {
            let (lo, hi) = grid.height_range();
            debug!("Ocean tick t={:.3}s heights {:.3}..{:.3}", time_s, lo, hi);
        }
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    pub fn updater(&self) -> &HeightFieldUpdater<N> {
        &self.updater
    }
}
