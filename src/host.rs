//! Narrow interfaces to the host engine, plus an in-memory host.
//!
//! The core only ever pushes data out through these traits; it never reads
//! anything back from the host.

use glam::Vec3;
use log::trace;

use crate::error::ConfigError;
use crate::ocean::{OceanGrid, Vertex};
use crate::terrain::Heightmap;

/// Host-side renderable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u32);

/// Host-side placed object (scene-graph node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchHandle(pub u32);

/// Surface material shared by every patch
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shader: String,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shader: "Standard".to_string(),
        }
    }
}

/// Receives renderable surfaces and their per-tick vertex updates
pub trait SurfaceSink {
    /// Register the grid's vertex, index and UV buffers with `material`
    fn create_surface(&mut self, grid: &OceanGrid, material: &Material) -> SurfaceHandle;

    /// Replace the surface's vertex buffer
    fn update_vertices(&mut self, handle: SurfaceHandle, vertices: &[Vertex]);

    /// Called after every vertex update. Vertices already carry normals, so
    /// hosts only override this if they derive their own.
    fn recalculate_normals(&mut self, _handle: SurfaceHandle) {}
}

/// Scene graph placement
pub trait PlacementSink {
    /// Create a node under `parent` (the scene root when `None`) at local `offset`
    fn place_patch(&mut self, parent: Option<PatchHandle>, offset: Vec3) -> PatchHandle;

    fn attach_surface(&mut self, patch: PatchHandle, surface: SurfaceHandle);
}

/// Receives baked terrain heightmaps
pub trait TerrainSink {
    fn set_heights(&mut self, patch: PatchHandle, origin_x: usize, origin_z: usize, heights: Heightmap);
}

/// Monotonic simulation time in seconds
pub trait Clock {
    fn now(&self) -> f32;
}

/// Fixed-step simulation clock; time is `ticks * step_s`
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_s: f32,
    ticks: u64,
}

impl FixedStepClock {
    /// Default host fixed step (50 Hz)
    pub const DEFAULT_STEP_S: f32 = 0.02;

    pub fn new(step_s: f32) -> Self {
        Self { step_s, ticks: 0 }
    }

    /// Like [`FixedStepClock::new`], but rejects steps that would stall or
    /// reverse time
    pub fn checked(step_s: f32) -> Result<Self, ConfigError> {
        if !step_s.is_finite() || step_s <= 0.0 {
            return Err(ConfigError::InvalidStep(step_s));
        }
        Ok(Self::new(step_s))
    }

    /// Move forward one step
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_S)
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> f32 {
        (self.ticks as f64 * self.step_s as f64) as f32
    }
}

/// A node created through [`PlacementSink::place_patch`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub parent: Option<PatchHandle>,
    pub offset: Vec3,
    pub surface: Option<SurfaceHandle>,
}

impl PlacedNode {
    /// Node offset composed with every ancestor's offset
    pub fn world_offset(&self, host: &RecordingHost) -> Vec3 {
        let mut offset = self.offset;
        let mut parent = self.parent;
        while let Some(handle) = parent {
            let node = &host.nodes[handle.0 as usize];
            offset += node.offset;
            parent = node.parent;
        }
        offset
    }
}

/// A surface registered through [`SurfaceSink::create_surface`]
#[derive(Debug, Clone)]
pub struct RecordedSurface {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    pub updates: usize,
}

/// In-memory host that keeps the latest state of everything it is handed
///
/// Stands in for a real engine in the CLI and in tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub surfaces: Vec<RecordedSurface>,
    pub nodes: Vec<PlacedNode>,
    pub heightmaps: Vec<(PatchHandle, Heightmap)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self, handle: SurfaceHandle) -> Option<&RecordedSurface> {
        self.surfaces.get(handle.0 as usize)
    }

    pub fn node(&self, handle: PatchHandle) -> Option<&PlacedNode> {
        self.nodes.get(handle.0 as usize)
    }
}

impl SurfaceSink for RecordingHost {
    fn create_surface(&mut self, grid: &OceanGrid, material: &Material) -> SurfaceHandle {
        let handle = SurfaceHandle(self.surfaces.len() as u32);
        trace!(
            "create_surface {:?}: {} vertices, {} indices",
            handle,
            grid.vertices.len(),
            grid.indices.len()
        );
        self.surfaces.push(RecordedSurface {
            vertices: grid.vertices.clone(),
            indices: grid.indices.clone(),
            material: material.clone(),
            updates: 0,
        });
        handle
    }

    fn update_vertices(&mut self, handle: SurfaceHandle, vertices: &[Vertex]) {
        trace!("update_vertices {:?}", handle);
        if let Some(surface) = self.surfaces.get_mut(handle.0 as usize) {
            surface.vertices.clear();
            surface.vertices.extend_from_slice(vertices);
            surface.updates += 1;
        }
    }
}

impl PlacementSink for RecordingHost {
    fn place_patch(&mut self, parent: Option<PatchHandle>, offset: Vec3) -> PatchHandle {
        let handle = PatchHandle(self.nodes.len() as u32);
        trace!("place_patch {:?} under {:?} at {}", handle, parent, offset);
        self.nodes.push(PlacedNode {
            parent,
            offset,
            surface: None,
        });
        handle
    }

    fn attach_surface(&mut self, patch: PatchHandle, surface: SurfaceHandle) {
        trace!("attach_surface {:?} -> {:?}", surface, patch);
        if let Some(node) = self.nodes.get_mut(patch.0 as usize) {
            node.surface = Some(surface);
        }
    }
}

impl TerrainSink for RecordingHost {
    fn set_heights(&mut self, patch: PatchHandle, origin_x: usize, origin_z: usize, heights: Heightmap) {
        trace!(
            "set_heights {:?} at ({}, {}): {}x{}",
            patch,
            origin_x,
            origin_z,
            heights.width(),
            heights.height()
        );
        self.heightmaps.push((patch, heights));
    }
}
