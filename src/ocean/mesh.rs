//! Ocean grid mesh: lattice vertices, mirrored UVs, and triangle indices.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::ConfigError;

/// Vertex data for ocean mesh (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Flattened buffer index of lattice point `(x, z)` in a grid of `dimension` cells.
///
/// Vertices are stored x-major: every column of `dimension + 1` z values is
/// contiguous. The builder, the updater, and the index buffer all go through
/// this function.
#[inline]
pub fn grid_index(x: usize, z: usize, dimension: usize) -> usize {
    x * (dimension + 1) + z
}

/// Triangle-wave texture coordinate: mirrors every other `uv_scale` span
/// instead of wrapping, so tile edges never show a hard seam.
fn mirrored_uv(coord: usize, uv_scale: f32) -> f32 {
    let u = (coord as f32 / uv_scale) % 2.0;
    if u <= 1.0 {
        u
    } else {
        2.0 - u
    }
}

/// (N+1)×(N+1) lattice surface. Only vertex heights (and normals) change after
/// construction.
#[derive(Debug, Clone)]
pub struct OceanGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    dimension: usize,
}

impl OceanGrid {
    /// Build the flat grid for `dimension` cells per side
    pub fn new(dimension: usize, uv_scale: f32) -> Result<Self, ConfigError> {
        Self::validate_shape(dimension, uv_scale)?;

        let side = dimension + 1;
        let mut vertices = vec![Vertex::default(); side * side];
        for x in 0..=dimension {
            for z in 0..=dimension {
                vertices[grid_index(x, z, dimension)] = Vertex {
                    position: [x as f32, 0.0, z as f32],
                    normal: [0.0, 1.0, 0.0],
                    uv: [mirrored_uv(x, uv_scale), mirrored_uv(z, uv_scale)],
                };
            }
        }

        // Two triangles per cell, wound so the flat surface faces +Y
        let mut indices = Vec::with_capacity(dimension * dimension * 6);
        for x in 0..dimension {
            for z in 0..dimension {
                let corner = |dx: usize, dz: usize| grid_index(x + dx, z + dz, dimension) as u32;
                indices.extend_from_slice(&[
                    corner(0, 0),
                    corner(1, 1),
                    corner(1, 0),
                    corner(0, 0),
                    corner(0, 1),
                    corner(1, 1),
                ]);
            }
        }

        Ok(Self {
            vertices,
            indices,
            dimension,
        })
    }

    /// Check grid parameters without building anything
    pub fn validate_shape(dimension: usize, uv_scale: f32) -> Result<(), ConfigError> {
        validate_dimension(dimension)?;
        if !uv_scale.is_finite() || uv_scale <= 0.0 {
            return Err(ConfigError::InvalidUvScale(uv_scale));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Buffer index of lattice point `(x, z)`
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        grid_index(x, z, self.dimension)
    }

    /// Current height at lattice point `(x, z)`
    pub fn height(&self, x: usize, z: usize) -> f32 {
        self.vertices[self.index(x, z)].position[1]
    }

    pub(crate) fn set_height(&mut self, x: usize, z: usize, y: f32) {
        let i = self.index(x, z);
        self.vertices[i].position[1] = y;
    }

    /// Minimum and maximum vertex height
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .map(|v| v.position[1])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            })
    }

    /// Recompute smooth per-vertex normals from the current positions
    ///
    /// Face normals are accumulated unnormalized, so larger triangles weigh more.
    pub fn recalculate_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = Vec3::from_array(self.vertices[i0].position);
            let v1 = Vec3::from_array(self.vertices[i1].position);
            let v2 = Vec3::from_array(self.vertices[i2].position);
            let face = (v1 - v0).cross(v2 - v0);
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.normalize_or_zero().to_array();
        }
    }
}

/// Reject dimensions that are zero or whose vertex count overflows a u32 index
pub(crate) fn validate_dimension(dimension: usize) -> Result<(), ConfigError> {
    if dimension == 0 {
        return Err(ConfigError::InvalidDimension);
    }
    let fits = dimension
        .checked_add(1)
        .and_then(|side| side.checked_mul(side))
        .is_some_and(|count| count <= u32::MAX as usize);
    if !fits {
        return Err(ConfigError::DimensionTooLarge { dimension });
    }
    Ok(())
}
