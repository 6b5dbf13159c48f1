//! Grayscale PNG export of baked heightmaps and ocean snapshots.

use std::path::Path;

use image::{GrayImage, ImageResult, Luma};

use crate::ocean::OceanGrid;
use crate::terrain::Heightmap;

/// Map `value` from `lo..hi` onto 0..255; a flat range maps to mid-gray
fn to_gray(value: f32, lo: f32, hi: f32) -> u8 {
    if hi - lo <= f32::EPSILON {
        return 128;
    }
    (((value - lo) / (hi - lo)) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Render a heightmap normalized to its own range; row `j` becomes image row `j`
pub fn heightmap_image(heightmap: &Heightmap) -> GrayImage {
    let (lo, hi) = heightmap.min_max();
    let mut img = GrayImage::new(heightmap.width() as u32, heightmap.height() as u32);
    for (j, row) in heightmap.rows().enumerate() {
        for (i, &h) in row.iter().enumerate() {
            img.put_pixel(i as u32, j as u32, Luma([to_gray(h, lo, hi)]));
        }
    }
    img
}

/// Render the grid's vertex heights; lattice `(x, z)` becomes pixel `(x, z)`
pub fn surface_image(grid: &OceanGrid) -> GrayImage {
    let side = grid.dimension() + 1;
    let (lo, hi) = grid.height_range();
    let mut img = GrayImage::new(side as u32, side as u32);
    for x in 0..side {
        for z in 0..side {
            img.put_pixel(x as u32, z as u32, Luma([to_gray(grid.height(x, z), lo, hi)]));
        }
    }
    img
}

pub fn write_heightmap_png(heightmap: &Heightmap, path: impl AsRef<Path>) -> ImageResult<()> {
    heightmap_image(heightmap).save(path)
}

pub fn write_surface_png(grid: &OceanGrid, path: impl AsRef<Path>) -> ImageResult<()> {
    surface_image(grid).save(path)
}
