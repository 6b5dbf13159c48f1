//! Terrain heightmap baking.
//!
//! Each terrain patch samples its own window of one shared noise field. Windows
//! are aligned from the patch's world position, so neighbouring heightmaps
//! continue each other without any blending.

use glam::{Vec2, Vec3};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::host::{PatchHandle, TerrainSink};
use crate::noise::NoiseSampler;

/// One noise layer of a heightmap: sampled at `frequency`, weighted `1 / divisor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseScale {
    pub frequency: f32,
    pub divisor: f32,
}

impl NoiseScale {
    pub fn new(frequency: f32, divisor: f32) -> Self {
        Self { frequency, divisor }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedScale {
            index,
            reason: reason.to_string(),
        };
        if !self.frequency.is_finite() {
            return Err(malformed("frequency must be finite"));
        }
        if !self.divisor.is_finite() || self.divisor == 0.0 {
            return Err(malformed("divisor must be finite and non-zero"));
        }
        Ok(())
    }
}

/// Row-major `[height][width]` grid of elevation samples
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Heightmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at row `j`, column `i`
    pub fn get(&self, j: usize, i: usize) -> f32 {
        assert!(i < self.width, "column {} out of range for width {}", i, self.width);
        self.data[j * self.width + i]
    }

    /// Rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Owned `[height][width]` copy for consumers that want nested rows
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.rows().map(<[f32]>::to_vec).collect()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}

/// Reject empty resolutions and ones whose sample count overflows `usize`
pub(crate) fn validate_resolution(width: usize, height: usize) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidResolution { width, height });
    }
    if width.checked_mul(height).is_none() {
        return Err(ConfigError::ResolutionTooLarge { width, height });
    }
    Ok(())
}

/// A terrain object in the host scene
#[derive(Debug, Clone, Copy)]
pub struct TerrainPatch {
    pub handle: PatchHandle,
    pub position: Vec3,
}

/// Samples summed noise scales into fixed-resolution heightmaps
#[derive(Debug, Clone)]
pub struct HeightmapBaker {
    pix_width: usize,
    pix_height: usize,
    scales: Vec<NoiseScale>,
}

impl HeightmapBaker {
    pub fn new(
        pix_width: usize,
        pix_height: usize,
        scales: Vec<NoiseScale>,
    ) -> Result<Self, ConfigError> {
        validate_resolution(pix_width, pix_height)?;
        for (index, scale) in scales.iter().enumerate() {
            scale.validate(index)?;
        }
        if scales.is_empty() {
            warn!("No noise scales configured; heightmaps will be flat");
        }
        Ok(Self {
            pix_width,
            pix_height,
            scales,
        })
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.pix_width, self.pix_height)
    }

    /// Sample offset (in pixels) for a patch at world `position`
    ///
    /// A patch one terrain size over starts on the last pixel of its
    /// neighbour, so the shared edge samples identical noise.
    pub fn patch_offset(&self, position: Vec3, terrain_size: Vec2) -> Vec2 {
        let (w, h) = (self.pix_width as f32, self.pix_height as f32);
        Vec2::new(
            position.x / terrain_size.x * w - position.x / terrain_size.x,
            position.z / terrain_size.y * h - position.z / terrain_size.y,
        )
    }

    /// Bake one heightmap whose sample window starts at `offset` pixels
    pub fn bake<N: NoiseSampler>(&self, noise: &N, offset: Vec2) -> Heightmap {
        let mut heightmap = Heightmap::new(self.pix_width, self.pix_height);
        self.bake_into(noise, offset, &mut heightmap);
        heightmap
    }

    /// Rebuild `heightmap` in place; it is resized to this baker's resolution
    pub fn bake_into<N: NoiseSampler>(&self, noise: &N, offset: Vec2, heightmap: &mut Heightmap) {
        let (w, h) = (self.pix_width as f32, self.pix_height as f32);
        heightmap.width = self.pix_width;
        heightmap.height = self.pix_height;
        heightmap.data.clear();
        heightmap.data.reserve(self.pix_width * self.pix_height);

        for j in 0..self.pix_height {
            let row = (offset.y + j as f32) / h;
            for i in 0..self.pix_width {
                let col = (offset.x + i as f32) / w;
                let value = self.scales.iter().fold(0.0, |acc, scale| {
                    acc + noise.sample(row * scale.frequency, col * scale.frequency)
                        / scale.divisor
                });
                heightmap.data.push(value);
            }
        }
    }

    /// Bake every patch independently and hand each result to `sink`
    pub fn bake_patches<N: NoiseSampler, S: TerrainSink + ?Sized>(
        &self,
        noise: &N,
        terrain_size: Vec2,
        patches: &[TerrainPatch],
        sink: &mut S,
    ) {
        for patch in patches {
            let offset = self.patch_offset(patch.position, terrain_size);
            let heightmap = self.bake(noise, offset);
            sink.set_heights(patch.handle, 0, 0, heightmap);
        }
        info!(
            "Baked {} terrain patch(es) at {}x{}",
            patches.len(),
            self.pix_width,
            self.pix_height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::noise::PerlinSampler;

    #[test]
    fn test_shape() {
        let baker = HeightmapBaker::new(7, 3, vec![NoiseScale::new(2.0, 1.0)]).unwrap();
        let map = baker.bake(&PerlinSampler::default(), Vec2::ZERO);
        assert_eq!((map.width(), map.height()), (7, 3));
        let rows = map.to_rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    fn test_single_scale_is_raw_sample() {
        let noise = PerlinSampler::new(3);
        let freq = 4.0;
        let offset = Vec2::new(12.0, 5.0);
        let baker = HeightmapBaker::new(16, 8, vec![NoiseScale::new(freq, 1.0)]).unwrap();
        let map = baker.bake(&noise, offset);
        for j in 0..8 {
            for i in 0..16 {
                let expected = noise.sample(
                    (offset.y + j as f32) / 8.0 * freq,
                    (offset.x + i as f32) / 16.0 * freq,
                );
                assert_eq!(map.get(j, i), expected);
            }
        }
    }

    #[test]
    fn test_scales_accumulate_weighted() {
        let noise = PerlinSampler::new(6);
        let coarse = NoiseScale::new(2.0, 1.0);
        let fine = NoiseScale::new(9.0, 4.0);
        let both = HeightmapBaker::new(10, 10, vec![coarse, fine]).unwrap();
        let a = HeightmapBaker::new(10, 10, vec![coarse]).unwrap();
        let b = HeightmapBaker::new(10, 10, vec![NoiseScale::new(9.0, 1.0)]).unwrap();

        let (mb, ma, mf) = (
            both.bake(&noise, Vec2::ZERO),
            a.bake(&noise, Vec2::ZERO),
            b.bake(&noise, Vec2::ZERO),
        );
        for (k, &h) in mb.as_slice().iter().enumerate() {
            let expected = ma.as_slice()[k] + mf.as_slice()[k] / 4.0;
            assert!((h - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_scales_bake_zero() {
        let baker = HeightmapBaker::new(4, 4, Vec::new()).unwrap();
        let map = baker.bake(&PerlinSampler::default(), Vec2::new(3.0, 3.0));
        assert!(map.as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_neighbour_patches_share_edge() {
        let noise = PerlinSampler::new(10);
        let baker = HeightmapBaker::new(256, 256, vec![NoiseScale::new(3.0, 1.0)]).unwrap();
        let size = Vec2::new(1000.0, 1000.0);

        let west = baker.bake(&noise, baker.patch_offset(Vec3::ZERO, size));
        let east_offset = baker.patch_offset(Vec3::new(1000.0, 0.0, 0.0), size);
        assert_eq!(east_offset, Vec2::new(255.0, 0.0));
        let east = baker.bake(&noise, east_offset);

        for j in 0..256 {
            assert_eq!(west.get(j, 255), east.get(j, 0));
        }
    }

    #[test]
    fn test_bake_patches_hands_off_each_map() {
        let mut host = RecordingHost::new();
        let baker = HeightmapBaker::new(8, 8, vec![NoiseScale::new(1.0, 2.0)]).unwrap();
        let patches = [
            TerrainPatch {
                handle: PatchHandle(0),
                position: Vec3::ZERO,
            },
            TerrainPatch {
                handle: PatchHandle(1),
                position: Vec3::new(0.0, 0.0, 1000.0),
            },
        ];
        baker.bake_patches(
            &PerlinSampler::default(),
            Vec2::splat(1000.0),
            &patches,
            &mut host,
        );
        assert_eq!(host.heightmaps.len(), 2);
        assert_eq!(host.heightmaps[1].0, PatchHandle(1));
        assert_ne!(host.heightmaps[0].1, host.heightmaps[1].1);
    }

    #[test]
    fn test_bake_into_resizes() {
        let baker = HeightmapBaker::new(5, 2, vec![NoiseScale::new(1.0, 1.0)]).unwrap();
        let mut map = Heightmap::new(1, 1);
        baker.bake_into(&PerlinSampler::default(), Vec2::ZERO, &mut map);
        assert_eq!((map.width(), map.height(), map.as_slice().len()), (5, 2, 10));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(matches!(
            HeightmapBaker::new(0, 16, Vec::new()),
            Err(ConfigError::InvalidResolution { .. })
        ));
        assert!(matches!(
            HeightmapBaker::new(16, 16, vec![NoiseScale::new(1.0, 0.0)]),
            Err(ConfigError::MalformedScale { index: 0, .. })
        ));
        assert!(matches!(
            HeightmapBaker::new(16, 16, vec![NoiseScale::new(1.0, 1.0), NoiseScale::new(f32::INFINITY, 1.0)]),
            Err(ConfigError::MalformedScale { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_overflowing_resolution() {
        let side = usize::MAX / 2 + 1;
        assert!(matches!(
            HeightmapBaker::new(side, 2, Vec::new()),
            Err(ConfigError::ResolutionTooLarge { height: 2, .. })
        ));
        assert!(HeightmapBaker::new(usize::MAX, 1, Vec::new()).is_ok());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_rejects_column_past_width() {
        let map = Heightmap::new(4, 2);
        map.get(0, 4);
    }
}
