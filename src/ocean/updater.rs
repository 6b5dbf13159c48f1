//! Per-tick height recompute with seam blending between adjacent tiles.

use crate::noise::NoiseSampler;

use super::mesh::OceanGrid;
use super::octave::OctaveStack;

/// Rows within this distance of the far edge are blended into the near edge
const SEAM_WIDTH: usize = 3;

/// Blend weight step per row away from the far edge
const SEAM_RATIO_STEP: f32 = 0.2;

/// Recomputes every vertex height of an [`OceanGrid`] from an [`OctaveStack`]
///
/// The pass is strictly sequential: x outer, z inner, and for each point
/// x-blend, then z-blend, then wraparound copy, then store. Blends read heights
/// written earlier in the same pass (or carried over from the previous tick when
/// the mirrored point has not been visited yet), so reordering or parallelizing
/// the loop changes the result.
pub struct HeightFieldUpdater<N> {
    octaves: OctaveStack,
    noise: N,
}

impl<N: NoiseSampler> HeightFieldUpdater<N> {
    pub fn new(octaves: OctaveStack, noise: N) -> Self {
        Self { octaves, noise }
    }

    pub fn octaves(&self) -> &OctaveStack {
        &self.octaves
    }

    /// Raw octave height, before any seam handling
    pub fn sample_height(&self, x: usize, z: usize, dimension: usize, time_s: f32) -> f32 {
        self.octaves.height(&self.noise, x, z, dimension, time_s)
    }

    /// Run one full pass over `grid` at `time_s`, then refresh normals
    pub fn update(&self, grid: &mut OceanGrid, time_s: f32) {
        let dimension = grid.dimension();

        for x in 0..=dimension {
            for z in 0..=dimension {
                let mut y = self.sample_height(x, z, dimension, time_s);

                if x + SEAM_WIDTH > dimension {
                    y = blend_with_mirror(grid, (dimension - x, z), dimension - x, y);
                }
                if z + SEAM_WIDTH > dimension {
                    y = blend_with_mirror(grid, (x, dimension - z), dimension - z, y);
                }

                // The far edge doubles as the near edge of the next tile over
                if x == dimension {
                    grid.set_height(0, z, y);
                }
                if z == dimension {
                    grid.set_height(x, 0, y);
                }

                let i = grid.index(x, z);
                grid.vertices[i].position = [x as f32, y, z as f32];
            }
        }

        grid.recalculate_normals();
    }
}

/// Pull `y` and the stored height at `mirror` toward each other.
///
/// `distance` is how far the mirrored point sits from the near edge; the
/// closer the current point is to the far edge, the more it takes from the
/// mirror.
fn blend_with_mirror(grid: &mut OceanGrid, mirror: (usize, usize), distance: usize, y: f32) -> f32 {
    let ratio = (distance + 2) as f32 * SEAM_RATIO_STEP;
    let stored = grid.height(mirror.0, mirror.1);
    let blended = stored * (1.0 - ratio) + y * ratio;
    grid.set_height(
        mirror.0,
        mirror.1,
        stored * ratio + blended * (1.0 - ratio),
    );
    blended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::PerlinSampler;
    use crate::ocean::octave::Octave;
    use glam::Vec2;

    /// Linear field, so every lattice point gets its own exact height
    struct Slope;

    impl NoiseSampler for Slope {
        fn sample(&self, x: f32, y: f32) -> f32 {
            0.25 * x + 0.125 * y
        }
    }

    /// Two ticks of a drifting slope; returns the seam-band heights that
    /// depend on the x-blend running before the z-blend
    fn seam_band_after_two_ticks(dimension: usize) -> [f32; 4] {
        let octaves = OctaveStack::new(vec![Octave::scrolling(
            Vec2::splat(5.0),
            Vec2::new(1.0, 0.0),
            1.0,
        )])
        .unwrap();
        let updater = HeightFieldUpdater::new(octaves, Slope);
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        updater.update(&mut grid, 0.0);
        updater.update(&mut grid, 1.0);

        let d = dimension;
        [
            grid.height(d, d),
            grid.height(d - 1, d - 2),
            grid.height(2, d - 1),
            grid.height(0, 0),
        ]
    }

    fn assert_heights(actual: [f32; 4], expected: [f32; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "got {:?}, want {:?}", actual, expected);
        }
    }

    fn swell() -> OctaveStack {
        OctaveStack::new(vec![
            Octave::scrolling(Vec2::new(4.0, 3.0), Vec2::new(1.5, 0.5), 2.0),
            Octave::oscillating(Vec2::new(9.0, 9.0), Vec2::new(1.0, 2.0), 0.4),
        ])
        .unwrap()
    }

    /// Whether the wraparound copy at `k` survives the rest of the pass.
    ///
    /// Later blends on the final row rewrite mirrored points `k < 3` that lie
    /// before the midline, after their wraparound copy was taken.
    fn seam_survives(k: usize, dimension: usize) -> bool {
        k >= SEAM_WIDTH || 2 * k >= dimension
    }

    #[test]
    fn test_far_edge_matches_near_edge() {
        let dimension = 16;
        let updater = HeightFieldUpdater::new(swell(), PerlinSampler::new(4));
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        for tick in 0..5 {
            updater.update(&mut grid, tick as f32 * 0.02);
            for k in (0..=dimension).filter(|&k| seam_survives(k, dimension)) {
                assert_eq!(grid.height(dimension, k), grid.height(0, k), "x seam at z={}", k);
                assert_eq!(grid.height(k, dimension), grid.height(k, 0), "z seam at x={}", k);
            }
        }
    }

    #[test]
    fn test_three_corners_share_final_height() {
        // Known corner case: the last point of the pass writes (d,d), (0,d)
        // and (d,0) with one value, while (0,0) keeps the copy taken at (d,0).
        let dimension = 12;
        let updater = HeightFieldUpdater::new(swell(), PerlinSampler::new(8));
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        updater.update(&mut grid, 0.0);
        updater.update(&mut grid, 0.5);

        let corner = grid.height(dimension, dimension);
        assert_eq!(grid.height(0, dimension), corner);
        assert_eq!(grid.height(dimension, 0), corner);
    }

    #[test]
    fn test_seam_band_golden_values() {
        // (d,d), (d-1,d-2), (2,d-1), (0,0)
        assert_heights(
            seam_band_after_two_ticks(5),
            [0.299_999_98, 0.593_6, 0.464, 0.199_999_99],
        );
    }

    #[test]
    fn test_seam_band_golden_values_with_carry() {
        // On a four-cell grid some mirrors still hold the previous tick's heights
        assert_heights(
            seam_band_after_two_ticks(4),
            [0.3125, 0.532_784, 0.492_8, 0.2125],
        );
    }

    #[test]
    fn test_interior_untouched_by_blending() {
        let dimension = 10;
        let updater = HeightFieldUpdater::new(swell(), PerlinSampler::new(1));
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        updater.update(&mut grid, 1.0);
        for x in 3..=dimension - 3 {
            for z in 3..=dimension - 3 {
                assert_eq!(grid.height(x, z), updater.sample_height(x, z, dimension, 1.0));
            }
        }
    }

    #[test]
    fn test_first_tick_reference_values() {
        let dimension = 4;
        let octaves =
            OctaveStack::new(vec![Octave::scrolling(Vec2::ONE, Vec2::ZERO, 1.0)]).unwrap();
        let noise = PerlinSampler::default();
        let updater = HeightFieldUpdater::new(octaves, noise.clone());
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        updater.update(&mut grid, 0.0);

        for x in 0..=dimension {
            for z in 0..=dimension {
                let raw = noise.sample(x as f32 / 4.0, z as f32 / 4.0) - 0.5;
                assert_eq!(updater.sample_height(x, z, dimension, 0.0), raw);
            }
        }
        // A four-cell grid sits entirely inside the seam bands; only the
        // wraparound copy is pinned.
        assert_eq!(grid.height(4, 2), grid.height(0, 2));
    }

    #[test]
    fn test_blend_pulls_toward_mirror() {
        let dimension = 4;
        let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
        grid.set_height(1, 0, 1.0);
        // ratio = (1 + 2) * 0.2 = 0.6
        let y = blend_with_mirror(&mut grid, (1, 0), 1, 0.0);
        assert!((y - 0.4).abs() < 1e-6);
        assert!((grid.height(1, 0) - (0.6 + 0.4 * 0.4)).abs() < 1e-6);
    }

    #[test]
    fn test_empty_stack_gives_flat_plane() {
        let updater = HeightFieldUpdater::new(OctaveStack::default(), PerlinSampler::default());
        let mut grid = OceanGrid::new(8, 1.0).unwrap();
        updater.update(&mut grid, 12.0);
        assert_eq!(grid.height_range(), (0.0, 0.0));
    }

    #[test]
    fn test_deterministic_across_grids() {
        let a = HeightFieldUpdater::new(swell(), PerlinSampler::new(21));
        let b = HeightFieldUpdater::new(swell(), PerlinSampler::new(21));
        let mut ga = OceanGrid::new(9, 1.0).unwrap();
        let mut gb = OceanGrid::new(9, 1.0).unwrap();
        for t in [0.0, 0.02, 0.04] {
            a.update(&mut ga, t);
            b.update(&mut gb, t);
        }
        assert_eq!(ga.vertices, gb.vertices);
    }

    #[test]
    fn test_tiny_grids_stay_in_bounds() {
        let updater = HeightFieldUpdater::new(swell(), PerlinSampler::new(2));
        for dimension in 1..=3 {
            let mut grid = OceanGrid::new(dimension, 1.0).unwrap();
            updater.update(&mut grid, 0.3);
            updater.update(&mut grid, 0.6);
            assert!(grid.vertices.iter().all(|v| v.position[1].is_finite()));
        }
    }
}
