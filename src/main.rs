//! Tidegrid - tileable procedural ocean surfaces and terrain heightmaps
//!
//! Runs the ocean for a fixed number of simulation ticks against an in-memory
//! host, then optionally bakes terrain heightmaps and writes PNG previews.

use std::error::Error;
use std::time::Instant;

use clap::Parser;
use glam::Vec3;
use log::{info, warn};

use tidegrid::cli::Args;
use tidegrid::export;
use tidegrid::host::{PlacementSink, RecordingHost};
use tidegrid::noise::PerlinSampler;
use tidegrid::ocean::{read_grid, OceanSystem};
use tidegrid::terrain::TerrainPatch;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let scene = args.load_scene()?;

    let mut host = RecordingHost::new();
    let root = host.place_patch(None, Vec3::ZERO);

    // Startup: build the shared surface and lay out patches before the first tick
    let mut ocean = OceanSystem::from_params(&scene.ocean)?;
    ocean.setup(&mut host, Some(root));

    let mut clock = args.clock()?;
    let start = Instant::now();
    for _ in 0..args.ticks {
        ocean.tick(&clock, &mut host);
        clock.advance();
    }
    info!(
        "Ran {} ticks ({:.2}s simulated) in {:.2}ms",
        args.ticks,
        args.ticks as f32 * args.step,
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(path) = &args.snapshot {
        export::write_surface_png(&read_grid(ocean.grid()), path)?;
        info!("Ocean snapshot: {}", path.display());
    }

    if let Some(dir) = &args.heightmap_dir {
        match &scene.terrain {
            Some(terrain) => {
                let baker = terrain.baker()?;
                let noise = PerlinSampler::new(terrain.noise_seed);
                let patches: Vec<TerrainPatch> = terrain
                    .positions
                    .iter()
                    .map(|&position| TerrainPatch {
                        handle: host.place_patch(Some(root), position),
                        position,
                    })
                    .collect();
                baker.bake_patches(&noise, terrain.terrain_size(), &patches, &mut host);

                std::fs::create_dir_all(dir)?;
                for (handle, heightmap) in &host.heightmaps {
                    let path = dir.join(format!("terrain_{}.png", handle.0));
                    export::write_heightmap_png(heightmap, &path)?;
                    info!("Heightmap: {}", path.display());
                }
            }
            None => warn!("--heightmap-dir given but the scene has no [terrain] section"),
        }
    }

    let (lo, hi) = read_grid(ocean.grid()).height_range();
    println!(
        "{} patch(es), final heights {:.3}..{:.3}",
        ocean.patches().len(),
        lo,
        hi
    );
    Ok(())
}
