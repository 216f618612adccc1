//! `rad` - solve radiosity for a built-in scene.
//!
//! Usage: `rad [config.json]`

mod config;
mod scenes;

use anyhow::{Context, Result};
use rad_solver::{build_interpolated_vertices, build_vertices, run_radiosity, TimingReport};

use crate::config::RunConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    log::debug!("Config: {:?}", config);

    let mut scene = scenes::cornell_box()?;
    log::info!(
        "Loaded scene '{}': {} meshes, {} lights, {} spheres",
        scene.name,
        scene.meshes.len(),
        scene.lights.len(),
        scene.spheres.len()
    );

    scene.subdivide(&config.subdivision);
    let timing = match config.debug_view {
        Some(view) => {
            view.apply(&mut scene);
            TimingReport::default()
        }
        None => run_radiosity(&mut scene, config.radiosity.clone())?,
    };
    log::info!("{}", timing);

    let vertices = if config.interpolate {
        build_interpolated_vertices(&scene)
    } else {
        build_vertices(&scene)
    };
    log::info!("Built {} vertices", vertices.len());

    if let Some(path) = &config.vertex_output {
        std::fs::write(path, bytemuck::cast_slice::<_, u8>(&vertices))
            .with_context(|| format!("Failed to write vertices to {}", path.display()))?;
        log::info!("Wrote vertices to {}", path.display());
    }

    if let Some(path) = &config.timing_report {
        timing
            .write_to(path)
            .with_context(|| format!("Failed to write timing report to {}", path.display()))?;
    }

    Ok(())
}
