//! terrain_export - generates a pool of height-field terrains and writes one
//! mesh file per terrain.
//!
//! Usage: `terrain_export [POOL.ron] [OUT_DIR]`

mod export;
mod pool;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use heightfield::{derive_seed, generate_terrain, terrain_rng};

use export::write_mesh;
use pool::TerrainPool;

const DEFAULT_POOL: &str = "terrains.ron";
const DEFAULT_OUT_DIR: &str = "terrain_stl";

/// Generates every terrain in `pool` and writes it under `out_dir`.
/// Returns the written paths in pool order.
fn export_pool(pool: &TerrainPool, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;

    let mut written = Vec::with_capacity(pool.terrains.len());
    for (index, entry) in pool.terrains.iter().enumerate() {
        let seed = derive_seed(pool.seed, index as u64);
        let mut rng = terrain_rng(Some(seed));
        let terrain = generate_terrain(&entry.terrain, &mut rng)
            .with_context(|| format!("generating terrain {:?}", entry.name))?;

        let path = out_dir.join(format!("{}.{}", entry.name, pool.format.extension()));
        write_mesh(&terrain.mesh, pool.format, &path)?;

        let (rows, cols) = terrain.grid.shape();
        log::info!(
            "{} ({}): {}x{} cells, {} triangles, anchor ({:.3}, {:.3}, {:.3}) -> {:?}",
            entry.name,
            entry.terrain.kind(),
            rows,
            cols,
            terrain.mesh.triangles.len(),
            terrain.anchor.x,
            terrain.anchor.y,
            terrain.anchor.z,
            path
        );
        written.push(path);
    }
    Ok(written)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let pool_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_POOL.to_owned()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUT_DIR.to_owned()));

    let pool = TerrainPool::load(&pool_path)?;
    log::info!(
        "Exporting {} terrains (seed {}, {:?}) to {:?}",
        pool.terrains.len(),
        pool.seed,
        pool.format,
        out_dir
    );

    let written = export_pool(&pool, &out_dir)?;
    log::info!("Wrote {} files", written.len());
    Ok(())
}
