//! Generator → border → mesh composition.
//!
//! Nothing here wraps generators implicitly: callers pick a record, hand it an
//! RNG and get back the grid, the mesh and the anchor point in one value.

use glam::Vec3;
use rand::Rng;

use crate::config::{HfBaseCfg, SteppingStonesTerrainCfg};
use crate::error::ConfigError;
use crate::generators::{HeightFieldGenerator, StonePlacement};
use crate::grid::ElevationGrid;
use crate::mesh::{apply_slope_threshold, heightfield_to_mesh, TerrainMesh};
use crate::rng::with_seed;

/// Everything a terrain call produces.
#[derive(Debug, Clone)]
pub struct TerrainOutput {
    pub grid: ElevationGrid,
    pub mesh: TerrainMesh,
    /// Highest vertex, used by collaborators as the placement origin.
    pub anchor: Vec3,
}

/// Validates `cfg`, generates its grid with `rng` and meshes it.
pub fn generate_terrain<G, R>(cfg: &G, rng: &mut R) -> Result<TerrainOutput, ConfigError>
where
    G: HeightFieldGenerator,
    R: Rng + ?Sized,
{
    cfg.validate()?;
    let grid = cfg.generate_grid(rng);
    Ok(finish(cfg.base(), grid))
}

/// Like [`generate_terrain`] with a generator seeded from `cfg.base().seed`.
pub fn generate_terrain_seeded<G>(cfg: &G) -> Result<TerrainOutput, ConfigError>
where
    G: HeightFieldGenerator,
{
    with_seed(cfg.base().seed, |rng| generate_terrain(cfg, rng))
}

/// Stepping stones with the placement statistics kept alongside the mesh.
pub fn generate_stepping_stones<R>(
    cfg: &SteppingStonesTerrainCfg,
    rng: &mut R,
) -> Result<(TerrainOutput, StonePlacement), ConfigError>
where
    R: Rng + ?Sized,
{
    cfg.validate()?;
    let report = cfg.generate_with_report(rng);
    Ok((finish(&cfg.base, report.grid), report.placement))
}

fn finish(base: &HfBaseCfg, mut grid: ElevationGrid) -> TerrainOutput {
    grid.flatten_border(base.border_cells());

    let spacing = base.horizontal_scale;
    let (mut mesh, anchor) = heightfield_to_mesh(&grid, spacing, spacing);
    if let Some(threshold) = base.slope_threshold {
        apply_slope_threshold(&mut mesh, &grid, spacing, spacing, threshold);
    }

    log::debug!(
        "terrain {}x{}: {} vertices, {} triangles, anchor {:?}",
        grid.rows(),
        grid.cols(),
        mesh.vertices.len(),
        mesh.triangles.len(),
        anchor
    );
    TerrainOutput { grid, mesh, anchor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DiscreteObstaclesTerrainCfg, HfBaseCfg, PyramidSlopedTerrainCfg, PyramidStairsTerrainCfg,
        RandomUniformTerrainCfg, TerrainCfg, WaveTerrainCfg,
    };
    use crate::generators::{platform_bounds, sample_control_grid};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base() -> HfBaseCfg {
        HfBaseCfg::new((10.0, 10.0), 0.1).unwrap()
    }

    fn pool() -> Vec<TerrainCfg> {
        vec![
            RandomUniformTerrainCfg::new(base(), (0.05, 0.25), 0.01)
                .unwrap()
                .into(),
            PyramidSlopedTerrainCfg::new(base(), (0.15, 0.3)).unwrap().into(),
            PyramidSlopedTerrainCfg::inverted(base(), (0.15, 0.3))
                .unwrap()
                .into(),
            PyramidStairsTerrainCfg::new(base(), (0.2, 0.3), 1.0)
                .unwrap()
                .into(),
            PyramidStairsTerrainCfg::inverted(base(), (0.2, 0.3), 1.0)
                .unwrap()
                .into(),
            DiscreteObstaclesTerrainCfg::new(base(), (0.3, 0.8), (0.1, 0.4), 20)
                .unwrap()
                .into(),
            WaveTerrainCfg::new(base(), (0.08, 0.15))
                .unwrap()
                .with_num_waves(3)
                .into(),
            SteppingStonesTerrainCfg::new(base(), 0.3, (0.5, 1.0))
                .unwrap()
                .with_max_generation_attempts(2000)
                .into(),
        ]
    }

    #[test]
    fn every_variant_meshes_with_expected_counts() {
        for cfg in pool() {
            let out = generate_terrain(&cfg, &mut StdRng::seed_from_u64(0)).unwrap();
            assert_eq!(out.grid.shape(), (100, 100), "{}", cfg.kind());
            assert_eq!(out.mesh.vertices.len(), 100 * 100);
            assert_eq!(out.mesh.triangles.len(), 2 * 99 * 99);
        }
    }

    #[test]
    fn same_seed_gives_identical_grids() {
        for cfg in pool() {
            let a = generate_terrain(&cfg, &mut StdRng::seed_from_u64(77)).unwrap();
            let b = generate_terrain(&cfg, &mut StdRng::seed_from_u64(77)).unwrap();
            let bits = |g: &ElevationGrid| -> Vec<u64> {
                g.as_slice().iter().map(|h| h.to_bits()).collect()
            };
            assert_eq!(bits(&a.grid), bits(&b.grid), "{}", cfg.kind());
            assert_eq!(a.mesh, b.mesh);
        }
    }

    #[test]
    fn seeded_entry_point_uses_the_record_seed() {
        let grid_for = |seed| {
            let base = base().with_seed(Some(seed));
            let cfg = RandomUniformTerrainCfg::new(base, (0.0, 1.0), 0.01).unwrap();
            generate_terrain_seeded(&cfg).unwrap().grid
        };
        assert_eq!(grid_for(5), grid_for(5));
        assert_ne!(grid_for(5), grid_for(6));
    }

    #[test]
    fn anchor_is_the_highest_vertex() {
        for cfg in pool() {
            let out = generate_terrain(&cfg, &mut StdRng::seed_from_u64(9)).unwrap();
            let (_, hi) = out.grid.height_bounds();
            assert_eq!(out.anchor.z, hi as f32, "{}", cfg.kind());
            let row = (out.anchor.y / 0.1).round() as usize;
            let col = (out.anchor.x / 0.1).round() as usize;
            assert_eq!(out.grid.get(row, col), hi);
        }
    }

    #[test]
    fn random_uniform_end_to_end() {
        let cfg = RandomUniformTerrainCfg::new(base(), (0.05, 0.25), 0.01).unwrap();
        let control = sample_control_grid(&cfg, &mut StdRng::seed_from_u64(31));
        let allowed: Vec<f64> = (5..=25).map(|k| k as f64 * 0.01).collect();
        for &h in control.as_slice() {
            assert!(allowed.iter().any(|&a| (a - h).abs() < 1e-12), "{h}");
        }
        let out = generate_terrain(&cfg, &mut StdRng::seed_from_u64(31)).unwrap();
        assert_eq!(out.grid.shape(), (100, 100));
    }

    #[test]
    fn discrete_obstacles_end_to_end() {
        let cfg = DiscreteObstaclesTerrainCfg::new(base(), (0.3, 2.0), (0.1, 0.4), 400)
            .unwrap()
            .with_platform_width(1.0)
            .unwrap();
        for seed in 0..4 {
            let out = generate_terrain(&cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
            let (rows, cols) = platform_bounds(100, 100, 10);
            assert_eq!(rows.len() * cols.len(), 100);
            for row in rows {
                for col in cols.clone() {
                    assert_eq!(out.grid.get(row, col), 0.0);
                }
            }
        }
    }

    #[test]
    fn border_is_flattened() {
        let bordered = base().with_border_width(0.5).unwrap();
        let cfg = WaveTerrainCfg::new(bordered, (0.2, 0.2))
            .unwrap()
            .with_num_waves(4);
        let out = generate_terrain(&cfg, &mut StdRng::seed_from_u64(0)).unwrap();
        for i in 0..100 {
            for edge in [0, 4, 95, 99] {
                assert_eq!(out.grid.get(i, edge), 0.0);
                assert_eq!(out.grid.get(edge, i), 0.0);
            }
        }
        assert_ne!(out.grid.get(50, 7), 0.0);
    }

    #[test]
    fn slope_threshold_keeps_topology() {
        let steep = base().with_slope_threshold(Some(0.75)).unwrap();
        let cfg = PyramidStairsTerrainCfg::new(steep, (0.2, 0.3), 1.0).unwrap();
        let plain = PyramidStairsTerrainCfg::new(base(), (0.2, 0.3), 1.0).unwrap();
        let a = generate_terrain(&cfg, &mut StdRng::seed_from_u64(2)).unwrap();
        let b = generate_terrain(&plain, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.mesh.triangles, b.mesh.triangles);
        assert_ne!(a.mesh.vertices, b.mesh.vertices);
    }

    #[test]
    fn stepping_stones_reports_placement() {
        let cfg = SteppingStonesTerrainCfg::new(base(), 0.3, (0.5, 1.0))
            .unwrap()
            .with_max_generation_attempts(5);
        let (out, placement) =
            generate_stepping_stones(&cfg, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(placement.attempts, 5);
        assert!(placement.shortfall() > 0);
        assert_eq!(out.mesh.vertices.len(), 100 * 100);
    }

    #[test]
    fn invalid_record_is_rejected_before_generation() {
        let mut cfg = WaveTerrainCfg::new(base(), (0.1, 0.2)).unwrap();
        cfg.amplitude_range = (0.5, 0.1);
        let err = generate_terrain(&cfg, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }
}
