//! Terrain pool loaded from `terrains.ron`.

use std::path::Path;

use anyhow::{Context, Result};
use heightfield::{
    ConfigError, DiscreteObstaclesTerrainCfg, HfBaseCfg, PyramidSlopedTerrainCfg,
    PyramidStairsTerrainCfg, RandomUniformTerrainCfg, SteppingStonesTerrainCfg, TerrainCfg,
    WaveTerrainCfg,
};
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;

/// One terrain to export; `name` becomes the file stem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTerrain {
    pub name: String,
    pub terrain: TerrainCfg,
}

/// A batch of terrains sharing a master seed and output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainPool {
    /// Master seed; terrain `i` is generated from `derive_seed(seed, i)`.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub terrains: Vec<NamedTerrain>,
}

impl TerrainPool {
    /// Every variant at 10x10 m, 0.1 m resolution.
    pub fn builtin() -> Result<Self, ConfigError> {
        let base = HfBaseCfg::new((10.0, 10.0), 0.1)?.with_border_width(0.2)?;
        let named = |name: &str, terrain: TerrainCfg| NamedTerrain {
            name: name.to_owned(),
            terrain,
        };

        Ok(Self {
            seed: 0,
            format: ExportFormat::default(),
            terrains: vec![
                named(
                    "random_uniform",
                    RandomUniformTerrainCfg::new(base.clone(), (0.02, 0.10), 0.005)?
                        .with_downsampled_scale(Some(0.2))?
                        .into(),
                ),
                named(
                    "pyramid_sloped",
                    PyramidSlopedTerrainCfg::new(base.clone(), (0.0, 0.4))?.into(),
                ),
                named(
                    "inverted_pyramid_sloped",
                    PyramidSlopedTerrainCfg::inverted(base.clone(), (0.0, 0.4))?.into(),
                ),
                named(
                    "pyramid_stairs",
                    PyramidStairsTerrainCfg::new(base.clone(), (0.05, 0.20), 0.3)?.into(),
                ),
                named(
                    "inverted_pyramid_stairs",
                    PyramidStairsTerrainCfg::inverted(base.clone(), (0.05, 0.20), 0.3)?.into(),
                ),
                named(
                    "discrete_obstacles",
                    DiscreteObstaclesTerrainCfg::new(base.clone(), (0.25, 0.75), (0.05, 0.25), 40)?
                        .into(),
                ),
                named(
                    "wave",
                    WaveTerrainCfg::new(base.clone(), (0.05, 0.20))?
                        .with_num_waves(4)
                        .into(),
                ),
                named(
                    "stepping_stones",
                    SteppingStonesTerrainCfg::new(base, 0.1, (0.25, 0.5))?
                        .with_min_distance(0.05)?
                        .into(),
                ),
            ],
        })
    }

    /// Loads the pool at `path`, or the built-in pool if the file does not
    /// exist. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No terrain pool at {:?}, using the built-in pool", path);
            return Self::builtin().context("building the built-in terrain pool");
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading terrain pool {:?}", path))?;
        Self::from_ron(&data).with_context(|| format!("parsing terrain pool {:?}", path))
    }

    pub fn from_ron(data: &str) -> Result<Self> {
        let pool: Self = ron::from_str(data)?;
        for entry in &pool.terrains {
            entry
                .terrain
                .validate()
                .with_context(|| format!("terrain {:?}", entry.name))?;
        }
        Ok(pool)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
