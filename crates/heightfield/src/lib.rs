//! Height-field terrain synthesis and meshing.
//!
//! Each terrain variant has a configuration record in [`config`]; its
//! generator in [`generators`] turns the record plus an explicit random
//! generator into an [`ElevationGrid`], and [`heightfield_to_mesh`] turns any
//! grid into an indexed triangle mesh with an anchor point at its highest
//! vertex. [`generate_terrain`] chains the two.
//!
//! ```rust,ignore
//! use heightfield::prelude::*;
//!
//! let base = HfBaseCfg::new((10.0, 10.0), 0.1)?.with_seed(Some(7));
//! let cfg = PyramidStairsTerrainCfg::new(base, (0.2, 0.3), 1.0)?;
//! let terrain = generate_terrain_seeded(&cfg)?;
//! assert_eq!(terrain.mesh.vertices.len(), 100 * 100);
//! ```

pub mod config;
pub mod error;
pub mod generators;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod rng;

pub use config::*;
pub use error::ConfigError;
pub use generators::{HeightFieldGenerator, SteppingStonesReport, Stone, StonePlacement};
pub use grid::ElevationGrid;
pub use mesh::{apply_slope_threshold, heightfield_to_mesh, TerrainMesh};
pub use pipeline::{generate_stepping_stones, generate_terrain, generate_terrain_seeded, TerrainOutput};
pub use rng::{derive_seed, terrain_rng, with_seed};

// Re-export glam so downstream crates agree on the vector type.
pub use glam;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{
        DiscreteObstaclesTerrainCfg, HfBaseCfg, ObstacleHeightMode, PyramidSlopedTerrainCfg,
        PyramidStairsTerrainCfg, RandomUniformTerrainCfg, SteppingStonesTerrainCfg, TerrainCfg,
        WaveTerrainCfg,
    };
    pub use crate::generators::HeightFieldGenerator;
    pub use crate::pipeline::{generate_terrain, generate_terrain_seeded, TerrainOutput};
    pub use crate::rng::with_seed;
    pub use crate::{ConfigError, ElevationGrid, TerrainMesh};
}
