//! Sinusoidal ridges running along the rows.

use std::f64::consts::TAU;

use rand::Rng;

use super::{uniform, HeightFieldGenerator};
use crate::config::{HfBaseCfg, WaveTerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

impl HeightFieldGenerator for WaveTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        WaveTerrainCfg::validate(self)
    }

    /// `amplitude * sin(2π * num_waves * x / width)`, where `width` is the
    /// distance between the first and last column so the wave spans the
    /// mesh exactly. Constant along y.
    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        let amplitude = uniform(rng, self.amplitude_range);
        let (rows, cols) = self.base.shape();
        let dx = self.base.horizontal_scale;
        let width = (cols - 1) as f64 * dx;
        let k = TAU * self.num_waves as f64 / width;

        let profile: Vec<f64> = (0..cols)
            .map(|col| amplitude * (k * col as f64 * dx).sin())
            .collect();
        log::debug!("wave: amplitude {:.3} m, {} waves", amplitude, self.num_waves);
        ElevationGrid::from_fn(rows, cols, |_, col| profile[col])
    }
}
