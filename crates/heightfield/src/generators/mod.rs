//! Height-field generators, one module per terrain variant.
//!
//! Every generator reads a validated record and an explicit random generator
//! and returns a fresh [`ElevationGrid`] of shape `record.base.shape()`.
//! Degenerate geometry (empty platforms, steps narrower than a cell, obstacles
//! wider than the grid) is clamped rather than rejected.

use std::ops::Range;

use rand::Rng;

use crate::config::{HfBaseCfg, TerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

mod discrete_obstacles;
mod pyramid_sloped;
mod pyramid_stairs;
mod random_uniform;
mod stepping_stones;
mod wave;

pub use random_uniform::{sample_control_grid, upsample_bilinear};
pub use stepping_stones::{SteppingStonesReport, Stone, StonePlacement};

/// A record that knows how to turn itself into an elevation grid.
pub trait HeightFieldGenerator {
    fn base(&self) -> &HfBaseCfg;

    fn validate(&self) -> Result<(), ConfigError>;

    /// Draws a new grid. Assumes `validate()` passed.
    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid;
}

impl HeightFieldGenerator for TerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        TerrainCfg::base(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        TerrainCfg::validate(self)
    }

    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        match self {
            Self::RandomUniform(cfg) => cfg.generate_grid(rng),
            Self::PyramidSloped(cfg) => cfg.generate_grid(rng),
            Self::PyramidStairs(cfg) => cfg.generate_grid(rng),
            Self::DiscreteObstacles(cfg) => cfg.generate_grid(rng),
            Self::Wave(cfg) => cfg.generate_grid(rng),
            Self::SteppingStones(cfg) => cfg.generate_grid(rng),
        }
    }
}

/// Uniform draw from a closed `(min, max)` range; a collapsed range yields `min`.
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if min < max {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Center cell `(row, col)` of a grid.
#[inline]
pub fn center(rows: usize, cols: usize) -> (usize, usize) {
    (rows / 2, cols / 2)
}

/// Chebyshev distance in cells between `(row, col)` and `(cy, cx)`.
#[inline]
pub fn chebyshev(row: usize, col: usize, (cy, cx): (usize, usize)) -> usize {
    row.abs_diff(cy).max(col.abs_diff(cx))
}

/// Row and column spans of the centered square platform `platform_cells`
/// wide, clamped to the grid.
pub fn platform_bounds(
    rows: usize,
    cols: usize,
    platform_cells: usize,
) -> (Range<usize>, Range<usize>) {
    let (cy, cx) = center(rows, cols);
    let span = |c: usize, len: usize| {
        let start = c.saturating_sub(platform_cells / 2);
        start..(start + platform_cells).min(len)
    };
    (span(cy, rows), span(cx, cols))
}

pub(crate) fn fill_platform(grid: &mut ElevationGrid, platform_cells: usize, height: f64) {
    let (rows, cols) = platform_bounds(grid.rows(), grid.cols(), platform_cells);
    grid.fill_rect(rows, cols, height);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_is_centered() {
        let (rows, cols) = platform_bounds(100, 100, 10);
        assert_eq!(rows, 45..55);
        assert_eq!(cols, 45..55);

        let (rows, cols) = platform_bounds(7, 20, 3);
        assert_eq!(rows, 2..5);
        assert_eq!(cols, 9..12);
    }

    #[test]
    fn platform_is_clamped() {
        let (rows, cols) = platform_bounds(4, 4, 10);
        assert_eq!(rows, 0..4);
        assert_eq!(cols, 0..4);
        assert!(platform_bounds(4, 4, 0).0.is_empty());
    }

    #[test]
    fn chebyshev_is_max_axis_distance() {
        assert_eq!(chebyshev(5, 5, (5, 5)), 0);
        assert_eq!(chebyshev(2, 6, (5, 5)), 3);
        assert_eq!(chebyshev(9, 1, (5, 5)), 4);
    }

    #[test]
    fn collapsed_range_is_its_minimum() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert_eq!(uniform(&mut rng, (0.4, 0.4)), 0.4);
    }
}
