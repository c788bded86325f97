//! Square stair rings rising (or sinking) away from a flat platform.

use rand::Rng;

use super::{center, chebyshev, uniform, HeightFieldGenerator};
use crate::config::{HfBaseCfg, PyramidStairsTerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

impl PyramidStairsTerrainCfg {
    /// Step width in cells, at least one.
    pub fn step_cells(&self) -> usize {
        self.base.cells(self.step_width).max(1)
    }

    /// Number of stair rings that fit between the center and the nearest edge.
    pub fn layer_count(&self) -> usize {
        let (rows, cols) = self.base.shape();
        rows.min(cols) / 2 / self.step_cells()
    }
}

impl HeightFieldGenerator for PyramidStairsTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        PyramidStairsTerrainCfg::validate(self)
    }

    /// Rings of constant height around a platform at 0, each ring one random
    /// increment higher than the one inside it. Cells past the last ring keep
    /// the outermost height. `inverted` mirrors `h -> -h`.
    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        let step = self.step_cells();
        let layers = self.layer_count();
        let cumulative: Vec<f64> = (0..layers)
            .scan(0.0, |total, _| {
                *total += uniform(rng, self.step_height_range);
                Some(*total)
            })
            .collect();

        let (rows, cols) = self.base.shape();
        let mid = center(rows, cols);
        let half_platform = self.base.cells(self.platform_width) / 2;
        let sign = if self.inverted { -1.0 } else { 1.0 };

        log::debug!(
            "pyramid stairs: {} layers of {} cells, top {:.3} m, inverted {}",
            layers,
            step,
            cumulative.last().copied().unwrap_or(0.0),
            self.inverted
        );

        ElevationGrid::from_fn(rows, cols, |row, col| {
            let d = chebyshev(row, col, mid);
            if d <= half_platform || cumulative.is_empty() {
                return 0.0;
            }
            let ring = ((d - half_platform) / step).min(cumulative.len() - 1);
            sign * cumulative[ring]
        })
    }
}
