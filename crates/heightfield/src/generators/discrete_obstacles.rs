//! Random rectangular obstacles around a cleared center platform.

use rand::Rng;

use super::{fill_platform, uniform, HeightFieldGenerator};
use crate::config::{DiscreteObstaclesTerrainCfg, HfBaseCfg, ObstacleHeightMode};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

impl HeightFieldGenerator for DiscreteObstaclesTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        DiscreteObstaclesTerrainCfg::validate(self)
    }

    /// Stamps `num_obstacles` square blocks at uniform positions. Blocks may
    /// overlap; the last one drawn wins. The platform is cleared afterwards.
    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        let (rows, cols) = self.base.shape();
        let max_side = rows.min(cols);
        let mut grid = ElevationGrid::zeros(rows, cols);

        for _ in 0..self.num_obstacles {
            let height = match self.obstacle_height_mode {
                ObstacleHeightMode::Choice => uniform(rng, self.obstacle_height_range),
                ObstacleHeightMode::Fixed => self.obstacle_height_range.1,
            };
            let side = self
                .base
                .cells(uniform(rng, self.obstacle_width_range))
                .clamp(1, max_side);
            let row = rng.gen_range(0..=rows - side);
            let col = rng.gen_range(0..=cols - side);
            grid.fill_rect(row..row + side, col..col + side, height);
        }

        fill_platform(&mut grid, self.base.cells(self.platform_width), 0.0);
        log::debug!("discrete obstacles: {} blocks stamped", self.num_obstacles);
        grid
    }
}
