//! Constant-slope pyramid (or pit) around a flat platform.

use rand::Rng;

use super::{center, chebyshev, uniform, HeightFieldGenerator};
use crate::config::{HfBaseCfg, PyramidSlopedTerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

impl HeightFieldGenerator for PyramidSlopedTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        PyramidSlopedTerrainCfg::validate(self)
    }

    /// Height grows linearly with Chebyshev distance from the center; the
    /// platform takes the height of its own edge. `inverted` mirrors `h -> -h`.
    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        let slope = uniform(rng, self.slope_range);
        let rise_per_cell = self.base.horizontal_scale * slope.tan();
        let (rows, cols) = self.base.shape();
        let mid = center(rows, cols);
        let platform_radius = self.base.cells(self.platform_width) as f64 / 2.0;
        let platform_height = platform_radius * rise_per_cell;
        let sign = if self.inverted { -1.0 } else { 1.0 };

        log::debug!(
            "pyramid sloped: slope {:.3} rad, platform radius {} cells, inverted {}",
            slope,
            platform_radius,
            self.inverted
        );

        ElevationGrid::from_fn(rows, cols, |row, col| {
            let d = chebyshev(row, col, mid) as f64;
            let h = if d <= platform_radius {
                platform_height
            } else {
                d * rise_per_cell
            };
            sign * h
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::base_10m;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn height_increases_with_distance_outside_platform() {
        let cfg = PyramidSlopedTerrainCfg::new(base_10m(), (0.15, 0.3)).unwrap();
        let grid = cfg.generate_grid(&mut StdRng::seed_from_u64(4));
        assert_eq!(grid.shape(), (100, 100));

        // Walk along the center row from the platform edge outwards.
        let row = grid.row(50);
        for col in 56..99 {
            assert!(row[col + 1] > row[col], "not increasing at col {col}");
        }
        // Diagonal rings too.
        for d in 6..49 {
            assert!(grid.get(50 + d + 1, 50 + d + 1) > grid.get(50 + d, 50 + d));
        }
    }

    #[test]
    fn platform_is_flat_at_edge_height() {
        let cfg = PyramidSlopedTerrainCfg::new(base_10m(), (0.2, 0.2)).unwrap();
        let grid = cfg.generate_grid(&mut StdRng::seed_from_u64(0));
        let expected = 5.0 * (0.1 * 0.2f64.tan());
        for row in 45..=55 {
            for col in 45..=55 {
                assert_eq!(grid.get(row, col), expected);
            }
        }
        assert!(grid.get(50, 56) > expected);
    }

    #[test]
    fn zero_slope_is_flat() {
        let cfg = PyramidSlopedTerrainCfg::new(base_10m(), (0.0, 0.0)).unwrap();
        let grid = cfg.generate_grid(&mut StdRng::seed_from_u64(0));
        assert!(grid.as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn inverted_is_the_mirror_image() {
        let up = PyramidSlopedTerrainCfg::new(base_10m(), (0.15, 0.3)).unwrap();
        let down = up.clone().with_inverted(true);
        let a = up.generate_grid(&mut StdRng::seed_from_u64(21));
        let b = down.generate_grid(&mut StdRng::seed_from_u64(21));
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_eq!(*x, -*y);
        }
    }

    #[test]
    fn zero_width_platform_has_no_flat_region() {
        let cfg = PyramidSlopedTerrainCfg::new(base_10m(), (0.2, 0.2))
            .unwrap()
            .with_platform_width(0.0)
            .unwrap();
        let grid = cfg.generate_grid(&mut StdRng::seed_from_u64(0));
        assert_eq!(grid.get(50, 50), 0.0);
        assert!(grid.get(50, 51) > 0.0);
    }
}
