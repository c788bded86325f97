//! Square stones scattered over a pit, placed by rejection sampling.

use std::f64::consts::TAU;
use std::ops::Range;

use rand::Rng;

use super::{center, fill_platform, platform_bounds, uniform, HeightFieldGenerator};
use crate::config::{HfBaseCfg, SteppingStonesTerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

/// A placed stone, in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stone {
    pub center_row: usize,
    pub center_col: usize,
    /// Half the side of the square; the stone covers `center ± radius`
    /// (end exclusive) on both axes.
    pub radius: usize,
    pub height: f64,
}

impl Stone {
    /// Covered rows, clipped at row 0.
    pub fn rows(&self) -> Range<usize> {
        self.center_row.saturating_sub(self.radius)..self.center_row + self.radius
    }

    /// Covered columns, clipped at column 0.
    pub fn cols(&self) -> Range<usize> {
        self.center_col.saturating_sub(self.radius)..self.center_col + self.radius
    }

    /// Covered cells.
    pub fn cell_count(&self) -> usize {
        self.rows().len() * self.cols().len()
    }

    /// Euclidean distance between stone centers, in cells.
    pub fn distance_to(&self, other: &Stone) -> f64 {
        let dr = self.center_row as f64 - other.center_row as f64;
        let dc = self.center_col as f64 - other.center_col as f64;
        dr.hypot(dc)
    }
}

/// What the placement loop actually achieved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StonePlacement {
    pub stones: Vec<Stone>,
    pub target_count: usize,
    pub attempts: usize,
    /// Side of one grid cell, in meters.
    pub cell_size: f64,
    /// Area the stones were meant to cover, in square meters.
    pub target_area: f64,
}

impl StonePlacement {
    /// Stones that could not be placed within the attempt budget.
    pub fn shortfall(&self) -> usize {
        self.target_count.saturating_sub(self.stones.len())
    }

    /// Area actually covered by placed stones, in square meters.
    pub fn achieved_area(&self) -> f64 {
        let cells: usize = self.stones.iter().map(Stone::cell_count).sum();
        cells as f64 * self.cell_size * self.cell_size
    }

    /// Achieved area over target area. A zero target counts as fully covered.
    pub fn coverage(&self) -> f64 {
        if self.target_area > 0.0 {
            self.achieved_area() / self.target_area
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct SteppingStonesReport {
    pub grid: ElevationGrid,
    pub placement: StonePlacement,
}

#[inline]
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

impl SteppingStonesTerrainCfg {
    /// Runs the placement loop and reports every stone placed.
    ///
    /// Candidates are drawn on an annulus around the platform and rejected
    /// when they leave the grid, touch the platform, or come closer than
    /// `r_i + r_j + min_distance` to a placed stone. The loop stops at the
    /// target count or the attempt budget; falling short is not an error.
    pub fn generate_with_report<R: Rng + ?Sized>(&self, rng: &mut R) -> SteppingStonesReport {
        let (rows, cols) = self.base.shape();
        let (cy, cx) = center(rows, cols);
        let platform_cells = self.base.cells(self.platform_width);
        let (platform_rows, platform_cols) = platform_bounds(rows, cols, platform_cells);

        let mut grid = ElevationGrid::filled(rows, cols, self.holes_depth);
        fill_platform(&mut grid, platform_cells, 0.0);

        let target_count = self.target_stone_count();
        let min_gap = self.base.cells(self.stone_min_distance);
        let inner = (platform_cells / 2 + min_gap) as f64;
        let outer = (rows.min(cols) / 2) as f64 - self.base.cells(self.stone_width_range.1) as f64;
        let outer = outer.max(inner);
        let height_range = (0.1 * self.stone_height_max, self.stone_height_max);

        // placed stones never outnumber attempts
        let mut stones: Vec<Stone> =
            Vec::with_capacity(target_count.min(self.max_generation_attempts));
        let mut attempts = 0;
        while stones.len() < target_count && attempts < self.max_generation_attempts {
            attempts += 1;

            let width = uniform(rng, self.stone_width_range);
            let radius = (self.base.cells(width) / 2).max(1);
            let angle = rng.gen_range(0.0..TAU);
            let distance = uniform(rng, (inner, outer));

            // truncate toward zero, then bounds-check in signed space
            let sx = (cx as f64 + distance * angle.cos()) as i64;
            let sy = (cy as f64 + distance * angle.sin()) as i64;
            let r = radius as i64;
            if sx - r < 0 || sy - r < 0 || sx + r >= cols as i64 || sy + r >= rows as i64 {
                continue;
            }

            let candidate = Stone {
                center_row: sy as usize,
                center_col: sx as usize,
                radius,
                height: 0.0,
            };
            if overlaps(&candidate.rows(), &platform_rows)
                && overlaps(&candidate.cols(), &platform_cols)
            {
                continue;
            }
            let too_close = stones.iter().any(|placed| {
                candidate.distance_to(placed) < (placed.radius + radius + min_gap) as f64
            });
            if too_close {
                continue;
            }

            let stone = Stone {
                height: uniform(rng, height_range),
                ..candidate
            };
            grid.fill_rect(stone.rows(), stone.cols(), stone.height);
            stones.push(stone);
        }

        let placement = StonePlacement {
            stones,
            target_count,
            attempts,
            cell_size: self.base.horizontal_scale,
            target_area: self.coverage_area(),
        };
        if placement.shortfall() > 0 {
            log::warn!(
                "stepping stones: placed {}/{} after {} attempts ({:.0}% of target area)",
                placement.stones.len(),
                target_count,
                attempts,
                placement.coverage() * 100.0
            );
        } else {
            log::debug!(
                "stepping stones: placed {} in {} attempts",
                target_count,
                attempts
            );
        }

        SteppingStonesReport { grid, placement }
    }
}

impl HeightFieldGenerator for SteppingStonesTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        SteppingStonesTerrainCfg::validate(self)
    }

    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        self.generate_with_report(rng).grid
    }
}
