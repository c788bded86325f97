//! Terrain configuration records.
//!
//! One record per terrain variant. Required quantities are positional
//! arguments of each `new` constructor; optional ones have documented
//! defaults and are changed with the consuming `with_*` methods. Every
//! constructor and setter re-runs `validate()`, so a record that exists is a
//! record that can be generated.
//!
//! Records also derive serde so pools of terrains can be loaded from text.
//! Required fields carry no `#[serde(default)]`, which makes a missing one a
//! deserialization error; loaders must call `validate()` on the result.

use std::f64::consts::FRAC_PI_2;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerance added before flooring meters/spacing, so `0.3 / 0.1` is 3 cells.
const CELL_EPSILON: f64 = 1e-6;

/// Largest grid whose vertices `u32` mesh indices can address.
pub const MAX_GRID_VERTICES: usize = u32::MAX as usize;

/// Tolerance for snapping `noise_range` bounds onto `noise_step` multiples.
const LEVEL_EPSILON: f64 = 1e-9;

/// Number of whole cells of `scale` meters that fit in `length` meters.
///
/// This is the single rounding rule used for grid shapes, platforms, steps,
/// obstacles and stones: floor after a small epsilon. Negative or NaN lengths
/// give 0.
#[inline]
pub fn cells(length: f64, scale: f64) -> usize {
    (length / scale + CELL_EPSILON).floor() as usize
}

fn default_vertical_scale() -> f64 {
    0.005
}
fn default_platform_width() -> f64 {
    1.0
}
fn default_num_waves() -> u32 {
    1
}
fn default_stone_coverage() -> f64 {
    0.15
}
fn default_min_stone_count() -> usize {
    10
}
fn default_max_generation_attempts() -> usize {
    1000
}
fn default_holes_depth() -> f64 {
    -10.0
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn check_within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfBounds {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_range(field: &'static str, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    check_finite(field, min)?;
    check_finite(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

/// Fields shared by every height-field terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HfBaseCfg {
    /// Physical extent `(width, height)` in meters; width runs along columns.
    pub size: (f64, f64),
    /// Flat ring at height 0 around the terrain, in meters. Zero disables it,
    /// otherwise it must be at least one cell wide.
    #[serde(default)]
    pub border_width: f64,
    /// Grid spacing along x and y, in meters per cell.
    pub horizontal_scale: f64,
    /// Height quantum used when encoding the grid as integers, in meters.
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f64,
    /// Rise over run above which mesh faces are made vertical.
    #[serde(default)]
    pub slope_threshold: Option<f64>,
    /// Seed for reproducible generation; `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl HfBaseCfg {
    pub fn new(size: (f64, f64), horizontal_scale: f64) -> Result<Self, ConfigError> {
        let cfg = Self {
            size,
            border_width: 0.0,
            horizontal_scale,
            vertical_scale: default_vertical_scale(),
            slope_threshold: None,
            seed: None,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_border_width(mut self, border_width: f64) -> Result<Self, ConfigError> {
        self.border_width = border_width;
        self.validate()?;
        Ok(self)
    }

    pub fn with_vertical_scale(mut self, vertical_scale: f64) -> Result<Self, ConfigError> {
        self.vertical_scale = vertical_scale;
        self.validate()?;
        Ok(self)
    }

    pub fn with_slope_threshold(mut self, threshold: Option<f64>) -> Result<Self, ConfigError> {
        self.slope_threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("size.x", self.size.0)?;
        check_positive("size.y", self.size.1)?;
        check_positive("horizontal_scale", self.horizontal_scale)?;
        check_positive("vertical_scale", self.vertical_scale)?;
        if let Some(threshold) = self.slope_threshold {
            check_within("slope_threshold", threshold, 0.0, f64::INFINITY)?;
        }

        let (rows, cols) = self.shape();
        if rows < 2 || cols < 2 {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }
        if rows.checked_mul(cols).map_or(true, |n| n > MAX_GRID_VERTICES) {
            return Err(ConfigError::GridTooLarge { rows, cols });
        }

        check_within("border_width", self.border_width, 0.0, f64::INFINITY)?;
        if self.border_width > 0.0 {
            check_within(
                "border_width",
                self.border_width,
                self.horizontal_scale,
                f64::INFINITY,
            )?;
            let border_cells = self.border_cells();
            let interior = 2 * border_cells + 2;
            if rows < interior || cols < interior {
                return Err(ConfigError::BorderTooWide {
                    border_cells,
                    rows,
                    cols,
                });
            }
        }
        Ok(())
    }

    /// Converts a length in meters to whole cells of this grid.
    #[inline]
    pub fn cells(&self, length: f64) -> usize {
        cells(length, self.horizontal_scale)
    }

    pub fn rows(&self) -> usize {
        self.cells(self.size.1)
    }

    pub fn cols(&self) -> usize {
        self.cells(self.size.0)
    }

    /// Grid shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn border_cells(&self) -> usize {
        self.cells(self.border_width)
    }
}

/// Uniform noise quantized to `noise_step`, optionally sampled on a coarser
/// grid and interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomUniformTerrainCfg {
    pub base: HfBaseCfg,
    /// Minimum and maximum height of the noise, in meters.
    pub noise_range: (f64, f64),
    /// Height quantum of the noise samples, in meters.
    pub noise_step: f64,
    /// Spacing of the random samples; `None` samples every cell.
    #[serde(default)]
    pub downsampled_scale: Option<f64>,
}

impl RandomUniformTerrainCfg {
    pub fn new(
        base: HfBaseCfg,
        noise_range: (f64, f64),
        noise_step: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            noise_range,
            noise_step,
            downsampled_scale: None,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_downsampled_scale(mut self, scale: Option<f64>) -> Result<Self, ConfigError> {
        self.downsampled_scale = scale;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_range("noise_range", self.noise_range)?;
        check_positive("noise_step", self.noise_step)?;
        if let Some(scale) = self.downsampled_scale {
            check_positive("downsampled_scale", scale)?;
        }
        if self.quantized_levels().is_none() {
            return Err(ConfigError::NoQuantizedLevel {
                min: self.noise_range.0,
                max: self.noise_range.1,
                step: self.noise_step,
            });
        }
        Ok(())
    }

    /// Integer multipliers `k` such that `k * noise_step` lies in `noise_range`.
    pub fn quantized_levels(&self) -> Option<RangeInclusive<i64>> {
        let (min, max) = self.noise_range;
        let lo = (min / self.noise_step - LEVEL_EPSILON).ceil() as i64;
        let hi = (max / self.noise_step + LEVEL_EPSILON).floor() as i64;
        (lo <= hi).then_some(lo..=hi)
    }

    /// Spacing of the control grid, never finer than the output grid.
    pub fn effective_downsampled_scale(&self) -> f64 {
        self.downsampled_scale
            .unwrap_or(self.base.horizontal_scale)
            .max(self.base.horizontal_scale)
    }
}

/// Square pyramid of constant slope around a flat center platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidSlopedTerrainCfg {
    pub base: HfBaseCfg,
    /// Minimum and maximum slope angle, in radians.
    pub slope_range: (f64, f64),
    /// Side of the square center platform, in meters.
    #[serde(default = "default_platform_width")]
    pub platform_width: f64,
    /// Mirror the field vertically (`h -> -h`).
    #[serde(default)]
    pub inverted: bool,
}

impl PyramidSlopedTerrainCfg {
    pub fn new(base: HfBaseCfg, slope_range: (f64, f64)) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            slope_range,
            platform_width: default_platform_width(),
            inverted: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same record with `inverted` set.
    pub fn inverted(base: HfBaseCfg, slope_range: (f64, f64)) -> Result<Self, ConfigError> {
        Self::new(base, slope_range).map(|cfg| cfg.with_inverted(true))
    }

    pub fn with_platform_width(mut self, platform_width: f64) -> Result<Self, ConfigError> {
        self.platform_width = platform_width;
        self.validate()?;
        Ok(self)
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_range("slope_range", self.slope_range)?;
        // tan() blows up at a right angle
        check_within("slope_range", self.slope_range.0, 0.0, FRAC_PI_2)?;
        check_within("slope_range", self.slope_range.1, 0.0, FRAC_PI_2)?;
        if self.slope_range.1 >= FRAC_PI_2 {
            return Err(ConfigError::OutOfBounds {
                field: "slope_range",
                value: self.slope_range.1,
                min: 0.0,
                max: FRAC_PI_2,
            });
        }
        check_within("platform_width", self.platform_width, 0.0, f64::INFINITY)
    }
}

/// Concentric stair rings around a flat center platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidStairsTerrainCfg {
    pub base: HfBaseCfg,
    /// Minimum and maximum rise of a single step, in meters.
    pub step_height_range: (f64, f64),
    /// Run of a single step, in meters.
    pub step_width: f64,
    #[serde(default = "default_platform_width")]
    pub platform_width: f64,
    /// Mirror the field vertically (`h -> -h`).
    #[serde(default)]
    pub inverted: bool,
}

impl PyramidStairsTerrainCfg {
    pub fn new(
        base: HfBaseCfg,
        step_height_range: (f64, f64),
        step_width: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            step_height_range,
            step_width,
            platform_width: default_platform_width(),
            inverted: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same record with `inverted` set.
    pub fn inverted(
        base: HfBaseCfg,
        step_height_range: (f64, f64),
        step_width: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(base, step_height_range, step_width).map(|cfg| cfg.with_inverted(true))
    }

    pub fn with_platform_width(mut self, platform_width: f64) -> Result<Self, ConfigError> {
        self.platform_width = platform_width;
        self.validate()?;
        Ok(self)
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_range("step_height_range", self.step_height_range)?;
        check_positive("step_width", self.step_width)?;
        check_within("platform_width", self.platform_width, 0.0, f64::INFINITY)
    }
}

/// How obstacle heights are picked from `obstacle_height_range`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleHeightMode {
    /// Uniform in the range.
    #[default]
    Choice,
    /// Always the range maximum.
    Fixed,
}

/// Randomly scattered square blocks; later blocks overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteObstaclesTerrainCfg {
    pub base: HfBaseCfg,
    #[serde(default)]
    pub obstacle_height_mode: ObstacleHeightMode,
    /// Minimum and maximum side of an obstacle, in meters.
    pub obstacle_width_range: (f64, f64),
    /// Minimum and maximum obstacle height, in meters.
    pub obstacle_height_range: (f64, f64),
    pub num_obstacles: usize,
    #[serde(default = "default_platform_width")]
    pub platform_width: f64,
}

impl DiscreteObstaclesTerrainCfg {
    pub fn new(
        base: HfBaseCfg,
        obstacle_width_range: (f64, f64),
        obstacle_height_range: (f64, f64),
        num_obstacles: usize,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            obstacle_height_mode: ObstacleHeightMode::default(),
            obstacle_width_range,
            obstacle_height_range,
            num_obstacles,
            platform_width: default_platform_width(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_height_mode(mut self, mode: ObstacleHeightMode) -> Self {
        self.obstacle_height_mode = mode;
        self
    }

    pub fn with_platform_width(mut self, platform_width: f64) -> Result<Self, ConfigError> {
        self.platform_width = platform_width;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_range("obstacle_width_range", self.obstacle_width_range)?;
        check_within(
            "obstacle_width_range",
            self.obstacle_width_range.0,
            0.0,
            f64::INFINITY,
        )?;
        check_range("obstacle_height_range", self.obstacle_height_range)?;
        check_within("platform_width", self.platform_width, 0.0, f64::INFINITY)
    }
}

/// Sine wave along x, constant along y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTerrainCfg {
    pub base: HfBaseCfg,
    /// Minimum and maximum wave amplitude, in meters.
    pub amplitude_range: (f64, f64),
    /// Full periods across the terrain width.
    #[serde(default = "default_num_waves")]
    pub num_waves: u32,
}

impl WaveTerrainCfg {
    pub fn new(base: HfBaseCfg, amplitude_range: (f64, f64)) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            amplitude_range,
            num_waves: default_num_waves(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_num_waves(mut self, num_waves: u32) -> Self {
        self.num_waves = num_waves;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_range("amplitude_range", self.amplitude_range)
    }
}

/// Square stones rising out of a pit, placed with rejection sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteppingStonesTerrainCfg {
    pub base: HfBaseCfg,
    /// Tallest stone, in meters. Stones are drawn from `[0.1, 1.0]` of it.
    pub stone_height_max: f64,
    /// Minimum and maximum stone side, in meters.
    pub stone_width_range: (f64, f64),
    /// Fraction of the non-platform area the stones should cover.
    #[serde(default = "default_stone_coverage")]
    pub stone_coverage: f64,
    #[serde(default = "default_min_stone_count")]
    pub min_stone_count: usize,
    /// Placement tries before accepting a shortfall.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: usize,
    /// Gap kept between stones, in meters.
    #[serde(default)]
    pub stone_min_distance: f64,
    /// Height of the pit between stones, in meters (negative).
    #[serde(default = "default_holes_depth")]
    pub holes_depth: f64,
    #[serde(default = "default_platform_width")]
    pub platform_width: f64,
}

impl SteppingStonesTerrainCfg {
    pub fn new(
        base: HfBaseCfg,
        stone_height_max: f64,
        stone_width_range: (f64, f64),
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            base,
            stone_height_max,
            stone_width_range,
            stone_coverage: default_stone_coverage(),
            min_stone_count: default_min_stone_count(),
            max_generation_attempts: default_max_generation_attempts(),
            stone_min_distance: 0.0,
            holes_depth: default_holes_depth(),
            platform_width: default_platform_width(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_coverage(mut self, stone_coverage: f64) -> Result<Self, ConfigError> {
        self.stone_coverage = stone_coverage;
        self.validate()?;
        Ok(self)
    }

    pub fn with_min_stone_count(mut self, min_stone_count: usize) -> Self {
        self.min_stone_count = min_stone_count;
        self
    }

    pub fn with_max_generation_attempts(mut self, attempts: usize) -> Self {
        self.max_generation_attempts = attempts;
        self
    }

    pub fn with_min_distance(mut self, stone_min_distance: f64) -> Result<Self, ConfigError> {
        self.stone_min_distance = stone_min_distance;
        self.validate()?;
        Ok(self)
    }

    pub fn with_holes_depth(mut self, holes_depth: f64) -> Result<Self, ConfigError> {
        self.holes_depth = holes_depth;
        self.validate()?;
        Ok(self)
    }

    pub fn with_platform_width(mut self, platform_width: f64) -> Result<Self, ConfigError> {
        self.platform_width = platform_width;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        check_positive("stone_height_max", self.stone_height_max)?;
        check_range("stone_width_range", self.stone_width_range)?;
        check_positive("stone_width_range", self.stone_width_range.0)?;
        check_within("stone_coverage", self.stone_coverage, 0.0, 1.0)?;
        check_within(
            "stone_min_distance",
            self.stone_min_distance,
            0.0,
            f64::INFINITY,
        )?;
        check_finite("holes_depth", self.holes_depth)?;
        check_within("platform_width", self.platform_width, 0.0, f64::INFINITY)
    }

    /// Area the stones should cover, in square meters: `stone_coverage` of
    /// everything outside the platform.
    pub fn coverage_area(&self) -> f64 {
        let terrain_area = self.base.size.0 * self.base.size.1;
        let platform_area = self.platform_width * self.platform_width;
        (terrain_area - platform_area).max(0.0) * self.stone_coverage
    }

    /// Stones needed to reach `stone_coverage`, never below `min_stone_count`.
    pub fn target_stone_count(&self) -> usize {
        let (w_min, w_max) = self.stone_width_range;
        let avg_width = (w_min + w_max) / 2.0;
        let by_coverage = (self.coverage_area() / (avg_width * avg_width)).floor() as usize;
        self.min_stone_count.max(by_coverage)
    }
}

/// Any terrain record, tagged by variant so mixed pools can be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerrainCfg {
    RandomUniform(RandomUniformTerrainCfg),
    PyramidSloped(PyramidSlopedTerrainCfg),
    PyramidStairs(PyramidStairsTerrainCfg),
    DiscreteObstacles(DiscreteObstaclesTerrainCfg),
    Wave(WaveTerrainCfg),
    SteppingStones(SteppingStonesTerrainCfg),
}

impl TerrainCfg {
    pub fn base(&self) -> &HfBaseCfg {
        match self {
            Self::RandomUniform(cfg) => &cfg.base,
            Self::PyramidSloped(cfg) => &cfg.base,
            Self::PyramidStairs(cfg) => &cfg.base,
            Self::DiscreteObstacles(cfg) => &cfg.base,
            Self::Wave(cfg) => &cfg.base,
            Self::SteppingStones(cfg) => &cfg.base,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::RandomUniform(cfg) => cfg.validate(),
            Self::PyramidSloped(cfg) => cfg.validate(),
            Self::PyramidStairs(cfg) => cfg.validate(),
            Self::DiscreteObstacles(cfg) => cfg.validate(),
            Self::Wave(cfg) => cfg.validate(),
            Self::SteppingStones(cfg) => cfg.validate(),
        }
    }

    /// Short variant name, used for logging and default file names.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomUniform(_) => "random_uniform",
            Self::PyramidSloped(cfg) if cfg.inverted => "inverted_pyramid_sloped",
            Self::PyramidSloped(_) => "pyramid_sloped",
            Self::PyramidStairs(cfg) if cfg.inverted => "inverted_pyramid_stairs",
            Self::PyramidStairs(_) => "pyramid_stairs",
            Self::DiscreteObstacles(_) => "discrete_obstacles",
            Self::Wave(_) => "wave",
            Self::SteppingStones(_) => "stepping_stones",
        }
    }
}

macro_rules! impl_from_record {
    ($($variant:ident => $record:ty),* $(,)?) => {
        $(
            impl From<$record> for TerrainCfg {
                fn from(cfg: $record) -> Self {
                    Self::$variant(cfg)
                }
            }
        )*
    };
}

impl_from_record! {
    RandomUniform => RandomUniformTerrainCfg,
    PyramidSloped => PyramidSlopedTerrainCfg,
    PyramidStairs => PyramidStairsTerrainCfg,
    DiscreteObstacles => DiscreteObstaclesTerrainCfg,
    Wave => WaveTerrainCfg,
    SteppingStones => SteppingStonesTerrainCfg,
}
