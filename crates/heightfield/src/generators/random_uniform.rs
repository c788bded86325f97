//! Quantized uniform noise, optionally sampled coarse and upsampled.

use rand::Rng;

use super::HeightFieldGenerator;
use crate::config::{cells, HfBaseCfg, RandomUniformTerrainCfg};
use crate::error::ConfigError;
use crate::grid::ElevationGrid;

/// Draws the coarse control grid: one sample per `downsampled_scale` meters,
/// each an exact multiple of `noise_step` inside `noise_range`.
pub fn sample_control_grid<R: Rng + ?Sized>(
    cfg: &RandomUniformTerrainCfg,
    rng: &mut R,
) -> ElevationGrid {
    let scale = cfg.effective_downsampled_scale();
    let rows = cells(cfg.base.size.1, scale).max(1);
    let cols = cells(cfg.base.size.0, scale).max(1);
    let Some(levels) = cfg.quantized_levels() else {
        return ElevationGrid::filled(rows, cols, cfg.noise_range.0);
    };
    let step = cfg.noise_step;
    ElevationGrid::from_fn(rows, cols, |_, _| {
        rng.gen_range(levels.clone()) as f64 * step
    })
}

/// Corner-aligned bilinear resize of `src` to `rows × cols`.
///
/// Output corners coincide with input corners, so a same-shape resize returns
/// the input unchanged and every output value lies within the input's range.
pub fn upsample_bilinear(src: &ElevationGrid, rows: usize, cols: usize) -> ElevationGrid {
    let axis = |i: usize, n_out: usize, n_in: usize| -> (usize, usize, f64) {
        if n_out <= 1 || n_in <= 1 {
            return (0, 0, 0.0);
        }
        let pos = i as f64 * (n_in - 1) as f64 / (n_out - 1) as f64;
        let i0 = (pos.floor() as usize).min(n_in - 1);
        let i1 = (i0 + 1).min(n_in - 1);
        (i0, i1, pos - i0 as f64)
    };

    ElevationGrid::from_fn(rows, cols, |row, col| {
        let (r0, r1, ty) = axis(row, rows, src.rows());
        let (c0, c1, tx) = axis(col, cols, src.cols());
        let top = lerp(src.get(r0, c0), src.get(r0, c1), tx);
        let bottom = lerp(src.get(r1, c0), src.get(r1, c1), tx);
        lerp(top, bottom, ty)
    })
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 {
        a
    } else {
        a + (b - a) * t
    }
}

impl HeightFieldGenerator for RandomUniformTerrainCfg {
    fn base(&self) -> &HfBaseCfg {
        &self.base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        RandomUniformTerrainCfg::validate(self)
    }

    fn generate_grid<R: Rng + ?Sized>(&self, rng: &mut R) -> ElevationGrid {
        let control = sample_control_grid(self, rng);
        let (rows, cols) = self.base.shape();
        log::debug!(
            "random uniform: {}x{} control samples -> {}x{} cells",
            control.rows(),
            control.cols(),
            rows,
            cols
        );
        upsample_bilinear(&control, rows, cols)
    }
}
