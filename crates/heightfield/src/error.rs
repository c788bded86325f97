//! Configuration errors raised before any terrain is generated.

use thiserror::Error;

/// A terrain record that cannot be generated.
///
/// Every variant is produced by `validate()` (or by deserialization for
/// records loaded from text), never by the generators themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("`{field}` = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("grid of {rows}x{cols} cells is too small, at least 2x2 is required")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("a {rows}x{cols} grid has more vertices than 32-bit mesh indices can address")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("border of {border_cells} cells leaves no interior in a {rows}x{cols} grid")]
    BorderTooWide {
        border_cells: usize,
        rows: usize,
        cols: usize,
    },

    #[error("`noise_range` [{min}, {max}] contains no multiple of `noise_step` {step}")]
    NoQuantizedLevel { min: f64, max: f64, step: f64 },
}
