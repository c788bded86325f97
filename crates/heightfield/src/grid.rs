//! Row-major elevation grid.

/// Heights in meters on a regular lattice, stored row-major.
///
/// Rows run along y and columns along x. Generators build a grid with the
/// crate-private mutators and hand it out by value; callers only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    heights: Vec<f64>,
}

impl ElevationGrid {
    /// A grid with every cell at `height`.
    pub fn filled(rows: usize, cols: usize, height: f64) -> Self {
        Self {
            rows,
            cols,
            heights: vec![height; rows * cols],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Builds a grid from `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut heights = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                heights.push(f(row, col));
            }
        }
        Self {
            rows,
            cols,
            heights,
        }
    }

    /// Wraps row-major heights. Returns `None` if the length does not match.
    pub fn from_vec(rows: usize, cols: usize, heights: Vec<f64>) -> Option<Self> {
        (heights.len() == rows * cols).then_some(Self {
            rows,
            cols,
            heights,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.heights[self.index(row, col)]
    }

    /// Row-major heights.
    pub fn as_slice(&self) -> &[f64] {
        &self.heights
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.heights[start..start + self.cols]
    }

    /// Minimum and maximum height, ignoring NaNs.
    pub fn height_bounds(&self) -> (f64, f64) {
        self.heights
            .iter()
            .filter(|h| !h.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Heights as integer multiples of `vertical_scale`, rounded to nearest
    /// and saturated into `i16`. This is the encoding simulator height-field
    /// loaders expect.
    pub fn quantized(&self, vertical_scale: f64) -> Vec<i16> {
        self.heights
            .iter()
            .map(|h| (h / vertical_scale).round() as i16)
            .collect()
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, height: f64) {
        let idx = self.index(row, col);
        self.heights[idx] = height;
    }

    /// Sets every cell of `rows × cols` (half-open, clamped to the grid).
    pub(crate) fn fill_rect(
        &mut self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
        height: f64,
    ) {
        let row_end = rows.end.min(self.rows);
        let col_end = cols.end.min(self.cols);
        for row in rows.start..row_end {
            for col in cols.start..col_end {
                self.set(row, col, height);
            }
        }
    }

    /// Sets a ring `width` cells wide along every edge to 0.
    pub(crate) fn flatten_border(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        let (rows, cols) = self.shape();
        self.fill_rect(0..width, 0..cols, 0.0);
        self.fill_rect(rows.saturating_sub(width)..rows, 0..cols, 0.0);
        self.fill_rect(0..rows, 0..width, 0.0);
        self.fill_rect(0..rows, cols.saturating_sub(width)..cols, 0.0);
    }
}
