//! Scalar grids and grid-local coordinates.

use serde::{Deserialize, Serialize};

use crate::{ContourError, ContourResult};

/// Tolerance used when deciding whether two grid points coincide.
pub const POINT_EPSILON: f64 = 1e-10;

/// A position in grid-local space.
///
/// `row` and `col` are fractional sample indices: `(0.0, 0.0)` is the first
/// sample, `(0.5, 0.0)` lies halfway down the left edge of the first cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: f64,
    pub col: f64,
}

impl GridPoint {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Euclidean distance in grid units.
    pub fn distance(&self, other: &GridPoint) -> f64 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        (dr * dr + dc * dc).sqrt()
    }
}

/// Check whether two points coincide within [`POINT_EPSILON`] on both axes.
pub fn points_equal(a: &GridPoint, b: &GridPoint) -> bool {
    (a.row - b.row).abs() < POINT_EPSILON && (a.col - b.col).abs() < POINT_EPSILON
}

/// An immutable rectangular grid of samples in row-major order.
///
/// `NaN` samples mean "no data"; cells touching one are never contoured.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScalarField {
    /// Create a field from row-major samples.
    ///
    /// At least one full cell (2x2 samples) is required.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> ContourResult<Self> {
        if rows < 2 || cols < 2 {
            return Err(ContourError::InvalidGrid(format!(
                "need at least 2x2 samples, got {}x{}",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(ContourError::InvalidGrid(format!(
                "expected {} samples for {}x{}, got {}",
                rows * cols,
                rows,
                cols,
                data.len()
            )));
        }

        Ok(Self { rows, cols, data })
    }

    /// Create a field from nested rows; all rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ContourResult<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ContourError::InvalidGrid(format!(
                "row {} has {} samples, expected {}",
                idx,
                row.len(),
                cols
            )));
        }

        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self::new(n_rows, cols, data)
    }

    /// Build a field by evaluating `f(row, col)` at every sample.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> ContourResult<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self::new(rows, cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Corner samples of the cell whose top-left sample is `(row, col)`,
    /// in TL, TR, BR, BL order.
    ///
    /// Returns `None` for the last row/column, which start no cell.
    pub fn cell_corners(&self, row: usize, col: usize) -> Option<[f64; 4]> {
        if row + 1 >= self.rows || col + 1 >= self.cols {
            return None;
        }
        let top = row * self.cols + col;
        let bottom = top + self.cols;
        Some([
            self.data[top],
            self.data[top + 1],
            self.data[bottom + 1],
            self.data[bottom],
        ])
    }

    /// Observed `(min, max)` over finite samples; `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Rescale finite samples into `[0, 1]`; a flat field maps to all zeros.
    pub fn normalized(&self) -> Self {
        let (min, max) = match self.value_range() {
            Some(range) => range,
            None => return self.clone(),
        };
        let span = max - min;
        let data = self
            .data
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    v
                } else if span > 0.0 {
                    (v - min) / span
                } else {
                    0.0
                }
            })
            .collect();

        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}
