//! Regular rectilinear grid of scalar samples.

use crate::error::{ContourError, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when matching the missing-value sentinel.
const MISSING_TOLERANCE: f64 = 1e-9;

/// A 2-D field sampled on ascending `x` (columns) and `y` (rows) axes.
///
/// Data is row-major: `data[i * nx + j]` is the sample at `(x[j], y[i])`.
/// Samples that are NaN, infinite or equal to the sentinel are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    x: Vec<f64>,
    y: Vec<f64>,
    data: Vec<f64>,
    missing: Option<f64>,
}

impl Grid {
    /// Create a grid, validating shape and coordinate ordering.
    pub fn new(x: Vec<f64>, y: Vec<f64>, data: Vec<f64>, missing: Option<f64>) -> Result<Self> {
        if data.len() != x.len() * y.len() {
            return Err(ContourError::shape_mismatch(format!(
                "expected {} x {} = {} samples, got {}",
                x.len(),
                y.len(),
                x.len() * y.len(),
                data.len()
            )));
        }
        check_axis("x", &x)?;
        check_axis("y", &y)?;

        Ok(Self {
            x,
            y,
            data,
            missing: missing.filter(|m| !m.is_nan()),
        })
    }

    /// Create a grid from any floating point sample type (f32 or f64).
    pub fn from_values<T: Float>(x: &[T], y: &[T], data: &[T], missing: Option<T>) -> Result<Self> {
        let widen = |values: &[T]| -> Vec<f64> {
            values
                .iter()
                .map(|v| v.to_f64().unwrap_or(f64::NAN))
                .collect()
        };
        Self::new(
            widen(x),
            widen(y),
            widen(data),
            missing.and_then(|m| m.to_f64()),
        )
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn missing(&self) -> Option<f64> {
        self.missing
    }

    /// Copy of this grid with a different missing-value sentinel.
    pub fn with_missing(&self, missing: Option<f64>) -> Self {
        Self {
            missing,
            ..self.clone()
        }
    }

    /// Sample at row `i`, column `j`.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.x.len() + j]
    }

    /// True when the grid has at least one cell.
    pub fn has_cells(&self) -> bool {
        self.x.len() >= 2 && self.y.len() >= 2
    }

    /// True when `v` counts as missing data.
    #[inline]
    pub fn is_missing(&self, v: f64) -> bool {
        if !v.is_finite() {
            return true;
        }
        match self.missing {
            Some(m) => (v - m).abs() <= MISSING_TOLERANCE * m.abs().max(1.0),
            None => false,
        }
    }

    /// True when the sample at (i, j) is present.
    #[inline]
    pub fn is_valid(&self, i: usize, j: usize) -> bool {
        !self.is_missing(self.value(i, j))
    }

    /// True when cell (i, j) exists and all four corners are present.
    pub fn cell_is_valid(&self, i: usize, j: usize) -> bool {
        i + 1 < self.ny()
            && j + 1 < self.nx()
            && self.is_valid(i, j)
            && self.is_valid(i, j + 1)
            && self.is_valid(i + 1, j)
            && self.is_valid(i + 1, j + 1)
    }

    /// Minimum and maximum over present samples, `None` when all are missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &v in &self.data {
            if self.is_missing(v) {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range
    }
}

/// Validity of every sample and every cell, computed once per trace.
#[derive(Debug, Clone)]
pub(crate) struct ValidMask {
    nx: usize,
    ny: usize,
    points: Vec<bool>,
    cells: Vec<bool>,
}

impl ValidMask {
    pub(crate) fn new(grid: &Grid) -> Self {
        let (nx, ny) = (grid.nx(), grid.ny());
        let points: Vec<bool> = grid.data.iter().map(|&v| !grid.is_missing(v)).collect();
        let cell_cols = nx.saturating_sub(1);
        let cell_rows = ny.saturating_sub(1);
        let mut cells = vec![false; cell_rows * cell_cols];
        for i in 0..cell_rows {
            for j in 0..cell_cols {
                cells[i * cell_cols + j] = points[i * nx + j]
                    && points[i * nx + j + 1]
                    && points[(i + 1) * nx + j]
                    && points[(i + 1) * nx + j + 1];
            }
        }
        Self {
            nx,
            ny,
            points,
            cells,
        }
    }

    #[inline]
    pub(crate) fn point(&self, i: usize, j: usize) -> bool {
        self.points[i * self.nx + j]
    }

    /// False for cells outside the grid.
    #[inline]
    pub(crate) fn cell(&self, i: usize, j: usize) -> bool {
        i < self.cell_rows() && j < self.cell_cols() && self.cells[i * self.cell_cols() + j]
    }

    #[inline]
    pub(crate) fn cell_rows(&self) -> usize {
        self.ny.saturating_sub(1)
    }

    #[inline]
    pub(crate) fn cell_cols(&self) -> usize {
        self.nx.saturating_sub(1)
    }

    pub(crate) fn valid_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

fn check_axis(name: &'static str, axis: &[f64]) -> Result<()> {
    if let Some(bad) = axis.iter().position(|v| !v.is_finite()) {
        return Err(ContourError::invalid_value(format!(
            "{} coordinate at index {} is not finite",
            name, bad
        )));
    }
    if let Some(index) = axis.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ContourError::NotMonotonic {
            axis: name,
            index: index + 1,
        });
    }
    Ok(())
}
