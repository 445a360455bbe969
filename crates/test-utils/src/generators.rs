//! Test data generators for creating synthetic scalar fields.
//!
//! These generators create predictable, verifiable patterns together with
//! their coordinate axes so they can be fed straight into a contour grid.
//! Data is row-major: `data[row * nx + col]` sits at `(x[col], y[row])`.

/// A synthetic field with its coordinate axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticField {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub data: Vec<f64>,
}

impl SyntheticField {
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Value at (row, col).
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.nx() + col]
    }

    /// Minimum and maximum over non-NaN samples.
    pub fn range(&self) -> (f64, f64) {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Replace a rectangular block of samples with `missing`.
    ///
    /// `cols` and `rows` are half-open index ranges.
    pub fn with_hole(
        mut self,
        cols: std::ops::Range<usize>,
        rows: std::ops::Range<usize>,
        missing: f64,
    ) -> Self {
        let nx = self.nx();
        for row in rows.clone() {
            for col in cols.clone() {
                if col < nx && row < self.ny() {
                    self.data[row * nx + col] = missing;
                }
            }
        }
        self
    }
}

/// Evenly spaced ascending axis.
pub fn axis(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Fill a field from a function of (x, y).
pub fn create_field<F>(x: Vec<f64>, y: Vec<f64>, f: F) -> SyntheticField
where
    F: Fn(f64, f64) -> f64,
{
    let mut data = Vec::with_capacity(x.len() * y.len());
    for &yv in &y {
        for &xv in &x {
            data.push(f(xv, yv));
        }
    }
    SyntheticField { x, y, data }
}

/// Creates a single Gaussian peak of height 100 centred in the grid.
///
/// Axes are unit-spaced indices, so closed contours form around the centre.
pub fn create_peak_field(nx: usize, ny: usize) -> SyntheticField {
    let cx = (nx as f64 - 1.0) / 2.0;
    let cy = (ny as f64 - 1.0) / 2.0;
    let sigma = (nx.min(ny) as f64 / 4.0).max(0.5);
    create_field(axis(nx, 0.0, 1.0), axis(ny, 0.0, 1.0), |x, y| {
        let d2 = (x - cx).powi(2) + (y - cy).powi(2);
        100.0 * (-d2 / (2.0 * sigma * sigma)).exp()
    })
}

/// Creates a saddle `(x - cx) * (y - cy)` with four lobes.
pub fn create_saddle_field(nx: usize, ny: usize) -> SyntheticField {
    let cx = (nx as f64 - 1.0) / 2.0;
    let cy = (ny as f64 - 1.0) / 2.0;
    create_field(axis(nx, 0.0, 1.0), axis(ny, 0.0, 1.0), |x, y| {
        (x - cx) * (y - cy)
    })
}

/// Creates a west-to-east linear gradient from 0 to 100.
pub fn create_gradient_field(nx: usize, ny: usize) -> SyntheticField {
    let span = (nx.max(2) - 1) as f64;
    create_field(axis(nx, 0.0, 1.0), axis(ny, 0.0, 1.0), |x, _| {
        x / span * 100.0
    })
}

/// Creates a temperature-like field with hills and valleys.
///
/// Multiple overlapping sine waves give a realistic pattern with many
/// closed and open contours.
pub fn create_wave_field(nx: usize, ny: usize) -> SyntheticField {
    let w = nx.max(1) as f64;
    let h = ny.max(1) as f64;
    create_field(axis(nx, 0.0, 1.0), axis(ny, 0.0, 1.0), |x, y| {
        let fx = x / w;
        let fy = y / h;
        let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
        let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
        let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;
        50.0 + v1 + v2 + v3
    })
}

/// Creates a deterministic pseudo-random field in [0, 100).
///
/// Uses a simple hash-based approach for reproducibility. Random fields
/// are full of saddles, which makes them good stress input.
pub fn create_noise_field(nx: usize, ny: usize, seed: u32) -> SyntheticField {
    let mut data = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push((hash % 10_000) as f64 / 100.0);
        }
    }
    SyntheticField {
        x: axis(nx, 0.0, 1.0),
        y: axis(ny, 0.0, 1.0),
        data,
    }
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(nx: usize, ny: usize, value: f64) -> SyntheticField {
    create_field(axis(nx, 0.0, 1.0), axis(ny, 0.0, 1.0), |_, _| value)
}

/// Sets NaN at the listed (col, row) positions.
pub fn with_nans(mut field: SyntheticField, positions: &[(usize, usize)]) -> SyntheticField {
    let nx = field.nx();
    for &(col, row) in positions {
        if col < nx && row < field.ny() {
            field.data[row * nx + col] = f64::NAN;
        }
    }
    field
}
