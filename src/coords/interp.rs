//! Interpolation of coordinate samples taken at integer pixel indices.

use ndarray::Array2;

/// Piecewise linear interpolant over samples at indices `0, 1, .., n - 1`.
///
/// Positions outside the sampled range are extrapolated from the first or
/// last interval.
#[derive(Debug, Clone)]
pub struct IndexInterp1d {
    values: Vec<f64>,
}

impl IndexInterp1d {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Evaluate at a fractional index.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.values.len() {
            0 => f64::NAN,
            1 => self.values[0],
            n => {
                let i = find_interval(x, n);
                let (y0, y1) = (self.values[i], self.values[i + 1]);
                y0 + (x - i as f64) * (y1 - y0)
            }
        }
    }
}

/// Bilinear interpolant over a grid sampled at integer `(row, col)` indices.
///
/// Positions outside the grid take the value at the nearest edge.
#[derive(Debug, Clone)]
pub struct IndexInterp2d {
    values: Array2<f64>,
}

impl IndexInterp2d {
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Evaluate at a fractional `(row, col)` position.
    pub fn evaluate(&self, row: f64, col: f64) -> f64 {
        let (rows, cols) = self.values.dim();
        if rows == 0 || cols == 0 {
            return f64::NAN;
        }
        let (r0, r1, tr) = bracket(row, rows);
        let (c0, c1, tc) = bracket(col, cols);

        let v = &self.values;
        let top = v[[r0, c0]] + tc * (v[[r0, c1]] - v[[r0, c0]]);
        let bottom = v[[r1, c0]] + tc * (v[[r1, c1]] - v[[r1, c0]]);
        top + tr * (bottom - top)
    }
}

/// Index `i` of the interval `[i, i + 1]` used for `x`, for `n >= 2` samples.
fn find_interval(x: f64, n: usize) -> usize {
    if x <= 0.0 || x.is_nan() {
        0
    } else {
        (x.floor() as usize).min(n - 2)
    }
}

/// Neighbouring indices and weight of `x` clamped to `[0, n - 1]`.
fn bracket(x: f64, n: usize) -> (usize, usize, f64) {
    if n == 1 {
        return (0, 0, 0.0);
    }
    let x = x.clamp(0.0, (n - 1) as f64);
    let i = find_interval(x, n);
    (i, i + 1, x - i as f64)
}
