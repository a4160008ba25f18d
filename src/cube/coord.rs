//! Named coordinates attached to a cube.

use ndarray::{Array1, ArrayD, IxDyn};

/// A named coordinate spanning zero or more axes of a cube.
///
/// `dims[i]` is the cube axis described by axis `i` of `points`, so the order
/// of `dims` carries the coordinate's own axis order. A 2D coordinate with
/// `dims == [2, 1]` is stored transposed relative to the cube data.
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    name: String,
    points: ArrayD<f64>,
    dims: Vec<usize>,
    units: String,
}

impl Coord {
    /// Create a coordinate from its points and the cube axes it spans.
    pub fn new(name: impl Into<String>, points: ArrayD<f64>, dims: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            points,
            dims,
            units: String::new(),
        }
    }

    /// Create a one-dimensional coordinate along cube axis `dim`.
    pub fn from_vec(name: impl Into<String>, points: Vec<f64>, dim: usize) -> Self {
        Self::new(name, Array1::from(points).into_dyn(), vec![dim])
    }

    /// Create a scalar coordinate that spans no axis.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, ArrayD::from_elem(IxDyn(&[]), value), Vec::new())
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &ArrayD<f64> {
        &self.points
    }

    /// Cube axes spanned by this coordinate, in the coordinate's own axis order.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn ndim(&self) -> usize {
        self.points.ndim()
    }

    pub(crate) fn set_dims(&mut self, dims: Vec<usize>) {
        self.dims = dims;
    }
}
