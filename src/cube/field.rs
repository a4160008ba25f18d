//! Gridded field with named coordinates and an optional invalid-value mask.

use ndarray::{ArrayD, Axis, Zip};

use super::coord::Coord;
use crate::error::{Error, Result};

/// An n-dimensional array with coordinate metadata.
///
/// The optional `mask` has the same shape as `data`; `true` marks an invalid
/// value. Units are carried along as opaque strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube<T> {
    name: String,
    units: String,
    data: ArrayD<T>,
    mask: Option<ArrayD<bool>>,
    coords: Vec<Coord>,
}

impl<T> Cube<T> {
    /// Create a cube without coordinates or mask.
    pub fn new(name: impl Into<String>, data: ArrayD<T>) -> Self {
        Self {
            name: name.into(),
            units: String::new(),
            data,
            mask: None,
            coords: Vec::new(),
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Attach a coordinate, builder style.
    pub fn with_coord(mut self, coord: Coord) -> Result<Self> {
        self.add_coord(coord)?;
        Ok(self)
    }

    /// Attach a coordinate after checking it against the data shape.
    ///
    /// Replaces any existing coordinate of the same name.
    pub fn add_coord(&mut self, coord: Coord) -> Result<()> {
        if coord.ndim() != coord.dims().len() {
            return Err(Error::invalid_coordinate(
                coord.name(),
                format!(
                    "{} dimensional points mapped onto {} axes",
                    coord.ndim(),
                    coord.dims().len()
                ),
            ));
        }
        for (i, &dim) in coord.dims().iter().enumerate() {
            let Some(&len) = self.data.shape().get(dim) else {
                return Err(Error::invalid_coordinate(
                    coord.name(),
                    format!("axis {} does not exist in a {}D cube", dim, self.ndim()),
                ));
            };
            if coord.points().shape()[i] != len {
                return Err(Error::invalid_coordinate(
                    coord.name(),
                    format!(
                        "length {} along axis {} does not match cube length {}",
                        coord.points().shape()[i],
                        dim,
                        len
                    ),
                ));
            }
        }
        self.remove_coord(coord.name());
        self.coords.push(coord);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArrayD<T> {
        &mut self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Look up a coordinate by name.
    pub fn coord(&self, name: &str) -> Result<&Coord> {
        self.coords
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::missing_coordinate(name))
    }

    pub fn has_coord(&self, name: &str) -> bool {
        self.coords.iter().any(|c| c.name() == name)
    }

    /// Cube axes spanned by the named coordinate.
    pub fn coord_dims(&self, name: &str) -> Result<&[usize]> {
        self.coord(name).map(Coord::dims)
    }

    /// Axis of the cube along which the named one-dimensional coordinate runs.
    pub fn axis_of(&self, name: &str) -> Result<usize> {
        match self.coord_dims(name)? {
            [dim] => Ok(*dim),
            dims => Err(Error::invalid_coordinate(
                name,
                format!("expected a coordinate along one axis, found {} axes", dims.len()),
            )),
        }
    }

    pub fn remove_coord(&mut self, name: &str) -> Option<Coord> {
        let index = self.coords.iter().position(|c| c.name() == name)?;
        Some(self.coords.remove(index))
    }

    pub fn mask(&self) -> Option<&ArrayD<bool>> {
        self.mask.as_ref()
    }

    /// Set the invalid-value mask; it must match the data shape.
    pub fn set_mask(&mut self, mask: ArrayD<bool>) -> Result<()> {
        if mask.shape() != self.shape() {
            return Err(Error::shape_mismatch(self.shape(), mask.shape()));
        }
        self.mask = Some(mask);
        Ok(())
    }

    pub fn clear_mask(&mut self) {
        self.mask = None;
    }

    /// Whether the element at `index` is flagged invalid.
    pub fn is_masked(&self, index: &[usize]) -> bool {
        self.mask
            .as_ref()
            .and_then(|m| m.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of invalid elements.
    pub fn masked_count(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |m| m.iter().filter(|&&invalid| invalid).count())
    }

    /// Number of valid elements.
    pub fn valid_count(&self) -> usize {
        self.data.len() - self.masked_count()
    }

    /// Copy of this cube's metadata around new data of the same shape.
    pub(crate) fn with_data<U>(&self, data: ArrayD<U>) -> Cube<U> {
        debug_assert_eq!(data.shape(), self.shape());
        Cube {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            mask: self.mask.clone(),
            coords: self.coords.clone(),
        }
    }
}

impl<T: Copy + PartialOrd> Cube<T> {
    /// Collapse `axis` by taking the maximum along it.
    ///
    /// A one-dimensional coordinate on the collapsed axis becomes a scalar
    /// holding the midpoint of its first and last points. Multi-dimensional
    /// coordinates spanning the axis are dropped; all other coordinates keep
    /// their axes, renumbered. Invalid elements do not take part in the
    /// maximum. An output element is invalid only if every input element
    /// along the axis was invalid; it then holds the first input element.
    pub fn collapsed_max(&self, axis: usize) -> Result<Cube<T>> {
        let len = *self.shape().get(axis).ok_or_else(|| {
            Error::invalid_axes(format!("axis {} does not exist in a {}D cube", axis, self.ndim()))
        })?;
        if len == 0 {
            return Err(Error::invalid_axes(format!("cannot collapse empty axis {}", axis)));
        }

        let data = match &self.mask {
            None => self
                .data
                .map_axis(Axis(axis), |lane| max_of(lane.iter().copied()).unwrap_or(lane[0])),
            Some(mask) => Zip::from(self.data.lanes(Axis(axis)))
                .and(mask.lanes(Axis(axis)))
                .map_collect(|lane, invalid| {
                    let valid = lane
                        .iter()
                        .zip(invalid.iter())
                        .filter(|&(_, &invalid)| !invalid)
                        .map(|(&v, _)| v);
                    max_of(valid).unwrap_or(lane[0])
                }),
        };
        let mask = self
            .mask
            .as_ref()
            .map(|m| m.map_axis(Axis(axis), |lane| lane.iter().all(|&invalid| invalid)));

        let mut coords = Vec::with_capacity(self.coords.len());
        for coord in &self.coords {
            if coord.dims() == [axis] {
                let points = coord.points();
                let midpoint = 0.5 * (points[[0]] + points[[len - 1]]);
                coords.push(Coord::scalar(coord.name(), midpoint).with_units(coord.units()));
            } else if coord.dims().contains(&axis) {
                log::debug!(
                    "collapsed_max: dropping coordinate '{}' spanning axis {}",
                    coord.name(),
                    axis
                );
            } else {
                let mut coord = coord.clone();
                let dims = coord
                    .dims()
                    .iter()
                    .map(|&d| if d > axis { d - 1 } else { d })
                    .collect();
                coord.set_dims(dims);
                coords.push(coord);
            }
        }

        Ok(Cube {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            mask,
            coords,
        })
    }
}

fn max_of<T: PartialOrd>(values: impl Iterator<Item = T>) -> Option<T> {
    values.reduce(|acc, v| if v > acc { v } else { acc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, IxDyn, array};

    fn level_cube() -> Cube<i32> {
        let mut data = Array3::<i32>::zeros((2, 3, 4));
        data[[0, 1, 2]] = 5;
        data[[1, 2, 2]] = 7;
        Cube::new("labels", data.into_dyn())
            .with_coord(Coord::from_vec("time", vec![0.0, 1.0], 0))
            .unwrap()
            .with_coord(Coord::from_vec("model_level_number", vec![1.0, 2.0, 3.0], 1))
            .unwrap()
            .with_coord(Coord::new(
                "altitude",
                array![[10.0, 10.0, 10.0, 10.0], [20.0, 20.0, 20.0, 20.0], [30.0, 30.0, 30.0, 30.0]]
                    .into_dyn(),
                vec![1, 2],
            ))
            .unwrap()
            .with_coord(Coord::from_vec("x", vec![0.0, 1.0, 2.0, 3.0], 2))
            .unwrap()
    }

    #[test]
    fn test_add_coord_validates_shape() {
        let cube = Cube::new("f", Array3::<f64>::zeros((2, 3, 4)).into_dyn());
        let err = cube
            .clone()
            .with_coord(Coord::from_vec("x", vec![0.0, 1.0, 2.0], 2))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
        assert!(cube.with_coord(Coord::from_vec("x", vec![0.0; 4], 5)).is_err());
    }

    #[test]
    fn test_coord_lookup() {
        let mut cube = level_cube();
        assert_eq!(cube.coord_dims("altitude").unwrap(), &[1, 2]);
        assert_eq!(cube.axis_of("model_level_number").unwrap(), 1);
        assert!(cube.axis_of("altitude").is_err());
        assert!(matches!(cube.coord("nope"), Err(Error::MissingCoordinate { .. })));
        assert!(cube.remove_coord("x").is_some());
        assert!(!cube.has_coord("x"));
    }

    #[test]
    fn test_collapsed_max() {
        let cube = level_cube();
        let surface = cube.collapsed_max(1).unwrap();
        assert_eq!(surface.shape(), &[2, 4]);
        assert_eq!(surface.data()[[0, 2]], 5);
        assert_eq!(surface.data()[[1, 2]], 7);
        assert_eq!(surface.data()[[1, 0]], 0);

        let level = surface.coord("model_level_number").unwrap();
        assert!(level.dims().is_empty());
        assert_eq!(level.points()[IxDyn(&[])], 2.0);
        assert!(!surface.has_coord("altitude"));
        assert_eq!(surface.coord_dims("x").unwrap(), &[1]);
        assert_eq!(surface.coord_dims("time").unwrap(), &[0]);
    }

    #[test]
    fn test_collapsed_max_skips_invalid_values() {
        let mut cube = level_cube();
        cube.data_mut()[[0, 0, 2]] = 9;
        cube.data_mut()[[1, 0, 0]] = 4;
        let mut invalid = ArrayD::from_elem(IxDyn(&[2, 3, 4]), false);
        invalid[[0, 0, 2]] = true;
        for level in 0..3 {
            invalid[[1, level, 0]] = true;
        }
        cube.set_mask(invalid).unwrap();

        let surface = cube.collapsed_max(1).unwrap();
        // The invalid 9 is ignored in favour of the valid 5
        assert_eq!(surface.data()[[0, 2]], 5);
        assert!(!surface.is_masked(&[0, 2]));
        // A fully invalid column keeps its first element and stays invalid
        assert_eq!(surface.data()[[1, 0]], 4);
        assert!(surface.is_masked(&[1, 0]));
        assert_eq!(surface.data()[[1, 2]], 7);
    }

    #[test]
    fn test_mask_counts() {
        let mut cube = level_cube();
        assert_eq!(cube.masked_count(), 0);
        let mask = cube.data().mapv(|v| v == 0);
        cube.set_mask(mask).unwrap();
        assert_eq!(cube.valid_count(), 2);
        assert!(!cube.is_masked(&[0, 1, 2]));
        assert!(cube.is_masked(&[0, 0, 0]));
        assert!(cube.set_mask(ArrayD::from_elem(IxDyn(&[2, 3]), false)).is_err());
    }
}
