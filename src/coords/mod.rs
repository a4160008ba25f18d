//! Attaching field coordinates to feature tables.
//!
//! Features are located by fractional pixel positions (`hdim_1`, `hdim_2`).
//! [`add_coordinates`] turns those into physical coordinate values by
//! interpolating every coordinate of the field at each feature position, and
//! adds the absolute time of each feature's frame.

mod axis;
mod interp;

use ndarray::{Axis, Ix2};

pub use axis::{AxisOrder, AxisRole, AxisRoles, PlaneOrder};
pub use interp::{IndexInterp1d, IndexInterp2d};

use crate::cube::{Coord, Cube, TIME_COORD, TimeUnits, Timestamp};
use crate::error::{Error, Result};
use crate::tracks::{Feature, FeatureTable};

/// Fitted interpolant for one coordinate.
enum Interpolant {
    Hdim1(IndexInterp1d),
    Hdim2(IndexInterp1d),
    Grid(IndexInterp2d),
}

impl Interpolant {
    fn fit(coord: &Coord, order: AxisOrder) -> Result<Self> {
        let points = coord.points();
        let interpolant = match order {
            AxisOrder::AlongHdim1 => {
                Self::Hdim1(IndexInterp1d::new(points.iter().copied().collect()))
            }
            AxisOrder::AlongHdim2 => {
                Self::Hdim2(IndexInterp1d::new(points.iter().copied().collect()))
            }
            AxisOrder::Plane(plane) => Self::Grid(plane_interp(coord, points.view(), plane)?),
            // Assumes the horizontal coordinate does not change with time
            AxisOrder::Volume { time_pos, plane } => {
                let first = points.index_axis(Axis(time_pos), 0);
                Self::Grid(plane_interp(coord, first, plane)?)
            }
        };
        Ok(interpolant)
    }

    fn evaluate(&self, feature: &Feature) -> f64 {
        match self {
            Self::Hdim1(f) => f.evaluate(feature.hdim_1),
            Self::Hdim2(f) => f.evaluate(feature.hdim_2),
            Self::Grid(f) => f.evaluate(feature.hdim_1, feature.hdim_2),
        }
    }
}

fn plane_interp(
    coord: &Coord,
    points: ndarray::ArrayViewD<'_, f64>,
    plane: PlaneOrder,
) -> Result<IndexInterp2d> {
    let points = points
        .into_dimensionality::<Ix2>()
        .map_err(|e| Error::invalid_coordinate(coord.name(), e.to_string()))?;
    let grid = match plane {
        PlaneOrder::Hdim1First => points.to_owned(),
        PlaneOrder::Hdim2First => points.t().to_owned(),
    };
    Ok(IndexInterp2d::new(grid))
}

/// Add time and interpolated coordinate values to every feature.
///
/// `field` must have a time axis and two horizontal axes, in any order, and a
/// one-dimensional `time` coordinate with CF-style units. Each feature gets
/// `time` and `timestr` for its frame and one entry per other coordinate of
/// the field, named like the coordinate. Coordinates are interpolated from
/// pixel index to value:
/// - along one horizontal axis: linearly, extrapolating beyond the grid
/// - over both horizontal axes: bilinearly, nearest edge value beyond the grid
/// - over time and both horizontal axes: as above, using the first time step
///
/// Coordinates with any other layout are skipped. The input table is left
/// unchanged; the annotated copy is returned.
///
/// # Errors
/// - [`Error::InvalidAxes`] if the field is not three dimensional
/// - [`Error::MissingCoordinate`] / [`Error::InvalidUnits`] for an absent or
///   undecodable time coordinate
/// - [`Error::TimeOutOfRange`] if a time point cannot be decoded to a date
/// - [`Error::FrameOutOfRange`] if a feature's frame has no time point
pub fn add_coordinates<T>(table: &FeatureTable, field: &Cube<T>) -> Result<FeatureTable> {
    log::debug!("start adding coordinates from cube");
    let roles = AxisRoles::of(field)?;

    let time = field.coord(TIME_COORD)?;
    let units = TimeUnits::parse(time.units())?;
    let times = time
        .points()
        .iter()
        .map(|&p| units.num2date(p))
        .collect::<Result<Vec<Timestamp>>>()?;

    let mut out = table.clone();
    for feature in out.iter_mut() {
        let timestamp = *times.get(feature.frame).ok_or(Error::FrameOutOfRange {
            frame: feature.frame,
            len: times.len(),
        })?;
        feature.time = Some(timestamp);
        feature.timestr = Some(timestamp.to_string());
    }
    log::debug!("time coordinate added");

    for coord in field.coords().iter().filter(|c| c.name() != TIME_COORD) {
        let Some(order) = AxisOrder::classify(coord.dims(), &roles) else {
            log::warn!(
                "skipping coord '{}': axes {:?} have no horizontal layout",
                coord.name(),
                coord.dims()
            );
            continue;
        };

        let interpolant = Interpolant::fit(coord, order)?;
        for feature in out.iter_mut() {
            let value = interpolant.evaluate(feature);
            feature.coords.insert(coord.name().to_string(), value);
        }
        log::debug!("added coord: {} ({:?})", coord.name(), order);
    }

    Ok(out)
}
