//! Horizontal and temporal grid spacing of a field.

use crate::cube::{Coord, Cube, TIME_COORD, TimeUnits};
use crate::error::{Error, Result};

/// Name of the projected x coordinate.
pub const PROJECTION_X_COORD: &str = "projection_x_coordinate";

/// Name of the projected y coordinate.
pub const PROJECTION_Y_COORD: &str = "projection_y_coordinate";

/// Determine horizontal grid spacing `dxy` (metres) and time spacing `dt` (seconds).
///
/// Without a `grid_spacing` override, `dxy` is the mean of the first step of
/// the projected x and y coordinates, converted to metres. Without a
/// `time_spacing` override, `dt` is the elapsed time between the first two
/// points of the time coordinate.
///
/// # Errors
/// [`Error::MissingSpacing`] if a spacing can neither be derived from the
/// field nor taken from an override.
pub fn get_spacings<T>(
    field: &Cube<T>,
    grid_spacing: Option<f64>,
    time_spacing: Option<f64>,
) -> Result<(f64, f64)> {
    let dxy = match grid_spacing {
        Some(dxy) => dxy,
        None if field.has_coord(PROJECTION_X_COORD) && field.has_coord(PROJECTION_Y_COORD) => {
            let dx = first_step_metres(field.coord(PROJECTION_X_COORD)?)?;
            let dy = first_step_metres(field.coord(PROJECTION_Y_COORD)?)?;
            0.5 * (dx + dy)
        }
        None => {
            return Err(Error::missing_spacing(format!(
                "need either {} and {} coordinates or an explicit grid spacing",
                PROJECTION_X_COORD, PROJECTION_Y_COORD
            )));
        }
    };

    let dt = match time_spacing {
        Some(dt) => dt,
        None => first_time_step_seconds(field)?,
    };

    log::debug!("get_spacings: dxy = {} m, dt = {} s", dxy, dt);
    Ok((dxy, dt))
}

fn first_step_metres(coord: &Coord) -> Result<f64> {
    let points = coord.points();
    if coord.ndim() != 1 || points.len() < 2 {
        return Err(Error::invalid_coordinate(
            coord.name(),
            "need a one-dimensional coordinate with at least two points",
        ));
    }
    let step = points[[1]] - points[[0]];
    Ok(step * metres_per_unit(coord.units())?)
}

/// Conversion factor to metres for a length units string.
///
/// An empty units string is taken as metres.
fn metres_per_unit(units: &str) -> Result<f64> {
    match units.trim() {
        "" | "m" | "metre" | "metres" | "meter" | "meters" => Ok(1.0),
        "km" | "kilometre" | "kilometres" | "kilometer" | "kilometers" => Ok(1000.0),
        other => Err(Error::InvalidUnits {
            units: other.to_string(),
        }),
    }
}

fn first_time_step_seconds<T>(field: &Cube<T>) -> Result<f64> {
    let time = field.coord(TIME_COORD).map_err(|_| {
        Error::missing_spacing("need either a time coordinate or an explicit time spacing")
    })?;
    let points = time.points();
    if time.ndim() != 1 || points.len() < 2 {
        return Err(Error::missing_spacing(
            "time coordinate needs at least two points to derive a time spacing",
        ));
    }
    let units = TimeUnits::parse(time.units())?;
    let t0 = units.num2date(points[[0]])?;
    let t1 = units.num2date(points[[1]])?;
    Ok(t1.seconds_since(t0) as f64)
}
