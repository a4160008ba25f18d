//! Gridded fields, their coordinates and time decoding.
//!
//! This module provides:
//! - `Cube`: n-dimensional data with named coordinates and an optional mask
//! - `Coord`: a named coordinate spanning any subset of a cube's axes
//! - `TimeUnits` / `Timestamp`: decoding of numeric time coordinates

mod coord;
mod field;
mod time;

pub use coord::Coord;
pub use field::Cube;
pub use time::{TimeUnits, Timestamp};

/// Name of the time coordinate.
pub const TIME_COORD: &str = "time";

/// Default name of the vertical coordinate of model-level data.
pub const DEFAULT_VERTICAL_COORD: &str = "model_level_number";
