//! cellmask - Feature masks and coordinates for tracked cells
//!
//! Derives masks of labeled regions (features) in gridded fields, projects
//! them onto surfaces and vertical columns, finds bounding boxes and grid
//! spacings, and attaches interpolated field coordinates to feature tables.
//!
//! ## Modules
//!
//! - [`labels`]: pixel indices of labeled regions
//! - [`bbox`]: buffered bounding boxes of nonzero regions
//! - [`mask`]: masks of selected features and cells
//! - [`spacing`]: horizontal and temporal grid spacing
//! - [`coords`]: coordinate attachment to feature tables
//! - [`cube`], [`tracks`]: field and feature table containers
//! - [`config`], [`data`]: settings and `.npy` loading

pub mod bbox;
pub mod config;
pub mod coords;
pub mod cube;
pub mod data;
pub mod error;
pub mod labels;
pub mod mask;
pub mod spacing;
pub mod tracks;

pub use bbox::{DEFAULT_BBOX_BUFFER, get_bounding_box};
pub use config::Settings;
pub use coords::add_coordinates;
pub use cube::{Coord, Cube, TimeUnits, Timestamp};
pub use error::{Error, Result};
pub use labels::{Label, indices_of_labels_from_reg_prop_dict, label_props_in_dict};
pub use spacing::get_spacings;
pub use tracks::{Feature, FeatureTable};

#[cfg(test)]
mod tests;
