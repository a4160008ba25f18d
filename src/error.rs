//! Error types for masking, indexing and coordinate operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while deriving masks or attaching coordinates.
#[derive(Error, Debug)]
pub enum Error {
    /// Label index extraction was requested on a map without regions
    #[error("No regions in region property map")]
    EmptyRegion,

    /// Neither spacing coordinates nor an explicit override were supplied
    #[error("Missing spacing information: {what}")]
    MissingSpacing {
        /// What could not be determined and how to provide it
        what: String,
    },

    /// Two arrays that must be collocated have different shapes
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape of the reference array
        expected: Vec<usize>,
        /// Shape that was passed in
        found: Vec<usize>,
    },

    /// A named coordinate is not attached to the cube
    #[error("Coordinate not found: {name}")]
    MissingCoordinate {
        /// Name that was looked up
        name: String,
    },

    /// A coordinate does not fit the cube it is attached to
    #[error("Invalid coordinate '{name}': {message}")]
    InvalidCoordinate {
        /// Name of the offending coordinate
        name: String,
        /// Description of the problem
        message: String,
    },

    /// Units string could not be interpreted
    #[error("Unsupported units: '{units}'")]
    InvalidUnits {
        /// The units string as given
        units: String,
    },

    /// The axis layout of a field is not supported by the operation
    #[error("Invalid axes: {message}")]
    InvalidAxes {
        /// Description of the layout problem
        message: String,
    },

    /// A table row references a frame the time coordinate does not have
    #[error("Frame {frame} out of range for time coordinate with {len} points")]
    FrameOutOfRange {
        /// Frame index from the table
        frame: usize,
        /// Number of time points
        len: usize,
    },

    /// A time point does not decode to a date between the years 1 and 9999
    #[error("Time point {value} cannot be converted to a date")]
    TimeOutOfRange {
        /// The stored time value
        value: f64,
    },

    /// A stored label id does not fit the label type
    #[error("Label value {value} out of range")]
    LabelOutOfRange {
        /// The stored value
        value: i64,
    },

    /// Settings were written by a newer, incompatible version
    #[error("Settings version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        /// Version found in the settings file
        file_version: u32,
        /// Highest version this build understands
        supported_version: u32,
    },

    /// I/O error while reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// NumPy array could not be decoded
    #[error("NumPy error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

impl Error {
    /// Create a shape mismatch error from two shapes.
    pub fn shape_mismatch(expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// Create a missing coordinate error.
    pub fn missing_coordinate(name: impl Into<String>) -> Self {
        Self::MissingCoordinate { name: name.into() }
    }

    /// Create an invalid coordinate error.
    pub fn invalid_coordinate(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a missing spacing error.
    pub fn missing_spacing(what: impl Into<String>) -> Self {
        Self::MissingSpacing { what: what.into() }
    }

    /// Create an invalid axes error.
    pub fn invalid_axes(message: impl Into<String>) -> Self {
        Self::InvalidAxes {
            message: message.into(),
        }
    }
}
