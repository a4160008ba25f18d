//! Loading label volumes and fields from disk.
//!
//! NumPy `.npy` files are the supported format. Label volumes are read into
//! [`Label`](crate::labels::Label) arrays from any integer dtype, fields into
//! `f64` arrays from any float or integer dtype.

mod npy;

pub use npy::{is_npy, load_field, load_labels, read_field, read_labels};
