//! Mask derivation from label volumes.
//!
//! Two families of operators:
//! - `mask_cube*` flag values of a data field as invalid depending on the
//!   collocated label volume
//! - `mask_features*` / `mask_cell*` return a copy of the label volume in
//!   which every label outside a target id set is zeroed, optionally
//!   collapsed to a surface or spread over whole columns
//!
//! Selection is by set membership: a pixel is kept iff its label is one of
//! the target ids. Per-cell operators resolve the cell to its feature ids
//! through the feature table and delegate to the per-feature operators.
//! Inputs are never modified; every operator returns a fresh cube.

mod column;
mod features;
mod field;

use std::collections::HashSet;

use ndarray::ArrayD;

pub use column::column_mask_from_2d;
pub use features::{
    mask_cell, mask_cell_columns, mask_cell_surface, mask_features, mask_features_columns,
    mask_features_surface,
};
pub use field::{mask_cube, mask_cube_cell, mask_cube_features, mask_cube_untracked};

use crate::error::{Error, Result};
use crate::labels::Label;

/// Name given to column masks built from 2D masks.
pub const SEGMENTATION_MASK_NAME: &str = "segmentation_mask";

fn ensure_same_shape(expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        return Err(Error::shape_mismatch(expected, found));
    }
    Ok(())
}

/// `true` wherever the label is one of `ids`.
fn selected(labels: &ArrayD<Label>, ids: &[Label]) -> ArrayD<bool> {
    let ids: HashSet<Label> = ids.iter().copied().collect();
    labels.mapv(|label| ids.contains(&label))
}

/// Combine a new invalid mask with any mask already present.
fn merge_invalid(existing: Option<&ArrayD<bool>>, invalid: ArrayD<bool>) -> ArrayD<bool> {
    match existing {
        Some(existing) => invalid | existing,
        None => invalid,
    }
}
