//! Filtering of label volumes down to selected features or cells.

use ndarray::Axis;

use super::{merge_invalid, selected};
use crate::cube::Cube;
use crate::error::Result;
use crate::labels::Label;
use crate::tracks::FeatureTable;

/// Copy of `labels` in which every label outside `feature_ids` is set to `0`.
///
/// With `masked`, every pixel that ends up as `0` is additionally flagged
/// invalid, so the selected features are the only valid pixels. This is not
/// masking by data value, which would hide the retained labels and leave the
/// background visible. Pixels already flagged invalid in `labels` stay
/// invalid.
pub fn mask_features(
    labels: &Cube<Label>,
    feature_ids: &[Label],
    masked: bool,
) -> Result<Cube<Label>> {
    let mut out = labels.clone();
    zero_unselected(&mut out, feature_ids);
    if masked {
        flag_background(&mut out)?;
    }
    Ok(out)
}

/// Surface projection of the selected features.
///
/// Labels outside `feature_ids` are zeroed, then the vertical axis named by
/// `z_coord` is collapsed by taking the largest label id in each column.
/// Multi-dimensional coordinates that vary along the vertical axis are
/// dropped before collapsing.
pub fn mask_features_surface(
    labels: &Cube<Label>,
    feature_ids: &[Label],
    masked: bool,
    z_coord: &str,
) -> Result<Cube<Label>> {
    let (volume, z_axis) = filtered_volume(labels, feature_ids, z_coord)?;
    let mut surface = volume.collapsed_max(z_axis)?;
    if masked {
        flag_background(&mut surface)?;
    }
    Ok(surface)
}

/// Column projection of the selected features.
///
/// Computes the same surface as [`mask_features_surface`] and writes it back
/// onto every vertical level, so each column carries its surface label at all
/// heights. Coordinates dropped for the surface are absent from the result.
pub fn mask_features_columns(
    labels: &Cube<Label>,
    feature_ids: &[Label],
    masked: bool,
    z_coord: &str,
) -> Result<Cube<Label>> {
    let (mut volume, z_axis) = filtered_volume(labels, feature_ids, z_coord)?;
    let surface = volume.collapsed_max(z_axis)?;

    for mut level in volume.data_mut().axis_iter_mut(Axis(z_axis)) {
        level.assign(surface.data());
    }
    if masked {
        flag_background(&mut volume)?;
    }
    Ok(volume)
}

/// Label volume restricted to the features of one cell.
pub fn mask_cell(
    labels: &Cube<Label>,
    cell: Label,
    track: &FeatureTable,
    masked: bool,
) -> Result<Cube<Label>> {
    mask_features(labels, &track.feature_ids_for_cell(cell), masked)
}

/// Surface projection of the features of one cell.
pub fn mask_cell_surface(
    labels: &Cube<Label>,
    cell: Label,
    track: &FeatureTable,
    masked: bool,
    z_coord: &str,
) -> Result<Cube<Label>> {
    mask_features_surface(labels, &track.feature_ids_for_cell(cell), masked, z_coord)
}

/// Column projection of the features of one cell.
pub fn mask_cell_columns(
    labels: &Cube<Label>,
    cell: Label,
    track: &FeatureTable,
    masked: bool,
    z_coord: &str,
) -> Result<Cube<Label>> {
    mask_features_columns(labels, &track.feature_ids_for_cell(cell), masked, z_coord)
}

fn zero_unselected(labels: &mut Cube<Label>, feature_ids: &[Label]) {
    let keep = selected(labels.data(), feature_ids);
    ndarray::Zip::from(labels.data_mut())
        .and(&keep)
        .for_each(|label, &keep| {
            if !keep {
                *label = 0;
            }
        });
}

fn flag_background(labels: &mut Cube<Label>) -> Result<()> {
    let invalid = labels.data().mapv(|label| label == 0);
    let merged = merge_invalid(labels.mask(), invalid);
    labels.set_mask(merged)
}

/// Zeroed copy of `labels` without coordinates that cannot survive a
/// collapse of the vertical axis, plus the index of that axis.
fn filtered_volume(
    labels: &Cube<Label>,
    feature_ids: &[Label],
    z_coord: &str,
) -> Result<(Cube<Label>, usize)> {
    let z_axis = labels.axis_of(z_coord)?;
    let mut volume = labels.clone();
    zero_unselected(&mut volume, feature_ids);

    let varying: Vec<String> = volume
        .coords()
        .iter()
        .filter(|c| c.ndim() > 1 && c.dims().contains(&z_axis))
        .map(|c| c.name().to_string())
        .collect();
    for name in varying {
        log::debug!("removing coordinate '{}' varying along '{}'", name, z_coord);
        volume.remove_coord(&name);
    }

    Ok((volume, z_axis))
}
