//! Masking of data fields by a collocated label volume.

use ndarray::ArrayViewD;

use super::{ensure_same_shape, merge_invalid, selected};
use crate::cube::Cube;
use crate::error::Result;
use crate::labels::Label;
use crate::tracks::FeatureTable;

/// Copy of `field` with every value outside the given features flagged invalid.
///
/// A value stays valid iff its collocated label is one of `feature_ids`; an
/// empty id set therefore masks the whole field.
///
/// # Errors
/// [`crate::Error::ShapeMismatch`] if `field` and `labels` differ in shape.
pub fn mask_cube_features<T: Clone>(
    field: &Cube<T>,
    labels: &Cube<Label>,
    feature_ids: &[Label],
) -> Result<Cube<T>> {
    ensure_same_shape(field.shape(), labels.shape())?;
    let invalid = selected(labels.data(), feature_ids).mapv(|keep| !keep);

    let mut out = field.clone();
    out.set_mask(merge_invalid(field.mask(), invalid))?;
    log::debug!(
        "mask_cube_features: {} of {} values valid for {} feature ids",
        out.valid_count(),
        out.data().len(),
        feature_ids.len()
    );
    Ok(out)
}

/// Copy of `field` restricted to the tracked volume of one cell.
pub fn mask_cube_cell<T: Clone>(
    field: &Cube<T>,
    labels: &Cube<Label>,
    cell: Label,
    track: &FeatureTable,
) -> Result<Cube<T>> {
    let feature_ids = track.feature_ids_for_cell(cell);
    mask_cube_features(field, labels, &feature_ids)
}

/// Copy of `field` with every labeled (tracked) value flagged invalid.
///
/// Only background (label `0`) stays valid.
pub fn mask_cube_untracked<T: Clone>(field: &Cube<T>, labels: &Cube<Label>) -> Result<Cube<T>> {
    ensure_same_shape(field.shape(), labels.shape())?;
    let invalid = labels.data().mapv(|label| label != 0);

    let mut out = field.clone();
    out.set_mask(merge_invalid(field.mask(), invalid))?;
    Ok(out)
}

/// Copy of `field` with values flagged invalid wherever `mask <= 0`.
///
/// Here zero and negative values mean "not selected", unlike the label based
/// operators where only `0` is background.
pub fn mask_cube<T: Clone>(field: &Cube<T>, mask: ArrayViewD<'_, Label>) -> Result<Cube<T>> {
    ensure_same_shape(field.shape(), mask.shape())?;
    let invalid = mask.mapv(|value| value <= 0);

    let mut out = field.clone();
    out.set_mask(merge_invalid(field.mask(), invalid))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::tracks::Feature;
    use ndarray::{Array3, ArrayD, IxDyn};

    /// 1x4x4 volume with a 2x2 square of id 3 at rows 1-2, cols 1-2.
    fn square_labels() -> Cube<Label> {
        let mut data = Array3::<Label>::zeros((1, 4, 4));
        for row in 1..3 {
            for col in 1..3 {
                data[[0, row, col]] = 3;
            }
        }
        Cube::new("segmentation_mask", data.into_dyn())
    }

    fn ramp_field(shape: &[usize]) -> Cube<f64> {
        let len: usize = shape.iter().product();
        let data = ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|v| v as f64).collect())
            .unwrap();
        Cube::new("w", data).with_units("m s-1")
    }

    #[test]
    fn test_square_keeps_four_values() {
        let labels = square_labels();
        let field = ramp_field(&[1, 4, 4]);
        let masked = mask_cube_features(&field, &labels, &[3]).unwrap();
        assert_eq!(masked.valid_count(), 4);
        assert!(!masked.is_masked(&[0, 1, 1]));
        assert!(masked.is_masked(&[0, 0, 0]));
        // Data and metadata are untouched
        assert_eq!(masked.data(), field.data());
        assert_eq!(masked.units(), "m s-1");
        assert!(field.mask().is_none());
    }

    #[test]
    fn test_empty_id_set_masks_everything() {
        let labels = square_labels();
        let field = ramp_field(&[1, 4, 4]);
        let masked = mask_cube_features(&field, &labels, &[]).unwrap();
        assert_eq!(masked.valid_count(), 0);
    }

    #[test]
    fn test_all_present_ids_mask_nothing() {
        let mut labels = square_labels();
        labels.data_mut().mapv_inplace(|v| if v == 0 { 5 } else { v });
        let field = ramp_field(&[1, 4, 4]);
        let masked = mask_cube_features(&field, &labels, &[3, 5]).unwrap();
        assert_eq!(masked.masked_count(), 0);
    }

    #[test]
    fn test_untracked_complements_tracked_selection() {
        let labels = square_labels();
        let field = ramp_field(&[1, 4, 4]);
        let untracked = mask_cube_untracked(&field, &labels).unwrap();
        // 3 is the only positive id in the volume
        let tracked = mask_cube_features(&field, &labels, &[3]).unwrap();

        assert_eq!(untracked.masked_count(), 4);
        let a = untracked.mask().unwrap();
        let b = tracked.mask().unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_ne!(x, y, "masked sets must partition the array");
        }
    }

    #[test]
    fn test_untracked_equals_background_selection() {
        let labels = square_labels();
        let field = ramp_field(&[1, 4, 4]);
        let untracked = mask_cube_untracked(&field, &labels).unwrap();
        let background = mask_cube_features(&field, &labels, &[0]).unwrap();
        assert_eq!(untracked.mask(), background.mask());
    }

    #[test]
    fn test_existing_mask_is_kept() {
        let labels = square_labels();
        let mut field = ramp_field(&[1, 4, 4]);
        let mut invalid = ArrayD::from_elem(IxDyn(&[1, 4, 4]), false);
        invalid[[0, 1, 1]] = true;
        field.set_mask(invalid).unwrap();

        let masked = mask_cube_features(&field, &labels, &[3]).unwrap();
        assert_eq!(masked.valid_count(), 3);
    }

    #[test]
    fn test_cell_resolves_features() {
        let mut data = Array3::<Label>::zeros((2, 3, 3));
        data[[0, 0, 0]] = 1;
        data[[0, 2, 2]] = 2;
        data[[1, 1, 1]] = 3;
        let labels = Cube::new("segmentation_mask", data.into_dyn());
        let field = ramp_field(&[2, 3, 3]);
        let track = FeatureTable::new(vec![
            Feature::new(0, 1, 0.0, 0.0).with_cell(7),
            Feature::new(0, 2, 2.0, 2.0).with_cell(8),
            Feature::new(1, 3, 1.0, 1.0).with_cell(7),
        ]);

        let masked = mask_cube_cell(&field, &labels, 7, &track).unwrap();
        assert_eq!(masked.valid_count(), 2);
        assert!(!masked.is_masked(&[0, 0, 0]));
        assert!(!masked.is_masked(&[1, 1, 1]));
        assert!(masked.is_masked(&[0, 2, 2]));
    }

    #[test]
    fn test_mask_cube_positive_selection() {
        let field = ramp_field(&[2, 2]);
        let mask = ndarray::array![[0, 2], [-1, 1]].into_dyn();
        let masked = mask_cube(&field, mask.view()).unwrap();
        assert!(masked.is_masked(&[0, 0]));
        assert!(!masked.is_masked(&[0, 1]));
        assert!(masked.is_masked(&[1, 0]));
        assert!(!masked.is_masked(&[1, 1]));
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let labels = square_labels();
        let field = ramp_field(&[1, 4, 5]);
        assert!(matches!(
            mask_cube_features(&field, &labels, &[3]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(mask_cube_untracked(&field, &labels).is_err());
    }
}
