//! Expansion of 2D masks into whole-column 3D masks.

use ndarray::Axis;

use super::{SEGMENTATION_MASK_NAME, ensure_same_shape};
use crate::cube::Cube;
use crate::error::Result;
use crate::labels::Label;

/// Turn a 2D segmentation mask into a mask of whole vertical columns.
///
/// `template` provides the output shape and metadata; its vertical axis is
/// found through the `z_coord` coordinate. `mask_2d` must have the template's
/// shape with the vertical axis removed and is copied onto every level. The
/// result is named `segmentation_mask`.
pub fn column_mask_from_2d<T>(
    mask_2d: &Cube<Label>,
    template: &Cube<T>,
    z_coord: &str,
) -> Result<Cube<Label>> {
    let z_axis = template.axis_of(z_coord)?;
    let mut horizontal_shape = template.shape().to_vec();
    let levels = horizontal_shape.remove(z_axis);
    ensure_same_shape(&horizontal_shape, mask_2d.shape())?;

    let mut data = ndarray::ArrayD::<Label>::zeros(template.shape());
    for mut level in data.axis_iter_mut(Axis(z_axis)) {
        level.assign(mask_2d.data());
    }
    log::debug!(
        "column_mask_from_2d: expanded {:?} mask over {} levels of '{}'",
        mask_2d.shape(),
        levels,
        z_coord
    );

    let mut mask_3d = template.with_data(data);
    mask_3d.clear_mask();
    mask_3d.rename(SEGMENTATION_MASK_NAME);
    Ok(mask_3d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Coord, DEFAULT_VERTICAL_COORD};
    use crate::error::Error;
    use ndarray::{Array3, array};

    fn template() -> Cube<f64> {
        Cube::new("w", Array3::<f64>::zeros((2, 3, 4)).into_dyn())
            .with_units("m s-1")
            .with_coord(Coord::from_vec(DEFAULT_VERTICAL_COORD, vec![1.0, 2.0, 3.0], 1))
            .unwrap()
    }

    #[test]
    fn test_mask_fills_every_level() {
        let mask_2d = Cube::new(
            "mask",
            array![[0, 1, 1, 0], [0, 0, 2, 0]].into_dyn(),
        );
        let mask_3d = column_mask_from_2d(&mask_2d, &template(), DEFAULT_VERTICAL_COORD).unwrap();

        assert_eq!(mask_3d.name(), SEGMENTATION_MASK_NAME);
        assert_eq!(mask_3d.shape(), &[2, 3, 4]);
        for level in 0..3 {
            assert_eq!(mask_3d.data()[[0, level, 1]], 1);
            assert_eq!(mask_3d.data()[[1, level, 2]], 2);
            assert_eq!(mask_3d.data()[[1, level, 0]], 0);
        }
        assert!(mask_3d.has_coord(DEFAULT_VERTICAL_COORD));
    }

    #[test]
    fn test_wrong_horizontal_shape() {
        let mask_2d = Cube::new("mask", array![[0, 1, 1], [0, 0, 2]].into_dyn());
        assert!(matches!(
            column_mask_from_2d(&mask_2d, &template(), DEFAULT_VERTICAL_COORD),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
