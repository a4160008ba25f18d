//! Reader for NumPy `.npy` files.

use std::io::Cursor;
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::ReadNpyExt;

use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::labels::Label;

/// NumPy magic bytes: \x93NUMPY
const MAGIC: &[u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

/// Whether `data` starts with the NumPy magic bytes.
pub fn is_npy(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && data.starts_with(MAGIC)
}

/// Read a label array from `.npy` bytes.
///
/// Supported data types: `i32`, `i64`, `u8`, `u16`, `i16`, `u32`. Wider
/// types are narrowed and fail with [`Error::LabelOutOfRange`] if a value
/// does not fit.
pub fn read_labels(data: &[u8]) -> Result<ArrayD<Label>> {
    let mut cursor = Cursor::new(data);

    // Try the label type itself first, then the usual segmentation dtypes
    if let Ok(array) = ArrayD::<i32>::read_npy(&mut cursor) {
        return Ok(array);
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<i64>::read_npy(&mut cursor) {
        return narrow(array);
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<u8>::read_npy(&mut cursor) {
        return Ok(array.mapv(Label::from));
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<u16>::read_npy(&mut cursor) {
        return Ok(array.mapv(Label::from));
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<i16>::read_npy(&mut cursor) {
        return Ok(array.mapv(Label::from));
    }

    cursor.set_position(0);
    let array = ArrayD::<u32>::read_npy(&mut cursor)?;
    narrow(array.mapv(i64::from))
}

/// Read a data field from `.npy` bytes as `f64`.
///
/// Supported data types: `f64`, `f32`, `i32`, `i16`, `u16`, `u8`.
pub fn read_field(data: &[u8]) -> Result<ArrayD<f64>> {
    let mut cursor = Cursor::new(data);

    if let Ok(array) = ArrayD::<f64>::read_npy(&mut cursor) {
        return Ok(array);
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<f32>::read_npy(&mut cursor) {
        return Ok(array.mapv(f64::from));
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<i32>::read_npy(&mut cursor) {
        return Ok(array.mapv(f64::from));
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<i16>::read_npy(&mut cursor) {
        return Ok(array.mapv(f64::from));
    }

    cursor.set_position(0);
    if let Ok(array) = ArrayD::<u16>::read_npy(&mut cursor) {
        return Ok(array.mapv(f64::from));
    }

    cursor.set_position(0);
    let array = ArrayD::<u8>::read_npy(&mut cursor)?;
    Ok(array.mapv(f64::from))
}

/// Load a label volume from a `.npy` file into a cube without coordinates.
pub fn load_labels(path: &Path, name: &str) -> Result<Cube<Label>> {
    let data = std::fs::read(path)?;
    let labels = read_labels(&data)?;
    log::info!("loaded labels {:?} with shape {:?}", path, labels.shape());
    Ok(Cube::new(name, labels))
}

/// Load a data field from a `.npy` file into a cube without coordinates.
pub fn load_field(path: &Path, name: &str) -> Result<Cube<f64>> {
    let data = std::fs::read(path)?;
    let field = read_field(&data)?;
    log::info!("loaded field {:?} with shape {:?}", path, field.shape());
    Ok(Cube::new(name, field))
}

fn narrow(array: ArrayD<i64>) -> Result<ArrayD<Label>> {
    if let Some(&value) = array.iter().find(|&&v| Label::try_from(v).is_err()) {
        return Err(Error::LabelOutOfRange { value });
    }
    Ok(array.mapv(|v| v as Label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};
    use ndarray_npy::WriteNpyExt;

    fn npy_bytes<T: ndarray_npy::WritableElement>(array: &Array2<T>) -> Vec<u8> {
        let mut bytes = Vec::new();
        array.write_npy(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_magic_detection() {
        // Valid NumPy magic
        let valid_magic = [0x93, b'N', b'U', b'M', b'P', b'Y', 0x01, 0x00];
        assert!(is_npy(&valid_magic));

        // Invalid data
        let invalid = [0x89, 0x50, 0x4E, 0x47]; // PNG magic
        assert!(!is_npy(&invalid));
        assert!(is_npy(&npy_bytes(&array![[1i32]])));
    }

    #[test]
    fn test_labels_from_integer_dtypes() {
        let expected = array![[0, 1, 1], [0, 0, 7]].into_dyn();

        let from_i32 = read_labels(&npy_bytes(&array![[0i32, 1, 1], [0, 0, 7]])).unwrap();
        assert_eq!(from_i32, expected);

        let from_i64 = read_labels(&npy_bytes(&array![[0i64, 1, 1], [0, 0, 7]])).unwrap();
        assert_eq!(from_i64, expected);

        let from_u8 = read_labels(&npy_bytes(&array![[0u8, 1, 1], [0, 0, 7]])).unwrap();
        assert_eq!(from_u8, expected);

        let from_u32 = read_labels(&npy_bytes(&array![[0u32, 1, 1], [0, 0, 7]])).unwrap();
        assert_eq!(from_u32, expected);
    }

    #[test]
    fn test_labels_out_of_range() {
        let bytes = npy_bytes(&array![[0i64, 1], [i64::from(i32::MAX) + 1, 2]]);
        assert!(matches!(
            read_labels(&bytes),
            Err(Error::LabelOutOfRange { value }) if value == i64::from(i32::MAX) + 1
        ));
    }

    #[test]
    fn test_float_labels_are_rejected() {
        let bytes = npy_bytes(&array![[0.0f32, 1.5]]);
        assert!(matches!(read_labels(&bytes), Err(Error::Npy(_))));
        assert!(matches!(read_labels(b"not an npy file"), Err(Error::Npy(_))));
    }

    #[test]
    fn test_field_from_float_and_integer_dtypes() {
        let from_f32 = read_field(&npy_bytes(&array![[0.5f32, 2.0]])).unwrap();
        assert_eq!(from_f32, array![[0.5, 2.0]].into_dyn());

        let from_i16 = read_field(&npy_bytes(&array![[-3i16, 4]])).unwrap();
        assert_eq!(from_i16, array![[-3.0, 4.0]].into_dyn());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("cellmask-labels-{}.npy", std::process::id()));
        std::fs::write(&path, npy_bytes(&array![[0u16, 3], [3, 0]])).unwrap();

        let labels = load_labels(&path, "segmentation_mask").unwrap();
        assert_eq!(labels.name(), "segmentation_mask");
        assert_eq!(labels.data()[[0, 1]], 3);

        let field = load_field(&path, "w").unwrap();
        assert_eq!(field.data()[[1, 0]], 3.0);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(load_labels(&path, "x"), Err(Error::Io(_))));
    }
}
