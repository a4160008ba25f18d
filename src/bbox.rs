//! Bounding boxes of nonzero regions in n-dimensional arrays.

use ndarray::{ArrayView, Axis, Dimension, RemoveAxis, Slice};

/// Default number of pixels added on each side of a bounding box.
pub const DEFAULT_BBOX_BUFFER: usize = 1;

/// Element types with a background (zero) value.
pub trait Background {
    fn is_background(&self) -> bool;
}

macro_rules! impl_background_int {
    ($($t:ty),*) => {
        $(impl Background for $t {
            fn is_background(&self) -> bool {
                *self == 0
            }
        })*
    };
}

impl_background_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl Background for f32 {
    fn is_background(&self) -> bool {
        *self == 0.0
    }
}

impl Background for f64 {
    fn is_background(&self) -> bool {
        *self == 0.0
    }
}

impl Background for bool {
    fn is_background(&self) -> bool {
        !*self
    }
}

/// Calculate the bounding box of the nonzero values of an array.
///
/// For each axis the array is reduced to a background indicator (is the whole
/// slice at this index zero?). The first and last changes of that indicator
/// give the box, which is widened by `buffer` and clamped to the array.
/// Changes are measured between neighbouring indices, so index `i` marks a
/// change between `i` and `i + 1`.
///
/// Edge cases per axis:
/// - no change (all zero, or nonzero over the whole axis): `[0, len - 1]`
///   before widening
/// - one change: used as both ends
/// - more than two changes: the first and the last are used
///
/// Returns one inclusive `[min, max]` pair per axis, in axis order.
pub fn get_bounding_box<T, D>(array: ArrayView<'_, T, D>, buffer: usize) -> Vec<[usize; 2]>
where
    T: Background,
    D: Dimension + RemoveAxis,
{
    let mut bbox = Vec::with_capacity(array.ndim());

    for axis in 0..array.ndim() {
        let len = array.len_of(Axis(axis));
        let last = len.saturating_sub(1);

        let background: Vec<bool> = array
            .axis_iter(Axis(axis))
            .map(|slice| slice.iter().all(Background::is_background))
            .collect();
        let changes: Vec<usize> = background
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(i, _)| i)
            .collect();

        let (first, second) = match changes.as_slice() {
            [] => (0, last),
            [only] => (*only, *only),
            [first, .., second] => (*first, *second),
        };

        let idx_min = (first + 1).saturating_sub(buffer);
        let idx_max = (second + 1 + buffer).min(last);
        bbox.push([idx_min, idx_max]);
    }

    bbox
}

/// View of `array` restricted to an inclusive per-axis box.
///
/// `bbox` must hold one pair per axis, as returned by [`get_bounding_box`].
pub fn crop<'a, T, D>(array: ArrayView<'a, T, D>, bbox: &[[usize; 2]]) -> ArrayView<'a, T, D>
where
    D: Dimension,
{
    debug_assert_eq!(bbox.len(), array.ndim());
    let mut view = array;
    for (axis, &[min, max]) in bbox.iter().enumerate() {
        view.slice_axis_inplace(Axis(axis), Slice::from(min..=max));
    }
    view
}
