//! Pixel index lookups for labeled regions.
//!
//! A labeled array tags each pixel with `0` (background) or a positive region
//! id. These helpers gather, per id, the pixels belonging to that region.

use std::collections::BTreeMap;

use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Integer id of a labeled region. `0` is background.
pub type Label = i32;

/// Per-label maps of pixel count, row indices and column indices.
pub type LabelIndices = (
    BTreeMap<Label, usize>,
    BTreeMap<Label, Vec<usize>>,
    BTreeMap<Label, Vec<usize>>,
);

/// Geometric properties of one labeled region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionProperties {
    label: Label,
    /// `[row, col]` pairs in row-major order
    coords: Vec<[usize; 2]>,
}

impl RegionProperties {
    pub fn label(&self) -> Label {
        self.label
    }

    /// Member pixels as `[row, col]` pairs, in row-major order.
    pub fn coords(&self) -> &[[usize; 2]] {
        &self.coords
    }

    /// Number of member pixels.
    pub fn area(&self) -> usize {
        self.coords.len()
    }
}

/// Collect the region properties of every positive label, keyed by label id.
///
/// An array without positive labels gives an empty map.
pub fn label_props_in_dict(labels: ArrayView2<'_, Label>) -> BTreeMap<Label, RegionProperties> {
    let mut regions: BTreeMap<Label, RegionProperties> = BTreeMap::new();
    for ((row, col), &label) in labels.indexed_iter() {
        if label <= 0 {
            continue;
        }
        regions
            .entry(label)
            .or_insert_with(|| RegionProperties {
                label,
                coords: Vec::new(),
            })
            .coords
            .push([row, col]);
    }
    regions
}

/// Split region properties into pixel counts, row indices and column indices.
///
/// # Errors
/// Returns [`Error::EmptyRegion`] if `regions` is empty.
pub fn indices_of_labels_from_reg_prop_dict(
    regions: &BTreeMap<Label, RegionProperties>,
) -> Result<LabelIndices> {
    if regions.is_empty() {
        return Err(Error::EmptyRegion);
    }

    let mut counts = BTreeMap::new();
    let mut row_indices = BTreeMap::new();
    let mut col_indices = BTreeMap::new();

    for region in regions.values() {
        let (rows, cols): (Vec<usize>, Vec<usize>) =
            region.coords.iter().map(|&[r, c]| (r, c)).unzip();
        counts.insert(region.label, rows.len());
        row_indices.insert(region.label, rows);
        col_indices.insert(region.label, cols);
    }

    Ok((counts, row_indices, col_indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};
    use std::collections::BTreeSet;

    #[test]
    fn test_counts_match_label_occurrences() {
        let labels = array![
            [0, 1, 1, 0, 0],
            [0, 1, 0, 0, 4],
            [2, 0, 0, 4, 4],
            [2, 2, 0, 0, 0],
        ];
        let regions = label_props_in_dict(labels.view());
        assert_eq!(regions.keys().copied().collect::<Vec<_>>(), vec![1, 2, 4]);

        let (counts, rows, cols) = indices_of_labels_from_reg_prop_dict(&regions).unwrap();
        for (&label, &count) in &counts {
            let expected = labels.iter().filter(|&&v| v == label).count();
            assert_eq!(count, expected, "count for label {}", label);
            assert_eq!(rows[&label].len(), count);
            assert_eq!(cols[&label].len(), count);
        }

        let recovered: BTreeSet<(usize, usize)> = counts
            .keys()
            .flat_map(|l| rows[l].iter().copied().zip(cols[l].iter().copied()))
            .collect();
        let expected: BTreeSet<(usize, usize)> = labels
            .indexed_iter()
            .filter(|&(_, &v)| v > 0)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(recovered, expected);
    }

    #[test]
    fn test_row_major_order() {
        let labels = array![[0, 3], [3, 3]];
        let regions = label_props_in_dict(labels.view());
        assert_eq!(regions[&3].coords(), &[[0, 1], [1, 0], [1, 1]]);
        assert_eq!(regions[&3].area(), 3);

        let (_, rows, cols) = indices_of_labels_from_reg_prop_dict(&regions).unwrap();
        assert_eq!(rows[&3], vec![0, 1, 1]);
        assert_eq!(cols[&3], vec![1, 0, 1]);
    }

    #[test]
    fn test_transposed_view_uses_logical_order() {
        let labels = array![[1, 0], [1, 2]];
        let transposed = labels.t();
        let regions = label_props_in_dict(transposed);
        assert_eq!(regions[&1].coords(), &[[0, 0], [0, 1]]);
        assert_eq!(regions[&2].coords(), &[[1, 1]]);
    }

    #[test]
    fn test_empty_labels() {
        let labels = Array2::<Label>::zeros((3, 3));
        let regions = label_props_in_dict(labels.view());
        assert!(regions.is_empty());
        assert!(matches!(
            indices_of_labels_from_reg_prop_dict(&regions),
            Err(Error::EmptyRegion)
        ));
    }
}
