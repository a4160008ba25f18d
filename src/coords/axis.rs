//! Axis roles of a 3D field and coordinate layouts relative to them.

use crate::cube::{Cube, TIME_COORD};
use crate::error::{Error, Result};

/// Role of an axis of a (time, hdim_1, hdim_2) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    Time,
    Hdim1,
    Hdim2,
}

/// Which data axis plays which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRoles {
    pub time: usize,
    pub hdim_1: usize,
    pub hdim_2: usize,
}

impl AxisRoles {
    /// Horizontal axes follow from the position of the time axis: they are
    /// the two remaining axes, in order.
    pub fn from_time_axis(time: usize) -> Result<Self> {
        let (hdim_1, hdim_2) = match time {
            0 => (1, 2),
            1 => (0, 2),
            2 => (0, 1),
            _ => {
                return Err(Error::invalid_axes(format!(
                    "time axis {} outside a three dimensional field",
                    time
                )));
            }
        };
        Ok(Self {
            time,
            hdim_1,
            hdim_2,
        })
    }

    /// Axis roles of a 3D field with a one-dimensional time coordinate.
    pub fn of<T>(field: &Cube<T>) -> Result<Self> {
        if field.ndim() != 3 {
            return Err(Error::invalid_axes(format!(
                "expected a field with time and two horizontal axes, found {} axes",
                field.ndim()
            )));
        }
        Self::from_time_axis(field.axis_of(TIME_COORD)?)
    }

    pub fn role(&self, axis: usize) -> Option<AxisRole> {
        match axis {
            a if a == self.time => Some(AxisRole::Time),
            a if a == self.hdim_1 => Some(AxisRole::Hdim1),
            a if a == self.hdim_2 => Some(AxisRole::Hdim2),
            _ => None,
        }
    }
}

/// Axis order of a two-dimensional horizontal coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneOrder {
    /// Stored as `(hdim_1, hdim_2)`
    Hdim1First,
    /// Stored as `(hdim_2, hdim_1)`
    Hdim2First,
}

impl PlaneOrder {
    fn from_roles(first: AxisRole, second: AxisRole) -> Option<Self> {
        match (first, second) {
            (AxisRole::Hdim1, AxisRole::Hdim2) => Some(Self::Hdim1First),
            (AxisRole::Hdim2, AxisRole::Hdim1) => Some(Self::Hdim2First),
            _ => None,
        }
    }
}

/// Layout of a coordinate relative to the field's axis roles.
///
/// Covers every layout that can be interpolated at a horizontal position:
/// one horizontal axis, both horizontal axes in either order, or time plus
/// both horizontal axes in any of the six orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    AlongHdim1,
    AlongHdim2,
    Plane(PlaneOrder),
    /// Time-varying plane; `time_pos` is the coordinate's own axis holding time
    Volume { time_pos: usize, plane: PlaneOrder },
}

impl AxisOrder {
    /// Classify a coordinate from the data axes it spans.
    ///
    /// Returns `None` for layouts without a horizontal interpretation, such
    /// as scalar coordinates or coordinates along time only.
    pub fn classify(dims: &[usize], roles: &AxisRoles) -> Option<Self> {
        let coord_roles = dims
            .iter()
            .map(|&d| roles.role(d))
            .collect::<Option<Vec<_>>>()?;

        match coord_roles.as_slice() {
            [AxisRole::Hdim1] => Some(Self::AlongHdim1),
            [AxisRole::Hdim2] => Some(Self::AlongHdim2),
            &[first, second] => PlaneOrder::from_roles(first, second).map(Self::Plane),
            [_, _, _] => {
                let time_pos = coord_roles.iter().position(|&r| r == AxisRole::Time)?;
                let mut horizontal = coord_roles.iter().filter(|&&r| r != AxisRole::Time);
                let first = *horizontal.next()?;
                let second = *horizontal.next()?;
                let plane = PlaneOrder::from_roles(first, second)?;
                Some(Self::Volume { time_pos, plane })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_from_time_axis() {
        let roles = AxisRoles::from_time_axis(1).unwrap();
        assert_eq!((roles.hdim_1, roles.hdim_2), (0, 2));
        assert_eq!(roles.role(1), Some(AxisRole::Time));
        assert_eq!(roles.role(3), None);
        assert!(AxisRoles::from_time_axis(3).is_err());
    }

    #[test]
    fn test_classify_lines_and_planes() {
        let roles = AxisRoles::from_time_axis(0).unwrap();
        assert_eq!(AxisOrder::classify(&[1], &roles), Some(AxisOrder::AlongHdim1));
        assert_eq!(AxisOrder::classify(&[2], &roles), Some(AxisOrder::AlongHdim2));
        assert_eq!(
            AxisOrder::classify(&[2, 1], &roles),
            Some(AxisOrder::Plane(PlaneOrder::Hdim2First))
        );
        assert_eq!(AxisOrder::classify(&[0], &roles), None);
        assert_eq!(AxisOrder::classify(&[0, 1], &roles), None);
        assert_eq!(AxisOrder::classify(&[], &roles), None);
    }

    #[test]
    fn test_classify_all_volume_orders() {
        let roles = AxisRoles::from_time_axis(2).unwrap();
        let (t, h1, h2) = (roles.time, roles.hdim_1, roles.hdim_2);
        let cases = [
            ([t, h1, h2], 0, PlaneOrder::Hdim1First),
            ([t, h2, h1], 0, PlaneOrder::Hdim2First),
            ([h1, t, h2], 1, PlaneOrder::Hdim1First),
            ([h1, h2, t], 2, PlaneOrder::Hdim1First),
            ([h2, t, h1], 1, PlaneOrder::Hdim2First),
            ([h2, h1, t], 2, PlaneOrder::Hdim2First),
        ];
        for (dims, time_pos, plane) in cases {
            assert_eq!(
                AxisOrder::classify(&dims, &roles),
                Some(AxisOrder::Volume { time_pos, plane }),
                "dims {:?}",
                dims
            );
        }
        assert_eq!(AxisOrder::classify(&[t, h1, h1], &roles), None);
    }
}
