//! Reference lines derived from a shape's position and size.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Position axis corrected by a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal positioning (`left`), driven by vertical lines.
    X,
    /// Vertical positioning (`top`), driven by horizontal lines.
    Y,
}

impl Axis {
    /// The other axis.
    pub fn perpendicular(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// The orientation of reference lines keyed by this axis.
    pub fn line_orientation(self) -> Orientation {
        match self {
            Axis::X => Orientation::Vertical,
            Axis::Y => Orientation::Horizontal,
        }
    }
}

/// Orientation of a drawn guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One of the six reference sides of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    CenterX,
    Top,
    Bottom,
    CenterY,
}

impl Side {
    /// All sides, vertical lines first.
    pub const ALL: [Side; 6] = [
        Side::Left,
        Side::Right,
        Side::CenterX,
        Side::Top,
        Side::Bottom,
        Side::CenterY,
    ];

    /// Sides keyed by an X value.
    pub const VERTICAL: [Side; 3] = [Side::Left, Side::Right, Side::CenterX];

    /// Sides keyed by a Y value.
    pub const HORIZONTAL: [Side; 3] = [Side::Top, Side::Bottom, Side::CenterY];

    /// Stable index into a [`SideMap`].
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::CenterX => 2,
            Side::Top => 3,
            Side::Bottom => 4,
            Side::CenterY => 5,
        }
    }

    /// The position axis this side's value lives on.
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right | Side::CenterX => Axis::X,
            Side::Top | Side::Bottom | Side::CenterY => Axis::Y,
        }
    }

    /// Orientation of the line this side describes.
    pub fn orientation(self) -> Orientation {
        self.axis().line_orientation()
    }

    /// Sides on the same axis (including this one).
    pub fn same_axis(self) -> [Side; 3] {
        match self.axis() {
            Axis::X => Side::VERTICAL,
            Axis::Y => Side::HORIZONTAL,
        }
    }
}

/// Fixed-size map with one slot per [`Side`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideMap<T>([T; 6]);

impl<T> SideMap<T> {
    /// Build a map by evaluating `f` for each side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self(Side::ALL.map(&mut f))
    }

    /// Iterate over `(side, value)` pairs in [`Side::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate mutably over `(side, value)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

/// The six reference values of a shape.
///
/// Computed from integer-rounded position and size so that equality-based
/// matching is not defeated by floating noise from zoom or scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLines {
    pub left: f64,
    pub right: f64,
    pub center_x: f64,
    pub top: f64,
    pub bottom: f64,
    pub center_y: f64,
}

impl ReferenceLines {
    /// Compute reference lines from raw position and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        let left = left.round();
        let top = top.round();
        let right = left + width.round();
        let bottom = top + height.round();
        Self {
            left,
            right,
            center_x: (left + right) / 2.0,
            top,
            bottom,
            center_y: (top + bottom) / 2.0,
        }
    }

    /// Compute reference lines for a shape.
    pub fn of(shape: &Shape) -> Self {
        Self::new(shape.left(), shape.top(), shape.width, shape.height)
    }

    /// Value of a single side.
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::CenterX => self.center_x,
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::CenterY => self.center_y,
        }
    }

    /// The `[near, far, center]` triple on an axis.
    pub fn triple(&self, axis: Axis) -> [f64; 3] {
        match axis {
            Axis::X => [self.left, self.right, self.center_x],
            Axis::Y => [self.top, self.bottom, self.center_y],
        }
    }

    /// The position coordinate (`left` or `top`) on an axis.
    pub fn origin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Position `axis` origin would need for `side` to land on `target`.
    pub fn origin_for(&self, side: Side, target: f64) -> f64 {
        self.origin(side.axis()) + (target - self.get(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centers_are_midpoints() {
        let lines = ReferenceLines::new(10.0, 20.0, 100.0, 51.0);
        assert!((lines.center_x - 60.0).abs() < f64::EPSILON);
        assert!((lines.center_y - 45.5).abs() < f64::EPSILON);
        assert!((lines.right - 110.0).abs() < f64::EPSILON);
        assert!((lines.bottom - 71.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounding_removes_subpixel_noise() {
        let lines = ReferenceLines::new(10.000_000_1, 19.6, 99.999_999, 50.4);
        assert_eq!(lines.left, 10.0);
        assert_eq!(lines.top, 20.0);
        assert_eq!(lines.right, 110.0);
        assert_eq!(lines.bottom, 70.0);
    }

    #[test]
    fn test_degenerate_shape_center_equals_edge() {
        let lines = ReferenceLines::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(lines.left, lines.center_x);
        assert_eq!(lines.right, lines.center_x);
        assert_eq!(lines.top, lines.center_y);
    }

    #[test]
    fn test_origin_for_accounts_for_size() {
        let lines = ReferenceLines::new(0.0, 0.0, 100.0, 40.0);
        // Right edge to 150 means left at 50.
        assert!((lines.origin_for(Side::Right, 150.0) - 50.0).abs() < f64::EPSILON);
        assert!((lines.origin_for(Side::CenterY, 100.0) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_side_map_indexing() {
        let mut map: SideMap<u32> = SideMap::default();
        map[Side::CenterY] = 7;
        assert_eq!(map[Side::CenterY], 7);
        assert_eq!(map.values().sum::<u32>(), 7);
        let sides: Vec<Side> = map.iter().map(|(side, _)| side).collect();
        assert_eq!(sides, Side::ALL.to_vec());
    }

    #[test]
    fn test_side_axes() {
        for side in Side::VERTICAL {
            assert_eq!(side.axis(), Axis::X);
            assert_eq!(side.orientation(), Orientation::Vertical);
        }
        for side in Side::HORIZONTAL {
            assert_eq!(side.axis(), Axis::Y);
            assert_eq!(side.orientation(), Orientation::Horizontal);
        }
        assert_eq!(Axis::X.perpendicular(), Axis::Y);
    }
}
