//! Snap functionality: applying resolved corrections to a moving shape.

use crate::geometry::Axis;
use crate::resolve::Correction;
use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Snap mode for a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping and no guides (e.g. while panning).
    None,
    /// Snap to other shape edges/centers.
    #[default]
    Shapes,
}

impl SnapMode {
    /// Toggle between the two modes.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Shapes,
            SnapMode::Shapes => SnapMode::None,
        }
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The shape position after snapping.
    pub position: Point,
    /// Whether `left` was changed.
    pub snapped_x: bool,
    /// Whether `top` was changed.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(position: Point) -> Self {
        Self {
            position,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Set the shape's position coordinate on `axis`.
///
/// Returns `false` without touching the shape when the value is unchanged.
/// Guides drawn for the shape are stale afterwards; callers rebuild them.
pub fn snap(shape: &mut Shape, axis: Axis, value: f64) -> bool {
    let slot = match axis {
        Axis::X => &mut shape.position.x,
        Axis::Y => &mut shape.position.y,
    };
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Apply a correction to both axes.
pub fn apply_correction(shape: &mut Shape, correction: Correction) -> SnapResult {
    let mut result = SnapResult::none(shape.position);
    if let Some(left) = correction.left {
        result.snapped_x = snap(shape, Axis::X, left);
    }
    if let Some(top) = correction.top {
        result.snapped_y = snap(shape, Axis::Y, top);
    }
    result.position = shape.position;
    result
}

/// Round the shape's position to whole pixels.
pub fn round_position(shape: &mut Shape) {
    shape.position = Point::new(shape.position.x.round(), shape.position.y.round());
}
