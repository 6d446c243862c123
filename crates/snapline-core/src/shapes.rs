//! Shapes as seen by the alignment engine.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Discriminates interactive shapes from visual-only guide objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A movable, resizable rectangle.
    #[default]
    Rectangle,
    /// A non-interactive guide object. Never an alignment candidate.
    Guide,
}

/// An axis-aligned rectangular shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    /// Top-left corner position (`left`, `top`).
    pub position: Point,
    /// Width of the shape.
    pub width: f64,
    /// Height of the shape.
    pub height: f64,
    #[serde(default)]
    pub kind: ShapeKind,
}

impl Shape {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self::with_id(Uuid::new_v4(), position, width, height)
    }

    /// Create a rectangle with a specific ID.
    pub fn with_id(id: ShapeId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            position,
            width,
            height,
            kind: ShapeKind::Rectangle,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn left(&self) -> f64 {
        self.position.x
    }

    pub fn top(&self) -> f64 {
        self.position.y
    }

    /// Whether this shape may take part in alignment.
    pub fn is_alignable(&self) -> bool {
        self.kind == ShapeKind::Rectangle
    }
}
