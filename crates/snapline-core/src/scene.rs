//! The scene collaborator interface and an in-memory implementation.

use crate::camera::Camera;
use crate::guides::{GuideId, GuidePrimitive};
use crate::shapes::{Shape, ShapeId};
use std::collections::HashMap;

/// What the alignment engine needs from the scene that owns the shapes.
///
/// The engine reads shapes by value on every call and never keeps references
/// into the scene. Guide primitives are pushed and removed by ID.
pub trait SceneCollaborator {
    /// Ordered snapshot of all shapes except `excluding`.
    fn list_shapes(&self, excluding: ShapeId) -> Vec<Shape>;

    /// Current value of a single shape.
    fn shape(&self, id: ShapeId) -> Option<Shape>;

    /// Current zoom factor of the view.
    fn current_zoom(&self) -> f64;

    /// Start drawing a guide primitive.
    fn add_guide_primitive(&mut self, primitive: GuidePrimitive);

    /// Stop drawing a guide primitive. Unknown IDs are ignored.
    fn remove_guide_primitive(&mut self, id: GuideId);
}

/// In-memory scene for tests and scripted sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    guides: HashMap<GuideId, GuidePrimitive>,
    pub camera: Camera,
}

impl MemoryScene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the others.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        id
    }

    /// Replace a stored shape with a new value. Returns false if it is unknown.
    pub fn update_shape(&mut self, shape: Shape) -> bool {
        match self.shapes.get_mut(&shape.id()) {
            Some(stored) => {
                *stored = shape;
                true
            }
            None => false,
        }
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Live guide primitives, in no particular order.
    pub fn guide_primitives(&self) -> impl Iterator<Item = &GuidePrimitive> {
        self.guides.values()
    }

    /// Number of live guide primitives.
    pub fn guide_count(&self) -> usize {
        self.guides.len()
    }

    /// Number of live guide primitives owned by one shape.
    pub fn guide_count_for(&self, owner: ShapeId) -> usize {
        self.guides.values().filter(|g| g.owner == owner).count()
    }
}

impl SceneCollaborator for MemoryScene {
    fn list_shapes(&self, excluding: ShapeId) -> Vec<Shape> {
        self.shapes_ordered()
            .filter(|s| s.id() != excluding)
            .cloned()
            .collect()
    }

    fn shape(&self, id: ShapeId) -> Option<Shape> {
        self.shapes.get(&id).cloned()
    }

    fn current_zoom(&self) -> f64 {
        self.camera.zoom
    }

    fn add_guide_primitive(&mut self, primitive: GuidePrimitive) {
        self.guides.insert(primitive.id, primitive);
    }

    fn remove_guide_primitive(&mut self, id: GuideId) {
        self.guides.remove(&id);
    }
}
