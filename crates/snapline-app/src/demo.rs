//! Scripted drag session against an in-memory scene.

use kurbo::{Point, Vec2};
use snapline_core::{AlignmentEngine, ConfigResult, EngineConfig, MemoryScene, SceneCollaborator, Shape, ShapeId};

/// Outcome of one simulated move tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    /// Where the pointer put the shape.
    pub requested: Point,
    /// Where the engine left it.
    pub corrected: Point,
    /// Live guide primitives after the tick.
    pub guides: usize,
}

/// Summary of a whole session.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub steps: Vec<DragStep>,
    /// Live guide primitives after release.
    pub guides_after_release: usize,
}

/// Three rectangles, the first of which is dragged.
pub fn demo_scene() -> (MemoryScene, ShapeId) {
    let mut scene = MemoryScene::new();
    let moving = scene.add_shape(Shape::new(Point::new(200.0, 200.0), 150.0, 120.0));
    scene.add_shape(Shape::new(Point::new(480.0, 205.0), 140.0, 180.0));
    scene.add_shape(Shape::new(Point::new(230.0, 420.0), 120.0, 160.0));
    (scene, moving)
}

/// Evenly spaced pointer positions from `from` to `to`, both included.
pub fn drag_path(from: Point, to: Point, steps: usize) -> Vec<Point> {
    if steps == 0 {
        return vec![to];
    }
    let delta: Vec2 = (to - from) / steps as f64;
    (0..=steps).map(|i| from + delta * i as f64).collect()
}

/// Drag the first shape of the demo scene across the canvas, zoom in halfway, and release.
pub fn run(config: EngineConfig) -> ConfigResult<DemoReport> {
    let (mut scene, moving) = demo_scene();
    let mut engine = AlignmentEngine::new(config)?;
    let path = drag_path(Point::new(200.0, 200.0), Point::new(320.0, 260.0), 12);
    let halfway = path.len() / 2;

    let mut steps = Vec::with_capacity(path.len());
    for (i, requested) in path.into_iter().enumerate() {
        if i == halfway && scene.camera.zoom_wheel(Point::new(400.0, 300.0), -300.0) {
            log::info!("Zoom changed to {:.2}", scene.camera.zoom);
            engine.on_zoom_changed(&mut scene);
        }

        let Some(mut shape) = scene.shape(moving) else {
            break;
        };
        shape.position = requested;
        let corrected = engine.on_shape_moving(&mut scene, &mut shape);
        scene.update_shape(shape);

        let step = DragStep {
            requested,
            corrected,
            guides: scene.guide_count(),
        };
        log::info!(
            "({:.1}, {:.1}) -> ({}, {}), {} guide primitives",
            step.requested.x,
            step.requested.y,
            step.corrected.x,
            step.corrected.y,
            step.guides
        );
        steps.push(step);
    }

    engine.on_drag_end(&mut scene, moving);
    Ok(DemoReport {
        steps,
        guides_after_release: scene.guide_count(),
    })
}
