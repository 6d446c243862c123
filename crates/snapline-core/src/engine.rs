//! The alignment engine: the entry points a scene calls during a drag.

use crate::config::{ConfigResult, EngineConfig};
use crate::detect::{Detection, MatchMode, detect, is_candidate};
use crate::guides::{GuideRegistry, build_guides};
use crate::resolve::{GlobalNearestPolicy, PerSidePolicy, SnapPolicy, SnapPolicyKind};
use crate::scene::SceneCollaborator;
use crate::shapes::{Shape, ShapeId};
use crate::snap::{SnapMode, apply_correction, round_position};
use kurbo::Point;

/// Interaction state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A shape is being dragged.
    Dragging(ShapeId),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

/// Build the snap policy selected by `config`.
pub fn build_policy(config: &EngineConfig) -> Box<dyn SnapPolicy + Send + Sync> {
    match config.policy {
        SnapPolicyKind::PerSide => Box::new(PerSidePolicy::new(config.snap_tolerance, config.pairing())),
        SnapPolicyKind::GlobalNearest => Box::new(GlobalNearestPolicy::new(config.global_threshold)),
    }
}

/// Detects alignments while a shape is dragged, snaps it, and maintains its guides.
#[derive(Debug)]
pub struct AlignmentEngine {
    config: EngineConfig,
    policy: Box<dyn SnapPolicy + Send + Sync>,
    guides: GuideRegistry,
    drag: DragState,
    mode: SnapMode,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let policy = build_policy(&config);
        Self::from_parts(config, policy)
    }
}

impl AlignmentEngine {
    /// Create an engine using the policy named in `config`.
    ///
    /// Fails if `config` does not pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        let policy = build_policy(&config);
        Ok(Self::from_parts(config, policy))
    }

    /// Create an engine with a custom policy.
    pub fn with_policy(config: EngineConfig, policy: Box<dyn SnapPolicy + Send + Sync>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, policy))
    }

    fn from_parts(config: EngineConfig, policy: Box<dyn SnapPolicy + Send + Sync>) -> Self {
        log::debug!("Alignment engine using {} policy", policy.name());
        Self {
            config,
            policy,
            guides: GuideRegistry::new(),
            drag: DragState::Idle,
            mode: SnapMode::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> &dyn SnapPolicy {
        self.policy.as_ref()
    }

    pub fn guides(&self) -> &GuideRegistry {
        &self.guides
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.mode
    }

    /// Enable or suspend snapping (e.g. while the view is being panned).
    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.mode = mode;
    }

    /// Detect alignments of `moving` against the scene without changing anything.
    pub fn detect<S: SceneCollaborator + ?Sized>(&self, scene: &S, moving: &Shape, mode: MatchMode) -> Detection {
        let candidates = candidates(scene, moving);
        detect(moving, &candidates, mode, self.config.pairing())
    }

    /// Handle one move tick of `shape`. Returns the corrected position.
    ///
    /// The position is rounded to whole pixels, snapped by the active policy,
    /// and the shape's guides are rebuilt for where it ends up. While snapping
    /// is suspended the shape shows no guides.
    pub fn on_shape_moving<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S, shape: &mut Shape) -> Point {
        if let DragState::Dragging(previous) = self.drag {
            if previous != shape.id() {
                self.guides.clear_shape(scene, previous);
            }
        }
        self.drag = DragState::Dragging(shape.id());
        round_position(shape);

        if !self.mode.is_enabled() {
            self.guides.clear_shape(scene, shape.id());
            return shape.position;
        }

        let candidates = candidates(scene, shape);
        let correction = self.policy.resolve(shape, &candidates);
        let result = apply_correction(shape, correction);
        if result.is_snapped() {
            log::debug!(
                "Snapped {} to ({}, {}) [x: {}, y: {}]",
                shape.id(),
                result.position.x,
                result.position.y,
                result.snapped_x,
                result.snapped_y
            );
        }

        self.rebuild_guides(scene, shape, &candidates);
        shape.position
    }

    /// Handle the end of a drag: remove all guides.
    pub fn on_drag_end<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S, shape: ShapeId) {
        log::debug!("Drag of {} ended", shape);
        self.reset(scene);
    }

    /// Handle the selection being cleared: remove all guides.
    pub fn on_selection_cleared<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S) {
        self.reset(scene);
    }

    /// Rebuild live guides so their strokes and ticks match the scene's zoom.
    pub fn on_zoom_changed<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S) {
        let owners: Vec<ShapeId> = self.guides.owners().collect();
        for owner in owners {
            match scene.shape(owner) {
                Some(shape) => {
                    let candidates = candidates(scene, &shape);
                    self.rebuild_guides(scene, &shape, &candidates);
                }
                None => {
                    self.guides.clear_shape(scene, owner);
                }
            }
        }
    }

    fn rebuild_guides<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S, shape: &Shape, candidates: &[Shape]) {
        let zoom = scene.current_zoom();
        let style = self.config.guide_style;
        let guides = build_guides(shape, candidates, self.config.guide_match, &style, zoom);
        self.guides.rebuild(scene, shape.id(), &guides, &style);
        log::trace!(
            "Rebuilt guides for {}: {} primitives at zoom {}",
            shape.id(),
            self.guides.primitive_count(shape.id()),
            zoom
        );
    }

    fn reset<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S) {
        let removed = self.guides.clear_all(scene);
        if removed > 0 {
            log::debug!("Removed {} guide primitives", removed);
        }
        self.drag = DragState::Idle;
    }
}

/// Alignment candidates for `moving`: every other non-guide shape in the scene.
fn candidates<S: SceneCollaborator + ?Sized>(scene: &S, moving: &Shape) -> Vec<Shape> {
    scene
        .list_shapes(moving.id())
        .into_iter()
        .filter(|s| is_candidate(moving.id(), s))
        .collect()
}
