//! Snapline Core Library
//!
//! Alignment detection and snapping for 2-D scene editors. While a shape is
//! dragged, the engine finds edges and centers of other shapes it lines up
//! with, snaps the shape onto the best one per axis, and maintains the guide
//! lines that mark the alignment. Rendering, hit testing and pan/zoom stay
//! with the scene, reached through [`SceneCollaborator`].

pub mod camera;
pub mod config;
pub mod detect;
pub mod engine;
pub mod geometry;
pub mod guides;
pub mod resolve;
pub mod scene;
pub mod shapes;
pub mod snap;

pub use camera::Camera;
pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use detect::{AlignmentMatch, Detection, MatchMode, SidePairing, SNAP_TOLERANCE, detect};
pub use engine::{AlignmentEngine, DragState, build_policy};
pub use geometry::{Axis, Orientation, ReferenceLines, Side, SideMap};
pub use guides::{Guide, GuideId, GuidePrimitive, GuideRegistry, GuideRole, GuideStyle, build_guide, build_guides};
pub use resolve::{Correction, GlobalNearestPolicy, PerSidePolicy, SnapPolicy, SnapPolicyKind, GLOBAL_SNAP_THRESHOLD};
pub use scene::{MemoryScene, SceneCollaborator};
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use snap::{SnapMode, SnapResult, apply_correction, snap};
