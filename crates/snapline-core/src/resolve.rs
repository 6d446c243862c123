//! Conflict resolution: turning candidate alignments into one correction per axis.
//!
//! Two policies exist for the same problem. [`PerSidePolicy`] detects matches on
//! every side within a small tolerance and keeps the closest one per axis.
//! [`GlobalNearestPolicy`] scans all left/right/center pairs and snaps to the
//! globally nearest pair per axis under a larger threshold. An engine uses
//! exactly one of them.

use crate::detect::{Detection, MatchMode, SidePairing, detect, is_candidate};
use crate::geometry::{Axis, ReferenceLines};
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};

/// Default threshold for [`GlobalNearestPolicy`].
pub const GLOBAL_SNAP_THRESHOLD: f64 = 85.0;

/// Position corrections decided for a moving shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Correction {
    /// New `left`, if the X axis snaps.
    pub left: Option<f64>,
    /// New `top`, if the Y axis snaps.
    pub top: Option<f64>,
}

impl Correction {
    pub fn none() -> Self {
        Self::default()
    }

    /// Correction for one axis.
    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.left = Some(value),
            Axis::Y => self.top = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none()
    }
}

/// Strategy deciding how a moving shape snaps against its candidates.
pub trait SnapPolicy: std::fmt::Debug {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Compute the correction for `moving` against `candidates`.
    fn resolve(&self, moving: &Shape, candidates: &[Shape]) -> Correction;
}

/// Selects which [`SnapPolicy`] an engine builds from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicyKind {
    #[default]
    PerSide,
    GlobalNearest,
}

/// Keep the closest match on each axis of a detection.
pub fn resolve_closest(detection: &Detection) -> Correction {
    let mut correction = Correction::none();
    for axis in [Axis::X, Axis::Y] {
        if let Some(best) = detection.ranked(axis).first() {
            correction.set(axis, best.corrected_position);
        }
    }
    correction
}

/// Per-side tolerance snapping; closest match wins each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerSidePolicy {
    pub tolerance: f64,
    pub pairing: SidePairing,
}

impl PerSidePolicy {
    pub fn new(tolerance: f64, pairing: SidePairing) -> Self {
        Self { tolerance, pairing }
    }
}

impl SnapPolicy for PerSidePolicy {
    fn name(&self) -> &'static str {
        "per-side"
    }

    fn resolve(&self, moving: &Shape, candidates: &[Shape]) -> Correction {
        let mode = MatchMode::Tolerance {
            tolerance: self.tolerance,
        };
        resolve_closest(&detect(moving, candidates, mode, self.pairing))
    }
}

/// Global nearest-pair snapping, independently per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalNearestPolicy {
    /// Differences must be strictly below this to snap.
    pub threshold: f64,
}

impl GlobalNearestPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn nearest(&self, own: &ReferenceLines, moving: &Shape, candidates: &[Shape], axis: Axis) -> Option<f64> {
        let ours = own.triple(axis);
        let mut best: Option<(f64, f64)> = None;

        for target in candidates.iter().filter(|t| is_candidate(moving.id(), t)) {
            for theirs in ReferenceLines::of(target).triple(axis) {
                for mine in ours {
                    let diff = (theirs - mine).abs();
                    if best.is_none_or(|(min, _)| diff < min) {
                        best = Some((diff, own.origin(axis) + theirs - mine));
                    }
                }
            }
        }

        best.filter(|(diff, _)| *diff < self.threshold)
            .map(|(_, position)| position)
    }
}

impl Default for GlobalNearestPolicy {
    fn default() -> Self {
        Self::new(GLOBAL_SNAP_THRESHOLD)
    }
}

impl SnapPolicy for GlobalNearestPolicy {
    fn name(&self) -> &'static str {
        "global-nearest"
    }

    fn resolve(&self, moving: &Shape, candidates: &[Shape]) -> Correction {
        let own = ReferenceLines::of(moving);
        Correction {
            left: self.nearest(&own, moving, candidates, Axis::X),
            top: self.nearest(&own, moving, candidates, Axis::Y),
        }
    }
}
