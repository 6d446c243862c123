//! Alignment detection between a moving shape and candidate shapes.

use crate::geometry::{Axis, ReferenceLines, Side, SideMap};
use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};

/// Default snap tolerance (in world units, independent of zoom).
pub const SNAP_TOLERANCE: f64 = 10.0;

/// How two reference values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchMode {
    /// Values must be identical after rounding.
    #[default]
    Exact,
    /// Values match when `|a - b| <= tolerance`.
    Tolerance { tolerance: f64 },
}

impl MatchMode {
    /// Check whether two values are in range of each other.
    pub fn matches(self, a: f64, b: f64) -> bool {
        match self {
            MatchMode::Exact => a == b,
            MatchMode::Tolerance { tolerance } => (a - b).abs() <= tolerance,
        }
    }
}

/// Which side pairs are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePairing {
    /// Only like sides: left with left, centerY with centerY, ...
    SameSide,
    /// Like sides plus cross sides (left with right, top with centerY, ...).
    #[default]
    AllPairs,
}

impl SidePairing {
    fn allows(self, side: Side, target_side: Side) -> bool {
        match self {
            SidePairing::SameSide => side == target_side,
            SidePairing::AllPairs => side.axis() == target_side.axis(),
        }
    }
}

/// A single alignment between a side of the moving shape and a target line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentMatch {
    /// Side of the moving shape.
    pub side: Side,
    /// Shape owning the target line.
    pub target: ShapeId,
    /// Side of the target shape.
    pub target_side: Side,
    /// Value of the moving shape's side.
    pub source_value: f64,
    /// Value of the target line.
    pub target_value: f64,
    /// Absolute gap between the two lines.
    pub distance: f64,
    /// `left` (or `top`) the moving shape must take for the lines to coincide.
    pub corrected_position: f64,
}

impl AlignmentMatch {
    pub fn axis(&self) -> Axis {
        self.side.axis()
    }

    /// Whether the two lines already coincide.
    pub fn is_exact(&self) -> bool {
        self.distance == 0.0
    }

    /// Whether the match pairs different sides (e.g. left with right).
    pub fn is_cross_side(&self) -> bool {
        self.side != self.target_side
    }
}

/// Detection output: matches grouped by the moving shape's side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    per_side: SideMap<Vec<AlignmentMatch>>,
}

impl Detection {
    /// Matches found for one side, in candidate order.
    pub fn matches(&self, side: Side) -> &[AlignmentMatch] {
        &self.per_side[side]
    }

    /// All matches across all sides.
    pub fn iter(&self) -> impl Iterator<Item = &AlignmentMatch> {
        self.per_side.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.per_side.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_side.values().all(Vec::is_empty)
    }

    /// Closest match for one side.
    pub fn closest_for(&self, side: Side) -> Option<&AlignmentMatch> {
        self.matches(side).iter().min_by(|a, b| rank(a, b))
    }

    /// All matches on an axis, closest first.
    ///
    /// Ties keep same-side matches ahead of cross-side ones, then candidate order.
    pub fn ranked(&self, axis: Axis) -> Vec<&AlignmentMatch> {
        let mut matches: Vec<&AlignmentMatch> =
            self.iter().filter(|m| m.axis() == axis).collect();
        matches.sort_by(|a, b| rank(a, b));
        matches
    }
}

fn rank(a: &AlignmentMatch, b: &AlignmentMatch) -> std::cmp::Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.is_cross_side().cmp(&b.is_cross_side()))
}

/// Whether `candidate` may be compared against the moving shape `moving`.
pub fn is_candidate(moving: ShapeId, candidate: &Shape) -> bool {
    candidate.id() != moving && candidate.is_alignable()
}

/// Detect alignments of `moving` against `candidates`.
///
/// Candidates equal to the moving shape, and guide objects, are skipped.
pub fn detect(
    moving: &Shape,
    candidates: &[Shape],
    mode: MatchMode,
    pairing: SidePairing,
) -> Detection {
    let own = ReferenceLines::of(moving);
    let mut detection = Detection::default();

    for target in candidates.iter().filter(|t| is_candidate(moving.id(), t)) {
        let theirs = ReferenceLines::of(target);
        for side in Side::ALL {
            let source_value = own.get(side);
            for target_side in side.same_axis() {
                if !pairing.allows(side, target_side) {
                    continue;
                }
                let target_value = theirs.get(target_side);
                if !mode.matches(source_value, target_value) {
                    continue;
                }
                detection.per_side[side].push(AlignmentMatch {
                    side,
                    target: target.id(),
                    target_side,
                    source_value,
                    target_value,
                    distance: (source_value - target_value).abs(),
                    corrected_position: own.origin_for(side, target_value),
                });
            }
        }
    }

    detection
}
