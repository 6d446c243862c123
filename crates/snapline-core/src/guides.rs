//! Guide geometry and guide primitive ownership.
//!
//! A guide marks an alignment of one side of a shape with lines of other
//! shapes: a long line along the side's value spanning every contributing
//! shape, plus an "x" tick centered on each contributing point. Guides are
//! visual only and are rebuilt from scratch on every move.

use crate::detect::{MatchMode, is_candidate};
use crate::geometry::{Orientation, ReferenceLines, Side, SideMap};
use crate::scene::SceneCollaborator;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Line, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a guide primitive.
pub type GuideId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Zoom range used for guide compensation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.3, max: 30.0 }
    }
}

impl ZoomLimits {
    /// Clamp `zoom` into range. Never panics, even on inverted or NaN limits.
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }
}

/// Visual parameters for guides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideStyle {
    /// Stroke width at zoom 1.
    pub stroke_width: f64,
    pub color: SerializableColor,
    /// Smallest tick half-size, in pixels.
    pub min_tick_half_size: f64,
    pub zoom_limits: ZoomLimits,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            color: SerializableColor::black(),
            min_tick_half_size: 5.0,
            zoom_limits: ZoomLimits::default(),
        }
    }
}

impl GuideStyle {
    /// Tick half-size compensated for `zoom`.
    pub fn tick_half_size(&self, zoom: f64) -> f64 {
        let zoom = self.zoom_limits.clamp(zoom);
        self.min_tick_half_size
            .max((self.min_tick_half_size / zoom).round())
    }

    /// Stroke width compensated for `zoom`.
    pub fn stroke_width_at(&self, zoom: f64) -> f64 {
        self.stroke_width / self.zoom_limits.clamp(zoom)
    }
}

/// Geometry of one guide, before it is turned into primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub side: Side,
    pub orientation: Orientation,
    /// Coordinate the guide line sits on (Y for horizontal, X for vertical).
    pub anchor: f64,
    /// Extent of the line along its orientation.
    pub span: (f64, f64),
    /// Contributing points, sorted ascending.
    pub tick_points: Vec<f64>,
    pub tick_half_size: f64,
    pub stroke_width: f64,
}

impl Guide {
    /// The long guide line.
    pub fn line(&self) -> Line {
        let (start, end) = self.span;
        Line::new(self.point_at(start, 0.0, 0.0), self.point_at(end, 0.0, 0.0))
    }

    /// Two crossing segments per tick point.
    pub fn ticks(&self) -> Vec<Line> {
        let m = self.tick_half_size;
        self.tick_points
            .iter()
            .flat_map(|&p| {
                [
                    Line::new(self.point_at(p, -m, -m), self.point_at(p, m, m)),
                    Line::new(self.point_at(p, -m, m), self.point_at(p, m, -m)),
                ]
            })
            .collect()
    }

    /// Point at `along` on the guide, offset by `da` along and `dn` across it.
    fn point_at(&self, along: f64, da: f64, dn: f64) -> Point {
        match self.orientation {
            Orientation::Horizontal => Point::new(along + da, self.anchor + dn),
            Orientation::Vertical => Point::new(self.anchor + dn, along + da),
        }
    }
}

/// Build the guide for one side of a shape, if any target aligns with it.
pub fn build_guide(
    own: &ReferenceLines,
    side: Side,
    targets: &[ReferenceLines],
    mode: MatchMode,
    style: &GuideStyle,
    zoom: f64,
) -> Option<Guide> {
    let axis = side.axis();
    let anchor = own.get(side);
    let mut points = own.triple(axis.perpendicular()).to_vec();

    for target in targets {
        if target.triple(axis).iter().any(|&v| mode.matches(anchor, v)) {
            points.extend(target.triple(axis.perpendicular()));
        }
    }

    // Only the shape's own points: nothing to show.
    if points.len() <= 3 {
        return None;
    }

    points.sort_by(f64::total_cmp);
    let span = (points[0], points[points.len() - 1]);

    Some(Guide {
        side,
        orientation: side.orientation(),
        anchor,
        span,
        tick_points: points,
        tick_half_size: style.tick_half_size(zoom),
        stroke_width: style.stroke_width_at(zoom),
    })
}

/// Build guides for all six sides of `moving`.
pub fn build_guides(
    moving: &Shape,
    candidates: &[Shape],
    mode: MatchMode,
    style: &GuideStyle,
    zoom: f64,
) -> SideMap<Option<Guide>> {
    let own = ReferenceLines::of(moving);
    let targets: Vec<ReferenceLines> = candidates
        .iter()
        .filter(|t| is_candidate(moving.id(), t))
        .map(ReferenceLines::of)
        .collect();
    SideMap::from_fn(|side| build_guide(&own, side, &targets, mode, style, zoom))
}

/// Role of a primitive within a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideRole {
    Line,
    Tick,
}

/// A drawable segment handed to the scene collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidePrimitive {
    pub id: GuideId,
    /// Shape owning this guide.
    pub owner: ShapeId,
    pub side: Side,
    pub role: GuideRole,
    pub segment: Line,
    pub stroke_width: f64,
    pub color: SerializableColor,
}

impl GuidePrimitive {
    fn new(owner: ShapeId, side: Side, role: GuideRole, segment: Line, guide: &Guide, style: &GuideStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            side,
            role,
            segment,
            stroke_width: guide.stroke_width,
            color: style.color,
        }
    }
}

/// Primitive IDs of the live guide on one side.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideSlot {
    pub line: GuideId,
    pub ticks: Vec<GuideId>,
}

impl GuideSlot {
    pub fn primitive_count(&self) -> usize {
        1 + self.ticks.len()
    }

    fn ids(&self) -> impl Iterator<Item = GuideId> + '_ {
        std::iter::once(self.line).chain(self.ticks.iter().copied())
    }
}

/// Tracks which guide primitives each shape owns, at most one guide per side.
#[derive(Debug, Default)]
pub struct GuideRegistry {
    owned: HashMap<ShapeId, SideMap<Option<GuideSlot>>>,
}

impl GuideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the guide on `owner`'s `side`.
    ///
    /// The previous primitives are always removed first.
    pub fn replace<S: SceneCollaborator + ?Sized>(
        &mut self,
        scene: &mut S,
        owner: ShapeId,
        side: Side,
        guide: Option<&Guide>,
        style: &GuideStyle,
    ) {
        let slots = self.owned.entry(owner).or_default();
        if let Some(old) = slots[side].take() {
            for id in old.ids() {
                scene.remove_guide_primitive(id);
            }
        }

        let Some(guide) = guide else {
            return;
        };

        let line = GuidePrimitive::new(owner, side, GuideRole::Line, guide.line(), guide, style);
        let mut slot = GuideSlot {
            line: line.id,
            ticks: Vec::with_capacity(guide.tick_points.len() * 2),
        };
        scene.add_guide_primitive(line);
        for segment in guide.ticks() {
            let tick = GuidePrimitive::new(owner, side, GuideRole::Tick, segment, guide, style);
            slot.ticks.push(tick.id);
            scene.add_guide_primitive(tick);
        }
        slots[side] = Some(slot);
    }

    /// Replace all six guides of `owner` as a unit.
    pub fn rebuild<S: SceneCollaborator + ?Sized>(
        &mut self,
        scene: &mut S,
        owner: ShapeId,
        guides: &SideMap<Option<Guide>>,
        style: &GuideStyle,
    ) {
        for (side, guide) in guides.iter() {
            self.replace(scene, owner, side, guide.as_ref(), style);
        }
        if self.primitive_count(owner) == 0 {
            self.owned.remove(&owner);
        }
    }

    /// Remove every guide owned by `owner`. Returns the number of primitives removed.
    pub fn clear_shape<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S, owner: ShapeId) -> usize {
        let Some(slots) = self.owned.remove(&owner) else {
            return 0;
        };
        let mut removed = 0;
        for slot in slots.values().flatten() {
            for id in slot.ids() {
                scene.remove_guide_primitive(id);
                removed += 1;
            }
        }
        removed
    }

    /// Remove every guide of every shape. Returns the number of primitives removed.
    pub fn clear_all<S: SceneCollaborator + ?Sized>(&mut self, scene: &mut S) -> usize {
        let owners: Vec<ShapeId> = self.owned.keys().copied().collect();
        owners
            .into_iter()
            .map(|owner| self.clear_shape(scene, owner))
            .sum()
    }

    /// The live guide slot for a shape and side. Unknown shapes have none.
    pub fn slot(&self, owner: ShapeId, side: Side) -> Option<&GuideSlot> {
        self.owned.get(&owner).and_then(|slots| slots[side].as_ref())
    }

    /// Shapes currently owning at least one guide.
    pub fn owners(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.owned.keys().copied()
    }

    /// Number of live primitives owned by a shape.
    pub fn primitive_count(&self, owner: ShapeId) -> usize {
        self.owned
            .get(&owner)
            .map(|slots| slots.values().flatten().map(GuideSlot::primitive_count).sum::<usize>())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::new(Point::new(x, y), w, h)
    }

    #[test]
    fn test_tick_half_size_zoom_compensation() {
        let style = GuideStyle::default();
        // 0.1 clamps to 0.3: round(5 / 0.3) = 17.
        assert!((style.tick_half_size(0.1) - 17.0).abs() < f64::EPSILON);
        assert!((style.tick_half_size(10.0) - 5.0).abs() < f64::EPSILON);
        assert!((style.tick_half_size(1.0) - 5.0).abs() < f64::EPSILON);
        assert!((style.tick_half_size(0.5) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stroke_width_zoom_compensation() {
        let style = GuideStyle::default();
        assert!((style.stroke_width_at(2.0) - 0.5).abs() < f64::EPSILON);
        assert!((style.stroke_width_at(100.0) - 1.0 / 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp_with_bad_limits_does_not_panic() {
        let inverted = ZoomLimits { min: 5.0, max: 1.0 };
        assert!((inverted.clamp(3.0) - 1.0).abs() < f64::EPSILON);

        let nan = ZoomLimits { min: f64::NAN, max: 2.0 };
        assert!((nan.clamp(3.0) - 2.0).abs() < f64::EPSILON);
        assert!((nan.clamp(0.5) - 0.5).abs() < f64::EPSILON);

        let style = GuideStyle {
            zoom_limits: inverted,
            ..GuideStyle::default()
        };
        assert!((style.tick_half_size(3.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identical_top_spans_both_shapes() {
        let a = rect(0.0, 0.0, 50.0, 50.0);
        let b = rect(200.0, 0.0, 100.0, 80.0);
        let guides = build_guides(&a, &[b], MatchMode::Exact, &GuideStyle::default(), 1.0);

        let top = guides[Side::Top].as_ref().expect("top guide");
        assert_eq!(top.orientation, Orientation::Horizontal);
        assert!((top.anchor - 0.0).abs() < f64::EPSILON);
        assert_eq!(top.span, (0.0, 300.0));
        assert_eq!(top.tick_points, vec![0.0, 25.0, 50.0, 200.0, 250.0, 300.0]);
        assert_eq!(top.line(), Line::new((0.0, 0.0), (300.0, 0.0)));
        assert!(guides[Side::Bottom].is_none());
    }

    #[test]
    fn test_vertical_guide_ticks() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(0.0, 100.0, 20.0, 20.0);
        let guides = build_guides(&a, &[b], MatchMode::Exact, &GuideStyle::default(), 1.0);

        let left = guides[Side::Left].as_ref().expect("left guide");
        assert_eq!(left.orientation, Orientation::Vertical);
        assert_eq!(left.span, (0.0, 120.0));
        let ticks = left.ticks();
        assert_eq!(ticks.len(), 2 * left.tick_points.len());
        assert_eq!(ticks[0], Line::new((-5.0, -5.0), (5.0, 5.0)));
        assert_eq!(ticks[1], Line::new((5.0, -5.0), (-5.0, 5.0)));
    }

    #[test]
    fn test_no_targets_no_guides() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let guides = build_guides(&a, &[], MatchMode::Exact, &GuideStyle::default(), 1.0);
        assert!(guides.values().all(Option::is_none));
    }

    #[test]
    fn test_tolerance_mode_guides() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(3.0, 100.0, 10.0, 10.0);
        let exact = build_guides(&a, &[b.clone()], MatchMode::Exact, &GuideStyle::default(), 1.0);
        assert!(exact[Side::Left].is_none());
        let loose = build_guides(
            &a,
            &[b],
            MatchMode::Tolerance { tolerance: 5.0 },
            &GuideStyle::default(),
            1.0,
        );
        assert!(loose[Side::Left].is_some());
    }

    #[test]
    fn test_rebuild_is_consistent_and_does_not_leak() {
        let a = rect(0.0, 0.0, 50.0, 50.0);
        let b = rect(200.0, 0.0, 100.0, 80.0);
        let style = GuideStyle::default();
        let mut scene = MemoryScene::new();
        let mut registry = GuideRegistry::new();

        let first = build_guides(&a, &[b.clone()], MatchMode::Exact, &style, 1.0);
        registry.rebuild(&mut scene, a.id(), &first, &style);
        let count = scene.guide_count();
        assert_eq!(count, 1 + 2 * 6);

        let second = build_guides(&a, &[b], MatchMode::Exact, &style, 1.0);
        assert_eq!(first, second);
        registry.rebuild(&mut scene, a.id(), &second, &style);
        assert_eq!(scene.guide_count(), count);
        assert_eq!(registry.primitive_count(a.id()), count);

        let slot = registry.slot(a.id(), Side::Top).expect("top slot");
        assert_eq!(slot.primitive_count(), 13);
        assert!(registry.slot(a.id(), Side::Bottom).is_none());
    }

    #[test]
    fn test_clear_all_removes_everything() {
        let a = rect(0.0, 0.0, 50.0, 50.0);
        let b = rect(200.0, 0.0, 100.0, 80.0);
        let style = GuideStyle::default();
        let mut scene = MemoryScene::new();
        let mut registry = GuideRegistry::new();

        let guides = build_guides(&a, &[b.clone()], MatchMode::Exact, &style, 1.0);
        registry.rebuild(&mut scene, a.id(), &guides, &style);
        let guides = build_guides(&b, &[a.clone()], MatchMode::Exact, &style, 1.0);
        registry.rebuild(&mut scene, b.id(), &guides, &style);
        let total = scene.guide_count();
        assert!(total > 0);

        assert_eq!(registry.clear_all(&mut scene), total);
        assert_eq!(scene.guide_count(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_shape_has_no_guides() {
        let registry = GuideRegistry::new();
        let id = Uuid::new_v4();
        assert!(registry.slot(id, Side::Left).is_none());
        assert_eq!(registry.primitive_count(id), 0);
    }

    #[test]
    fn test_color_roundtrip_through_peniko() {
        let color: Color = SerializableColor::black().into();
        assert_eq!(SerializableColor::from(color), SerializableColor::black());
    }
}
