//! Screen-space visuals for every measurement
//!
//! Nothing here is stored between frames as truth; the store holds world
//! points and this module re-derives marker, line and label placement from
//! the current camera each time it runs. Positions are in viewport-local
//! pixels (origin at the viewport's top-left corner).

use crate::geometry::{Vec2, Vec3};
use crate::scene::ViewContext;
use super::format::{UnitSystem, format_distance};
use super::store::{Measurement, MeasurementStore};

/// Anchor marker radius in pixels
pub const MARKER_RADIUS: f32 = 10.0;
/// Label offset above the line when upright
pub const LABEL_OFFSET_UPRIGHT: f32 = -24.0;
/// Label offset below the line when flipped
pub const LABEL_OFFSET_FLIPPED: f32 = 8.0;
/// Label box height in pixels
pub const LABEL_HEIGHT: f32 = 16.0;
/// Average glyph advance used to size the label box
pub const LABEL_CHAR_WIDTH: f32 = 7.0;
pub const LABEL_PADDING: f32 = 4.0;

/// Placement of one distance label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVisual {
    pub text: String,
    /// Line midpoint the label hangs off
    pub anchor: Vec2,
    /// Rotation in degrees, line angle plus 180 when flipped
    pub rotation_deg: f32,
    /// Perpendicular offset from the line in pixels
    pub offset_y: f32,
    pub flipped: bool,
}

/// Everything needed to draw one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementVisual {
    pub anchors: [Vec2; 2],
    pub line_origin: Vec2,
    pub line_length: f32,
    pub line_angle_deg: f32,
    pub label: LabelVisual,
    pub selected: bool,
    /// Either endpoint is at or behind the camera's near plane
    pub behind_camera: bool,
}

impl MeasurementVisual {
    /// Which anchor, if any, lies within `radius` of `p`.
    /// The second anchor is drawn on top, so it wins ties.
    pub fn anchor_at(&self, p: Vec2, radius: f32) -> Option<usize> {
        (0..2).rev().find(|&i| self.anchors[i].distance(p) <= radius)
    }

    /// Approximate label box size from its text
    pub fn label_size(&self) -> Vec2 {
        let chars = self.label.text.chars().count() as f32;
        Vec2::new(chars * LABEL_CHAR_WIDTH + LABEL_PADDING * 2.0, LABEL_HEIGHT)
    }

    /// Centre of the label box.
    ///
    /// The box hangs off the line midpoint in the line's own rotated frame,
    /// `offset_y` pixels along the line normal.
    pub fn label_center(&self) -> Vec2 {
        let normal = self.label.offset_y + LABEL_HEIGHT * 0.5;
        let (sin, cos) = self.line_angle_deg.to_radians().sin_cos();
        Vec2::new(
            self.label.anchor.x - normal * sin,
            self.label.anchor.y + normal * cos,
        )
    }

    /// Hit test against the rotated label box
    pub fn label_contains(&self, p: Vec2) -> bool {
        let c = self.label_center();
        let (sin, cos) = self.line_angle_deg.to_radians().sin_cos();
        let dx = p.x - c.x;
        let dy = p.y - c.y;
        // Into the line frame
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;
        let size = self.label_size();
        lx.abs() <= size.x * 0.5 && ly.abs() <= size.y * 0.5
    }
}

/// Viewport-local pixel position of a world point, and its view depth
pub fn project_point(ctx: &ViewContext<'_>, world: Vec3) -> (Vec2, f32) {
    let ndc = ctx.camera.project(world);
    let v = ctx.viewport;
    let local = Vec2::new(
        (ndc.x * 0.5 + 0.5) * v.w,
        (-ndc.y * 0.5 + 0.5) * v.h,
    );
    (local, ndc.z)
}

/// Real-world length of a measurement, in metres
pub fn original_distance(ctx: &ViewContext<'_>, measurement: &Measurement) -> f64 {
    f64::from(ctx.scale.to_original(measurement.world_length()))
}

/// Label text for a measurement in the given units
pub fn measurement_label(ctx: &ViewContext<'_>, measurement: &Measurement, units: UnitSystem) -> String {
    format_distance(original_distance(ctx, measurement), units)
}

/// Lay out one measurement for the current view
pub fn project_measurement(
    ctx: &ViewContext<'_>,
    measurement: &Measurement,
    units: UnitSystem,
    selected: bool,
) -> MeasurementVisual {
    let (p1, depth1) = project_point(ctx, measurement.point1);
    let (p2, depth2) = project_point(ctx, measurement.point2);

    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let length = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx).to_degrees();

    let flipped = angle.abs() > 90.0;
    let label = LabelVisual {
        text: measurement_label(ctx, measurement, units),
        anchor: p1.midpoint(p2),
        rotation_deg: if flipped { angle + 180.0 } else { angle },
        offset_y: if flipped { LABEL_OFFSET_FLIPPED } else { LABEL_OFFSET_UPRIGHT },
        flipped,
    };

    let near = ctx.camera.near;
    MeasurementVisual {
        anchors: [p1, p2],
        line_origin: p1,
        line_length: length,
        line_angle_deg: angle,
        label,
        selected,
        behind_camera: depth1 <= near || depth2 <= near,
    }
}

/// Keeps the visual list in step with the store
#[derive(Debug, Default)]
pub struct MeasurementRenderer {
    visuals: Vec<MeasurementVisual>,
    visible: bool,
}

impl MeasurementRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visuals(&self) -> &[MeasurementVisual] {
        if self.visible { &self.visuals } else { &[] }
    }

    /// Rebuild all visuals from the store.
    ///
    /// Extra visuals are dropped when the store shrank and new ones are
    /// created when it grew, so the list always matches the store 1:1.
    pub fn sync(&mut self, store: &MeasurementStore, ctx: &ViewContext<'_>, units: UnitSystem) {
        let selected = store.selected();
        self.visuals.truncate(store.len());

        for (i, m) in store.iter().enumerate() {
            let visual = project_measurement(ctx, m, units, selected == Some(i));
            match self.visuals.get_mut(i) {
                Some(slot) => *slot = visual,
                None => self.visuals.push(visual),
            }
        }

        self.visible = true;
    }

    /// Hide everything without touching the store
    pub fn hide(&mut self) {
        self.visible = false;
    }
}
