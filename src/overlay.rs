//! Ruler overlay drawn over the 3D view, and the same marks on an export

use macroquad::prelude::*;
use ruler_view::ruler::{ExportMark, MeasurementVisual};
use ruler_view::scene::Viewport;

const LINE_COLOR: Color = Color::new(1.0, 0.0, 0.0, 0.8);
const SELECTED_COLOR: Color = Color::new(1.0, 0.75, 0.0, 0.95);
const MARKER_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 0.9);
const LABEL_BG: Color = Color::new(0.0, 0.0, 0.0, 0.8);
const LABEL_FONT_SIZE: u16 = 14;
const EXPORT_FONT_SIZE: u16 = 14;

fn draw_marker(x: f32, y: f32, radius: f32, fill: Color) {
    draw_circle(x, y, radius, fill);
    draw_circle_lines(x, y, radius, 2.0, MARKER_OUTLINE);
}

/// Text centred on `center`, rotated by `rotation` radians around it
fn draw_centered_text(text: &str, center: Vec2, rotation: f32, font_size: u16, color: Color) {
    let dims = measure_text(text, None, font_size, 1.0);
    // Baseline start, in the label's own frame
    let local = vec2(-dims.width * 0.5, dims.offset_y * 0.5);
    let (sin, cos) = rotation.sin_cos();
    let start = center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos);

    draw_text_ex(
        text,
        start.x,
        start.y,
        TextParams {
            font_size,
            color,
            rotation,
            ..Default::default()
        },
    );
}

/// Markers, lines and labels for every visible measurement
pub fn draw_ruler(visuals: &[MeasurementVisual], viewport: &Viewport, marker_radius: f32) {
    let origin = vec2(viewport.x, viewport.y);

    for v in visuals.iter().filter(|v| !v.behind_camera) {
        let color = if v.selected { SELECTED_COLOR } else { LINE_COLOR };
        let p1 = origin + vec2(v.anchors[0].x, v.anchors[0].y);
        let p2 = origin + vec2(v.anchors[1].x, v.anchors[1].y);

        draw_line(p1.x, p1.y, p2.x, p2.y, 2.0, color);
        draw_marker(p1.x, p1.y, marker_radius, color);
        draw_marker(p2.x, p2.y, marker_radius, color);

        let size = v.label_size();
        let c = v.label_center();
        let center = origin + vec2(c.x, c.y);
        let rotation = v.label.rotation_deg.to_radians();
        draw_rectangle_ex(
            center.x,
            center.y,
            size.x,
            size.y,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation,
                color: LABEL_BG,
            },
        );
        draw_centered_text(&v.label.text, center, rotation, LABEL_FONT_SIZE, WHITE);
    }
}

/// Marks on the export render target: unrotated labels above each line
pub fn draw_export_marks(marks: &[ExportMark], marker_radius: f32) {
    for mark in marks {
        draw_line(mark.p1.x, mark.p1.y, mark.p2.x, mark.p2.y, 2.0, LINE_COLOR);
        draw_marker(mark.p1.x, mark.p1.y, marker_radius, LINE_COLOR);
        draw_marker(mark.p2.x, mark.p2.y, marker_radius, LINE_COLOR);

        let dims = measure_text(&mark.label, None, EXPORT_FONT_SIZE, 1.0);
        let padding = 6.0;
        let bg = vec2(dims.width + padding * 2.0, 20.0);
        draw_rectangle(
            mark.label_anchor.x - bg.x * 0.5,
            mark.label_anchor.y - bg.y * 0.5,
            bg.x,
            bg.y,
            LABEL_BG,
        );
        let center = vec2(mark.label_anchor.x, mark.label_anchor.y);
        draw_centered_text(&mark.label, center, 0.0, EXPORT_FONT_SIZE, WHITE);
    }
}
