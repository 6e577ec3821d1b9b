//! Flat-shaded model drawing for the host window
//!
//! Triangles are projected with the same camera the ruler uses, sorted back
//! to front and filled with macroquad's 2D triangle call. No depth buffer:
//! the painter's order is good enough for the closed, convex-ish models the
//! viewer shows.

use macroquad::prelude::{Color, draw_triangle, vec2};
use ruler_view::geometry::{Vec2, Vec3};
use ruler_view::scene::ViewContext;

/// Direction the light travels, world space
const LIGHT_DIR: Vec3 = Vec3::new(-0.4, -1.0, -0.6);
const AMBIENT: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Mean view depth, larger is farther
    pub depth: f32,
    pub shade: f32,
}

/// Two-sided directional light: faces are lit whichever way they wind
fn shade_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.dot(light_dir.normalize() * -1.0).abs();
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

/// Project, cull and depth-sort world triangles for one view
pub fn prepare_triangles(triangles: &[[Vec3; 3]], ctx: &ViewContext<'_>) -> Vec<ScreenTriangle> {
    let near = ctx.camera.near;
    let mut out: Vec<ScreenTriangle> = triangles
        .iter()
        .filter_map(|&[a, b, c]| {
            let normal = (b - a).cross(c - a).normalize();
            if normal == Vec3::ZERO {
                return None;
            }

            let projected = [a, b, c].map(|v| ctx.camera.project(v));
            if projected.iter().any(|p| p.z <= near) {
                return None;
            }

            Some(ScreenTriangle {
                points: projected.map(|p| ctx.viewport.to_screen(Vec2::new(p.x, p.y))),
                depth: (projected[0].z + projected[1].z + projected[2].z) / 3.0,
                shade: shade_intensity(normal, LIGHT_DIR, AMBIENT),
            })
        })
        .collect();

    out.sort_by(|l, r| r.depth.total_cmp(&l.depth));
    out
}

fn shade_color(color: Color, shade: f32) -> Color {
    Color::new(color.r * shade, color.g * shade, color.b * shade, color.a)
}

pub fn draw_triangles(triangles: &[ScreenTriangle], base: Color) {
    for tri in triangles {
        let [a, b, c] = tri.points;
        draw_triangle(
            vec2(a.x, a.y),
            vec2(b.x, b.y),
            vec2(c.x, c.y),
            shade_color(base, tri.shade),
        );
    }
}
