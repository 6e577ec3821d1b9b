//! Closest-point queries against line segments

use super::math::Vec3;

/// Project `point` onto the segment `a..b`.
///
/// The projection parameter is measured in world units along the segment and
/// clamped to `[0, |b - a|]`. A zero-length segment always yields `a`.
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let line = b - a;
    let len = line.len();
    if len == 0.0 {
        return a;
    }

    let dir = line * (1.0 / len);
    let t = (point - a).dot(dir).clamp(0.0, len);
    a + dir * t
}

/// Distance from `point` to the segment `a..b`
pub fn distance_to_segment(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    point.distance(closest_point_on_segment(point, a, b))
}
