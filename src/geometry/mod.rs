//! Geometry utilities
//!
//! - `math` - Vec3, Vec2 and 4x4 transform helpers
//! - `ray` - rays and ray/triangle intersection
//! - `segment` - closest point on a segment

pub mod math;
pub mod ray;
pub mod segment;

pub use math::{
    Vec2, Vec3, Mat4,
    mat4_identity, mat4_translation, mat4_scale,
    mat4_mul, mat4_transform_point,
};
pub use ray::{Ray, ray_triangle_intersect};
pub use segment::{closest_point_on_segment, distance_to_segment};
