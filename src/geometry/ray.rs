//! Rays and ray/triangle intersection for surface picking

use super::math::Vec3;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray-triangle intersection using Möller–Trumbore.
///
/// Both faces of the triangle are hit. Returns the distance along the ray,
/// or None if the ray misses or the hit lies behind the origin.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 0.0000001;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!(p.approx_eq(Vec3::new(5.0, 0.0, 0.0), 0.001));
    }

    #[test]
    fn test_hit_from_above() {
        let (a, b, c) = floor_triangle();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let t = ray_triangle_intersect(&ray, a, b, c);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_back_face() {
        let (a, b, c) = floor_triangle();
        let ray = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(ray_triangle_intersect(&ray, a, b, c).is_some());
    }

    #[test]
    fn test_miss_outside_and_behind() {
        let (a, b, c) = floor_triangle();
        let outside = Ray::new(Vec3::new(5.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(ray_triangle_intersect(&outside, a, b, c).is_none());

        let behind = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(ray_triangle_intersect(&behind, a, b, c).is_none());
    }
}
