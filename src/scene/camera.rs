//! Orbit camera with perspective and orthographic projection
//!
//! All screen-space ruler math goes through `project` and `ray_through_ndc`,
//! so live overlays, pointer picking and image export agree on one
//! projection.

use crate::geometry::{Ray, Vec2, Vec3};

/// Closest the orbit camera may get to its target
pub const MIN_DISTANCE: f32 = 0.5;
/// Furthest the orbit camera may get from its target
pub const MAX_DISTANCE: f32 = 100.0;
/// Dolly step for one perspective zoom click
pub const ZOOM_SPEED: f32 = 0.5;
/// Frustum scale for one orthographic zoom click
pub const ORTHO_ZOOM_FACTOR: f32 = 0.9;

/// Where a freshly loaded model is viewed from
const HOME_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

/// Projection model of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective { fov_y_degrees: f32 },
    /// `frustum_height` is the visible world height
    Orthographic { frustum_height: f32 },
}

/// Camera state for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: HOME_POSITION,
            target: Vec3::ZERO,
            up: Vec3::UP,
            projection: Projection::Perspective { fov_y_degrees: 50.0 },
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
        }
    }

    /// Back to the default view used after a model load
    pub fn reset(&mut self) {
        self.position = HOME_POSITION;
        self.target = Vec3::ZERO;
    }

    /// Camera axes in world space: (right, up, forward)
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.world_direction();
        let mut right = forward.cross(self.up).normalize();
        if right == Vec3::ZERO {
            // Looking straight along `up`
            right = Vec3::new(1.0, 0.0, 0.0);
        }
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Unit vector the camera looks along
    pub fn world_direction(&self) -> Vec3 {
        let dir = (self.target - self.position).normalize();
        if dir == Vec3::ZERO {
            return Vec3::new(0.0, 0.0, -1.0);
        }
        dir
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    /// Half extents of the view at unit depth (perspective) or of the
    /// frustum (orthographic)
    fn half_extents(&self) -> (f32, f32) {
        let half_h = match self.projection {
            Projection::Perspective { fov_y_degrees } => (fov_y_degrees.to_radians() * 0.5).tan(),
            Projection::Orthographic { frustum_height } => frustum_height * 0.5,
        };
        (half_h * self.aspect, half_h)
    }

    /// Project a world-space point.
    ///
    /// Returns NDC x/y (+Y up) in `x`/`y` and the view depth along the
    /// camera's forward axis in `z`. Points behind the camera come back
    /// mirrored with a negative depth.
    pub fn project(&self, world: Vec3) -> Vec3 {
        let (right, up, forward) = self.basis();
        let rel = world - self.position;
        let cx = rel.dot(right);
        let cy = rel.dot(up);
        let depth = rel.dot(forward);
        let (half_w, half_h) = self.half_extents();

        match self.projection {
            Projection::Perspective { .. } => {
                let d = if depth.abs() < 1e-6 { 1e-6f32.copysign(depth) } else { depth };
                Vec3::new(cx / (d * half_w), cy / (d * half_h), depth)
            }
            Projection::Orthographic { .. } => Vec3::new(cx / half_w, cy / half_h, depth),
        }
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let (right, up, forward) = self.basis();
        let (half_w, half_h) = self.half_extents();

        match self.projection {
            Projection::Perspective { .. } => {
                let dir = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
                Ray::new(self.position, dir)
            }
            Projection::Orthographic { .. } => {
                let origin = self.position + right * (ndc.x * half_w) + up * (ndc.y * half_h);
                Ray::new(origin, forward)
            }
        }
    }

    /// Point `distance` units along the ray through `ndc`
    pub fn point_at_distance(&self, ndc: Vec2, distance: f32) -> Vec3 {
        self.ray_through_ndc(ndc).at(distance)
    }

    /// Switch projection, keeping the apparent size of the target region
    pub fn set_orthographic(&mut self, orthographic: bool) {
        if orthographic == self.is_orthographic() {
            return;
        }
        self.projection = if orthographic {
            Projection::Orthographic { frustum_height: self.distance_to_target() * 1.5 }
        } else {
            Projection::Perspective { fov_y_degrees: 50.0 }
        };
    }

    /// Rotate the camera around its target.
    /// `d_azimuth` spins about the world up axis, `d_elevation` tilts.
    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        let offset = self.position - self.target;
        let radius = offset.len();
        if radius == 0.0 {
            return;
        }

        let azimuth = offset.x.atan2(offset.z) + d_azimuth;
        let elevation = ((offset.y / radius).clamp(-1.0, 1.0).asin() + d_elevation).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );

        let (sin_el, cos_el) = elevation.sin_cos();
        let (sin_az, cos_az) = azimuth.sin_cos();
        self.position = self.target + Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * radius;
    }

    /// Zoom one step in (`steps > 0`) or out.
    /// Perspective dollies along the view direction, orthographic scales the frustum.
    pub fn zoom(&mut self, steps: f32) {
        if let Projection::Orthographic { frustum_height } = &mut self.projection {
            *frustum_height *= ORTHO_ZOOM_FACTOR.powf(steps);
            return;
        }

        let dir = self.world_direction();
        let distance = (self.distance_to_target() - steps * ZOOM_SPEED)
            .clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = self.target - dir * distance;
    }

    /// Move camera and target together in the view plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (right, up, _) = self.basis();
        let offset = right * dx + up * dy;
        self.position += offset;
        self.target += offset;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> Camera {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.target = Vec3::ZERO;
        camera
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new();
        let p = camera.project(camera.target);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((p.z - camera.distance_to_target()).abs() < 1e-4);
    }

    #[test]
    fn test_project_ray_roundtrip() {
        let mut camera = Camera::new();
        camera.aspect = 16.0 / 9.0;
        let world = Vec3::new(0.7, -0.4, 1.3);
        let p = camera.project(world);

        let ray = camera.ray_through_ndc(Vec2::new(p.x, p.y));
        let t = (world - ray.origin).dot(ray.direction);
        assert!(ray.at(t).distance(world) < 1e-4);
    }

    #[test]
    fn test_orthographic_roundtrip() {
        let mut camera = front_camera();
        camera.set_orthographic(true);
        assert_eq!(camera.projection, Projection::Orthographic { frustum_height: 15.0 });

        let world = Vec3::new(2.0, 3.0, 0.0);
        let p = camera.project(world);
        assert!((p.y - 3.0 / 7.5).abs() < 1e-5);

        let ray = camera.ray_through_ndc(Vec2::new(p.x, p.y));
        assert!(ray.at(10.0).distance(world) < 1e-4);
    }

    #[test]
    fn test_screen_up_is_world_up() {
        let camera = front_camera();
        assert!(camera.project(Vec3::new(0.0, 1.0, 0.0)).y > 0.0);
        assert!(camera.project(Vec3::new(1.0, 0.0, 0.0)).x > 0.0);
    }

    #[test]
    fn test_point_at_distance_center() {
        let camera = front_camera();
        let p = camera.point_at_distance(Vec2::ZERO, camera.distance_to_target());
        assert!(p.approx_eq(camera.target, 1e-5));
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = front_camera();
        camera.zoom(1000.0);
        assert!((camera.distance_to_target() - MIN_DISTANCE).abs() < 1e-4);
        camera.zoom(-1000.0);
        assert!((camera.distance_to_target() - MAX_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let mut camera = Camera::new();
        let r = camera.distance_to_target();
        camera.orbit(0.3, -0.2);
        assert!((camera.distance_to_target() - r).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_target() {
        let mut camera = front_camera();
        camera.pan(1.0, 0.0);
        assert!(camera.target.approx_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        assert!((camera.distance_to_target() - 10.0).abs() < 1e-5);
    }
}
