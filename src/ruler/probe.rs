//! Surface probe: turn a pointer position into a ruler anchor on the model
//!
//! A raw ray hit is rarely where the user meant to click, so hits close to
//! a corner or an edge of the hit triangle are pulled onto it. The snap
//! distance is defined in file units and divided by the normalization
//! factor, so snapping feels the same whatever size the model was loaded at.

use crate::geometry::{Vec2, Vec3, closest_point_on_segment};
use crate::scene::ViewContext;

/// Snap radius in file units when nothing else is configured
pub const DEFAULT_SNAP_RADIUS: f32 = 0.5;

/// What a probed point was attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Exactly on a triangle corner
    Vertex,
    /// On the nearest triangle edge
    Edge,
    /// The raw ray hit
    Surface,
}

/// Resolved anchor on the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub point: Vec3,
    pub kind: SnapKind,
}

/// Turns a screen position into a world-space point
pub trait PointResolver {
    fn resolve(&self, screen: Vec2) -> Vec3;
}

/// Decide where a hit on `triangle` should land.
///
/// Vertices win inside half the threshold, edges inside the full
/// threshold, otherwise the hit point is kept.
pub fn snap_to_triangle(hit: Vec3, triangle: [Vec3; 3], threshold: f32) -> ProbeHit {
    let mut closest_vertex = triangle[0];
    let mut closest_vertex_dist = f32::INFINITY;
    for v in triangle {
        let dist = hit.distance(v);
        if dist < closest_vertex_dist {
            closest_vertex_dist = dist;
            closest_vertex = v;
        }
    }

    let mut closest_edge_point = hit;
    let mut closest_edge_dist = f32::INFINITY;
    for i in 0..3 {
        let edge_point = closest_point_on_segment(hit, triangle[i], triangle[(i + 1) % 3]);
        let dist = hit.distance(edge_point);
        if dist < closest_edge_dist {
            closest_edge_dist = dist;
            closest_edge_point = edge_point;
        }
    }

    if closest_vertex_dist < threshold * 0.5 {
        ProbeHit { point: closest_vertex, kind: SnapKind::Vertex }
    } else if closest_edge_dist < threshold {
        ProbeHit { point: closest_edge_point, kind: SnapKind::Edge }
    } else {
        ProbeHit { point: hit, kind: SnapKind::Surface }
    }
}

/// Pointer-to-model probe for one view
#[derive(Clone, Copy)]
pub struct SurfaceProbe<'a> {
    ctx: ViewContext<'a>,
    snap_radius: f32,
}

impl<'a> SurfaceProbe<'a> {
    pub fn new(ctx: ViewContext<'a>) -> Self {
        Self {
            ctx,
            snap_radius: DEFAULT_SNAP_RADIUS,
        }
    }

    pub fn with_snap_radius(mut self, snap_radius: f32) -> Self {
        self.snap_radius = snap_radius;
        self
    }

    /// Snap threshold in scene units
    pub fn snap_threshold(&self) -> f32 {
        self.snap_radius / self.ctx.scale.scale_factor
    }

    /// Best anchor under a window-space pointer position, or None when the
    /// pointer is off the model or no model is loaded
    pub fn probe(&self, screen: Vec2) -> Option<ProbeHit> {
        let model = self.ctx.model?;
        if self.ctx.viewport.is_empty() {
            return None;
        }

        let ndc = self.ctx.viewport.to_ndc(screen);
        let ray = self.ctx.camera.ray_through_ndc(ndc);
        let hit = model.intersect(&ray)?;

        let Some(triangle) = hit.triangle else {
            return Some(ProbeHit { point: hit.point, kind: SnapKind::Surface });
        };

        let snapped = snap_to_triangle(hit.point, triangle, self.snap_threshold());
        log::trace!("probe at ({:.1}, {:.1}) -> {:?}", screen.x, screen.y, snapped.kind);
        Some(snapped)
    }

    /// Point along the pointer ray at the camera's distance to its target
    pub fn fallback(&self, screen: Vec2) -> Vec3 {
        let ndc = self.ctx.viewport.to_ndc(screen);
        let camera = self.ctx.camera;
        camera.point_at_distance(ndc, camera.distance_to_target())
    }
}

impl PointResolver for SurfaceProbe<'_> {
    fn resolve(&self, screen: Vec2) -> Vec3 {
        match self.probe(screen) {
            Some(hit) => hit.point,
            None => self.fallback(screen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Camera, Mesh, Model, ModelFormat, Node, Viewport};

    fn triangle() -> [Vec3; 3] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ]
    }

    #[test]
    fn test_vertex_snap_inside_half_threshold() {
        let hit = Vec3::new(0.2, 0.1, 0.0);
        let snapped = snap_to_triangle(hit, triangle(), 1.0);
        assert_eq!(snapped.kind, SnapKind::Vertex);
        assert_eq!(snapped.point, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_vertex_beats_edge() {
        // 0.3 from the corner and 0.1 from an edge: both in range, vertex wins
        let hit = Vec3::new(0.1, 0.283, 0.0);
        let snapped = snap_to_triangle(hit, triangle(), 1.0);
        assert_eq!(snapped.kind, SnapKind::Vertex);
    }

    #[test]
    fn test_edge_snap() {
        let hit = Vec3::new(2.0, 0.3, 0.0);
        let snapped = snap_to_triangle(hit, triangle(), 1.0);
        assert_eq!(snapped.kind, SnapKind::Edge);
        assert!(snapped.point.approx_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_surface_when_far_from_everything() {
        let hit = Vec3::new(1.2, 1.2, 0.0);
        let snapped = snap_to_triangle(hit, triangle(), 1.0);
        assert_eq!(snapped.kind, SnapKind::Surface);
        assert_eq!(snapped.point, hit);
    }

    #[test]
    fn test_probe_without_model_is_none() {
        let camera = Camera::new();
        let viewport = Viewport::screen(800.0, 600.0);
        let probe = SurfaceProbe::new(ViewContext::empty(&camera, &viewport));
        for p in [Vec2::new(0.0, 0.0), Vec2::new(400.0, 300.0), Vec2::new(799.0, 599.0)] {
            assert!(probe.probe(p).is_none());
        }
    }

    #[test]
    fn test_fallback_lands_at_target_distance() {
        let camera = Camera::new();
        let viewport = Viewport::screen(800.0, 600.0);
        let probe = SurfaceProbe::new(ViewContext::empty(&camera, &viewport));

        let p = probe.resolve(viewport.center());
        assert!(p.approx_eq(camera.target, 1e-4));

        let q = probe.resolve(Vec2::new(100.0, 100.0));
        assert!((q.distance(camera.position) - camera.distance_to_target()).abs() < 1e-3);
    }

    #[test]
    fn test_probe_snaps_on_model_corner() {
        // A single 2x2 square facing the camera, loaded at scale 5/2
        let quad = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            Some(vec![0, 1, 2, 0, 2, 3]),
        );
        let model = Model::load(Node::new("quad").with_mesh(quad), ModelFormat::Obj);

        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        let viewport = Viewport::screen(600.0, 600.0);
        let ctx = ViewContext::with_model(&camera, &viewport, &model);
        let probe = SurfaceProbe::new(ctx).with_snap_radius(0.5);

        // Threshold is 0.5 / 2.5 = 0.2 scene units
        assert!((probe.snap_threshold() - 0.2).abs() < 1e-6);

        // Aim slightly inside the top-right corner at (2.5, 2.5, 0)
        let near_corner = camera.project(Vec3::new(2.46, 2.42, 0.0));
        let screen = viewport.to_screen(Vec2::new(near_corner.x, near_corner.y));
        let hit = probe.probe(screen).expect("corner is on the model");
        assert_eq!(hit.kind, SnapKind::Vertex);
        assert!(hit.point.approx_eq(Vec3::new(2.5, 2.5, 0.0), 1e-4));

        // Just above the bottom edge
        let near_edge = camera.project(Vec3::new(0.0, -2.45, 0.0));
        let screen = viewport.to_screen(Vec2::new(near_edge.x, near_edge.y));
        let edge = probe.probe(screen).expect("edge is on the model");
        assert_eq!(edge.kind, SnapKind::Edge);
        assert!(edge.point.approx_eq(Vec3::new(0.0, -2.5, 0.0), 1e-4));

        // Off to the side misses entirely
        assert!(probe.probe(Vec2::new(5.0, 5.0)).is_none());
    }
}
