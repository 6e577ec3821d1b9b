//! Loaded model: a node hierarchy of triangle meshes
//!
//! Meshes come from an external loader; this module only stores them,
//! normalizes the whole model into the scene and answers ray queries.

use crate::geometry::{
    Mat4, Ray, Vec3,
    mat4_identity, mat4_mul, mat4_scale, mat4_transform_point, mat4_translation,
    ray_triangle_intersect,
};
use super::scale::{ModelFormat, ModelScale};

/// Triangle mesh in node-local coordinates
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Triangle list; `None` means every three positions form a face
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    pub fn face_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Local-space corners of a face, or None if its indices are out of range
    pub fn face(&self, face: usize) -> Option<[Vec3; 3]> {
        let corner = |i: usize| -> Option<Vec3> {
            let slot = face * 3 + i;
            let index = match &self.indices {
                Some(indices) => *indices.get(slot)? as usize,
                None => slot,
            };
            self.positions.get(index).copied()
        };
        Some([corner(0)?, corner(1)?, corner(2)?])
    }

    /// Iterate all well-formed faces
    pub fn faces(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.face_count()).filter_map(move |f| self.face(f))
    }
}

/// Scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub local: Mat4,
    pub mesh: Option<Mesh>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: mat4_identity(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_transform(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Visit every mesh in this subtree with its world transform
    pub fn visit_meshes<'a>(&'a self, parent: &Mat4, f: &mut dyn FnMut(&'a Mesh, &Mat4)) {
        let world = mat4_mul(parent, &self.local);
        if let Some(mesh) = &self.mesh {
            f(mesh, &world);
        }
        for child in &self.children {
            child.visit_meshes(&world, f);
        }
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }
}

/// Nearest intersection of a ray with a surface
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub distance: f32,
    /// World-space corners of the face that was hit, when known
    pub triangle: Option<[Vec3; 3]>,
}

/// Anything a pointer ray can land on
pub trait RayTarget {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;
}

/// A loaded, normalized model
#[derive(Debug, Clone)]
pub struct Model {
    pub root: Node,
    pub format: ModelFormat,
    scale: ModelScale,
}

impl Model {
    /// Take ownership of a loaded hierarchy and normalize it into the scene.
    ///
    /// The largest bounding-box extent becomes `scale::NORMALIZED_SIZE` world units
    /// and the box is centered on the origin. The resulting `ModelScale` is
    /// computed here once and stays fixed for the life of the model.
    pub fn load(mut root: Node, format: ModelFormat) -> Self {
        let bounds = world_bounds(&root);
        let max_dim = bounds.size().max_element();
        let scale = ModelScale::detect(format, max_dim);

        let normalize = mat4_mul(
            &mat4_scale(scale.scale_factor),
            &mat4_translation(-bounds.center()),
        );
        root.local = mat4_mul(&normalize, &root.local);

        log::info!(
            "loaded {:?} model: max extent {:.3}, scale factor {:.5}, unit conversion {}",
            format, max_dim, scale.scale_factor, scale.unit_conversion
        );

        Self { root, format, scale }
    }

    pub fn scale(&self) -> ModelScale {
        self.scale
    }

    pub fn bounds(&self) -> Bounds {
        world_bounds(&self.root)
    }

    /// All faces in world space
    pub fn world_triangles(&self) -> Vec<[Vec3; 3]> {
        let mut out = Vec::new();
        self.root.visit_meshes(&mat4_identity(), &mut |mesh, world| {
            out.extend(mesh.faces().map(|tri| tri.map(|v| mat4_transform_point(world, v))));
        });
        out
    }
}

impl RayTarget for Model {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut best: Option<SurfaceHit> = None;
        self.root.visit_meshes(&mat4_identity(), &mut |mesh, world| {
            for tri in mesh.faces() {
                let [a, b, c] = tri.map(|v| mat4_transform_point(world, v));
                if let Some(t) = ray_triangle_intersect(ray, a, b, c) {
                    if best.map_or(true, |hit| t < hit.distance) {
                        best = Some(SurfaceHit {
                            point: ray.at(t),
                            distance: t,
                            triangle: Some([a, b, c]),
                        });
                    }
                }
            }
        });
        best
    }
}

/// World-space bounds of every vertex under `root`
pub fn world_bounds(root: &Node) -> Bounds {
    let mut bounds = Bounds::empty();
    root.visit_meshes(&mat4_identity(), &mut |mesh, world| {
        for &p in &mesh.positions {
            bounds.extend(mat4_transform_point(world, p));
        }
    });
    bounds
}
