//! Procedural test geometry
//!
//! The viewer does not parse model files itself; these builders give the
//! host something to measure when no loader is wired up.

use crate::geometry::{Vec3, mat4_translation};
use super::model::{Mesh, Node};

/// Axis-aligned box as an indexed mesh (12 triangles)
pub fn box_mesh(min: Vec3, max: Vec3) -> Mesh {
    let positions = vec![
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ];

    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 1, 5, 0, 5, 4, // bottom
        3, 7, 6, 3, 6, 2, // top
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];

    Mesh::new(positions, Some(indices))
}

/// Gable roof: a triangular prism along X, ridge at `ridge_height` above `base_y`.
/// Built without an index buffer.
pub fn gable_roof(min_x: f32, max_x: f32, min_z: f32, max_z: f32, base_y: f32, ridge_height: f32) -> Mesh {
    let mid_z = (min_z + max_z) * 0.5;
    let top = base_y + ridge_height;

    let a0 = Vec3::new(min_x, base_y, min_z);
    let b0 = Vec3::new(min_x, base_y, max_z);
    let r0 = Vec3::new(min_x, top, mid_z);
    let a1 = Vec3::new(max_x, base_y, min_z);
    let b1 = Vec3::new(max_x, base_y, max_z);
    let r1 = Vec3::new(max_x, top, mid_z);

    let positions = vec![
        // Gable ends
        a0, r0, b0,
        a1, b1, r1,
        // Slopes
        a0, a1, r1, a0, r1, r0,
        b0, r0, r1, b0, r1, b1,
    ];

    Mesh::new(positions, None)
}

/// A small house in millimetres: 8 m x 6 m footprint, 3 m walls, 2 m roof.
///
/// Authored in file units the way an OBJ export from a CAD tool would be,
/// so unit detection reports millimetres.
pub fn demo_house() -> Node {
    let walls = box_mesh(Vec3::new(0.0, 0.0, 0.0), Vec3::new(8000.0, 3000.0, 6000.0));
    let roof = gable_roof(-200.0, 8200.0, -200.0, 6200.0, 3000.0, 2000.0);
    let chimney = box_mesh(Vec3::ZERO, Vec3::new(600.0, 1800.0, 600.0));

    Node::new("house")
        .with_child(Node::new("walls").with_mesh(walls))
        .with_child(Node::new("roof").with_mesh(roof))
        .with_child(
            Node::new("chimney")
                .with_mesh(chimney)
                .with_transform(mat4_translation(Vec3::new(5800.0, 3600.0, 1200.0))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::model::{Model, world_bounds};
    use crate::scene::scale::ModelFormat;

    #[test]
    fn test_box_has_twelve_faces() {
        let mesh = box_mesh(Vec3::ZERO, Vec3::splat(1.0));
        assert_eq!(mesh.faces().count(), 12);
    }

    #[test]
    fn test_roof_has_six_faces() {
        let roof = gable_roof(0.0, 4.0, 0.0, 2.0, 1.0, 1.0);
        assert_eq!(roof.faces().count(), 6);
    }

    #[test]
    fn test_demo_house_detected_as_millimetres() {
        let root = demo_house();
        let raw = world_bounds(&root).size().max_element();
        assert!((raw - 8400.0).abs() < 1e-2);

        let model = Model::load(root, ModelFormat::Obj);
        assert_eq!(model.scale().unit_conversion, 0.001);

        // The wall length reads back as 8 m
        let wall_world = 8000.0 * model.scale().scale_factor;
        assert!((model.scale().to_original(wall_world) - 8.0).abs() < 1e-3);
    }
}
