//! Scene collaborators the ruler works against
//!
//! - `camera` - orbit camera, projection and picking rays
//! - `viewport` - screen rectangle and NDC conversion
//! - `model` - node hierarchy of meshes, ray intersection
//! - `scale` - normalization factor and detected file units
//! - `primitives` - procedural demo geometry

pub mod camera;
pub mod model;
pub mod primitives;
pub mod scale;
pub mod viewport;

pub use camera::{Camera, Projection};
pub use model::{Bounds, Mesh, Model, Node, RayTarget, SurfaceHit, world_bounds};
pub use scale::{ModelFormat, ModelScale, NORMALIZED_SIZE};
pub use viewport::Viewport;

/// Everything a ruler operation needs to know about the current view.
///
/// Borrowed fresh from the host each frame; nothing here is retained.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub camera: &'a Camera,
    pub viewport: &'a Viewport,
    /// Currently loaded model, if any
    pub model: Option<&'a dyn RayTarget>,
    pub scale: ModelScale,
}

impl<'a> ViewContext<'a> {
    /// View of an empty scene
    pub fn empty(camera: &'a Camera, viewport: &'a Viewport) -> Self {
        Self {
            camera,
            viewport,
            model: None,
            scale: ModelScale::default(),
        }
    }

    /// View of a loaded model
    pub fn with_model(camera: &'a Camera, viewport: &'a Viewport, model: &'a Model) -> Self {
        Self {
            camera,
            viewport,
            model: Some(model),
            scale: model.scale(),
        }
    }
}
