//! Interactive 3D model viewer with a measuring ruler
//!
//! The library holds everything except windowing: geometry, the scene
//! collaborators (camera, viewport, model), and the ruler itself. The
//! `ruler-view` binary wires it to a macroquad window.

pub mod config;
pub mod error;
pub mod geometry;
pub mod ruler;
pub mod scene;

pub use config::RulerSettings;
pub use error::{ViewerError, ViewerResult};
