//! Model scale state: normalization factor and detected file units
//!
//! Files arrive in whatever units their author used. The viewer rescales
//! every model so its largest extent is `NORMALIZED_SIZE`, and guesses
//! how many metres one file unit represents from the format and the raw
//! bounding-box size. Both numbers are needed to turn a distance measured
//! in the scene back into a real-world length.

/// Largest extent of a model after it has been normalized into the scene
pub const NORMALIZED_SIZE: f32 = 5.0;

/// Source file format, as far as unit guessing is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelFormat {
    Ifc,
    Stl,
    Glb,
    Gltf,
    Obj,
    Dae,
    Fbx,
    ThreeDs,
    Wrl,
    Ply,
    #[default]
    Unknown,
}

impl ModelFormat {
    /// Identify a format from a file extension (case-insensitive, no dot)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ifc" => Self::Ifc,
            "stl" => Self::Stl,
            "glb" => Self::Glb,
            "gltf" => Self::Gltf,
            "obj" => Self::Obj,
            "dae" => Self::Dae,
            "fbx" => Self::Fbx,
            "3ds" => Self::ThreeDs,
            "wrl" | "vrml" => Self::Wrl,
            "ply" => Self::Ply,
            _ => Self::Unknown,
        }
    }

    /// Identify a format from a file name or path
    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    /// Metres per file unit, guessed from the raw largest extent
    pub fn unit_conversion(self, max_dim: f32) -> f32 {
        match self {
            // Building models: millimetres, inches or metres
            Self::Ifc if max_dim > 1000.0 => 0.001,
            Self::Ifc if max_dim > 50.0 => 0.0254,
            Self::Ifc => 1.0,
            // Printable parts are usually modelled in millimetres
            Self::Stl if max_dim > 100.0 => 0.001,
            Self::Stl => 1.0,
            // glTF mandates metres
            Self::Glb | Self::Gltf => 1.0,
            _ if max_dim > 1000.0 => 0.001,
            _ => 1.0,
        }
    }
}

/// Scale state of the currently loaded model.
///
/// `original = (world / scale_factor) * unit_conversion`, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelScale {
    /// Factor applied when normalizing the model into the scene
    pub scale_factor: f32,
    /// Metres per unit of the source file
    pub unit_conversion: f32,
}

impl Default for ModelScale {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            unit_conversion: 1.0,
        }
    }
}

impl ModelScale {
    /// Scale state for a model whose raw largest extent is `max_dim`
    pub fn detect(format: ModelFormat, max_dim: f32) -> Self {
        let scale_factor = if max_dim > 0.0 { NORMALIZED_SIZE / max_dim } else { 1.0 };
        Self {
            scale_factor,
            unit_conversion: format.unit_conversion(max_dim),
        }
    }

    /// Convert a scene-space distance to metres in the original model
    pub fn to_original(&self, world_distance: f32) -> f32 {
        (world_distance / self.scale_factor) * self.unit_conversion
    }
}
