//! User settings persisted as RON
//!
//! Native builds keep the file under the platform config directory. A
//! missing file is not an error: defaults are used and the file is written
//! on the next save.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::ruler::{DEFAULT_EXPORT_QUALITY, DEFAULT_EXPORT_SIZE, DEFAULT_OFFSET_PX, DEFAULT_SNAP_RADIUS, MARKER_RADIUS, UnitSystem};

/// Directory name under the platform config dir
pub const APP_DIR: &str = "ruler-view";
pub const SETTINGS_FILE: &str = "settings.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerSettings {
    /// Start labels in metric (true) or imperial
    pub use_metric: bool,
    /// Snap distance in original file units
    pub snap_radius: f32,
    /// Half the distance between the endpoints of a new ruler, in pixels
    pub default_offset_px: f32,
    /// Anchor marker radius in pixels, also the grab radius
    pub marker_radius: f32,
    /// Side of the square export image
    pub export_size: u32,
    /// JPEG quality, 1-100
    pub export_quality: u8,
    /// Start in orthographic projection
    pub orthographic: bool,
    /// White scene and export background instead of near-black
    pub light_background: bool,
    /// Spin the camera around the target when idle
    pub auto_rotate: bool,
}

impl Default for RulerSettings {
    fn default() -> Self {
        Self {
            use_metric: true,
            snap_radius: DEFAULT_SNAP_RADIUS,
            default_offset_px: DEFAULT_OFFSET_PX,
            marker_radius: MARKER_RADIUS,
            export_size: DEFAULT_EXPORT_SIZE,
            export_quality: DEFAULT_EXPORT_QUALITY,
            orthographic: false,
            light_background: false,
            auto_rotate: false,
        }
    }
}

impl RulerSettings {
    pub fn units(&self) -> UnitSystem {
        UnitSystem::from_metric(self.use_metric)
    }

    /// Clamp values that would break layout or encoding
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.snap_radius.is_finite() && self.snap_radius >= 0.0) {
            self.snap_radius = defaults.snap_radius;
        }
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            self.marker_radius = defaults.marker_radius;
        }
        if !self.default_offset_px.is_finite() {
            self.default_offset_px = defaults.default_offset_px;
        }
        if self.export_size == 0 {
            self.export_size = defaults.export_size;
        }
        self.export_quality = self.export_quality.clamp(1, 100);
        self
    }

    /// Default settings file location, if the platform has a config dir
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_or_default(path: &Path) -> ViewerResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Self = ron::from_str(&contents).map_err(|source| ViewerError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> ViewerResult<()> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());
        let ron_string = ron::ser::to_string_pretty(self, config)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, ron_string)?;
        log::debug!("saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RulerSettings::load_or_default(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(settings, RulerSettings::default());
        assert_eq!(settings.units(), UnitSystem::Metric);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let settings = RulerSettings {
            use_metric: false,
            snap_radius: 2.0,
            export_quality: 75,
            orthographic: true,
            ..RulerSettings::default()
        };
        settings.save(&path).unwrap();

        let loaded = RulerSettings::load_or_default(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.units(), UnitSystem::Imperial);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "(use_metric: false, export_quality: 250)").unwrap();

        let loaded = RulerSettings::load_or_default(&path).unwrap();
        assert!(!loaded.use_metric);
        assert_eq!(loaded.snap_radius, DEFAULT_SNAP_RADIUS);
        assert_eq!(loaded.export_quality, 100);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{{{").unwrap();

        let err = RulerSettings::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ViewerError::SettingsParse { .. }));
    }
}
