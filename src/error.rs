//! Error type for the fallible edges of the viewer: settings files and
//! image export. Geometry and ruler operations never fail.

use std::path::PathBuf;
use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse settings {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("could not encode settings: {0}")]
    SettingsEncode(#[from] ron::Error),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("export frame is {width}x{height}, expected a non-empty image")]
    EmptyFrame { width: u32, height: u32 },
}
