//! Ruler / measurement tool
//!
//! - `probe` - pointer to surface point, with vertex and edge snapping
//! - `store` - ordered measurements and the selection
//! - `sync` - per-frame screen layout of markers, lines and labels
//! - `format` - metric and imperial distance labels
//! - `controller` - ruler mode, pointer handling, drag lock
//! - `export` - letterboxed image export with marks at output resolution

pub mod controller;
pub mod export;
pub mod format;
pub mod probe;
pub mod store;
pub mod sync;

pub use controller::{ActiveDrag, PointerEvent, PointerResponse, RulerController};
pub use export::{
    DEFAULT_EXPORT_NAME, DEFAULT_EXPORT_QUALITY, DEFAULT_EXPORT_SIZE, ExportLayout, ExportMark,
    export_marks, frame_from_rgba, write_jpeg,
};
pub use format::{UnitSystem, format_distance};
pub use probe::{DEFAULT_SNAP_RADIUS, PointResolver, ProbeHit, SnapKind, SurfaceProbe, snap_to_triangle};
pub use store::{DEFAULT_OFFSET_PX, Endpoint, Measurement, MeasurementStore};
pub use sync::{MARKER_RADIUS, MeasurementRenderer, MeasurementVisual, LabelVisual, project_measurement};
