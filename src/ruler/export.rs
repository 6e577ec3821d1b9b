//! Static image export with the ruler overlay
//!
//! The viewport is letterboxed into a square image: the longer side fills
//! it and the shorter one is centred. Ruler marks are recomputed at output
//! resolution instead of scaling the on-screen overlay.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbaImage;

use crate::error::{ViewerError, ViewerResult};
use crate::geometry::Vec2;
use crate::scene::{ViewContext, Viewport};
use super::controller::RulerController;
use super::sync::project_measurement;

/// Side of the square output image
pub const DEFAULT_EXPORT_SIZE: u32 = 2048;
pub const DEFAULT_EXPORT_QUALITY: u8 = 90;
pub const DEFAULT_EXPORT_NAME: &str = "model-export.jpg";
/// Labels are drawn this far above the line midpoint
pub const EXPORT_LABEL_RAISE: f32 = 20.0;

/// Where the viewport lands inside the square export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportLayout {
    pub size: u32,
    pub offset: Vec2,
    pub draw_size: Vec2,
    /// Output pixels per viewport pixel
    pub scale: f32,
}

impl ExportLayout {
    pub fn fit(viewport: &Viewport, size: u32) -> Self {
        let side = size as f32;
        let (draw_w, draw_h) = if viewport.is_empty() {
            (side, side)
        } else if viewport.w > viewport.h {
            (side, side * viewport.h / viewport.w)
        } else {
            (side * viewport.w / viewport.h, side)
        };

        let scale = if viewport.is_empty() { 1.0 } else { draw_w / viewport.w };
        Self {
            size,
            offset: Vec2::new((side - draw_w) * 0.5, (side - draw_h) * 0.5),
            draw_size: Vec2::new(draw_w, draw_h),
            scale,
        }
    }

    /// Viewport-local pixel to output pixel
    pub fn map(&self, local: Vec2) -> Vec2 {
        Vec2::new(
            self.offset.x + local.x * self.scale,
            self.offset.y + local.y * self.scale,
        )
    }

    /// The letterboxed area as a viewport inside the output image
    pub fn content_viewport(&self) -> Viewport {
        Viewport::new(self.offset.x, self.offset.y, self.draw_size.x, self.draw_size.y)
    }
}

/// One ruler as drawn on the export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMark {
    pub p1: Vec2,
    pub p2: Vec2,
    pub label: String,
    /// Centre of the label text
    pub label_anchor: Vec2,
}

/// Output-resolution marks for every measurement in front of the camera;
/// empty when ruler mode is off
pub fn export_marks(ruler: &RulerController, ctx: &ViewContext<'_>, layout: &ExportLayout) -> Vec<ExportMark> {
    if !ruler.is_active() {
        return Vec::new();
    }

    ruler
        .measurements()
        .map(|m| project_measurement(ctx, m, ruler.units(), false))
        .filter(|visual| !visual.behind_camera)
        .map(|visual| {
            let p1 = layout.map(visual.anchors[0]);
            let p2 = layout.map(visual.anchors[1]);
            let mid = p1.midpoint(p2);
            ExportMark {
                p1,
                p2,
                label: visual.label.text,
                label_anchor: Vec2::new(mid.x, mid.y - EXPORT_LABEL_RAISE),
            }
        })
        .collect()
}

/// Wrap raw RGBA bytes read back from the GPU.
///
/// Render target readback is bottom-up on most backends; pass
/// `flip_vertical` to turn it the right way round.
pub fn frame_from_rgba(width: u32, height: u32, bytes: Vec<u8>, flip_vertical: bool) -> ViewerResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(ViewerError::EmptyFrame { width, height });
    }
    let image = RgbaImage::from_raw(width, height, bytes).ok_or(ViewerError::EmptyFrame { width, height })?;
    Ok(if flip_vertical { image::imageops::flip_vertical(&image) } else { image })
}

/// Encode a frame as JPEG. Alpha is dropped.
pub fn write_jpeg(image: &RgbaImage, path: &Path, quality: u8) -> ViewerResult<()> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let file = File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    log::info!("exported {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::scene::Camera;
    use image::Rgba;

    #[test]
    fn test_wide_viewport_fills_width() {
        let layout = ExportLayout::fit(&Viewport::screen(1600.0, 800.0), 2048);
        assert_eq!(layout.draw_size, Vec2::new(2048.0, 1024.0));
        assert_eq!(layout.offset, Vec2::new(0.0, 512.0));
        assert!((layout.scale - 1.28).abs() < 1e-6);
        assert_eq!(layout.map(Vec2::new(800.0, 400.0)), Vec2::new(1024.0, 1024.0));
    }

    #[test]
    fn test_tall_viewport_fills_height() {
        let layout = ExportLayout::fit(&Viewport::screen(500.0, 1000.0), 1000);
        assert_eq!(layout.draw_size, Vec2::new(500.0, 1000.0));
        assert_eq!(layout.offset, Vec2::new(250.0, 0.0));
        assert_eq!(layout.map(Vec2::ZERO), Vec2::new(250.0, 0.0));
    }

    #[test]
    fn test_marks_only_in_ruler_mode() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        let viewport = Viewport::screen(800.0, 800.0);
        let ctx = ViewContext::empty(&camera, &viewport);
        let layout = ExportLayout::fit(&viewport, 1600);

        let mut ruler = RulerController::default();
        assert!(export_marks(&ruler, &ctx, &layout).is_empty());

        ruler.toggle_ruler_mode(&ctx);
        let marks = export_marks(&ruler, &ctx, &layout);
        assert_eq!(marks.len(), 1);

        // Screen anchors at 350 and 450, doubled
        let mark = &marks[0];
        assert!((mark.p1.x - 700.0).abs() < 0.05);
        assert!((mark.p2.x - 900.0).abs() < 0.05);
        assert!((mark.label_anchor.y - (800.0 - EXPORT_LABEL_RAISE)).abs() < 0.05);
        assert_eq!(mark.label, ruler.visuals()[0].label.text);

        ruler.toggle_ruler_mode(&ctx);
        assert!(export_marks(&ruler, &ctx, &layout).is_empty());
    }

    #[test]
    fn test_marks_skip_measurements_behind_camera() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        let viewport = Viewport::screen(800.0, 800.0);
        let layout = ExportLayout::fit(&viewport, 1600);

        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ViewContext::empty(&camera, &viewport));

        camera.position = Vec3::new(0.0, 0.0, -5.0);
        camera.target = Vec3::new(0.0, 0.0, -10.0);
        let ctx = ViewContext::empty(&camera, &viewport);
        assert!(export_marks(&ruler, &ctx, &layout).is_empty());
        assert_eq!(ruler.store().len(), 1);
    }

    #[test]
    fn test_frame_flip() {
        // 1x2 image: top red, bottom blue
        let bytes = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let upright = frame_from_rgba(1, 2, bytes.clone(), false).unwrap();
        let flipped = frame_from_rgba(1, 2, bytes, true).unwrap();
        assert_eq!(upright.get_pixel(0, 0), flipped.get_pixel(0, 1));

        assert!(matches!(
            frame_from_rgba(0, 2, Vec::new(), false),
            Err(ViewerError::EmptyFrame { .. })
        ));
        assert!(frame_from_rgba(2, 2, vec![0; 4], false).is_err());
    }

    #[test]
    fn test_write_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);
        let image = RgbaImage::from_pixel(64, 32, Rgba([10, 10, 10, 255]));

        write_jpeg(&image, &path, DEFAULT_EXPORT_QUALITY).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }
}
