//! Viewer state and per-frame input handling
//!
//! One model, one orbit camera, one ruler. Keyboard shortcuts stand in for
//! the toolbar buttons of a browser UI.

use std::path::PathBuf;

use macroquad::prelude::*;
use ruler_view::geometry::{Vec2 as RVec2, Vec3 as RVec3};
use ruler_view::ruler::{PointerEvent, RulerController};
use ruler_view::scene::{Camera, Model, ModelFormat, ViewContext, Viewport, primitives};
use ruler_view::RulerSettings;

use crate::overlay;
use crate::render;

const ORBIT_SPEED: f32 = 0.008;
const PAN_SPEED: f32 = 0.002;
const AUTO_ROTATE_SPEED: f32 = 0.4;
const STATUS_SECONDS: f64 = 3.0;

const DARK_BG: Color = Color::new(0.04, 0.04, 0.04, 1.0);
const LIGHT_BG: Color = WHITE;
const MODEL_COLOR: Color = Color::new(0.78, 0.78, 0.82, 1.0);

/// Which camera gesture the current mouse drag drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraDrag {
    Orbit,
    Pan,
}

/// Effect of releasing `button`: whether the ruler sees the release, and
/// the camera gesture still running afterwards. Only the left button drives
/// ruler drags and orbiting; the right one drives panning.
fn release_button(button: MouseButton, drag: Option<CameraDrag>) -> (bool, Option<CameraDrag>) {
    let ends = match button {
        MouseButton::Left => Some(CameraDrag::Orbit),
        MouseButton::Right => Some(CameraDrag::Pan),
        _ => None,
    };
    let remaining = if drag == ends { None } else { drag };
    (button == MouseButton::Left, remaining)
}

pub struct ViewerApp {
    camera: Camera,
    model: Model,
    /// World-space faces, cached at load
    triangles: Vec<[RVec3; 3]>,
    ruler: RulerController,
    settings: RulerSettings,
    settings_path: Option<PathBuf>,
    camera_drag: Option<CameraDrag>,
    last_mouse: RVec2,
    status: Option<(String, f64)>,
}

impl ViewerApp {
    pub fn new(settings: RulerSettings, settings_path: Option<PathBuf>) -> Self {
        let model = Model::load(primitives::demo_house(), ModelFormat::Obj);
        let triangles = model.world_triangles();

        let mut camera = Camera::new();
        camera.set_orthographic(settings.orthographic);

        Self {
            camera,
            model,
            triangles,
            ruler: RulerController::new(settings.clone()),
            settings,
            settings_path,
            camera_drag: None,
            last_mouse: RVec2::ZERO,
            status: None,
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), get_time() + STATUS_SECONDS));
    }

    fn background(&self) -> Color {
        if self.settings.light_background { LIGHT_BG } else { DARK_BG }
    }

    /// Persist settings, folding in live toggles
    pub fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        let mut settings = self.ruler.current_settings();
        settings.orthographic = self.camera.is_orthographic();
        settings.light_background = self.settings.light_background;
        settings.auto_rotate = self.settings.auto_rotate;
        if let Err(e) = settings.save(path) {
            log::warn!("could not save settings: {}", e);
        }
    }

    pub fn frame(&mut self) {
        let viewport = Viewport::screen(screen_width(), screen_height());
        self.camera.aspect = viewport.aspect();

        self.handle_keys(&viewport);
        self.handle_mouse(&viewport);

        if self.settings.auto_rotate && self.ruler.camera_input_enabled() && self.camera_drag.is_none() {
            self.camera.orbit(AUTO_ROTATE_SPEED * get_frame_time(), 0.0);
        }

        let ctx = ViewContext::with_model(&self.camera, &viewport, &self.model);
        self.ruler.tick(&ctx);

        clear_background(self.background());
        let tris = render::prepare_triangles(&self.triangles, &ctx);
        render::draw_triangles(&tris, MODEL_COLOR);
        overlay::draw_ruler(self.ruler.visuals(), &viewport, self.settings.marker_radius);
        self.draw_hud();
    }

    fn handle_keys(&mut self, viewport: &Viewport) {
        let ctx = ViewContext::with_model(&self.camera, viewport, &self.model);

        let toggled = is_key_pressed(KeyCode::R).then(|| self.ruler.toggle_ruler_mode(&ctx));
        if self.ruler.is_active() {
            if is_key_pressed(KeyCode::A) {
                self.ruler.add_measurement(&ctx);
            }
            if is_key_pressed(KeyCode::Delete) || is_key_pressed(KeyCode::Backspace) {
                self.ruler.remove_selected(&ctx);
            }
            if is_key_pressed(KeyCode::U) {
                self.ruler.toggle_units(&ctx);
            }
            if is_key_pressed(KeyCode::Escape) {
                self.ruler.select_measurement(None, &ctx);
            }
        }

        if let Some(on) = toggled {
            self.set_status(if on { "Ruler on" } else { "Ruler off" });
        }

        if is_key_pressed(KeyCode::B) {
            self.settings.light_background = !self.settings.light_background;
        }
        if is_key_pressed(KeyCode::T) {
            self.settings.auto_rotate = !self.settings.auto_rotate;
        }

        let export = is_key_pressed(KeyCode::E);
        let ortho = is_key_pressed(KeyCode::O);
        let home = is_key_pressed(KeyCode::H);
        let zoom_in = is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd);
        let zoom_out = is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract);

        if export {
            self.export_image(viewport);
        }
        if ortho {
            let ortho = !self.camera.is_orthographic();
            self.camera.set_orthographic(ortho);
            self.set_status(if ortho { "Orthographic" } else { "Perspective" });
        }
        if home {
            self.camera.reset();
        }
        if zoom_in {
            self.camera.zoom(1.0);
        }
        if zoom_out {
            self.camera.zoom(-1.0);
        }
    }

    /// Mouse input. Touch arrives here too through macroquad's mouse
    /// emulation, so a single path serves both.
    fn handle_mouse(&mut self, viewport: &Viewport) {
        let (mx, my) = mouse_position();
        let mouse = RVec2::new(mx, my);
        let delta = mouse - self.last_mouse;
        self.last_mouse = mouse;

        let ctx = ViewContext::with_model(&self.camera, viewport, &self.model);

        if is_mouse_button_pressed(MouseButton::Left) {
            let response = self.ruler.handle_pointer(PointerEvent::Pressed(mouse), &ctx);
            if !response.consumed() && viewport.contains(mouse) {
                self.camera_drag = Some(CameraDrag::Orbit);
            }
        } else if is_mouse_button_pressed(MouseButton::Right) && viewport.contains(mouse) {
            self.camera_drag = Some(CameraDrag::Pan);
        }

        if delta != RVec2::ZERO {
            self.ruler.handle_pointer(PointerEvent::Moved(mouse), &ctx);
        }

        for button in [MouseButton::Left, MouseButton::Right] {
            if !is_mouse_button_released(button) {
                continue;
            }
            let (to_ruler, remaining) = release_button(button, self.camera_drag);
            if to_ruler {
                self.ruler.handle_pointer(PointerEvent::Released(mouse), &ctx);
            }
            self.camera_drag = remaining;
        }

        if !self.ruler.camera_input_enabled() {
            return;
        }

        match self.camera_drag {
            Some(CameraDrag::Orbit) => self.camera.orbit(-delta.x * ORBIT_SPEED, delta.y * ORBIT_SPEED),
            Some(CameraDrag::Pan) => {
                let speed = PAN_SPEED * self.camera.distance_to_target();
                self.camera.pan(-delta.x * speed, delta.y * speed);
            }
            None => {}
        }

        let wheel = mouse_wheel().1;
        if wheel != 0.0 && viewport.contains(mouse) {
            self.camera.zoom(wheel.signum());
        }
    }

    fn draw_hud(&mut self) {
        let text_color = if self.settings.light_background { DARKGRAY } else { LIGHTGRAY };
        let help = "R ruler  A add  Del remove  U units  O ortho  H home  T rotate  B background  E export";
        draw_text(help, 10.0, screen_height() - 12.0, 18.0, text_color);

        let units = format!("{}", self.ruler.units());
        draw_text(&units, 10.0, 22.0, 18.0, text_color);

        if self.status.as_ref().is_some_and(|(_, until)| get_time() >= *until) {
            self.status = None;
        }
        if let Some((msg, _)) = &self.status {
            draw_text(msg, 10.0, 44.0, 18.0, text_color);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn export_image(&mut self, _viewport: &Viewport) {
        log::warn!("image export is not available in the browser build");
        self.set_status("Export not available in browser");
    }

    /// Render the view and overlay into a square target, then save as JPEG
    #[cfg(not(target_arch = "wasm32"))]
    fn export_image(&mut self, viewport: &Viewport) {
        use ruler_view::ruler::{DEFAULT_EXPORT_NAME, ExportLayout, export_marks, frame_from_rgba, write_jpeg};

        let size = self.settings.export_size;
        let layout = ExportLayout::fit(viewport, size);
        let content = layout.content_viewport();

        let target = render_target(size, size);
        target.texture.set_filter(FilterMode::Linear);
        let mut target_camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, size as f32, size as f32));
        target_camera.render_target = Some(target.clone());
        set_camera(&target_camera);

        clear_background(self.background());
        let scene_ctx = ViewContext::with_model(&self.camera, &content, &self.model);
        let tris = render::prepare_triangles(&self.triangles, &scene_ctx);
        render::draw_triangles(&tris, MODEL_COLOR);

        let screen_ctx = ViewContext::with_model(&self.camera, viewport, &self.model);
        let marks = export_marks(&self.ruler, &screen_ctx, &layout);
        overlay::draw_export_marks(&marks, self.settings.marker_radius);

        set_default_camera();

        let data = target.texture.get_texture_data();
        let frame = match frame_from_rgba(u32::from(data.width), u32::from(data.height), data.bytes, true) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("export readback failed: {}", e);
                self.set_status(format!("Export failed: {}", e));
                return;
            }
        };

        let dialog = rfd::FileDialog::new()
            .add_filter("JPEG image", &["jpg", "jpeg"])
            .set_file_name(DEFAULT_EXPORT_NAME);
        let Some(path) = dialog.save_file() else {
            return;
        };

        match write_jpeg(&frame, &path, self.settings.export_quality) {
            Ok(()) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => {
                log::warn!("export failed: {}", e);
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_release_leaves_ruler_drag_alone() {
        assert_eq!(release_button(MouseButton::Right, None), (false, None));
        assert_eq!(release_button(MouseButton::Right, Some(CameraDrag::Pan)), (false, None));
        assert_eq!(
            release_button(MouseButton::Right, Some(CameraDrag::Orbit)),
            (false, Some(CameraDrag::Orbit))
        );
    }

    #[test]
    fn test_left_release_reaches_ruler_and_ends_orbit() {
        assert_eq!(release_button(MouseButton::Left, None), (true, None));
        assert_eq!(release_button(MouseButton::Left, Some(CameraDrag::Orbit)), (true, None));
        assert_eq!(
            release_button(MouseButton::Left, Some(CameraDrag::Pan)),
            (true, Some(CameraDrag::Pan))
        );
    }
}
