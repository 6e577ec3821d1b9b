//! ruler-view: 3D model viewer with a measuring ruler
//!
//! Orbit around the model, switch the ruler on with R, drag its endpoints
//! onto corners and edges and read the real-world distance off the label.

mod app;
mod overlay;
mod render;

use macroquad::prelude::*;
use ruler_view::RulerSettings;

use app::ViewerApp;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn window_conf() -> Conf {
    Conf {
        window_title: format!("ruler-view v{}", VERSION),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        sample_count: 4,
        ..Default::default()
    }
}

/// Settings from the config dir, or defaults when there is none or it is unreadable
fn load_settings() -> (RulerSettings, Option<std::path::PathBuf>) {
    let path = RulerSettings::default_path();
    let settings = match &path {
        Some(p) => RulerSettings::load_or_default(p).unwrap_or_else(|e| {
            log::warn!("{}; falling back to defaults", e);
            RulerSettings::default()
        }),
        None => RulerSettings::default(),
    };
    (settings, path)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging first, before anything can panic
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (settings, settings_path) = load_settings();
    let mut app = ViewerApp::new(settings, settings_path);

    prevent_quit();
    loop {
        app.frame();

        if is_quit_requested() {
            app.save_settings();
            break;
        }

        next_frame().await;
    }
}
