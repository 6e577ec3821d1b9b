//! Ruler interaction: mode, selection, dragging and the unit toggle
//!
//! The controller owns the measurement store and its visuals. The host
//! feeds it pointer events in window pixels and asks
//! [`RulerController::camera_input_enabled`] before letting the orbit
//! camera consume the same input: while an endpoint is being dragged the
//! camera is locked.

use crate::config::RulerSettings;
use crate::geometry::Vec2;
use crate::scene::ViewContext;
use super::format::UnitSystem;
use super::probe::SurfaceProbe;
use super::store::{Endpoint, Measurement, MeasurementStore};
use super::sync::{MeasurementRenderer, MeasurementVisual};

/// Pointer input, mouse and touch alike, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Vec2),
    Moved(Vec2),
    Released(Vec2),
}

/// What the controller did with a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    /// Not for the ruler; the camera may use it
    Ignored,
    DragStarted { index: usize, endpoint: Endpoint },
    Dragged,
    DragEnded,
    UnitsToggled,
}

impl PointerResponse {
    pub fn consumed(self) -> bool {
        self != Self::Ignored
    }
}

/// Endpoint currently following the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDrag {
    pub index: usize,
    pub endpoint: Endpoint,
}

#[derive(Debug)]
pub struct RulerController {
    active: bool,
    store: MeasurementStore,
    units: UnitSystem,
    drag: Option<ActiveDrag>,
    renderer: MeasurementRenderer,
    settings: RulerSettings,
}

impl Default for RulerController {
    fn default() -> Self {
        Self::new(RulerSettings::default())
    }
}

impl RulerController {
    pub fn new(settings: RulerSettings) -> Self {
        Self {
            active: false,
            store: MeasurementStore::new(),
            units: settings.units(),
            drag: None,
            renderer: MeasurementRenderer::new(),
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.store.iter()
    }

    pub fn selected(&self) -> Option<usize> {
        self.store.selected()
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn drag(&self) -> Option<ActiveDrag> {
        self.drag
    }

    /// Settings with the live unit choice folded back in, ready to save
    pub fn current_settings(&self) -> RulerSettings {
        RulerSettings {
            use_metric: self.units.is_metric(),
            ..self.settings.clone()
        }
    }

    /// Visuals from the last sync; empty while ruler mode is off
    pub fn visuals(&self) -> &[MeasurementVisual] {
        if self.active { self.renderer.visuals() } else { &[] }
    }

    /// False while an endpoint is being dragged
    pub fn camera_input_enabled(&self) -> bool {
        self.drag.is_none()
    }

    fn probe<'a>(&self, ctx: ViewContext<'a>) -> SurfaceProbe<'a> {
        SurfaceProbe::new(ctx).with_snap_radius(self.settings.snap_radius)
    }

    fn resync(&mut self, ctx: &ViewContext<'_>) {
        if self.active {
            self.renderer.sync(&self.store, ctx, self.units);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Enter or leave ruler mode.
    ///
    /// Entering with no measurements creates one in the middle of the view.
    /// Leaving hides the overlay and clears the selection; measurements are
    /// kept for the next time the mode is entered.
    pub fn toggle_ruler_mode(&mut self, ctx: &ViewContext<'_>) -> bool {
        self.active = !self.active;
        log::info!("ruler mode {}", if self.active { "on" } else { "off" });

        if self.active {
            if self.store.is_empty() {
                self.add_measurement(ctx);
            } else {
                self.resync(ctx);
            }
        } else {
            self.drag = None;
            self.renderer.hide();
            self.store.select(None);
        }
        self.active
    }

    /// Add a ruler across the viewport centre and select it
    pub fn add_measurement(&mut self, ctx: &ViewContext<'_>) -> usize {
        let probe = self.probe(*ctx);
        let center = ctx.viewport.center();
        let index = self.store.add(&probe, center, self.settings.default_offset_px);
        self.resync(ctx);
        index
    }

    /// Remove a measurement; out-of-range indices are ignored
    pub fn remove_measurement(&mut self, index: usize, ctx: &ViewContext<'_>) -> Option<Measurement> {
        let removed = self.store.remove(index)?;
        if let Some(drag) = self.drag {
            if drag.index == index {
                self.drag = None;
            } else if drag.index > index {
                self.drag = Some(ActiveDrag { index: drag.index - 1, ..drag });
            }
        }
        self.resync(ctx);
        Some(removed)
    }

    pub fn remove_selected(&mut self, ctx: &ViewContext<'_>) -> Option<Measurement> {
        let index = self.store.selected()?;
        self.remove_measurement(index, ctx)
    }

    pub fn select_measurement(&mut self, index: Option<usize>, ctx: &ViewContext<'_>) {
        self.store.select(index);
        self.resync(ctx);
    }

    /// Switch every label between metric and imperial
    pub fn toggle_units(&mut self, ctx: &ViewContext<'_>) -> UnitSystem {
        self.units = self.units.toggled();
        log::debug!("units -> {}", self.units);
        self.resync(ctx);
        self.units
    }

    /// Per-frame re-projection so the overlay follows the camera
    pub fn tick(&mut self, ctx: &ViewContext<'_>) {
        if self.active && !self.store.is_empty() {
            self.renderer.sync(&self.store, ctx, self.units);
        }
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    /// Route one pointer event.
    ///
    /// Press on an anchor grabs it; press on a label toggles units. While a
    /// drag is live every move re-resolves the grabbed endpoint. Release
    /// always ends the drag, wherever it happens.
    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &ViewContext<'_>) -> PointerResponse {
        match event {
            PointerEvent::Released(_) => {
                if self.drag.take().is_some() {
                    log::trace!("drag ended");
                    PointerResponse::DragEnded
                } else {
                    PointerResponse::Ignored
                }
            }
            _ if !self.active => PointerResponse::Ignored,
            PointerEvent::Pressed(screen) => self.press(screen, ctx),
            PointerEvent::Moved(screen) => {
                let Some(drag) = self.drag else {
                    return PointerResponse::Ignored;
                };
                let probe = self.probe(*ctx);
                self.store.update_point(drag.index, drag.endpoint, screen, &probe);
                self.resync(ctx);
                PointerResponse::Dragged
            }
        }
    }

    fn press(&mut self, screen: Vec2, ctx: &ViewContext<'_>) -> PointerResponse {
        let local = ctx.viewport.to_local(screen);
        let radius = self.settings.marker_radius;

        // Topmost first: later measurements are drawn over earlier ones.
        // Visuals behind the camera are not drawn, so they take no input.
        let anchor_hit = self
            .renderer
            .visuals()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, v)| !v.behind_camera)
            .find_map(|(i, v)| v.anchor_at(local, radius).map(|a| (i, a)));

        if let Some((index, anchor)) = anchor_hit {
            let endpoint = if anchor == 0 { Endpoint::First } else { Endpoint::Second };
            self.drag = Some(ActiveDrag { index, endpoint });
            self.store.select(Some(index));
            self.resync(ctx);
            log::trace!("drag started on measurement {} {:?}", index, endpoint);
            return PointerResponse::DragStarted { index, endpoint };
        }

        if self
            .renderer
            .visuals()
            .iter()
            .any(|v| !v.behind_camera && v.label_contains(local))
        {
            self.toggle_units(ctx);
            return PointerResponse::UnitsToggled;
        }

        PointerResponse::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::scene::{Camera, Viewport};

    fn view() -> (Camera, Viewport) {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.aspect = 800.0 / 600.0;
        (camera, Viewport::screen(800.0, 600.0))
    }

    #[test]
    fn test_toggle_on_adds_first_measurement() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();

        assert!(ruler.toggle_ruler_mode(&ctx));
        assert_eq!(ruler.store().len(), 1);
        assert_eq!(ruler.selected(), Some(0));
        assert_eq!(ruler.visuals().len(), 1);

        // Anchors land 50px either side of the centre
        let v = &ruler.visuals()[0];
        assert!((v.anchors[0].x - 350.0).abs() < 0.01);
        assert!((v.anchors[1].x - 450.0).abs() < 0.01);
        assert!((v.anchors[0].y - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_toggle_off_keeps_measurements() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();

        ruler.toggle_ruler_mode(&ctx);
        ruler.add_measurement(&ctx);
        assert!(!ruler.toggle_ruler_mode(&ctx));
        assert_eq!(ruler.store().len(), 2);
        assert_eq!(ruler.selected(), None);
        assert!(ruler.visuals().is_empty());

        // Back on: no extra measurement
        ruler.toggle_ruler_mode(&ctx);
        assert_eq!(ruler.store().len(), 2);
        assert_eq!(ruler.visuals().len(), 2);
    }

    #[test]
    fn test_drag_locks_camera_until_release() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ctx);
        ruler.add_measurement(&ctx);
        ruler.select_measurement(Some(1), &ctx);

        // Both rulers share anchors; the topmost (index 1) is grabbed
        let grab = ruler.visuals()[0].anchors[1];
        let response = ruler.handle_pointer(PointerEvent::Pressed(grab), &ctx);
        assert_eq!(response, PointerResponse::DragStarted { index: 1, endpoint: Endpoint::Second });
        assert_eq!(ruler.drag(), Some(ActiveDrag { index: 1, endpoint: Endpoint::Second }));
        assert!(!ruler.camera_input_enabled());

        let before = *ruler.store().get(1).unwrap();
        let moved = ruler.handle_pointer(PointerEvent::Moved(Vec2::new(600.0, 200.0)), &ctx);
        assert_eq!(moved, PointerResponse::Dragged);
        let after = *ruler.store().get(1).unwrap();
        assert_eq!(after.point1, before.point1);
        assert_ne!(after.point2, before.point2);
        assert!((ruler.visuals()[1].anchors[1].x - 600.0).abs() < 0.01);

        // Release off the ruler still ends the drag
        let released = ruler.handle_pointer(PointerEvent::Released(Vec2::new(5.0, 5.0)), &ctx);
        assert_eq!(released, PointerResponse::DragEnded);
        assert!(ruler.camera_input_enabled());
        assert_eq!(
            ruler.handle_pointer(PointerEvent::Moved(Vec2::new(100.0, 100.0)), &ctx),
            PointerResponse::Ignored
        );
    }

    #[test]
    fn test_press_selects_grabbed_measurement() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ctx);

        // Move the first ruler away so the second doesn't cover it
        let first = ruler.visuals()[0].anchors[0];
        ruler.handle_pointer(PointerEvent::Pressed(first), &ctx);
        ruler.handle_pointer(PointerEvent::Moved(Vec2::new(100.0, 100.0)), &ctx);
        ruler.handle_pointer(PointerEvent::Released(Vec2::new(100.0, 100.0)), &ctx);

        ruler.add_measurement(&ctx);
        assert_eq!(ruler.selected(), Some(1));

        let response = ruler.handle_pointer(PointerEvent::Pressed(Vec2::new(100.0, 100.0)), &ctx);
        assert_eq!(response, PointerResponse::DragStarted { index: 0, endpoint: Endpoint::First });
        assert_eq!(ruler.selected(), Some(0));
    }

    #[test]
    fn test_label_click_toggles_units() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ctx);

        let points = *ruler.store().get(0).unwrap();
        let label = ruler.visuals()[0].label_center();
        let response = ruler.handle_pointer(PointerEvent::Pressed(label), &ctx);

        assert_eq!(response, PointerResponse::UnitsToggled);
        assert_eq!(ruler.units(), UnitSystem::Imperial);
        assert!(ruler.camera_input_enabled());
        assert_eq!(*ruler.store().get(0).unwrap(), points);
        assert!(ruler.visuals()[0].label.text.ends_with('"') || ruler.visuals()[0].label.text.ends_with('\''));
        assert!(!ruler.current_settings().use_metric);
    }

    #[test]
    fn test_inactive_ruler_ignores_presses() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();

        let response = ruler.handle_pointer(PointerEvent::Pressed(viewport.center()), &ctx);
        assert_eq!(response, PointerResponse::Ignored);
        assert!(ruler.camera_input_enabled());
    }

    #[test]
    fn test_remove_selected() {
        let (camera, viewport) = view();
        let ctx = ViewContext::empty(&camera, &viewport);
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ctx);
        ruler.add_measurement(&ctx);
        ruler.add_measurement(&ctx);

        ruler.select_measurement(Some(1), &ctx);
        assert!(ruler.remove_selected(&ctx).is_some());
        assert_eq!(ruler.store().len(), 2);
        assert_eq!(ruler.selected(), Some(1));
        assert_eq!(ruler.visuals().len(), 2);

        ruler.select_measurement(None, &ctx);
        assert!(ruler.remove_selected(&ctx).is_none());
        assert!(ruler.remove_measurement(9, &ctx).is_none());
    }

    #[test]
    fn test_tick_follows_camera() {
        let (mut camera, viewport) = view();
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ViewContext::empty(&camera, &viewport));
        let before = ruler.visuals()[0].line_length;

        camera.position = Vec3::new(0.0, 0.0, 20.0);
        ruler.tick(&ViewContext::empty(&camera, &viewport));
        let after = ruler.visuals()[0].line_length;
        assert!(after < before);
    }

    #[test]
    fn test_measurement_behind_camera_takes_no_input() {
        let (mut camera, viewport) = view();
        let mut ruler = RulerController::default();
        ruler.toggle_ruler_mode(&ViewContext::empty(&camera, &viewport));

        // Step past the ruler and look away from it
        camera.position = Vec3::new(0.0, 0.0, -5.0);
        camera.target = Vec3::new(0.0, 0.0, -10.0);
        let ctx = ViewContext::empty(&camera, &viewport);
        ruler.tick(&ctx);

        let v = ruler.visuals()[0].clone();
        assert!(v.behind_camera);

        let response = ruler.handle_pointer(PointerEvent::Pressed(v.anchors[0]), &ctx);
        assert_eq!(response, PointerResponse::Ignored);
        assert!(ruler.drag().is_none());
        assert!(ruler.camera_input_enabled());

        let units = ruler.units();
        let response = ruler.handle_pointer(PointerEvent::Pressed(v.label_center()), &ctx);
        assert_eq!(response, PointerResponse::Ignored);
        assert_eq!(ruler.units(), units);
    }
}
