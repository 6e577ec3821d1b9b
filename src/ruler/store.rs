//! Measurement records and selection
//!
//! Measurements live in insertion order and are addressed by index.
//! Removing one renumbers everything after it; the selection is shifted
//! along so it keeps pointing at the same measurement.

use crate::geometry::{Vec2, Vec3};
use super::probe::PointResolver;

/// Horizontal distance of a new ruler's endpoints from the viewport centre
pub const DEFAULT_OFFSET_PX: f32 = 50.0;

/// One of the two ends of a ruler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    First,
    Second,
}

impl TryFrom<u8> for Endpoint {
    type Error = u8;

    /// Endpoints are numbered 1 and 2 in the UI
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(other),
        }
    }
}

/// One ruler, anchored at two world-space points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub point1: Vec3,
    pub point2: Vec3,
}

impl Measurement {
    pub fn new(point1: Vec3, point2: Vec3) -> Self {
        Self { point1, point2 }
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint, point: Vec3) {
        match endpoint {
            Endpoint::First => self.point1 = point,
            Endpoint::Second => self.point2 = point,
        }
    }

    /// Length in scene units
    pub fn world_length(&self) -> f32 {
        self.point1.distance(self.point2)
    }
}

/// Ordered measurements plus the current selection
#[derive(Debug, Clone, Default)]
pub struct MeasurementStore {
    items: Vec<Measurement>,
    selected: Option<usize>,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Measurement> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.items.iter()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Append a measurement and select it; returns its index
    pub fn push(&mut self, measurement: Measurement) -> usize {
        self.items.push(measurement);
        let index = self.items.len() - 1;
        self.selected = Some(index);
        index
    }

    /// Add a ruler straddling `center` horizontally, `offset` pixels to
    /// either side, with both ends resolved onto the model
    pub fn add(&mut self, resolver: &dyn PointResolver, center: Vec2, offset: f32) -> usize {
        let point1 = resolver.resolve(Vec2::new(center.x - offset, center.y));
        let point2 = resolver.resolve(Vec2::new(center.x + offset, center.y));
        let index = self.push(Measurement::new(point1, point2));
        log::debug!("added measurement {}", index);
        index
    }

    /// Remove a measurement; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Option<Measurement> {
        if index >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(index);
        let len = self.items.len();

        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) if sel >= len => Some(len - 1),
            other => other,
        };

        log::debug!("removed measurement {} ({} left)", index, len);
        Some(removed)
    }

    /// Set the selection without validation; callers pass a live index or None
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Re-anchor one endpoint at a screen position
    pub fn update_point(
        &mut self,
        index: usize,
        endpoint: Endpoint,
        screen: Vec2,
        resolver: &dyn PointResolver,
    ) {
        let Some(measurement) = self.items.get_mut(index) else {
            return;
        };
        measurement.set_endpoint(endpoint, resolver.resolve(screen));
    }
}
