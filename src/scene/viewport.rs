//! Viewport rectangle and screen/NDC conversion

use crate::geometry::Vec2;

/// The on-screen rectangle the model is drawn into, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Viewport covering a whole window
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Width over height; 1 for an empty viewport
    pub fn aspect(&self) -> f32 {
        if self.h <= 0.0 {
            return 1.0;
        }
        self.w / self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Check if point is inside
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Window pixel to normalized device coordinates (+Y up)
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        if self.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new(
            ((screen.x - self.x) / self.w) * 2.0 - 1.0,
            -((screen.y - self.y) / self.h) * 2.0 + 1.0,
        )
    }

    /// Normalized device coordinates to window pixel
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.x + (ndc.x * 0.5 + 0.5) * self.w,
            self.y + (-ndc.y * 0.5 + 0.5) * self.h,
        )
    }

    /// Window pixel to a position relative to the viewport's top-left corner
    pub fn to_local(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x - self.x, screen.y - self.y)
    }
}
