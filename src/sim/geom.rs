//! Axis-aligned geometry for obstacles and the player body
//!
//! Screen space, y grows downward:
//! - left/top: minimum corner
//! - width/height: extents (never negative)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle centred on `center` with the given half extents
    pub fn from_center(center: Vec2, half_w: f32, half_h: f32) -> Self {
        Self::new(center.x - half_w, center.y - half_h, half_w * 2.0, half_h * 2.0)
    }

    /// Rectangle standing on a floor line (bottom edge at `floor_y`)
    pub fn on_floor(left: f32, width: f32, height: f32, floor_y: f32) -> Self {
        Self::new(left, floor_y - height, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Zero-area rectangles never interact
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= f32::EPSILON || self.height <= f32::EPSILON
    }

    /// Strict horizontal overlap (touching edges do not count)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left < other.right() && other.left < self.right()
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.overlaps_x(other) && self.top < other.bottom() && other.top < self.bottom()
    }

    /// Closest point inside the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right()),
            p.y.clamp(self.top, self.bottom()),
        )
    }
}

/// Circle vs rectangle overlap (used by round spawned entities)
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if radius <= 0.0 || rect.is_degenerate() {
        return false;
    }
    rect.closest_point(center).distance_squared(center) < radius * radius
}
