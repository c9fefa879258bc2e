//! Axis-aligned rectangles in the cross-section plane
//!
//! Entities are drawn and narrow-phase tested as lists of rectangles in
//! entity-local coordinates (origin at the entity position, x/y axes).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, `min` inclusive to `max` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Rectangle spanning `[-half, half]` on both axes
    pub fn centered(half: Vec2) -> Self {
        Self { min: -half, max: half }
    }

    /// True when the rectangle has positive width and height
    #[inline]
    pub fn has_area(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y
    }

    #[inline]
    pub fn translate(&self, by: Vec2) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    /// Overlap test. Rectangles are separated only when one lies strictly
    /// beyond another edge, so touching edges count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    /// Intersection with positive area, if any
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        r.has_area().then_some(r)
    }

    /// True when the rectangle fits inside `[-half, half]`
    pub fn within(&self, half: Vec2) -> bool {
        self.min.x >= -half.x && self.min.y >= -half.y && self.max.x <= half.x && self.max.y <= half.y
    }
}
