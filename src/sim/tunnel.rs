//! Tunnel geometry: a bounded cross-section and a periodic depth axis

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{forward_depth, periodic_delta, wrap_depth};

/// Cross-section bounds plus the periodic length of the depth axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub length: f32,
}

impl Default for Tunnel {
    fn default() -> Self {
        Self {
            left: TUNNEL_LEFT,
            right: TUNNEL_RIGHT,
            top: TUNNEL_TOP,
            bottom: TUNNEL_BOTTOM,
            length: TUNNEL_LENGTH,
        }
    }
}

impl Tunnel {
    /// Wrap a depth into [0, length)
    #[inline]
    pub fn wrap(&self, z: f32) -> f32 {
        wrap_depth(z, self.length)
    }

    /// Shortest signed depth distance from `from` to `to`
    #[inline]
    pub fn delta(&self, from: f32, to: f32) -> f32 {
        periodic_delta(from, to, self.length)
    }

    /// Depth of `to` ahead of `from`, in [0, length)
    #[inline]
    pub fn ahead(&self, from: f32, to: f32) -> f32 {
        forward_depth(from, to, self.length)
    }

    /// Map a normalized aim position in [-1, 1]² onto the cross-section
    pub fn aim_point(&self, aim: Vec2) -> Vec2 {
        let aim = aim.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        let center = Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5);
        let half = Vec2::new((self.right - self.left) * 0.5, (self.top - self.bottom) * 0.5);
        center + aim * half
    }
}
