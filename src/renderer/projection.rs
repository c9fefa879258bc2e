//! Off-axis perspective projection for one eye of a stereo pair

use glam::{Vec2, Vec3};

use crate::consts::{EYE_TO_SCREEN, FAR_PLANE, NEAR_PLANE};

/// Fixed projection parameters shared by both eyes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Eye-to-screen distance `k` of the perspective divide
    pub eye_to_screen: f32,
    /// Depths at or below this are not visible
    pub near: f32,
    /// Depths beyond this are not visible
    pub far: f32,
    /// Zero-parallax depth. `None` disables the convergence correction.
    pub screen_plane: Option<f32>,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            eye_to_screen: EYE_TO_SCREEN,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            screen_plane: None,
        }
    }
}

/// Project `world` as seen from `eye` shifted sideways by `eye_offset_x`.
///
/// Returns `None` when the point lies outside the visible depth range.
/// With a screen plane configured, points at that depth land at the same
/// screen position for any eye offset.
pub fn project(world: Vec3, eye: Vec3, eye_offset_x: f32, params: &ProjectionParams) -> Option<Vec2> {
    let depth = world.z - eye.z;
    if depth <= params.near || depth > params.far {
        return None;
    }

    let k = params.eye_to_screen;
    let mut x = (world.x - eye.x - eye_offset_x) * k / depth;
    let y = (world.y - eye.y) * k / depth;

    match params.screen_plane {
        Some(plane) if eye_offset_x != 0.0 && plane > 0.0 => x += eye_offset_x * k / plane,
        _ => {}
    }
    Some(Vec2::new(x, y))
}
