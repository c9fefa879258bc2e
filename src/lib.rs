//! Manic Episode - a wrap-around tunnel arena
//!
//! Core modules:
//! - `sim`: Entities, the shatter animation, collision and the tunnel world
//! - `renderer`: Off-axis stereo projection and anaglyph compositing
//! - `audio`: Fire-and-forget sound triggers
//! - `settings`: Player preferences (stereo, audio, quality)

pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::EntityError;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Reference frame interval. Velocities are expressed in units per
    /// reference frame and animation speeds in steps per reference frame.
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Longest frame the simulation will integrate in one go
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Periodic length of the tunnel along the depth axis
    pub const TUNNEL_LENGTH: f32 = 65000.0;
    /// Tunnel cross-section bounds
    pub const TUNNEL_LEFT: f32 = -1600.0;
    pub const TUNNEL_RIGHT: f32 = 1600.0;
    pub const TUNNEL_TOP: f32 = 1200.0;
    pub const TUNNEL_BOTTOM: f32 = -1200.0;

    /// Eye-to-screen distance used by the perspective divide
    pub const EYE_TO_SCREEN: f32 = 50.0;
    /// Nearest visible depth
    pub const NEAR_PLANE: f32 = 30.0;
    /// Farthest visible depth
    pub const FAR_PLANE: f32 = 65000.0;
    /// Camera sits this far behind the controlled entity
    pub const CAMERA_BACKOFF: f32 = 600.0;

    /// Shatter grid resolution (lanes per axis)
    pub const SHATTER_LANES: usize = 5;
    /// Offset added to the first lane beyond the hit lane per step
    pub const SHATTER_STEP_SIZE: i32 = 3;
    /// Steps in a full explosion
    pub const EXPLOSION_STEPS: u32 = 40;
    /// Steps in a full formation
    pub const FORMATION_STEPS: u32 = 32;
    /// Explosion speed in steps per reference frame. Base rate 1.8 halved
    /// when the reference frame interval went from 1/30 s to 1/60 s.
    pub const EXPLOSION_SPEED: f32 = 1.8 * 0.5;
    /// Formation speed in steps per reference frame, halved for the same
    /// reason as `EXPLOSION_SPEED`.
    pub const FORMATION_SPEED: f32 = 1.2 * 0.5;

    /// Player tuning
    pub const PLAYER_SHIELDS: u8 = 3;
    pub const PLAYER_MAX_SPEED: f32 = 90.0;
    pub const PLAYER_MAX_REVERSE: f32 = 30.0;
    pub const PLAYER_ACCEL: f32 = 2.0;
    /// Fraction of the aim error turned into lateral velocity per frame
    pub const PLAYER_STEER_GAIN: f32 = 0.08;
    pub const PLAYER_MAX_STRAFE: f32 = 60.0;

    /// Weapon tuning
    pub const SHOT_SPEED: f32 = 160.0;
    /// Maximum travel before a shot fizzles
    pub const SHOT_RANGE: f32 = 24000.0;
    /// Maximum age of a shot in reference frames
    pub const SHOT_LIFETIME: f32 = 240.0;
    /// Reference frames between player shots
    pub const SHOT_COOLDOWN: f32 = 8.0;

    /// Cruiser tuning
    pub const CRUISER_FIRE_INTERVAL: f32 = 150.0;
    pub const CRUISER_FIRE_JITTER: f32 = 60.0;
    pub const CRUISER_FIRE_RANGE: f32 = 12000.0;
    pub const ENEMY_SHOT_SPEED: f32 = 70.0;
}

/// Wrap a depth coordinate into [0, length)
#[inline]
pub fn wrap_depth(z: f32, length: f32) -> f32 {
    let wrapped = z.rem_euclid(length);
    // rem_euclid can round up to exactly `length` for tiny negative inputs
    if wrapped >= length { 0.0 } else { wrapped }
}

/// Shortest signed distance from `from` to `to` on a periodic axis
///
/// The result lies in [-length/2, length/2]; swapping the arguments negates it.
#[inline]
pub fn periodic_delta(from: f32, to: f32, length: f32) -> f32 {
    let raw = to - from;
    let half = length * 0.5;
    if raw > half {
        raw - length
    } else if raw < -half {
        raw + length
    } else {
        raw
    }
}

/// Distance ahead of `from` to reach `to` moving forward, in [0, length)
#[inline]
pub fn forward_depth(from: f32, to: f32, length: f32) -> f32 {
    wrap_depth(to - from, length)
}
