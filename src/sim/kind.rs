//! Entity kinds and their static properties

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::shape::Rect;

/// What an entity is. Behavior that depends on the kind of both partners in
/// a collision goes through `collision::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controlled entity
    Player,
    /// Projectile fired by the player
    PlayerShot,
    /// Projectile fired by a cruiser
    EnemyShot,
    /// Small drifting enemy
    Drone,
    /// Large enemy that shoots back
    Cruiser,
    /// Indestructible obstacle
    Barrier,
}

const PLAYER_SHAPE: &[Rect] = &[
    // Fuselage
    Rect::new(-40.0, -30.0, 40.0, 30.0),
    // Wings
    Rect::new(-120.0, -10.0, -40.0, 10.0),
    Rect::new(40.0, -10.0, 120.0, 10.0),
    // Wingtip fins
    Rect::new(-120.0, -60.0, -100.0, -10.0),
    Rect::new(100.0, -60.0, 120.0, -10.0),
    // Cockpit
    Rect::new(-15.0, 30.0, 15.0, 60.0),
];

const DRONE_SHAPE: &[Rect] = &[
    Rect::new(-50.0, -50.0, 50.0, 50.0),
    Rect::new(-150.0, -20.0, -50.0, 20.0),
    Rect::new(50.0, -20.0, 150.0, 20.0),
    Rect::new(-20.0, 50.0, 20.0, 150.0),
    Rect::new(-20.0, -150.0, 20.0, -50.0),
];

const CRUISER_SHAPE: &[Rect] = &[
    // Hull
    Rect::new(-180.0, -60.0, 180.0, 60.0),
    // Bridge
    Rect::new(-60.0, 60.0, 60.0, 120.0),
    Rect::new(-20.0, 120.0, 20.0, 160.0),
    // Keel
    Rect::new(-100.0, -100.0, 100.0, -60.0),
    Rect::new(-30.0, -160.0, 30.0, -100.0),
    // Engine pods
    Rect::new(-300.0, -40.0, -180.0, 40.0),
    Rect::new(180.0, -40.0, 300.0, 40.0),
    Rect::new(-280.0, 40.0, -220.0, 80.0),
    Rect::new(220.0, 40.0, 280.0, 80.0),
    Rect::new(-280.0, -80.0, -220.0, -40.0),
    Rect::new(220.0, -80.0, 280.0, -40.0),
];

impl EntityKind {
    /// Half-extents (x, y, depth thickness)
    pub fn extent(&self) -> Vec3 {
        match self {
            EntityKind::Player => Vec3::new(120.0, 60.0, 80.0),
            EntityKind::PlayerShot => Vec3::new(10.0, 10.0, 40.0),
            EntityKind::EnemyShot => Vec3::new(14.0, 14.0, 40.0),
            EntityKind::Drone => Vec3::new(150.0, 150.0, 100.0),
            EntityKind::Cruiser => Vec3::new(300.0, 160.0, 150.0),
            EntityKind::Barrier => Vec3::new(400.0, 100.0, 60.0),
        }
    }

    /// Rectangles making up the visual and collision shape. `None` means a
    /// single rectangle spanning the full extents.
    pub fn shape(&self) -> Option<&'static [Rect]> {
        match self {
            EntityKind::Player => Some(PLAYER_SHAPE),
            EntityKind::Drone => Some(DRONE_SHAPE),
            EntityKind::Cruiser => Some(CRUISER_SHAPE),
            EntityKind::PlayerShot | EntityKind::EnemyShot | EntityKind::Barrier => None,
        }
    }

    /// Base shade (0 = black, 1 = full intensity)
    pub fn shade(&self) -> f32 {
        match self {
            EntityKind::Player => 1.0,
            EntityKind::PlayerShot => 0.9,
            EntityKind::EnemyShot => 0.8,
            EntityKind::Drone => 0.7,
            EntityKind::Cruiser => 0.6,
            EntityKind::Barrier => 0.4,
        }
    }

    /// Score for destroying one of these
    pub fn points(&self) -> u32 {
        match self {
            EntityKind::Drone => 100,
            EntityKind::Cruiser => 500,
            _ => 0,
        }
    }

    /// Projectiles skip the forming and exploding animations
    pub fn is_projectile(&self) -> bool {
        matches!(self, EntityKind::PlayerShot | EntityKind::EnemyShot)
    }

    /// Whether a hit can destroy this kind
    pub fn is_destructible(&self) -> bool {
        !matches!(self, EntityKind::Barrier)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::PlayerShot => "player_shot",
            EntityKind::EnemyShot => "enemy_shot",
            EntityKind::Drone => "drone",
            EntityKind::Cruiser => "cruiser",
            EntityKind::Barrier => "barrier",
        }
    }
}
