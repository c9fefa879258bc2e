//! Notifications for the scoring / level collaborator

use serde::{Deserialize, Serialize};

use super::kind::EntityKind;
use crate::audio::SoundEffect;

/// Something the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a shot
    ShotFired,
    /// A cruiser fired at the player
    EnemyShotFired,
    /// An entity started exploding
    Destroyed { kind: EntityKind, points: u32 },
    /// Player lost a shield
    DamageTaken { shields_left: u8 },
    /// Player bounced off an obstacle
    Bounced,
    /// An entity finished assembling
    Formed { kind: EntityKind },
    /// The player's explosion finished and it left the world
    PlayerLost,
}

impl GameEvent {
    /// Sound to trigger when this event occurs
    pub fn sound(&self) -> SoundEffect {
        match self {
            GameEvent::ShotFired => SoundEffect::Shot,
            GameEvent::EnemyShotFired => SoundEffect::EnemyShot,
            GameEvent::Destroyed { .. } => SoundEffect::Explosion,
            GameEvent::DamageTaken { .. } => SoundEffect::Damage,
            GameEvent::Bounced => SoundEffect::Bounce,
            GameEvent::Formed { .. } => SoundEffect::Materialize,
            GameEvent::PlayerLost => SoundEffect::GameOver,
        }
    }
}
