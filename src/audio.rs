//! Fire-and-forget sound triggers
//!
//! The simulation names the sound at the moment a state transition happens
//! and hands it to whatever sink the host supplied. Whether or when it
//! actually plays is the sink's business.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired
    Shot,
    /// A cruiser fired
    EnemyShot,
    /// Something started exploding
    Explosion,
    /// Player lost a shield
    Damage,
    /// Player bounced off an obstacle
    Bounce,
    /// An entity finished assembling
    Materialize,
    /// Player's explosion finished
    GameOver,
}

impl SoundEffect {
    /// Event name used by hosts that key sounds by string
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Shot => "shot_fired",
            SoundEffect::EnemyShot => "enemy_shot_fired",
            SoundEffect::Explosion => "entity_destroyed",
            SoundEffect::Damage => "damage_taken",
            SoundEffect::Bounce => "bounce",
            SoundEffect::Materialize => "materialize",
            SoundEffect::GameOver => "game_over",
        }
    }
}

/// Receiver for sound triggers
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every trigger
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs triggers at the effective volume; useful for headless runs
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl LogAudio {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::trace!("sound {} at {:.2}", effect.name(), vol);
    }
}
