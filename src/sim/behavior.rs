//! Per-kind behavior run before integration: player control, weapons,
//! cruiser targeting and projectile aging

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::kind::EntityKind;
use super::tunnel::Tunnel;
use crate::consts::*;

/// Control signals for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Normalized aim position, each axis in [-1, 1]
    pub aim: Vec2,
    /// Accelerate along depth
    pub forward: bool,
    /// Decelerate / reverse along depth
    pub backward: bool,
    /// Fire a shot
    pub fire: bool,
}

/// Request to add an entity to the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub pos: Vec3,
    pub vel: Vec3,
}

/// Steer the controlled entity toward the aim point and apply thrust
pub fn steer_player(player: &mut Entity, input: &TickInput, tunnel: &Tunnel, scale: f32) {
    let target = tunnel.aim_point(input.aim);
    let error = target - player.pos.truncate();
    let strafe = (error * PLAYER_STEER_GAIN).clamp(
        Vec2::splat(-PLAYER_MAX_STRAFE),
        Vec2::splat(PLAYER_MAX_STRAFE),
    );
    player.vel.x = strafe.x;
    player.vel.y = strafe.y;

    let mut thrust = 0.0;
    if input.forward {
        thrust += PLAYER_ACCEL;
    }
    if input.backward {
        thrust -= PLAYER_ACCEL;
    }
    player.vel.z = (player.vel.z + thrust * scale).clamp(-PLAYER_MAX_REVERSE, PLAYER_MAX_SPEED);
}

/// Fire from the player's nose if the cooldown has elapsed. The shot
/// inherits the player's velocity.
pub fn player_fire(player: &mut Entity, input: &TickInput, scale: f32) -> Option<SpawnRequest> {
    player.cooldown = (player.cooldown - scale).max(0.0);
    if !input.fire || player.cooldown > 0.0 {
        return None;
    }
    player.cooldown = SHOT_COOLDOWN;

    let shot_extent = EntityKind::PlayerShot.extent();
    Some(SpawnRequest {
        kind: EntityKind::PlayerShot,
        pos: player.pos + Vec3::new(0.0, 0.0, player.extent.z + shot_extent.z),
        vel: player.vel + Vec3::new(0.0, 0.0, SHOT_SPEED),
    })
}

/// Count down the cruiser's fire timer and shoot at `target` when it is
/// in range. The shot travels the shorter way around the tunnel.
pub fn cruiser_fire<R: Rng>(
    cruiser: &mut Entity,
    target: Option<Vec3>,
    tunnel: &Tunnel,
    rng: &mut R,
    scale: f32,
) -> Option<SpawnRequest> {
    cruiser.cooldown -= scale;
    if cruiser.cooldown > 0.0 {
        return None;
    }
    cruiser.cooldown =
        CRUISER_FIRE_INTERVAL + rng.random_range(-CRUISER_FIRE_JITTER..=CRUISER_FIRE_JITTER);

    let target = target?;
    let dz = tunnel.delta(cruiser.pos.z, target.z);
    if dz.abs() > CRUISER_FIRE_RANGE {
        return None;
    }

    let dir = dz.signum();
    let shot_extent = EntityKind::EnemyShot.extent();
    let pos = Vec3::new(
        cruiser.pos.x,
        cruiser.pos.y,
        tunnel.wrap(cruiser.pos.z + dir * (cruiser.extent.z + shot_extent.z)),
    );
    // Cover the lateral gap over the time it takes to close the depth gap
    let frames = (dz.abs() / ENEMY_SHOT_SPEED).max(1.0);
    let lateral = (target.truncate() - pos.truncate()) / frames;
    Some(SpawnRequest {
        kind: EntityKind::EnemyShot,
        pos,
        vel: Vec3::new(lateral.x, lateral.y, dir * ENEMY_SHOT_SPEED),
    })
}

/// Age a projectile after it has moved. Returns true when it expired and
/// was flagged for removal.
pub fn age_projectile(shot: &mut Entity, scale: f32) -> bool {
    let distance = shot.vel.length() * scale;
    let Some(lifetime) = shot.lifetime.as_mut() else {
        return false;
    };
    if lifetime.tick(distance, scale) {
        shot.remove = true;
        shot.collidable = false;
        return true;
    }
    false
}
