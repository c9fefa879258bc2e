//! Collision detection and the kind-pair interaction table
//!
//! Two phases:
//! - Broad: velocity-extended AABB on all three axes, with the depth axis
//!   measured as the shortest periodic distance. Extending each half-extent
//!   by the current speed on that axis keeps fast entities from tunneling
//!   through each other inside one frame.
//! - Narrow: every pair of shape rectangles is tested in world x/y, with
//!   the same velocity-extended depth reach as the broad phase so a pair
//!   the broad phase keeps is never lost to a coarse frame step.

use glam::Vec3;

use super::entity::Entity;
use super::kind::EntityKind;

/// Combined half-extents of both partners widened by their speeds
#[inline]
fn reach(a: &Entity, b: &Entity) -> Vec3 {
    a.extent + a.vel.abs() + b.extent + b.vel.abs()
}

/// Velocity-extended AABB test
pub fn broad_phase(a: &Entity, b: &Entity, length: f32) -> bool {
    let reach = reach(a, b);
    let dx = (b.pos.x - a.pos.x).abs();
    let dy = (b.pos.y - a.pos.y).abs();
    let dz = crate::periodic_delta(a.pos.z, b.pos.z, length).abs();

    dx <= reach.x && dy <= reach.y && dz <= reach.z
}

/// Exact shape overlap
///
/// Every rectangle pair is tested without early exit on the outer loop;
/// shapes are small (at most 11 rectangles) so the full product is cheap.
pub fn narrow_phase(a: &Entity, b: &Entity, length: f32) -> bool {
    let dz = crate::periodic_delta(a.pos.z, b.pos.z, length).abs();
    if dz > reach(a, b).z {
        return false;
    }

    let mut hit = false;
    for ra in a.world_rects() {
        for rb in b.world_rects() {
            hit |= ra.overlaps(&rb);
        }
    }
    hit
}

/// Full collision test between two distinct entities
///
/// Entities that are not collidable, or are forming or exploding, never
/// collide.
pub fn test_collision(a: &Entity, b: &Entity, length: f32) -> bool {
    if !a.collidable || !b.collidable || !a.is_normal() || !b.is_normal() {
        return false;
    }
    if a.remove || b.remove {
        return false;
    }
    broad_phase(a, b, length) && narrow_phase(a, b, length)
}

/// Impact point used to seed the shatter of whichever partner is destroyed
pub fn contact_point(a: &Entity, b: &Entity) -> Vec3 {
    Vec3::new(
        (a.pos.x + b.pos.x) * 0.5,
        (a.pos.y + b.pos.y) * 0.5,
        b.pos.z,
    )
}

/// Outcome of a collision, read with the first partner as the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing happens
    Ignore,
    /// Player rams an enemy: player takes damage and bounces, enemy explodes
    Ram,
    /// Player is struck by an enemy shot: player takes damage, shot expires
    Hit,
    /// Player bounces off an obstacle
    Bounce,
    /// Player shot destroys its target and expires
    Kill,
    /// Player shot is absorbed; an enemy shot it meets expires too
    Absorb,
}

/// Table entry for an ordered kind pair
fn table(a: EntityKind, b: EntityKind) -> Interaction {
    use EntityKind::*;
    match (a, b) {
        (Player, Drone | Cruiser) => Interaction::Ram,
        (Player, EnemyShot) => Interaction::Hit,
        (Player, Barrier) => Interaction::Bounce,
        (PlayerShot, Drone | Cruiser) => Interaction::Kill,
        (PlayerShot, Barrier | EnemyShot) => Interaction::Absorb,
        _ => Interaction::Ignore,
    }
}

/// Resolved interaction for an unordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub interaction: Interaction,
    /// True when the table entry was found with the partners swapped, so
    /// the second entity is the subject
    pub swapped: bool,
}

/// Look up the interaction for two kinds in either order
pub fn dispatch(a: EntityKind, b: EntityKind) -> Dispatch {
    let forward = table(a, b);
    if forward != Interaction::Ignore {
        return Dispatch {
            interaction: forward,
            swapped: false,
        };
    }
    Dispatch {
        interaction: table(b, a),
        swapped: true,
    }
}
