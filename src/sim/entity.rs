//! The simulated entity and its normal / forming / exploding state machine

use std::borrow::Cow;

use glam::{Vec2, Vec3};

use super::kind::EntityKind;
use super::shape::Rect;
use super::shatter::Shatter;
use super::tunnel::Tunnel;
use crate::consts::*;
use crate::error::{Axis, EntityError};

/// Lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub enum EntityState {
    /// Moving and colliding
    Normal,
    /// Assembling after spawn
    Forming(Shatter),
    /// Shattering; removed once the animation completes
    Exploding(Shatter),
}

/// What happened to an entity during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    /// Forming finished, entity is now normal
    Formed,
    /// Explosion finished, entity is flagged for removal
    Finished,
}

/// Distance and age limits for a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub traveled: f32,
    pub age: f32,
    pub max_travel: f32,
    pub max_age: f32,
}

impl Lifetime {
    pub fn new(max_travel: f32, max_age: f32) -> Self {
        Self {
            traveled: 0.0,
            age: 0.0,
            max_travel,
            max_age,
        }
    }

    /// Record travel and elapsed reference frames. Returns true once expired.
    pub fn tick(&mut self, distance: f32, scale: f32) -> bool {
        self.traveled += distance;
        self.age += scale;
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.traveled >= self.max_travel || self.age >= self.max_age
    }
}

/// A simulated object in the tunnel
#[derive(Debug, Clone)]
pub struct Entity {
    /// Assigned by the world on insertion, increasing with insertion order
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Half-extents; `z` is the depth half-thickness
    pub extent: Vec3,
    shape: Cow<'static, [Rect]>,
    pub collidable: bool,
    pub shade: f32,
    pub state: EntityState,
    /// Removal request, honored at the next purge
    pub remove: bool,
    /// Set once the entity has been advanced in the current frame
    pub(crate) processed: bool,
    /// Projectile range and age limits
    pub lifetime: Option<Lifetime>,
    /// Remaining hits before the entity is destroyed (player only)
    pub shields: u8,
    /// Reference frames until the entity may fire again
    pub cooldown: f32,
}

fn check_extent(axis: Axis, value: f32) -> Result<(), EntityError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EntityError::BadExtent { axis, value })
    }
}

impl Entity {
    /// Build an entity with its kind's default extents and shape.
    ///
    /// Depth is kept as given; the world wraps it into its own tunnel on
    /// insertion.
    pub fn new(kind: EntityKind, pos: Vec3, vel: Vec3) -> Result<Self, EntityError> {
        let shape = match kind.shape() {
            Some(rects) => Cow::Borrowed(rects),
            None => Cow::Owned(vec![Rect::centered(kind.extent().truncate())]),
        };
        Self::build(kind, pos, vel, kind.extent(), shape)
    }

    /// Build an entity with explicit extents and shape
    pub fn with_shape(
        kind: EntityKind,
        pos: Vec3,
        vel: Vec3,
        extent: Vec3,
        shape: Vec<Rect>,
    ) -> Result<Self, EntityError> {
        Self::build(kind, pos, vel, extent, Cow::Owned(shape))
    }

    fn build(
        kind: EntityKind,
        pos: Vec3,
        vel: Vec3,
        extent: Vec3,
        shape: Cow<'static, [Rect]>,
    ) -> Result<Self, EntityError> {
        check_extent(Axis::X, extent.x)?;
        check_extent(Axis::Y, extent.y)?;
        check_extent(Axis::Z, extent.z)?;
        if shape.is_empty() {
            return Err(EntityError::EmptyShape);
        }
        for (index, rect) in shape.iter().enumerate() {
            if !rect.has_area() {
                return Err(EntityError::EmptyRect { index });
            }
            if !rect.within(extent.truncate()) {
                return Err(EntityError::RectOutsideExtents { index });
            }
        }

        let lifetime = kind
            .is_projectile()
            .then(|| Lifetime::new(SHOT_RANGE, SHOT_LIFETIME));
        let shields = if kind == EntityKind::Player { PLAYER_SHIELDS } else { 0 };

        Ok(Self {
            id: 0,
            kind,
            pos,
            vel,
            extent,
            shape,
            collidable: true,
            shade: kind.shade(),
            state: EntityState::Normal,
            remove: false,
            processed: false,
            lifetime,
            shields,
            cooldown: 0.0,
        })
    }

    /// Shape rectangles in entity-local coordinates
    pub fn shape(&self) -> &[Rect] {
        &self.shape
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self.state, EntityState::Normal)
    }

    #[inline]
    pub fn is_forming(&self) -> bool {
        matches!(self.state, EntityState::Forming(_))
    }

    #[inline]
    pub fn is_exploding(&self) -> bool {
        matches!(self.state, EntityState::Exploding(_))
    }

    /// Start the spawn assembly animation
    pub fn begin_forming(&mut self) {
        self.state = EntityState::Forming(Shatter::form(
            self.extent.truncate(),
            FORMATION_STEPS,
            FORMATION_SPEED,
        ));
    }

    /// Destroy the entity, shattering from `impact` (world coordinates).
    ///
    /// A second call while already exploding is ignored. Projectiles have no
    /// explosion and are simply flagged for removal. Returns true when the
    /// call changed the entity's state.
    pub fn destroy(&mut self, impact: Vec3) -> bool {
        if self.is_exploding() || self.remove {
            return false;
        }
        self.collidable = false;
        if self.kind.is_projectile() {
            self.remove = true;
            return true;
        }

        let local = Vec2::new(impact.x - self.pos.x, impact.y - self.pos.y);
        self.state = EntityState::Exploding(Shatter::explode(
            self.extent.truncate(),
            local,
            EXPLOSION_STEPS,
            EXPLOSION_SPEED,
        ));
        log::debug!("{} #{} exploding", self.kind.as_str(), self.id);
        true
    }

    /// Advance by `scale` reference frames
    pub fn update(&mut self, scale: f32, tunnel: &Tunnel) -> Transition {
        if self.is_normal() {
            self.integrate(scale, tunnel);
            return Transition::None;
        }

        let finished = match &mut self.state {
            EntityState::Forming(shatter) | EntityState::Exploding(shatter) => {
                shatter.advance(scale)
            }
            EntityState::Normal => false,
        };
        if !finished {
            return Transition::None;
        }

        if self.is_forming() {
            self.state = EntityState::Normal;
            log::debug!("{} #{} formed", self.kind.as_str(), self.id);
            Transition::Formed
        } else {
            self.remove = true;
            Transition::Finished
        }
    }

    /// Move by velocity, bounce off the cross-section walls, wrap depth
    fn integrate(&mut self, scale: f32, tunnel: &Tunnel) {
        self.pos += self.vel * scale;

        if self.pos.x - self.extent.x < tunnel.left {
            self.pos.x = tunnel.left + self.extent.x;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.extent.x > tunnel.right {
            self.pos.x = tunnel.right - self.extent.x;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y - self.extent.y < tunnel.bottom {
            self.pos.y = tunnel.bottom + self.extent.y;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y + self.extent.y > tunnel.top {
            self.pos.y = tunnel.top - self.extent.y;
            self.vel.y = -self.vel.y.abs();
        }

        self.pos.z = tunnel.wrap(self.pos.z);
    }

    /// Shape rectangles in world x/y
    pub fn world_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        let at = self.pos.truncate();
        self.shape.iter().map(move |r| r.translate(at))
    }

    /// Rectangles to draw in entity-local coordinates. While forming or
    /// exploding each shape rectangle is cut into displaced grid fragments.
    pub fn visual_rects(&self, out: &mut Vec<Rect>) {
        match &self.state {
            EntityState::Normal => out.extend_from_slice(&self.shape),
            EntityState::Forming(shatter) | EntityState::Exploding(shatter) => {
                for rect in self.shape.iter() {
                    shatter.fragments(rect, out);
                }
            }
        }
    }

    /// Shade to draw with: fades in while forming and out while exploding
    pub fn draw_shade(&self) -> f32 {
        match &self.state {
            EntityState::Normal => self.shade,
            EntityState::Forming(s) => self.shade * (0.25 + 0.75 * s.progress()),
            EntityState::Exploding(s) => self.shade * (1.0 - 0.75 * s.progress()),
        }
    }
}
