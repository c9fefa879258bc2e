//! The tunnel world: owns every live entity and drives the frame cycle
//!
//! One frame:
//! 1. Advance each entity exactly once (behavior, then its state machine)
//! 2. Test the controlled entity and the player's shots against the rest
//! 3. Purge entities flagged for removal
//!
//! Entities live in a generational slot map. Removal during the update and
//! collision phases only sets a flag; the purge drops them afterwards.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::{SlotMap, new_key_type};

use super::behavior::{self, SpawnRequest, TickInput};
use super::collision::{self, Interaction};
use super::entity::{Entity, Transition};
use super::events::GameEvent;
use super::kind::EntityKind;
use super::tunnel::Tunnel;
use crate::audio::AudioSink;
use crate::consts::{MAX_FRAME_DT, REFERENCE_DT};
use crate::error::EntityError;

new_key_type! {
    /// Stable reference to an entity. Goes stale once the entity is purged.
    pub struct Handle;
}

/// An entity eligible for drawing, with its depth ahead of the observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub handle: Handle,
    pub depth: f32,
}

/// The tunnel and everything in it
pub struct World {
    tunnel: Tunnel,
    entities: SlotMap<Handle, Entity>,
    /// Next entity ID
    next_id: u32,
    /// The controlled entity
    player: Option<Handle>,
    input: TickInput,
    rng: Pcg32,
    audio: Box<dyn AudioSink>,
    events: Vec<GameEvent>,
    /// True while entities are being advanced
    updating: bool,
    score: u64,
    time_ticks: u64,
}

impl World {
    /// Create an empty world with the default tunnel
    pub fn new(seed: u64, audio: Box<dyn AudioSink>) -> Self {
        Self::with_tunnel(Tunnel::default(), seed, audio)
    }

    pub fn with_tunnel(tunnel: Tunnel, seed: u64, audio: Box<dyn AudioSink>) -> Self {
        Self {
            tunnel,
            entities: SlotMap::with_key(),
            next_id: 1,
            player: None,
            input: TickInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            audio,
            events: Vec::new(),
            updating: false,
            score: 0,
            time_ticks: 0,
        }
    }

    pub fn tunnel(&self) -> &Tunnel {
        &self.tunnel
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Insert an entity. Anything but a projectile starts forming.
    ///
    /// Entities inserted while the world is advancing count as already
    /// processed, so they first move on the next frame.
    pub fn add(&mut self, mut entity: Entity) -> Handle {
        entity.id = self.next_id;
        self.next_id += 1;
        entity.pos.z = self.tunnel.wrap(entity.pos.z);
        entity.remove = false;
        entity.processed = self.updating;
        if !entity.kind.is_projectile() {
            entity.begin_forming();
        }
        log::debug!("added {} #{}", entity.kind.as_str(), entity.id);
        self.entities.insert(entity)
    }

    /// Fulfill a spawn request from the level collaborator
    pub fn spawn(&mut self, request: SpawnRequest) -> Result<Handle, EntityError> {
        let entity = Entity::new(request.kind, request.pos, request.vel)?;
        if !request.kind.is_projectile() {
            log::info!(
                "spawn {} at ({:.0}, {:.0}, {:.0})",
                request.kind.as_str(),
                request.pos.x,
                request.pos.y,
                request.pos.z
            );
        }
        Ok(self.add(entity))
    }

    /// Spawn the controlled entity
    pub fn spawn_player(&mut self, pos: Vec3) -> Result<Handle, EntityError> {
        let handle = self.spawn(SpawnRequest {
            kind: EntityKind::Player,
            pos,
            vel: Vec3::ZERO,
        })?;
        self.player = Some(handle);
        Ok(handle)
    }

    /// Make an existing entity the controlled one
    pub fn set_player(&mut self, handle: Handle) {
        if self.contains(handle) {
            self.player = Some(handle);
        }
    }

    pub fn player(&self) -> Option<Handle> {
        self.player
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|h| self.get(h))
    }

    /// Remove an entity immediately. Absent or stale handles are ignored.
    pub fn remove(&mut self, handle: Handle) -> Option<Entity> {
        let entity = self.entities.remove(handle)?;
        if self.player == Some(handle) {
            self.player = None;
        }
        Some(entity)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.contains_key(handle)
    }

    pub fn get(&self, handle: Handle) -> Option<&Entity> {
        self.entities.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        self.entities.get_mut(handle)
    }

    /// All live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Entity)> {
        self.entities.iter()
    }

    /// Control signals consumed by the next update
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one frame with the given input and return its events
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.set_input(*input);
        self.update(dt);
        self.take_events()
    }

    /// Advance the world by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let scale = dt / REFERENCE_DT;
        self.time_ticks += 1;
        self.updating = true;

        let target = self
            .player_entity()
            .filter(|p| p.is_normal())
            .map(|p| p.pos);

        let handles: Vec<Handle> = self.entities.keys().collect();
        for handle in handles {
            let Some(entity) = self.entities.get_mut(handle) else {
                continue;
            };
            if entity.processed || entity.remove {
                continue;
            }
            entity.processed = true;

            let request = if entity.is_normal() {
                match entity.kind {
                    EntityKind::Player => {
                        behavior::steer_player(entity, &self.input, &self.tunnel, scale);
                        behavior::player_fire(entity, &self.input, scale)
                    }
                    EntityKind::Cruiser => {
                        behavior::cruiser_fire(entity, target, &self.tunnel, &mut self.rng, scale)
                    }
                    _ => None,
                }
            } else {
                None
            };

            let transition = entity.update(scale, &self.tunnel);
            if entity.kind.is_projectile() && entity.is_normal() {
                behavior::age_projectile(entity, scale);
            }
            let kind = entity.kind;

            if transition == Transition::Formed {
                self.emit(GameEvent::Formed { kind });
            }
            if let Some(request) = request {
                match self.spawn(request) {
                    Ok(_) if request.kind == EntityKind::PlayerShot => {
                        self.emit(GameEvent::ShotFired)
                    }
                    Ok(_) => self.emit(GameEvent::EnemyShotFired),
                    Err(e) => log::warn!("dropped {} spawn: {e}", request.kind.as_str()),
                }
            }
        }

        self.collide();
        self.purge();
        self.updating = false;
    }

    /// Entities between `near` (inclusive) and `far` (exclusive) ahead of
    /// `observer_z`, farthest first. Equal depths keep insertion order.
    pub fn depth_sort_for_draw(&self, observer_z: f32, near: f32, far: f32) -> Vec<DrawItem> {
        let mut items: Vec<(u32, DrawItem)> = self
            .iter()
            .filter_map(|(handle, entity)| {
                let depth = self.tunnel.ahead(observer_z, entity.pos.z);
                (depth >= near && depth < far).then_some((entity.id, DrawItem { handle, depth }))
            })
            .collect();
        items.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth).then(a.0.cmp(&b.0)));
        items.into_iter().map(|(_, item)| item).collect()
    }

    fn emit(&mut self, event: GameEvent) {
        self.audio.play(event.sound());
        self.events.push(event);
    }

    /// Test the controlled entity and every player shot against the rest
    fn collide(&mut self) {
        let player = self.player;
        let all: Vec<Handle> = self.entities.keys().collect();
        let subjects: Vec<Handle> = self
            .entities
            .iter()
            .filter(|&(h, e)| Some(h) == player || e.kind == EntityKind::PlayerShot)
            .map(|(h, _)| h)
            .collect();

        for &a in &subjects {
            for &b in &all {
                if a == b {
                    continue;
                }
                let (Some(ea), Some(eb)) = (self.entities.get(a), self.entities.get(b)) else {
                    continue;
                };
                let dispatch = collision::dispatch(ea.kind, eb.kind);
                if dispatch.interaction == Interaction::Ignore {
                    continue;
                }
                if !collision::test_collision(ea, eb, self.tunnel.length) {
                    continue;
                }
                let (subject, other) = if dispatch.swapped { (b, a) } else { (a, b) };
                self.resolve(dispatch.interaction, subject, other);
            }
        }
    }

    fn resolve(&mut self, interaction: Interaction, subject: Handle, other: Handle) {
        let (Some(s), Some(o)) = (self.entities.get(subject), self.entities.get(other)) else {
            return;
        };
        let contact = collision::contact_point(s, o);
        let other_is_projectile = o.kind.is_projectile();

        match interaction {
            Interaction::Ignore => {}
            Interaction::Ram => {
                self.destroy_at(other, contact);
                self.damage(subject);
                self.bounce(subject, other);
            }
            Interaction::Hit => {
                self.expire(other);
                self.damage(subject);
            }
            Interaction::Bounce => {
                self.bounce(subject, other);
                self.emit(GameEvent::Bounced);
            }
            Interaction::Kill => {
                self.expire(subject);
                self.destroy_at(other, contact);
            }
            Interaction::Absorb => {
                self.expire(subject);
                if other_is_projectile {
                    self.expire(other);
                }
            }
        }
    }

    /// Start an entity's explosion and credit its points
    fn destroy_at(&mut self, handle: Handle, impact: Vec3) {
        let Some(entity) = self.entities.get_mut(handle) else {
            return;
        };
        if !entity.kind.is_destructible() || !entity.destroy(impact) {
            return;
        }
        let kind = entity.kind;
        if kind.is_projectile() {
            return;
        }
        let points = kind.points();
        self.score += u64::from(points);
        self.emit(GameEvent::Destroyed { kind, points });
    }

    /// Flag an entity for removal without an explosion
    fn expire(&mut self, handle: Handle) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.remove = true;
            entity.collidable = false;
        }
    }

    /// Take one shield from an entity, destroying it at zero
    fn damage(&mut self, handle: Handle) {
        let Some(entity) = self.entities.get_mut(handle) else {
            return;
        };
        if entity.shields == 0 || !entity.is_normal() {
            return;
        }
        entity.shields -= 1;
        let shields_left = entity.shields;
        let pos = entity.pos;
        self.emit(GameEvent::DamageTaken { shields_left });
        if shields_left == 0 {
            self.destroy_at(handle, pos);
        }
    }

    /// Fixed bounce: reverse the subject's depth velocity away from the
    /// obstacle and move it just clear of the obstacle's slab
    fn bounce(&mut self, subject: Handle, obstacle: Handle) {
        let Some(o) = self.entities.get(obstacle) else {
            return;
        };
        let (oz, othick) = (o.pos.z, o.extent.z);
        let tunnel = self.tunnel;
        let Some(s) = self.entities.get_mut(subject) else {
            return;
        };
        let away = tunnel.delta(oz, s.pos.z).signum();
        s.vel.z = away * s.vel.z.abs();
        s.pos.z = tunnel.wrap(oz + away * (othick + s.extent.z + 1.0));
    }

    /// Drop flagged entities and reset the processed flag on survivors
    fn purge(&mut self) {
        let player = self.player;
        let mut lost_player = false;
        self.entities.retain(|handle, entity| {
            if entity.remove {
                lost_player |= Some(handle) == player;
                return false;
            }
            entity.processed = false;
            true
        });

        if lost_player {
            self.player = None;
            log::debug!("player lost");
            self.emit(GameEvent::PlayerLost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, SoundEffect};
    use crate::consts::*;
    use crate::sim::entity::EntityState;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = REFERENCE_DT;

    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    fn world() -> World {
        World::new(42, Box::new(NullAudio))
    }

    /// Add an entity that skips its formation animation
    fn add_ready(world: &mut World, kind: EntityKind, pos: Vec3, vel: Vec3) -> Handle {
        let h = world.add(Entity::new(kind, pos, vel).unwrap());
        world.get_mut(h).unwrap().state = EntityState::Normal;
        h
    }

    fn ready_player(world: &mut World, z: f32) -> Handle {
        let h = add_ready(world, EntityKind::Player, Vec3::new(0.0, 0.0, z), Vec3::ZERO);
        world.set_player(h);
        h
    }

    fn run(world: &mut World, frames: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(world.frame(DT, &TickInput::default()));
        }
        events
    }

    #[test]
    fn test_add_forms_except_projectiles() {
        let mut w = world();
        let drone = w
            .spawn(SpawnRequest {
                kind: EntityKind::Drone,
                pos: Vec3::new(0.0, 0.0, -100.0),
                vel: Vec3::ZERO,
            })
            .unwrap();
        let shot = w
            .spawn(SpawnRequest {
                kind: EntityKind::EnemyShot,
                pos: Vec3::ZERO,
                vel: Vec3::ZERO,
            })
            .unwrap();
        assert!(w.get(drone).unwrap().is_forming());
        assert!(w.get(shot).unwrap().is_normal());
        assert_eq!(w.get(drone).unwrap().pos.z, TUNNEL_LENGTH - 100.0);
        assert!(w.get(drone).unwrap().id < w.get(shot).unwrap().id);
    }

    #[test]
    fn test_formation_completes() {
        let mut w = world();
        w.spawn(SpawnRequest {
            kind: EntityKind::Drone,
            pos: Vec3::new(0.0, 0.0, 5000.0),
            vel: Vec3::ZERO,
        })
        .unwrap();
        let events = run(&mut w, 100);
        assert_eq!(
            events,
            vec![GameEvent::Formed {
                kind: EntityKind::Drone
            }]
        );
    }

    #[test]
    fn test_remove_absent_and_stale() {
        let mut w = world();
        let h = add_ready(&mut w, EntityKind::Drone, Vec3::ZERO, Vec3::ZERO);
        assert!(w.remove(h).is_some());
        assert!(w.remove(h).is_none());

        // Slot is reused with a new generation
        let h2 = add_ready(&mut w, EntityKind::Drone, Vec3::ZERO, Vec3::ZERO);
        assert_ne!(h, h2);
        assert!(w.get(h).is_none());
        assert!(w.get(h2).is_some());
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_update_advances_each_entity_once() {
        let mut w = world();
        let h = add_ready(
            &mut w,
            EntityKind::Drone,
            Vec3::new(0.0, 0.0, 1000.0),
            Vec3::new(0.0, 0.0, 25.0),
        );
        w.update(DT);
        assert_eq!(w.get(h).unwrap().pos.z, 1025.0);
        assert!(!w.get(h).unwrap().processed);
    }

    #[test]
    fn test_shot_spawned_mid_update_waits_a_frame() {
        let mut w = world();
        ready_player(&mut w, 1000.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let events = w.frame(DT, &fire);
        assert_eq!(events, vec![GameEvent::ShotFired]);

        let shot_z = |w: &World| {
            w.iter()
                .find(|(_, e)| e.kind == EntityKind::PlayerShot)
                .map(|(_, e)| e.pos.z)
        };
        assert_eq!(shot_z(&w), Some(1120.0));
        w.frame(DT, &TickInput::default());
        assert_eq!(shot_z(&w), Some(1120.0 + SHOT_SPEED));
    }

    #[test]
    fn test_shot_destroys_drone() {
        let sounds = Rc::new(RefCell::new(Vec::new()));
        let mut w = World::new(1, Box::new(Recorder(sounds.clone())));
        ready_player(&mut w, 1000.0);
        let drone = add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 3000.0), Vec3::ZERO);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut events = w.frame(DT, &fire);
        events.extend(run(&mut w, 20));

        assert!(events.contains(&GameEvent::Destroyed {
            kind: EntityKind::Drone,
            points: 100
        }));
        assert_eq!(w.score(), 100);
        assert!(w.get(drone).unwrap().is_exploding());
        assert!(w.iter().all(|(_, e)| e.kind != EntityKind::PlayerShot));
        assert!(sounds.borrow().contains(&SoundEffect::Shot));
        assert!(sounds.borrow().contains(&SoundEffect::Explosion));

        // Explosion runs out and the drone is purged
        run(&mut w, 100);
        assert!(!w.contains(drone));
    }

    #[test]
    fn test_ram_damages_and_bounces() {
        let mut w = world();
        let player = ready_player(&mut w, 1000.0);
        let drone = add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 1150.0), Vec3::ZERO);

        let events = run(&mut w, 1);
        assert_eq!(
            events,
            vec![
                GameEvent::Destroyed {
                    kind: EntityKind::Drone,
                    points: 100
                },
                GameEvent::DamageTaken { shields_left: 2 },
            ]
        );
        assert!(w.get(drone).unwrap().is_exploding());
        let p = w.get(player).unwrap();
        assert_eq!(p.shields, PLAYER_SHIELDS - 1);
        assert!(p.pos.z < 1150.0 - 180.0);
    }

    #[test]
    fn test_barrier_bounce() {
        let mut w = world();
        let player = ready_player(&mut w, 1000.0);
        w.get_mut(player).unwrap().vel.z = 20.0;
        add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 1150.0), Vec3::ZERO);

        let events = run(&mut w, 1);
        assert_eq!(events, vec![GameEvent::Bounced]);
        let p = w.get(player).unwrap();
        assert_eq!(p.vel.z, -20.0);
        assert_eq!(p.pos.z, 1150.0 - 141.0);
        assert_eq!(p.shields, PLAYER_SHIELDS);

        // Moving away: no second bounce
        assert!(run(&mut w, 3).is_empty());
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let mut w = world();
        let player = ready_player(&mut w, 1000.0);
        let shot = w.add(Entity::new(EntityKind::EnemyShot, Vec3::new(0.0, 0.0, 1100.0), Vec3::ZERO).unwrap());

        let events = run(&mut w, 1);
        assert_eq!(events, vec![GameEvent::DamageTaken { shields_left: 2 }]);
        assert!(!w.contains(shot));
        assert!(w.contains(player));
    }

    #[test]
    fn test_player_lost_after_last_shield() {
        let mut w = world();
        let player = ready_player(&mut w, 1000.0);
        w.get_mut(player).unwrap().shields = 1;
        w.add(Entity::new(EntityKind::EnemyShot, Vec3::new(0.0, 0.0, 1100.0), Vec3::ZERO).unwrap());

        let events = run(&mut w, 1);
        assert_eq!(
            events,
            vec![
                GameEvent::DamageTaken { shields_left: 0 },
                GameEvent::Destroyed {
                    kind: EntityKind::Player,
                    points: 0
                },
            ]
        );
        assert!(w.get(player).unwrap().is_exploding());

        let events = run(&mut w, 100);
        assert_eq!(events, vec![GameEvent::PlayerLost]);
        assert_eq!(w.player(), None);
        assert!(!w.contains(player));
    }

    #[test]
    fn test_barrier_absorbs_shot() {
        let mut w = world();
        let barrier = add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO);
        w.add(Entity::new(EntityKind::PlayerShot, Vec3::new(0.0, 0.0, 450.0), Vec3::ZERO).unwrap());
        let events = run(&mut w, 1);
        assert!(events.is_empty());
        assert_eq!(w.len(), 1);
        assert!(w.get(barrier).unwrap().is_normal());
    }

    #[test]
    fn test_cruiser_shoots_at_player() {
        let mut w = world();
        ready_player(&mut w, 1000.0);
        add_ready(&mut w, EntityKind::Cruiser, Vec3::new(0.0, 0.0, 6000.0), Vec3::ZERO);
        let events = run(&mut w, 1);
        assert_eq!(events, vec![GameEvent::EnemyShotFired]);
        let (_, shot) = w.iter().find(|(_, e)| e.kind == EntityKind::EnemyShot).unwrap();
        assert!(shot.vel.z < 0.0);
    }

    #[test]
    fn test_depth_sort_far_to_near() {
        let mut w = world();
        let zs = [5000.0, 100.0, 64000.0, 30000.0, 10.0];
        let handles: Vec<Handle> = zs
            .iter()
            .map(|&z| add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, z), Vec3::ZERO))
            .collect();

        let order: Vec<Handle> = w
            .depth_sort_for_draw(0.0, NEAR_PLANE, FAR_PLANE)
            .into_iter()
            .map(|item| item.handle)
            .collect();
        // z = 10 is inside the near plane
        assert_eq!(order, vec![handles[2], handles[3], handles[0], handles[1]]);
    }

    #[test]
    fn test_depth_sort_wraps_and_keeps_insertion_order() {
        let mut w = world();
        let a = add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 2000.0), Vec3::ZERO);
        let b = add_ready(&mut w, EntityKind::Cruiser, Vec3::new(0.0, 0.0, 2000.0), Vec3::ZERO);
        let c = add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO);

        let items = w.depth_sort_for_draw(64000.0, NEAR_PLANE, FAR_PLANE);
        let order: Vec<Handle> = items.iter().map(|i| i.handle).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(items[0].depth, 3000.0);
        assert_eq!(items[2].depth, 1500.0);
    }

    #[test]
    fn test_custom_tunnel_wraps_spawns() {
        let tunnel = Tunnel {
            length: 3000.0,
            ..Tunnel::default()
        };
        let mut w = World::with_tunnel(tunnel, 9, Box::new(NullAudio));
        let h = w
            .spawn(SpawnRequest {
                kind: EntityKind::Drone,
                pos: Vec3::new(0.0, 0.0, -10.0),
                vel: Vec3::ZERO,
            })
            .unwrap();
        assert_eq!(w.get(h).unwrap().pos.z, 2990.0);

        let far = w.add(
            Entity::new(EntityKind::Barrier, Vec3::new(0.0, 0.0, 7100.0), Vec3::ZERO).unwrap(),
        );
        assert_eq!(w.get(far).unwrap().pos.z, 1100.0);
    }

    #[test]
    fn test_shot_hits_drone_at_coarse_frame_rates() {
        // The drone sits where a shot fired at 30 fps would jump over the
        // combined depth slab between two frames
        for dt in [REFERENCE_DT, 1.0 / 30.0, 1.0 / 20.0] {
            let mut w = world();
            ready_player(&mut w, 1000.0);
            let drone = add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 1600.0), Vec3::ZERO);

            let fire = TickInput {
                fire: true,
                ..Default::default()
            };
            let mut events = w.frame(dt, &fire);
            for _ in 0..10 {
                events.extend(w.frame(dt, &TickInput::default()));
            }

            assert!(
                events.contains(&GameEvent::Destroyed {
                    kind: EntityKind::Drone,
                    points: 100
                }),
                "dt {dt}: {events:?}"
            );
            assert_eq!(w.score(), 100);
            assert!(w.get(drone).is_none_or(|e| e.is_exploding()));
        }
    }

    #[test]
    fn test_frame_clamps_long_dt() {
        let mut w = world();
        let h = add_ready(
            &mut w,
            EntityKind::Drone,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        );
        w.update(10.0);
        let expected = 10.0 * MAX_FRAME_DT / REFERENCE_DT;
        assert!((w.get(h).unwrap().pos.z - expected).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_depth_wrapped_after_update(
            zs in proptest::collection::vec(0.0f32..TUNNEL_LENGTH, 1..8),
            vz in -3000.0f32..3000.0,
            dt in 0.0f32..0.2,
        ) {
            let mut w = world();
            for z in zs {
                add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, z), Vec3::new(0.0, 0.0, vz));
            }
            for _ in 0..3 {
                w.update(dt);
                for (_, e) in w.iter() {
                    prop_assert!(e.pos.z >= 0.0 && e.pos.z < TUNNEL_LENGTH);
                }
            }
        }
    }
}
