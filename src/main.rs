//! Manic Episode headless demo
//!
//! Usage: `manic-episode [settings.json] [frame.ppm]`
//!
//! Spawns a demo wave, flies the player through it with scripted input,
//! logs what happens and optionally writes the last frame as an anaglyph.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use glam::{Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use manic_episode::Settings;
    use manic_episode::audio::LogAudio;
    use manic_episode::consts::*;
    use manic_episode::renderer::StereoRenderer;
    use manic_episode::sim::{EntityKind, GameEvent, SpawnRequest, TickInput, World};

    const SEED: u64 = 0x5eed;
    const DEMO_FRAMES: u32 = 900;

    /// A handful of drones, two cruisers and a barrier ahead of the start
    fn demo_wave(rng: &mut Pcg32) -> Vec<SpawnRequest> {
        let mut wave = Vec::new();
        for i in 0..8 {
            wave.push(SpawnRequest {
                kind: EntityKind::Drone,
                pos: Vec3::new(
                    rng.random_range(-1000.0..1000.0),
                    rng.random_range(-800.0..800.0),
                    3000.0 + i as f32 * 2500.0,
                ),
                vel: Vec3::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0), 0.0),
            });
        }
        for z in [12000.0, 30000.0] {
            wave.push(SpawnRequest {
                kind: EntityKind::Cruiser,
                pos: Vec3::new(0.0, rng.random_range(-500.0..500.0), z),
                vel: Vec3::new(15.0, 0.0, -5.0),
            });
        }
        wave.push(SpawnRequest {
            kind: EntityKind::Barrier,
            pos: Vec3::new(0.0, -900.0, 20000.0),
            vel: Vec3::ZERO,
        });
        wave
    }

    /// Weave across the tunnel while firing
    fn scripted_input(frame: u32) -> TickInput {
        let t = frame as f32 * REFERENCE_DT;
        TickInput {
            aim: Vec2::new((t * 0.7).sin() * 0.6, (t * 1.1).cos() * 0.4),
            forward: frame < 240,
            backward: false,
            fire: frame % 3 == 0,
        }
    }

    /// Place the player at the tunnel start and spawn the demo wave ahead
    fn populate(world: &mut World, seed: u64) -> Result<()> {
        world.spawn_player(Vec3::ZERO).context("spawning player")?;
        let mut rng = Pcg32::seed_from_u64(seed);
        for request in demo_wave(&mut rng) {
            let kind = request.kind;
            world
                .spawn(request)
                .with_context(|| format!("spawning {}", kind.as_str()))?;
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        let output = args.next();

        let mut world = World::new(SEED, Box::new(LogAudio::from_settings(&settings)));
        populate(&mut world, SEED)?;

        let mut kills = 0;
        for frame in 0..DEMO_FRAMES {
            for event in world.frame(REFERENCE_DT, &scripted_input(frame)) {
                match event {
                    GameEvent::Destroyed { kind, points } => {
                        kills += 1;
                        log::info!("frame {frame}: {} destroyed (+{points})", kind.as_str());
                    }
                    GameEvent::DamageTaken { shields_left } => {
                        log::info!("frame {frame}: hit, {shields_left} shields left");
                    }
                    GameEvent::PlayerLost => {
                        log::info!("frame {frame}: player lost");
                    }
                    _ => log::debug!("frame {frame}: {event:?}"),
                }
            }
            if world.player().is_none() {
                break;
            }
        }
        log::info!(
            "score {} after {} frames, {kills} kills, {} entities left",
            world.score(),
            world.time_ticks(),
            world.len()
        );

        let mut renderer = StereoRenderer::new(&settings);
        let frame = renderer.render(&world);
        if let Some(path) = output {
            frame
                .save_ppm(&path)
                .with_context(|| format!("writing {path}"))?;
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Manic Episode (headless) starting...");
    if let Err(e) = native::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
