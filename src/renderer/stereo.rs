//! Stereo renderer
//!
//! Walks the world far to near, projects every entity rectangle once per
//! eye and hands the results to a [`Canvas`]. The two eye images are merged
//! into a red/cyan anaglyph.

use glam::{Vec2, Vec3};

use super::framebuffer::{Framebuffer, Rgba, anaglyph};
use super::projection::{ProjectionParams, project};
use crate::consts::CAMERA_BACKOFF;
use crate::settings::Settings;
use crate::sim::{Entity, Rect, World};

/// Screen units from the center of the output to its left/right edge
pub const SCREEN_HALF_WIDTH: f32 = 100.0;

/// Viewpoint shared by both eyes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Trail the controlled entity by `CAMERA_BACKOFF`; sit at the origin
    /// when there is none
    pub fn follow(world: &World) -> Self {
        let position = world
            .player_entity()
            .map(|p| Vec3::new(p.pos.x, p.pos.y, world.tunnel().wrap(p.pos.z - CAMERA_BACKOFF)))
            .unwrap_or(Vec3::ZERO);
        Self { position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    Filled,
    Outlined,
}

/// One projected rectangle in screen units (origin at the center, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub center: Vec2,
    pub half: Vec2,
    pub shade: f32,
    pub style: DrawStyle,
}

/// Receiver of projected rectangles
pub trait Canvas {
    fn draw(&mut self, cmd: &DrawCommand);
}

impl Canvas for Framebuffer {
    fn draw(&mut self, cmd: &DrawCommand) {
        let scale = self.width() as f32 * 0.5 / SCREEN_HALF_WIDTH;
        let origin = Vec2::new(self.width() as f32 * 0.5, self.height() as f32 * 0.5);
        let to_px = |p: Vec2| Vec2::new(origin.x + p.x * scale, origin.y - p.y * scale);

        let a = to_px(cmd.center - cmd.half);
        let b = to_px(cmd.center + cmd.half);
        let (x0, x1) = (a.x.min(b.x).floor() as i32, a.x.max(b.x).ceil() as i32);
        let (y0, y1) = (a.y.min(b.y).floor() as i32, a.y.max(b.y).ceil() as i32);

        let color = Rgba::gray(cmd.shade);
        match cmd.style {
            DrawStyle::Filled => self.fill_rect(x0, y0, x1, y1, color),
            DrawStyle::Outlined => self.outline_rect(x0, y0, x1, y1, color),
        }
    }
}

/// Renders the world from a camera into one or two eye buffers
pub struct StereoRenderer {
    params: ProjectionParams,
    /// Half the eye separation; zero renders mono
    eye_offset: f32,
    fragments: bool,
    width: u32,
    height: u32,
    scratch: Vec<Rect>,
}

impl StereoRenderer {
    pub fn new(settings: &Settings) -> Self {
        let (width, height) = settings.framebuffer_size();
        let stereo = settings.stereo.enabled;
        Self {
            params: ProjectionParams {
                screen_plane: if stereo { settings.stereo.screen_plane } else { None },
                ..ProjectionParams::default()
            },
            eye_offset: if stereo {
                settings.stereo.eye_separation * 0.5
            } else {
                0.0
            },
            fragments: settings.quality.fragments_enabled(),
            width,
            height,
            scratch: Vec::new(),
        }
    }

    pub fn is_stereo(&self) -> bool {
        self.eye_offset != 0.0
    }

    /// Draw commands for one eye, far to near
    pub fn draw_list(&mut self, world: &World, camera: &Camera, eye_offset_x: f32) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let eye = camera.position;
        for item in world.depth_sort_for_draw(eye.z, self.params.near, self.params.far) {
            let Some(entity) = world.get(item.handle) else {
                continue;
            };
            self.push_entity(entity, eye, item.depth, eye_offset_x, &mut commands);
        }
        commands
    }

    fn push_entity(
        &mut self,
        entity: &Entity,
        eye: Vec3,
        depth: f32,
        eye_offset_x: f32,
        out: &mut Vec<DrawCommand>,
    ) {
        self.scratch.clear();
        if self.fragments {
            entity.visual_rects(&mut self.scratch);
        } else {
            self.scratch.extend_from_slice(entity.shape());
        }

        let style = if entity.kind.is_projectile() {
            DrawStyle::Outlined
        } else {
            DrawStyle::Filled
        };
        let shade = entity.draw_shade();
        // Unwrapped depth so the projection sees the periodic distance
        let z = eye.z + depth;

        for rect in &self.scratch {
            let min = entity.pos.truncate() + rect.min;
            let max = entity.pos.truncate() + rect.max;
            let (Some(a), Some(b)) = (
                project(min.extend(z), eye, eye_offset_x, &self.params),
                project(max.extend(z), eye, eye_offset_x, &self.params),
            ) else {
                return;
            };
            out.push(DrawCommand {
                center: (a + b) * 0.5,
                half: (b - a).abs() * 0.5,
                shade,
                style,
            });
        }
    }

    /// Issue one eye's commands to any canvas
    pub fn render_eye<C: Canvas>(&mut self, world: &World, camera: &Camera, eye_offset_x: f32, canvas: &mut C) {
        for cmd in self.draw_list(world, camera, eye_offset_x) {
            canvas.draw(&cmd);
        }
    }

    /// Render the world from behind the controlled entity. Produces an
    /// anaglyph in stereo mode, a plain gray image otherwise.
    pub fn render(&mut self, world: &World) -> Framebuffer {
        let camera = Camera::follow(world);
        let mut left = Framebuffer::new(self.width, self.height);
        left.clear(Rgba::BLACK);

        if !self.is_stereo() {
            self.render_eye(world, &camera, 0.0, &mut left);
            return left;
        }

        let mut right = left.clone();
        self.render_eye(world, &camera, -self.eye_offset, &mut left);
        self.render_eye(world, &camera, self.eye_offset, &mut right);
        anaglyph(&left, &right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::settings::QualityPreset;
    use crate::sim::{EntityKind, EntityState, Handle};

    fn world() -> World {
        World::new(3, Box::new(NullAudio))
    }

    fn add_ready(world: &mut World, kind: EntityKind, pos: Vec3) -> Handle {
        let h = world.add(Entity::new(kind, pos, Vec3::ZERO).unwrap());
        world.get_mut(h).unwrap().state = EntityState::Normal;
        h
    }

    fn mono() -> Settings {
        let mut s = Settings::default();
        s.stereo.enabled = false;
        s
    }

    #[test]
    fn test_camera_follows_player() {
        let mut w = world();
        assert_eq!(Camera::follow(&w).position, Vec3::ZERO);
        let p = add_ready(&mut w, EntityKind::Player, Vec3::new(100.0, -50.0, 200.0));
        w.set_player(p);
        let cam = Camera::follow(&w);
        assert_eq!(cam.position, Vec3::new(100.0, -50.0, 65000.0 - 400.0));
    }

    #[test]
    fn test_draw_list_far_to_near() {
        let mut w = world();
        add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 1000.0));
        add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 5000.0));
        let mut r = StereoRenderer::new(&mono());
        let cmds = r.draw_list(&w, &Camera::new(Vec3::ZERO), 0.0);
        assert_eq!(cmds.len(), 2);
        // Farther barrier is smaller and comes first
        assert!(cmds[0].half.x < cmds[1].half.x);
        assert_eq!(cmds[1].half, Vec2::new(400.0 * 50.0 / 1000.0, 100.0 * 50.0 / 1000.0));
        assert!(cmds.iter().all(|c| c.style == DrawStyle::Filled));
    }

    #[test]
    fn test_projectiles_are_outlined() {
        let mut w = world();
        w.add(Entity::new(EntityKind::PlayerShot, Vec3::new(0.0, 0.0, 800.0), Vec3::ZERO).unwrap());
        let mut r = StereoRenderer::new(&mono());
        let cmds = r.draw_list(&w, &Camera::new(Vec3::ZERO), 0.0);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].style, DrawStyle::Outlined);
    }

    #[test]
    fn test_exploding_draws_fragments() {
        let mut w = world();
        let h = add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 1000.0));
        w.get_mut(h).unwrap().destroy(Vec3::new(0.0, 0.0, 1000.0));
        w.update(crate::consts::REFERENCE_DT);

        let mut r = StereoRenderer::new(&mono());
        let cmds = r.draw_list(&w, &Camera::new(Vec3::ZERO), 0.0);
        assert_eq!(cmds.len(), 25);

        let mut low = StereoRenderer::new(&Settings {
            stereo: mono().stereo,
            ..Settings::from_preset(QualityPreset::Low)
        });
        assert_eq!(low.draw_list(&w, &Camera::new(Vec3::ZERO), 0.0).len(), 1);
    }

    #[test]
    fn test_out_of_range_entities_skipped() {
        let mut w = world();
        add_ready(&mut w, EntityKind::Drone, Vec3::new(0.0, 0.0, 10.0));
        let mut r = StereoRenderer::new(&mono());
        assert!(r.draw_list(&w, &Camera::new(Vec3::ZERO), 0.0).is_empty());
    }

    #[test]
    fn test_canvas_maps_screen_units() {
        let mut fb = Framebuffer::new(200, 100);
        fb.draw(&DrawCommand {
            center: Vec2::ZERO,
            half: Vec2::splat(2.0),
            shade: 1.0,
            style: DrawStyle::Filled,
        });
        assert_eq!(fb.pixel(100, 50), Some(Rgba::gray(1.0)));
        assert_eq!(fb.pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_render_mono_and_anaglyph() {
        let mut w = world();
        add_ready(&mut w, EntityKind::Barrier, Vec3::new(0.0, 0.0, 1000.0));

        let settings = Settings::default();
        let (width, height) = settings.framebuffer_size();
        let center = (width as i32 / 2, height as i32 / 2);

        let fb = StereoRenderer::new(&mono()).render(&w);
        assert_eq!((fb.width(), fb.height()), (width, height));
        assert_eq!(fb.pixel(center.0, center.1), Some(Rgba::gray(0.4)));

        let mut stereo = StereoRenderer::new(&settings);
        assert!(stereo.is_stereo());
        let fb = stereo.render(&w);
        let p = fb.pixel(center.0, center.1).unwrap();
        assert_eq!((p.r, p.g, p.b, p.a), (102, 102, 102, 255));
        assert_eq!(fb.pixel(0, 0), Some(Rgba::new(0, 0, 0, 255)));
    }
}
