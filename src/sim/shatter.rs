//! Grid-subdivision shatter animation
//!
//! An entity's bounding rectangle is cut into a 5x5 grid. Each column and
//! each row (a "lane") carries an accumulated offset. One animation step
//! walks outward from the hit lane along both axes, adding an increment to
//! each lane that doubles with every lane of distance (1x, 2x, 4x, 8x), so
//! fragments fly apart exponentially.
//!
//! Exploding and forming are the same recurrence:
//! - Explosion: offsets start at zero, positive increment, hit lane is the
//!   lane containing the impact point.
//! - Formation: offsets start at the spread an explosion from the center
//!   lane would reach after `last_step` steps, negative increment, so every
//!   lane converges back to zero on the final step.

use glam::Vec2;

use super::shape::Rect;
use crate::consts::{SHATTER_LANES, SHATTER_STEP_SIZE};

/// Number of grid lines per axis
pub const GRID_LINES: usize = SHATTER_LANES + 1;

/// Lane used as the origin for formation
pub const CENTER_LANE: usize = SHATTER_LANES / 2;

/// State of one shatter animation
#[derive(Debug, Clone, PartialEq)]
pub struct Shatter {
    lines_x: [i32; GRID_LINES],
    lines_y: [i32; GRID_LINES],
    offsets_x: [i32; SHATTER_LANES],
    offsets_y: [i32; SHATTER_LANES],
    hit_x: usize,
    hit_y: usize,
    increment: i32,
    step: u32,
    last_step: u32,
    /// Steps per reference frame
    speed: f32,
    /// Fractional steps not yet applied
    accumulator: f32,
}

/// Integer grid lines spanning `[-half, half]`, non-decreasing
pub fn grid_lines(half: f32) -> [i32; GRID_LINES] {
    let lo = (-half).round() as i32;
    let hi = half.round() as i32;
    let span = (hi - lo) as f32;
    std::array::from_fn(|i| lo + (span * i as f32 / SHATTER_LANES as f32).round() as i32)
}

/// Lane (0..5) containing a local coordinate. Points outside the grid
/// clamp to the outer lanes.
pub fn lane_of(lines: &[i32; GRID_LINES], p: f32) -> usize {
    (1..SHATTER_LANES)
        .rev()
        .find(|&i| p >= lines[i] as f32)
        .unwrap_or(0)
}

/// Offsets reached after `steps` applications of the recurrence from zero,
/// with the given hit lane and increment
pub fn spread(hit: usize, steps: u32, increment: i32) -> [i32; SHATTER_LANES] {
    let mut offsets = [0; SHATTER_LANES];
    let steps = steps as i32;
    for (lane, offset) in offsets.iter_mut().enumerate() {
        if lane > hit {
            *offset = steps * increment * (1 << (lane - hit - 1));
        } else if lane < hit {
            *offset = -steps * increment * (1 << (hit - lane - 1));
        }
    }
    offsets
}

/// One application of the recurrence along one axis
fn step_axis(offsets: &mut [i32; SHATTER_LANES], hit: usize, increment: i32) {
    let mut delta = increment;
    for offset in offsets.iter_mut().skip(hit + 1) {
        *offset += delta;
        delta *= 2;
    }

    let mut delta = increment;
    for offset in offsets[..hit].iter_mut().rev() {
        *offset -= delta;
        delta *= 2;
    }
}

impl Shatter {
    /// Outward shatter from an impact point given in entity-local coordinates
    pub fn explode(half: Vec2, impact: Vec2, last_step: u32, speed: f32) -> Self {
        let lines_x = grid_lines(half.x);
        let lines_y = grid_lines(half.y);
        Self {
            hit_x: lane_of(&lines_x, impact.x),
            hit_y: lane_of(&lines_y, impact.y),
            lines_x,
            lines_y,
            offsets_x: [0; SHATTER_LANES],
            offsets_y: [0; SHATTER_LANES],
            increment: SHATTER_STEP_SIZE,
            step: 0,
            last_step,
            speed,
            accumulator: 0.0,
        }
    }

    /// Inward assembly converging on the center lane
    pub fn form(half: Vec2, last_step: u32, speed: f32) -> Self {
        let preset = spread(CENTER_LANE, last_step, SHATTER_STEP_SIZE);
        Self {
            lines_x: grid_lines(half.x),
            lines_y: grid_lines(half.y),
            offsets_x: preset,
            offsets_y: preset,
            hit_x: CENTER_LANE,
            hit_y: CENTER_LANE,
            increment: -SHATTER_STEP_SIZE,
            step: 0,
            last_step,
            speed,
            accumulator: 0.0,
        }
    }

    /// Apply a single step. No-op once finished.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        step_axis(&mut self.offsets_x, self.hit_x, self.increment);
        step_axis(&mut self.offsets_y, self.hit_y, self.increment);
        self.step += 1;
    }

    /// Advance by `scale` reference frames. Whole steps are applied as the
    /// accumulator fills, so the visible rate does not depend on frame rate.
    /// Returns true once the animation has finished.
    pub fn advance(&mut self, scale: f32) -> bool {
        self.accumulator += self.speed * scale;
        while self.accumulator >= 1.0 && !self.is_finished() {
            self.step();
            self.accumulator -= 1.0;
        }
        self.is_finished()
    }

    /// Run the recurrence backwards from the current offsets
    pub fn reverse(&mut self) {
        self.increment = -self.increment;
        self.step = 0;
        self.accumulator = 0.0;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.step >= self.last_step
    }

    /// Completed fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.last_step == 0 {
            1.0
        } else {
            self.step as f32 / self.last_step as f32
        }
    }

    /// True when the recurrence runs outward
    pub fn is_diverging(&self) -> bool {
        self.increment > 0
    }

    pub fn hit_lanes(&self) -> (usize, usize) {
        (self.hit_x, self.hit_y)
    }

    pub fn offsets(&self) -> (&[i32; SHATTER_LANES], &[i32; SHATTER_LANES]) {
        (&self.offsets_x, &self.offsets_y)
    }

    /// Span of lane `i` on one axis; the outer lanes are open-ended
    fn lane_span(lines: &[i32; GRID_LINES], i: usize) -> (f32, f32) {
        let lo = if i == 0 { f32::NEG_INFINITY } else { lines[i] as f32 };
        let hi = if i == SHATTER_LANES - 1 {
            f32::INFINITY
        } else {
            lines[i + 1] as f32
        };
        (lo, hi)
    }

    /// Cut `rect` by the grid and push each piece, displaced by its lane
    /// offsets, onto `out`
    pub fn fragments(&self, rect: &Rect, out: &mut Vec<Rect>) {
        for i in 0..SHATTER_LANES {
            let (x0, x1) = Self::lane_span(&self.lines_x, i);
            if rect.max.x <= x0 || rect.min.x >= x1 {
                continue;
            }
            for j in 0..SHATTER_LANES {
                let (y0, y1) = Self::lane_span(&self.lines_y, j);
                let cell = Rect {
                    min: Vec2::new(x0, y0),
                    max: Vec2::new(x1, y1),
                };
                if let Some(piece) = rect.intersect(&cell) {
                    let shift = Vec2::new(self.offsets_x[i] as f32, self.offsets_y[j] as f32);
                    out.push(piece.translate(shift));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half() -> Vec2 {
        Vec2::new(100.0, 50.0)
    }

    #[test]
    fn test_grid_lines_ordered() {
        assert_eq!(grid_lines(100.0), [-100, -60, -20, 20, 60, 100]);
        let tiny = grid_lines(1.0);
        assert!(tiny.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_lane_of() {
        let lines = grid_lines(100.0);
        assert_eq!(lane_of(&lines, -100.0), 0);
        assert_eq!(lane_of(&lines, -500.0), 0);
        assert_eq!(lane_of(&lines, 0.0), 2);
        assert_eq!(lane_of(&lines, 60.0), 4);
        assert_eq!(lane_of(&lines, 59.9), 3);
        assert_eq!(lane_of(&lines, 500.0), 4);
    }

    #[test]
    fn test_explosion_doubles_outward() {
        // Impact in lane 1 on x, lane 2 on y
        let mut s = Shatter::explode(half(), Vec2::new(-50.0, 0.0), 10, 1.0);
        assert_eq!(s.hit_lanes(), (1, 2));
        s.step();
        let (ox, oy) = s.offsets();
        let inc = SHATTER_STEP_SIZE;
        assert_eq!(*ox, [-inc, 0, inc, 2 * inc, 4 * inc]);
        assert_eq!(*oy, [-2 * inc, -inc, 0, inc, 2 * inc]);

        s.step();
        let (ox, _) = s.offsets();
        assert_eq!(*ox, [-2 * inc, 0, 2 * inc, 4 * inc, 8 * inc]);
    }

    #[test]
    fn test_explosion_matches_spread() {
        let mut s = Shatter::explode(half(), Vec2::new(70.0, -40.0), 17, 1.0);
        for _ in 0..17 {
            s.step();
        }
        let (hx, hy) = s.hit_lanes();
        let (ox, oy) = s.offsets();
        assert_eq!(*ox, spread(hx, 17, SHATTER_STEP_SIZE));
        assert_eq!(*oy, spread(hy, 17, SHATTER_STEP_SIZE));
        assert!(s.is_finished());
    }

    #[test]
    fn test_formation_converges_to_zero() {
        let mut s = Shatter::form(half(), 32, 1.0);
        let (ox, _) = s.offsets();
        // Opposing offsets on the lanes either side of center
        assert!(ox[1] < 0 && ox[3] > 0);
        assert_eq!(ox[1], -ox[3]);
        for _ in 0..32 {
            s.step();
        }
        assert!(s.is_finished());
        assert_eq!(s.offsets(), (&[0; 5], &[0; 5]));
    }

    #[test]
    fn test_explode_then_reverse_round_trip() {
        for hit in [-90.0, -30.0, 0.0, 30.0, 90.0] {
            let mut s = Shatter::explode(half(), Vec2::new(hit, hit / 2.0), 25, 1.0);
            for _ in 0..25 {
                s.step();
            }
            assert_ne!(s.offsets().0, &[0; 5]);
            s.reverse();
            assert!(!s.is_diverging());
            for _ in 0..25 {
                s.step();
            }
            assert_eq!(s.offsets(), (&[0; 5], &[0; 5]), "hit at {hit}");
        }
    }

    #[test]
    fn test_center_explosion_reaches_formation_preset() {
        let mut exploding = Shatter::explode(half(), Vec2::ZERO, 32, 1.0);
        for _ in 0..32 {
            exploding.step();
        }
        let forming = Shatter::form(half(), 32, 1.0);
        assert_eq!(exploding.offsets(), forming.offsets());
    }

    #[test]
    fn test_advance_is_frame_rate_independent() {
        let mut coarse = Shatter::explode(half(), Vec2::ZERO, 40, 0.5);
        let mut fine = coarse.clone();

        // 10 reference frames in one go vs 40 quarter frames
        coarse.advance(10.0);
        for _ in 0..40 {
            fine.advance(0.25);
        }
        assert_eq!(coarse.offsets(), fine.offsets());
        assert_eq!(coarse.progress(), 5.0 / 40.0);
    }

    #[test]
    fn test_advance_stops_at_last_step() {
        let mut s = Shatter::explode(half(), Vec2::ZERO, 5, 1.0);
        assert!(s.advance(100.0));
        assert_eq!(s.progress(), 1.0);
        let before = *s.offsets().0;
        s.step();
        assert_eq!(*s.offsets().0, before);
    }

    #[test]
    fn test_fragments_split_straddling_rect() {
        let s = Shatter::explode(half(), Vec2::ZERO, 10, 1.0);
        let mut out = Vec::new();
        // Spans x lanes 1..=3 (lines at -60,-20,20,60) and y lane 2 only
        s.fragments(&Rect::new(-50.0, -5.0, 50.0, 5.0), &mut out);
        assert_eq!(out.len(), 3);
        let area: f32 = out
            .iter()
            .map(|r| (r.max.x - r.min.x) * (r.max.y - r.min.y))
            .sum();
        assert!((area - 100.0 * 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_fragments_follow_offsets() {
        let mut s = Shatter::explode(half(), Vec2::ZERO, 10, 1.0);
        s.step();
        let mut out = Vec::new();
        s.fragments(&Rect::new(70.0, -5.0, 90.0, 5.0), &mut out);
        assert_eq!(out.len(), 1);
        // Lane 4 is two lanes right of center: 2x increment
        let dx = 2.0 * SHATTER_STEP_SIZE as f32;
        assert_eq!(out[0], Rect::new(70.0 + dx, -5.0, 90.0 + dx, 5.0));
    }
}
