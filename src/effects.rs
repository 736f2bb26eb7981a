//! Decorative animation: cursor trail, click ripple, and the results screen
//! backdrop. Timing is expressed in frames of a nominal 60 Hz loop so the
//! animation speed does not depend on the actual repaint rate.

use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const FRAME_RATE: f32 = 60.0;
pub const MAX_TRAIL_LENGTH: usize = 15;
pub const RIPPLE_DURATION: Duration = Duration::from_secs(1);
/// Length of one results ripple cycle, in frames.
pub const WAVE_PERIOD: f32 = 100.0;
/// Seed of the results particle field. Gameplay randomness never uses it.
pub const PARTICLE_SEED: u64 = 300;
pub const PARTICLE_COUNT: usize = 50;

pub fn frames_since(start: Instant, now: Instant) -> f32 {
    now.saturating_duration_since(start).as_secs_f32() * FRAME_RATE
}

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha.clamp(0.0, 255.0) as u8)
}

#[derive(Debug, Default)]
pub struct CursorTrail {
    points: VecDeque<Pos2>,
}

impl CursorTrail {
    pub fn push(&mut self, p: Pos2) {
        self.points.push_back(p);
        while self.points.len() > MAX_TRAIL_LENGTH {
            self.points.pop_front();
        }
    }

    pub fn paint(&self, painter: &Painter, hovering: bool) {
        let last = self.points.len().saturating_sub(1).max(1) as f32;
        for (i, p) in self.points.iter().enumerate() {
            let alpha = i as f32 / last * 150.0;
            let mut size = 15.0 - i as f32 * 0.8;
            let color = if hovering {
                size *= 1.2;
                with_alpha(Color32::from_rgb(255, 100, 150), alpha + 50.0)
            } else {
                with_alpha(Color32::from_rgb(100, 150, 255), alpha)
            };
            painter.circle_filled(*p, size / 2.0, color);
        }
    }
}

/// Ring that closes in on the pointer after an answer is picked.
#[derive(Debug, Clone, Copy)]
pub struct ClickRipple {
    origin: Pos2,
    started: Instant,
}

impl ClickRipple {
    pub fn new(origin: Pos2, started: Instant) -> Self {
        Self { origin, started }
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= RIPPLE_DURATION
    }

    /// Fraction of the ripple still to play, 1.0 at the click and 0.0 at the end.
    fn remaining(&self, now: Instant) -> f32 {
        let t = now.saturating_duration_since(self.started).as_secs_f32()
            / RIPPLE_DURATION.as_secs_f32();
        (1.0 - t).clamp(0.0, 1.0)
    }

    pub fn paint(&self, painter: &Painter, canvas: Rect, pointer: Option<Pos2>, now: Instant) {
        let remaining = self.remaining(now);
        let alpha = 200.0 * (1.0 - remaining);
        let diameter = 50.0 + (canvas.width() * 0.8 - 50.0) * remaining;
        let center = pointer.unwrap_or(self.origin);
        painter.circle_stroke(
            center,
            diameter / 2.0,
            Stroke::new(10.0, with_alpha(Color32::from_rgb(0, 200, 255), alpha)),
        );
    }
}

/// Looping ring that expands from the centre of the results screen.
pub fn paint_results_wave(painter: &Painter, canvas: Rect, frames: f32) {
    let wave = (frames % WAVE_PERIOD) / WAVE_PERIOD;
    let radii = Vec2::new(canvas.width(), canvas.height()) * wave * 1.5 / 2.0;
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return;
    }
    let stroke = Stroke::new(
        15.0 * (1.0 - wave),
        with_alpha(Color32::WHITE, 255.0 - wave * 255.0),
    );
    let center = canvas.center();
    let points = (0..64)
        .map(|i| {
            let a = i as f32 / 64.0 * TAU;
            center + Vec2::new(a.cos() * radii.x, a.sin() * radii.y)
        })
        .collect();
    painter.add(Shape::closed_line(points, stroke));
}

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    /// Position as a fraction of the canvas size.
    x: f32,
    y: f32,
    alpha: f32,
}

/// Fixed scatter of twinkling dots. The same seed always gives the same field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(0.0..1.0),
                alpha: rng.gen_range(100.0..255.0),
            })
            .collect();
        Self { particles }
    }

    pub fn paint(&self, painter: &Painter, canvas: Rect, color: Color32, frames: f32) {
        for (i, p) in self.particles.iter().enumerate() {
            let flicker = (frames * 0.1 + i as f32).sin() * 0.5 + 0.5;
            let size = 5.0 + flicker * 5.0;
            let pos = canvas.min + Vec2::new(p.x * canvas.width(), p.y * canvas.height());
            painter.circle_filled(pos, size / 2.0, with_alpha(color, p.alpha * flicker));
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(PARTICLE_SEED, PARTICLE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn trail_keeps_the_newest_points() {
        let mut trail = CursorTrail::default();
        for i in 0..40 {
            trail.push(pos2(i as f32, 0.0));
        }
        assert_eq!(trail.points.len(), MAX_TRAIL_LENGTH);
        assert_eq!(trail.points.front(), Some(&pos2(25.0, 0.0)));
        assert_eq!(trail.points.back(), Some(&pos2(39.0, 0.0)));
    }

    #[test]
    fn ripple_runs_for_its_duration() {
        let start = Instant::now();
        let ripple = ClickRipple::new(pos2(10.0, 10.0), start);
        assert!(!ripple.is_done(start));
        assert_eq!(ripple.remaining(start), 1.0);
        assert!(ripple.is_done(start + RIPPLE_DURATION));
        assert_eq!(ripple.remaining(start + RIPPLE_DURATION * 2), 0.0);
    }

    #[test]
    fn particle_field_is_reproducible() {
        let a = ParticleField::default();
        let b = ParticleField::new(PARTICLE_SEED, PARTICLE_COUNT);
        assert_eq!(a, b);
        assert_eq!(a.particles.len(), PARTICLE_COUNT);
        assert_ne!(a, ParticleField::new(PARTICLE_SEED + 1, PARTICLE_COUNT));
        assert!(a
            .particles
            .iter()
            .all(|p| (0.0..1.0).contains(&p.x) && (100.0..255.0).contains(&p.alpha)));
    }

    #[test]
    fn frames_track_wall_time() {
        let start = Instant::now();
        assert_eq!(frames_since(start, start + Duration::from_secs(5)), 300.0);
        assert_eq!(frames_since(start + Duration::from_secs(1), start), 0.0);
    }
}
