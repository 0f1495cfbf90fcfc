//! Cosmetic particles
//!
//! Particles never affect gameplay. They still draw from the flight RNG so a
//! seeded run replays identically.

use glam::Vec2;
use rand::Rng;

use crate::math::{Angle, Vec2Ext};
use crate::renderer::Color;

/// Speed range of burst particles (px/s)
const BURST_SPEED: (f32, f32) = (100.0, 200.0);
/// Particles tumble at up to this rate (degrees/s)
const MAX_TUMBLE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: Angle,
    pub rotation_speed: Angle,
    /// Seconds left to live
    pub time_to_destroy: f32,
    /// Glyph size
    pub size: f32,
    pub color: Color,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, size: f32, color: Color, lifetime: f32, rng: &mut impl Rng) -> Self {
        Self {
            position,
            velocity,
            rotation: velocity.angle() + Angle::from_degrees(90.0),
            rotation_speed: Angle::from_degrees(rng.random_range(-MAX_TUMBLE..=MAX_TUMBLE)),
            time_to_destroy: lifetime,
            size,
            color,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * dt;
        self.time_to_destroy -= dt;
    }

    pub fn is_destroyed(&self) -> bool {
        self.time_to_destroy <= 0.0
    }
}

/// Parameters of a particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub position: Vec2,
    /// Velocity every particle inherits
    pub velocity: Vec2,
    pub color: Color,
    pub particle_size: f32,
    pub count: usize,
    pub lifetime: (f32, f32),
    /// Directions are drawn from this angle range
    pub spread: (Angle, Angle),
}

impl Explosion {
    /// A full-circle burst; adjust with the builder methods
    pub fn new(position: Vec2, velocity: Vec2, color: Color) -> Self {
        Self {
            position,
            velocity,
            color,
            particle_size: 24.0,
            count: 1,
            lifetime: (0.2, 0.4),
            spread: (Angle::ZERO, Angle::from_degrees(360.0)),
        }
    }

    pub fn particles(mut self, count: usize, size: f32) -> Self {
        self.count = count;
        self.particle_size = size;
        self
    }

    pub fn lasting(mut self, min: f32, max: f32) -> Self {
        self.lifetime = (min, max);
        self
    }

    /// Restrict directions to a cone around `center`
    pub fn cone(mut self, center: Angle, half_width: Angle) -> Self {
        self.spread = (center - half_width, center + half_width);
        self
    }

    pub fn spawn(&self, rng: &mut impl Rng) -> Vec<Particle> {
        (0..self.count)
            .map(|_| {
                let (min, max) = self.spread;
                let direction = Angle::from_radians(rng.random_range(min.radians()..=max.radians())).direction();
                let speed = rng.random_range(BURST_SPEED.0..=BURST_SPEED.1);
                let lifetime = rng.random_range(self.lifetime.0..=self.lifetime.1);
                Particle::new(
                    self.position,
                    self.velocity + direction * speed,
                    self.particle_size,
                    self.color,
                    lifetime,
                    rng,
                )
            })
            .collect()
    }
}
