//! Asteroids: rigid bodies built from a cellular shape
//!
//! An asteroid owns its shape and kinematic state. Damage only ever lowers
//! `health`; the grid itself changes solely when the rock is split into
//! brand-new asteroids.

use glam::Vec2;
use rand::Rng;

use super::particle::{Explosion, Particle};
use super::projectile::Projectile;
use super::shape::{AsteroidShape, CellKind, ShapeContact};
use crate::consts::{DESTROYED_HEALTH, HIT_FLASH_DURATION};
use crate::math::{Angle, Rect, Transform2D, Vec2Ext, Winding, map_range};
use crate::renderer::Color;
use crate::renderer::shapes::hit_flash_color;
use crate::tuning::Tuning;

/// Difficulty above which health and ore payout step up
pub const DIFFICULTY_TIERS: [f32; 2] = [0.3, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidKind {
    /// Shootable rock
    Normal,
    /// Free-floating ore, collected by touching it
    Resource,
    /// Scenery; never collides with anything
    Background,
}

/// Something an asteroid is pulled toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractionTarget {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Inside this radius only the velocity term acts
    pub radius: f32,
    /// Pull fades to zero this far beyond `radius`
    pub distance: f32,
    pub force: f32,
    pub velocity_force: f32,
}

/// Where a projectile struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpact {
    pub point: Vec2,
    /// From the asteroid center toward the impact (zero if they coincide)
    pub normal: Vec2,
}

/// New entities created by destroying an asteroid
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub id: u32,
    pub kind: AsteroidKind,
    pub shape: AsteroidShape,
    /// 0.0 plain rock, 1.0 richest ore
    pub difficulty: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: Angle,
    pub rotation_speed: Angle,
    /// Spin the asteroid eases back to after being knocked
    pub base_rotation_speed: Angle,
    pub scale: f32,
    pub health: f32,
    pub time_since_hit: f32,
    /// Direction of the last projectile that hit
    pub hit_axis: Option<Vec2>,
}

impl Asteroid {
    pub fn new(kind: AsteroidKind, shape: AsteroidShape, difficulty: f32, tuning: &Tuning) -> Self {
        let mut health = tuning.asteroid_health;
        for tier in DIFFICULTY_TIERS {
            if difficulty > tier {
                health *= tuning.asteroid_tier_health_multiplier;
            }
        }
        Self {
            id: 0,
            kind,
            shape,
            difficulty,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: Angle::ZERO,
            rotation_speed: Angle::ZERO,
            base_rotation_speed: Angle::ZERO,
            scale: if kind == AsteroidKind::Background {
                tuning.background_scale
            } else {
                1.0
            },
            health,
            time_since_hit: 1000.0,
            hit_axis: None,
        }
    }

    /// Place the asteroid and set it moving
    pub fn set_motion(
        &mut self,
        position: Vec2,
        rotation: Angle,
        base_rotation_speed: Angle,
        rotation_speed: Angle,
        velocity: Vec2,
    ) {
        self.position = position;
        self.rotation = rotation;
        self.base_rotation_speed = base_rotation_speed;
        self.rotation_speed = rotation_speed;
        self.velocity = velocity;
    }

    pub fn transform(&self) -> Transform2D {
        Transform2D::new(self.position, self.rotation, Vec2::splat(self.scale))
    }

    /// Containing radius in world units
    pub fn radius(&self) -> f32 {
        self.shape.containing_radius() * self.scale
    }

    pub fn base_color(&self) -> Color {
        match self.kind {
            AsteroidKind::Background => Color::BACKGROUND_ROCK,
            _ => Color::lerp(Color::GREY, Color::ROCK_BLUE, self.difficulty),
        }
    }

    /// Base color, flashing red right after a hit
    pub fn color(&self) -> Color {
        hit_flash_color(self.base_color(), self.time_since_hit, HIT_FLASH_DURATION)
    }

    /// Ore paid out when this asteroid is picked up
    pub fn ore_value(&self) -> u64 {
        if self.difficulty > DIFFICULTY_TIERS[1] {
            100
        } else if self.difficulty > DIFFICULTY_TIERS[0] {
            10
        } else {
            1
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        let spin_error = self.rotation_speed.looping_delta(self.base_rotation_speed, None).abs();
        self.rotation_speed = self.rotation_speed.looping_move_towards(
            self.base_rotation_speed,
            spin_error * tuning.asteroid_spin_recovery * dt,
            None,
        );
        self.rotation += self.rotation_speed * dt;
        self.position += self.velocity * dt;
        self.time_since_hit += dt;

        if self.kind == AsteroidKind::Resource {
            let damping = (1.0 - dt * tuning.resource_drag).max(0.0);
            self.velocity *= damping;
            self.rotation_speed *= damping;
        }
    }

    /// Pull a resource toward `target`; other kinds ignore attraction
    pub fn apply_attraction(&mut self, target: &AttractionTarget, dt: f32) {
        if self.kind != AsteroidKind::Resource {
            return;
        }
        let (direction, distance) = (target.position - self.position)
            .direction_and_length()
            .unwrap_or((Vec2::ZERO, 0.0));
        if distance > target.radius + target.distance {
            return;
        }

        if distance > target.radius {
            let amount = map_range(distance, target.radius, target.radius + target.distance, 1.0, 0.0);
            self.velocity += direction * (amount * target.force * dt);
        }

        if target.velocity_force > 0.0 {
            let target_direction = target.velocity.direction().unwrap_or(Vec2::ZERO);
            let closing = (target.velocity - self.velocity).dot(direction).max(0.0);
            self.velocity += target_direction * (closing * target.velocity_force * dt);
        }
    }

    /// Teleport to the opposite edge once fully outside `bounds`
    ///
    /// Each axis wraps independently. Returns whether anything moved.
    pub fn wrap_around(&mut self, bounds: &Rect) -> bool {
        let outset = bounds.outset(self.radius());
        let mut wrapped = false;
        if self.position.x < outset.min.x {
            self.position.x = outset.max.x;
            wrapped = true;
        } else if self.position.x > outset.max.x {
            self.position.x = outset.min.x;
            wrapped = true;
        }
        if self.position.y < outset.min.y {
            self.position.y = outset.max.y;
            wrapped = true;
        } else if self.position.y > outset.max.y {
            self.position.y = outset.min.y;
            wrapped = true;
        }
        wrapped
    }

    /// Velocity contributed by spin at a world-space point (ω × r)
    pub fn rotation_velocity_at(&self, point: Vec2) -> Vec2 {
        let offset = point - self.position;
        let tangent = offset.direction().unwrap_or(Vec2::ZERO).turned_90(Winding::Positive);
        tangent * (self.rotation_speed.radians() * offset.length())
    }

    /// Contact point and normal are already in world space
    pub fn circle_intersection(&self, center: Vec2, radius: f32) -> Option<ShapeContact> {
        self.shape.circle_intersection(center, radius, &self.transform())
    }

    /// Swept hit test against a projectile; applies the hit on contact
    pub fn handle_projectile(&mut self, projectile: &Projectile, tuning: &Tuning) -> Option<ProjectileImpact> {
        if self.kind != AsteroidKind::Normal {
            return None;
        }
        let (start, end) = projectile.swept_segment(tuning.projectile_lookahead);
        let enter = self.shape.segment_intersection(start, end, &self.transform())?;

        let point = start.lerp(end, enter);
        let from_center = point - self.position;
        let direction = projectile.direction().unwrap_or(Vec2::ZERO);
        self.rotation_speed += Angle::from_radians(from_center.cross(direction) * tuning.asteroid_hit_spin);
        self.velocity += direction * tuning.asteroid_hit_push;
        self.time_since_hit = 0.0;
        self.health -= projectile.damage;
        self.hit_axis = projectile.direction();

        Some(ProjectileImpact {
            point,
            normal: from_center.direction().unwrap_or(Vec2::ZERO),
        })
    }

    pub fn destroy(&mut self) {
        self.health = 0.0;
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= DESTROYED_HEALTH
    }

    /// Break the asteroid in two along its last hit axis
    ///
    /// Each half sheds detached and loose resources as pickups; halves too
    /// thin to fly shatter into pickups only. `ore_drop_level` is the
    /// SometimesMoreOreDrops upgrade level.
    pub fn split_along_hit_axis(&self, rng: &mut impl Rng, tuning: &Tuning, ore_drop_level: u32) -> SplitOutcome {
        let mut outcome = SplitOutcome {
            particles: Explosion::new(self.position, self.velocity, self.base_color())
                .particles(self.shape.rows(), 24.0)
                .lasting(0.2, 0.4)
                .spawn(rng),
            ..Default::default()
        };

        let axis = match self.hit_axis {
            Some(axis) => axis,
            None => Angle::from_degrees(rng.random_range(0.0..=360.0)).direction(),
        };
        let split_speed = rng
            .random_range(tuning.split_speed[0]..=tuning.split_speed[1])
            .max(self.velocity.length() * rng.random_range(0.5..=1.0));
        let split_spin = Angle::from_degrees(rng.random_range(tuning.split_spin[0]..=tuning.split_spin[1]));

        let halves = self.shape.split_along(Vec2::ZERO, axis.rotated_by(-self.rotation));
        for (i, (half, half_offset)) in halves.into_iter().enumerate() {
            let fragment = half.settle_fragment(half_offset);

            for &local in &fragment.resource_offsets {
                let drops = if rng.random::<f32>() < ore_drop_level as f32 * 0.1 { 4 } else { 1 };
                for _ in 0..drops {
                    outcome.asteroids.push(self.spawn_resource(local, rng, tuning));
                }
            }

            let Some(shape) = fragment.shape else {
                continue;
            };
            let offset = fragment.offset.rotated_by(self.rotation);
            let side = if i == 0 { 1.0 } else { -1.0 };
            let kick = axis.rotated_by(Angle::from_degrees(-90.0 * side)) * split_speed;
            let velocity = self.velocity * 0.5 + self.rotation_velocity_at(self.position + offset) + kick;

            let mut piece = Asteroid::new(AsteroidKind::Normal, shape, self.difficulty, tuning);
            piece.set_motion(
                self.position + offset,
                self.rotation,
                Angle::from_degrees(rng.random_range(-10.0..=10.0)),
                self.rotation_speed * 0.5 + split_spin * side,
                velocity,
            );
            outcome.asteroids.push(piece);
        }

        log::debug!(
            "asteroid {} split into {} pieces",
            self.id,
            outcome.asteroids.iter().filter(|a| a.kind == AsteroidKind::Normal).count()
        );
        outcome
    }

    /// A single ore cell freed from this asteroid at `local` (parent frame)
    fn spawn_resource(&self, local: Vec2, rng: &mut impl Rng, tuning: &Tuning) -> Asteroid {
        let position = self.position + local.rotated_by(self.rotation);
        let scatter = Angle::from_degrees(rng.random_range(0.0..=360.0)).direction()
            * rng.random_range(tuning.resource_scatter_speed[0]..=tuning.resource_scatter_speed[1]);
        let velocity = (self.velocity + self.rotation_velocity_at(position)) * 0.5 + scatter;

        let mut resource = Asteroid::new(
            AsteroidKind::Resource,
            AsteroidShape::single(CellKind::Resource),
            self.difficulty,
            tuning,
        );
        resource.set_motion(position, self.rotation, Angle::ZERO, self.rotation_speed, velocity);
        resource
    }
}
