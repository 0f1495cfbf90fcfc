//! The player's ship

use glam::Vec2;

use super::asteroid::{Asteroid, AsteroidKind};
use super::projectile::Projectile;
use crate::consts::{DESTROYED_HEALTH, HIT_FLASH_DURATION};
use crate::math::{Angle, Rect};
use crate::progression::{PlayerData, UpgradeType};
use crate::renderer::Color;
use crate::renderer::shapes::hit_flash_color;
use crate::tuning::Tuning;

/// Control intent for one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShipControls {
    /// -1.0 turns left, 1.0 turns right
    pub rotate: f32,
    /// 0.0 or 1.0
    pub thrust: f32,
}

/// Outcome of touching an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipContact {
    /// Touched a resource; the ship is unharmed
    Pickup,
    /// Rammed rock and took a hit
    Collision,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: Angle,
    pub rotation_speed: Angle,
    pub health: f32,
    pub max_health: f32,
    pub fuel: f32,
    pub energy: f32,
    pub time_since_hit: f32,
    pub time_since_fired: f32,
    /// Controls actually applied last step (zeroed without fuel)
    pub controls: ShipControls,
    /// Glyph size; the collision radius is half of it
    pub size: f32,
    laser_damage: f32,
}

impl Ship {
    /// A fresh ship scaled by the player's upgrades, at rest at the origin
    pub fn new(player: &PlayerData, tuning: &Tuning) -> Self {
        let health = tuning.ship_health_per_level * player.upgrade_level(UpgradeType::HullStrength) as f32;
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: Angle::from_degrees(-90.0),
            rotation_speed: Angle::ZERO,
            health,
            max_health: health,
            fuel: tuning.ship_fuel_per_level * player.upgrade_level(UpgradeType::FuelCapacity) as f32,
            energy: tuning.ship_max_energy,
            time_since_hit: f32::INFINITY,
            time_since_fired: f32::INFINITY,
            controls: ShipControls::default(),
            size: tuning.ship_size,
            laser_damage: tuning.laser_damage_per_level * player.upgrade_level(UpgradeType::LaserDamage) as f32,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size * 0.5
    }

    pub fn forward(&self) -> Vec2 {
        self.rotation.direction()
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= DESTROYED_HEALTH
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }

    pub fn is_thrusting(&self) -> bool {
        self.controls.thrust > 0.0
    }

    pub fn color(&self) -> Color {
        hit_flash_color(Color::GREY, self.time_since_hit, HIT_FLASH_DURATION)
    }

    pub fn update(&mut self, controls: ShipControls, dt: f32, tuning: &Tuning) {
        // Out of fuel: drift
        self.controls = if self.is_out_of_fuel() {
            ShipControls::default()
        } else {
            controls
        };

        let target_speed = Angle::from_degrees(self.controls.rotate * tuning.ship_turn_speed);
        self.rotation_speed = self
            .rotation_speed
            .move_towards(target_speed, Angle::from_degrees(tuning.ship_turn_acceleration) * dt);
        self.rotation += self.rotation_speed * dt;

        self.velocity += self.forward() * (self.controls.thrust * tuning.ship_thrust * dt);
        self.velocity *= (1.0 - dt * tuning.ship_drag).max(0.0);
        self.position += self.velocity * dt;

        self.time_since_fired += dt;
        self.time_since_hit += dt;
        self.energy = (self.energy + tuning.energy_recharge_per_second * dt).clamp(0.0, tuning.ship_max_energy);

        let burn = tuning.thrust_fuel_per_second * self.controls.thrust
            + tuning.rotate_fuel_per_second * self.controls.rotate.abs();
        self.fuel = (self.fuel - burn * dt).max(0.0);
    }

    /// Fire if the cooldown and energy allow it
    pub fn try_fire(&mut self, tuning: &Tuning) -> Option<Projectile> {
        if self.time_since_fired < tuning.fire_cooldown || self.energy < tuning.energy_per_shot {
            return None;
        }
        self.energy -= tuning.energy_per_shot;
        self.time_since_fired = 0.0;
        Some(Projectile::new(
            self.position,
            self.forward() * tuning.projectile_speed,
            self.laser_damage,
        ))
    }

    /// Bounce off the first arena edge the ship has crossed
    pub fn handle_bounds(&mut self, bounds: &Rect, tuning: &Tuning) -> bool {
        let inner = bounds.outset(-self.radius());
        let normal = if self.position.x < inner.min.x {
            Vec2::X
        } else if self.position.x > inner.max.x {
            Vec2::NEG_X
        } else if self.position.y < inner.min.y {
            Vec2::Y
        } else if self.position.y > inner.max.y {
            Vec2::NEG_Y
        } else {
            return false;
        };
        self.apply_hit(normal, tuning);
        true
    }

    /// Test for contact; rock hurts, ore does not
    pub fn handle_asteroid(&mut self, asteroid: &Asteroid, tuning: &Tuning) -> Option<ShipContact> {
        if asteroid.kind == AsteroidKind::Background {
            return None;
        }
        let contact = asteroid.circle_intersection(self.position, self.radius())?;
        if asteroid.kind == AsteroidKind::Resource {
            return Some(ShipContact::Pickup);
        }
        self.apply_hit(contact.normal, tuning);
        Some(ShipContact::Collision)
    }

    /// Take damage and get shoved along `normal`, unless this hit was lethal
    pub fn apply_hit(&mut self, normal: Vec2, tuning: &Tuning) {
        self.health -= tuning.ship_hit_damage;
        if !self.is_destroyed() {
            self.velocity += normal * (tuning.ship_hit_bounce - normal.dot(self.velocity));
        }
        self.time_since_hit = 0.0;
        log::debug!("ship hit, health {:.0}", self.health);
    }

    /// Where the i-th exhaust glyph trails behind the ship
    pub fn exhaust_offset(&self, index: usize) -> Vec2 {
        -self.forward() * (self.size * (0.5 + index as f32 * 0.075))
    }

    /// Rotation of the ship glyphs, which point up when unrotated
    pub fn glyph_rotation(&self) -> Angle {
        self.rotation + Angle::from_degrees(90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{AsteroidShape, CellKind};

    const DT: f32 = 1.0 / 120.0;

    fn ship() -> Ship {
        Ship::new(&PlayerData::default(), &Tuning::default())
    }

    #[test]
    fn test_upgrades_scale_ship() {
        let mut player = PlayerData::default();
        player.set_upgrade_level(UpgradeType::HullStrength, 3);
        player.set_upgrade_level(UpgradeType::FuelCapacity, 2);
        player.set_upgrade_level(UpgradeType::LaserDamage, 4);
        let tuning = Tuning::default();
        let mut ship = Ship::new(&player, &tuning);
        assert_eq!(ship.health, 30.0);
        assert_eq!(ship.fuel, 200.0);
        assert_eq!(ship.try_fire(&tuning).unwrap().damage, 4.0);
    }

    #[test]
    fn test_thrust_and_fuel() {
        let tuning = Tuning::default();
        let mut ship = ship();
        ship.update(ShipControls { rotate: 0.0, thrust: 1.0 }, 1.0, &tuning);
        // Facing up
        assert!(ship.velocity.y < 0.0);
        assert!(ship.velocity.x.abs() < 1e-3);
        assert_eq!(ship.fuel, 90.0);
    }

    #[test]
    fn test_fuel_exhaustion() {
        let tuning = Tuning::default();
        let mut ship = ship();
        ship.fuel = 0.0;
        ship.velocity = Vec2::new(100.0, 0.0);

        ship.update(ShipControls { rotate: -1.0, thrust: 1.0 }, DT, &tuning);

        assert_eq!(ship.controls, ShipControls::default());
        assert_eq!(ship.rotation_speed, Angle::ZERO);
        assert_eq!(ship.velocity.y, 0.0);
        assert!(ship.velocity.x < 100.0);
        assert!((ship.velocity.x - 100.0 * (1.0 - DT * 0.2)).abs() < 1e-3);
        assert_eq!(ship.fuel, 0.0);
    }

    #[test]
    fn test_turn_rate_is_eased() {
        let tuning = Tuning::default();
        let mut ship = ship();
        ship.update(ShipControls { rotate: 1.0, thrust: 0.0 }, DT, &tuning);
        let first = ship.rotation_speed.degrees();
        assert!(first > 0.0 && first < 180.0);
        for _ in 0..60 {
            ship.update(ShipControls { rotate: 1.0, thrust: 0.0 }, DT, &tuning);
        }
        assert!((ship.rotation_speed.degrees() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_fire_cooldown() {
        let tuning = Tuning::default();
        let mut ship = ship();
        let shot = ship.try_fire(&tuning).unwrap();
        assert!((shot.velocity - Vec2::new(0.0, -1000.0)).length() < 1e-2);
        assert!(ship.try_fire(&tuning).is_none());
        ship.update(ShipControls::default(), 0.11, &tuning);
        assert!(ship.try_fire(&tuning).is_some());
    }

    #[test]
    fn test_hit_bounce() {
        let tuning = Tuning::default();
        let mut ship = ship();
        ship.velocity = Vec2::new(-50.0, 0.0);
        ship.apply_hit(Vec2::X, &tuning);
        assert_eq!(ship.health, 0.0);
        // Lethal hit: no bounce
        assert_eq!(ship.velocity, Vec2::new(-50.0, 0.0));

        ship.health = 30.0;
        ship.apply_hit(Vec2::X, &tuning);
        assert_eq!(ship.health, 20.0);
        assert_eq!(ship.velocity, Vec2::new(200.0, 0.0));
        assert_eq!(ship.time_since_hit, 0.0);
    }

    #[test]
    fn test_bounds_bounce() {
        let tuning = Tuning::default();
        let bounds = Rect::new(Vec2::ZERO, Vec2::new(500.0, 500.0));
        let mut ship = ship();
        ship.health = 100.0;
        ship.position = Vec2::new(250.0, 250.0);
        assert!(!ship.handle_bounds(&bounds, &tuning));
        ship.position = Vec2::new(10.0, 250.0);
        assert!(ship.handle_bounds(&bounds, &tuning));
        assert!(ship.velocity.x > 0.0);
        assert_eq!(ship.health, 90.0);
    }

    #[test]
    fn test_asteroid_contact() {
        let tuning = Tuning::default();
        let mut ship = ship();
        ship.health = 100.0;

        let mut ore = Asteroid::new(AsteroidKind::Resource, AsteroidShape::single(CellKind::Resource), 0.0, &tuning);
        ore.position = Vec2::new(10.0, 0.0);
        assert_eq!(ship.handle_asteroid(&ore, &tuning), Some(ShipContact::Pickup));
        assert_eq!(ship.health, 100.0);

        let mut rock = Asteroid::new(AsteroidKind::Normal, AsteroidShape::single(CellKind::Rock), 0.0, &tuning);
        rock.position = Vec2::new(10.0, 0.0);
        assert_eq!(ship.handle_asteroid(&rock, &tuning), Some(ShipContact::Collision));
        assert_eq!(ship.health, 90.0);
        assert!(ship.velocity.x < 0.0);

        let mut scenery = Asteroid::new(AsteroidKind::Background, AsteroidShape::single(CellKind::Rock), 0.0, &tuning);
        scenery.position = Vec2::ZERO;
        assert_eq!(ship.handle_asteroid(&scenery, &tuning), None);
    }
}
