//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON override can rebalance a build
//! without touching simulation code. Missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    /// Glyph size of the ship; collision radius is half of this
    pub ship_size: f32,
    /// Hull points per HullStrength level
    pub ship_health_per_level: f32,
    /// Fuel units per FuelCapacity level
    pub ship_fuel_per_level: f32,
    /// Target turn rate while a rotate key is held (degrees/s)
    pub ship_turn_speed: f32,
    /// How fast the turn rate approaches its target (degrees/s²)
    pub ship_turn_acceleration: f32,
    /// Forward acceleration while thrusting (px/s²)
    pub ship_thrust: f32,
    /// Fraction of velocity lost per second
    pub ship_drag: f32,
    pub thrust_fuel_per_second: f32,
    pub rotate_fuel_per_second: f32,
    pub ship_max_energy: f32,
    pub energy_recharge_per_second: f32,
    pub energy_per_shot: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    /// Hull lost per hit
    pub ship_hit_damage: f32,
    /// Speed the ship is pushed to along the hit normal
    pub ship_hit_bounce: f32,

    // === Weapon ===
    pub projectile_speed: f32,
    /// Damage per LaserDamage level
    pub laser_damage_per_level: f32,
    /// Seconds of travel covered by the swept hit test
    pub projectile_lookahead: f32,
    /// A projectile that hit something lives this much longer
    pub projectile_linger: f32,

    // === Asteroids ===
    pub asteroid_health: f32,
    /// Health multiplier applied once above each difficulty tier
    pub asteroid_tier_health_multiplier: f32,
    /// Fraction of the spin difference recovered per second
    pub asteroid_spin_recovery: f32,
    /// Fraction of velocity and spin a floating resource loses per second
    pub resource_drag: f32,
    /// Spin impulse per unit of (impact offset × bullet direction), radians
    pub asteroid_hit_spin: f32,
    /// Speed added along the bullet direction per hit
    pub asteroid_hit_push: f32,
    pub split_speed: [f32; 2],
    /// Spin given to each half, degrees/s
    pub split_spin: [f32; 2],
    /// Random speed added to freed resources
    pub resource_scatter_speed: [f32; 2],

    // === Attraction ===
    pub ship_attraction_distance: f32,
    pub ship_attraction_force: f32,
    pub asteroid_attraction_distance: f32,
    pub asteroid_attraction_force: f32,
    pub asteroid_velocity_attraction: f32,

    // === Flight setup and spawning ===
    pub arena_margin: f32,
    pub background_rows: [usize; 2],
    pub initial_asteroids: usize,
    pub asteroid_rows: [usize; 2],
    /// Minimum free space between the ship and an initial asteroid's rim
    pub spawn_clearance: f32,
    /// Seconds between spawns at DangerLevel 1
    pub spawn_interval: f32,
    pub spawn_speed: [f32; 2],
    pub background_speed_scale: f32,
    pub background_spin_scale: f32,
    pub background_scale: f32,
    pub resource_chance_base: f32,
    pub resource_chance_per_level: f32,

    // === Economy and flow ===
    /// Pickup sound pitch rises by this per pickup in a streak
    pub pickup_streak_pitch_step: f32,
    /// Streak resets after this long without a pickup
    pub pickup_streak_reset: f32,
    /// Seconds between the ship exploding and the flight ending
    pub game_over_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_size: 36.0,
            ship_health_per_level: 10.0,
            ship_fuel_per_level: 100.0,
            ship_turn_speed: 180.0,
            ship_turn_acceleration: 2000.0,
            ship_thrust: 200.0,
            ship_drag: 0.2,
            thrust_fuel_per_second: 10.0,
            rotate_fuel_per_second: 2.0,
            ship_max_energy: 100.0,
            energy_recharge_per_second: 10.0,
            energy_per_shot: 0.0,
            fire_cooldown: 0.1,
            ship_hit_damage: 10.0,
            ship_hit_bounce: 200.0,

            projectile_speed: 1000.0,
            laser_damage_per_level: 1.0,
            projectile_lookahead: 0.03,
            projectile_linger: 0.03,

            asteroid_health: 50.0,
            asteroid_tier_health_multiplier: 5.0,
            asteroid_spin_recovery: 0.2,
            resource_drag: 0.5,
            asteroid_hit_spin: 0.001,
            asteroid_hit_push: 0.5,
            split_speed: [15.0, 25.0],
            split_spin: [15.0, 25.0],
            resource_scatter_speed: [15.0, 25.0],

            ship_attraction_distance: 100.0,
            ship_attraction_force: 100.0,
            asteroid_attraction_distance: 10.0,
            asteroid_attraction_force: 50.0,
            asteroid_velocity_attraction: 2.0,

            arena_margin: 20.0,
            background_rows: [3, 12],
            initial_asteroids: 10,
            asteroid_rows: [5, 8],
            spawn_clearance: 100.0,
            spawn_interval: 10.0,
            spawn_speed: [40.0, 90.0],
            background_speed_scale: 0.25,
            background_spin_scale: 0.5,
            background_scale: 1.5,
            resource_chance_base: 0.2,
            resource_chance_per_level: 0.2,

            pickup_streak_pitch_step: 1.0 / 20.0,
            pickup_streak_reset: 1.5,
            game_over_delay: 1.0,
        }
    }
}

impl Tuning {
    /// Parse overrides on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("ship_size", self.ship_size),
            ("fire_cooldown", self.fire_cooldown),
            ("projectile_speed", self.projectile_speed),
            ("projectile_lookahead", self.projectile_lookahead),
            ("asteroid_health", self.asteroid_health),
            ("spawn_interval", self.spawn_interval),
            ("game_over_delay", self.game_over_delay),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        let ranges = [
            ("split_speed", self.split_speed),
            ("split_spin", self.split_spin),
            ("resource_scatter_speed", self.resource_scatter_speed),
            ("spawn_speed", self.spawn_speed),
        ];
        for (field, [min, max]) in ranges {
            if min > max {
                return Err(TuningError::Invalid {
                    field,
                    reason: "has min above max",
                });
            }
        }

        if self.background_rows[0] > self.background_rows[1] || self.asteroid_rows[0] > self.asteroid_rows[1] {
            return Err(TuningError::Invalid {
                field: "asteroid_rows",
                reason: "has min above max",
            });
        }
        // Two rows produce a 3x2 grid at most, which shatters on the first hit
        if self.asteroid_rows[0] < 2 || self.background_rows[0] < 1 {
            return Err(TuningError::Invalid {
                field: "asteroid_rows",
                reason: "is too small to build a rock",
            });
        }
        Ok(())
    }
}
