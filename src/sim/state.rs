//! Flight state and spawning
//!
//! Everything a flight needs lives here, including its seeded RNG, so two
//! flights with the same seed, view and inputs play out identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::asteroid::{Asteroid, AsteroidKind};
use super::particle::Particle;
use super::projectile::Projectile;
use super::shape::AsteroidShape;
use super::ship::Ship;
use crate::audio::SoundRequest;
use crate::math::{Angle, Rect};
use crate::progression::{PlayerData, UpgradeType};
use crate::tuning::Tuning;

/// Rerolls allowed when placing an asteroid away from the ship
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    /// Player flew back to the station
    Escaped,
    /// Ship destroyed
    ShipLost,
}

/// Current phase of a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    /// Ship alive and under control
    Flying,
    /// Ship destroyed; the flight ends after a short delay
    Wrecked,
    /// Flight over, waiting for the scene layer to leave
    Over(FlightOutcome),
}

/// Things that happened during a tick, drained by the scene layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Sound(SoundRequest),
    OreCollected { amount: u64, streak: u32 },
    AsteroidBroken { id: u32 },
    ShipDestroyed,
    FlightOver(FlightOutcome),
}

/// Complete flight state (deterministic)
#[derive(Debug, Clone)]
pub struct FlightState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Playfield; the view inset by the arena margin
    pub bounds: Rect,
    pub phase: FlightPhase,
    /// Simulated seconds since launch
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub time_since_ship_destroyed: f32,
    pub ship: Ship,
    /// Entity lists, each in insertion (id) order
    pub projectiles: Vec<Projectile>,
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
    pub time_to_spawn: f32,
    pub spawned_count: u32,
    /// Pickups since the streak last reset
    pub pickup_streak: u32,
    pub time_since_pickup: f32,
    /// Event outbox
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl FlightState {
    /// Launch a flight: ship at the center, scenery and a first field of rocks
    pub fn new(seed: u64, view: Rect, player: &PlayerData, tuning: Tuning) -> Self {
        let margin = tuning.arena_margin;
        let bounds = view.inset_edges(margin, margin, margin, margin);
        let mut ship = Ship::new(player, &tuning);
        ship.position = bounds.center();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            bounds,
            phase: FlightPhase::Flying,
            time: 0.0,
            time_ticks: 0,
            time_since_ship_destroyed: 0.0,
            ship,
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            particles: Vec::new(),
            time_to_spawn: 0.0,
            spawned_count: 0,
            pickup_streak: 0,
            time_since_pickup: 0.0,
            events: Vec::new(),
            next_id: 1,
        };

        let [min_rows, max_rows] = state.tuning.background_rows;
        for rows in min_rows..=max_rows {
            let difficulty = state.random_difficulty(player);
            state.spawn_asteroid(rows, difficulty, AsteroidKind::Background, false, player);
        }
        for _ in 0..state.tuning.initial_asteroids {
            let rows = state.random_asteroid_rows();
            let difficulty = state.random_difficulty(player);
            state.spawn_asteroid(rows, difficulty, AsteroidKind::Normal, false, player);
        }
        state.reset_spawn_timer(player);

        log::info!(
            "Flight {} launched: {} asteroids in {:.0}x{:.0} arena",
            seed,
            state.asteroids.len(),
            bounds.width(),
            bounds.height()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_asteroid(&mut self, mut asteroid: Asteroid) -> u32 {
        asteroid.id = self.next_entity_id();
        let id = asteroid.id;
        self.asteroids.push(asteroid);
        id
    }

    pub fn add_projectile(&mut self, mut projectile: Projectile) -> u32 {
        projectile.id = self.next_entity_id();
        let id = projectile.id;
        self.projectiles.push(projectile);
        id
    }

    pub fn play(&mut self, request: SoundRequest) {
        self.events.push(GameEvent::Sound(request));
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn outcome(&self) -> Option<FlightOutcome> {
        match self.phase {
            FlightPhase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn finish(&mut self, outcome: FlightOutcome) {
        if self.outcome().is_some() {
            return;
        }
        log::info!("Flight over after {:.1}s: {:?}", self.time, outcome);
        self.phase = FlightPhase::Over(outcome);
        self.events.push(GameEvent::FlightOver(outcome));
    }

    pub fn reset_spawn_timer(&mut self, player: &PlayerData) {
        self.time_to_spawn = self.tuning.spawn_interval / player.upgrade_level(UpgradeType::DangerLevel) as f32;
    }

    pub fn random_asteroid_rows(&mut self) -> usize {
        let [min, max] = self.tuning.asteroid_rows;
        self.rng.random_range(min..=max)
    }

    /// Roll an ore tier from the MoreValuableAsteroids level
    pub fn random_difficulty(&mut self, player: &PlayerData) -> f32 {
        let level = player.upgrade_level(UpgradeType::MoreValuableAsteroids);
        if level == 1 {
            return 0.0;
        }
        if level >= 3 && self.rng.random::<f32>() < 0.03 * level as f32 {
            return 1.0;
        }
        if self.rng.random::<f32>() < 0.1 * level as f32 {
            return 0.5;
        }
        0.0
    }

    /// Generate and place a new asteroid
    ///
    /// `outside` spawns just above the top edge; otherwise the asteroid lands
    /// inside the arena clear of the ship (scenery may overlap it).
    pub fn spawn_asteroid(
        &mut self,
        rows: usize,
        difficulty: f32,
        kind: AsteroidKind,
        outside: bool,
        player: &PlayerData,
    ) -> u32 {
        let resource_chance = match kind {
            AsteroidKind::Background => 0.0,
            _ => {
                self.tuning.resource_chance_base
                    + self.tuning.resource_chance_per_level
                        * player.upgrade_level(UpgradeType::MoreOreOnAsteroids) as f32
            }
        };
        let shape = AsteroidShape::random(rows * 3 / 2, rows, resource_chance, &mut self.rng);
        let radius = shape.containing_radius();

        let rotation = Angle::from_degrees(self.rng.random_range(0.0..=360.0));
        let mut spin = Angle::from_degrees(self.rng.random_range(-10.0..=10.0));

        let position = if outside {
            Vec2::new(
                self.rng.random_range(self.bounds.min.x..=self.bounds.max.x),
                self.bounds.min.y - radius,
            )
        } else {
            self.random_clear_position(radius, kind == AsteroidKind::Background)
        };

        let mut direction = Angle::from_degrees(self.rng.random_range(45.0..=135.0)).direction();
        if self.spawned_count % 2 == 0 {
            direction.y = -direction.y;
        }
        let [min_speed, max_speed] = self.tuning.spawn_speed;
        let danger = player.upgrade_level(UpgradeType::DangerLevel) as f32;
        let mut velocity = direction * self.rng.random_range(min_speed..=max_speed);
        velocity *= 1.0 + self.rng.random_range(0.0..=(danger - 1.0) * 0.5);

        if kind == AsteroidKind::Background {
            velocity *= self.tuning.background_speed_scale;
            spin *= self.tuning.background_spin_scale;
        }

        let mut asteroid = Asteroid::new(kind, shape, difficulty, &self.tuning);
        asteroid.set_motion(position, rotation, spin, spin, velocity);
        self.spawned_count += 1;
        let id = self.add_asteroid(asteroid);
        log::debug!("spawned {:?} asteroid {} ({} rows) at {:?}", kind, id, rows, position);
        id
    }

    fn random_clear_position(&mut self, radius: f32, anywhere: bool) -> Vec2 {
        let min_distance = radius + self.tuning.spawn_clearance;
        let mut position = self.bounds.center();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            position = Vec2::new(
                self.rng.random_range(self.bounds.min.x..=self.bounds.max.x),
                self.rng.random_range(self.bounds.min.y..=self.bounds.max.y),
            );
            if anywhere || (position - self.ship.position).length() > min_distance {
                return position;
            }
        }
        log::warn!("No clear spawn point after {} attempts", MAX_PLACEMENT_ATTEMPTS);
        position
    }
}
