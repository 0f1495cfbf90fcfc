//! Fixed timestep simulation tick
//!
//! Core flight loop that advances the simulation deterministically.

use super::asteroid::AsteroidKind;
use super::collision::{attract_to_asteroid, break_asteroid, resolve_projectile_hits, resolve_ship_contacts};
use super::particle::Explosion;
use super::ship::ShipControls;
use super::state::{FlightOutcome, FlightPhase, FlightState, GameEvent};
use crate::audio::{SoundEffect, SoundRequest};
use crate::progression::PlayerData;
use crate::renderer::Color;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// -1.0 turn left, 1.0 turn right
    pub rotate: f32,
    /// Main engine on
    pub thrust: bool,
    /// Fire (held)
    pub fire: bool,
    /// Leave the flight
    pub exit: bool,
}

impl TickInput {
    pub fn ship_controls(&self) -> ShipControls {
        ShipControls {
            rotate: self.rotate,
            thrust: if self.thrust { 1.0 } else { 0.0 },
        }
    }
}

/// Advance the flight by one fixed timestep
///
/// `player` is read for upgrade levels and credited with collected ore.
pub fn tick(state: &mut FlightState, input: &TickInput, player: &mut PlayerData, dt: f32) {
    if state.outcome().is_some() {
        return;
    }

    state.time += dt;
    state.time_ticks += 1;

    if input.exit {
        state.finish(FlightOutcome::Escaped);
        return;
    }

    if state.phase == FlightPhase::Wrecked {
        state.time_since_ship_destroyed += dt;
        if state.time_since_ship_destroyed >= state.tuning.game_over_delay {
            state.finish(FlightOutcome::ShipLost);
            return;
        }
    } else {
        state.ship.update(input.ship_controls(), dt, &state.tuning);
        resolve_ship_contacts(state, player, dt);

        if input.fire {
            if let Some(projectile) = state.ship.try_fire(&state.tuning) {
                state.play(SoundRequest::new(SoundEffect::Shoot));
                state.add_projectile(projectile);
            }
        }
    }

    update_pickup_streak(state, dt);

    for projectile in state.projectiles.iter_mut() {
        projectile.update(dt);
    }

    update_spawning(state, player, dt);
    update_asteroids(state, player, dt);

    for particle in state.particles.iter_mut() {
        particle.update(dt);
    }

    let bounds = state.bounds;
    state.projectiles.retain(|p| !p.is_outside(&bounds) && !p.is_destroyed());
    state.asteroids.retain(|a| !a.is_destroyed());
    state.particles.retain(|p| !p.is_destroyed());

    if state.phase == FlightPhase::Flying && state.ship.is_destroyed() {
        wreck_ship(state);
    }
}

fn update_pickup_streak(state: &mut FlightState, dt: f32) {
    if state.pickup_streak == 0 {
        return;
    }
    state.time_since_pickup += dt;
    if state.time_since_pickup >= state.tuning.pickup_streak_reset {
        state.pickup_streak = 0;
        state.time_since_pickup = 0.0;
    }
}

fn update_spawning(state: &mut FlightState, player: &PlayerData, dt: f32) {
    state.time_to_spawn -= dt;
    if state.time_to_spawn > 0.0 {
        return;
    }
    state.reset_spawn_timer(player);
    let rows = state.random_asteroid_rows();
    let difficulty = state.random_difficulty(player);
    let id = state.spawn_asteroid(rows, difficulty, AsteroidKind::Normal, true, player);
    log::info!("Asteroid {} incoming ({} rows, difficulty {:.1})", id, rows, difficulty);
}

/// Attraction, projectile hits, breaking, wrapping, then motion
///
/// Pieces of broken asteroids join the list after the pass, so they first
/// move on the next tick.
fn update_asteroids(state: &mut FlightState, player: &PlayerData, dt: f32) {
    let mut pieces = Vec::new();

    for index in 0..state.asteroids.len() {
        attract_to_asteroid(state, index, dt);
        resolve_projectile_hits(state, index);

        let asteroid = &state.asteroids[index];
        if asteroid.is_destroyed() && asteroid.kind != AsteroidKind::Resource {
            pieces.extend(break_asteroid(state, index, player));
        }

        let asteroid = &mut state.asteroids[index];
        // Ore carried off the edge is lost
        if asteroid.wrap_around(&state.bounds) && asteroid.kind == AsteroidKind::Resource {
            asteroid.destroy();
        }
        asteroid.update(dt, &state.tuning);
    }

    for piece in pieces {
        state.add_asteroid(piece);
    }
}

fn wreck_ship(state: &mut FlightState) {
    log::info!("Ship destroyed at {:?}", state.ship.position);
    state.play(SoundRequest::new(SoundEffect::Death).with_volume(0.5));
    let explosion = Explosion::new(state.ship.position, state.ship.velocity, Color::FLASH_RED)
        .particles(10, 24.0)
        .lasting(0.2, 0.4);
    let debris = explosion.spawn(&mut state.rng);
    state.particles.extend(debris);
    state.phase = FlightPhase::Wrecked;
    state.events.push(GameEvent::ShipDestroyed);
}
