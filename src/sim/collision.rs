//! Collision resolution between flight entities
//!
//! Geometry tests live on the entities and the shape grid. These routines
//! decide what a contact means: damage, pickups, debris, sounds.

use glam::Vec2;

use super::asteroid::{Asteroid, AsteroidKind, AttractionTarget};
use super::particle::Explosion;
use super::ship::ShipContact;
use super::state::{FlightState, GameEvent};
use crate::audio::{SoundEffect, SoundRequest};
use crate::math::{Angle, Vec2Ext};
use crate::progression::{PlayerData, UpgradeType};
use crate::renderer::Color;

/// Ship against the arena walls and every asteroid
///
/// Resources near the ship are pulled in first. Touching one collects it;
/// touching rock hurts. Nothing is collected once the ship is destroyed.
pub fn resolve_ship_contacts(state: &mut FlightState, player: &mut PlayerData, dt: f32) {
    if state.ship.handle_bounds(&state.bounds, &state.tuning) && !state.ship.is_destroyed() {
        state.play(SoundRequest::new(SoundEffect::Hit).with_volume(0.5));
    }

    let pull = AttractionTarget {
        position: state.ship.position,
        velocity: state.ship.velocity,
        radius: state.ship.radius(),
        distance: state.tuning.ship_attraction_distance,
        force: state.tuning.ship_attraction_force,
        velocity_force: 0.0,
    };

    for asteroid in state.asteroids.iter_mut() {
        asteroid.apply_attraction(&pull, dt);

        let Some(contact) = state.ship.handle_asteroid(asteroid, &state.tuning) else {
            continue;
        };
        if state.ship.is_destroyed() {
            continue;
        }

        match contact {
            ShipContact::Pickup => {
                let amount = asteroid.ore_value();
                player.add_ore(amount);
                let pitch = 1.0 + state.pickup_streak as f32 * state.tuning.pickup_streak_pitch_step;
                state.events.push(GameEvent::Sound(
                    SoundRequest::new(SoundEffect::Pickup)
                        .with_volume(0.5)
                        .with_pitch(pitch)
                        .with_pitch_variance(0.0),
                ));
                state.pickup_streak += 1;
                state.time_since_pickup = 0.0;
                state.events.push(GameEvent::OreCollected {
                    amount,
                    streak: state.pickup_streak,
                });

                let sparkle = Explosion::new(
                    state.ship.position.lerp(asteroid.position, 0.5),
                    state.ship.velocity * 0.5,
                    asteroid.base_color(),
                )
                .particles(6, 16.0)
                .lasting(0.1, 0.2);
                state.particles.extend(sparkle.spawn(&mut state.rng));
                asteroid.destroy();
            }
            ShipContact::Collision => {
                state.events.push(GameEvent::Sound(SoundRequest::new(SoundEffect::Hit).with_volume(0.5)));
            }
        }
    }
}

/// Let rock at `index` drag nearby ore along with it
pub fn attract_to_asteroid(state: &mut FlightState, index: usize, dt: f32) {
    let source = &state.asteroids[index];
    if source.kind != AsteroidKind::Normal {
        return;
    }
    let pull = AttractionTarget {
        position: source.position,
        velocity: source.velocity,
        radius: source.radius(),
        distance: state.tuning.asteroid_attraction_distance,
        force: state.tuning.asteroid_attraction_force,
        velocity_force: state.tuning.asteroid_velocity_attraction,
    };
    for other in state.asteroids.iter_mut() {
        other.apply_attraction(&pull, dt);
    }
}

/// Test the asteroid at `index` against live projectiles
///
/// At most one projectile hits per step. The projectile lingers briefly so
/// it still shows at the impact point, but never hits again.
pub fn resolve_projectile_hits(state: &mut FlightState, index: usize) -> bool {
    let asteroid = &mut state.asteroids[index];
    for projectile in state.projectiles.iter_mut().filter(|p| !p.has_hit()) {
        let Some(impact) = asteroid.handle_projectile(projectile, &state.tuning) else {
            continue;
        };
        projectile.destroy_after(state.tuning.projectile_linger);

        let color = Color::lerp(Color::LASER_RED, asteroid.base_color(), 0.5);
        let sparks = Explosion::new(impact.point, Vec2::ZERO, color)
            .particles(3, 12.0)
            .lasting(0.2, 0.3)
            .cone(impact.normal.angle(), Angle::from_degrees(45.0));
        state.particles.extend(sparks.spawn(&mut state.rng));
        return true;
    }
    false
}

/// Split the destroyed asteroid at `index`, returning the pieces to add
pub fn break_asteroid(state: &mut FlightState, index: usize, player: &PlayerData) -> Vec<Asteroid> {
    let ore_drops = player.upgrade_level(UpgradeType::SometimesMoreOreDrops);
    let asteroid = &state.asteroids[index];
    let outcome = asteroid.split_along_hit_axis(&mut state.rng, &state.tuning, ore_drops);
    let id = asteroid.id;

    state.play(SoundRequest::new(SoundEffect::Break));
    state.events.push(GameEvent::AsteroidBroken { id });
    state.particles.extend(outcome.particles);
    outcome.asteroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rect;
    use crate::sim::projectile::Projectile;
    use crate::sim::shape::{AsteroidShape, CellKind};
    use crate::tuning::Tuning;

    fn empty_flight(player: &PlayerData) -> FlightState {
        let view = Rect::new(Vec2::ZERO, Vec2::new(1280.0, 800.0));
        let mut state = FlightState::new(21, view, player, Tuning::default());
        state.asteroids.clear();
        state.ship.health = 100.0;
        state
    }

    fn resource_at(state: &FlightState, position: Vec2, difficulty: f32) -> Asteroid {
        let mut ore = Asteroid::new(
            AsteroidKind::Resource,
            AsteroidShape::single(CellKind::Resource),
            difficulty,
            &state.tuning,
        );
        ore.position = position;
        ore
    }

    #[test]
    fn test_resource_pickup() {
        let mut player = PlayerData::default();
        let mut state = empty_flight(&player);
        let ore = resource_at(&state, state.ship.position + Vec2::new(5.0, 0.0), 0.5);
        state.add_asteroid(ore);

        resolve_ship_contacts(&mut state, &mut player, 1.0 / 120.0);

        assert_eq!(player.ore, 10);
        assert_eq!(state.ship.health, 100.0);
        assert!(state.asteroids[0].is_destroyed());
        assert_eq!(state.pickup_streak, 1);
        assert_eq!(state.particles.len(), 6);
        let pickup = state.events.iter().find_map(|e| match e {
            GameEvent::Sound(request) if request.effect == SoundEffect::Pickup => Some(*request),
            _ => None,
        });
        assert_eq!(pickup.and_then(|r| r.pitch), Some(1.0));
    }

    #[test]
    fn test_pickup_streak_raises_pitch() {
        let mut player = PlayerData::default();
        let mut state = empty_flight(&player);
        state.pickup_streak = 4;
        let ore = resource_at(&state, state.ship.position, 0.0);
        state.add_asteroid(ore);

        resolve_ship_contacts(&mut state, &mut player, 1.0 / 120.0);

        assert_eq!(player.ore, 1);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(SoundRequest { effect: SoundEffect::Pickup, pitch: Some(p), .. }) if (*p - 1.2).abs() < 1e-6
        )));
    }

    #[test]
    fn test_dead_ship_collects_nothing() {
        let mut player = PlayerData::default();
        let mut state = empty_flight(&player);
        state.ship.health = 0.0;
        let ore = resource_at(&state, state.ship.position, 0.0);
        state.add_asteroid(ore);

        resolve_ship_contacts(&mut state, &mut player, 1.0 / 120.0);

        assert_eq!(player.ore, 0);
        assert!(!state.asteroids[0].is_destroyed());
    }

    #[test]
    fn test_rock_pulls_nearby_ore() {
        let player = PlayerData::default();
        let mut state = empty_flight(&player);
        let rock = Asteroid::new(
            AsteroidKind::Normal,
            AsteroidShape::parse("###\n###\n###").unwrap(),
            0.0,
            &state.tuning,
        );
        let radius = rock.radius();
        state.add_asteroid(rock);
        let ore = resource_at(&state, Vec2::new(radius + 5.0, 0.0), 0.0);
        state.add_asteroid(ore);

        attract_to_asteroid(&mut state, 0, 0.1);

        assert!(state.asteroids[1].velocity.x < 0.0);
        assert_eq!(state.asteroids[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_projectile_hit_makes_sparks() {
        let player = PlayerData::default();
        let mut state = empty_flight(&player);
        let mut rock = Asteroid::new(
            AsteroidKind::Normal,
            AsteroidShape::parse("###\n###\n###").unwrap(),
            0.0,
            &state.tuning,
        );
        rock.position = Vec2::new(300.0, 300.0);
        state.add_asteroid(rock);
        let projectile = Projectile::new(Vec2::new(270.0, 300.0), Vec2::new(1000.0, 0.0), 1.0);
        state.add_projectile(projectile);
        let miss = Projectile::new(Vec2::new(270.0, 100.0), Vec2::new(1000.0, 0.0), 1.0);
        state.add_projectile(miss);

        assert!(resolve_projectile_hits(&mut state, 0));
        assert_eq!(state.asteroids[0].health, 49.0);
        assert_eq!(state.projectiles[0].time_to_destroy, Some(0.03));
        assert_eq!(state.projectiles[1].time_to_destroy, None);
        assert_eq!(state.particles.len(), 3);

        // The spent bolt is still inside the rock but deals nothing more
        state.projectiles.retain(|p| p.has_hit());
        assert!(!resolve_projectile_hits(&mut state, 0));
        assert_eq!(state.asteroids[0].health, 49.0);
    }
}
