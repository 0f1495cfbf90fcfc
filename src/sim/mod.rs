//! Deterministic flight simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids allocated monotonically)
//! - No rendering or platform dependencies; sounds leave through the event outbox

pub mod asteroid;
pub mod collision;
pub mod particle;
pub mod projectile;
pub mod shape;
pub mod ship;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidKind, AttractionTarget, ProjectileImpact, SplitOutcome};
pub use particle::{Explosion, Particle};
pub use projectile::Projectile;
pub use shape::{AsteroidShape, CellKind, DetachedCell, Fragment, ShapeContact};
pub use ship::{Ship, ShipContact, ShipControls};
pub use state::{FlightOutcome, FlightPhase, FlightState, GameEvent};
pub use tick::{TickInput, tick};
