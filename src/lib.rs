//! Oreoids - an ore-mining asteroids arcade game
//!
//! Core modules:
//! - `math`: Vectors, angles, transforms, rects and intersection tests
//! - `sim`: Deterministic simulation (asteroid shapes, entities, collisions)
//! - `scene`: Main menu / station / flight state machine and render emission
//! - `renderer`: Drawable descriptors and the frame-scoped render registry
//! - `platform`: Input, storage and sound collaborators (DOM glue on wasm32)
//! - `progression`: Ore and upgrade levels that persist between flights
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod math;
pub mod platform;
pub mod progression;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{PersistenceError, TuningError};
pub use progression::{PlayerData, UpgradeType};
pub use scene::{SceneKind, SceneManager};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Glyph size of one asteroid cell
    pub const SHAPE_FONT_SIZE: f32 = 24.0;
    /// Body text on menus and hints
    pub const TEXT_FONT_SIZE: f32 = 24.0;
    pub const SMALL_FONT_SIZE: f32 = 18.0;

    /// Health at or below this counts as destroyed
    pub const DESTROYED_HEALTH: f32 = 1e-4;
    /// Seconds a hit tints an object red
    pub const HIT_FLASH_DURATION: f32 = 0.1;

    /// View size the headless binary simulates
    pub const DEFAULT_VIEW_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 800.0;

    pub const GAME_VERSION: &str = "v0.2";
}
