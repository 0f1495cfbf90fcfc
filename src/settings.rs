//! Game settings and preferences
//!
//! Persisted separately from player progression, under its own storage key.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::platform::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when the page loses focus
    pub mute_on_blur: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "oreoids_settings";

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(|source| PersistenceError::Decode {
            key: Self::STORAGE_KEY,
            source,
        })
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        if let Some(json) = storage.load(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(err) => log::warn!("{err}"),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.save(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(source) => log::warn!(
                "{}",
                PersistenceError::Encode {
                    key: Self::STORAGE_KEY,
                    source
                }
            ),
        }
    }
}
