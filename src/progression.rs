//! Player progression: ore and upgrade levels
//!
//! Passed explicitly to whatever reads or changes it (ship construction,
//! asteroid spawning, pickups, the station shop). The scene layer loads it
//! once at startup and saves it on every scene transition.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::platform::Storage;

/// Upgrade levels start here
pub const BASE_UPGRADE_LEVEL: u32 = 1;
/// Cost growth per level
pub const UPGRADE_COST_GROWTH: f64 = 1.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeType {
    LaserDamage,
    HullStrength,
    FuelCapacity,
    MoreOreOnAsteroids,
    MoreValuableAsteroids,
    SometimesMoreOreDrops,
    DangerLevel,
}

impl UpgradeType {
    /// Shop order
    pub const ALL: [UpgradeType; 7] = [
        UpgradeType::LaserDamage,
        UpgradeType::HullStrength,
        UpgradeType::FuelCapacity,
        UpgradeType::MoreOreOnAsteroids,
        UpgradeType::MoreValuableAsteroids,
        UpgradeType::SometimesMoreOreDrops,
        UpgradeType::DangerLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UpgradeType::LaserDamage => "Laser Damage",
            UpgradeType::HullStrength => "Hull Strength",
            UpgradeType::FuelCapacity => "Fuel Capacity",
            UpgradeType::MoreOreOnAsteroids => "More Ore on Asteroids",
            UpgradeType::MoreValuableAsteroids => "More Valuable Asteroids",
            UpgradeType::SometimesMoreOreDrops => "Sometimes More Ore Drops",
            UpgradeType::DangerLevel => "Danger Level",
        }
    }

    pub fn base_cost(self) -> u64 {
        match self {
            UpgradeType::LaserDamage => 10,
            UpgradeType::HullStrength => 10,
            UpgradeType::FuelCapacity => 5,
            UpgradeType::MoreOreOnAsteroids => 5,
            UpgradeType::MoreValuableAsteroids => 20,
            UpgradeType::SometimesMoreOreDrops => 10,
            UpgradeType::DangerLevel => 100,
        }
    }

    /// Ore needed to reach `level`
    pub fn cost_for_level(self, level: u32) -> u64 {
        let exponent = i32::try_from(level).unwrap_or(i32::MAX).saturating_sub(2);
        let growth = UPGRADE_COST_GROWTH.powi(exponent).round();
        self.base_cost().saturating_mul(growth as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpgrade {
    #[serde(rename = "type")]
    pub kind: UpgradeType,
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    pub ore: u64,
    /// Only upgrades that were ever bought; the rest are at the base level
    pub upgrades: Vec<PlayerUpgrade>,
}

impl PlayerData {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "playerData";

    pub fn upgrade_level(&self, kind: UpgradeType) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.kind == kind)
            .map_or(BASE_UPGRADE_LEVEL, |u| u.level.max(BASE_UPGRADE_LEVEL))
    }

    pub fn set_upgrade_level(&mut self, kind: UpgradeType, level: u32) {
        match self.upgrades.iter_mut().find(|u| u.kind == kind) {
            Some(upgrade) => upgrade.level = level,
            None => self.upgrades.push(PlayerUpgrade { kind, level }),
        }
    }

    /// Ore needed for the next level of `kind`
    pub fn next_upgrade_cost(&self, kind: UpgradeType) -> u64 {
        kind.cost_for_level(self.upgrade_level(kind).saturating_add(1))
    }

    pub fn can_afford(&self, kind: UpgradeType) -> bool {
        self.ore >= self.next_upgrade_cost(kind)
    }

    /// Buy the next level if affordable; returns the new level
    pub fn try_purchase(&mut self, kind: UpgradeType) -> Option<u32> {
        let cost = self.next_upgrade_cost(kind);
        if self.ore < cost {
            return None;
        }
        let level = self.upgrade_level(kind).saturating_add(1);
        self.ore -= cost;
        self.set_upgrade_level(kind, level);
        log::info!("Bought {} level {} for {} ore", kind.name(), level, cost);
        Some(level)
    }

    pub fn add_ore(&mut self, amount: u64) {
        self.ore = self.ore.saturating_add(amount);
    }

    pub fn has_any_data(&self) -> bool {
        self.ore > 0 || !self.upgrades.is_empty()
    }

    pub fn clear(&mut self) {
        self.ore = 0;
        self.upgrades.clear();
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|source| PersistenceError::Encode {
            key: Self::STORAGE_KEY,
            source,
        })
    }

    /// Decode a saved profile; levels below the base level are raised to it
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let mut data: Self = serde_json::from_str(json).map_err(|source| PersistenceError::Decode {
            key: Self::STORAGE_KEY,
            source,
        })?;
        for upgrade in data.upgrades.iter_mut().filter(|u| u.level < BASE_UPGRADE_LEVEL) {
            log::warn!("Saved {} level {} is below the base level", upgrade.kind.name(), upgrade.level);
            upgrade.level = BASE_UPGRADE_LEVEL;
        }
        Ok(data)
    }

    /// Load from storage; missing or corrupt data yields a fresh profile
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.load(Self::STORAGE_KEY) else {
            log::info!("No saved player data");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(data) => {
                log::info!("Loaded player data: {} ore, {} upgrades", data.ore, data.upgrades.len());
                data
            }
            Err(err) => {
                log::warn!("{err}; starting with empty player data");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match self.to_json() {
            Ok(json) => storage.save(Self::STORAGE_KEY, &json),
            Err(err) => log::warn!("{err}"),
        }
    }
}
