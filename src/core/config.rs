//! Engine configuration.
//!
//! Every rule constant (energy cap, cooldowns, roll ranges, prices, alliance
//! capacity) lives here with the live game's values as defaults. A TOML file
//! may override any subset; missing fields keep their defaults.
//!
//! ```
//! use card_arena::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("[economy]\nstarting_gold = 250\n").unwrap();
//! assert_eq!(config.economy.starting_gold, 250);
//! assert_eq!(config.energy.max_charge, 3);
//! ```

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::economy::RarityTable;
use crate::error::StoreError;

/// Energy regeneration and draw cooldown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Maximum stored charges.
    pub max_charge: u8,

    /// Minutes per regenerated charge.
    pub regen_minutes: i64,

    /// Minimum minutes between two draws.
    pub draw_cooldown_minutes: i64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_charge: 3,
            regen_minutes: 15,
            draw_cooldown_minutes: 5,
        }
    }
}

impl EnergyConfig {
    #[must_use]
    pub fn regen_interval(&self) -> Duration {
        Duration::minutes(self.regen_minutes)
    }

    #[must_use]
    pub fn draw_cooldown(&self) -> Duration {
        Duration::minutes(self.draw_cooldown_minutes)
    }
}

/// Draw rewards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Smallest gold reward (inclusive).
    pub min_gold: u64,

    /// Largest gold reward (inclusive).
    pub max_gold: u64,

    /// Rarity probabilities, in percent.
    pub rarity: RarityTable,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            min_gold: 10,
            max_gold: 50,
            rarity: RarityTable::default(),
        }
    }
}

/// Battle rolls, cooldown and gold steal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub cooldown_minutes: i64,

    /// Each side adds a roll in `[0, max_roll]`.
    pub max_roll: u32,

    pub min_steal_percent: u32,
    pub max_steal_percent: u32,

    /// Floor on the amount stolen (still capped at the loser's balance).
    pub min_steal: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 5,
            max_roll: 20,
            min_steal_percent: 10,
            max_steal_percent: 30,
            min_steal: 10,
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes)
    }
}

/// Prices and caller-side economic policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_gold: u64,
    pub personal_boost_cost: u64,
    pub group_boost_cost: u64,

    /// Minimum amount for player and alliance donations.
    pub min_donation: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 100,
            personal_boost_cost: 50,
            group_boost_cost: 300,
            min_donation: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllianceConfig {
    pub max_members: usize,
    pub invite_ttl_hours: i64,
}

impl Default for AllianceConfig {
    fn default() -> Self {
        Self {
            max_members: 10,
            invite_ttl_hours: 24,
        }
    }
}

impl AllianceConfig {
    #[must_use]
    pub fn invite_ttl(&self) -> Duration {
        Duration::hours(self.invite_ttl_hours)
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub energy: EnergyConfig,
    pub draw: DrawConfig,
    pub battle: BattleConfig,
    pub economy: EconomyConfig,
    pub alliance: AllianceConfig,
}

impl EngineConfig {
    /// Parse a TOML document. Missing sections and fields use defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Engine config loaded from {:?}", path);
        Ok(config)
    }

    /// Set the starting gold for new players.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u64) -> Self {
        self.economy.starting_gold = gold;
        self
    }

    /// Set the alliance member cap.
    #[must_use]
    pub fn with_max_members(mut self, max: usize) -> Self {
        self.alliance.max_members = max;
        self
    }

    /// Set the battle cooldown in minutes.
    #[must_use]
    pub fn with_battle_cooldown(mut self, minutes: i64) -> Self {
        self.battle.cooldown_minutes = minutes;
        self
    }

    /// Set the draw gold reward range.
    #[must_use]
    pub fn with_draw_gold(mut self, min: u64, max: u64) -> Self {
        self.draw.min_gold = min;
        self.draw.max_gold = max;
        self
    }
}
