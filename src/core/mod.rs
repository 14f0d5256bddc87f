//! Core types: players, clock, RNG and configuration.
//!
//! These are the leaf building blocks every engine depends on.

pub mod clock;
pub mod config;
pub mod player;
pub mod rng;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{
    AllianceConfig, BattleConfig, DrawConfig, EconomyConfig, EnergyConfig, EngineConfig,
};
pub use player::{Player, PlayerId, PlayerStats};
pub use rng::GameRng;
