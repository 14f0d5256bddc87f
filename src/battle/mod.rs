//! PvP battles.
//!
//! ## Key Types
//!
//! - `BattleResolver`: Cooldown check, power comparison and gold transfer
//! - `BattleRolls`: The random inputs of one fight
//! - `BattleReport`: Serializable record of the result

pub mod resolver;

pub use resolver::{power, steal_amount, BattleReport, BattleResolver, BattleRolls, Side};
