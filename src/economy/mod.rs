//! Economy: energy gating and the card draw.
//!
//! ## Key Types
//!
//! - `Energy`: Lazily regenerated draw charges plus the draw cooldown
//! - `RarityTable`: Cumulative tier probabilities
//! - `DrawOutcome`: What a successful draw produced

pub mod draw;
pub mod energy;

pub use draw::{draw, pick_card, DrawOutcome, RarityTable};
pub use energy::Energy;
