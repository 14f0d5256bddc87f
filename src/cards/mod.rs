//! Card system: definitions, owned copies, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `Rarity`: Five ordered tiers controlling draw odds
//! - `CardDefinition`: Static card data plus power and upgrade formulas
//! - `OwnedCard`: A player's copy of a card, with its level
//! - `CardCatalog`: Read-only definition lookup and shop order

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, Rarity};
pub use instance::{OwnedCard, MAX_LEVEL};
pub use registry::CardCatalog;
