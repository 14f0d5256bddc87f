//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: base power,
//! rarity, element and shop price. A player's copy of a card (its level and
//! acquisition time) is stored separately in `OwnedCard`.

use serde::{Deserialize, Serialize};

use super::instance::MAX_LEVEL;
use crate::error::{GameError, Result};

/// Unique identifier for a card definition (e.g. `"pikachu"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Rarity tier, ordered from most to least common.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers in ascending order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use card_arena::cards::{CardDefinition, Rarity};
///
/// let card = CardDefinition::new("charmander", "Charmander", 40, Rarity::Common, "fire", 100);
///
/// assert_eq!(card.power_at_level(2).unwrap(), 80);
/// assert_eq!(card.upgrade_cost(1), 100);
/// assert_eq!(card.upgrade_cost(3), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Secondary display name (localized).
    #[serde(default)]
    pub local_name: Option<String>,

    /// Power at level 1.
    pub base_power: u64,

    pub rarity: Rarity,

    /// Elemental type tag ("fire", "water", ...). Opaque to the engine.
    #[serde(alias = "type")]
    pub element: String,

    /// Shop price, also the per-level upgrade cost base.
    pub price: u64,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_power: u64,
        rarity: Rarity,
        element: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            local_name: None,
            base_power,
            rarity,
            element: element.into(),
            price,
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Power at a level: linear in level, level 1 is the base.
    pub fn power_at_level(&self, level: u8) -> Result<u64> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(GameError::InvalidLevel(level));
        }
        Ok(self.base_power.saturating_mul(u64::from(level)))
    }

    /// Gold needed to go from `current_level` to the next level.
    ///
    /// Returns 0 for maxed cards; use `OwnedCard::can_upgrade` to tell
    /// "free" apart from "not allowed".
    #[must_use]
    pub fn upgrade_cost(&self, current_level: u8) -> u64 {
        if current_level >= MAX_LEVEL {
            return 0;
        }
        self.price.saturating_mul(u64::from(current_level))
    }
}
