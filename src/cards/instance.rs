//! Owned cards - a player's copy of a card definition.
//!
//! Only the level changes after acquisition, and only upward.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::Timestamp;
use crate::error::{GameError, Result};

/// Highest level a card can reach.
pub const MAX_LEVEL: u8 = 3;

/// A card in a player's collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCard {
    pub card_id: CardId,

    /// Always in `1..=MAX_LEVEL`.
    pub level: u8,

    pub acquired_at: Timestamp,
}

impl OwnedCard {
    /// A fresh level-1 copy.
    #[must_use]
    pub fn new(card_id: CardId, acquired_at: Timestamp) -> Self {
        Self {
            card_id,
            level: 1,
            acquired_at,
        }
    }

    #[must_use]
    pub fn can_upgrade(&self) -> bool {
        self.level < MAX_LEVEL
    }

    /// Raise the level by one.
    pub fn level_up(&mut self) -> Result<u8> {
        if !self.can_upgrade() {
            return Err(GameError::AlreadyMaxLevel);
        }
        self.level += 1;
        Ok(self.level)
    }
}
