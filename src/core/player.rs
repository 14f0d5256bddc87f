//! Player identification and the player aggregate.
//!
//! ## PlayerId
//!
//! Opaque chat-platform user id. Ordered, so multi-player operations can take
//! locks in a fixed order.
//!
//! ## Player
//!
//! Everything the engine knows about one player: gold, owned cards, energy,
//! battle cooldown, stats and alliance membership. One aggregate is read,
//! mutated in memory and written back by each operation.

use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use crate::alliance::AllianceId;
use crate::cards::{CardCatalog, CardId, OwnedCard};
use crate::economy::Energy;
use crate::store::Keyed;

/// Chat-platform user identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Cumulative per-player counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub total_draws: u64,
    pub total_battles: u64,
    pub battles_won: u64,
    pub battles_lost: u64,
    pub gold_earned: u64,
    pub gold_spent: u64,
    pub cards_collected: u64,
    pub cards_upgraded: u64,
    pub boosts_used: u64,
    pub gold_donated: u64,
    pub gold_received: u64,
}

impl PlayerStats {
    /// Win percentage, 0 when no battles have been fought.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.0;
        }
        self.battles_won as f64 / self.total_battles as f64 * 100.0
    }
}

/// The player aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,

    /// Currency balance. Unsigned, so it can never go negative.
    pub gold: u64,

    /// Owned cards in acquisition order. Duplicates allowed.
    #[serde(default)]
    pub cards: Vec<OwnedCard>,

    pub energy: Energy,

    /// When this player last started a battle.
    #[serde(default)]
    pub last_battle_at: Option<Timestamp>,

    #[serde(default)]
    pub stats: PlayerStats,

    #[serde(default)]
    pub alliance: Option<AllianceId>,
}

impl Player {
    /// Create a fresh player: no cards, full energy.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        starting_gold: u64,
        max_charge: u8,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            gold: starting_gold,
            cards: Vec::new(),
            energy: Energy::full(max_charge, now),
            last_battle_at: None,
            stats: PlayerStats::default(),
            alliance: None,
        }
    }

    /// Append a level-1 copy of a card.
    pub fn add_card(&mut self, card_id: CardId, now: Timestamp) {
        self.cards.push(OwnedCard::new(card_id, now));
    }

    /// First owned copy of a card, if any.
    #[must_use]
    pub fn card(&self, card_id: &CardId) -> Option<&OwnedCard> {
        self.cards.iter().find(|c| &c.card_id == card_id)
    }

    #[must_use]
    pub fn has_card(&self, card_id: &CardId) -> bool {
        self.card(card_id).is_some()
    }

    /// Aggregate combat strength against the catalog.
    ///
    /// Cards missing from the catalog contribute nothing.
    #[must_use]
    pub fn total_power(&self, catalog: &CardCatalog) -> u64 {
        self.cards
            .iter()
            .filter_map(|owned| {
                let def = catalog.lookup(&owned.card_id)?;
                def.power_at_level(owned.level).ok()
            })
            .fold(0u64, u64::saturating_add)
    }

    /// Add gold earned from play (draws, battles).
    pub fn earn(&mut self, amount: u64) {
        self.gold += amount;
        self.stats.gold_earned += amount;
    }

    /// Pay a price, recording it as spent. Fails without change if short.
    pub fn spend(&mut self, amount: u64) -> crate::Result<()> {
        self.withdraw(amount)?;
        self.stats.gold_spent += amount;
        Ok(())
    }

    /// Remove gold without touching stats. Fails without change if short.
    pub(crate) fn withdraw(&mut self, amount: u64) -> crate::Result<()> {
        if self.gold < amount {
            return Err(crate::GameError::InsufficientFunds {
                required: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }
}

impl Keyed for Player {
    type Key = PlayerId;

    fn key(&self) -> PlayerId {
        self.id.clone()
    }
}
