//! Typed results of service commands.
//!
//! These carry data only. Turning them into chat replies (wording, emoji,
//! localization) belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::alliance::{Alliance, AllianceId};
use crate::cards::{CardDefinition, CardId, Rarity};
use crate::core::{PlayerId, PlayerStats};

/// Energy as seen at a point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyView {
    pub charge: u8,
    pub max_charge: u8,
    pub next_draw_secs: i64,
    pub next_charge_secs: i64,
}

/// One owned card with its resolved power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub card_id: CardId,
    pub name: String,
    pub rarity: Rarity,
    pub level: u8,
    pub power: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceSummary {
    pub id: AllianceId,
    pub name: String,
    pub member_count: usize,
    pub is_leader: bool,
}

/// Everything `show_profile` reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: PlayerId,
    pub name: String,
    pub gold: u64,
    pub total_power: u64,
    pub card_count: usize,
    pub energy: EnergyView,
    pub stats: PlayerStats,
    pub win_rate: f64,
    pub alliance: Option<AllianceSummary>,

    /// Strongest cards first, at most five.
    pub top_cards: Vec<CardView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub card: CardDefinition,
    pub price: u64,
    pub gold_left: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeOutcome {
    pub card_id: CardId,
    pub new_level: u8,
    pub cost: u64,
    pub new_power: u64,
    pub gold_left: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostOutcome {
    pub cost: u64,
    pub charge: u8,
    pub gold_left: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBoostOutcome {
    pub cost: u64,

    /// Room members whose energy was refilled.
    pub restored: Vec<PlayerId>,

    /// Room member ids with no player record.
    pub skipped: Vec<PlayerId>,

    pub gold_left: u64,
}

impl GroupBoostOutcome {
    #[must_use]
    pub fn restored_count(&self) -> usize {
        self.restored.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationOutcome {
    pub donor: PlayerId,
    pub recipient: PlayerId,
    pub amount: u64,
    pub donor_gold: u64,
    pub recipient_gold: u64,
}

/// Result of a treasury deposit or withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryOutcome {
    pub alliance: Alliance,
    pub amount: u64,
    pub gold_left: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: PlayerId,
    pub name: String,
    pub power: u64,
    pub is_leader: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllianceView {
    pub alliance: Alliance,
    pub win_rate: f64,
    pub members: Vec<MemberView>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub battles_won: u64,
    pub gold: u64,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceLeaderboardEntry {
    pub rank: usize,
    pub id: AllianceId,
    pub name: String,
    pub total_power: u64,
    pub battles_won: u64,
    pub member_count: usize,
}
