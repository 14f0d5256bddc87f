//! Alliance records and invitations.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::core::{PlayerId, Timestamp};
use crate::store::Keyed;

/// Unique alliance identifier (UUID v4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllianceId(Uuid);

impl AllianceId {
    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AllianceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AllianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AllianceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Member list, inline up to the default cap.
pub type Members = SmallVec<[PlayerId; 10]>;

/// Cumulative alliance counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllianceStats {
    pub total_battles: u64,
    pub battles_won: u64,
    pub total_donations: u64,

    /// Sum of members' card power, refreshed when the alliance is viewed.
    pub total_power: u64,
}

impl AllianceStats {
    /// Win percentage, 0 when no battles have been fought.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.0;
        }
        self.battles_won as f64 / self.total_battles as f64 * 100.0
    }
}

/// A guild with a shared treasury.
///
/// The leader is always a member. Member order is join order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub name: String,
    pub leader: PlayerId,
    pub members: Members,
    pub treasury: u64,
    pub created_at: Timestamp,

    #[serde(default)]
    pub stats: AllianceStats,
}

impl Alliance {
    /// A new alliance whose only member is its founder.
    #[must_use]
    pub fn new(name: impl Into<String>, founder: PlayerId, now: Timestamp) -> Self {
        let mut members = Members::new();
        members.push(founder.clone());
        Self {
            id: AllianceId::new(),
            name: name.into(),
            leader: founder,
            members,
            treasury: 0,
            created_at: now,
            stats: AllianceStats::default(),
        }
    }

    #[must_use]
    pub fn is_member(&self, player: &PlayerId) -> bool {
        self.members.contains(player)
    }

    #[must_use]
    pub fn is_leader(&self, player: &PlayerId) -> bool {
        &self.leader == player
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub(crate) fn remove_member(&mut self, player: &PlayerId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != player);
        self.members.len() != before
    }
}

impl Keyed for Alliance {
    type Key = AllianceId;

    fn key(&self) -> AllianceId {
        self.id
    }
}

/// A pending invitation. At most one per invitee; held in memory only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceInvite {
    pub alliance: AllianceId,
    pub alliance_name: String,
    pub invitee: PlayerId,
    pub inviter: PlayerId,
    pub created_at: Timestamp,
}

impl AllianceInvite {
    /// Expired only when strictly older than `ttl`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}
