//! Alliance membership, invitations and treasury.
//!
//! The alliance collection is the source of truth for membership: a player
//! belongs to the alliance whose member list contains them. `Player::alliance`
//! is kept in step by every operation here, and callers clear references that
//! no longer match (after a disband, for example).
//!
//! Engine methods mutate the players they are handed in memory and write the
//! alliance collection through the injected repository. Persisting the
//! players is the caller's job; `rollback` undoes the alliance write if that
//! fails.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::model::{Alliance, AllianceId, AllianceInvite};
use crate::core::{AllianceConfig, Player, PlayerId, Timestamp};
use crate::error::{EntityKind, GameError, Result};
use crate::store::Repository;

/// What `leave` did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// A regular member left.
    Left { alliance: Alliance },

    /// The leader left and the alliance was dissolved.
    Disbanded {
        alliance: Alliance,
        former_members: Vec<PlayerId>,
    },
}

impl LeaveOutcome {
    #[must_use]
    pub fn alliance(&self) -> &Alliance {
        match self {
            LeaveOutcome::Left { alliance } | LeaveOutcome::Disbanded { alliance, .. } => alliance,
        }
    }
}

/// Alliance operations over an injected repository.
pub struct AllianceEngine {
    alliances: Arc<dyn Repository<Alliance>>,
    invites: Mutex<FxHashMap<PlayerId, AllianceInvite>>,
    config: AllianceConfig,
}

impl AllianceEngine {
    #[must_use]
    pub fn new(alliances: Arc<dyn Repository<Alliance>>, config: AllianceConfig) -> Self {
        Self {
            alliances,
            invites: Mutex::new(FxHashMap::default()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AllianceConfig {
        &self.config
    }

    #[must_use]
    pub fn get(&self, id: &AllianceId) -> Option<Alliance> {
        self.alliances.get(id)
    }

    /// Alliance whose member list contains `player`.
    #[must_use]
    pub fn alliance_of(&self, player: &PlayerId) -> Option<Alliance> {
        self.alliances
            .list_all()
            .into_iter()
            .find(|a| a.is_member(player))
    }

    /// Every alliance, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<Alliance> {
        self.alliances.list_all()
    }

    /// Found a new alliance led by `founder`.
    pub fn create(&self, name: &str, founder: &mut Player, now: Timestamp) -> Result<Alliance> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidName);
        }
        if self.alliance_of(&founder.id).is_some() {
            return Err(GameError::AlreadyMember);
        }
        if self.alliances.list_all().iter().any(|a| a.has_name(name)) {
            return Err(GameError::NameTaken(name.to_string()));
        }

        let alliance = Alliance::new(name, founder.id.clone(), now);
        self.alliances.put(alliance.clone())?;
        founder.alliance = Some(alliance.id);

        tracing::info!("{} founded alliance {} ({})", founder.id, alliance.name, alliance.id);
        Ok(alliance)
    }

    /// Invite `target` to join. Replaces any earlier invite for `target`
    /// and sweeps out every expired one.
    pub fn invite(
        &self,
        alliance_id: &AllianceId,
        target: &PlayerId,
        inviter: &PlayerId,
        now: Timestamp,
    ) -> Result<AllianceInvite> {
        let alliance = self
            .alliances
            .get(alliance_id)
            .ok_or_else(|| GameError::not_found(EntityKind::Alliance, alliance_id))?;

        if !alliance.is_leader(inviter) {
            return Err(GameError::NotLeader);
        }
        if alliance.member_count() >= self.config.max_members {
            return Err(GameError::AllianceFull);
        }
        if self.alliance_of(target).is_some() {
            return Err(GameError::AlreadyMember);
        }

        let invite = AllianceInvite {
            alliance: alliance.id,
            alliance_name: alliance.name,
            invitee: target.clone(),
            inviter: inviter.clone(),
            created_at: now,
        };
        let ttl = self.config.invite_ttl();
        let mut invites = self.invites.lock();
        invites.retain(|_, pending| !pending.is_expired(now, ttl));
        invites.insert(target.clone(), invite.clone());
        drop(invites);

        tracing::info!("{} invited {} to {}", inviter, target, invite.alliance_name);
        Ok(invite)
    }

    /// Accept the pending invite for `target`.
    ///
    /// The invite is consumed whether or not joining succeeds.
    pub fn accept_invite(&self, target: &mut Player, now: Timestamp) -> Result<Alliance> {
        let invite = self
            .invites
            .lock()
            .remove(&target.id)
            .ok_or(GameError::NoPendingInvite)?;

        if invite.is_expired(now, self.config.invite_ttl()) {
            return Err(GameError::InviteExpired);
        }

        let mut alliance = self
            .alliances
            .get(&invite.alliance)
            .ok_or_else(|| GameError::not_found(EntityKind::Alliance, invite.alliance))?;

        if alliance.member_count() >= self.config.max_members {
            return Err(GameError::AllianceFull);
        }
        if self.alliance_of(&target.id).is_some() {
            return Err(GameError::AlreadyMember);
        }

        alliance.members.push(target.id.clone());
        self.alliances.put(alliance.clone())?;
        target.alliance = Some(alliance.id);

        tracing::info!("{} joined alliance {}", target.id, alliance.name);
        Ok(alliance)
    }

    /// Drop the pending invite for `target`. Returns whether one existed.
    pub fn decline_invite(&self, target: &PlayerId) -> bool {
        self.invites.lock().remove(target).is_some()
    }

    /// The live invite for `target`, discarding it if expired.
    pub fn pending_invite(&self, target: &PlayerId, now: Timestamp) -> Option<AllianceInvite> {
        let mut invites = self.invites.lock();
        let invite = invites.get(target)?;
        if invite.is_expired(now, self.config.invite_ttl()) {
            invites.remove(target);
            return None;
        }
        Some(invite.clone())
    }

    /// Leave the current alliance. A leaving leader dissolves it.
    ///
    /// Only `member` is updated; on a disband the caller clears the other
    /// `former_members`' references.
    pub fn leave(&self, member: &mut Player) -> Result<LeaveOutcome> {
        let Some(mut alliance) = self.alliance_of(&member.id) else {
            member.alliance = None;
            return Err(GameError::NotMember);
        };

        if alliance.is_leader(&member.id) {
            self.alliances.remove(&alliance.id)?;
            member.alliance = None;

            let former_members = alliance.members.to_vec();
            tracing::info!(
                "Alliance {} disbanded by {} ({} members)",
                alliance.name,
                member.id,
                former_members.len()
            );
            return Ok(LeaveOutcome::Disbanded {
                alliance,
                former_members,
            });
        }

        alliance.remove_member(&member.id);
        self.alliances.put(alliance.clone())?;
        member.alliance = None;

        tracing::info!("{} left alliance {}", member.id, alliance.name);
        Ok(LeaveOutcome::Left { alliance })
    }

    /// Move gold from a member into the treasury.
    pub fn donate(&self, member: &mut Player, amount: u64) -> Result<Alliance> {
        let mut alliance = self.alliance_of(&member.id).ok_or(GameError::NotMember)?;

        if member.gold < amount {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: member.gold,
            });
        }

        alliance.treasury += amount;
        alliance.stats.total_donations += amount;
        self.alliances.put(alliance.clone())?;

        member.withdraw(amount)?;
        member.stats.gold_donated += amount;

        tracing::info!("{} donated {} gold to {}", member.id, amount, alliance.name);
        Ok(alliance)
    }

    /// Move gold from the treasury to the leader.
    pub fn withdraw(&self, leader: &mut Player, amount: u64) -> Result<Alliance> {
        let mut alliance = self.alliance_of(&leader.id).ok_or(GameError::NotMember)?;

        if !alliance.is_leader(&leader.id) {
            return Err(GameError::NotLeader);
        }
        if alliance.treasury < amount {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: alliance.treasury,
            });
        }

        alliance.treasury -= amount;
        self.alliances.put(alliance.clone())?;

        leader.gold += amount;
        leader.stats.gold_received += amount;

        tracing::info!("{} withdrew {} gold from {}", leader.id, amount, alliance.name);
        Ok(alliance)
    }

    /// Count a battle for an alliance.
    pub fn record_battle(&self, id: &AllianceId, won: bool) -> Result<()> {
        let Some(mut alliance) = self.alliances.get(id) else {
            return Ok(());
        };
        alliance.stats.total_battles += 1;
        if won {
            alliance.stats.battles_won += 1;
        }
        self.alliances.put(alliance)?;
        Ok(())
    }

    /// Store a freshly computed power total.
    pub fn update_power(&self, id: &AllianceId, total_power: u64) -> Result<Option<Alliance>> {
        let Some(mut alliance) = self.alliances.get(id) else {
            return Ok(None);
        };
        if alliance.stats.total_power != total_power {
            alliance.stats.total_power = total_power;
            self.alliances.put(alliance.clone())?;
        }
        Ok(Some(alliance))
    }

    /// Strongest alliances: `total_power` desc, then `battles_won` desc.
    #[must_use]
    pub fn top_alliances(&self, count: usize) -> Vec<Alliance> {
        let mut all = self.alliances.list_all();
        all.sort_by(|a, b| {
            b.stats
                .total_power
                .cmp(&a.stats.total_power)
                .then_with(|| b.stats.battles_won.cmp(&a.stats.battles_won))
        });
        all.truncate(count);
        all
    }

    /// Restore an alliance to `before` after a failed follow-up write.
    ///
    /// `None` means the alliance did not exist before.
    pub fn rollback(&self, id: &AllianceId, before: Option<Alliance>) {
        let restored = match before {
            Some(alliance) => self.alliances.put(alliance),
            None => self.alliances.remove(id).map(|_| ()),
        };
        if let Err(e) = restored {
            tracing::warn!("Rollback of alliance {} failed: {}", id, e);
        }
    }
}
