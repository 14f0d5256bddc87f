//! The game service: one method per chat command.
//!
//! Each command loads the aggregates it needs, runs one engine operation in
//! memory and writes the result back as one unit. Work on a player runs
//! under that player's lock; commands touching several players lock them
//! all in id order. Commands that change the alliance collection also hold
//! the alliance lock, always taken after the player locks.
//!
//! Players are created on first interaction. A player named as the *target*
//! of a command (battle defender, donation recipient, invitee) must already
//! exist.

use std::sync::Arc;

use parking_lot::Mutex;

use super::outcome::{
    AllianceLeaderboardEntry, AllianceSummary, AllianceView, BoostOutcome, CardView,
    DonationOutcome, EnergyView, GroupBoostOutcome, LeaderboardEntry, MemberView, ProfileView,
    PurchaseOutcome, TreasuryOutcome, UpgradeOutcome,
};
use crate::alliance::{Alliance, AllianceEngine, AllianceId, AllianceInvite, LeaveOutcome};
use crate::battle::{BattleReport, BattleResolver};
use crate::cards::{CardCatalog, CardDefinition, CardId};
use crate::core::{
    Clock, EngineConfig, GameRng, Player, PlayerId, SystemClock, Timestamp,
};
use crate::economy::{self, DrawOutcome};
use crate::error::{EntityKind, GameError, Result};
use crate::store::{KeyedLocks, MemoryRepository, Repository};

/// How many cards a profile lists.
const PROFILE_TOP_CARDS: usize = 5;

/// Builder for `GameService`.
///
/// Anything not set falls back to an in-memory, entropy-seeded service on
/// the system clock with an empty catalog.
#[derive(Default)]
pub struct GameServiceBuilder {
    config: EngineConfig,
    catalog: CardCatalog,
    players: Option<Arc<dyn Repository<Player>>>,
    alliances: Option<Arc<dyn Repository<Alliance>>>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
}

impl GameServiceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_players(mut self, players: Arc<dyn Repository<Player>>) -> Self {
        self.players = Some(players);
        self
    }

    #[must_use]
    pub fn with_alliances(mut self, alliances: Arc<dyn Repository<Alliance>>) -> Self {
        self.alliances = Some(alliances);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the RNG for reproducible draws and battles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn build(self) -> GameService {
        let players = self
            .players
            .unwrap_or_else(|| Arc::new(MemoryRepository::<Player>::new()));
        let alliances = self
            .alliances
            .unwrap_or_else(|| Arc::new(MemoryRepository::<Alliance>::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let rng = self.seed.map_or_else(GameRng::from_entropy, GameRng::new);

        tracing::info!(
            "Game service ready: {} cards, rng seed {}",
            self.catalog.len(),
            rng.seed()
        );

        GameService {
            alliances: AllianceEngine::new(alliances, self.config.alliance.clone()),
            config: self.config,
            catalog: Arc::new(self.catalog),
            players,
            clock,
            rng: Mutex::new(rng),
            player_locks: KeyedLocks::new(),
            alliance_lock: Mutex::new(()),
        }
    }
}

/// The command surface of the game.
pub struct GameService {
    config: EngineConfig,
    catalog: Arc<CardCatalog>,
    players: Arc<dyn Repository<Player>>,
    alliances: AllianceEngine,
    clock: Arc<dyn Clock>,
    rng: Mutex<GameRng>,
    player_locks: KeyedLocks<PlayerId>,
    alliance_lock: Mutex<()>,
}

impl GameService {
    #[must_use]
    pub fn builder() -> GameServiceBuilder {
        GameServiceBuilder::new()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Stored player record, without creating one.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn alliance(&self, id: &AllianceId) -> Option<Alliance> {
        self.alliances.get(id)
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Load a stored player with energy regenerated to `now`.
    ///
    /// A regeneration tick is written back at once, so the discarded partial
    /// interval stays discarded even if the command then fails. Call with
    /// the player's lock held.
    fn load_player(&self, id: &PlayerId, now: Timestamp) -> Result<Option<Player>> {
        let Some(mut player) = self.players.get(id) else {
            return Ok(None);
        };
        let last_regen = player.energy.last_regen_at;
        player.energy.regenerate(&self.config.energy, now);
        if player.energy.last_regen_at != last_regen {
            self.players.put(player.clone())?;
        }
        Ok(Some(player))
    }

    /// Load a player, or build a fresh (unsaved) one. The flag is `true`
    /// for a new player.
    fn get_or_create(&self, id: &PlayerId, now: Timestamp) -> Result<(Player, bool)> {
        if let Some(player) = self.load_player(id, now)? {
            return Ok((player, false));
        }
        let player = Player::new(
            id.clone(),
            id.as_str(),
            self.config.economy.starting_gold,
            self.config.energy.max_charge,
            now,
        );
        Ok((player, true))
    }

    fn require_player(&self, id: &PlayerId, now: Timestamp) -> Result<Player> {
        self.load_player(id, now)?
            .ok_or_else(|| GameError::not_found(EntityKind::Player, id))
    }

    /// Bring `player.alliance` in line with the alliance collection.
    ///
    /// Returns the actual alliance and whether the player record changed.
    fn sync_membership(&self, player: &mut Player) -> (Option<Alliance>, bool) {
        let actual = self.alliances.alliance_of(&player.id);
        let actual_id = actual.as_ref().map(|a| a.id);
        if player.alliance == actual_id {
            return (actual, false);
        }
        tracing::debug!(
            "Clearing stale alliance reference for {}: {:?} -> {:?}",
            player.id,
            player.alliance,
            actual_id
        );
        player.alliance = actual_id;
        (actual, true)
    }

    /// Persist players after an alliance write, undoing the alliance write
    /// if the players cannot be saved.
    fn commit_players(
        &self,
        players: Vec<Player>,
        alliance: &AllianceId,
        before: Option<Alliance>,
    ) -> Result<()> {
        if let Err(e) = self.players.put_all(players) {
            tracing::warn!("Player write failed, rolling back alliance {}: {}", alliance, e);
            self.alliances.rollback(alliance, before);
            return Err(e.into());
        }
        Ok(())
    }

    fn alliance_power(&self, alliance: &Alliance) -> u64 {
        alliance
            .members
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| p.total_power(&self.catalog))
            .fold(0u64, u64::saturating_add)
    }

    // === Registration and profile ===

    /// Get or create a player. A non-empty `name` replaces the stored one.
    pub fn register(&self, id: &PlayerId, name: &str) -> Result<Player> {
        self.player_locks.with_lock(id, || -> Result<Player> {
            let (mut player, created) = self.get_or_create(id, self.now())?;
            let name = name.trim();
            let renamed = !name.is_empty() && player.name != name;
            if renamed {
                player.name = name.to_string();
            }
            if created || renamed {
                self.players.put(player.clone())?;
            }
            if created {
                tracing::info!("Registered player {} ({})", player.id, player.name);
            }
            Ok(player)
        })
    }

    pub fn show_profile(&self, id: &PlayerId) -> Result<ProfileView> {
        self.player_locks.with_lock(id, || -> Result<ProfileView> {
            let now = self.now();
            let (mut player, created) = self.get_or_create(id, now)?;
            let (alliance, changed) = self.sync_membership(&mut player);
            if created || changed {
                self.players.put(player.clone())?;
            }
            Ok(self.profile_view(&player, alliance.as_ref(), now))
        })
    }

    fn profile_view(&self, player: &Player, alliance: Option<&Alliance>, now: Timestamp) -> ProfileView {
        let energy = &self.config.energy;

        let mut top_cards: Vec<CardView> = player
            .cards
            .iter()
            .filter_map(|owned| {
                let def = self.catalog.lookup(&owned.card_id)?;
                Some(CardView {
                    card_id: owned.card_id.clone(),
                    name: def.name.clone(),
                    rarity: def.rarity,
                    level: owned.level,
                    power: def.power_at_level(owned.level).ok()?,
                })
            })
            .collect();
        top_cards.sort_by(|a, b| b.power.cmp(&a.power));
        top_cards.truncate(PROFILE_TOP_CARDS);

        ProfileView {
            id: player.id.clone(),
            name: player.name.clone(),
            gold: player.gold,
            total_power: player.total_power(&self.catalog),
            card_count: player.cards.len(),
            energy: EnergyView {
                charge: player.energy.charge_at(energy, now),
                max_charge: energy.max_charge,
                next_draw_secs: player.energy.time_until_next_draw(energy, now).num_seconds(),
                next_charge_secs: player.energy.time_until_next_charge(energy, now).num_seconds(),
            },
            stats: player.stats.clone(),
            win_rate: player.stats.win_rate(),
            alliance: alliance.map(|a| AllianceSummary {
                id: a.id,
                name: a.name.clone(),
                member_count: a.member_count(),
                is_leader: a.is_leader(&player.id),
            }),
            top_cards,
        }
    }

    // === Cards ===

    pub fn draw(&self, id: &PlayerId) -> Result<DrawOutcome> {
        self.player_locks.with_lock(id, || -> Result<DrawOutcome> {
            let now = self.now();
            let (mut player, _) = self.get_or_create(id, now)?;
            let outcome = {
                let mut rng = self.rng.lock();
                economy::draw(&mut player, &self.catalog, &mut rng, now, &self.config)?
            };
            self.players.put(player)?;
            Ok(outcome)
        })
    }

    /// Shop listing: every card, cheapest first.
    #[must_use]
    pub fn list_shop(&self) -> Vec<CardDefinition> {
        self.catalog.all().to_vec()
    }

    pub fn purchase(&self, id: &PlayerId, card_id: &CardId) -> Result<PurchaseOutcome> {
        let card = self.catalog.get(card_id)?.clone();

        self.player_locks.with_lock(id, || -> Result<PurchaseOutcome> {
            let now = self.now();
            let (mut player, _) = self.get_or_create(id, now)?;
            player.spend(card.price)?;
            player.add_card(card.id.clone(), now);
            player.stats.cards_collected += 1;

            let gold_left = player.gold;
            self.players.put(player)?;

            tracing::info!("{} bought {} for {} gold", id, card.id, card.price);
            Ok(PurchaseOutcome {
                price: card.price,
                card,
                gold_left,
            })
        })
    }

    /// Upgrade the first copy of `card_id` that is below max level.
    pub fn upgrade(&self, id: &PlayerId, card_id: &CardId) -> Result<UpgradeOutcome> {
        self.player_locks.with_lock(id, || -> Result<UpgradeOutcome> {
            let (mut player, _) = self.get_or_create(id, self.now())?;
            if !player.has_card(card_id) {
                return Err(GameError::not_found(EntityKind::OwnedCard, card_id));
            }
            let def = self.catalog.get(card_id)?;

            let index = player
                .cards
                .iter()
                .position(|c| &c.card_id == card_id && c.can_upgrade())
                .ok_or(GameError::AlreadyMaxLevel)?;
            let cost = def.upgrade_cost(player.cards[index].level);

            player.spend(cost)?;
            let new_level = player.cards[index].level_up()?;
            player.stats.cards_upgraded += 1;
            let new_power = def.power_at_level(new_level)?;

            let gold_left = player.gold;
            self.players.put(player)?;

            tracing::info!("{} upgraded {} to level {} for {} gold", id, card_id, new_level, cost);
            Ok(UpgradeOutcome {
                card_id: card_id.clone(),
                new_level,
                cost,
                new_power,
                gold_left,
            })
        })
    }

    // === Battle ===

    pub fn battle(&self, attacker: &PlayerId, defender: &PlayerId) -> Result<BattleReport> {
        if attacker == defender {
            return Err(GameError::SelfTarget);
        }

        let keys = [attacker.clone(), defender.clone()];
        self.player_locks.with_locks(keys, || -> Result<BattleReport> {
            let now = self.now();
            let (mut attacking, _) = self.get_or_create(attacker, now)?;
            let mut defending = self.require_player(defender, now)?;

            let report = {
                let mut rng = self.rng.lock();
                BattleResolver::resolve(
                    &mut attacking,
                    &mut defending,
                    &self.catalog,
                    &mut rng,
                    now,
                    &self.config.battle,
                )?
            };

            self.players.put_all(vec![attacking, defending])?;
            self.record_alliance_battle(&report);
            Ok(report)
        })
    }

    /// Credit the battle to each side's alliance. Failures are logged only;
    /// the battle itself is already saved.
    fn record_alliance_battle(&self, report: &BattleReport) {
        let _alliances = self.alliance_lock.lock();
        for (player, won) in [(report.winner_id(), true), (report.loser_id(), false)] {
            let Some(alliance) = self.alliances.alliance_of(player) else {
                continue;
            };
            if let Err(e) = self.alliances.record_battle(&alliance.id, won) {
                tracing::warn!("Failed to record battle for alliance {}: {}", alliance.id, e);
            }
        }
    }

    // === Boosts and gifts ===

    /// Pay to refill your own energy.
    pub fn personal_boost(&self, id: &PlayerId) -> Result<BoostOutcome> {
        let cost = self.config.economy.personal_boost_cost;

        self.player_locks.with_lock(id, || -> Result<BoostOutcome> {
            let now = self.now();
            let (mut player, _) = self.get_or_create(id, now)?;
            player.spend(cost)?;
            player.energy.restore_full(&self.config.energy, now);
            player.stats.boosts_used += 1;

            let outcome = BoostOutcome {
                cost,
                charge: player.energy.charge,
                gold_left: player.gold,
            };
            self.players.put(player)?;

            tracing::info!("{} used a personal boost", id);
            Ok(outcome)
        })
    }

    /// Pay to refill the energy of everyone in the room.
    ///
    /// Only listed ids are restored (include the buyer to restore them too).
    /// Ids with no player record are skipped and reported.
    pub fn group_boost(&self, buyer: &PlayerId, room_members: &[PlayerId]) -> Result<GroupBoostOutcome> {
        let cost = self.config.economy.group_boost_cost;

        let mut members: Vec<PlayerId> = Vec::with_capacity(room_members.len());
        for id in room_members {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }

        let mut keys = members.clone();
        keys.push(buyer.clone());

        self.player_locks.with_locks(keys, || -> Result<GroupBoostOutcome> {
            let now = self.now();
            let energy = &self.config.energy;
            let (mut paying, _) = self.get_or_create(buyer, now)?;
            paying.spend(cost)?;
            paying.stats.boosts_used += 1;

            let mut restored = Vec::new();
            let mut skipped = Vec::new();
            let mut updated = Vec::new();

            for id in &members {
                if id == buyer {
                    paying.energy.restore_full(energy, now);
                    restored.push(id.clone());
                    continue;
                }
                match self.players.get(id) {
                    Some(mut member) => {
                        member.energy.restore_full(energy, now);
                        restored.push(id.clone());
                        updated.push(member);
                    }
                    None => skipped.push(id.clone()),
                }
            }

            let gold_left = paying.gold;
            updated.push(paying);
            self.players.put_all(updated)?;

            tracing::info!(
                "{} used a group boost: {} restored, {} skipped",
                buyer,
                restored.len(),
                skipped.len()
            );
            Ok(GroupBoostOutcome {
                cost,
                restored,
                skipped,
                gold_left,
            })
        })
    }

    /// Give gold to another player.
    pub fn donate_gold(&self, donor: &PlayerId, recipient: &PlayerId, amount: u64) -> Result<DonationOutcome> {
        if donor == recipient {
            return Err(GameError::SelfTarget);
        }
        let minimum = self.config.economy.min_donation;
        if amount < minimum {
            return Err(GameError::BelowMinimum { minimum, amount });
        }

        let keys = [donor.clone(), recipient.clone()];
        self.player_locks.with_locks(keys, || -> Result<DonationOutcome> {
            let now = self.now();
            let (mut giving, _) = self.get_or_create(donor, now)?;
            let mut receiving = self.require_player(recipient, now)?;

            giving.withdraw(amount)?;
            giving.stats.gold_donated += amount;
            receiving.gold += amount;
            receiving.stats.gold_received += amount;

            let outcome = DonationOutcome {
                donor: donor.clone(),
                recipient: recipient.clone(),
                amount,
                donor_gold: giving.gold,
                recipient_gold: receiving.gold,
            };
            self.players.put_all(vec![giving, receiving])?;

            tracing::info!("{} donated {} gold to {}", donor, amount, recipient);
            Ok(outcome)
        })
    }

    // === Alliances ===

    pub fn alliance_create(&self, name: &str, founder: &PlayerId) -> Result<Alliance> {
        self.player_locks.with_lock(founder, || -> Result<Alliance> {
            let _alliances = self.alliance_lock.lock();
            let now = self.now();
            let (mut player, _) = self.get_or_create(founder, now)?;

            let alliance = self.alliances.create(name, &mut player, now)?;
            self.commit_players(vec![player], &alliance.id, None)?;
            Ok(alliance)
        })
    }

    pub fn alliance_invite(
        &self,
        alliance: &AllianceId,
        target: &PlayerId,
        inviter: &PlayerId,
    ) -> Result<AllianceInvite> {
        if self.players.get(target).is_none() {
            return Err(GameError::not_found(EntityKind::Player, target));
        }
        let _alliances = self.alliance_lock.lock();
        self.alliances.invite(alliance, target, inviter, self.now())
    }

    pub fn alliance_accept_invite(&self, target: &PlayerId) -> Result<Alliance> {
        self.player_locks.with_lock(target, || -> Result<Alliance> {
            let _alliances = self.alliance_lock.lock();
            let now = self.now();
            let (mut player, _) = self.get_or_create(target, now)?;

            let alliance = self.alliances.accept_invite(&mut player, now)?;
            let mut before = alliance.clone();
            before.remove_member(target);

            self.commit_players(vec![player], &alliance.id, Some(before))?;
            Ok(alliance)
        })
    }

    /// Returns whether there was an invite to decline.
    pub fn alliance_decline_invite(&self, target: &PlayerId) -> bool {
        self.alliances.decline_invite(target)
    }

    #[must_use]
    pub fn alliance_pending_invite(&self, target: &PlayerId) -> Option<AllianceInvite> {
        self.alliances.pending_invite(target, self.now())
    }

    /// Leave your alliance. If you lead it, it is dissolved and every former
    /// member's reference is cleared in the same write.
    pub fn alliance_leave(&self, member: &PlayerId) -> Result<LeaveOutcome> {
        let mut keys: Vec<PlayerId> = self
            .alliances
            .alliance_of(member)
            .map(|a| a.members.to_vec())
            .unwrap_or_default();
        keys.push(member.clone());
        let locked = keys.clone();

        self.player_locks.with_locks(keys, || -> Result<LeaveOutcome> {
            let _alliances = self.alliance_lock.lock();
            let now = self.now();
            let (mut player, _) = self.get_or_create(member, now)?;
            let before = self.alliances.alliance_of(member);

            let outcome = self.alliances.leave(&mut player)?;

            let mut updated = Vec::new();
            if let LeaveOutcome::Disbanded {
                alliance,
                former_members,
            } = &outcome
            {
                // Members who joined after we picked the locks keep a stale
                // reference until their next profile or alliance view.
                for id in former_members.iter().filter(|id| *id != member && locked.contains(id)) {
                    if let Some(mut former) = self.players.get(id) {
                        if former.alliance == Some(alliance.id) {
                            former.alliance = None;
                            updated.push(former);
                        }
                    }
                }
            }
            updated.push(player);

            self.commit_players(updated, &outcome.alliance().id, before)?;
            Ok(outcome)
        })
    }

    /// Your alliance with fresh member power totals.
    pub fn alliance_show(&self, id: &PlayerId) -> Result<AllianceView> {
        self.player_locks.with_lock(id, || -> Result<AllianceView> {
            let _alliances = self.alliance_lock.lock();
            let (mut player, created) = self.get_or_create(id, self.now())?;
            let (alliance, changed) = self.sync_membership(&mut player);
            if created || changed {
                self.players.put(player.clone())?;
            }
            let alliance = alliance.ok_or(GameError::NotMember)?;

            let members: Vec<MemberView> = alliance
                .members
                .iter()
                .map(|member_id| {
                    let member = if member_id == id {
                        Some(player.clone())
                    } else {
                        self.players.get(member_id)
                    };
                    MemberView {
                        id: member_id.clone(),
                        name: member
                            .as_ref()
                            .map_or_else(|| member_id.to_string(), |m| m.name.clone()),
                        power: member.map_or(0, |m| m.total_power(&self.catalog)),
                        is_leader: alliance.is_leader(member_id),
                    }
                })
                .collect();

            let total_power = members.iter().map(|m| m.power).fold(0u64, u64::saturating_add);
            let alliance = self
                .alliances
                .update_power(&alliance.id, total_power)?
                .unwrap_or(alliance);

            Ok(AllianceView {
                win_rate: alliance.stats.win_rate(),
                alliance,
                members,
            })
        })
    }

    pub fn alliance_donate(&self, member: &PlayerId, amount: u64) -> Result<TreasuryOutcome> {
        let minimum = self.config.economy.min_donation;
        if amount < minimum {
            return Err(GameError::BelowMinimum { minimum, amount });
        }

        self.player_locks.with_lock(member, || -> Result<TreasuryOutcome> {
            let _alliances = self.alliance_lock.lock();
            let (mut player, _) = self.get_or_create(member, self.now())?;
            let before = self.alliances.alliance_of(member);

            let alliance = self.alliances.donate(&mut player, amount)?;
            let gold_left = player.gold;
            self.commit_players(vec![player], &alliance.id, before)?;

            Ok(TreasuryOutcome {
                alliance,
                amount,
                gold_left,
            })
        })
    }

    /// Leader-only: move treasury gold to yourself.
    pub fn alliance_withdraw(&self, leader: &PlayerId, amount: u64) -> Result<TreasuryOutcome> {
        if amount == 0 {
            return Err(GameError::BelowMinimum { minimum: 1, amount });
        }

        self.player_locks.with_lock(leader, || -> Result<TreasuryOutcome> {
            let _alliances = self.alliance_lock.lock();
            let (mut player, _) = self.get_or_create(leader, self.now())?;
            let before = self.alliances.alliance_of(leader);

            let alliance = self.alliances.withdraw(&mut player, amount)?;
            let gold_left = player.gold;
            self.commit_players(vec![player], &alliance.id, before)?;

            Ok(TreasuryOutcome {
                alliance,
                amount,
                gold_left,
            })
        })
    }

    // === Leaderboards ===

    /// Top players by battles won, then gold.
    #[must_use]
    pub fn leaderboard(&self, count: usize) -> Vec<LeaderboardEntry> {
        let mut players = self.players.list_all();
        players.sort_by(|a, b| {
            b.stats
                .battles_won
                .cmp(&a.stats.battles_won)
                .then_with(|| b.gold.cmp(&a.gold))
        });

        players
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, p)| LeaderboardEntry {
                rank: i + 1,
                win_rate: p.stats.win_rate(),
                battles_won: p.stats.battles_won,
                gold: p.gold,
                name: p.name,
                id: p.id,
            })
            .collect()
    }

    /// Top alliances by power, then battles won. Power totals are refreshed
    /// first.
    pub fn alliance_leaderboard(&self, count: usize) -> Result<Vec<AllianceLeaderboardEntry>> {
        let _alliances = self.alliance_lock.lock();
        for alliance in self.alliances.all() {
            let power = self.alliance_power(&alliance);
            self.alliances.update_power(&alliance.id, power)?;
        }

        Ok(self
            .alliances
            .top_alliances(count)
            .into_iter()
            .enumerate()
            .map(|(i, a)| AllianceLeaderboardEntry {
                rank: i + 1,
                id: a.id,
                total_power: a.stats.total_power,
                battles_won: a.stats.battles_won,
                member_count: a.member_count(),
                name: a.name,
            })
            .collect())
    }
}
