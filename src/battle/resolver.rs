//! Battle resolution.
//!
//! The `BattleResolver` compares the two sides' aggregate card power, each
//! perturbed by a small random roll, then moves a slice of the loser's gold
//! to the winner. All randomness is drawn up front into `BattleRolls`, so a
//! fight can be replayed exactly with `resolve_with_rolls`.

use serde::{Deserialize, Serialize};

use crate::cards::CardCatalog;
use crate::core::{BattleConfig, GameRng, Player, PlayerId, Timestamp};
use crate::error::{CooldownKind, GameError, Result};

/// The random inputs of one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRolls {
    pub attacker: u32,
    pub defender: u32,

    /// Percentage of the loser's gold at stake.
    pub steal_percent: u32,
}

impl BattleRolls {
    /// Roll all three values from the configured ranges.
    pub fn roll(rng: &mut GameRng, config: &BattleConfig) -> Self {
        let steal_percent = if config.max_steal_percent > config.min_steal_percent {
            rng.gen_range(config.min_steal_percent..=config.max_steal_percent)
        } else {
            config.min_steal_percent
        };

        Self {
            attacker: rng.gen_range(0..=config.max_roll),
            defender: rng.gen_range(0..=config.max_roll),
            steal_percent,
        }
    }
}

/// Which side of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

/// Everything that happened in one battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker: PlayerId,
    pub defender: PlayerId,

    pub attacker_power: u64,
    pub defender_power: u64,

    pub rolls: BattleRolls,

    pub winner: Side,

    /// Gold moved from loser to winner.
    pub gold_stolen: u64,

    pub fought_at: Timestamp,
}

impl BattleReport {
    #[must_use]
    pub fn attacker_total(&self) -> u64 {
        self.attacker_power.saturating_add(u64::from(self.rolls.attacker))
    }

    #[must_use]
    pub fn defender_total(&self) -> u64 {
        self.defender_power.saturating_add(u64::from(self.rolls.defender))
    }

    #[must_use]
    pub fn attacker_won(&self) -> bool {
        self.winner == Side::Attacker
    }

    #[must_use]
    pub fn winner_id(&self) -> &PlayerId {
        match self.winner {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    #[must_use]
    pub fn loser_id(&self) -> &PlayerId {
        match self.winner {
            Side::Attacker => &self.defender,
            Side::Defender => &self.attacker,
        }
    }
}

/// Aggregate combat strength. Unknown card ids contribute nothing.
#[must_use]
pub fn power(player: &Player, catalog: &CardCatalog) -> u64 {
    player.total_power(catalog)
}

/// Gold the loser forfeits.
///
/// `floor(balance * percent / 100)`, raised to `min_steal`, never more than
/// the balance.
///
/// ```
/// use card_arena::battle::steal_amount;
///
/// assert_eq!(steal_amount(1000, 15, 10), 150);
/// assert_eq!(steal_amount(40, 10, 10), 10);
/// assert_eq!(steal_amount(5, 30, 10), 5);
/// assert_eq!(steal_amount(0, 30, 10), 0);
/// ```
#[must_use]
pub fn steal_amount(balance: u64, percent: u32, min_steal: u64) -> u64 {
    let share = u128::from(balance) * u128::from(percent) / 100;
    let share = u64::try_from(share).unwrap_or(u64::MAX);
    share.max(min_steal).min(balance)
}

/// Resolves battles between two players.
pub struct BattleResolver;

impl BattleResolver {
    /// Fail with a battle `Cooldown` if the attacker fought too recently.
    ///
    /// Only the attacker is rate-limited; being attacked is free.
    pub fn check_cooldown(attacker: &Player, now: Timestamp, config: &BattleConfig) -> Result<()> {
        let Some(last) = attacker.last_battle_at else {
            return Ok(());
        };
        let remaining = config.cooldown() - (now - last);
        if remaining > chrono::Duration::zero() {
            return Err(GameError::Cooldown {
                action: CooldownKind::Battle,
                remaining_secs: remaining.num_seconds(),
            });
        }
        Ok(())
    }

    /// Resolve a battle, rolling dice from `rng`.
    pub fn resolve(
        attacker: &mut Player,
        defender: &mut Player,
        catalog: &CardCatalog,
        rng: &mut GameRng,
        now: Timestamp,
        config: &BattleConfig,
    ) -> Result<BattleReport> {
        Self::check_cooldown(attacker, now, config)?;
        let rolls = BattleRolls::roll(rng, config);
        tracing::debug!(
            "Battle rolls {} vs {}: {:?}",
            attacker.id,
            defender.id,
            rolls
        );
        Self::resolve_with_rolls(attacker, defender, catalog, rolls, now, config)
    }

    /// Resolve a battle with fixed rolls.
    ///
    /// The attacker wins only on a strictly greater total; ties go to the
    /// defender. Both players are updated in place.
    pub fn resolve_with_rolls(
        attacker: &mut Player,
        defender: &mut Player,
        catalog: &CardCatalog,
        rolls: BattleRolls,
        now: Timestamp,
        config: &BattleConfig,
    ) -> Result<BattleReport> {
        Self::check_cooldown(attacker, now, config)?;

        let attacker_power = power(attacker, catalog);
        let defender_power = power(defender, catalog);
        let attacker_total = attacker_power.saturating_add(u64::from(rolls.attacker));
        let defender_total = defender_power.saturating_add(u64::from(rolls.defender));

        let winner = if attacker_total > defender_total {
            Side::Attacker
        } else {
            Side::Defender
        };

        let (winning, losing) = match winner {
            Side::Attacker => (&mut *attacker, &mut *defender),
            Side::Defender => (&mut *defender, &mut *attacker),
        };

        let gold_stolen = steal_amount(losing.gold, rolls.steal_percent, config.min_steal);
        losing.withdraw(gold_stolen)?;
        winning.earn(gold_stolen);
        winning.stats.battles_won += 1;
        losing.stats.battles_lost += 1;

        attacker.stats.total_battles += 1;
        defender.stats.total_battles += 1;
        attacker.last_battle_at = Some(now);

        let report = BattleReport {
            attacker: attacker.id.clone(),
            defender: defender.id.clone(),
            attacker_power,
            defender_power,
            rolls,
            winner,
            gold_stolen,
            fought_at: now,
        };

        tracing::info!(
            "Battle {} ({}) vs {} ({}): {} wins {} gold",
            report.attacker,
            report.attacker_total(),
            report.defender,
            report.defender_total(),
            report.winner_id(),
            gold_stolen
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, Rarity};
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 7, 1, 18, 0, 0).unwrap()
    }

    fn catalog() -> CardCatalog {
        CardCatalog::new(vec![
            CardDefinition::new("a50", "Fifty", 50, Rarity::Common, "normal", 10),
            CardDefinition::new("a60", "Sixty", 60, Rarity::Common, "normal", 10),
        ])
        .unwrap()
    }

    fn player_with(id: &str, gold: u64, card: &str) -> Player {
        let mut player = Player::new(PlayerId::new(id), id, gold, 3, now());
        player.add_card(CardId::new(card), now());
        player
    }

    fn rolls(attacker: u32, defender: u32, steal_percent: u32) -> BattleRolls {
        BattleRolls {
            attacker,
            defender,
            steal_percent,
        }
    }

    #[test]
    fn test_tie_goes_to_defender() {
        let mut attacker = player_with("a", 200, "a50");
        let mut defender = player_with("d", 1000, "a60");

        let report = BattleResolver::resolve_with_rolls(
            &mut attacker,
            &mut defender,
            &catalog(),
            rolls(10, 0, 15),
            now(),
            &BattleConfig::default(),
        )
        .unwrap();

        assert_eq!(report.attacker_total(), 60);
        assert_eq!(report.defender_total(), 60);
        assert_eq!(report.winner, Side::Defender);
        assert_eq!(report.gold_stolen, 30);
        assert_eq!(attacker.gold, 170);
        assert_eq!(defender.gold, 1030);
    }

    #[test]
    fn test_attacker_win_updates_both_sides() {
        let mut attacker = player_with("a", 100, "a60");
        let mut defender = player_with("d", 1000, "a50");

        let report = BattleResolver::resolve_with_rolls(
            &mut attacker,
            &mut defender,
            &catalog(),
            rolls(0, 0, 15),
            now(),
            &BattleConfig::default(),
        )
        .unwrap();

        assert!(report.attacker_won());
        assert_eq!(report.gold_stolen, 150);
        assert_eq!(attacker.gold, 250);
        assert_eq!(defender.gold, 850);
        assert_eq!(attacker.stats.battles_won, 1);
        assert_eq!(attacker.stats.gold_earned, 150);
        assert_eq!(defender.stats.battles_lost, 1);
        assert_eq!(attacker.stats.total_battles, 1);
        assert_eq!(defender.stats.total_battles, 1);
        assert_eq!(attacker.last_battle_at, Some(now()));
        assert_eq!(defender.last_battle_at, None);
    }

    #[test]
    fn test_huge_power_saturates() {
        let catalog = CardCatalog::new(vec![CardDefinition::new(
            "titan",
            "Titan",
            u64::MAX,
            Rarity::Legendary,
            "steel",
            1,
        )])
        .unwrap();
        let mut attacker = player_with("a", 100, "titan");
        let mut defender = player_with("d", 100, "titan");

        let report = BattleResolver::resolve_with_rolls(
            &mut attacker,
            &mut defender,
            &catalog,
            rolls(20, 0, 10),
            now(),
            &BattleConfig::default(),
        )
        .unwrap();

        assert_eq!(report.attacker_total(), u64::MAX);
        assert_eq!(report.defender_total(), u64::MAX);
        assert_eq!(report.winner, Side::Defender);
    }

    #[test]
    fn test_steal_capped_by_balance() {
        assert_eq!(steal_amount(5, 10, 10), 5);
        assert_eq!(steal_amount(1000, 15, 10), 150);
        assert_eq!(steal_amount(0, 30, 10), 0);
        assert_eq!(steal_amount(99, 10, 10), 10);
        assert!(steal_amount(u64::MAX, 30, 10) > u64::MAX / 4);
    }

    #[test]
    fn test_attacker_cooldown() {
        let mut attacker = player_with("a", 100, "a60");
        let mut defender = player_with("d", 100, "a50");
        let config = BattleConfig::default();
        let catalog = catalog();

        BattleResolver::resolve_with_rolls(
            &mut attacker,
            &mut defender,
            &catalog,
            rolls(0, 0, 10),
            now(),
            &config,
        )
        .unwrap();
        let snapshot = (attacker.clone(), defender.clone());

        let err = BattleResolver::resolve_with_rolls(
            &mut attacker,
            &mut defender,
            &catalog,
            rolls(0, 0, 10),
            now() + Duration::minutes(3),
            &config,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            GameError::Cooldown {
                action: CooldownKind::Battle,
                remaining_secs: 120
            }
        ));
        assert_eq!((attacker.clone(), defender.clone()), snapshot);

        // The defender can still attack right away.
        assert!(BattleResolver::resolve_with_rolls(
            &mut defender,
            &mut attacker,
            &catalog,
            rolls(0, 0, 10),
            now() + Duration::minutes(3),
            &config,
        )
        .is_ok());
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = GameRng::new(11);
        let config = BattleConfig::default();

        for _ in 0..1000 {
            let r = BattleRolls::roll(&mut rng, &config);
            assert!(r.attacker <= 20 && r.defender <= 20);
            assert!((10..=30).contains(&r.steal_percent));
        }
    }

    #[test]
    fn test_resolve_conserves_gold() {
        let mut rng = GameRng::new(5);
        let catalog = catalog();
        let config = BattleConfig::default();

        for i in 0..100 {
            let mut attacker = player_with("a", 10 * i, "a50");
            let mut defender = player_with("d", 7 * i + 3, "a60");
            let before = attacker.gold + defender.gold;

            BattleResolver::resolve(&mut attacker, &mut defender, &catalog, &mut rng, now(), &config)
                .unwrap();

            assert_eq!(attacker.gold + defender.gold, before);
        }
    }
}
