//! Weighted-rarity card draw.
//!
//! A draw rolls a rarity tier from a cumulative percentage table, picks a card
//! of that tier uniformly (falling back to the whole catalog when the tier is
//! empty) and pays a small gold reward. Energy is consumed first; if it is
//! denied, nothing changes.

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardDefinition, Rarity};
use crate::core::{EngineConfig, GameRng, Player, Timestamp};
use crate::error::{GameError, Result};

/// Rarity probabilities in percent, evaluated cumulatively in tier order.
///
/// ```
/// use card_arena::cards::Rarity;
/// use card_arena::economy::RarityTable;
///
/// let table = RarityTable::default();
/// assert_eq!(table.pick(59.99), Rarity::Common);
/// assert_eq!(table.pick(60.0), Rarity::Uncommon);
/// assert_eq!(table.pick(99.5), Rarity::Legendary);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityTable {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            common: 60.0,
            uncommon: 25.0,
            rare: 10.0,
            epic: 4.0,
            legendary: 1.0,
        }
    }
}

impl RarityTable {
    fn weights(&self) -> [(Rarity, f64); 5] {
        [
            (Rarity::Common, self.common),
            (Rarity::Uncommon, self.uncommon),
            (Rarity::Rare, self.rare),
            (Rarity::Epic, self.epic),
            (Rarity::Legendary, self.legendary),
        ]
    }

    /// Map a value in `[0, 100)` to a tier.
    ///
    /// Values past the cumulative total land in the last tier.
    #[must_use]
    pub fn pick(&self, value: f64) -> Rarity {
        let mut cumulative = 0.0;
        for (rarity, weight) in self.weights() {
            cumulative += weight;
            if value < cumulative {
                return rarity;
            }
        }
        Rarity::Legendary
    }

    /// Roll a tier.
    pub fn roll(&self, rng: &mut GameRng) -> Rarity {
        self.pick(rng.gen_percent())
    }
}

/// Result of a successful draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub card: CardDefinition,

    /// Tier that was rolled. Differs from `card.rarity` only on fallback.
    pub rolled: Rarity,

    pub gold_reward: u64,

    /// Charges left after this draw.
    pub charge_left: u8,
}

/// Pick a card of the given tier, or any card if the tier is empty.
pub fn pick_card<'a>(
    catalog: &'a CardCatalog,
    rarity: Rarity,
    rng: &mut GameRng,
) -> Option<&'a CardDefinition> {
    let pool: Vec<&CardDefinition> = catalog.of_rarity(rarity).collect();
    if pool.is_empty() {
        return rng.choose(catalog.all());
    }
    rng.choose(&pool).copied()
}

/// Perform one draw for `player`.
///
/// Fails with `EmptyCatalog` before touching energy, and with the energy
/// error when consumption is denied. On success the card and the gold are
/// credited together.
pub fn draw(
    player: &mut Player,
    catalog: &CardCatalog,
    rng: &mut GameRng,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<DrawOutcome> {
    if catalog.is_empty() {
        return Err(GameError::EmptyCatalog);
    }

    player.energy.consume(&config.energy, now)?;

    let rolled = config.draw.rarity.roll(rng);
    let card = pick_card(catalog, rolled, rng)
        .ok_or(GameError::EmptyCatalog)?
        .clone();
    let gold_reward = roll_gold(rng, config);

    player.add_card(card.id.clone(), now);
    player.earn(gold_reward);
    player.stats.total_draws += 1;
    player.stats.cards_collected += 1;

    tracing::info!(
        "{} drew {} ({:?}) and {} gold",
        player.id,
        card.id,
        card.rarity,
        gold_reward
    );

    Ok(DrawOutcome {
        card,
        rolled,
        gold_reward,
        charge_left: player.energy.charge,
    })
}

/// Gold reward, uniform over the configured inclusive range.
fn roll_gold(rng: &mut GameRng, config: &EngineConfig) -> u64 {
    let (min, max) = (config.draw.min_gold, config.draw.max_gold);
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn catalog() -> CardCatalog {
        CardCatalog::new(vec![
            CardDefinition::new("caterpie", "Caterpie", 10, Rarity::Common, "bug", 20),
            CardDefinition::new("weedle", "Weedle", 11, Rarity::Common, "bug", 20),
            CardDefinition::new("growlithe", "Growlithe", 30, Rarity::Uncommon, "fire", 120),
            CardDefinition::new("lapras", "Lapras", 70, Rarity::Rare, "water", 400),
        ])
        .unwrap()
    }

    fn player() -> Player {
        Player::new(PlayerId::new("u1"), "Misty", 100, 3, now())
    }

    #[test]
    fn test_pick_boundaries() {
        let table = RarityTable::default();
        assert_eq!(table.pick(0.0), Rarity::Common);
        assert_eq!(table.pick(59.999), Rarity::Common);
        assert_eq!(table.pick(60.0), Rarity::Uncommon);
        assert_eq!(table.pick(84.999), Rarity::Uncommon);
        assert_eq!(table.pick(85.0), Rarity::Rare);
        assert_eq!(table.pick(95.0), Rarity::Epic);
        assert_eq!(table.pick(98.999), Rarity::Epic);
        assert_eq!(table.pick(99.0), Rarity::Legendary);
        assert_eq!(table.pick(99.999), Rarity::Legendary);
    }

    #[test]
    fn test_rarity_distribution() {
        let table = RarityTable::default();
        let mut rng = GameRng::new(12345);
        let mut counts = [0u32; 5];
        let n: u32 = 100_000;

        for _ in 0..n {
            counts[table.roll(&mut rng) as usize] += 1;
        }

        let expected = [60.0, 25.0, 10.0, 4.0, 1.0];
        for (count, pct) in counts.iter().zip(expected) {
            let observed = f64::from(*count) / f64::from(n) * 100.0;
            assert!(
                (observed - pct).abs() < 1.0,
                "observed {observed:.2}% for expected {pct}%"
            );
        }
    }

    #[test]
    fn test_draw_credits_card_and_gold() {
        let mut player = player();
        let mut rng = GameRng::new(1);

        let outcome = draw(&mut player, &catalog(), &mut rng, now(), &EngineConfig::default())
            .unwrap();

        assert_eq!(player.cards.len(), 1);
        assert_eq!(player.cards[0].card_id, outcome.card.id);
        assert_eq!(player.cards[0].level, 1);
        assert!((10..=50).contains(&outcome.gold_reward));
        assert_eq!(player.gold, 100 + outcome.gold_reward);
        assert_eq!(player.energy.charge, 2);
        assert_eq!(outcome.charge_left, 2);
        assert_eq!(player.stats.total_draws, 1);
        assert_eq!(player.stats.cards_collected, 1);
        assert_eq!(player.stats.gold_earned, outcome.gold_reward);
    }

    #[test]
    fn test_missing_tier_falls_back_to_whole_catalog() {
        let catalog = catalog();
        let mut rng = GameRng::new(9);

        for _ in 0..50 {
            let card = pick_card(&catalog, Rarity::Legendary, &mut rng).unwrap();
            assert!(catalog.contains(&card.id));
        }
        for _ in 0..50 {
            let card = pick_card(&catalog, Rarity::Common, &mut rng).unwrap();
            assert_eq!(card.rarity, Rarity::Common);
        }
    }

    #[test]
    fn test_empty_catalog_leaves_player_untouched() {
        let mut player = player();
        let before = player.clone();
        let mut rng = GameRng::new(1);

        let err = draw(
            &mut player,
            &CardCatalog::default(),
            &mut rng,
            now(),
            &EngineConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, GameError::EmptyCatalog));
        assert_eq!(player, before);
    }

    #[test]
    fn test_denied_draw_changes_nothing() {
        let mut player = player();
        let mut rng = GameRng::new(1);
        let config = EngineConfig::default();

        draw(&mut player, &catalog(), &mut rng, now(), &config).unwrap();
        let before = player.clone();

        let err = draw(
            &mut player,
            &catalog(),
            &mut rng,
            now() + Duration::minutes(1),
            &config,
        )
        .unwrap_err();

        assert!(matches!(err, GameError::Cooldown { .. }));
        assert_eq!(player, before);
    }

    #[test]
    fn test_fixed_gold_range() {
        let config = EngineConfig::default().with_draw_gold(25, 25);
        let mut rng = GameRng::new(4);
        assert_eq!(roll_gold(&mut rng, &config), 25);
    }
}
