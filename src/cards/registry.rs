//! Card catalog for definition lookup.
//!
//! The `CardCatalog` holds every card definition for the running process. It
//! is loaded once and never mutated. Definitions are kept sorted by ascending
//! price (ties by id), which is the shop order.

use std::path::Path;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, Rarity};
use crate::error::{EntityKind, GameError, Result, StoreError};
use crate::store::{gateway, StoreFormat};

/// Read-only registry of card definitions.
///
/// ## Example
///
/// ```
/// use card_arena::cards::{CardCatalog, CardDefinition, CardId, Rarity};
///
/// let catalog = CardCatalog::new(vec![
///     CardDefinition::new("mew", "Mew", 100, Rarity::Legendary, "psychic", 1000),
///     CardDefinition::new("rattata", "Rattata", 10, Rarity::Common, "normal", 20),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.all()[0].name, "Rattata");
/// assert!(catalog.lookup(&CardId::new("mew")).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Build a catalog. Duplicate ids are rejected.
    pub fn new(mut cards: Vec<CardDefinition>) -> Result<Self> {
        cards.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id)));

        let mut index = FxHashMap::default();
        for (i, card) in cards.iter().enumerate() {
            if index.insert(card.id.clone(), i).is_some() {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate card id {}",
                    card.id
                )));
            }
        }

        Ok(Self { cards, index })
    }

    /// Parse a JSON array of card definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidCatalog(e.to_string()))?;
        Self::new(cards)
    }

    /// Load a catalog file written in `format`.
    ///
    /// A file that cannot be read is a storage error; one that cannot be
    /// parsed is an invalid catalog.
    pub fn load(path: &Path, format: StoreFormat) -> Result<Self> {
        let cards = gateway::read_collection::<CardDefinition>(path, format).map_err(|e| match e {
            StoreError::Io(_) => GameError::Storage(e),
            other => GameError::InvalidCatalog(other.to_string()),
        })?;
        let catalog = Self::new(cards)?;
        tracing::info!("Loaded {} cards from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Get a card definition by id.
    #[must_use]
    pub fn lookup(&self, id: &CardId) -> Option<&CardDefinition> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    /// Get a card definition by id, or `NotFound`.
    pub fn get(&self, id: &CardId) -> Result<&CardDefinition> {
        self.lookup(id)
            .ok_or_else(|| GameError::not_found(EntityKind::Card, id))
    }

    /// All definitions, cheapest first.
    #[must_use]
    pub fn all(&self) -> &[CardDefinition] {
        &self.cards
    }

    /// Definitions of one rarity, in catalog order.
    pub fn of_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter().filter(move |c| c.rarity == rarity)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
