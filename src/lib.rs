//! # card-arena
//!
//! Game-state engine for a chat-driven collectible card mini-game.
//!
//! Players collect cards through a rate-limited weighted draw, buy and
//! upgrade them with gold, fight each other for gold, and band together in
//! alliances with a shared treasury.
//!
//! ## Design Principles
//!
//! 1. **No timers**: Energy regeneration and cooldowns are computed from
//!    stored timestamps whenever state is touched. Time comes from a `Clock`.
//!
//! 2. **Data in, data out**: Commands return typed, serializable outcomes.
//!    Wording and presentation belong to whoever drives the service.
//!
//! 3. **Single writer per aggregate**: Each player is mutated under its own
//!    lock and written back as one unit. Two-sided transfers are stored with
//!    one `put_all`, so gold is conserved.
//!
//! ## Modules
//!
//! - `core`: Players, clock, RNG and configuration
//! - `cards`: Card definitions, owned copies and the catalog
//! - `economy`: Energy and the card draw
//! - `battle`: Battle resolution and the gold-steal formula
//! - `alliance`: Membership, invitations and treasury
//! - `store`: Repositories, file persistence and per-key locks
//! - `game`: The command surface tying it all together

pub mod alliance;
pub mod battle;
pub mod cards;
pub mod core;
pub mod economy;
pub mod error;
pub mod game;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Clock, EngineConfig, GameRng, ManualClock, Player, PlayerId, PlayerStats, SystemClock,
    Timestamp,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, OwnedCard, Rarity, MAX_LEVEL};

pub use crate::economy::{DrawOutcome, Energy, RarityTable};

pub use crate::battle::{BattleReport, BattleResolver, BattleRolls};

pub use crate::alliance::{Alliance, AllianceEngine, AllianceId, AllianceInvite, LeaveOutcome};

pub use crate::store::{FileRepository, KeyedLocks, MemoryRepository, Repository, StoreFormat};

pub use crate::game::{GameService, GameServiceBuilder};

pub use crate::error::{CooldownKind, EntityKind, GameError, Result, StoreError};
