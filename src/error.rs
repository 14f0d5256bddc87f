//! Error types for the game engine.
//!
//! Every engine failure is an expected, recoverable condition. Callers get a
//! `GameError` and decide how to present it; nothing here ends the process.

use std::fmt;

use thiserror::Error;

/// What kind of entity a lookup failed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Card,
    /// A card the player does not own.
    OwnedCard,
    Alliance,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "player",
            EntityKind::Card => "card",
            EntityKind::OwnedCard => "owned card",
            EntityKind::Alliance => "alliance",
        };
        f.write_str(name)
    }
}

/// Which rate-limited action is still cooling down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownKind {
    Draw,
    Battle,
}

impl fmt::Display for CooldownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CooldownKind::Draw => f.write_str("draw"),
            CooldownKind::Battle => f.write_str("battle"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("no energy left")]
    InsufficientEnergy,

    #[error("{action} on cooldown for another {remaining_secs}s")]
    Cooldown {
        action: CooldownKind,
        remaining_secs: i64,
    },

    #[error("invalid card level: {0}")]
    InvalidLevel(u8),

    #[error("card is already at max level")]
    AlreadyMaxLevel,

    #[error("alliance name already taken: {0}")]
    NameTaken(String),

    #[error("invalid alliance name")]
    InvalidName,

    #[error("player is already in an alliance")]
    AlreadyMember,

    #[error("player is not in an alliance")]
    NotMember,

    #[error("only the alliance leader can do that")]
    NotLeader,

    #[error("alliance is full")]
    AllianceFull,

    #[error("no pending invite")]
    NoPendingInvite,

    #[error("invite expired")]
    InviteExpired,

    #[error("cannot target yourself")]
    SelfTarget,

    #[error("amount {amount} is below the minimum of {minimum}")]
    BelowMinimum { minimum: u64, amount: u64 },

    #[error("card catalog is empty")]
    EmptyCatalog,

    #[error("invalid card catalog: {0}")]
    InvalidCatalog(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl GameError {
    pub(crate) fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        GameError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Persistence failures. Loads degrade to empty state; saves surface these.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
