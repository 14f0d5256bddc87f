//! Game service: the command surface.
//!
//! ## Key Types
//!
//! - `GameService`: One method per chat command, with locking and persistence
//! - `GameServiceBuilder`: Wires repositories, clock, RNG seed and catalog
//! - Outcome types (`ProfileView`, `PurchaseOutcome`, ...): Serializable results

pub mod outcome;
pub mod service;

pub use outcome::{
    AllianceLeaderboardEntry, AllianceSummary, AllianceView, BoostOutcome, CardView,
    DonationOutcome, EnergyView, GroupBoostOutcome, LeaderboardEntry, MemberView, ProfileView,
    PurchaseOutcome, TreasuryOutcome, UpgradeOutcome,
};
pub use service::{GameService, GameServiceBuilder};
