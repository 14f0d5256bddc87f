//! Alliances: membership, invitations and the shared treasury.
//!
//! ## Key Types
//!
//! - `AllianceId`: UUID identifier
//! - `Alliance`: Name, leader, members, treasury and stats
//! - `AllianceInvite`: A pending, expiring invitation
//! - `AllianceEngine`: Operations over an injected repository

pub mod engine;
pub mod model;

pub use engine::{AllianceEngine, LeaveOutcome};
pub use model::{Alliance, AllianceId, AllianceInvite, AllianceStats, Members};
