//! Energy: the time-gated resource that pays for draws.
//!
//! There are no timers. Every transition is computed from stored timestamps
//! when the state is read or written:
//!
//! - **Regeneration**: one charge per full `regen_minutes` since
//!   `last_regen_at`, capped at `max_charge`. When at least one charge is
//!   gained, `last_regen_at` jumps to *now*, so any partial progress toward
//!   the next charge is dropped.
//! - **Draw cooldown**: at least `draw_cooldown_minutes` between draws.
//! - **Consume**: both checks must pass; otherwise nothing changes.
//! - **Restore**: a paid boost refills to max and restarts the regen window.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::{EnergyConfig, Timestamp};
use crate::error::{CooldownKind, GameError, Result};

/// Per-player energy state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    /// Stored charges, always in `0..=max_charge`.
    pub charge: u8,

    pub last_regen_at: Timestamp,

    /// `None` until the first draw.
    #[serde(default)]
    pub last_draw_at: Option<Timestamp>,
}

impl Energy {
    /// A full tank, regen window starting now.
    #[must_use]
    pub fn full(max_charge: u8, now: Timestamp) -> Self {
        Self {
            charge: max_charge,
            last_regen_at: now,
            last_draw_at: None,
        }
    }

    /// Whole regen intervals elapsed since the last regeneration.
    fn pending_ticks(&self, config: &EnergyConfig, now: Timestamp) -> i64 {
        let elapsed = (now - self.last_regen_at).num_minutes();
        if elapsed <= 0 {
            return 0;
        }
        elapsed.checked_div(config.regen_minutes).unwrap_or(0).max(0)
    }

    /// Charge as it would be after regenerating at `now`, without mutating.
    #[must_use]
    pub fn charge_at(&self, config: &EnergyConfig, now: Timestamp) -> u8 {
        let ticks = self.pending_ticks(config, now);
        let charged = i64::from(self.charge).saturating_add(ticks);
        charged.min(i64::from(config.max_charge)) as u8
    }

    /// Apply lazy regeneration. Returns the number of charges gained.
    pub fn regenerate(&mut self, config: &EnergyConfig, now: Timestamp) -> u8 {
        if self.pending_ticks(config, now) < 1 {
            return 0;
        }
        let before = self.charge;
        self.charge = self.charge_at(config, now);
        self.last_regen_at = now;

        let gained = self.charge - before;
        if gained > 0 {
            tracing::debug!("Energy regenerated {} -> {}", before, self.charge);
        }
        gained
    }

    /// Time left on the draw cooldown, zero once it has passed.
    #[must_use]
    pub fn cooldown_remaining(&self, config: &EnergyConfig, now: Timestamp) -> Duration {
        match self.last_draw_at {
            None => Duration::zero(),
            Some(last) => (config.draw_cooldown() - (now - last)).max(Duration::zero()),
        }
    }

    /// Regenerate, then report why a draw would be denied, if it would be.
    pub fn check_draw(&mut self, config: &EnergyConfig, now: Timestamp) -> Result<()> {
        self.regenerate(config, now);

        if self.charge == 0 {
            return Err(GameError::InsufficientEnergy);
        }

        let remaining = self.cooldown_remaining(config, now);
        if remaining > Duration::zero() {
            return Err(GameError::Cooldown {
                action: CooldownKind::Draw,
                remaining_secs: remaining.num_seconds(),
            });
        }

        Ok(())
    }

    /// Whether a draw is allowed right now (regenerates first).
    pub fn can_draw(&mut self, config: &EnergyConfig, now: Timestamp) -> bool {
        self.check_draw(config, now).is_ok()
    }

    /// Spend one charge for a draw. No state change on denial.
    pub fn consume(&mut self, config: &EnergyConfig, now: Timestamp) -> Result<()> {
        self.check_draw(config, now)?;
        self.charge -= 1;
        self.last_draw_at = Some(now);
        Ok(())
    }

    /// Zero if a draw is allowed now, otherwise what is left of the cooldown.
    #[must_use]
    pub fn time_until_next_draw(&self, config: &EnergyConfig, now: Timestamp) -> Duration {
        let eligible = self.charge_at(config, now) > 0
            && self.cooldown_remaining(config, now) == Duration::zero();
        if eligible {
            return Duration::zero();
        }
        self.cooldown_remaining(config, now)
    }

    /// Time until the next charge regenerates, zero when full.
    #[must_use]
    pub fn time_until_next_charge(&self, config: &EnergyConfig, now: Timestamp) -> Duration {
        if self.charge_at(config, now) >= config.max_charge {
            return Duration::zero();
        }
        let interval = config.regen_interval().num_milliseconds();
        let elapsed = (now - self.last_regen_at).num_milliseconds();
        if interval <= 0 || elapsed < 0 {
            return config.regen_interval();
        }
        Duration::milliseconds(interval - elapsed % interval)
    }

    /// Refill to max and restart the regen window.
    pub fn restore_full(&mut self, config: &EnergyConfig, now: Timestamp) {
        self.charge = config.max_charge;
        self.last_regen_at = now;
    }
}
