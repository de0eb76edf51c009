//! Core data models for the mining timer.
//! The tier ladder is a static table; `MiningSession` is the only mutable
//! state and performs no I/O, so it can be driven directly from tests.

use crate::error::MiningError;

/// Highest reachable tier level.
pub const MAX_TIER_LEVEL: u8 = 3;
/// Interval of the host tick source. Sub-second so the progress bar animates smoothly.
pub const TICK_INTERVAL_MS: i32 = 250;
/// How much ticked time may pass between two progress snapshots.
pub const PROGRESS_SAVE_INTERVAL_SECS: f64 = 5.0;

const SECS_PER_HOUR: f64 = 3600.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tier {
    pub level: u8,
    /// Length of one mining run at this tier.
    pub duration_secs: u64,
    /// AIQX fee to upgrade into this tier (0 for the free tier).
    pub upgrade_cost: u32,
    /// AIQX credited per hour of mining.
    pub hourly_rate: f64,
}

pub static TIERS: [Tier; 4] = [
    Tier { level: 0, duration_secs: 10_800, upgrade_cost: 0, hourly_rate: 0.01 },
    Tier { level: 1, duration_secs: 21_600, upgrade_cost: 6, hourly_rate: 0.02 },
    Tier { level: 2, duration_secs: 43_200, upgrade_cost: 12, hourly_rate: 0.05 },
    Tier { level: 3, duration_secs: 86_400, upgrade_cost: 24, hourly_rate: 0.10 },
];

impl Tier {
    /// Looks up a tier, clamping the level into the ladder.
    pub fn for_level(level: u8) -> &'static Tier {
        &TIERS[level.min(MAX_TIER_LEVEL) as usize]
    }

    pub fn duration(&self) -> f64 {
        self.duration_secs as f64
    }

    pub fn hours(&self) -> u64 {
        self.duration_secs / 3600
    }
}

/// Reward owed for `elapsed_secs` of mining at `tier_level`.
///
/// Shared by the running estimate and the claim payout so the two can never
/// disagree.
pub fn compute_reward(tier_level: u8, elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
        return 0.0;
    }
    Tier::for_level(tier_level).hourly_rate * (elapsed_secs / SECS_PER_HOUR)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Mining has never been started on this client.
    Idle,
    /// Counting towards the tier duration.
    Running,
    /// Duration reached; waiting for the user to claim.
    ReadyToClaim,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MiningSession {
    tier_level: u8,
    phase: Phase,
    elapsed_secs: f64,
    total_balance: f64,
}

impl Default for MiningSession {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MiningSession {
    pub fn new(tier_level: u8) -> Self {
        Self {
            tier_level: tier_level.min(MAX_TIER_LEVEL),
            phase: Phase::Idle,
            elapsed_secs: 0.0,
            total_balance: 0.0,
        }
    }

    /// Rebuilds a session from persisted values. A client that has started
    /// mining before never comes back `Idle`.
    pub fn restore(tier_level: u8, has_started: bool, elapsed_secs: f64, total_balance: f64) -> Self {
        let mut s = Self::new(tier_level);
        s.total_balance = if total_balance.is_finite() { total_balance.max(0.0) } else { 0.0 };
        if has_started {
            s.phase = Phase::Running;
            s.tick(elapsed_secs);
        }
        s
    }

    pub fn tier_level(&self) -> u8 {
        self.tier_level
    }

    pub fn tier(&self) -> &'static Tier {
        Tier::for_level(self.tier_level)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn total_balance(&self) -> f64 {
        self.total_balance
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.tier().duration() - self.elapsed_secs).max(0.0)
    }

    pub fn progress_fraction(&self) -> f64 {
        (self.elapsed_secs / self.tier().duration()).clamp(0.0, 1.0)
    }

    /// What a claim would pay if the run ended now.
    pub fn estimated_reward(&self) -> f64 {
        compute_reward(self.tier_level, self.elapsed_secs)
    }

    pub fn can_upgrade(&self) -> bool {
        self.tier_level < MAX_TIER_LEVEL
    }

    pub fn next_tier(&self) -> Option<&'static Tier> {
        if self.can_upgrade() {
            Some(Tier::for_level(self.tier_level + 1))
        } else {
            None
        }
    }

    pub fn next_tier_duration_secs(&self) -> Option<u64> {
        self.next_tier().map(|t| t.duration_secs)
    }

    /// Starts the first run. Returns whether anything changed.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.restart();
        true
    }

    /// Advances a running session. Returns true when this tick completed the run.
    pub fn tick(&mut self, delta_secs: f64) -> bool {
        if self.phase != Phase::Running || !delta_secs.is_finite() || delta_secs <= 0.0 {
            return false;
        }
        let duration = self.tier().duration();
        self.elapsed_secs = (self.elapsed_secs + delta_secs).min(duration);
        if self.elapsed_secs >= duration {
            self.phase = Phase::ReadyToClaim;
            return true;
        }
        false
    }

    /// Credits the full-run reward and immediately starts the next run.
    pub fn claim(&mut self) -> Result<f64, MiningError> {
        if self.phase != Phase::ReadyToClaim {
            return Err(MiningError::InvalidTransition {
                action: "claim",
                reason: "mining run has not finished",
            });
        }
        let amount = compute_reward(self.tier_level, self.tier().duration());
        self.total_balance += amount;
        self.restart();
        Ok(amount)
    }

    /// Moves one tier up. An active run restarts under the new duration and
    /// its progress is dropped.
    pub fn upgrade(&mut self) -> Result<u8, MiningError> {
        if !self.can_upgrade() {
            return Err(MiningError::InvalidTransition {
                action: "upgrade",
                reason: "already at the highest tier",
            });
        }
        self.tier_level += 1;
        if self.phase != Phase::Idle {
            self.restart();
        }
        Ok(self.tier_level)
    }

    pub fn reset(&mut self) {
        *self = Self::new(0);
    }

    fn restart(&mut self) {
        self.elapsed_secs = 0.0;
        self.phase = Phase::Running;
    }
}
