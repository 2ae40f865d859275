//! Maintenance driver.
//!
//! The protocol core exposes `stabilize`, `fix_fingers` and
//! `check_predecessor` but never schedules them. `Stabilizer` does: one round
//! invokes the three operations on every registered node, and `wait` repeats
//! rounds on a fixed cadence until the task is dropped.

use std::sync::Arc;

use tokio::time::{interval, MissedTickBehavior};

use crate::config::StabilizerConfig;
use crate::ring::ChordRing;

/// The stabilization runner.
#[derive(Clone)]
pub struct Stabilizer {
    ring: Arc<ChordRing>,
    config: StabilizerConfig,
}

impl Stabilizer {
    pub fn new(ring: Arc<ChordRing>, config: StabilizerConfig) -> Self {
        Self { ring, config }
    }

    pub fn ring(&self) -> &Arc<ChordRing> {
        &self.ring
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Runs one maintenance round over every node, in creation order.
    ///
    /// A failing step is logged and the round moves on. Returns the number of
    /// failed steps.
    pub fn round(&self) -> usize {
        let mut failures = 0;
        for node in self.ring.nodes() {
            if !node.is_active() {
                continue;
            }
            if let Err(e) = node.stabilize(self.ring.as_ref()) {
                tracing::error!(node = %node, error = %e, "stabilize failed");
                failures += 1;
            }
            if let Err(e) = node.fix_fingers(self.ring.as_ref()) {
                tracing::error!(node = %node, error = %e, "fix_fingers failed");
                failures += 1;
            }
            node.check_predecessor(self.ring.as_ref());
        }

        if self.config.handoff_keys {
            match self.ring.rebalance() {
                Ok(moved) if moved > 0 => tracing::debug!(moved, "rebalanced keys"),
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "key handoff failed");
                    failures += 1;
                }
            }
        }
        failures
    }

    /// Runs `rounds` rounds back to back. Returns the total failure count.
    pub fn run(&self, rounds: usize) -> usize {
        (0..rounds).map(|_| self.round()).sum()
    }

    /// Runs a round every `interval_ms`, forever.
    pub async fn wait(self: Arc<Self>) {
        let mut ticker = interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let failures = self.round();
            if failures > 0 {
                tracing::warn!(failures, "maintenance round finished with failures");
            } else {
                tracing::trace!("maintenance round finished");
            }
        }
    }
}
