//! Finger table.
//!
//! Slot `k` caches the node believed to be the successor of
//! `(owner + 2^k) mod 2^m`. Entries are routing hints, never ownership: a stale
//! entry is corrected lazily by `fix_fingers`. Slot 0 is the successor pointer
//! itself.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::config::RingConfig;
use crate::ring::{Identifier, Interval};

/// One routing entry of a finger table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerEntry {
    /// Fixed when the table is built.
    pub start: Identifier,
    /// Node currently believed responsible for `start`; unset before the
    /// first resolution.
    pub node: Option<Identifier>,
}

#[derive(Clone, Debug)]
pub struct FingerTable {
    owner: Identifier,
    config: RingConfig,
    entries: Vec<FingerEntry>,
    next_to_fix: usize,
}

impl FingerTable {
    /// Builds the `m` slots of `owner` with every node reference unset.
    pub fn new(owner: Identifier, config: RingConfig) -> Self {
        let entries = (0..config.bits())
            .map(|k| FingerEntry {
                start: owner.finger_start(k, &config),
                node: None,
            })
            .collect();
        Self {
            owner,
            config,
            entries,
            // slot 0 is kept by join/stabilize
            next_to_fix: 1 % usize::from(config.bits()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[FingerEntry] {
        &self.entries
    }

    /// Node references only, in slot order.
    pub fn nodes(&self) -> Vec<Option<Identifier>> {
        self.entries.iter().map(|e| e.node).collect()
    }

    pub fn successor(&self) -> Option<Identifier> {
        self.entries.first().and_then(|e| e.node)
    }

    pub fn set_successor(&mut self, node: Identifier) {
        self.set(0, node);
    }

    pub fn set(&mut self, index: usize, node: Identifier) {
        match self.entries.get_mut(index) {
            Some(entry) => {
                if entry.node != Some(node) {
                    tracing::debug!(owner = %self.owner, index, %node, "set finger");
                }
                entry.node = Some(node);
            }
            None => tracing::error!(owner = %self.owner, index, "finger index out of range"),
        }
    }

    /// Binds every slot to `node`.
    pub fn fill(&mut self, node: Identifier) {
        for entry in &mut self.entries {
            entry.node = Some(node);
        }
    }

    /// Slot the next `fix_fingers` call will refresh.
    pub fn next_to_fix(&self) -> usize {
        self.next_to_fix
    }

    /// Returns the slot to refresh and its start, then advances the cursor.
    pub(crate) fn advance(&mut self) -> (usize, Identifier) {
        let index = self.next_to_fix;
        self.next_to_fix = (self.next_to_fix + 1) % self.entries.len();
        (index, self.entries[index].start)
    }

    /// Highest slot whose node lies strictly inside `(owner, target)`.
    ///
    /// Scanning from the top slot down is what makes lookups logarithmic.
    pub fn closest_preceding(&self, target: Identifier) -> Option<Identifier> {
        let range = Interval::open(self.owner, target);
        self.entries
            .iter()
            .rev()
            .filter_map(|e| e.node)
            .find(|node| range.contains(*node, &self.config))
    }
}

impl Index<usize> for FingerTable {
    type Output = FingerEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}
