//! Ring topology views.
//!
//! [`TopoInfo`] is a point-in-time snapshot of one node's routing state.
//! [`Topology`] collects snapshots of every registered node and answers
//! ring-wide questions with global knowledge: closure, mutual consistency,
//! and how many fingers still lag behind their ideal owner. Only the
//! verification side (tests, drivers, logging) uses it. The protocol itself
//! never does.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RingConfig;
use crate::ring::Identifier;

/// Routing state of one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopoInfo {
    pub id: Identifier,
    pub address: String,
    pub successor: Option<Identifier>,
    pub predecessor: Option<Identifier>,
    /// Finger node references in slot order.
    pub fingers: Vec<Option<Identifier>>,
}

fn or_null(id: Option<Identifier>) -> String {
    id.map_or_else(|| "null".to_string(), |id| id.to_string())
}

impl fmt::Display for TopoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node [{}]@{}: pred={}, succ={}, fingers=(",
            self.id,
            self.address,
            or_null(self.predecessor),
            or_null(self.successor)
        )?;
        for (k, finger) in self.fingers.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", k, finger.map(|id| id.to_string()).unwrap_or_default())?;
        }
        write!(f, ")")
    }
}

/// Snapshot of a whole ring.
#[derive(Clone, Debug)]
pub struct Topology {
    config: RingConfig,
    nodes: BTreeMap<Identifier, TopoInfo>,
}

impl Topology {
    pub fn new(config: RingConfig, infos: impl IntoIterator<Item = TopoInfo>) -> Self {
        Self {
            config,
            nodes: infos.into_iter().map(|info| (info.id, info)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: Identifier) -> Option<&TopoInfo> {
        self.nodes.get(&id)
    }

    /// Snapshots ordered by identifier.
    pub fn infos(&self) -> impl Iterator<Item = &TopoInfo> {
        self.nodes.values()
    }

    /// Follows successor links from `from` until the walk returns to `from`,
    /// revisits a node, or hits an unknown/unset successor.
    pub fn successor_walk(&self, from: Identifier) -> Vec<Identifier> {
        let mut walk = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = from;
        while self.nodes.contains_key(&current) && seen.insert(current) {
            walk.push(current);
            match self.nodes[&current].successor {
                Some(next) if next != from => current = next,
                _ => break,
            }
        }
        walk
    }

    /// Walking successors from any node visits every node exactly once and
    /// returns to the start.
    pub fn is_closed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.keys().all(|&start| {
                let walk = self.successor_walk(start);
                walk.len() == self.nodes.len()
                    && walk
                        .last()
                        .and_then(|last| self.nodes[last].successor)
                        == Some(start)
            })
    }

    /// For every node `n`, `n.successor.predecessor == n`.
    pub fn is_consistent(&self) -> bool {
        self.nodes.values().all(|info| {
            info.successor
                .and_then(|succ| self.nodes.get(&succ))
                .and_then(|succ| succ.predecessor)
                == Some(info.id)
        })
    }

    /// The node that owns `id` with global knowledge: the first node at or
    /// after `id`, clockwise.
    pub fn expected_successor(&self, id: Identifier) -> Option<Identifier> {
        self.nodes
            .keys()
            .copied()
            .min_by_key(|node| id.distance_to(*node, &self.config))
    }

    /// Number of finger slots, across all nodes, not yet pointing at the
    /// owner of their start.
    pub fn stale_fingers(&self) -> usize {
        self.nodes
            .values()
            .map(|info| {
                info.fingers
                    .iter()
                    .enumerate()
                    .filter(|(k, finger)| {
                        // k < bits <= 64
                        let start = info.id.finger_start(*k as u8, &self.config);
                        **finger != self.expected_successor(start)
                    })
                    .count()
            })
            .sum()
    }

    pub fn is_converged(&self) -> bool {
        self.is_closed() && self.is_consistent() && self.stale_fingers() == 0
    }
}
