//! Identifier positions on the ring.
//!
//! Identifiers live in `[0, 2^m)`. The derived `Ord` is linear and only used
//! for sorting and indexing; routing decisions must go through
//! [`Interval`](super::Interval) instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RingConfig;

/// Position of a node or key on the ring.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub u64);

impl Identifier {
    pub fn value(self) -> u64 {
        self.0
    }

    /// Reduces the identifier into `[0, modulus)`.
    pub fn reduce(self, config: &RingConfig) -> Self {
        Identifier((u128::from(self.0) % config.modulus()) as u64)
    }

    /// `(self + 2^k) mod 2^m`: the start of finger slot `k`.
    pub fn finger_start(self, k: u8, config: &RingConfig) -> Self {
        let modulus = config.modulus();
        let offset = 1u128 << u32::from(k);
        Identifier(((u128::from(self.0) + offset) % modulus) as u64)
    }

    /// Clockwise distance from `self` to `other`.
    pub fn distance_to(self, other: Identifier, config: &RingConfig) -> u64 {
        let modulus = config.modulus();
        let from = u128::from(self.reduce(config).0);
        let to = u128::from(other.reduce(config).0);
        ((to + modulus - from) % modulus) as u64
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier(value)
    }
}
