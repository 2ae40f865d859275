//! Circular interval containment.
//!
//! Every routing decision (lookup termination, finger selection, successor
//! adoption, predecessor adoption) is a containment test on the ring. Plain
//! `<` / `>` on identifiers is never used for those decisions.

use crate::config::RingConfig;
use crate::ring::Identifier;

/// An interval on the ring from `start` clockwise to `end`.
///
/// When `start == end` the interval covers the whole ring: every identifier
/// when the left end is closed, every identifier except `start` when it is
/// open. Lookups on one- and two-node rings depend on this.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: Identifier,
    pub end: Identifier,
    pub left_open: bool,
    pub right_closed: bool,
}

impl Interval {
    pub fn new(start: Identifier, end: Identifier, left_open: bool, right_closed: bool) -> Self {
        Self {
            start,
            end,
            left_open,
            right_closed,
        }
    }

    /// `(start, end]`
    pub fn open_closed(start: Identifier, end: Identifier) -> Self {
        Self::new(start, end, true, true)
    }

    /// `(start, end)`
    pub fn open(start: Identifier, end: Identifier) -> Self {
        Self::new(start, end, true, false)
    }

    /// `[start, end]`
    pub fn closed(start: Identifier, end: Identifier) -> Self {
        Self::new(start, end, false, true)
    }

    /// `[start, end)`
    pub fn closed_open(start: Identifier, end: Identifier) -> Self {
        Self::new(start, end, false, false)
    }

    /// Returns true if `x` lies inside the interval. All three operands are
    /// reduced modulo `2^m` first.
    pub fn contains(&self, x: Identifier, config: &RingConfig) -> bool {
        let a = self.start.reduce(config).0;
        let b = self.end.reduce(config).0;
        let x = x.reduce(config).0;

        let after_start = if self.left_open { x > a } else { x >= a };
        let before_end = if self.right_closed { x <= b } else { x < b };

        if a < b {
            after_start && before_end
        } else if a > b {
            // wraps past zero
            after_start || before_end
        } else if self.left_open {
            x != a
        } else {
            true
        }
    }
}
