//! Core partitioner trait definitions.

use crate::config::RingConfig;
use crate::ring::Identifier;

/// A partitioner converts keys into identifiers for placement on the ring.
///
/// Partitioners are stateless and thread-safe, and must be deterministic
/// across processes and platforms: the same key always lands on the same
/// identifier for the same ring width.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into an identifier in `[0, 2^m)`.
    fn partition(&self, key: &[u8], config: &RingConfig) -> Identifier;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
