//! Error types for the chord crate.

use thiserror::Error;

use crate::ring::Identifier;

/// Result type alias for the chord crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving a ring.
///
/// Stale routing answers during convergence are not errors; these variants
/// only describe misuse or references that cannot be resolved.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid ring or driver configuration
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Configuration document could not be parsed
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    /// Two addresses hashed to the same identifier
    #[error("identifier collision: {address} hashes to {id}, already held by {existing}")]
    IdCollision {
        address: String,
        id: Identifier,
        existing: String,
    },
    /// A routing reference could not be resolved to a live node
    #[error("unknown node {0}")]
    UnknownNode(Identifier),
    /// The node has not joined a ring yet
    #[error("node {0} has no successor; call create or join first")]
    Inactive(Identifier),
}
