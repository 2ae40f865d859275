//! Call boundary between nodes.
//!
//! Nodes never hold references to each other, only identifiers. Every time a
//! node needs to act on a peer it resolves the identifier through a
//! `Network`. The in-process registry resolves synchronously and never fails
//! for a registered node; an RPC-backed implementation would put timeouts and
//! retries behind the same two calls without touching the protocol logic.

use std::sync::Arc;

use crate::error::Result;
use crate::node::Node;
use crate::ring::Identifier;

pub trait Network {
    /// Returns the node for `id`, or `Error::UnknownNode` if it cannot be
    /// reached.
    fn resolve(&self, id: Identifier) -> Result<Arc<Node>>;

    /// Liveness probe used by `check_predecessor`.
    fn is_alive(&self, id: Identifier) -> bool;
}
