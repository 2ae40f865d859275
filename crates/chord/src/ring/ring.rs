//! Ring membership registry.
//!
//! `ChordRing` creates nodes, assigns their identifiers through the
//! partitioner and keeps every created node so a maintenance driver can
//! iterate them. It is also the in-process [`Network`]: nodes reach each other
//! by resolving identifiers here. It is scoped to one ring configuration and
//! is not a process-wide singleton.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::node::Node;
use crate::partitioner::{Partitioner, Sha1Partitioner};
use crate::ring::Identifier;
use crate::topology::Topology;

pub struct ChordRing {
    config: RingConfig,
    partitioner: Arc<dyn Partitioner>,
    index: DashMap<Identifier, Arc<Node>>,
    /// Creation order; drivers visit nodes in this order.
    members: RwLock<Vec<Arc<Node>>>,
}

impl ChordRing {
    /// Creates an empty ring using SHA-1 identifiers.
    pub fn new(config: RingConfig) -> Self {
        Self::with_partitioner(config, Arc::new(Sha1Partitioner))
    }

    pub fn with_partitioner(config: RingConfig, partitioner: Arc<dyn Partitioner>) -> Self {
        Self {
            config,
            partitioner,
            index: DashMap::new(),
            members: RwLock::new(Vec::new()),
        }
    }

    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Identifier of a node address or data key on this ring.
    pub fn hash(&self, s: &str) -> Identifier {
        self.partitioner.partition(s.as_bytes(), &self.config)
    }

    /// Creates and registers an inactive node for `address`. The caller
    /// then runs `create` or `join` on it.
    pub fn create_node(&self, address: impl Into<String>) -> Result<Arc<Node>> {
        let address = address.into();
        let id = self.hash(&address);

        match self.index.entry(id) {
            Entry::Occupied(existing) => Err(Error::IdCollision {
                address,
                id,
                existing: existing.get().address().to_string(),
            }),
            Entry::Vacant(slot) => {
                let node = Arc::new(Node::new(id, address, self.config));
                slot.insert(Arc::clone(&node));
                self.members.write().push(Arc::clone(&node));
                tracing::debug!(node = %node, "registered node");
                Ok(node)
            }
        }
    }

    pub fn node(&self, id: Identifier) -> Option<Arc<Node>> {
        self.index.get(&id).map(|n| Arc::clone(n.value()))
    }

    /// Every registered node, in creation order.
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        self.members.read().clone()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Owner of `key` as resolved from the entry node `via`.
    pub fn lookup(&self, via: &Arc<Node>, key: &str) -> Result<Arc<Node>> {
        via.find_successor(self, self.hash(key))
    }

    /// Stores `key` on the owner resolved from `via`, returning that owner.
    pub fn put(&self, via: &Arc<Node>, key: &str, value: impl Into<String>) -> Result<Arc<Node>> {
        let owner = self.lookup(via, key)?;
        owner.store().put(key, value);
        tracing::debug!(key, owner = %owner, "put");
        Ok(owner)
    }

    /// Reads `key` from the owner resolved from `via`.
    pub fn get(&self, via: &Arc<Node>, key: &str) -> Result<Option<String>> {
        Ok(self.lookup(via, key)?.store().get(key))
    }

    /// Moves every key `node` holds but no longer owns to the node currently
    /// responsible for it. Returns the number of keys moved.
    ///
    /// Ownership is resolved from `node` itself, so during convergence a key
    /// may be moved to a stale owner; a later pass moves it on.
    pub fn handoff_keys(&self, node: &Arc<Node>) -> Result<usize> {
        let mut moved = 0;
        for key in node.store().keys() {
            let owner = node.find_successor(self, self.hash(&key))?;
            if owner.id() == node.id() {
                continue;
            }
            if let Some(value) = node.store().remove(&key) {
                owner.store().put(key.as_str(), value);
                tracing::info!(key = %key, from = %node, to = %owner, "handed off key");
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Runs [`handoff_keys`](Self::handoff_keys) on every active node.
    pub fn rebalance(&self) -> Result<usize> {
        let mut moved = 0;
        for node in self.nodes().iter().filter(|n| n.is_active()) {
            moved += self.handoff_keys(node)?;
        }
        Ok(moved)
    }

    /// Snapshot of every node's routing state.
    pub fn topology(&self) -> Topology {
        Topology::new(self.config, self.nodes().iter().map(|n| n.topo_info()))
    }
}

impl Network for ChordRing {
    fn resolve(&self, id: Identifier) -> Result<Arc<Node>> {
        self.node(id).ok_or(Error::UnknownNode(id))
    }

    /// Every registered node is reachable in-process.
    fn is_alive(&self, id: Identifier) -> bool {
        self.index.contains_key(&id)
    }
}

/// Builder for [`ChordRing`].
///
/// Addresses added with [`node`](Self::node) are registered on `build`: the
/// first one creates the ring and every later one joins through it. No
/// stabilization is run.
pub struct RingBuilder {
    bits: u8,
    partitioner: Arc<dyn Partitioner>,
    addresses: Vec<String>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            bits: RingConfig::default().bits(),
            partitioner: Arc::new(Sha1Partitioner),
            addresses: Vec::new(),
        }
    }

    /// Identifier width `m`.
    pub fn bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    pub fn partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn node(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    pub fn build(self) -> Result<ChordRing> {
        let ring = ChordRing::with_partitioner(RingConfig::new(self.bits)?, self.partitioner);
        let mut bootstrap: Option<Arc<Node>> = None;
        for address in self.addresses {
            let node = ring.create_node(address)?;
            node.join(&ring, bootstrap.as_ref())?;
            bootstrap.get_or_insert(node);
        }
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
