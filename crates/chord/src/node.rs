//! Ring participants.
//!
//! A `Node` owns its identity, its routing state (predecessor and finger
//! table, whose slot 0 is the successor) and its key-value store. Peers are
//! only ever referenced by [`Identifier`] and resolved through a [`Network`],
//! so no node's lifetime is tied to who points at it.
//!
//! Routing state sits behind a single per-node mutex. No method holds that
//! lock while calling into another node: remote reads are done first and the
//! lock is re-taken to write.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::finger::{FingerEntry, FingerTable};
use crate::network::Network;
use crate::ring::{Identifier, Interval};
use crate::store::KvStore;
use crate::topology::TopoInfo;

#[derive(Debug)]
struct Routing {
    predecessor: Option<Identifier>,
    fingers: FingerTable,
}

/// Logical node participating in the ring.
#[derive(Debug)]
pub struct Node {
    id: Identifier,
    address: String,
    config: RingConfig,
    routing: Mutex<Routing>,
    store: KvStore,
}

/// Result of a lookup: the owner and how many finger hops it took.
#[derive(Clone, Debug)]
pub struct Route {
    pub owner: Arc<Node>,
    pub hops: usize,
}

impl Node {
    /// Builds an inactive node: no successor, no predecessor, unset fingers.
    pub fn new(id: Identifier, address: impl Into<String>, config: RingConfig) -> Self {
        Self {
            id,
            address: address.into(),
            config,
            routing: Mutex::new(Routing {
                predecessor: None,
                fingers: FingerTable::new(id, config),
            }),
            store: KvStore::new(),
        }
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    pub fn successor(&self) -> Option<Identifier> {
        self.routing.lock().fingers.successor()
    }

    pub fn predecessor(&self) -> Option<Identifier> {
        self.routing.lock().predecessor
    }

    /// Snapshot of the finger table.
    pub fn fingers(&self) -> Vec<FingerEntry> {
        self.routing.lock().fingers.entries().to_vec()
    }

    /// Slot the next `fix_fingers` call will refresh.
    pub fn next_finger_to_fix(&self) -> usize {
        self.routing.lock().fingers.next_to_fix()
    }

    /// True once `create` or `join` has run.
    pub fn is_active(&self) -> bool {
        self.successor().is_some()
    }

    fn active_successor(&self) -> Result<Identifier> {
        self.successor().ok_or(Error::Inactive(self.id))
    }

    pub fn topo_info(&self) -> TopoInfo {
        let routing = self.routing.lock();
        TopoInfo {
            id: self.id,
            address: self.address.clone(),
            successor: routing.fingers.successor(),
            predecessor: routing.predecessor,
            fingers: routing.fingers.nodes(),
        }
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    /// Bootstraps a ring of one.
    pub fn create(&self) {
        let mut routing = self.routing.lock();
        routing.predecessor = None;
        routing.fingers.fill(self.id);
        tracing::info!(node = %self, "created ring");
    }

    /// Joins the ring `known` belongs to, or creates a new one when `known`
    /// is absent.
    ///
    /// Only the successor is resolved here. The rest of the ring learns about
    /// this node through later `stabilize` rounds.
    pub fn join<N>(&self, net: &N, known: Option<&Arc<Node>>) -> Result<()>
    where
        N: Network + ?Sized,
    {
        let Some(known) = known else {
            self.create();
            return Ok(());
        };

        let successor = known.find_successor(net, self.id)?;
        let mut routing = self.routing.lock();
        routing.predecessor = None;
        routing.fingers.set_successor(successor.id);
        tracing::info!(node = %self, via = %known, successor = %successor, "joined ring");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// The node responsible for `id`, as far as current routing state knows.
    ///
    /// During convergence this may be stale; that is not an error.
    pub fn find_successor<N>(self: &Arc<Self>, net: &N, id: Identifier) -> Result<Arc<Node>>
    where
        N: Network + ?Sized,
    {
        Ok(self.route(net, id)?.owner)
    }

    /// Same as [`find_successor`](Self::find_successor), also reporting the
    /// number of finger hops taken.
    pub fn route<N>(self: &Arc<Self>, net: &N, id: Identifier) -> Result<Route>
    where
        N: Network + ?Sized,
    {
        let (predecessor, hops) = self.walk_to_predecessor(net, id)?;
        let owner = net.resolve(predecessor.active_successor()?)?;
        tracing::trace!(from = %self.id, %id, owner = %owner.id, hops, "route resolved");
        Ok(Route { owner, hops })
    }

    /// The node whose `(id, successor]` interval contains `id`, or the last
    /// node reached when finger information cannot get any closer.
    pub fn find_predecessor<N>(self: &Arc<Self>, net: &N, id: Identifier) -> Result<Arc<Node>>
    where
        N: Network + ?Sized,
    {
        Ok(self.walk_to_predecessor(net, id)?.0)
    }

    fn walk_to_predecessor<N>(self: &Arc<Self>, net: &N, id: Identifier) -> Result<(Arc<Node>, usize)>
    where
        N: Network + ?Sized,
    {
        let mut current = Arc::clone(self);
        let mut hops = 0;
        loop {
            let successor = current.active_successor()?;
            if Interval::open_closed(current.id, successor).contains(id, &self.config) {
                break;
            }
            let next = current.closest_preceding_id(id);
            if next == current.id {
                // fingers cannot make progress; best known answer
                tracing::trace!(at = %current.id, %id, "no closer finger");
                break;
            }
            tracing::trace!(from = %current.id, to = %next, %id, "hop");
            current = net.resolve(next)?;
            hops += 1;
        }
        Ok((current, hops))
    }

    /// Highest finger strictly inside `(self, id)`, or `self`.
    pub fn closest_preceding_finger<N>(self: &Arc<Self>, net: &N, id: Identifier) -> Result<Arc<Node>>
    where
        N: Network + ?Sized,
    {
        let next = self.closest_preceding_id(id);
        if next == self.id {
            return Ok(Arc::clone(self));
        }
        net.resolve(next)
    }

    fn closest_preceding_id(&self, id: Identifier) -> Identifier {
        self.routing
            .lock()
            .fingers
            .closest_preceding(id)
            .unwrap_or(self.id)
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Adopts the successor's predecessor when it sits between this node and
    /// its successor, then notifies the successor.
    pub fn stabilize<N>(&self, net: &N) -> Result<()>
    where
        N: Network + ?Sized,
    {
        let successor_id = self.active_successor()?;
        let mut successor = net.resolve(successor_id)?;

        if let Some(candidate) = successor.predecessor() {
            if Interval::open(self.id, successor_id).contains(candidate, &self.config) {
                let closer = net.resolve(candidate)?;
                self.routing.lock().fingers.set_successor(candidate);
                tracing::debug!(node = %self.id, old = %successor_id, new = %candidate, "successor updated");
                successor = closer;
            }
        }

        successor.notify(self);
        Ok(())
    }

    /// `candidate` thinks it might be our predecessor. Returns the
    /// predecessor after the update.
    pub fn notify(&self, candidate: &Node) -> Identifier {
        let mut routing = self.routing.lock();
        match routing.predecessor {
            Some(current) if !Interval::open(current, self.id).contains(candidate.id, &self.config) => {
                current
            }
            previous => {
                if previous != Some(candidate.id) {
                    tracing::debug!(node = %self.id, ?previous, new = %candidate.id, "predecessor updated");
                }
                routing.predecessor = Some(candidate.id);
                candidate.id
            }
        }
    }

    /// Refreshes exactly one finger slot, round-robin.
    pub fn fix_fingers<N>(self: &Arc<Self>, net: &N) -> Result<()>
    where
        N: Network + ?Sized,
    {
        // The lookup below takes this node's lock, so the cursor is read and
        // advanced first and the result written back afterwards.
        let (index, start) = self.routing.lock().fingers.advance();
        let owner = self.find_successor(net, start)?;
        self.routing.lock().fingers.set(index, owner.id);
        Ok(())
    }

    /// Clears the predecessor if the network reports it dead. Returns true
    /// when the pointer was cleared.
    pub fn check_predecessor<N>(&self, net: &N) -> bool
    where
        N: Network + ?Sized,
    {
        let Some(predecessor) = self.predecessor() else {
            return false;
        };
        if net.is_alive(predecessor) {
            return false;
        }

        let mut routing = self.routing.lock();
        if routing.predecessor != Some(predecessor) {
            return false;
        }
        routing.predecessor = None;
        tracing::warn!(node = %self.id, %predecessor, "predecessor unreachable, cleared");
        true
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]@{}", self.id, self.address)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}
