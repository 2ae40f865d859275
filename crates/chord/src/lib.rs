//! Chord distributed hash table core.
//!
//! This crate provides the lookup and self-organization logic of a Chord ring:
//! - Identifier space and circular interval arithmetic
//! - Hash assignment of addresses and keys (partitioners)
//! - Finger tables and the logarithmic lookup walk
//! - Join, stabilization and finger fixing
//! - A membership registry and a maintenance driver for in-process rings

pub mod config;
pub mod error;
pub mod finger;
pub mod network;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod stabilizer;
pub mod store;
pub mod topology;

pub use config::{Config, RingConfig, StabilizerConfig};
pub use error::{Error, Result};
pub use finger::{FingerEntry, FingerTable};
pub use network::Network;
pub use node::{Node, Route};
pub use partitioner::{hash_to_id, Partitioner, Sha1Partitioner};
pub use ring::{ChordRing, Identifier, Interval, RingBuilder};
pub use stabilizer::Stabilizer;
pub use store::KvStore;
pub use topology::{TopoInfo, Topology};
