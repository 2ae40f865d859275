//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chord::{ChordRing, Node, RingConfig, Stabilizer, StabilizerConfig};

pub const SEED_ADDRESSES: [&str; 4] = [
    "192.168.0.1:5000",
    "192.168.0.2:5000",
    "192.168.0.3:5000",
    "192.168.0.4:5000",
];

pub const KEYS: [(&str, &str); 5] = [
    ("apple", "red"),
    ("banana", "yellow"),
    ("chord", "DHT"),
    ("distributed", "systems"),
    ("chatgpt", "assistant"),
];

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Node A creates an 8-bit ring; B, C and D join through A. Nothing is
/// stabilized yet.
pub fn seed_ring() -> (Arc<ChordRing>, Vec<Arc<Node>>) {
    let ring = Arc::new(ChordRing::new(RingConfig::new(8).unwrap()));
    let a = ring.create_node(SEED_ADDRESSES[0]).unwrap();
    a.create();
    let mut nodes = vec![a];
    for address in &SEED_ADDRESSES[1..] {
        let node = ring.create_node(*address).unwrap();
        node.join(ring.as_ref(), Some(&nodes[0])).unwrap();
        nodes.push(node);
    }
    (ring, nodes)
}

pub fn stabilizer(ring: &Arc<ChordRing>) -> Stabilizer {
    Stabilizer::new(Arc::clone(ring), StabilizerConfig::default())
}
