//! Tests for the maintenance driver: the periodic tokio loop and maintenance
//! running concurrently with lookups.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chord::{Stabilizer, StabilizerConfig};
use common::{init_tracing, seed_ring, stabilizer, KEYS};

#[tokio::test(start_paused = true)]
async fn test_periodic_loop_converges() {
    init_tracing();
    let (ring, _nodes) = seed_ring();
    let config = StabilizerConfig {
        interval_ms: 100,
        handoff_keys: false,
    };
    let driver = Arc::new(Stabilizer::new(Arc::clone(&ring), config));

    // the loop never returns; stop it after 30 ticks
    let outcome = tokio::time::timeout(Duration::from_millis(3_000), Arc::clone(&driver).wait()).await;
    assert!(outcome.is_err());

    assert!(ring.topology().is_converged());
}

#[tokio::test(start_paused = true)]
async fn test_spawned_loop_can_be_aborted() {
    init_tracing();
    let (ring, nodes) = seed_ring();
    let driver = Arc::new(Stabilizer::new(
        Arc::clone(&ring),
        StabilizerConfig {
            interval_ms: 50,
            handoff_keys: true,
        },
    ));
    nodes[0].store().put("apple", "red");

    let handle = tokio::spawn(Arc::clone(&driver).wait());
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(ring.topology().is_converged());
    assert_eq!(ring.get(&nodes[3], "apple").unwrap().as_deref(), Some("red"));
    assert!(!nodes[0].store().contains_key("apple"));
}

#[test]
fn test_concurrent_maintenance_and_lookups() {
    init_tracing();
    let (ring, nodes) = seed_ring();

    crossbeam::thread::scope(|s| {
        for node in &nodes {
            let ring = Arc::clone(&ring);
            s.spawn(move |_| {
                for _ in 0..30 {
                    node.stabilize(ring.as_ref()).unwrap();
                    node.fix_fingers(ring.as_ref()).unwrap();
                    node.check_predecessor(ring.as_ref());
                }
            });
        }
        for node in &nodes {
            let ring = Arc::clone(&ring);
            s.spawn(move |_| {
                for _ in 0..30 {
                    for (key, _) in KEYS {
                        // stale owners are fine mid-convergence, errors are not
                        ring.lookup(node, key).unwrap();
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(stabilizer(&ring).run(20), 0);
    assert!(ring.topology().is_converged());
}
