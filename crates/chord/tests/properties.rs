//! Property tests for hashing, interval arithmetic and lookup agreement.

mod common;

use std::sync::Arc;

use chord::{hash_to_id, ChordRing, Identifier, Interval, RingConfig, Stabilizer, StabilizerConfig};
use proptest::prelude::*;

fn width() -> impl Strategy<Value = RingConfig> {
    (1u8..=64).prop_map(|bits| RingConfig::new(bits).unwrap())
}

proptest! {
    #[test]
    fn hash_is_deterministic_and_in_range(s in ".*", config in width()) {
        let id = hash_to_id(&s, &config);
        prop_assert_eq!(id, hash_to_id(&s, &config));
        prop_assert!(u128::from(id.0) < config.modulus());
    }

    #[test]
    fn narrower_hash_is_a_prefix(s in ".*", bits in 1u8..64) {
        let wide = hash_to_id(&s, &RingConfig::new(bits + 1).unwrap());
        let narrow = hash_to_id(&s, &RingConfig::new(bits).unwrap());
        prop_assert_eq!(wide.0 >> 1, narrow.0);
    }

    #[test]
    fn open_closed_halves_partition_the_ring(a in 0u64..256, b in 0u64..256, x in 0u64..256) {
        let config = RingConfig::new(8).unwrap();
        let (a, b, x) = (Identifier(a), Identifier(b), Identifier(x));
        let forward = Interval::open_closed(a, b).contains(x, &config);
        if a == b {
            prop_assert_eq!(forward, x != a);
        } else {
            let backward = Interval::open_closed(b, a).contains(x, &config);
            prop_assert!(forward != backward);
        }
    }

    #[test]
    fn containment_matches_clockwise_distance(a in 0u64..256, b in 0u64..256, x in 0u64..256) {
        prop_assume!(a != b);
        let config = RingConfig::new(8).unwrap();
        let (a, b, x) = (Identifier(a), Identifier(b), Identifier(x));
        let dx = a.distance_to(x, &config);
        let db = a.distance_to(b, &config);

        prop_assert_eq!(Interval::open_closed(a, b).contains(x, &config), dx > 0 && dx <= db);
        prop_assert_eq!(Interval::open(a, b).contains(x, &config), dx > 0 && dx < db);
        prop_assert_eq!(Interval::closed(a, b).contains(x, &config), dx <= db);
        prop_assert_eq!(Interval::closed_open(a, b).contains(x, &config), dx < db);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn converged_rings_agree_on_owners(
        addresses in prop::collection::btree_set("[a-z0-9.:]{1,16}", 1..10),
        bits in prop::sample::select(vec![8u8, 12, 16, 24, 32]),
        keys in prop::collection::vec(".{0,12}", 1..8),
    ) {
        common::init_tracing();
        let ring = Arc::new(ChordRing::new(RingConfig::new(bits).unwrap()));
        let mut nodes = Vec::new();
        for address in addresses {
            // colliding addresses are skipped
            if let Ok(node) = ring.create_node(address) {
                match nodes.last() {
                    None => node.create(),
                    Some(prev) => node.join(ring.as_ref(), Some(prev)).unwrap(),
                }
                nodes.push(node);
            }
        }

        let driver = Stabilizer::new(Arc::clone(&ring), StabilizerConfig::default());
        let mut rounds = 0;
        while !ring.topology().is_converged() && rounds < 200 {
            prop_assert_eq!(driver.round(), 0);
            rounds += 1;
        }
        let topology = ring.topology();
        prop_assert!(topology.is_converged(), "not converged after {} rounds", rounds);

        for key in &keys {
            let expected = topology.expected_successor(ring.hash(key));
            for node in &nodes {
                prop_assert_eq!(Some(ring.lookup(node, key).unwrap().id()), expected);
            }
        }
    }
}
