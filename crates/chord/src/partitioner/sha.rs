//! SHA-1 partitioner.

use sha1::{Digest, Sha1};

use crate::config::RingConfig;
use crate::partitioner::traits::Partitioner;
use crate::ring::Identifier;

/// Takes the first `m` bits of the SHA-1 digest, most significant bit first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Partitioner;

impl Partitioner for Sha1Partitioner {
    fn partition(&self, key: &[u8], config: &RingConfig) -> Identifier {
        let digest = Sha1::digest(key);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        // bits is in 1..=64, so the shift is in 0..=63
        let shift = 64 - u32::from(config.bits());
        Identifier(u64::from_be_bytes(prefix) >> shift)
    }

    fn name(&self) -> &'static str {
        "Sha1Partitioner"
    }
}

/// Maps a string (node address or data key) to its ring identifier.
pub fn hash_to_id(s: &str, config: &RingConfig) -> Identifier {
    Sha1Partitioner.partition(s.as_bytes(), config)
}
