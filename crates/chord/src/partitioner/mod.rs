//! Partitioner abstraction for the Chord ring.
//!
//! Partitioners map node addresses and data keys into the same `m`-bit
//! identifier space, which is what makes ownership a matter of identifier
//! proximity alone.

pub mod sha;
pub mod traits;

pub use sha::{hash_to_id, Sha1Partitioner};
pub use traits::Partitioner;
