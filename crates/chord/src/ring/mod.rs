//! The identifier ring.
//!
//! Positions and interval arithmetic modulo `2^m`, plus the membership
//! registry that creates nodes and tracks them for the maintenance loop.

pub mod interval;
pub mod position;
pub mod ring;

pub use interval::Interval;
pub use position::Identifier;
pub use ring::{ChordRing, RingBuilder};
