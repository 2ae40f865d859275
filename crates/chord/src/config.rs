//! Ring and maintenance-driver configuration.
//!
//! `RingConfig` is fixed for the lifetime of a ring: every identifier and every
//! piece of ring arithmetic is taken modulo `2^bits`. `StabilizerConfig`
//! controls the external maintenance driver and can be tuned independently.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ring::{Identifier, Interval};

/// Identifier width used when none is configured.
pub const DEFAULT_BITS: u8 = 8;

/// Identifiers are carried as `u64`.
pub const MAX_BITS: u8 = 64;

/// Default cadence of the periodic maintenance loop.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Returns `2^bits`, the size of the identifier space.
pub fn modulus(bits: u8) -> u128 {
    1u128 << bits
}

/// Immutable identifier-space configuration shared by every node of a ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RingConfigRepr")]
pub struct RingConfig {
    bits: u8,
}

#[derive(Deserialize)]
struct RingConfigRepr {
    #[serde(alias = "m")]
    bits: u8,
}

impl TryFrom<RingConfigRepr> for RingConfig {
    type Error = Error;

    fn try_from(repr: RingConfigRepr) -> Result<Self> {
        RingConfig::new(repr.bits)
    }
}

impl RingConfig {
    /// Creates a configuration with the given identifier width `m`.
    pub fn new(bits: u8) -> Result<Self> {
        if bits == 0 || bits > MAX_BITS {
            return Err(Error::InvalidConfig(format!(
                "identifier width must be in 1..={MAX_BITS}, got {bits}"
            )));
        }
        Ok(Self { bits })
    }

    /// Identifier width `m`; also the number of finger slots per node.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn modulus(&self) -> u128 {
        modulus(self.bits)
    }

    /// Circular containment test: is `x` inside the interval from `a` to `b`
    /// with the given open/closed ends? See [`Interval::contains`].
    pub fn contains(
        &self,
        x: Identifier,
        a: Identifier,
        b: Identifier,
        left_open: bool,
        right_closed: bool,
    ) -> bool {
        Interval::new(a, b, left_open, right_closed).contains(x, self)
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self { bits: DEFAULT_BITS }
    }
}

/// Settings for the maintenance driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Milliseconds between two maintenance rounds of the periodic loop.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Run a key handoff pass at the end of every round.
    #[serde(default)]
    pub handoff_keys: bool,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl StabilizerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "stabilizer interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            handoff_keys: false,
        }
    }
}

/// Top-level configuration document.
///
/// ```json
/// { "ring": { "m": 8 }, "stabilizer": { "interval_ms": 500 } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ring: RingConfig,
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.stabilizer.validate()
    }
}
