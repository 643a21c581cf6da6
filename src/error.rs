//! Configuration errors
//!
//! Construction is the only fallible step; once a controller exists no
//! operation returns an error.

use thiserror::Error;

/// Rejected [`Configuration`](crate::Configuration).
///
/// Every variant is an `InvalidConfig` failure: the controller refuses to
/// start and nothing else is initialised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid config: n_dots must be at least 1")]
    NoDots,
    #[error("invalid config: playfield must be non-empty, got {width}x{height}")]
    EmptyPlayfield { width: u32, height: u32 },
    #[error("invalid config: dot radius must be finite and non-negative, got {0}")]
    DotRadius(f64),
    #[error("invalid config: reveal duration must be between 0 and {max}s, got {0}s", max = crate::consts::MAX_REVEAL_SECS)]
    RevealDuration(f64),
    #[error("invalid config: score exponent must be finite and non-negative, got {0}")]
    ScoreExponent(f64),
}
