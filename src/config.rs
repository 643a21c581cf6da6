//! Game configuration and variants
//!
//! Everything here is fixed when a [`RoundController`](crate::RoundController)
//! is built. There is no process-wide state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Preset variants of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Linear scoring, the same dots every round, bare markers
    Classic,
    /// Curved scoring with index labels and help text
    Labeled,
    /// Like `Labeled`, but the dots move every round
    #[default]
    Shuffled,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Labeled => "labeled",
            Variant::Shuffled => "shuffled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "v1" => Some(Variant::Classic),
            "labeled" | "labelled" | "v2" => Some(Variant::Labeled),
            "shuffled" | "shuffle" | "v3" => Some(Variant::Shuffled),
            _ => None,
        }
    }
}

/// How guesses are matched to dots when scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PairingStrategy {
    /// Guess `i` is scored against dot `i`, whatever its position.
    /// A guess right on dot #2 that was clicked first still counts against dot #1.
    #[default]
    ClickOrder,
    /// Each guess, in click order, takes the nearest dot not yet taken
    NearestDot,
}

/// Construction-time game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Playfield width in pixels
    pub width: u32,
    /// Playfield height in pixels
    pub height: u32,
    /// Dots per round
    pub n_dots: u32,
    /// Marker radius in pixels
    pub dot_radius: f64,
    /// Seconds the dots stay visible (0 hides them immediately)
    pub reveal_secs: f64,
    /// Regenerate dot positions on every round
    pub shuffle_dots: bool,
    /// Power applied to the accuracy fraction
    pub score_exponent: f64,
    #[serde(default)]
    pub pairing: PairingStrategy,
    /// Draw 1-based order numbers next to dots and guesses
    pub show_index_labels: bool,
    /// Draw the contextual help line
    pub show_help: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl Configuration {
    /// Build the preset configuration for a variant
    pub fn from_variant(variant: Variant) -> Self {
        let base = Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            n_dots: DEFAULT_N_DOTS,
            dot_radius: DEFAULT_DOT_RADIUS,
            reveal_secs: DEFAULT_REVEAL_SECS,
            shuffle_dots: false,
            score_exponent: DEFAULT_SCORE_EXPONENT,
            pairing: PairingStrategy::ClickOrder,
            show_index_labels: true,
            show_help: true,
        };

        match variant {
            Variant::Classic => Self {
                score_exponent: 1.0,
                show_index_labels: false,
                show_help: false,
                ..base
            },
            Variant::Labeled => base,
            Variant::Shuffled => Self {
                shuffle_dots: true,
                ..base
            },
        }
    }

    /// Check every precondition the controller relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_dots == 0 {
            return Err(ConfigError::NoDots);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if !is_non_negative(self.dot_radius) {
            return Err(ConfigError::DotRadius(self.dot_radius));
        }
        if !is_non_negative(self.reveal_secs) || self.reveal_secs > MAX_REVEAL_SECS {
            return Err(ConfigError::RevealDuration(self.reveal_secs));
        }
        if !is_non_negative(self.score_exponent) {
            return Err(ConfigError::ScoreExponent(self.score_exponent));
        }
        Ok(())
    }

    /// Reveal time as a `Duration`, clamped to `[0, MAX_REVEAL_SECS]`
    pub fn reveal_duration(&self) -> Duration {
        let secs = if self.reveal_secs.is_nan() {
            0.0
        } else {
            self.reveal_secs.clamp(0.0, MAX_REVEAL_SECS)
        };
        Duration::from_secs_f64(secs)
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
