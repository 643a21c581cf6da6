//! Dot Recall - a short-term spatial memory game
//!
//! Core modules:
//! - `sim`: Round state machine, dot generation and scoring
//! - `platform`: Canvas/clock seams implemented by the host
//! - `config`: Construction-time configuration and game variants
//! - `history`: In-session score history

pub mod config;
pub mod error;
pub mod history;
pub mod platform;
pub mod sim;

pub use config::{Configuration, PairingStrategy, Variant};
pub use error::ConfigError;
pub use history::ScoreHistory;
pub use sim::{RoundController, RoundEvent, RoundPhase, Score};

/// Playfield position in pixels
pub type Point = glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Playfield defaults
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;
    pub const DEFAULT_N_DOTS: u32 = 3;

    /// Marker radius (visual only, never used in scoring)
    pub const DEFAULT_DOT_RADIUS: f64 = 5.0;
    /// Seconds the dots stay visible at the start of a round
    pub const DEFAULT_REVEAL_SECS: f64 = 2.0;
    /// Longest reveal a host timer can express (`setTimeout` takes i32 milliseconds)
    pub const MAX_REVEAL_SECS: f64 = i32::MAX as f64 / 1000.0;
    /// Curve applied to the accuracy fraction (1.0 = linear)
    pub const DEFAULT_SCORE_EXPONENT: f64 = 2.0;

    /// HUD text layout
    pub const LABEL_X: f64 = 10.0;
    pub const ROUND_LABEL_Y: f64 = 10.0;
    pub const SCORE_LABEL_Y: f64 = 30.0;
    pub const HELP_LABEL_Y: f64 = 50.0;
    /// Gap between a marker's edge and its index label
    pub const INDEX_LABEL_GAP: f64 = 3.0;
}
