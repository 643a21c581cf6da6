//! Game simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - Seeded RNG only
//! - State changes only through the controller's event handlers
//! - Drawing goes through the `Canvas` trait, timers through `Clock`

pub mod controller;
pub mod scoring;
pub mod state;

pub use controller::{RoundController, RoundEvent};
pub use scoring::{Score, error_sqr, farthest_corner_dist_sqr, max_dist_sqr, score_round};
pub use state::{Dot, Guess, RevealToken, Round, RoundPhase};
