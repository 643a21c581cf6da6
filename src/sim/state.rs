//! Round state types
//!
//! A round owns its dots and guesses outright; nothing here holds references
//! into anything else.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scoring::max_dist_sqr;
use crate::Point;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Dots visible, clicks ignored until the reveal timer fires
    ShowingDots,
    /// Dots hidden, every click places the next guess
    AwaitingGuesses,
    /// All guesses placed and scored, the next click restarts
    ScoredAwaitingRestart,
}

/// A dot the player has to remember
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub index: usize,
    pub pos: Point,
}

/// A placed guess; `index` is its click order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub index: usize,
    pub pos: Point,
}

/// Ties a scheduled reveal timer to the round that scheduled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealToken {
    generation: u64,
}

impl RevealToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// Round generation this timer belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Dots and guesses for one show/guess/score cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Round {
    dots: Vec<Dot>,
    guesses: Vec<Guess>,
    /// Worst-case total squared error, cached when the dots are placed
    max_dist_sqr: f64,
}

impl Round {
    /// Place `n_dots` dots uniformly in `[0, width) x [0, height)`
    pub fn generate(rng: &mut impl Rng, width: f64, height: f64, n_dots: usize) -> Self {
        let positions: Vec<Point> = (0..n_dots)
            .map(|_| Point::new(rng.random_range(0.0..width), rng.random_range(0.0..height)))
            .collect();
        Self::with_dots(positions, width, height)
    }

    /// Build a round from known dot positions
    pub fn with_dots(positions: impl IntoIterator<Item = Point>, width: f64, height: f64) -> Self {
        let dots: Vec<Dot> = positions
            .into_iter()
            .enumerate()
            .map(|(index, pos)| Dot { index, pos })
            .collect();
        let max_dist_sqr = max_dist_sqr(&dots, width, height);
        Self {
            guesses: Vec::with_capacity(dots.len()),
            dots,
            max_dist_sqr,
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn max_dist_sqr(&self) -> f64 {
        self.max_dist_sqr
    }

    /// True once there is a guess for every dot
    pub fn is_complete(&self) -> bool {
        self.guesses.len() == self.dots.len()
    }

    /// Record the next guess; returns its index, or `None` if the round is full
    pub(crate) fn push_guess(&mut self, pos: Point) -> Option<usize> {
        if self.is_complete() {
            return None;
        }
        let index = self.guesses.len();
        self.guesses.push(Guess { index, pos });
        Some(index)
    }

    pub(crate) fn clear_guesses(&mut self) {
        self.guesses.clear();
    }
}
