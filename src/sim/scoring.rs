//! Scoring
//!
//! The score compares the total squared error of the guesses against the
//! worst total the player could have managed for the same dots:
//!
//! `percent = 100 * clamp(1 - error_sqr / max_dist_sqr, 0, 1) ^ exponent`

use serde::{Deserialize, Serialize};

use super::state::{Dot, Guess, Round};
use crate::Point;
use crate::config::PairingStrategy;

/// Squared distance from `pos` to the farthest playfield corner
#[inline]
pub fn farthest_corner_dist_sqr(pos: Point, width: f64, height: f64) -> f64 {
    let d_x = pos.x.max(width - pos.x);
    let d_y = pos.y.max(height - pos.y);
    d_x * d_x + d_y * d_y
}

/// Worst-case total squared error for a set of dots
pub fn max_dist_sqr(dots: &[Dot], width: f64, height: f64) -> f64 {
    dots.iter()
        .map(|dot| farthest_corner_dist_sqr(dot.pos, width, height))
        .sum()
}

/// Total squared error between dots and guesses under the given pairing
pub fn error_sqr(dots: &[Dot], guesses: &[Guess], pairing: PairingStrategy) -> f64 {
    match pairing {
        PairingStrategy::ClickOrder => dots
            .iter()
            .zip(guesses)
            .map(|(dot, guess)| dot.pos.distance_squared(guess.pos))
            .sum(),
        PairingStrategy::NearestDot => nearest_dot_error_sqr(dots, guesses),
    }
}

/// Greedy matching: each guess, in click order, takes the closest free dot
fn nearest_dot_error_sqr(dots: &[Dot], guesses: &[Guess]) -> f64 {
    let mut taken = vec![false; dots.len()];
    let mut total = 0.0;

    for guess in guesses {
        let nearest = dots
            .iter()
            .filter(|dot| !taken[dot.index])
            .map(|dot| (dot.index, dot.pos.distance_squared(guess.pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((index, dist_sqr)) = nearest {
            taken[index] = true;
            total += dist_sqr;
        }
    }

    total
}

/// Result of scoring a completed round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Sum of squared guess errors
    pub error_sqr: f64,
    /// Normalisation denominator for this round's dots
    pub max_dist_sqr: f64,
    /// Accuracy fraction, clamped to [0, 1]
    pub fraction: f64,
    /// Final score in [0, 100]
    pub percent: f64,
}

impl Score {
    pub fn new(error_sqr: f64, max_dist_sqr: f64, exponent: f64) -> Self {
        // Off-playfield guesses can push the error past the worst case
        let fraction = if max_dist_sqr > 0.0 {
            (1.0 - error_sqr / max_dist_sqr).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Self {
            error_sqr,
            max_dist_sqr,
            fraction,
            percent: 100.0 * fraction.powf(exponent),
        }
    }

    /// HUD text
    pub fn label(&self) -> String {
        format!("Score: {:.1}%", self.percent)
    }
}

/// Score a round's guesses against its dots
pub fn score_round(round: &Round, exponent: f64, pairing: PairingStrategy) -> Score {
    let error = error_sqr(round.dots(), round.guesses(), pairing);
    Score::new(error, round.max_dist_sqr(), exponent)
}
