//! In-session score history
//!
//! Lives in memory only and is gone when the process exits. Tracks the top
//! 10 rounds plus a running average.

use serde::{Deserialize, Serialize};

/// Maximum number of best rounds to keep
pub const MAX_BEST_ROUNDS: usize = 10;

/// A single scored round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number (1-based)
    pub round: u32,
    /// Final score in percent
    pub percent: f64,
}

/// Best rounds of the current session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreHistory {
    /// Sorted descending by percent; earlier rounds win ties
    best: Vec<RoundResult>,
    rounds_played: u32,
    total_percent: f64,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the best list
    pub fn qualifies(&self, percent: f64) -> bool {
        if !percent.is_finite() {
            return false;
        }
        if self.best.len() < MAX_BEST_ROUNDS {
            return true;
        }
        self.best.last().map(|r| percent > r.percent).unwrap_or(true)
    }

    /// Record a scored round.
    /// Returns the rank achieved in the best list (1-indexed), if any.
    pub fn record(&mut self, round: u32, percent: f64) -> Option<usize> {
        self.rounds_played += 1;
        self.total_percent += percent;

        if !self.qualifies(percent) {
            return None;
        }

        let entry = RoundResult { round, percent };
        let pos = self.best.iter().position(|r| percent > r.percent);
        let rank = match pos {
            Some(i) => {
                self.best.insert(i, entry);
                i + 1
            }
            None => {
                self.best.push(entry);
                self.best.len()
            }
        };

        self.best.truncate(MAX_BEST_ROUNDS);
        Some(rank)
    }

    pub fn best(&self) -> &[RoundResult] {
        &self.best
    }

    /// Highest score so far
    pub fn top(&self) -> Option<f64> {
        self.best.first().map(|r| r.percent)
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Mean score over every recorded round
    pub fn average(&self) -> Option<f64> {
        (self.rounds_played > 0).then(|| self.total_percent / self.rounds_played as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.rounds_played == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_descending() {
        let mut history = ScoreHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.record(1, 40.0), Some(1));
        assert_eq!(history.record(2, 90.0), Some(1));
        assert_eq!(history.record(3, 60.0), Some(2));

        let rounds: Vec<u32> = history.best().iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![2, 3, 1]);
        assert_eq!(history.top(), Some(90.0));
        assert_eq!(history.rounds_played(), 3);
        assert!((history.average().unwrap() - 190.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_earlier_round_first() {
        let mut history = ScoreHistory::new();
        history.record(1, 50.0);
        assert_eq!(history.record(2, 50.0), Some(2));
        assert_eq!(history.best()[0].round, 1);
    }

    #[test]
    fn test_best_list_is_capped() {
        let mut history = ScoreHistory::new();
        for round in 1..=MAX_BEST_ROUNDS as u32 {
            history.record(round, 50.0 + round as f64);
        }
        assert!(!history.qualifies(10.0));
        assert_eq!(history.record(99, 10.0), None);
        assert_eq!(history.best().len(), MAX_BEST_ROUNDS);
        // Still counted towards the average
        assert_eq!(history.rounds_played(), MAX_BEST_ROUNDS as u32 + 1);

        assert_eq!(history.record(100, 99.0), Some(1));
        assert_eq!(history.best().len(), MAX_BEST_ROUNDS);
        assert_eq!(history.best().last().unwrap().percent, 52.0);
    }

    #[test]
    fn test_zero_scores_count() {
        let mut history = ScoreHistory::new();
        assert_eq!(history.record(1, 0.0), Some(1));
        assert_eq!(history.average(), Some(0.0));
    }
}
