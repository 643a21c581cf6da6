//! One-shot timers
//!
//! The controller only ever schedules; the host calls
//! [`RoundController::on_reveal_elapsed`](crate::RoundController::on_reveal_elapsed)
//! with the token once the delay has passed, on the same thread that
//! delivers clicks and frames.

use std::time::Duration;

use crate::sim::RevealToken;

/// Host timer service
pub trait Clock {
    /// Fire `token` back at the controller after `delay`
    fn schedule_once(&mut self, delay: Duration, token: RevealToken);
}

/// Deterministic clock advanced by hand (tests, headless play)
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
    pending: Vec<(Duration, RevealToken)>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers that have not fired yet
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move time forward; returns the tokens that came due, earliest first
    pub fn advance(&mut self, dt: Duration) -> Vec<RevealToken> {
        self.now += dt;
        let now = self.now;

        let mut due = Vec::new();
        self.pending.retain(|&(at, token)| {
            if at <= now {
                due.push((at, token));
                false
            } else {
                true
            }
        });

        // Stable sort keeps scheduling order for timers due at the same instant
        due.sort_by_key(|&(at, _)| at);
        due.into_iter().map(|(_, token)| token).collect()
    }
}

impl Clock for ManualClock {
    fn schedule_once(&mut self, delay: Duration, token: RevealToken) {
        self.pending.push((self.now + delay, token));
    }
}
