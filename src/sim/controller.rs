//! Round controller
//!
//! Owns all game state and drives the cycle
//! show dots → hide → collect guesses → score → restart.
//!
//! State only changes inside the host's event handlers:
//! [`RoundController::submit_click`], [`RoundController::on_reveal_elapsed`]
//! and [`RoundController::start_round`]. Rendering is a pure read.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scoring::{Score, score_round};
use super::state::{RevealToken, Round, RoundPhase};
use crate::config::Configuration;
use crate::consts::*;
use crate::error::ConfigError;
use crate::history::ScoreHistory;
use crate::platform::{Anchor, Canvas, Clock, Color, colors};
use crate::Point;

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Dots still showing, click dropped
    Ignored,
    /// A guess was placed and more are needed
    GuessRecorded { index: usize },
    /// The final guess was placed and the round scored
    Scored(Score),
    /// The score was dismissed and a new round started
    Restarted { round: u32 },
}

pub struct RoundController {
    config: Configuration,
    rng: Pcg32,
    round: Round,
    phase: RoundPhase,
    /// Bumped on every round start; stale reveal timers carry an older value
    generation: u64,
    round_number: u32,
    score: Option<Score>,
    history: ScoreHistory,
}

impl RoundController {
    /// Validate the configuration and start the first round
    pub fn new(config: Configuration, seed: u64, clock: &mut impl Clock) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Dot game {}x{} with {} dots (seed {})",
            config.width,
            config.height,
            config.n_dots,
            seed
        );

        let mut controller = Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::default(),
            phase: RoundPhase::ShowingDots,
            generation: 0,
            round_number: 0,
            score: None,
            history: ScoreHistory::new(),
        };
        controller.start_round(clock);
        Ok(controller)
    }

    /// Begin a new round: place (or keep) the dots, clear guesses and arm the reveal timer
    pub fn start_round(&mut self, clock: &mut impl Clock) {
        if self.config.shuffle_dots || self.round.dots().is_empty() {
            self.round = Round::generate(
                &mut self.rng,
                self.config.width as f64,
                self.config.height as f64,
                self.config.n_dots as usize,
            );
        } else {
            self.round.clear_guesses();
        }

        self.score = None;
        self.generation += 1;
        self.round_number += 1;

        let reveal = self.config.reveal_duration();
        if reveal.is_zero() {
            self.phase = RoundPhase::AwaitingGuesses;
        } else {
            self.phase = RoundPhase::ShowingDots;
            clock.schedule_once(reveal, RevealToken::new(self.generation));
        }

        log::info!(
            "Round {} started (max_dist_sqr {:.0}, reveal {:?})",
            self.round_number,
            self.round.max_dist_sqr(),
            reveal
        );
    }

    /// Reveal timer callback. Returns false if the timer belonged to an earlier round.
    pub fn on_reveal_elapsed(&mut self, token: RevealToken) -> bool {
        if token.generation() != self.generation {
            log::debug!(
                "Stale reveal timer (generation {}, current {})",
                token.generation(),
                self.generation
            );
            return false;
        }
        if self.phase != RoundPhase::ShowingDots {
            return false;
        }

        self.phase = RoundPhase::AwaitingGuesses;
        log::debug!("Round {}: dots hidden", self.round_number);
        true
    }

    /// Pointer click at `point` (any position is accepted)
    pub fn submit_click(&mut self, point: Point, clock: &mut impl Clock) -> RoundEvent {
        match self.phase {
            RoundPhase::ShowingDots => {
                log::debug!("Click at ({:.0}, {:.0}) ignored while dots are shown", point.x, point.y);
                RoundEvent::Ignored
            }
            RoundPhase::AwaitingGuesses => {
                let Some(index) = self.round.push_guess(point) else {
                    return RoundEvent::Ignored;
                };
                if !self.round.is_complete() {
                    return RoundEvent::GuessRecorded { index };
                }

                let score = score_round(&self.round, self.config.score_exponent, self.config.pairing);
                self.score = Some(score);
                self.phase = RoundPhase::ScoredAwaitingRestart;

                let rank = self.history.record(self.round_number, score.percent);
                log::info!(
                    "Round {} scored {:.1}% (error_sqr {:.0} / {:.0}, rank {:?})",
                    self.round_number,
                    score.percent,
                    score.error_sqr,
                    score.max_dist_sqr,
                    rank
                );
                RoundEvent::Scored(score)
            }
            RoundPhase::ScoredAwaitingRestart => {
                self.start_round(clock);
                RoundEvent::Restarted {
                    round: self.round_number,
                }
            }
        }
    }

    /// Emit the current frame
    pub fn render(&self, canvas: &mut impl Canvas) {
        canvas.clear();

        if self.phase == RoundPhase::ShowingDots {
            for dot in self.round.dots() {
                self.draw_marker(canvas, dot.pos, dot.index, colors::DOT);
            }
        }
        for guess in self.round.guesses() {
            self.draw_marker(canvas, guess.pos, guess.index, colors::GUESS);
        }

        canvas.draw_text(&self.round_label(), Point::new(LABEL_X, ROUND_LABEL_Y), Anchor::Left);
        if let Some(score) = &self.score {
            canvas.draw_text(&score.label(), Point::new(LABEL_X, SCORE_LABEL_Y), Anchor::Left);
        }
        if let Some(help) = self.help_text() {
            canvas.draw_text(help, Point::new(LABEL_X, HELP_LABEL_Y), Anchor::Left);
        }
    }

    fn draw_marker(&self, canvas: &mut impl Canvas, pos: Point, index: usize, color: Color) {
        let radius = self.config.dot_radius;
        canvas.draw_circle(pos, radius, color);
        if self.config.show_index_labels {
            let label_pos = pos + Point::new(0.0, radius + INDEX_LABEL_GAP);
            canvas.draw_text(&(index + 1).to_string(), label_pos, Anchor::Center);
        }
    }

    fn round_label(&self) -> String {
        format!("Round {}: {} dots", self.round_number, self.config.n_dots)
    }

    fn help_text(&self) -> Option<&'static str> {
        if !self.config.show_help {
            return None;
        }
        match self.phase {
            RoundPhase::ShowingDots => None,
            RoundPhase::AwaitingGuesses => Some("click to place each point"),
            RoundPhase::ScoredAwaitingRestart => Some("click to start again"),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// 1-based number of the current round
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Score of the current round, once all guesses are in
    pub fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{PairingStrategy, Variant};
    use crate::platform::{DrawCommand, ManualClock, RecordingCanvas};

    const REVEAL: Duration = Duration::from_secs(1);

    fn config(n_dots: u32) -> Configuration {
        Configuration {
            n_dots,
            reveal_secs: 1.0,
            ..Configuration::from_variant(Variant::Labeled)
        }
    }

    /// Controller with known dot positions, already past the reveal
    fn controller_with_dots(positions: &[Point], exponent: f64) -> (RoundController, ManualClock) {
        let mut clock = ManualClock::new();
        let config = Configuration {
            score_exponent: exponent,
            ..config(positions.len() as u32)
        };
        let mut game = RoundController::new(config, 1, &mut clock).unwrap();
        game.round = Round::with_dots(positions.iter().copied(), 800.0, 600.0);
        hide_dots(&mut game, &mut clock);
        (game, clock)
    }

    fn hide_dots(game: &mut RoundController, clock: &mut ManualClock) {
        for token in clock.advance(REVEAL) {
            game.on_reveal_elapsed(token);
        }
        assert_eq!(game.phase(), RoundPhase::AwaitingGuesses);
    }

    #[test]
    fn test_new_rejects_zero_dots() {
        let mut clock = ManualClock::new();
        let result = RoundController::new(config(0), 1, &mut clock);
        assert!(matches!(result, Err(ConfigError::NoDots)));
        // Nothing was scheduled
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_new_starts_first_round() {
        let mut clock = ManualClock::new();
        let game = RoundController::new(config(3), 1, &mut clock).unwrap();
        assert_eq!(game.phase(), RoundPhase::ShowingDots);
        assert_eq!(game.round_number(), 1);
        assert_eq!(game.round().dots().len(), 3);
        assert!(game.round().guesses().is_empty());
        assert!(game.score().is_none());
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_clicks_ignored_while_showing() {
        let mut clock = ManualClock::new();
        let mut game = RoundController::new(config(2), 1, &mut clock).unwrap();

        for _ in 0..5 {
            assert_eq!(game.submit_click(Point::new(10.0, 10.0), &mut clock), RoundEvent::Ignored);
        }
        assert!(game.round().guesses().is_empty());
        assert_eq!(game.phase(), RoundPhase::ShowingDots);
    }

    #[test]
    fn test_reveal_timer_hides_dots() {
        let mut clock = ManualClock::new();
        let mut game = RoundController::new(config(2), 1, &mut clock).unwrap();

        assert!(clock.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(game.phase(), RoundPhase::ShowingDots);

        let fired = clock.advance(Duration::from_millis(1));
        assert_eq!(fired.len(), 1);
        assert!(game.on_reveal_elapsed(fired[0]));
        assert_eq!(game.phase(), RoundPhase::AwaitingGuesses);

        // Firing the same token twice changes nothing
        assert!(!game.on_reveal_elapsed(fired[0]));
    }

    #[test]
    fn test_reveal_shorter_than_a_frame() {
        let mut clock = ManualClock::new();
        let config = Configuration {
            reveal_secs: 0.005,
            ..config(2)
        };
        let mut game = RoundController::new(config, 1, &mut clock).unwrap();
        assert_eq!(game.phase(), RoundPhase::ShowingDots);

        // One ~60 Hz frame covers the whole reveal
        let fired = clock.advance(Duration::from_millis(16));
        assert_eq!(fired.len(), 1);
        assert!(game.on_reveal_elapsed(fired[0]));
        assert_eq!(game.phase(), RoundPhase::AwaitingGuesses);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_overlong_reveal_rejected() {
        let mut clock = ManualClock::new();
        let config = Configuration {
            reveal_secs: 1e20,
            ..config(2)
        };
        let result = RoundController::new(config, 1, &mut clock);
        assert!(matches!(result, Err(ConfigError::RevealDuration(_))));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_zero_reveal_skips_showing() {
        let mut clock = ManualClock::new();
        let config = Configuration {
            reveal_secs: 0.0,
            ..config(2)
        };
        let game = RoundController::new(config, 1, &mut clock).unwrap();
        assert_eq!(game.phase(), RoundPhase::AwaitingGuesses);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_stale_timer_ignored_after_restart() {
        let mut clock = ManualClock::new();
        let mut game = RoundController::new(config(1), 1, &mut clock).unwrap();

        // Host restarts before the first reveal fires
        clock.advance(Duration::from_millis(600));
        game.start_round(&mut clock);
        assert_eq!(game.round_number(), 2);

        // First round's timer comes due; must not hide round 2's dots early
        let fired = clock.advance(Duration::from_millis(500));
        assert_eq!(fired.len(), 1);
        assert!(!game.on_reveal_elapsed(fired[0]));
        assert_eq!(game.phase(), RoundPhase::ShowingDots);

        let fired = clock.advance(Duration::from_millis(500));
        assert_eq!(fired.len(), 1);
        assert!(game.on_reveal_elapsed(fired[0]));
        assert_eq!(game.phase(), RoundPhase::AwaitingGuesses);
    }

    #[test]
    fn test_perfect_round_scores_100() {
        let (mut game, mut clock) = controller_with_dots(&[Point::new(400.0, 300.0)], 1.0);
        assert_eq!(game.round().max_dist_sqr(), 250_000.0);

        let event = game.submit_click(Point::new(400.0, 300.0), &mut clock);
        let RoundEvent::Scored(score) = event else {
            panic!("expected a score, got {event:?}");
        };
        assert_eq!(score.percent, 100.0);
        assert_eq!(game.phase(), RoundPhase::ScoredAwaitingRestart);
        assert_eq!(game.score(), Some(&score));
    }

    #[test]
    fn test_corner_guess_scores_0() {
        let (mut game, mut clock) = controller_with_dots(&[Point::new(400.0, 300.0)], 2.0);
        let event = game.submit_click(Point::ZERO, &mut clock);
        assert!(matches!(event, RoundEvent::Scored(s) if s.error_sqr == 250_000.0 && s.percent == 0.0));
    }

    #[test]
    fn test_scored_after_exactly_n_guesses() {
        let dots = [Point::new(100.0, 100.0), Point::new(200.0, 200.0), Point::new(300.0, 300.0)];
        let (mut game, mut clock) = controller_with_dots(&dots, 2.0);

        assert_eq!(game.submit_click(dots[0], &mut clock), RoundEvent::GuessRecorded { index: 0 });
        assert_eq!(game.submit_click(dots[1], &mut clock), RoundEvent::GuessRecorded { index: 1 });
        assert!(game.score().is_none());
        assert!(matches!(game.submit_click(dots[2], &mut clock), RoundEvent::Scored(_)));
        assert_eq!(game.round().guesses().len(), 3);
        assert_eq!(game.history().rounds_played(), 1);
    }

    #[test]
    fn test_restart_click_is_not_a_guess() {
        let (mut game, mut clock) = controller_with_dots(&[Point::new(400.0, 300.0)], 2.0);
        game.submit_click(Point::new(400.0, 300.0), &mut clock);

        let event = game.submit_click(Point::new(5.0, 5.0), &mut clock);
        assert_eq!(event, RoundEvent::Restarted { round: 2 });
        assert_eq!(game.phase(), RoundPhase::ShowingDots);
        assert!(game.round().guesses().is_empty());
        assert!(game.score().is_none());
        // Scored exactly once
        assert_eq!(game.history().rounds_played(), 1);
    }

    #[test]
    fn test_fixed_dots_survive_restart() {
        let mut clock = ManualClock::new();
        let mut game = RoundController::new(config(3), 9, &mut clock).unwrap();
        assert!(!game.config().shuffle_dots);
        let before = game.round().dots().to_vec();

        hide_dots(&mut game, &mut clock);
        for dot in &before {
            game.submit_click(dot.pos, &mut clock);
        }
        game.submit_click(Point::ZERO, &mut clock);

        assert_eq!(game.round().dots(), before.as_slice());
        assert_eq!(game.round_number(), 2);
    }

    #[test]
    fn test_shuffled_dots_regenerate() {
        let mut clock = ManualClock::new();
        let config = Configuration {
            shuffle_dots: true,
            ..config(3)
        };
        let mut game = RoundController::new(config, 9, &mut clock).unwrap();
        let before = game.round().dots().to_vec();

        hide_dots(&mut game, &mut clock);
        for dot in &before {
            game.submit_click(dot.pos, &mut clock);
        }
        game.submit_click(Point::ZERO, &mut clock);

        assert_eq!(game.round().dots().len(), 3);
        assert_ne!(game.round().dots(), before.as_slice());
    }

    #[test]
    fn test_nearest_dot_pairing_forgives_order() {
        let dots = [Point::new(100.0, 100.0), Point::new(700.0, 500.0)];
        let mut clock = ManualClock::new();
        let config = Configuration {
            pairing: PairingStrategy::NearestDot,
            ..config(2)
        };
        let mut game = RoundController::new(config, 1, &mut clock).unwrap();
        game.round = Round::with_dots(dots, 800.0, 600.0);
        hide_dots(&mut game, &mut clock);

        game.submit_click(dots[1], &mut clock);
        let event = game.submit_click(dots[0], &mut clock);
        assert!(matches!(event, RoundEvent::Scored(s) if s.percent == 100.0));
    }

    #[test]
    fn test_render_showing_dots() {
        let mut clock = ManualClock::new();
        let game = RoundController::new(config(3), 1, &mut clock).unwrap();
        let mut canvas = RecordingCanvas::new();
        game.render(&mut canvas);

        assert_eq!(canvas.commands()[0], DrawCommand::Clear);
        let expected: Vec<Point> = game.round().dots().iter().map(|d| d.pos).collect();
        assert_eq!(canvas.circles(colors::DOT), expected);
        assert!(canvas.circles(colors::GUESS).is_empty());
        assert_eq!(canvas.texts(), vec!["1", "2", "3", "Round 1: 3 dots"]);
    }

    #[test]
    fn test_render_hides_dots_and_shows_guesses() {
        let dots = [Point::new(100.0, 100.0), Point::new(200.0, 200.0)];
        let (mut game, mut clock) = controller_with_dots(&dots, 2.0);
        game.submit_click(Point::new(110.0, 90.0), &mut clock);

        let mut canvas = RecordingCanvas::new();
        game.render(&mut canvas);
        assert!(canvas.circles(colors::DOT).is_empty());
        assert_eq!(canvas.circles(colors::GUESS), vec![Point::new(110.0, 90.0)]);
        assert_eq!(
            canvas.texts(),
            vec!["1", "Round 1: 2 dots", "click to place each point"]
        );

        game.submit_click(Point::new(200.0, 200.0), &mut clock);
        canvas.reset();
        game.render(&mut canvas);
        let texts = canvas.texts();
        assert!(texts.iter().any(|t| t.starts_with("Score: ")));
        assert_eq!(texts.last(), Some(&"click to start again"));
        assert_eq!(canvas.circles(colors::GUESS).len(), 2);
    }

    #[test]
    fn test_render_classic_has_no_extra_labels() {
        let mut clock = ManualClock::new();
        let game = RoundController::new(Configuration::from_variant(Variant::Classic), 1, &mut clock).unwrap();
        let mut canvas = RecordingCanvas::new();
        game.render(&mut canvas);
        assert_eq!(canvas.texts(), vec!["Round 1: 3 dots"]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let dots = [Point::new(100.0, 100.0), Point::new(200.0, 200.0)];
        let (mut game, mut clock) = controller_with_dots(&dots, 2.0);
        game.submit_click(Point::new(120.0, 80.0), &mut clock);

        let mut first = RecordingCanvas::new();
        let mut second = RecordingCanvas::new();
        game.render(&mut first);
        game.render(&mut second);
        assert_eq!(first.commands(), second.commands());
    }
}
