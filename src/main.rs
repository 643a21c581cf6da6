//! Dot Recall entry point
//!
//! The browser build draws onto a 2D canvas. The native build plays a few
//! scripted rounds headlessly and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::{Rc, Weak};
    use std::time::Duration;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

    use dot_recall::platform::{Anchor, Canvas, Clock, Color, colors};
    use dot_recall::sim::RevealToken;
    use dot_recall::{Configuration, Point, RoundController, Variant};

    /// Game instance holding all state
    struct Game {
        controller: RoundController,
        canvas: Canvas2d,
    }

    /// `Canvas` backed by a browser 2D context
    struct Canvas2d {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    fn css(color: Color) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            color.r,
            color.g,
            color.b,
            color.a as f64 / 255.0
        )
    }

    impl Canvas for Canvas2d {
        fn clear(&mut self) {
            self.ctx.set_fill_style_str(&css(colors::BACKGROUND));
            self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        }

        fn draw_circle(&mut self, center: Point, radius: f64, color: Color) {
            self.ctx.begin_path();
            if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
                self.ctx.set_fill_style_str(&css(color));
                self.ctx.fill();
            }
        }

        fn draw_text(&mut self, text: &str, pos: Point, anchor: Anchor) {
            self.ctx.set_fill_style_str(&css(colors::TEXT));
            self.ctx.set_text_baseline("top");
            self.ctx.set_text_align(match anchor {
                Anchor::Left => "left",
                Anchor::Center => "center",
            });
            let _ = self.ctx.fill_text(text, pos.x, pos.y);
        }
    }

    /// Reveal timers via `setTimeout`
    struct TimeoutClock {
        game: Weak<RefCell<Game>>,
    }

    impl Clock for TimeoutClock {
        fn schedule_once(&mut self, delay: Duration, token: RevealToken) {
            let Some(window) = web_sys::window() else {
                log::error!("No window, reveal timer for round generation {} dropped", token.generation());
                return;
            };
            let timeout_ms = i32::try_from(delay.as_millis()).unwrap_or_else(|_| {
                log::warn!("Reveal delay {:?} exceeds setTimeout range, clamping", delay);
                i32::MAX
            });
            let game = self.game.clone();
            let closure = Closure::<dyn FnMut()>::once(move || {
                if let Some(game) = game.upgrade() {
                    game.borrow_mut().controller.on_reveal_elapsed(token);
                }
            });
            if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout_ms,
            ) {
                log::error!("setTimeout failed: {:?}", e);
            }
            closure.forget();
        }
    }

    /// `?variant=classic|labeled|shuffled`
    fn variant_from_query(window: &web_sys::Window) -> Variant {
        let search = window.location().search().unwrap_or_default();
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.strip_prefix("variant="))
            .find_map(Variant::from_str)
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dot Recall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let variant = variant_from_query(&window);
        let config = Configuration::from_variant(variant);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(config.width);
        canvas.set_height(config.height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        ctx.set_font("14px sans-serif");

        let surface = Canvas2d {
            ctx,
            width: config.width as f64,
            height: config.height as f64,
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let mut clock = TimeoutClock { game: weak.clone() };
            let controller =
                RoundController::new(config, seed, &mut clock).expect("invalid configuration");
            RefCell::new(Game {
                controller,
                canvas: surface,
            })
        });

        log::info!("Variant '{}' initialized with seed: {}", variant.as_str(), seed);

        setup_input_handlers(&canvas, game.clone());
        request_animation_frame(game);

        log::info!("Dot Recall running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let point = Point::new(event.offset_x() as f64, event.offset_y() as f64);
            let mut clock = TimeoutClock {
                game: Rc::downgrade(&game),
            };
            let outcome = game.borrow_mut().controller.submit_click(point, &mut clock);
            log::debug!("Click at {:?}: {:?}", point, outcome);
        });
        let _ = canvas
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(f64)>::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let Game { controller, canvas } = &mut *g;
            controller.render(canvas);
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use dot_recall::history::RoundResult;
    use dot_recall::platform::{ManualClock, RecordingCanvas};
    use dot_recall::{Configuration, ConfigError, Point, RoundController, RoundEvent, RoundPhase, Variant};

    /// Rounds the scripted player plays
    const DEMO_ROUNDS: u32 = 5;
    /// Frame step (~60 Hz)
    const FRAME: Duration = Duration::from_millis(16);
    /// How far (pixels, per axis) the scripted player's memory drifts
    const RECALL_DRIFT: f64 = 40.0;

    #[derive(Debug, Serialize)]
    struct Summary<'a> {
        variant: &'a str,
        seed: u64,
        rounds_played: u32,
        average_percent: Option<f64>,
        best: &'a [RoundResult],
    }

    pub fn run(variant: Variant, seed: u64) -> Result<(), ConfigError> {
        let mut clock = ManualClock::new();
        let mut game = RoundController::new(Configuration::from_variant(variant), seed, &mut clock)?;
        let mut player = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut canvas = RecordingCanvas::new();

        while game.history().rounds_played() < DEMO_ROUNDS {
            // Look at the dots until they disappear
            let memory: Vec<Point> = game.round().dots().iter().map(|d| d.pos).collect();
            while game.phase() == RoundPhase::ShowingDots {
                for token in clock.advance(FRAME) {
                    game.on_reveal_elapsed(token);
                }
                canvas.reset();
                game.render(&mut canvas);
            }
            log::debug!("Dots hidden after {:?}", clock.now());

            for pos in memory {
                let drift = Point::new(
                    player.random_range(-RECALL_DRIFT..=RECALL_DRIFT),
                    player.random_range(-RECALL_DRIFT..=RECALL_DRIFT),
                );
                if let RoundEvent::Scored(score) = game.submit_click(pos + drift, &mut clock) {
                    println!("Round {}: {}", game.round_number(), score.label());
                }
            }

            canvas.reset();
            game.render(&mut canvas);
            log::debug!("Scored frame: {} draw commands", canvas.commands().len());

            // Dismiss the score
            game.submit_click(Point::ZERO, &mut clock);
        }

        let history = game.history();
        let summary = Summary {
            variant: variant.as_str(),
            seed,
            rounds_played: history.rounds_played(),
            average_percent: history.average(),
            best: history.best(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use dot_recall::Variant;

    env_logger::init();
    log::info!("Dot Recall (native) starting...");
    log::info!("Native mode plays scripted rounds headlessly - run with `trunk serve` for the web version");

    let variant = match std::env::args().nth(1) {
        Some(arg) => Variant::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using default", arg);
            Variant::default()
        }),
        None => Variant::default(),
    };
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    if let Err(e) = headless::run(variant, seed) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
