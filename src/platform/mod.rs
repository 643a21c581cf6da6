//! Platform abstraction layer
//!
//! The game never talks to a window, GPU or event loop directly. The host
//! provides:
//! - A [`Canvas`] to draw circles and text on
//! - A [`Clock`] that fires one-shot reveal timers
//! - Pointer clicks, forwarded to [`RoundController::submit_click`](crate::RoundController::submit_click)

pub mod canvas;
pub mod clock;

pub use canvas::{Anchor, Canvas, Color, DrawCommand, RecordingCanvas, colors};
pub use clock::{Clock, ManualClock};
