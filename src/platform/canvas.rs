//! Drawing surface

use serde::{Deserialize, Serialize};

use crate::Point;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const DOT: Color = Color::rgb(255, 0, 0);
    pub const GUESS: Color = Color::rgb(0, 255, 0);
    pub const TEXT: Color = Color::rgb(255, 255, 255);
    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
}

/// Horizontal text alignment relative to the given position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Left,
    Center,
}

/// Draw primitives supplied by the host toolkit
pub trait Canvas {
    /// Wipe the frame to the background color
    fn clear(&mut self);
    fn draw_circle(&mut self, center: Point, radius: f64, color: Color);
    fn draw_text(&mut self, text: &str, pos: Point, anchor: Anchor);
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear,
    Circle { center: Point, radius: f64, color: Color },
    Text { text: String, pos: Point, anchor: Anchor },
}

/// Canvas that records draw calls instead of rasterising them
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Recorded circles of one color, in draw order
    pub fn circles(&self, color: Color) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Circle { center, color: c, .. } if *c == color => Some(*center),
                _ => None,
            })
            .collect()
    }

    /// Recorded text strings, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn draw_text(&mut self, text: &str, pos: Point, anchor: Anchor) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            anchor,
        });
    }
}
