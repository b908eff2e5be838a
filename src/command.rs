//! Static gesture/shape → drone command tables.

use serde::{Deserialize, Serialize};

use crate::gesture::{GestureLabel, ShapeLabel};

/// Display color in BGR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    pub const fn bgr(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    pub const NEUTRAL_GRAY: Color = Color::bgr(128, 128, 128);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandEntry {
    pub text: &'static str,
    pub color: Color,
}

impl CommandEntry {
    const fn new(text: &'static str, color: Color) -> Self {
        Self { text, color }
    }

    /// Returned for any label without a table entry.
    pub const FALLBACK: CommandEntry = CommandEntry::new("", Color::NEUTRAL_GRAY);

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

const MOVE: Color = Color::bgr(0, 255, 0);
const THUMB_VERTICAL: Color = Color::bgr(255, 100, 100);
const THUMB_HORIZONTAL: Color = Color::bgr(100, 255, 100);

pub const GESTURE_COMMANDS: [(GestureLabel, CommandEntry); 12] = [
    (GestureLabel::LeftPoint, CommandEntry::new("LEFT MOVE", MOVE)),
    (GestureLabel::RightPoint, CommandEntry::new("RIGHT MOVE", MOVE)),
    (GestureLabel::UpPoint, CommandEntry::new("UPWARD MOVE", MOVE)),
    (GestureLabel::DownPoint, CommandEntry::new("DOWNWARD MOVE", MOVE)),
    (GestureLabel::ThumbsUp, CommandEntry::new("MOVE UP 👍", THUMB_VERTICAL)),
    (GestureLabel::ThumbsDown, CommandEntry::new("MOVE DOWN 👎", THUMB_VERTICAL)),
    (GestureLabel::ThumbsLeft, CommandEntry::new("MOVE LEFT 👈", THUMB_HORIZONTAL)),
    (GestureLabel::ThumbsRight, CommandEntry::new("MOVE RIGHT 👉", THUMB_HORIZONTAL)),
    (GestureLabel::Victory, CommandEntry::new("VICTORY CELEBRATION! 🎉", Color::bgr(0, 200, 255))),
    (GestureLabel::Rock, CommandEntry::new("BACKFLIP!", Color::bgr(255, 0, 255))),
    (GestureLabel::OpenPalm, CommandEntry::new("STOP IMMEDIATELY", Color::bgr(0, 0, 255))),
    (GestureLabel::ClosedPalm, CommandEntry::new("LAND", Color::bgr(255, 0, 0))),
];

pub const SHAPE_COMMANDS: [(ShapeLabel, CommandEntry); 4] = [
    (ShapeLabel::Circle, CommandEntry::new("CIRCLE MOVEMENT", Color::bgr(100, 100, 255))),
    (ShapeLabel::Square, CommandEntry::new("SQUARE PATTERN", Color::bgr(100, 255, 100))),
    (ShapeLabel::Triangle, CommandEntry::new("TRIANGLE PATTERN", Color::bgr(255, 100, 100))),
    (ShapeLabel::Line, CommandEntry::new("LINE MOVEMENT", Color::bgr(200, 200, 0))),
];

pub fn gesture_command(gesture: GestureLabel) -> CommandEntry {
    GESTURE_COMMANDS
        .iter()
        .find(|(label, _)| *label == gesture)
        .map(|(_, entry)| *entry)
        .unwrap_or(CommandEntry::FALLBACK)
}

pub fn shape_command(shape: ShapeLabel) -> CommandEntry {
    SHAPE_COMMANDS
        .iter()
        .find(|(label, _)| *label == shape)
        .map(|(_, entry)| *entry)
        .unwrap_or(CommandEntry::FALLBACK)
}

/// Lookup by wire name, e.g. `"victory"`.
pub fn gesture_command_by_name(name: &str) -> CommandEntry {
    name.parse::<GestureLabel>()
        .map(gesture_command)
        .unwrap_or(CommandEntry::FALLBACK)
}

/// Lookup by wire name, e.g. `"circle"`.
pub fn shape_command_by_name(name: &str) -> CommandEntry {
    name.parse::<ShapeLabel>()
        .map(shape_command)
        .unwrap_or(CommandEntry::FALLBACK)
}

/// Stop and land need higher-salience presentation downstream.
pub fn is_critical(gesture: GestureLabel) -> bool {
    matches!(gesture, GestureLabel::OpenPalm | GestureLabel::ClosedPalm)
}

/// A validated gesture resolved to its command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub gesture: GestureLabel,
    pub text: &'static str,
    pub color: Color,
    pub critical: bool,
    pub confidence: f32,
}

impl Command {
    pub fn for_gesture(gesture: GestureLabel, confidence: f32) -> Self {
        let entry = gesture_command(gesture);
        Self {
            gesture,
            text: entry.text,
            color: entry.color,
            critical: is_critical(gesture),
            confidence,
        }
    }
}
