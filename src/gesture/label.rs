use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hand::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    LeftPoint,
    RightPoint,
    UpPoint,
    DownPoint,
    ThumbsUp,
    ThumbsDown,
    ThumbsLeft,
    ThumbsRight,
    Victory,
    Rock,
    OpenPalm,
    ClosedPalm,
    Unknown,
}

impl GestureLabel {
    /// Every label that can be recognized, `Unknown` excluded.
    pub const RECOGNIZED: [GestureLabel; 12] = [
        GestureLabel::LeftPoint,
        GestureLabel::RightPoint,
        GestureLabel::UpPoint,
        GestureLabel::DownPoint,
        GestureLabel::ThumbsUp,
        GestureLabel::ThumbsDown,
        GestureLabel::ThumbsLeft,
        GestureLabel::ThumbsRight,
        GestureLabel::Victory,
        GestureLabel::Rock,
        GestureLabel::OpenPalm,
        GestureLabel::ClosedPalm,
    ];

    pub fn point(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self::LeftPoint,
            Direction::Right => Self::RightPoint,
            Direction::Up => Self::UpPoint,
            Direction::Down => Self::DownPoint,
        }
    }

    pub fn thumbs(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self::ThumbsLeft,
            Direction::Right => Self::ThumbsRight,
            Direction::Up => Self::ThumbsUp,
            Direction::Down => Self::ThumbsDown,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftPoint => "left_point",
            Self::RightPoint => "right_point",
            Self::UpPoint => "up_point",
            Self::DownPoint => "down_point",
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
            Self::ThumbsLeft => "thumbs_left",
            Self::ThumbsRight => "thumbs_right",
            Self::Victory => "victory",
            Self::Rock => "rock",
            Self::OpenPalm => "open_palm",
            Self::ClosedPalm => "closed_palm",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::Unknown.as_str() {
            return Ok(Self::Unknown);
        }
        Self::RECOGNIZED
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown gesture label: {s:?}"))
    }
}

/// Labels produced by the trail recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeLabel {
    Circle,
    Square,
    Triangle,
    Line,
}

impl ShapeLabel {
    pub const ALL: [ShapeLabel; 4] = [
        ShapeLabel::Circle,
        ShapeLabel::Square,
        ShapeLabel::Triangle,
        ShapeLabel::Line,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown shape label: {s:?}"))
    }
}
