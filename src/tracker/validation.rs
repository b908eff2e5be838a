//! Sliding-window majority vote that gates command emission.
//!
//! Only non-unknown smoothed results enter the window. Once it holds at least
//! `min_majority` entries, the modal label is emitted if it reaches
//! `min_majority` occurrences and the mean confidence of the whole window
//! exceeds the threshold. Emission clears the window.

use std::collections::VecDeque;

use crate::config::ValidationConfig;
use crate::gesture::{Classification, GestureLabel};

pub const DEFAULT_WINDOW_CAPACITY: usize = 12;
pub const DEFAULT_MIN_MAJORITY: usize = 10;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// A gesture that passed the majority vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validation {
    pub gesture: GestureLabel,
    /// Occurrences of `gesture` in the window at emission
    pub count: usize,
    /// Mean confidence over the whole window at emission
    pub mean_confidence: f32,
}

/// Frames accumulated toward validation, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub frames: usize,
    pub required: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Accumulating,
    /// The last push emitted a validation and cleared the window.
    JustValidated,
}

pub struct ValidationWindow {
    buffer: VecDeque<Classification>,
    capacity: usize,
    min_majority: usize,
    confidence_threshold: f32,
    state: WindowState,
}

impl ValidationWindow {
    pub fn new(capacity: usize, min_majority: usize, confidence_threshold: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity + 1),
            capacity,
            min_majority: min_majority.max(1),
            confidence_threshold,
            state: WindowState::Accumulating,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(
            config.window_capacity,
            config.min_majority,
            config.confidence_threshold,
        )
    }

    /// Feeds one smoothed result. Returns the validation when this push
    /// completes a majority episode.
    pub fn push(&mut self, result: Classification) -> Option<Validation> {
        self.state = WindowState::Accumulating;
        if result.is_unknown() {
            return None;
        }

        self.buffer.push_back(result);
        if self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }

        if self.buffer.len() < self.min_majority {
            return None;
        }

        let (gesture, count) = self.modal_label()?;
        let mean_confidence = self.mean_confidence();
        if count >= self.min_majority && mean_confidence > self.confidence_threshold {
            self.buffer.clear();
            self.state = WindowState::JustValidated;
            return Some(Validation {
                gesture,
                count,
                mean_confidence,
            });
        }
        None
    }

    /// Most frequent label; ties go to the label seen first in the window.
    fn modal_label(&self) -> Option<(GestureLabel, usize)> {
        let mut counts: Vec<(GestureLabel, usize)> = Vec::new();
        for entry in &self.buffer {
            match counts.iter_mut().find(|(label, _)| *label == entry.gesture) {
                Some((_, n)) => *n += 1,
                None => counts.push((entry.gesture, 1)),
            }
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(GestureLabel, usize)>, (label, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((label, n)),
            })
    }

    fn mean_confidence(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.buffer.iter().map(|c| c.confidence).sum();
        sum / self.buffer.len() as f32
    }

    pub fn progress(&self) -> Progress {
        Progress {
            frames: self.buffer.len(),
            required: self.min_majority,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = WindowState::Accumulating;
    }
}

impl Default for ValidationWindow {
    fn default() -> Self {
        Self::new(
            DEFAULT_WINDOW_CAPACITY,
            DEFAULT_MIN_MAJORITY,
            DEFAULT_CONFIDENCE_THRESHOLD,
        )
    }
}
