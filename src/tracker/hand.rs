use crate::command::Command;
use crate::config::Config;
use crate::gesture::{Classification, GestureClassifier};
use crate::hand::{HandObservation, Handedness};

use super::smooth::GestureSmoother;
use super::validation::{Progress, ValidationWindow};

/// Per-hand result of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandReport {
    pub handedness: Handedness,
    /// Single-frame classification, for diagnostics
    pub raw: Classification,
    pub smoothed: Classification,
    pub progress: Progress,
    /// Set only on the frame a gesture validates
    pub command: Option<Command>,
}

/// Smoother + validation window owned by one hand slot.
pub struct HandPipeline {
    smoother: GestureSmoother,
    window: ValidationWindow,
}

impl HandPipeline {
    pub fn new(smoother: GestureSmoother, window: ValidationWindow) -> Self {
        Self { smoother, window }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            GestureSmoother::from_config(&config.smoothing),
            ValidationWindow::from_config(&config.validation),
        )
    }

    /// Smoothing then validation for one raw classification.
    pub fn update(&mut self, raw: Classification) -> (Classification, Option<Command>) {
        let smoothed = self.smoother.smooth(raw);
        let command = self
            .window
            .push(smoothed)
            .map(|v| Command::for_gesture(v.gesture, v.mean_confidence));
        (smoothed, command)
    }

    pub fn progress(&self) -> Progress {
        self.window.progress()
    }
}

impl Default for HandPipeline {
    fn default() -> Self {
        Self::new(GestureSmoother::default(), ValidationWindow::default())
    }
}

/// 左右の手ごとに独立したパイプラインを持つトラッカー
///
/// Frames for one hand must arrive in order; the two slots share no state.
pub struct HandTracker {
    classifier: GestureClassifier,
    slots: [HandPipeline; Handedness::COUNT],
    config: Config,
}

impl HandTracker {
    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: GestureClassifier::from_config(&config.classifier),
            slots: std::array::from_fn(|_| HandPipeline::from_config(config)),
            config: config.clone(),
        }
    }

    pub fn process(&mut self, observation: &HandObservation) -> HandReport {
        let raw = self.classifier.classify_observation(observation);
        let slot = &mut self.slots[observation.handedness.slot()];
        let (smoothed, command) = slot.update(raw);
        HandReport {
            handedness: observation.handedness,
            raw,
            smoothed,
            progress: slot.progress(),
            command,
        }
    }

    /// Processes every hand of one frame in order. An empty frame changes nothing.
    pub fn process_frame(&mut self, observations: &[HandObservation]) -> Vec<HandReport> {
        observations.iter().map(|obs| self.process(obs)).collect()
    }

    pub fn progress(&self, handedness: Handedness) -> Progress {
        self.slots[handedness.slot()].progress()
    }

    /// Drops all per-hand history.
    pub fn reset(&mut self) {
        self.slots = std::array::from_fn(|_| HandPipeline::from_config(&self.config));
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
