use crate::config::ClassifierConfig;
use crate::hand::geometry::{DEFAULT_DIRECTION_DEAD_ZONE, DEFAULT_EXTENSION_THRESHOLD};
use crate::hand::{
    direction_vector, finger_spread, resolve_direction, Direction, FingerStates, Handedness,
    HandObservation, Landmark, LandmarkIndex,
};

use super::label::GestureLabel;

pub const DEFAULT_SPREAD_THRESHOLD: f32 = 0.3;

const THUMB_CONFIDENCE: f32 = 0.85;
const CLOSED_PALM_CONFIDENCE: f32 = 0.90;
const OPEN_PALM_BASE: f32 = 0.7;
const OPEN_PALM_GAIN: f32 = 0.25;
const OPEN_PALM_MAX: f32 = 0.95;
const VICTORY_CONFIDENCE: f32 = 0.88;
const ROCK_CONFIDENCE: f32 = 0.88;
const POINT_CONFIDENCE: f32 = 0.80;

/// Gesture and confidence for one hand at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub gesture: GestureLabel,
    pub confidence: f32,
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        gesture: GestureLabel::Unknown,
        confidence: 0.0,
    };

    pub fn new(gesture: GestureLabel, confidence: f32) -> Self {
        Self {
            gesture,
            confidence,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.gesture.is_unknown()
    }
}

/// Everything a rule may look at for one observation.
struct RuleInput<'a> {
    landmarks: &'a [Landmark; LandmarkIndex::COUNT],
    fingers: FingerStates,
    handedness: Handedness,
}

/// `None` lets the cascade continue; `Some` ends it.
type Rule = fn(&GestureClassifier, &RuleInput) -> Option<Classification>;

/// Evaluated in order, first match wins. Reordering changes precedence.
const RULES: [(&str, Rule); 6] = [
    ("thumb_only", GestureClassifier::thumb_only),
    ("closed_palm", GestureClassifier::closed_palm),
    ("open_palm", GestureClassifier::open_palm),
    ("victory", GestureClassifier::victory),
    ("rock", GestureClassifier::rock),
    ("index_point", GestureClassifier::index_point),
];

/// Rule-based single-frame classifier over 21 hand landmarks.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    extension_threshold: f32,
    spread_threshold: f32,
    direction_dead_zone: f32,
}

impl GestureClassifier {
    pub fn new(extension_threshold: f32, spread_threshold: f32, direction_dead_zone: f32) -> Self {
        Self {
            extension_threshold,
            spread_threshold,
            direction_dead_zone,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.extension_threshold,
            config.spread_threshold,
            config.direction_dead_zone,
        )
    }

    /// Classifies one hand. Any landmark count other than 21 is `unknown`.
    pub fn classify(&self, landmarks: &[Landmark], handedness: Handedness) -> Classification {
        let Ok(landmarks) = <&[Landmark; LandmarkIndex::COUNT]>::try_from(landmarks) else {
            return Classification::UNKNOWN;
        };

        let input = RuleInput {
            landmarks,
            fingers: self.finger_states(landmarks),
            handedness,
        };

        RULES
            .iter()
            .find_map(|(_, rule)| rule(self, &input))
            .unwrap_or(Classification::UNKNOWN)
    }

    pub fn classify_observation(&self, observation: &HandObservation) -> Classification {
        self.classify(&observation.landmarks, observation.handedness)
    }

    pub fn finger_states(&self, landmarks: &[Landmark; LandmarkIndex::COUNT]) -> FingerStates {
        FingerStates::from_landmarks(landmarks, self.extension_threshold)
    }

    /// Direction of `tip` relative to the wrist.
    ///
    /// Handedness is part of the interface but does not affect the result:
    /// left/right are image-relative.
    fn tip_direction(
        &self,
        landmarks: &[Landmark; LandmarkIndex::COUNT],
        tip: LandmarkIndex,
        _handedness: Handedness,
    ) -> Option<Direction> {
        let vector = direction_vector(
            &landmarks[LandmarkIndex::Wrist as usize],
            &landmarks[tip as usize],
        );
        resolve_direction(vector, self.direction_dead_zone)
    }

    fn thumb_only(&self, input: &RuleInput) -> Option<Classification> {
        if !input.fingers.matches([true, false, false, false, false]) {
            return None;
        }
        let direction = self.tip_direction(input.landmarks, LandmarkIndex::ThumbTip, input.handedness);
        Some(match direction {
            Some(d) => Classification::new(GestureLabel::thumbs(d), THUMB_CONFIDENCE),
            None => Classification::UNKNOWN,
        })
    }

    fn closed_palm(&self, input: &RuleInput) -> Option<Classification> {
        input
            .fingers
            .all_closed()
            .then(|| Classification::new(GestureLabel::ClosedPalm, CLOSED_PALM_CONFIDENCE))
    }

    fn open_palm(&self, input: &RuleInput) -> Option<Classification> {
        if !input.fingers.all_extended() {
            return None;
        }
        let spread = finger_spread(input.landmarks);
        if spread.is_nan() || spread <= self.spread_threshold {
            return None;
        }
        let confidence = OPEN_PALM_MAX.min(OPEN_PALM_BASE + spread * OPEN_PALM_GAIN);
        Some(Classification::new(GestureLabel::OpenPalm, confidence))
    }

    fn victory(&self, input: &RuleInput) -> Option<Classification> {
        let f = input.fingers;
        (f.index && f.middle && !f.ring && !f.pinky)
            .then(|| Classification::new(GestureLabel::Victory, VICTORY_CONFIDENCE))
    }

    fn rock(&self, input: &RuleInput) -> Option<Classification> {
        let f = input.fingers;
        (f.index && f.pinky && !f.middle && !f.ring)
            .then(|| Classification::new(GestureLabel::Rock, ROCK_CONFIDENCE))
    }

    fn index_point(&self, input: &RuleInput) -> Option<Classification> {
        let f = input.fingers;
        if !(f.index && !f.middle && !f.ring && !f.pinky) {
            return None;
        }
        let direction = self.tip_direction(input.landmarks, LandmarkIndex::IndexTip, input.handedness);
        Some(match direction {
            Some(d) => Classification::new(GestureLabel::point(d), POINT_CONFIDENCE),
            None => Classification::UNKNOWN,
        })
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSION_THRESHOLD,
            DEFAULT_SPREAD_THRESHOLD,
            DEFAULT_DIRECTION_DEAD_ZONE,
        )
    }
}
