//! Finger extension and direction primitives over hand landmarks.
//!
//! Coordinates are frame-relative: smaller y is higher in the image.

use super::landmark::{Landmark, LandmarkIndex};

pub const DEFAULT_EXTENSION_THRESHOLD: f32 = 0.05;
pub const DEFAULT_DIRECTION_DEAD_ZONE: f32 = 0.1;

const SPREAD_EPSILON: f32 = 1e-6;

/// A finger counts as extended when its tip sits above the proximal joint by
/// more than `threshold`.
pub fn is_extended(tip: &Landmark, pip: &Landmark, threshold: f32) -> bool {
    tip.y < pip.y - threshold
}

/// Horizontal spread of the five fingertips relative to the whole hand width,
/// clamped to 1.0.
///
/// Non-finite x coordinates yield NaN, which no spread threshold accepts.
pub fn finger_spread(landmarks: &[Landmark; LandmarkIndex::COUNT]) -> f32 {
    if landmarks.iter().any(|lm| !lm.x.is_finite()) {
        return f32::NAN;
    }
    let (tip_min, tip_max) = x_range(Finger::ALL.iter().map(|f| landmarks[f.tip() as usize].x));
    let (all_min, all_max) = x_range(landmarks.iter().map(|lm| lm.x));

    let spread = (tip_max - tip_min) / (all_max - all_min + SPREAD_EPSILON);
    spread.min(1.0)
}

fn x_range(xs: impl Iterator<Item = f32>) -> (f32, f32) {
    xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)))
}

/// `target - reference` in the image plane.
pub fn direction_vector(reference: &Landmark, target: &Landmark) -> (f32, f32) {
    (target.x - reference.x, target.y - reference.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Resolves the dominant axis of `(dx, dy)`.
///
/// Returns `None` inside the dead zone around the reference point.
pub fn resolve_direction((dx, dy): (f32, f32), dead_zone: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx < -dead_zone {
            Some(Direction::Left)
        } else if dx > dead_zone {
            Some(Direction::Right)
        } else {
            None
        }
    } else if dy < -dead_zone {
        Some(Direction::Up)
    } else if dy > dead_zone {
        Some(Direction::Down)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> LandmarkIndex {
        match self {
            Finger::Thumb => LandmarkIndex::ThumbTip,
            Finger::Index => LandmarkIndex::IndexTip,
            Finger::Middle => LandmarkIndex::MiddleTip,
            Finger::Ring => LandmarkIndex::RingTip,
            Finger::Pinky => LandmarkIndex::PinkyTip,
        }
    }

    /// Joint the tip is compared against (IP for the thumb, PIP otherwise).
    pub fn reference_joint(self) -> LandmarkIndex {
        match self {
            Finger::Thumb => LandmarkIndex::ThumbIp,
            Finger::Index => LandmarkIndex::IndexPip,
            Finger::Middle => LandmarkIndex::MiddlePip,
            Finger::Ring => LandmarkIndex::RingPip,
            Finger::Pinky => LandmarkIndex::PinkyPip,
        }
    }
}

/// Extended/closed state of each finger for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn from_landmarks(landmarks: &[Landmark; LandmarkIndex::COUNT], threshold: f32) -> Self {
        let ext = |finger: Finger| {
            is_extended(
                &landmarks[finger.tip() as usize],
                &landmarks[finger.reference_joint() as usize],
                threshold,
            )
        };
        Self {
            thumb: ext(Finger::Thumb),
            index: ext(Finger::Index),
            middle: ext(Finger::Middle),
            ring: ext(Finger::Ring),
            pinky: ext(Finger::Pinky),
        }
    }

    /// `[thumb, index, middle, ring, pinky]`
    pub fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

    pub fn all_extended(&self) -> bool {
        self.as_array().iter().all(|&e| e)
    }

    pub fn all_closed(&self) -> bool {
        self.as_array().iter().all(|&e| !e)
    }

    pub fn extended_count(&self) -> usize {
        self.as_array().iter().filter(|&&e| e).count()
    }

    /// Exact match against a `[thumb, index, middle, ring, pinky]` pattern.
    pub fn matches(&self, pattern: [bool; 5]) -> bool {
        self.as_array() == pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(x: f32) -> [Landmark; LandmarkIndex::COUNT] {
        [Landmark::new(x, 0.5, 0.0); LandmarkIndex::COUNT]
    }

    #[test]
    fn test_is_extended_threshold() {
        let pip = Landmark::new(0.5, 0.5, 0.0);
        assert!(is_extended(&Landmark::new(0.5, 0.3, 0.0), &pip, 0.05));
        // Exactly on the threshold is not extended
        assert!(!is_extended(&Landmark::new(0.5, 0.45, 0.0), &pip, 0.05));
        assert!(!is_extended(&Landmark::new(0.5, 0.6, 0.0), &pip, 0.05));
    }

    #[test]
    fn test_finger_spread_degenerate_hand() {
        // All x equal: epsilon keeps it finite
        let spread = finger_spread(&flat_hand(0.4));
        assert!(spread.is_finite());
        assert_eq!(spread, 0.0);
    }

    #[test]
    fn test_finger_spread_full_width() {
        let mut lm = flat_hand(0.5);
        lm[LandmarkIndex::ThumbTip as usize].x = 0.3;
        lm[LandmarkIndex::PinkyTip as usize].x = 0.7;
        let spread = finger_spread(&lm);
        assert!((spread - 1.0).abs() < 1e-4);
        assert!(spread <= 1.0);
    }

    #[test]
    fn test_finger_spread_partial() {
        let mut lm = flat_hand(0.5);
        lm[LandmarkIndex::Wrist as usize].x = 0.1;
        lm[LandmarkIndex::PinkyMcp as usize].x = 0.9;
        lm[LandmarkIndex::IndexTip as usize].x = 0.4;
        lm[LandmarkIndex::RingTip as usize].x = 0.6;
        // tips 0.4..0.6 over 0.1..0.9
        assert!((finger_spread(&lm) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_finger_spread_non_finite_is_nan() {
        let mut lm = flat_hand(0.5);
        lm[LandmarkIndex::PinkyTip as usize].x = f32::INFINITY;
        assert!(finger_spread(&lm).is_nan());
        lm[LandmarkIndex::PinkyTip as usize].x = f32::NAN;
        assert!(finger_spread(&lm).is_nan());
    }

    #[test]
    fn test_direction_vector() {
        let (dx, dy) = direction_vector(&Landmark::new(0.5, 0.5, 0.0), &Landmark::new(0.2, 0.7, 0.3));
        assert!((dx + 0.3).abs() < 1e-6);
        assert!((dy - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_direction_axes() {
        assert_eq!(resolve_direction((-0.4, 0.0), 0.1), Some(Direction::Left));
        assert_eq!(resolve_direction((0.4, 0.0), 0.1), Some(Direction::Right));
        assert_eq!(resolve_direction((0.0, -0.4), 0.1), Some(Direction::Up));
        assert_eq!(resolve_direction((0.0, 0.4), 0.1), Some(Direction::Down));
    }

    #[test]
    fn test_resolve_direction_dead_zone() {
        assert_eq!(resolve_direction((0.05, 0.02), 0.1), None);
        assert_eq!(resolve_direction((0.0, 0.0), 0.1), None);
        // Dominant axis inside the dead zone does not fall back to the other axis
        assert_eq!(resolve_direction((0.09, 0.08), 0.1), None);
    }

    #[test]
    fn test_resolve_direction_tie_uses_vertical() {
        assert_eq!(resolve_direction((0.3, -0.3), 0.1), Some(Direction::Up));
    }

    #[test]
    fn test_finger_states_from_landmarks() {
        let mut lm = flat_hand(0.5);
        lm[LandmarkIndex::IndexTip as usize].y = 0.2;
        lm[LandmarkIndex::PinkyTip as usize].y = 0.2;
        let states = FingerStates::from_landmarks(&lm, DEFAULT_EXTENSION_THRESHOLD);
        assert!(states.matches([false, true, false, false, true]));
        assert_eq!(states.extended_count(), 2);
        assert!(!states.all_closed());
        assert!(!states.all_extended());
    }

    #[test]
    fn test_thumb_uses_ip_joint() {
        let mut lm = flat_hand(0.5);
        lm[LandmarkIndex::ThumbIp as usize].y = 0.6;
        // Tip at 0.5 is above IP at 0.6 by more than the threshold
        let states = FingerStates::from_landmarks(&lm, DEFAULT_EXTENSION_THRESHOLD);
        assert!(states.thumb);
        assert_eq!(states.extended_count(), 1);
    }
}
