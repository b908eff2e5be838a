pub mod geometry;
pub mod landmark;

pub use geometry::{
    direction_vector, finger_spread, is_extended, resolve_direction, Direction, Finger,
    FingerStates,
};
pub use landmark::{HandObservation, Handedness, Landmark, LandmarkIndex};

/// Synthetic hands for unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::{Finger, Landmark, LandmarkIndex};

    const WRIST: (f32, f32) = (0.5, 0.5);

    pub struct HandBuilder {
        landmarks: [Landmark; LandmarkIndex::COUNT],
    }

    impl HandBuilder {
        /// `fingers`: `[thumb, index, middle, ring, pinky]` extended flags.
        pub fn new(fingers: [bool; 5]) -> Self {
            let mut lm = [Landmark::default(); LandmarkIndex::COUNT];
            lm[LandmarkIndex::Wrist as usize] = Landmark::new(WRIST.0, WRIST.1, 0.0);

            lm[LandmarkIndex::ThumbCmc as usize] = Landmark::new(0.45, 0.5, 0.0);
            lm[LandmarkIndex::ThumbMcp as usize] = Landmark::new(0.47, 0.48, 0.0);
            lm[LandmarkIndex::ThumbIp as usize] = Landmark::new(0.48, 0.45, 0.0);
            let thumb_y = if fingers[0] { 0.3 } else { 0.55 };
            lm[LandmarkIndex::ThumbTip as usize] = Landmark::new(0.5, thumb_y, 0.0);

            for (i, &extended) in fingers[1..].iter().enumerate() {
                let mcp = 5 + i * 4;
                lm[mcp] = Landmark::new(0.5, 0.48, 0.0);
                let (pip, dip, tip) = if extended {
                    (0.35, 0.25, 0.15)
                } else {
                    (0.50, 0.52, 0.55)
                };
                lm[mcp + 1] = Landmark::new(0.5, pip, 0.0);
                lm[mcp + 2] = Landmark::new(0.5, dip, 0.0);
                lm[mcp + 3] = Landmark::new(0.5, tip, 0.0);
            }

            Self { landmarks: lm }
        }

        /// Fans the fingertips out horizontally.
        pub fn spread(mut self) -> Self {
            for (finger, x) in Finger::ALL.iter().zip([0.3, 0.4, 0.5, 0.6, 0.7]) {
                self.landmarks[finger.tip() as usize].x = x;
            }
            self
        }

        /// Places `finger`'s tip at wrist + `(dx, dy)` while keeping it extended.
        pub fn tip_at(mut self, finger: Finger, dx: f32, dy: f32) -> Self {
            let tip = Landmark::new(WRIST.0 + dx, WRIST.1 + dy, 0.0);
            self.landmarks[finger.tip() as usize] = tip;
            self.landmarks[finger.reference_joint() as usize].y = tip.y + 0.1;
            self
        }

        pub fn translate(mut self, dx: f32, dy: f32) -> Self {
            for lm in self.landmarks.iter_mut() {
                lm.x += dx;
                lm.y += dy;
            }
            self
        }

        pub fn array(self) -> [Landmark; LandmarkIndex::COUNT] {
            self.landmarks
        }

        pub fn build(self) -> Vec<Landmark> {
            self.landmarks.to_vec()
        }
    }
}
