use std::collections::VecDeque;

use crate::config::SmoothingConfig;
use crate::gesture::{Classification, GestureLabel};

pub const DEFAULT_HISTORY_SIZE: usize = 5;

/// 直近何フレームで繰り返しを数えるか
const RECENT_FRAMES: usize = 3;
const REPEAT_COUNT: usize = 2;
/// unknown フレームで直前のジェスチャーを保持するときの減衰率
const DROPOUT_DECAY: f32 = 0.5;

/// 単一ハンドのジェスチャー履歴による平滑化フィルタ
///
/// Every classification, `unknown` included, enters the history; the history
/// is order-sensitive.
pub struct GestureSmoother {
    history: VecDeque<Classification>,
    capacity: usize,
}

impl GestureSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self::new(config.history_size)
    }

    pub fn smooth(&mut self, current: Classification) -> Classification {
        self.history.push_back(current);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }

        let recent_start = self.history.len().saturating_sub(RECENT_FRAMES);
        let recent = self.history.range(recent_start..);
        let repeats = recent
            .clone()
            .filter(|c| c.gesture == current.gesture)
            .count();
        if repeats >= REPEAT_COUNT {
            let (sum, n) = recent.fold((0.0, 0usize), |(sum, n), c| (sum + c.confidence, n + 1));
            return Classification::new(current.gesture, sum / n as f32);
        }

        if !current.is_unknown() {
            return current;
        }

        // 一瞬の検出漏れ: 1つ前のジェスチャーを減衰して保持
        if self.history.len() >= 2 {
            let previous = self.history[self.history.len() - 2];
            return Classification::new(previous.gesture, previous.confidence * DROPOUT_DECAY);
        }

        Classification::new(GestureLabel::Unknown, 0.0)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for GestureSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(gesture: GestureLabel, confidence: f32) -> Classification {
        Classification::new(gesture, confidence)
    }

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_first_frame_passthrough() {
        let mut s = GestureSmoother::default();
        let result = s.smooth(c(GestureLabel::Victory, 0.88));
        assert_eq!(result, c(GestureLabel::Victory, 0.88));
    }

    #[test]
    fn test_first_frame_unknown() {
        let mut s = GestureSmoother::default();
        assert_eq!(s.smooth(Classification::UNKNOWN), Classification::UNKNOWN);
    }

    #[test]
    fn test_repeat_averages_last_three() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::Rock, 0.9));
        s.smooth(c(GestureLabel::Victory, 0.3));
        // Rock appears twice among [rock 0.9, victory 0.3, rock 0.6]
        let result = s.smooth(c(GestureLabel::Rock, 0.6));
        assert_eq!(result.gesture, GestureLabel::Rock);
        assert!(approx_eq_f32(result.confidence, (0.9 + 0.3 + 0.6) / 3.0, 1e-6));
    }

    #[test]
    fn test_repeat_with_two_entries() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::ThumbsUp, 0.8));
        let result = s.smooth(c(GestureLabel::ThumbsUp, 0.6));
        assert!(approx_eq_f32(result.confidence, 0.7, 1e-6));
    }

    #[test]
    fn test_repeat_ignores_older_than_three() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::Rock, 0.9));
        s.smooth(c(GestureLabel::Victory, 0.88));
        s.smooth(c(GestureLabel::Victory, 0.88));
        // Rock only once in the last three frames: passthrough
        let result = s.smooth(c(GestureLabel::Rock, 0.5));
        assert_eq!(result, c(GestureLabel::Rock, 0.5));
    }

    #[test]
    fn test_unknown_dropout_decays_previous() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::OpenPalm, 0.9));
        let result = s.smooth(Classification::UNKNOWN);
        assert_eq!(result.gesture, GestureLabel::OpenPalm);
        assert!(approx_eq_f32(result.confidence, 0.45, 1e-6));
    }

    #[test]
    fn test_repeated_unknown_averages() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::OpenPalm, 0.9));
        s.smooth(Classification::UNKNOWN);
        // unknown now appears twice in the last three frames
        let result = s.smooth(Classification::UNKNOWN);
        assert_eq!(result.gesture, GestureLabel::Unknown);
        assert!(approx_eq_f32(result.confidence, 0.3, 1e-6));
    }

    #[test]
    fn test_constant_input_non_decreasing() {
        let mut s = GestureSmoother::default();
        let first = s.smooth(c(GestureLabel::LeftPoint, 0.8));
        let mut prev = first.confidence;
        for _ in 0..6 {
            let result = s.smooth(c(GestureLabel::LeftPoint, 0.8));
            assert_eq!(result.gesture, GestureLabel::LeftPoint);
            assert!(result.confidence >= prev - 1e-6);
            assert!(result.confidence >= first.confidence - 1e-6);
            prev = result.confidence;
        }
        assert!(approx_eq_f32(prev, 0.8, 1e-6));
    }

    #[test]
    fn test_history_bounded() {
        let mut s = GestureSmoother::new(5);
        for _ in 0..20 {
            s.smooth(c(GestureLabel::Rock, 0.88));
        }
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut s = GestureSmoother::new(0);
        s.smooth(c(GestureLabel::Rock, 0.88));
        s.smooth(c(GestureLabel::Rock, 0.88));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut s = GestureSmoother::default();
        s.smooth(c(GestureLabel::OpenPalm, 0.9));
        s.reset();
        assert!(s.is_empty());
        // After reset there is nothing to fall back on
        assert_eq!(s.smooth(Classification::UNKNOWN), Classification::UNKNOWN);
    }
}
