//! Air-drawn trail → shape recognition.
//!
//! [`ShapeRecognizer`] is the contract the rest of the crate depends on.
//! [`TrailRecognizer`] is a geometric implementation: open strokes are tested
//! for straightness, closed strokes for constant radius (circle) and otherwise
//! simplified to a polygon whose corners are counted.

use std::collections::VecDeque;

use crate::gesture::ShapeLabel;

pub type TrailPoint = (f32, f32);

pub trait ShapeRecognizer {
    /// Clears any accumulated trail state.
    fn reset(&mut self);

    fn recognize_shape(&self, trail: &[TrailPoint]) -> Option<ShapeLabel>;
}

pub const DEFAULT_MAX_TRAIL_POINTS: usize = 512;

const MIN_POINTS: usize = 10;
/// Strokes smaller than this (normalized units) are treated as noise
const MIN_EXTENT: f32 = 0.02;
/// End-to-start gap, relative to the stroke extent, below which a stroke is closed
const CLOSURE_RATIO: f32 = 0.2;
/// chord / path length for an open stroke to count as a line
const LINE_STRAIGHTNESS: f32 = 0.9;
/// Max coefficient of variation of the centroid distance for a circle
const CIRCLE_MAX_CV: f32 = 0.05;
/// Polyline simplification tolerance, relative to the bounding-box diagonal
const SIMPLIFY_RATIO: f32 = 0.05;
/// Turns shallower than this (radians) are not corners
const MIN_CORNER_ANGLE: f32 = 0.6;

/// 軌跡を蓄積して図形を判定する
pub struct TrailRecognizer {
    trail: VecDeque<TrailPoint>,
    max_points: usize,
}

impl TrailRecognizer {
    pub fn new(max_points: usize) -> Self {
        Self {
            trail: VecDeque::new(),
            max_points: max_points.max(MIN_POINTS),
        }
    }

    pub fn push_point(&mut self, point: TrailPoint) {
        if self.trail.len() == self.max_points {
            self.trail.pop_front();
        }
        self.trail.push_back(point);
    }

    pub fn extend<I: IntoIterator<Item = TrailPoint>>(&mut self, points: I) {
        for p in points {
            self.push_point(p);
        }
    }

    /// Oldest point first.
    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    /// Recognizes the accumulated stroke and starts a new one.
    pub fn finish_stroke(&mut self) -> Option<ShapeLabel> {
        let mut trail = std::mem::take(&mut self.trail);
        let shape = self.recognize_shape(trail.make_contiguous());
        trail.clear();
        self.trail = trail;
        shape
    }
}

impl Default for TrailRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRAIL_POINTS)
    }
}

impl ShapeRecognizer for TrailRecognizer {
    fn reset(&mut self) {
        self.trail.clear();
    }

    fn recognize_shape(&self, trail: &[TrailPoint]) -> Option<ShapeLabel> {
        if trail.len() < MIN_POINTS {
            return None;
        }

        let (min, max) = bounds(trail);
        let (width, height) = (max.0 - min.0, max.1 - min.1);
        let extent = width.max(height);
        if extent < MIN_EXTENT {
            return None;
        }

        let path_length: f32 = trail.windows(2).map(|w| distance(w[0], w[1])).sum();
        let first = trail[0];
        let last = trail[trail.len() - 1];
        let closure = distance(first, last);

        if closure > CLOSURE_RATIO * extent {
            let straightness = closure / path_length;
            return (straightness > LINE_STRAIGHTNESS).then_some(ShapeLabel::Line);
        }

        if radius_variation(trail) < CIRCLE_MAX_CV {
            return Some(ShapeLabel::Circle);
        }

        let diagonal = width.hypot(height);
        let mut polygon = simplify(trail, SIMPLIFY_RATIO * diagonal);
        if polygon.len() > 1 && distance(polygon[0], polygon[polygon.len() - 1]) <= CLOSURE_RATIO * extent {
            polygon.pop();
        }
        match merge_shallow_corners(polygon).len() {
            3 => Some(ShapeLabel::Triangle),
            4 => Some(ShapeLabel::Square),
            _ => None,
        }
    }
}

fn distance(a: TrailPoint, b: TrailPoint) -> f32 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

fn bounds(points: &[TrailPoint]) -> (TrailPoint, TrailPoint) {
    points.iter().fold(
        ((f32::MAX, f32::MAX), (f32::MIN, f32::MIN)),
        |(lo, hi), &(x, y)| ((lo.0.min(x), lo.1.min(y)), (hi.0.max(x), hi.1.max(y))),
    )
}

/// std / mean of the distances to the centroid.
fn radius_variation(points: &[TrailPoint]) -> f32 {
    let n = points.len() as f32;
    let cx = points.iter().map(|p| p.0).sum::<f32>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f32>() / n;

    let radii: Vec<f32> = points.iter().map(|&p| distance(p, (cx, cy))).collect();
    let mean = radii.iter().sum::<f32>() / n;
    if mean <= f32::EPSILON {
        return f32::INFINITY;
    }
    let variance = radii.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt() / mean
}

fn segment_distance(p: TrailPoint, a: TrailPoint, b: TrailPoint) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, (a.0 + t * dx, a.1 + t * dy))
}

/// Ramer-Douglas-Peucker simplification. Keeps both endpoints.
fn simplify(points: &[TrailPoint], epsilon: f32) -> Vec<TrailPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (index, farthest) = ((start + 1)..end)
            .map(|i| (i, segment_distance(points[i], points[start], points[end])))
            .fold((start, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
        if farthest > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

fn turn_angle(prev: TrailPoint, current: TrailPoint, next: TrailPoint) -> f32 {
    let a = (current.0 - prev.0, current.1 - prev.1);
    let b = (next.0 - current.0, next.1 - current.1);
    let (la, lb) = (a.0.hypot(a.1), b.0.hypot(b.1));
    if la <= f32::EPSILON || lb <= f32::EPSILON {
        return 0.0;
    }
    ((a.0 * b.0 + a.1 * b.1) / (la * lb)).clamp(-1.0, 1.0).acos()
}

/// Drops the shallowest vertex of the closed polygon until every turn is a corner.
fn merge_shallow_corners(mut polygon: Vec<TrailPoint>) -> Vec<TrailPoint> {
    while polygon.len() >= 3 {
        let n = polygon.len();
        let shallowest = (0..n)
            .map(|i| (i, turn_angle(polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n])))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|&(_, angle)| angle < MIN_CORNER_ANGLE);
        match shallowest {
            Some((i, _)) => {
                polygon.remove(i);
            }
            None => break,
        }
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn circle_trail(n: usize) -> Vec<TrailPoint> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f32 / (n - 1) as f32;
                (0.5 + 0.1 * a.cos(), 0.5 + 0.1 * a.sin())
            })
            .collect()
    }

    fn polygon_trail(vertices: &[TrailPoint], per_side: usize) -> Vec<TrailPoint> {
        let mut points = Vec::new();
        for (i, &from) in vertices.iter().enumerate() {
            let to = vertices[(i + 1) % vertices.len()];
            for s in 0..per_side {
                let t = s as f32 / per_side as f32;
                points.push((from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t));
            }
        }
        points
    }

    fn line_trail(n: usize) -> Vec<TrailPoint> {
        (0..n)
            .map(|i| (0.2 + 0.6 * i as f32 / (n - 1) as f32, 0.4))
            .collect()
    }

    fn recognize(trail: &[TrailPoint]) -> Option<ShapeLabel> {
        TrailRecognizer::default().recognize_shape(trail)
    }

    #[test]
    fn test_circle() {
        assert_eq!(recognize(&circle_trail(100)), Some(ShapeLabel::Circle));
    }

    #[test]
    fn test_square() {
        let square = polygon_trail(&[(0.3, 0.3), (0.5, 0.3), (0.5, 0.5), (0.3, 0.5)], 25);
        assert_eq!(recognize(&square), Some(ShapeLabel::Square));
    }

    #[test]
    fn test_square_starting_mid_edge() {
        let mut square = polygon_trail(&[(0.3, 0.3), (0.5, 0.3), (0.5, 0.5), (0.3, 0.5)], 25);
        square.rotate_left(12);
        assert_eq!(recognize(&square), Some(ShapeLabel::Square));
    }

    #[test]
    fn test_triangle() {
        let triangle = polygon_trail(&[(0.5, 0.2), (0.7, 0.55), (0.3, 0.55)], 30);
        assert_eq!(recognize(&triangle), Some(ShapeLabel::Triangle));
    }

    #[test]
    fn test_line() {
        assert_eq!(recognize(&line_trail(100)), Some(ShapeLabel::Line));
    }

    #[test]
    fn test_diagonal_line() {
        let trail: Vec<TrailPoint> = (0..50).map(|i| (0.1 + i as f32 * 0.01, 0.8 - i as f32 * 0.01)).collect();
        assert_eq!(recognize(&trail), Some(ShapeLabel::Line));
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(recognize(&line_trail(5)), None);
        assert_eq!(recognize(&[]), None);
    }

    #[test]
    fn test_tiny_stroke_is_noise() {
        let trail: Vec<TrailPoint> = (0..30).map(|i| (0.5 + i as f32 * 1e-4, 0.5)).collect();
        assert_eq!(recognize(&trail), None);
    }

    #[test]
    fn test_zigzag_rejected() {
        let trail: Vec<TrailPoint> = (0..40)
            .map(|i| (0.2 + i as f32 * 0.015, if i % 2 == 0 { 0.3 } else { 0.5 }))
            .collect();
        assert_eq!(recognize(&trail), None);
    }

    #[test]
    fn test_accumulate_and_finish() {
        let mut r = TrailRecognizer::default();
        r.extend(circle_trail(60));
        assert_eq!(r.trail().len(), 60);
        assert_eq!(r.finish_stroke(), Some(ShapeLabel::Circle));
        assert!(r.trail().is_empty());
        assert_eq!(r.finish_stroke(), None);
    }

    #[test]
    fn test_trail_bounded() {
        let mut r = TrailRecognizer::new(20);
        r.extend(line_trail(100));
        assert_eq!(r.trail().len(), 20);
        // Oldest points were dropped
        assert!((r.trail()[19].0 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_trail_keeps_newest_after_long_stream() {
        let mut r = TrailRecognizer::default();
        r.extend((0..2000).map(|i| (i as f32, 0.0)));
        assert_eq!(r.trail().len(), DEFAULT_MAX_TRAIL_POINTS);
        assert_eq!(r.trail().front(), Some(&(1488.0, 0.0)));
        assert_eq!(r.trail().back(), Some(&(1999.0, 0.0)));

        // Wrapped buffer still recognizes as a whole stroke
        r.reset();
        r.extend(line_trail(700));
        assert_eq!(r.finish_stroke(), Some(ShapeLabel::Line));
        assert!(r.trail().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut r = TrailRecognizer::default();
        r.push_point((0.1, 0.1));
        r.reset();
        assert!(r.trail().is_empty());
    }

    #[test]
    fn test_simplify_keeps_corners() {
        let square = polygon_trail(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], 10);
        let simplified = simplify(&square, 0.01);
        assert!(simplified.contains(&(1.0, 0.0)));
        assert!(simplified.contains(&(1.0, 1.0)));
        assert!(simplified.contains(&(0.0, 1.0)));
    }
}
