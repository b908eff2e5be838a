//! JSON-lines frame ingestion.
//!
//! One frame per line:
//! `{"timestamp_ms": 1200, "hands": [{"handedness": "Right", "landmarks": [[x, y, z], ...]}]}`
//!
//! Landmarks are accepted as `[x, y, z]`, `[x, y]` or `{"x": .., "y": .., "z": ..}`.
//! Coordinates must be finite; a value like `1e300` overflows `f32` and rejects the line.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::hand::{HandObservation, Handedness, Landmark};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLandmark {
    Array(Vec<f32>),
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
}

impl RawLandmark {
    fn into_landmark(self) -> Result<Landmark> {
        let xyz = match self {
            RawLandmark::Array(v) => match v.as_slice() {
                [x, y] => [*x, *y, 0.0],
                [x, y, z] => [*x, *y, *z],
                _ => bail!("landmark array must have 2 or 3 components, got {}", v.len()),
            },
            RawLandmark::Object { x, y, z } => [x, y, z],
        };
        if !xyz.iter().all(|c| c.is_finite()) {
            bail!("landmark has non-finite coordinate: {:?}", xyz);
        }
        Ok(Landmark::from(xyz))
    }
}

#[derive(Debug, Deserialize)]
struct JsonHand {
    /// "Left" / "right" / "L" ...
    handedness: String,
    landmarks: Vec<RawLandmark>,
}

#[derive(Debug, Deserialize)]
struct JsonFrame {
    #[serde(default)]
    timestamp_ms: u64,
    #[serde(default)]
    hands: Vec<JsonHand>,
}

/// One decoded input frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp_ms: u64,
    pub hands: Vec<HandObservation>,
}

/// Parses one JSON line. Landmark counts are not checked here; the classifier
/// reports short hands as unknown.
pub fn parse_line(line: &str) -> Result<Frame> {
    let raw: JsonFrame = serde_json::from_str(line)?;
    let hands = raw
        .hands
        .into_iter()
        .map(|hand| {
            let handedness: Handedness = hand.handedness.parse()?;
            let landmarks = hand
                .landmarks
                .into_iter()
                .map(RawLandmark::into_landmark)
                .collect::<Result<Vec<_>>>()?;
            Ok(HandObservation::new(handedness, landmarks))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Frame {
        timestamp_ms: raw.timestamp_ms,
        hands,
    })
}

/// Iterates frames of a JSON-lines stream, skipping blank lines.
///
/// Each item carries its 1-based line number so callers can report and skip bad lines.
pub struct FrameReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = (usize, Result<Frame>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line_no += 1;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = self.buf.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let frame = parse_line(line).with_context(|| format!("line {}", self.line_no));
                    return Some((self.line_no, frame));
                }
                Err(e) => return Some((self.line_no, Err(e.into()))),
            }
        }
    }
}
