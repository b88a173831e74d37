//! Facial landmark points and per-frame input

use serde::{Deserialize, Serialize};

/// A single 2D landmark in image space
///
/// Extra fields sent by landmark models (`z`, `name`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance built from absolute coordinate differences
    pub fn distance(&self, other: &Keypoint) -> f64 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx.powi(2) + dy.powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Keypoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One frame of keypoints as sent over the wire
///
/// Accepts either a bare array or an object with a `keypoints` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrameInput {
    Bare(Vec<Keypoint>),
    Wrapped { keypoints: Vec<Keypoint> },
}

impl FrameInput {
    pub fn keypoints(&self) -> &[Keypoint] {
        match self {
            FrameInput::Bare(keypoints) => keypoints,
            FrameInput::Wrapped { keypoints } => keypoints,
        }
    }

    pub fn into_keypoints(self) -> Vec<Keypoint> {
        match self {
            FrameInput::Bare(keypoints) => keypoints,
            FrameInput::Wrapped { keypoints } => keypoints,
        }
    }
}
