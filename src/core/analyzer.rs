//! Frame Analyzer: keypoints → per-eye EAR → tracker

use tracing::warn;

use crate::core::{compute_ear, BlinkTracker};
use crate::types::{
    ConfigError, EarError, EyeContour, FrameOutput, Keypoint, TrackerConfig, LEFT_EYE, RIGHT_EYE,
};

/// Runs the full per-frame pipeline for one tracked face
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    left: EyeContour,
    right: EyeContour,
    tracker: BlinkTracker,
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAnalyzer {
    /// Face Mesh contours, default thresholds
    pub fn new() -> Self {
        Self {
            left: LEFT_EYE,
            right: RIGHT_EYE,
            tracker: BlinkTracker::new(),
        }
    }

    /// Face Mesh contours, custom thresholds
    pub fn with_config(config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            left: LEFT_EYE,
            right: RIGHT_EYE,
            tracker: BlinkTracker::with_config(config)?,
        })
    }

    /// Swap in contours for a different landmark layout
    pub fn with_contours(mut self, left: EyeContour, right: EyeContour) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Keypoints a frame must carry for both contours
    pub fn required_keypoints(&self) -> usize {
        self.left.required_len().max(self.right.required_len())
    }

    /// Process one frame of keypoints
    ///
    /// On error the tracker is left untouched.
    pub fn process(&mut self, keypoints: &[Keypoint]) -> Result<FrameOutput, EarError> {
        let required = self.required_keypoints();
        if keypoints.len() < required {
            warn!(required, actual = keypoints.len(), "frame rejected: too few keypoints");
            return Err(EarError::TooFewKeypoints {
                required,
                actual: keypoints.len(),
            });
        }

        let left_ear = compute_ear(keypoints, &self.left).inspect_err(|err| {
            warn!(eye = self.left.eye.as_str(), error = %err, "frame rejected");
        })?;
        let right_ear = compute_ear(keypoints, &self.right).inspect_err(|err| {
            warn!(eye = self.right.eye.as_str(), error = %err, "frame rejected");
        })?;

        let avg_ear = (left_ear + right_ear) / 2.0;
        let tracker_output = self.tracker.update_detailed(avg_ear);

        Ok(FrameOutput::new(Some(left_ear), Some(right_ear), tracker_output))
    }

    /// Feed a precomputed average EAR, skipping geometry
    pub fn process_ear(&mut self, avg_ear: f64) -> FrameOutput {
        FrameOutput::new(None, None, self.tracker.update_detailed(avg_ear))
    }

    pub fn tracker(&self) -> &BlinkTracker {
        &self.tracker
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}

// =============================================================================
// TESTS
// =============================================================================
