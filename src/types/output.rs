//! Output structures for each processed frame

use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

use crate::types::{ReasonCode, TrackerPhase};

/// Result of a single BlinkTracker update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerOutput {
    /// EAR fed into the tracker
    pub avg_ear: f64,
    /// Consecutive band frames after this update
    pub consecutive_low_count: u32,
    /// Phase after this update
    pub phase: TrackerPhase,
    /// Blink currently detected
    pub blinking: bool,
    /// Why
    pub reason: ReasonCode,
}

/// Output for one analyzed frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutput {
    pub timestamp: DateTime<Utc>,
    /// Absent when the frame was fed as a raw EAR value
    pub left_ear: Option<f64>,
    pub right_ear: Option<f64>,
    pub avg_ear: f64,
    pub consecutive_low_count: u32,
    pub phase: TrackerPhase,
    pub blinking: bool,
    pub reason: ReasonCode,
}

impl FrameOutput {
    /// Create from per-eye ratios (if any) and the tracker result
    pub fn new(left_ear: Option<f64>, right_ear: Option<f64>, tracker: TrackerOutput) -> Self {
        Self {
            timestamp: Utc::now(),
            left_ear,
            right_ear,
            avg_ear: tracker.avg_ear,
            consecutive_low_count: tracker.consecutive_low_count,
            phase: tracker.phase,
            blinking: tracker.blinking,
            reason: tracker.reason,
        }
    }

    fn blink_label(&self) -> &'static str {
        if self.blinking {
            "BLINK"
        } else {
            "open"
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = if self.blinking {
            Color::Green
        } else {
            self.phase.color()
        };
        let line = format!(
            "ear={:.3} | {} | phase={} | count={} | {}",
            self.avg_ear,
            self.blink_label(),
            self.phase,
            self.consecutive_low_count,
            self.reason.code()
        );
        if self.blinking {
            line.color(color).bold().to_string()
        } else {
            line.color(color).to_string()
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "ear={:.3} | blinking={} | phase={} | count={} | reason={}",
            self.avg_ear,
            self.blinking,
            self.phase,
            self.consecutive_low_count,
            self.reason.code()
        )
    }
}
