//! Tracker phase definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// Observable phase of a BlinkTracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerPhase {
    /// No band frames counted
    Idle,
    /// Counting consecutive partial-closure frames
    Accumulating,
}

impl TrackerPhase {
    pub fn from_count(consecutive_low_count: u32) -> Self {
        if consecutive_low_count > 0 {
            TrackerPhase::Accumulating
        } else {
            TrackerPhase::Idle
        }
    }

    /// Terminal color for this phase
    pub fn color(&self) -> Color {
        match self {
            TrackerPhase::Idle => Color::BrightBlack,
            TrackerPhase::Accumulating => Color::Yellow,
        }
    }
}

impl std::fmt::Display for TrackerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrackerPhase::Idle => "IDLE",
            TrackerPhase::Accumulating => "ACCUMULATING",
        };
        write!(f, "{}", name)
    }
}
