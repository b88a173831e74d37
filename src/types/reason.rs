//! Reason codes explaining each tracker decision

use serde::{Deserialize, Serialize};

/// Why the tracker returned what it did for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // B001: Out of band, nothing pending
    // =========================================================================
    /// EAR at or above the upper bound
    B001_EYE_OPEN,
    /// EAR below the lower bound (or not a number)
    B001_EYE_CLOSED,

    // =========================================================================
    // B002: In band
    // =========================================================================
    /// Partial closure counted toward a blink
    B002_PARTIAL_CLOSURE_ACCUMULATING,

    // =========================================================================
    // B003: Confirmation
    // =========================================================================
    /// Run long enough; blink reported
    B003_BLINK_CONFIRMED,

    // =========================================================================
    // B004: Rejection
    // =========================================================================
    /// Run ended before reaching min_consecutive_frames
    B004_RUN_TOO_SHORT,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::B001_EYE_OPEN => "B001_EYE_OPEN",
            Self::B001_EYE_CLOSED => "B001_EYE_CLOSED",
            Self::B002_PARTIAL_CLOSURE_ACCUMULATING => "B002_PARTIAL_CLOSURE_ACCUMULATING",
            Self::B003_BLINK_CONFIRMED => "B003_BLINK_CONFIRMED",
            Self::B004_RUN_TOO_SHORT => "B004_RUN_TOO_SHORT",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::B001_EYE_OPEN => "Eye open",
            Self::B001_EYE_CLOSED => "Eye closed",
            Self::B002_PARTIAL_CLOSURE_ACCUMULATING => "Partial closure, counting frames",
            Self::B003_BLINK_CONFIRMED => "Blink confirmed",
            Self::B004_RUN_TOO_SHORT => "Closure too short, discarded",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
