//! blinkear: eye-aspect-ratio blink detection
//!
//! keypoints → EAR (left, right) → average → BlinkTracker → blinking?

pub mod core;
pub mod logging;
pub mod types;

// =============================================================================
// THRESHOLDS - defaults for TrackerConfig
// =============================================================================

/// Lower bound of the partial-closure band (inclusive)
pub const EAR_THRESHOLD_LOW: f64 = 0.25;

/// Upper bound of the partial-closure band (exclusive)
pub const EAR_THRESHOLD_HIGH: f64 = 0.4;

/// Band frames required before an out-of-band frame confirms a blink
pub const MIN_CONSECUTIVE_FRAMES: u32 = 2;

// =============================================================================
// LANDMARK MODEL
// =============================================================================

/// Points emitted per face by MediaPipe Face Mesh (without iris refinement)
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
