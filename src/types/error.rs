//! Error types with stable codes for logs and API bodies

use thiserror::Error;

/// Failures while turning a keypoint frame into an EAR value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EarError {
    /// Eye corners coincide; the ratio has no denominator
    #[error("degenerate eye geometry: horizontal corner distance is {horizontal}")]
    DegenerateGeometry { horizontal: f64 },

    /// A contour index points past the end of the keypoint sequence
    #[error("landmark index {index} out of range for {len} keypoints")]
    IndexOutOfRange { index: usize, len: usize },

    /// Frame is too short for the configured contours
    #[error("frame has {actual} keypoints, at least {required} required")]
    TooFewKeypoints { required: usize, actual: usize },
}

impl EarError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DegenerateGeometry { .. } => "E101_DEGENERATE_GEOMETRY",
            Self::IndexOutOfRange { .. } => "E102_INDEX_OUT_OF_RANGE",
            Self::TooFewKeypoints { .. } => "E103_TOO_FEW_KEYPOINTS",
        }
    }
}

/// Failures while loading or validating a TrackerConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid EAR band: ear_low ({low}) must be below ear_high ({high})")]
    InvalidBand { low: f64, high: f64 },

    #[error("min_consecutive_frames must be at least 1")]
    ZeroMinFrames,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBand { .. } => "E201_INVALID_BAND",
            Self::ZeroMinFrames => "E202_ZERO_MIN_FRAMES",
            Self::Io(_) => "E203_CONFIG_IO",
            Self::Parse(_) => "E204_CONFIG_PARSE",
        }
    }
}
