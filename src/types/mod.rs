//! Core types for blinkear

mod config;
mod contour;
mod error;
mod keypoint;
mod output;
mod reason;
mod state;

pub use config::TrackerConfig;
pub use contour::{Eye, EyeContour, LEFT_EYE, RIGHT_EYE};
pub use error::{ConfigError, EarError};
pub use keypoint::{FrameInput, Keypoint};
pub use output::{FrameOutput, TrackerOutput};
pub use reason::ReasonCode;
pub use state::TrackerPhase;
