//! Tracker configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::ConfigError;
use crate::{EAR_THRESHOLD_HIGH, EAR_THRESHOLD_LOW, MIN_CONSECUTIVE_FRAMES};

/// Thresholds for the blink state machine
///
/// Missing fields fall back to the defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Lower bound of the partial-closure band (inclusive)
    pub ear_low: f64,
    /// Upper bound of the partial-closure band (exclusive)
    pub ear_high: f64,
    /// Band frames needed before a blink can be confirmed
    pub min_consecutive_frames: u32,
    /// Clear the band counter when a blink is confirmed.
    /// Off by default: a confirmed blink then stays latched.
    pub reset_on_confirm: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ear_low: EAR_THRESHOLD_LOW,
            ear_high: EAR_THRESHOLD_HIGH,
            min_consecutive_frames: MIN_CONSECUTIVE_FRAMES,
            reset_on_confirm: false,
        }
    }
}

impl TrackerConfig {
    /// Check the band is non-empty and the run length is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written negated so NaN bounds are rejected too
        if !(self.ear_low < self.ear_high) {
            return Err(ConfigError::InvalidBand {
                low: self.ear_low,
                high: self.ear_high,
            });
        }
        if self.min_consecutive_frames == 0 {
            return Err(ConfigError::ZeroMinFrames);
        }
        Ok(())
    }

    /// Parse and validate a JSON config string
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Does `avg_ear` fall in `[ear_low, ear_high)`?
    pub fn in_band(&self, avg_ear: f64) -> bool {
        avg_ear >= self.ear_low && avg_ear < self.ear_high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.ear_low, 0.25);
        assert_eq!(config.ear_high, 0.4);
        assert_eq!(config.min_consecutive_frames, 2);
        assert!(!config.reset_on_confirm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TrackerConfig::from_json(r#"{"min_consecutive_frames": 3}"#).unwrap();
        assert_eq!(
            config,
            TrackerConfig {
                min_consecutive_frames: 3,
                ..TrackerConfig::default()
            }
        );
    }

    #[test]
    fn test_rejects_inverted_band() {
        let err = TrackerConfig::from_json(r#"{"ear_low": 0.4, "ear_high": 0.25}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBand { .. }));
    }

    #[test]
    fn test_rejects_empty_band() {
        let config = TrackerConfig {
            ear_low: 0.3,
            ear_high: 0.3,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_min_frames() {
        let err = TrackerConfig::from_json(r#"{"min_consecutive_frames": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMinFrames));
    }

    #[test]
    fn test_band_is_half_open() {
        let config = TrackerConfig::default();
        assert!(config.in_band(0.25));
        assert!(config.in_band(0.39));
        assert!(!config.in_band(0.4));
        assert!(!config.in_band(0.2));
        assert!(!config.in_band(f64::NAN));
    }

    #[test]
    fn test_malformed_json() {
        let err = TrackerConfig::from_json("{ear_low").unwrap_err();
        assert_eq!(err.code(), "E204_CONFIG_PARSE");
    }
}
