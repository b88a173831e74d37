//! Blink Tracker: consecutive-frame smoothing over average EAR
//!
//! Transitions per frame:
//! - ear_low <= ear < ear_high: count += 1, result unchanged
//! - outside the band, count >= min frames: result = true (count kept)
//! - outside the band, count < min frames: result = false, count = 0
//!
//! Because the count is kept on confirmation, a confirmed blink stays
//! reported until `reset()`. `TrackerConfig::reset_on_confirm` clears the
//! count instead, so every blink needs its own run of band frames.

use tracing::{debug, info};

use crate::types::{ConfigError, ReasonCode, TrackerConfig, TrackerOutput, TrackerPhase};

/// Per-session blink state machine
#[derive(Debug, Clone)]
pub struct BlinkTracker {
    config: TrackerConfig,
    /// Consecutive frames inside the band
    consecutive_low_count: u32,
    /// Most recently decided blink state
    last_result: bool,
    /// Last EAR fed in
    last_ear: Option<f64>,
    /// Number of updates
    frames_processed: u64,
    /// Number of confirmations
    blinks_confirmed: u64,
}

impl Default for BlinkTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkTracker {
    /// Create tracker with default thresholds
    pub fn new() -> Self {
        Self::from_valid_config(TrackerConfig::default())
    }

    /// Create tracker with custom thresholds
    pub fn with_config(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TrackerConfig) -> Self {
        Self {
            config,
            consecutive_low_count: 0,
            last_result: false,
            last_ear: None,
            frames_processed: 0,
            blinks_confirmed: 0,
        }
    }

    /// Feed one frame's average EAR, return whether a blink is detected
    pub fn update(&mut self, avg_ear: f64) -> bool {
        self.update_detailed(avg_ear).blinking
    }

    /// Feed one frame's average EAR, return the full decision
    pub fn update_detailed(&mut self, avg_ear: f64) -> TrackerOutput {
        self.frames_processed += 1;
        self.last_ear = Some(avg_ear);

        let reason = if self.config.in_band(avg_ear) {
            self.consecutive_low_count = self.consecutive_low_count.saturating_add(1);
            ReasonCode::B002_PARTIAL_CLOSURE_ACCUMULATING
        } else if self.consecutive_low_count >= self.config.min_consecutive_frames {
            // Latched frames re-enter this branch; only the rising edge is a new blink
            if !self.last_result {
                self.blinks_confirmed += 1;
                info!(
                    run = self.consecutive_low_count,
                    avg_ear,
                    frame = self.frames_processed,
                    "blink confirmed"
                );
            }
            self.last_result = true;
            if self.config.reset_on_confirm {
                self.consecutive_low_count = 0;
            }
            ReasonCode::B003_BLINK_CONFIRMED
        } else {
            let discarded = self.consecutive_low_count;
            self.last_result = false;
            self.consecutive_low_count = 0;
            if discarded > 0 {
                ReasonCode::B004_RUN_TOO_SHORT
            } else if avg_ear >= self.config.ear_high {
                ReasonCode::B001_EYE_OPEN
            } else {
                ReasonCode::B001_EYE_CLOSED
            }
        };

        debug!(
            avg_ear,
            count = self.consecutive_low_count,
            blinking = self.last_result,
            reason = reason.code(),
            "tracker update"
        );

        TrackerOutput {
            avg_ear,
            consecutive_low_count: self.consecutive_low_count,
            phase: self.phase(),
            blinking: self.last_result,
            reason,
        }
    }

    /// Get current phase
    pub fn phase(&self) -> TrackerPhase {
        TrackerPhase::from_count(self.consecutive_low_count)
    }

    pub fn consecutive_low_count(&self) -> u32 {
        self.consecutive_low_count
    }

    /// Result of the most recent update (false before any)
    pub fn last_result(&self) -> bool {
        self.last_result
    }

    pub fn last_ear(&self) -> Option<f64> {
        self.last_ear
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn blinks_confirmed(&self) -> u64 {
        self.blinks_confirmed
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Reset tracker to initial state, keeping its config
    pub fn reset(&mut self) {
        *self = Self::from_valid_config(self.config);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(tracker: &mut BlinkTracker, ears: &[f64]) -> Vec<bool> {
        ears.iter().map(|&ear| tracker.update(ear)).collect()
    }

    #[test]
    fn test_initial_state() {
        let tracker = BlinkTracker::new();
        assert_eq!(tracker.consecutive_low_count(), 0);
        assert!(!tracker.last_result());
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
        assert_eq!(tracker.last_ear(), None);
    }

    #[test]
    fn test_two_band_frames_then_open_confirms() {
        let mut tracker = BlinkTracker::new();

        assert!(!tracker.update(0.3));
        assert_eq!(tracker.consecutive_low_count(), 1);

        assert!(!tracker.update(0.3));
        assert_eq!(tracker.consecutive_low_count(), 2);

        let out = tracker.update_detailed(0.5);
        assert!(out.blinking);
        assert_eq!(out.reason, ReasonCode::B003_BLINK_CONFIRMED);
        assert_eq!(tracker.blinks_confirmed(), 1);
    }

    #[test]
    fn test_single_band_frame_is_discarded() {
        let mut tracker = BlinkTracker::new();
        assert_eq!(feed(&mut tracker, &[0.3, 0.5]), vec![false, false]);
        assert_eq!(tracker.consecutive_low_count(), 0);
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
    }

    #[test]
    fn test_band_frames_do_not_change_result() {
        let mut tracker = BlinkTracker::new();
        feed(&mut tracker, &[0.3, 0.3, 0.5]);
        assert!(tracker.last_result());

        // Still true while accumulating again
        let out = tracker.update_detailed(0.3);
        assert!(out.blinking);
        assert_eq!(out.reason, ReasonCode::B002_PARTIAL_CLOSURE_ACCUMULATING);
    }

    #[test]
    fn test_confirmed_blink_latches() {
        let mut tracker = BlinkTracker::new();
        let results = feed(&mut tracker, &[0.3, 0.3, 0.5, 0.5, 0.1, 0.45]);
        assert_eq!(results, vec![false, false, true, true, true, true]);
        assert_eq!(tracker.consecutive_low_count(), 2);
        assert_eq!(tracker.blinks_confirmed(), 1);
    }

    #[test]
    fn test_latched_frames_do_not_count_as_blinks() {
        let mut tracker = BlinkTracker::new();
        feed(&mut tracker, &[0.3, 0.3, 0.5]);
        assert_eq!(tracker.blinks_confirmed(), 1);

        // Another band run while latched re-confirms without a rising edge
        let results = feed(&mut tracker, &[0.3, 0.3, 0.5, 0.6]);
        assert_eq!(results, vec![true, true, true, true]);
        assert_eq!(tracker.blinks_confirmed(), 1);

        tracker.reset();
        feed(&mut tracker, &[0.3, 0.3, 0.5]);
        assert_eq!(tracker.blinks_confirmed(), 1);
    }

    #[test]
    fn test_reset_on_confirm_reports_once() {
        let config = TrackerConfig {
            reset_on_confirm: true,
            ..TrackerConfig::default()
        };
        let mut tracker = BlinkTracker::with_config(config).unwrap();
        let results = feed(&mut tracker, &[0.3, 0.3, 0.5, 0.5, 0.3, 0.3, 0.5]);
        assert_eq!(results, vec![false, false, true, false, false, false, true]);
        assert_eq!(tracker.blinks_confirmed(), 2);
    }

    #[test]
    fn test_fully_closed_is_out_of_band() {
        let mut tracker = BlinkTracker::new();
        let out = tracker.update_detailed(0.1);
        assert!(!out.blinking);
        assert_eq!(out.reason, ReasonCode::B001_EYE_CLOSED);

        // A dip straight below the band still needs band frames before it
        feed(&mut tracker, &[0.3, 0.3]);
        let out = tracker.update_detailed(0.1);
        assert!(out.blinking);
    }

    #[test]
    fn test_band_bounds() {
        let mut tracker = BlinkTracker::new();
        tracker.update(0.25);
        assert_eq!(tracker.consecutive_low_count(), 1);

        let out = tracker.update_detailed(0.4);
        assert_eq!(out.reason, ReasonCode::B004_RUN_TOO_SHORT);
        assert_eq!(tracker.consecutive_low_count(), 0);

        let out = tracker.update_detailed(0.4);
        assert_eq!(out.reason, ReasonCode::B001_EYE_OPEN);
    }

    #[test]
    fn test_nan_is_out_of_band() {
        let mut tracker = BlinkTracker::new();
        tracker.update(0.3);
        let out = tracker.update_detailed(f64::NAN);
        assert!(!out.blinking);
        assert_eq!(out.consecutive_low_count, 0);
    }

    #[test]
    fn test_custom_min_frames() {
        let config = TrackerConfig {
            min_consecutive_frames: 3,
            ..TrackerConfig::default()
        };
        let mut tracker = BlinkTracker::with_config(config).unwrap();
        assert_eq!(feed(&mut tracker, &[0.3, 0.3, 0.5]), vec![false, false, false]);
        assert_eq!(feed(&mut tracker, &[0.3, 0.3, 0.3, 0.5]), vec![false, false, false, true]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig {
            ear_low: 0.5,
            ..TrackerConfig::default()
        };
        assert!(BlinkTracker::with_config(config).is_err());
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = TrackerConfig {
            min_consecutive_frames: 1,
            ..TrackerConfig::default()
        };
        let mut tracker = BlinkTracker::with_config(config).unwrap();
        feed(&mut tracker, &[0.3, 0.5]);
        assert!(tracker.last_result());

        tracker.reset();
        assert!(!tracker.last_result());
        assert_eq!(tracker.frames_processed(), 0);
        assert_eq!(tracker.config().min_consecutive_frames, 1);
    }

    #[test]
    fn test_independent_trackers() {
        let mut a = BlinkTracker::new();
        let mut b = BlinkTracker::new();
        feed(&mut a, &[0.3, 0.3, 0.5]);
        assert!(a.last_result());
        assert!(!b.update(0.5));
    }
}
