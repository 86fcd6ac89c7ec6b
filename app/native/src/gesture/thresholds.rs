//! Gesture classification thresholds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::gesture;

/// Three-tier threshold for one gesture family.
///
/// `from_idle` applies when no gesture is active, `update` when this family
/// is already active and `break_other` when a different family is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTier {
    pub from_idle: f64,
    pub update: f64,
    pub break_other: f64,
}

impl ThresholdTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(from_idle: f64, update: f64, break_other: f64) -> Self {
        Self { from_idle, update, break_other }
    }
}

/// Tunable gesture thresholds, loaded from the `gestures` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureThresholds {
    /// Rotation tiers in degrees.
    pub rotate_deg: ThresholdTier,
    /// Pinch tiers in dip of separation change.
    pub pinch_dip: ThresholdTier,
    /// Pan tiers in dip of displacement.
    pub pan_dip: ThresholdTier,
    /// Finger separation below which rotation is ignored (dip).
    pub rotate_min_separation_dip: f64,
    /// Maximum tap drift and double-tap distance (dip).
    pub tap_radius_dip: f64,
    /// Double-tap pairing window (seconds).
    pub double_tap_window_secs: f64,
    /// Longest contact still counted as a tap (seconds).
    pub tap_max_duration_secs: f64,
    /// Three-finger swipe distance (dip).
    pub swipe_distance_dip: f64,
    /// Maximum cross-axis drift of a swipe (dip).
    pub swipe_tolerance_dip: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            rotate_deg: ThresholdTier::new(
                gesture::ROTATE_FROM_IDLE_DEG,
                gesture::ROTATE_UPDATE_DEG,
                gesture::ROTATE_BREAK_OTHER_DEG,
            ),
            pinch_dip: ThresholdTier::new(
                gesture::PINCH_FROM_IDLE_DIP,
                gesture::PINCH_UPDATE_DIP,
                gesture::PINCH_BREAK_OTHER_DIP,
            ),
            pan_dip: ThresholdTier::new(
                gesture::PAN_FROM_IDLE_DIP,
                gesture::PAN_UPDATE_DIP,
                gesture::PAN_BREAK_OTHER_DIP,
            ),
            rotate_min_separation_dip: gesture::ROTATE_MIN_SEPARATION_DIP,
            tap_radius_dip: gesture::TAP_RADIUS_DIP,
            double_tap_window_secs: gesture::DOUBLE_TAP_WINDOW_SECS,
            tap_max_duration_secs: gesture::TAP_MAX_DURATION_SECS,
            swipe_distance_dip: gesture::SWIPE_DISTANCE_DIP,
            swipe_tolerance_dip: gesture::SWIPE_TOLERANCE_DIP,
        }
    }
}
