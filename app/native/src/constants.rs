//! Tuning constants for the window event pipeline.
//!
//! The gesture values are empirically tuned. They are exposed as defaults of
//! [`GestureThresholds`](crate::gesture::GestureThresholds) so embedders can
//! override them from configuration.
//!
//! # Organization
//!
//! - `queue` - Event buffer sizing
//! - `keys` - Key table size and hold synthesis
//! - `gesture` - Touch classification thresholds
//! - `placement` - Window placement and activity rules
//! - `monitor` - Monitor fallback geometry
//! - `timing` - Thread liveness and pump pacing

/// Application name used for sleep-inhibition requests and config paths.
pub const APP_NAME: &str = "duoview";

/// Reverse-domain identifier reported to the power manager.
pub const APP_BUNDLE_ID: &str = "io.github.duoview";

/// Event double-buffer sizing.
pub mod queue {
    /// Number of events each side of the buffer can hold.
    ///
    /// Events posted while the write side is full are dropped.
    pub const DEFAULT_CAPACITY: usize = 2048;
}

/// Keyboard state tracking.
pub mod keys {
    /// Size of the virtual key table.
    pub const KEY_COUNT: usize = 256;

    /// Minimum elapsed time for a synchronous key-up to report a hold (seconds).
    pub const MIN_HOLD_PROGRESS: f64 = 1.0e-7;
}

/// Gesture recognition thresholds.
pub mod gesture {
    /// Maximum number of simultaneous touch points tracked.
    pub const MAX_TOUCHES: usize = 10;

    /// Rotation needed to start a rotate gesture from idle (degrees).
    pub const ROTATE_FROM_IDLE_DEG: f64 = 2.0;
    /// Rotation needed to continue an active rotate gesture (degrees).
    pub const ROTATE_UPDATE_DEG: f64 = 2.0;
    /// Rotation needed to interrupt another active gesture (degrees).
    pub const ROTATE_BREAK_OTHER_DEG: f64 = 20.0;

    /// Separation change needed to start a pinch from idle (dip).
    pub const PINCH_FROM_IDLE_DIP: f64 = 6.0;
    /// Separation change needed to continue an active pinch (dip).
    pub const PINCH_UPDATE_DIP: f64 = 1.0;
    /// Separation change needed to interrupt another active gesture (dip).
    pub const PINCH_BREAK_OTHER_DIP: f64 = 20.0;

    /// Displacement needed to start a pan from idle (dip).
    pub const PAN_FROM_IDLE_DIP: f64 = 4.0;
    /// Displacement needed to continue an active pan (dip).
    pub const PAN_UPDATE_DIP: f64 = 1.0;
    /// Displacement needed to interrupt another active gesture (dip).
    pub const PAN_BREAK_OTHER_DIP: f64 = 20.0;

    /// Finger separation below which rotation is treated as zero (dip).
    pub const ROTATE_MIN_SEPARATION_DIP: f64 = 50.0;

    /// Maximum distance between the two taps of a double-tap (dip).
    ///
    /// Also the maximum drift of a single tap between down and up.
    pub const TAP_RADIUS_DIP: f64 = 20.0;

    /// Pairing window for a double-tap (seconds).
    pub const DOUBLE_TAP_WINDOW_SECS: f64 = 0.5;

    /// Longest contact still recognized as a tap (seconds).
    pub const TAP_MAX_DURATION_SECS: f64 = 0.5;

    /// Centroid travel needed for a three-finger swipe (dip).
    pub const SWIPE_DISTANCE_DIP: f64 = 150.0;

    /// Maximum cross-axis travel of a three-finger swipe (dip).
    pub const SWIPE_TOLERANCE_DIP: f64 = 50.0;
}

/// Window placement and activity rules.
pub mod placement {
    /// Offset applied when a window is moved back onto a monitor (pixels).
    pub const SNAP_OFFSET: i32 = 256;

    /// Windows narrower or shorter than this are never active (pixels).
    pub const MIN_ACTIVE_SIZE: i32 = 10;

    /// Default windowed rectangle as `(left, top, right, bottom)`.
    pub const DEFAULT_RECT: (i32, i32, i32, i32) = (128, 128, 512, 512);

    /// Height of the slave sync line at the top of the monitor (pixels).
    pub const SLAVE_LINE_TOP_HEIGHT: i32 = 10;

    /// Width of the two-pixel slave sync marker (pixels).
    pub const SLAVE_TOP_2PX_WIDTH: i32 = 2;

    /// Minimum normalized cursor displacement reported as a move.
    pub const MOUSE_MOVE_EPSILON: f64 = 0.0008;
}

/// HDMI frame-packing geometry.
pub mod hdmi {
    /// Blanking gap between the two eyes of a 720p frame-packed output (pixels).
    pub const GAP_720: i32 = 30;

    /// Blanking gap between the two eyes of a 1080p frame-packed output (pixels).
    pub const GAP_1080: i32 = 45;
}

/// Monitor fallback geometry.
pub mod monitor {
    /// Size of the synthetic monitor used when nothing can be enumerated.
    pub const FALLBACK_SIZE: (i32, i32) = (800, 800);

    /// Number of settings-store slots read for monitor overrides.
    pub const OVERRIDE_SLOTS: usize = 2;
}

/// Thread liveness and pacing.
pub mod timing {
    /// Step of each liveness wait on the capture thread (ms).
    pub const CAPTURE_WAIT_STEP_MS: u64 = 10_000;

    /// Total time to wait for the capture thread before detaching it (ms).
    pub const CAPTURE_WAIT_LIMIT_MS: u64 = 60_000;

    /// Timeout passed to each native pump iteration (ms).
    pub const PUMP_TIMEOUT_MS: u64 = 16;
}
