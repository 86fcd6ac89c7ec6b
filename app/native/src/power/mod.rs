//! Window activity and sleep inhibition.
//!
//! A window is "active" when the user can plausibly see it. Activity gates
//! the sleep-inhibition request: a hidden or locked window never keeps the
//! display awake, whatever its configuration says.

pub mod inhibitor;

use serde::{Deserialize, Serialize};

pub use self::inhibitor::{KeepAwakeInhibitor, RecordingInhibitor, SleepInhibitor};
use crate::constants::placement::MIN_ACTIVE_SIZE;
use crate::error::DuoviewResult;
use crate::geometry::Rect;
use crate::monitor::Monitor;

// ============================================================================
// Active rule
// ============================================================================

/// Everything the active rule looks at.
#[derive(Debug, Clone, Copy)]
pub struct ActiveInputs<'a> {
    /// The session is locked.
    pub locked: bool,
    /// This window is fullscreen.
    pub fullscreen: bool,
    /// Windowed rectangle.
    pub rect: Rect,
    pub monitors: &'a [Monitor],
    /// Number of fullscreen windows in the process.
    pub fullscreen_windows: usize,
}

/// Decides whether a window is visible enough to count as active.
///
/// Locked sessions are never active and fullscreen windows always are.
/// Otherwise another fullscreen window or a rectangle smaller than 10 px
/// makes the window inactive, and it is active iff it overlaps a monitor.
#[must_use]
pub fn is_window_active(inputs: &ActiveInputs<'_>) -> bool {
    if inputs.locked {
        return false;
    }
    if inputs.fullscreen {
        return true;
    }
    if inputs.fullscreen_windows > 0 || inputs.rect.is_degenerate(MIN_ACTIVE_SIZE) {
        return false;
    }
    inputs.monitors.iter().any(|monitor| monitor.rect.intersects(&inputs.rect))
}

// ============================================================================
// Policy
// ============================================================================

/// Sleep blocking flags from the window configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPolicy {
    pub block_system: bool,
    pub block_display: bool,
}

/// Inhibition level requested from the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepInhibition {
    #[default]
    Off,
    /// Keep the system awake, let the display sleep.
    System,
    /// Keep both the system and the display awake.
    Display,
}

impl SleepInhibition {
    /// Maps the policy and activity to an inhibition level.
    #[must_use]
    pub const fn from_policy(policy: SleepPolicy, active: bool) -> Self {
        if !active {
            Self::Off
        } else if policy.block_display {
            Self::Display
        } else if policy.block_system {
            Self::System
        } else {
            Self::Off
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Tracks the applied level so repeated requests do not reach the platform.
#[derive(Debug)]
pub struct PowerController<I = Box<dyn SleepInhibitor>> {
    inhibitor: I,
    /// Last level the backend confirmed; `None` after a failed request.
    current: Option<SleepInhibition>,
}

impl<I: SleepInhibitor> PowerController<I> {
    #[must_use]
    pub const fn new(inhibitor: I) -> Self { Self { inhibitor, current: Some(SleepInhibition::Off) } }

    /// Level currently in effect. `Off` while a failed request is unresolved.
    #[must_use]
    pub const fn current(&self) -> SleepInhibition {
        match self.current {
            Some(level) => level,
            None => SleepInhibition::Off,
        }
    }

    /// Requests `level`. Returns true when the backend was called.
    ///
    /// After a backend error the held level is unknown, so the next request
    /// reaches the backend even when it repeats the previous level.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub fn apply(&mut self, level: SleepInhibition) -> DuoviewResult<bool> {
        if self.current == Some(level) {
            return Ok(false);
        }
        if let Err(err) = self.inhibitor.set_inhibition(level) {
            tracing::warn!(requested = ?level, error = %err, "sleep inhibition request failed");
            self.current = None;
            return Err(err);
        }
        tracing::debug!(from = ?self.current, to = ?level, "sleep inhibition changed");
        self.current = Some(level);
        Ok(true)
    }

    /// Drops any inhibition.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub fn release(&mut self) -> DuoviewResult<bool> { self.apply(SleepInhibition::Off) }
}
