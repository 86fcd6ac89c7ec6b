//! Monitor enumeration backends.
//!
//! Platform layers implement [`MonitorSource`] on top of their display APIs.
//! The crate ships two portable sources: a fixed list and a "blind" source
//! that only knows the desktop extent.

use super::Monitor;
use crate::error::DuoviewResult;
use crate::geometry::Rect;

/// A provider of the current monitor layout.
pub trait MonitorSource: Send + Sync + std::fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Lists the connected monitors in system order.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying display API is unavailable.
    fn enumerate(&self) -> DuoviewResult<Vec<Monitor>>;

    /// Size of the whole desktop, used when enumeration fails.
    fn desktop_extent(&self) -> Option<(i32, i32)> { None }
}

// ============================================================================
// StaticMonitorSource
// ============================================================================

/// Fixed monitor list, for configuration-provided layouts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticMonitorSource {
    monitors: Vec<Monitor>,
}

impl StaticMonitorSource {
    /// Creates a source returning `monitors` on every enumeration.
    #[must_use]
    pub const fn new(monitors: Vec<Monitor>) -> Self { Self { monitors } }
}

impl MonitorSource for StaticMonitorSource {
    fn name(&self) -> &'static str { "static" }

    fn enumerate(&self) -> DuoviewResult<Vec<Monitor>> { Ok(self.monitors.clone()) }

    fn desktop_extent(&self) -> Option<(i32, i32)> {
        let bounds = self.monitors.iter().map(|m| m.rect).reduce(|a, b| a.union(&b))?;
        Some((bounds.width(), bounds.height()))
    }
}

// ============================================================================
// BlindMonitorSource
// ============================================================================

/// Derives a layout from the desktop extent alone.
///
/// Some display servers only expose one big root surface spanning every
/// head. Well known dual-head extents are split into two monitors.
#[derive(Debug, Clone, Copy)]
pub struct BlindMonitorSource {
    width: i32,
    height: i32,
}

impl BlindMonitorSource {
    /// Creates a source for a desktop of `width` x `height` pixels.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

impl MonitorSource for BlindMonitorSource {
    fn name(&self) -> &'static str { "blind" }

    fn enumerate(&self) -> DuoviewResult<Vec<Monitor>> { Ok(blind_layout(self.width, self.height)) }

    fn desktop_extent(&self) -> Option<(i32, i32)> { Some((self.width, self.height)) }
}

/// Splits a desktop extent into monitors.
///
/// `3360x1200` is the classic 1680x1050 + 1680x1200 pair. Widths of 3200,
/// 3360, 3840 and 5120 (and `2560x1024`) are two equal side-by-side heads.
/// Anything else is one monitor covering the extent.
#[must_use]
pub fn blind_layout(width: i32, height: i32) -> Vec<Monitor> {
    let pair = match (width, height) {
        (3360, 1200) => Some((Rect::new(0, 0, 1680, 1050), Rect::new(1680, 0, 3360, 1200))),
        (3200 | 3360 | 3840 | 5120, _) | (2560, 1024) => {
            let half = width / 2;
            Some((Rect::new(0, 0, half, height), Rect::new(half, 0, width, height)))
        }
        _ => None,
    };

    match pair {
        Some((first, second)) => {
            tracing::debug!(width, height, "dual-head desktop extent detected");
            vec![
                Monitor::new(0, first).with_primary(true),
                Monitor::new(1, second),
            ]
        }
        None => vec![Monitor::new(0, Rect::new(0, 0, width, height)).with_primary(true)],
    }
}
