//! Master/slave tiling geometry.
//!
//! A stereo window drives two outputs: the master (left eye) and an optional
//! slave (right eye or a sync-code strip). When both land on adjacent
//! monitors in fullscreen, one OS window can span both and each eye is drawn
//! into its half. The functions here compute those halves.
//!
//! Everything in this module is pure: callers pass the current mode,
//! rectangles and monitors.

pub mod slave;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use self::slave::{SlaveLayout, SlaveMode};
use crate::constants::hdmi::{GAP_720, GAP_1080};
use crate::constants::placement::SNAP_OFFSET;
use crate::geometry::{Rect, Viewport};
use crate::monitor::MonitorRegistry;

// ============================================================================
// Types
// ============================================================================

/// Spatial relationship between the master and slave outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TilingMode {
    /// Two independent surfaces.
    #[default]
    Separate,
    /// Master on the left, slave on the right.
    MasterSlaveX,
    /// Slave on the left, master on the right.
    SlaveMasterX,
    /// Master on top, slave below.
    MasterSlaveY,
    /// Slave on top, master below.
    SlaveMasterY,
    /// 720p HDMI frame packing: both eyes in one 1280x1470 frame.
    HdmiPacked720,
    /// 1080p HDMI frame packing: both eyes in one 1920x2205 frame.
    HdmiPacked1080,
}

impl TilingMode {
    /// Returns true when master and slave share one surface.
    #[must_use]
    pub const fn is_tiled(self) -> bool { !matches!(self, Self::Separate) }

    /// Blanking gap between the eyes for frame-packed modes.
    #[must_use]
    pub const fn packing_gap(self) -> Option<i32> {
        match self {
            Self::HdmiPacked720 => Some(GAP_720),
            Self::HdmiPacked1080 => Some(GAP_1080),
            _ => None,
        }
    }
}

/// Output surface selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinId {
    Master,
    Slave,
    /// Union of master and slave.
    All,
}

/// How the fullscreen layout is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SplitMode {
    /// Detect adjacency between master and slave monitors.
    #[default]
    Auto,
    /// Never tile.
    Separate,
    /// HDMI 720p frame packing.
    Hdmi720,
    /// HDMI 1080p frame packing.
    Hdmi1080,
}

impl SplitMode {
    /// Forced tiling mode, if this split mode does not rely on detection.
    #[must_use]
    pub const fn forced_mode(self) -> Option<TilingMode> {
        match self {
            Self::Auto => None,
            Self::Separate => Some(TilingMode::Separate),
            Self::Hdmi720 => Some(TilingMode::HdmiPacked720),
            Self::Hdmi1080 => Some(TilingMode::HdmiPacked1080),
        }
    }
}

// ============================================================================
// Viewports
// ============================================================================

/// Pixel box for `win` inside the drawable of a window sized like `rect`.
///
/// For side-by-side and stacked modes `rect` is the size of one eye and the
/// drawable spans both. For frame-packed modes `rect` is the whole packed
/// frame. Boxes use the GL convention (origin bottom-left), so "on top"
/// means a larger `y`.
#[must_use]
pub fn viewport(mode: TilingMode, rect: &Rect, win: WinId) -> Viewport {
    let width = rect.width();
    let height = rect.height();

    if let Some(gap) = mode.packing_gap() {
        let eye = ((height - gap) / 2).max(0);
        return match win {
            WinId::Master => Viewport::new(0, eye + gap, width, eye),
            WinId::Slave => Viewport::new(0, 0, width, eye),
            WinId::All => Viewport::new(0, 0, width, height),
        };
    }

    let base = Viewport::new(0, 0, width, height);
    match (mode, win) {
        (TilingMode::MasterSlaveX, WinId::Slave) | (TilingMode::SlaveMasterX, WinId::Master) => {
            Viewport::new(width, 0, width, height)
        }
        (TilingMode::MasterSlaveY, WinId::Master) | (TilingMode::SlaveMasterY, WinId::Slave) => {
            Viewport::new(0, height, width, height)
        }
        (TilingMode::MasterSlaveX | TilingMode::SlaveMasterX, WinId::All) => {
            Viewport::new(0, 0, width * 2, height)
        }
        (TilingMode::MasterSlaveY | TilingMode::SlaveMasterY, WinId::All) => {
            Viewport::new(0, 0, width, height * 2)
        }
        _ => base,
    }
}

/// Expands a per-eye rectangle to the OS window covering both tiles.
#[must_use]
pub const fn tiled_window_rect(mode: TilingMode, rect: Rect) -> Rect {
    let mut out = rect;
    match mode {
        TilingMode::MasterSlaveX => out.right += rect.width(),
        TilingMode::SlaveMasterX => out.left -= rect.width(),
        TilingMode::MasterSlaveY => out.bottom += rect.height(),
        TilingMode::SlaveMasterY => out.top -= rect.height(),
        TilingMode::Separate | TilingMode::HdmiPacked720 | TilingMode::HdmiPacked1080 => {}
    }
    out
}

// ============================================================================
// Detection and placement
// ============================================================================

/// Chooses a tiling mode from the fullscreen master rectangle and the slave
/// rectangle.
///
/// Only exact edge contact with aligned origins counts; anything else is
/// [`TilingMode::Separate`].
#[must_use]
pub const fn detect_tiling(master: &Rect, slave: &Rect) -> TilingMode {
    if master.top == slave.top {
        if master.right == slave.left {
            return TilingMode::MasterSlaveX;
        }
        if master.left == slave.right {
            return TilingMode::SlaveMasterX;
        }
    } else if master.left == slave.left {
        if master.bottom == slave.top {
            return TilingMode::MasterSlaveY;
        }
        if master.top == slave.bottom {
            return TilingMode::SlaveMasterY;
        }
    }
    TilingMode::Separate
}

/// Keeps a window reachable after the monitor it was on disappeared.
///
/// When the center of `rect` is outside every monitor, the window is moved
/// to `(+256, +256)` inside the nearest monitor, keeping its size unless it
/// does not fit.
#[must_use]
pub fn snap_into_monitors(rect: Rect, monitors: &MonitorRegistry) -> Rect {
    let center = rect.center();
    if monitors.contains(center) {
        return rect;
    }

    let area = monitors.monitor_at(center).rect;
    let width = rect.width().min(area.width());
    let height = rect.height().min(area.height());
    let left = (area.left + SNAP_OFFSET).min(area.right - width).max(area.left);
    let top = (area.top + SNAP_OFFSET).min(area.bottom - height).max(area.top);

    tracing::debug!(from = %rect, monitor = %area, "window center off-screen, snapping onto monitor");
    Rect::from_origin_size(left, top, width, height)
}

/// Rounds width and height down to even values.
#[must_use]
pub const fn align_even(rect: Rect) -> Rect {
    Rect::from_origin_size(rect.left, rect.top, rect.width() & !1, rect.height() & !1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Monitor;

    const SIDE_MODES: [TilingMode; 4] = [
        TilingMode::MasterSlaveX,
        TilingMode::SlaveMasterX,
        TilingMode::MasterSlaveY,
        TilingMode::SlaveMasterY,
    ];

    #[test]
    fn test_master_and_slave_tile_all() {
        let rect = Rect::from_origin_size(0, 0, 1920, 1080);
        for mode in SIDE_MODES {
            let master = viewport(mode, &rect, WinId::Master);
            let slave = viewport(mode, &rect, WinId::Slave);
            let all = viewport(mode, &rect, WinId::All);

            assert!(!master.overlaps(&slave), "{mode:?}");
            assert_eq!(master.union(&slave), all, "{mode:?}");
            assert_eq!(master.area() + slave.area(), all.area(), "{mode:?}");
        }
    }

    #[test]
    fn test_slave_offset_for_side_by_side() {
        let rect = Rect::from_origin_size(100, 100, 800, 600);
        assert_eq!(viewport(TilingMode::MasterSlaveX, &rect, WinId::Slave), Viewport::new(800, 0, 800, 600));
        assert_eq!(viewport(TilingMode::MasterSlaveX, &rect, WinId::Master), Viewport::new(0, 0, 800, 600));
        assert_eq!(viewport(TilingMode::MasterSlaveY, &rect, WinId::Master), Viewport::new(0, 600, 800, 600));
    }

    #[test]
    fn test_separate_viewports_are_identical() {
        let rect = Rect::from_origin_size(0, 0, 640, 480);
        let master = viewport(TilingMode::Separate, &rect, WinId::Master);
        assert_eq!(master, viewport(TilingMode::Separate, &rect, WinId::Slave));
        assert_eq!(master, viewport(TilingMode::Separate, &rect, WinId::All));
    }

    #[test]
    fn test_hdmi_packing_splits_with_gap() {
        let rect = Rect::from_origin_size(0, 0, 1920, 2205);
        let master = viewport(TilingMode::HdmiPacked1080, &rect, WinId::Master);
        let slave = viewport(TilingMode::HdmiPacked1080, &rect, WinId::Slave);
        assert_eq!(slave, Viewport::new(0, 0, 1920, 1080));
        assert_eq!(master, Viewport::new(0, 1125, 1920, 1080));
        assert!(!master.overlaps(&slave));

        let rect = Rect::from_origin_size(0, 0, 1280, 1470);
        assert_eq!(viewport(TilingMode::HdmiPacked720, &rect, WinId::Master).height, 720);
    }

    #[test]
    fn test_tiled_window_rect_inverts_viewport_split() {
        let rect = Rect::new(1920, 0, 3840, 1080);
        assert_eq!(tiled_window_rect(TilingMode::MasterSlaveX, rect), Rect::new(1920, 0, 5760, 1080));
        assert_eq!(tiled_window_rect(TilingMode::SlaveMasterX, rect), Rect::new(0, 0, 3840, 1080));
        assert_eq!(tiled_window_rect(TilingMode::MasterSlaveY, rect), Rect::new(1920, 0, 3840, 2160));
        assert_eq!(tiled_window_rect(TilingMode::SlaveMasterY, rect), Rect::new(1920, -1080, 3840, 1080));
        assert_eq!(tiled_window_rect(TilingMode::Separate, rect), rect);

        for mode in SIDE_MODES {
            let tiled = tiled_window_rect(mode, rect);
            let all = viewport(mode, &rect, WinId::All);
            assert_eq!((tiled.width(), tiled.height()), (all.width, all.height));
        }
    }

    #[test]
    fn test_detect_tiling_adjacency() {
        let master = Rect::new(0, 0, 1920, 1080);
        assert_eq!(detect_tiling(&master, &Rect::new(1920, 0, 3840, 1080)), TilingMode::MasterSlaveX);
        assert_eq!(detect_tiling(&master, &Rect::new(-1920, 0, 0, 1080)), TilingMode::SlaveMasterX);
        assert_eq!(detect_tiling(&master, &Rect::new(0, 1080, 1920, 2160)), TilingMode::MasterSlaveY);
        assert_eq!(detect_tiling(&master, &Rect::new(0, -1080, 1920, 0)), TilingMode::SlaveMasterY);
        assert_eq!(detect_tiling(&master, &Rect::new(1921, 0, 3841, 1080)), TilingMode::Separate);
        assert_eq!(detect_tiling(&master, &Rect::new(1920, 10, 3840, 1090)), TilingMode::Separate);
    }

    #[test]
    fn test_snap_into_single_monitor() {
        let monitors = MonitorRegistry::from_monitors(vec![Monitor::new(0, Rect::new(0, 0, 1920, 1080))]);
        let snapped = snap_into_monitors(Rect::new(-500, -500, -100, -100), &monitors);
        assert_eq!(snapped, Rect::new(256, 256, 656, 656));
    }

    #[test]
    fn test_snap_keeps_visible_windows() {
        let monitors = MonitorRegistry::from_monitors(vec![Monitor::new(0, Rect::new(0, 0, 1920, 1080))]);
        let rect = Rect::new(1700, 900, 2100, 1200);
        assert_eq!(snap_into_monitors(rect, &monitors), rect);
    }

    #[test]
    fn test_snap_picks_nearest_and_shrinks_oversized() {
        let monitors = MonitorRegistry::from_monitors(vec![
            Monitor::new(0, Rect::new(0, 0, 1920, 1080)),
            Monitor::new(1, Rect::new(1920, 0, 3200, 1024)),
        ]);
        let snapped = snap_into_monitors(Rect::from_origin_size(5000, 100, 2000, 400), &monitors);
        assert_eq!(snapped, Rect::new(1920, 256, 3200, 656));
    }

    #[test]
    fn test_split_mode_forcing() {
        assert_eq!(SplitMode::Auto.forced_mode(), None);
        assert_eq!(SplitMode::Hdmi720.forced_mode(), Some(TilingMode::HdmiPacked720));
        assert!(!TilingMode::Separate.is_tiled());
        assert!(TilingMode::SlaveMasterY.is_tiled());
    }

    #[test]
    fn test_align_even() {
        assert_eq!(align_even(Rect::from_origin_size(3, 5, 801, 599)), Rect::from_origin_size(3, 5, 800, 598));
    }
}
