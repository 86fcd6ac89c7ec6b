//! Placement of the slave surface.
//!
//! The slave is either a thin strip used by shutter-glasses sync codes or an
//! independent window following the master onto another monitor. Offsets of
//! an independent slave are taken relative to the monitor under the master,
//! optionally mirrored, and scaled when the two monitors differ in density.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::placement::{SLAVE_LINE_TOP_HEIGHT, SLAVE_TOP_2PX_WIDTH};
use crate::geometry::Rect;
use crate::monitor::{Monitor, MonitorRegistry};

/// Slave window configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SlaveMode {
    /// No slave surface.
    #[default]
    Off,
    /// 10 px strip along the top of the master monitor.
    HLineTop,
    /// 2x1 px marker in the top-left corner of the master monitor.
    HTop2Px,
    /// 1 px line along the bottom of the master monitor.
    HLineBottom,
    /// Full window on the slave monitor.
    Independent,
    /// Independent, mirrored horizontally.
    IndependentMirrorX,
    /// Independent, mirrored vertically.
    IndependentMirrorY,
}

impl SlaveMode {
    /// Returns true when a slave surface exists.
    #[must_use]
    pub const fn is_enabled(self) -> bool { !matches!(self, Self::Off) }

    /// Returns true when the slave lives on its own monitor.
    #[must_use]
    pub const fn is_independent(self) -> bool {
        matches!(self, Self::Independent | Self::IndependentMirrorX | Self::IndependentMirrorY)
    }

    const fn mirrors_x(self) -> bool { matches!(self, Self::IndependentMirrorX) }

    const fn mirrors_y(self) -> bool { matches!(self, Self::IndependentMirrorY) }
}

/// Inputs needed to place the slave.
#[derive(Debug, Clone, Copy)]
pub struct SlaveLayout<'a> {
    pub mode: SlaveMode,
    /// Windowed rectangle of the master.
    pub rect_norm: Rect,
    /// Current rectangle of the master (fullscreen or windowed).
    pub rect_current: Rect,
    pub fullscreen: bool,
    /// Registry index of the monitor hosting an independent slave.
    pub slave_monitor: usize,
    pub monitors: &'a MonitorRegistry,
}

impl SlaveLayout<'_> {
    fn master_monitor(&self) -> &Monitor { self.monitors.monitor_at(self.rect_current.center()) }

    fn slave_monitor(&self) -> &Monitor { self.monitors.get(self.slave_monitor) }

    fn scale_ratio(&self) -> f64 {
        self.slave_monitor().effective_scale() / self.master_monitor().effective_scale()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn scaled(&self, value: i32) -> i32 { (f64::from(value) * self.scale_ratio()).round() as i32 }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> i32 {
        if !self.mode.is_independent() {
            return self.master_monitor().rect.left;
        }
        let slave = self.slave_monitor().rect;
        if self.fullscreen {
            return slave.left;
        }
        let master = self.master_monitor().rect;
        if self.mode.mirrors_x() {
            slave.right - self.scaled(self.rect_norm.right - master.left)
        } else {
            slave.left + self.scaled(self.rect_norm.left - master.left)
        }
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> i32 {
        match self.mode {
            SlaveMode::HLineBottom => return self.master_monitor().rect.bottom - 1,
            SlaveMode::HLineTop | SlaveMode::HTop2Px | SlaveMode::Off => {
                return self.master_monitor().rect.top;
            }
            _ => {}
        }
        let slave = self.slave_monitor().rect;
        if self.fullscreen {
            return slave.top;
        }
        let master = self.master_monitor().rect;
        if self.mode.mirrors_y() {
            slave.bottom - self.scaled(self.rect_norm.bottom - master.top)
        } else {
            slave.top + self.scaled(self.rect_norm.top - master.top)
        }
    }

    /// Width.
    #[must_use]
    pub fn width(&self) -> i32 {
        match self.mode {
            SlaveMode::HTop2Px => SLAVE_TOP_2PX_WIDTH,
            SlaveMode::HLineTop | SlaveMode::HLineBottom | SlaveMode::Off => self.master_monitor().rect.width(),
            _ if self.fullscreen => self.slave_monitor().rect.width(),
            _ => self.scaled(self.rect_norm.width()),
        }
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> i32 {
        match self.mode {
            SlaveMode::HLineBottom | SlaveMode::HTop2Px => 1,
            SlaveMode::HLineTop => SLAVE_LINE_TOP_HEIGHT,
            SlaveMode::Off => self.master_monitor().rect.height(),
            _ if self.fullscreen => self.slave_monitor().rect.height(),
            _ => self.scaled(self.rect_norm.height()),
        }
    }

    /// Slave rectangle, or `None` when the slave is disabled.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.mode
            .is_enabled()
            .then(|| Rect::from_origin_size(self.left(), self.top(), self.width(), self.height()))
    }
}
