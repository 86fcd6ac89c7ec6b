//! Monitor registry.
//!
//! The registry caches the monitor layout reported by a [`MonitorSource`]
//! and answers point queries for placement, fullscreen and activity
//! decisions. It is process scoped: windows share one registry through
//! [`DisplayContext`](crate::window::DisplayContext) and it only changes
//! when [`MonitorRegistry::refresh`] is called.
//!
//! # Ordering
//!
//! After every refresh index 0 is the primary monitor. Monitors attached to
//! the same GPU as the primary follow it, then the rest, each group keeping
//! system order.
//!
//! # Fallback
//!
//! Enumeration failures never leave the registry empty. When the source
//! errors or reports nothing usable, the layout is derived from the desktop
//! extent (see [`source::blind_layout`]) or, lacking that, a single 800x800
//! synthetic monitor.

pub mod settings;
pub mod source;

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use self::settings::{JsonFileSettings, MemorySettings, SettingsStore};
pub use self::source::{BlindMonitorSource, MonitorSource, StaticMonitorSource};
use crate::constants::monitor::{FALLBACK_SIZE, OVERRIDE_SLOTS};
use crate::geometry::{PointI, Rect};

// ============================================================================
// Monitor
// ============================================================================

/// Display rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    LandscapeFlipped,
    PortraitFlipped,
}

/// A physical display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// System identifier.
    pub id: i32,
    /// `PnP` / EDID identity string.
    #[serde(default)]
    pub pnp_id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Name of the GPU driving the monitor.
    #[serde(default)]
    pub gpu_name: String,
    /// Virtual rectangle in desktop coordinates.
    pub rect: Rect,
    /// Scale factor (1.0 for standard density).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Current refresh rate in Hz.
    #[serde(default)]
    pub freq: i32,
    /// Maximum refresh rate in Hz.
    #[serde(default)]
    pub freq_max: i32,
    #[serde(default)]
    pub orientation: Orientation,
    /// Whether the system flags this monitor as primary.
    #[serde(default)]
    pub is_primary: bool,
}

const fn default_scale() -> f64 { 1.0 }

impl Monitor {
    /// Creates a monitor with default attributes.
    #[must_use]
    pub const fn new(id: i32, rect: Rect) -> Self {
        Self {
            id,
            pnp_id: String::new(),
            name: String::new(),
            gpu_name: String::new(),
            rect,
            scale: 1.0,
            freq: 0,
            freq_max: 0,
            orientation: Orientation::Landscape,
            is_primary: false,
        }
    }

    /// Sets the primary flag.
    #[must_use]
    pub const fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    /// Sets the scale factor.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the GPU name.
    #[must_use]
    pub fn with_gpu(mut self, gpu_name: impl Into<String>) -> Self {
        self.gpu_name = gpu_name.into();
        self
    }

    /// A monitor needs more than one pixel in each direction to be usable.
    #[must_use]
    pub const fn is_valid(&self) -> bool { self.rect.width() > 1 && self.rect.height() > 1 }

    /// Scale factor, treating nonsense values as 1.0.
    #[must_use]
    pub fn effective_scale(&self) -> f64 { if self.scale > 0.0 { self.scale } else { 1.0 } }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Monitor #{} {}", self.id, self.rect)?;
        if !self.name.is_empty() {
            write!(f, " '{}'", self.name)?;
        }
        if !self.pnp_id.is_empty() {
            write!(f, " [{}]", self.pnp_id)?;
        }
        write!(f, " scale {:.2}", self.scale)?;
        if self.freq > 0 {
            write!(f, " {}/{} Hz", self.freq, self.freq_max.max(self.freq))?;
        }
        if !self.gpu_name.is_empty() {
            write!(f, " on {}", self.gpu_name)?;
        }
        Ok(())
    }
}

// ============================================================================
// MonitorRegistry
// ============================================================================

/// Ordered monitor cache. Never empty.
#[derive(Debug)]
pub struct MonitorRegistry {
    source: Box<dyn MonitorSource>,
    settings: Option<Arc<dyn SettingsStore>>,
    monitors: Vec<Monitor>,
}

impl MonitorRegistry {
    /// Creates a registry and performs the first refresh.
    #[must_use]
    pub fn new(source: impl MonitorSource + 'static) -> Self {
        let mut registry = Self {
            source: Box::new(source),
            settings: None,
            monitors: Vec::new(),
        };
        registry.refresh();
        registry
    }

    /// Creates a registry over a fixed list.
    #[must_use]
    pub fn from_monitors(monitors: Vec<Monitor>) -> Self { Self::new(StaticMonitorSource::new(monitors)) }

    /// Attaches a settings store for overrides and refreshes.
    #[must_use]
    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self.refresh();
        self
    }

    /// Settings store, if any.
    #[must_use]
    pub fn settings(&self) -> Option<&Arc<dyn SettingsStore>> { self.settings.as_ref() }

    /// Re-enumerates monitors. Returns true when the layout changed.
    pub fn refresh(&mut self) -> bool {
        let mut monitors = match self.source.enumerate() {
            Ok(mut list) => {
                list.retain(Monitor::is_valid);
                if list.is_empty() {
                    tracing::warn!(source = self.source.name(), "no usable monitor reported, using fallback");
                    self.fallback()
                } else {
                    list
                }
            }
            Err(err) => {
                tracing::warn!(source = self.source.name(), error = %err, "monitor enumeration failed, using fallback");
                self.fallback()
            }
        };

        order_monitors(&mut monitors);
        if let Some(settings) = &self.settings {
            monitors = apply_overrides(settings.as_ref(), monitors);
        }

        let changed = monitors != self.monitors;
        if changed {
            tracing::info!(count = monitors.len(), source = self.source.name(), "monitor layout updated");
            for monitor in &monitors {
                tracing::debug!(%monitor, "monitor");
            }
        }
        self.monitors = monitors;
        changed
    }

    fn fallback(&self) -> Vec<Monitor> {
        let (width, height) = self
            .source
            .desktop_extent()
            .filter(|&(w, h)| w > 1 && h > 1)
            .unwrap_or(FALLBACK_SIZE);
        source::blind_layout(width, height)
    }

    /// Number of monitors (at least one).
    #[must_use]
    pub fn len(&self) -> usize { self.monitors.len() }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.monitors.is_empty() }

    /// Monitors in registry order.
    #[must_use]
    pub fn as_slice(&self) -> &[Monitor] { &self.monitors }

    /// Iterates monitors in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Monitor> { self.monitors.iter() }

    /// Monitor at `index`, or the primary monitor when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &Monitor {
        let index = if index < self.monitors.len() { index } else { 0 };
        &self.monitors[index]
    }

    /// Primary monitor.
    #[must_use]
    pub fn primary(&self) -> &Monitor { self.get(0) }

    /// Looks up a monitor by system id.
    #[must_use]
    pub fn by_id(&self, id: i32) -> Option<&Monitor> { self.monitors.iter().find(|m| m.id == id) }

    /// Index of the monitor containing `point`, else of the nearest one.
    #[must_use]
    pub fn index_at(&self, point: PointI) -> usize { index_at(&self.monitors, point) }

    /// Monitor containing `point`, else the nearest one.
    #[must_use]
    pub fn monitor_at(&self, point: PointI) -> &Monitor { self.get(self.index_at(point)) }

    /// Returns true when `point` lies on some monitor.
    #[must_use]
    pub fn contains(&self, point: PointI) -> bool { self.monitors.iter().any(|m| m.rect.contains(point)) }
}

// ============================================================================
// Helpers
// ============================================================================

/// Promotes the primary monitor to the front and groups by its GPU.
fn order_monitors(monitors: &mut Vec<Monitor>) {
    if let Some(pos) = monitors.iter().position(|m| m.is_primary)
        && pos > 0
    {
        let primary = monitors.remove(pos);
        monitors.insert(0, primary);
    }

    let Some(gpu) = monitors.first().map(|m| m.gpu_name.clone()) else {
        return;
    };
    if gpu.is_empty() {
        return;
    }
    let (same, other): (Vec<_>, Vec<_>) = monitors.drain(1..).partition(|m| m.gpu_name == gpu);
    monitors.extend(same);
    monitors.extend(other);
}

/// Replaces the enumerated layout with saved rectangles.
///
/// Slot `i` reads `monitors.<i>.rect`. When a `PnP` id was saved alongside
/// it, the slot only applies if a monitor with that identity is connected.
/// Slots are read in order and reading stops at the first missing one.
fn apply_overrides(store: &dyn SettingsStore, system: Vec<Monitor>) -> Vec<Monitor> {
    let mut overridden = Vec::new();
    for slot in 0..OVERRIDE_SLOTS {
        let Some(rect) = settings::load_rect(store, &settings::rect_key(slot)) else {
            break;
        };
        if rect.width() <= 1 || rect.height() <= 1 {
            tracing::warn!(slot, %rect, "ignoring degenerate monitor override");
            break;
        }

        let saved_pnp = store
            .load(&settings::pnp_key(slot))
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty());
        let base = match &saved_pnp {
            Some(pnp) => match system.iter().find(|m| &m.pnp_id == pnp) {
                Some(monitor) => monitor,
                None => {
                    tracing::debug!(slot, pnp, "saved monitor is not connected, skipping override");
                    break;
                }
            },
            None => match system.get(index_at(&system, rect.center())) {
                Some(monitor) => monitor,
                None => break,
            },
        };

        let mut monitor = base.clone();
        monitor.rect = rect;
        monitor.id = i32::try_from(slot).unwrap_or_default();
        if let Some(scale) = store.load(&settings::scale_key(slot)).and_then(|v| v.as_f64())
            && scale > 0.0
        {
            monitor.scale = scale;
        }
        overridden.push(monitor);
    }

    if overridden.is_empty() {
        system
    } else {
        tracing::info!(count = overridden.len(), "using monitor overrides from settings");
        overridden
    }
}

/// Index of the monitor containing `point`, else of the nearest one, else 0.
fn index_at(monitors: &[Monitor], point: PointI) -> usize {
    monitors
        .iter()
        .position(|m| m.rect.contains(point))
        .or_else(|| {
            monitors
                .iter()
                .enumerate()
                .min_by_key(|(_, m)| m.rect.distance_sq_to(point))
                .map(|(index, _)| index)
        })
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DuoviewError, DuoviewResult};

    #[derive(Debug)]
    struct FailingSource;

    impl MonitorSource for FailingSource {
        fn name(&self) -> &'static str { "failing" }

        fn enumerate(&self) -> DuoviewResult<Vec<Monitor>> {
            Err(DuoviewError::monitor("display API unavailable"))
        }

        fn desktop_extent(&self) -> Option<(i32, i32)> { Some((3840, 1080)) }
    }

    fn two_monitors() -> Vec<Monitor> {
        vec![
            Monitor::new(0, Rect::new(0, 0, 1920, 1080)).with_primary(true).with_name("Left"),
            Monitor::new(1, Rect::new(1920, 0, 3840, 1080)).with_name("Right").with_scale(2.0),
        ]
    }

    #[test]
    fn test_primary_is_promoted() {
        let registry = MonitorRegistry::from_monitors(vec![
            Monitor::new(5, Rect::new(1920, 0, 3840, 1080)),
            Monitor::new(7, Rect::new(0, 0, 1920, 1080)).with_primary(true),
        ]);
        assert_eq!(registry.primary().id, 7);
        assert_eq!(registry.get(1).id, 5);
    }

    #[test]
    fn test_monitors_grouped_by_primary_gpu() {
        let registry = MonitorRegistry::from_monitors(vec![
            Monitor::new(0, Rect::new(0, 0, 100, 100)).with_gpu("B"),
            Monitor::new(1, Rect::new(100, 0, 200, 100)).with_gpu("A").with_primary(true),
            Monitor::new(2, Rect::new(200, 0, 300, 100)).with_gpu("B"),
            Monitor::new(3, Rect::new(300, 0, 400, 100)).with_gpu("A"),
        ]);
        let ids: Vec<_> = registry.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_enumeration_failure_uses_desktop_extent() {
        let registry = MonitorRegistry::new(FailingSource);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).rect, Rect::new(1920, 0, 3840, 1080));
    }

    #[test]
    fn test_empty_source_uses_synthetic_monitor() {
        let registry = MonitorRegistry::from_monitors(Vec::new());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.primary().rect, Rect::new(0, 0, 800, 800));
    }

    #[test]
    fn test_invalid_monitors_are_dropped() {
        let registry = MonitorRegistry::from_monitors(vec![
            Monitor::new(0, Rect::new(0, 0, 1, 1)),
            Monitor::new(1, Rect::new(0, 0, 1280, 1024)),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.primary().id, 1);
    }

    #[test]
    fn test_point_lookup_containing_and_nearest() {
        let registry = MonitorRegistry::from_monitors(two_monitors());
        assert_eq!(registry.monitor_at(PointI::new(100, 100)).id, 0);
        assert_eq!(registry.monitor_at(PointI::new(1920, 0)).id, 1);
        assert_eq!(registry.monitor_at(PointI::new(5000, 500)).id, 1);
        assert_eq!(registry.monitor_at(PointI::new(-400, -400)).id, 0);
        assert!(!registry.contains(PointI::new(-1, 0)));
    }

    #[test]
    fn test_get_out_of_range_returns_primary() {
        let registry = MonitorRegistry::from_monitors(two_monitors());
        assert_eq!(registry.get(9).id, 0);
        assert_eq!(registry.by_id(1).map(|m| m.name.as_str()), Some("Right"));
        assert!(registry.by_id(4).is_none());
    }

    #[test]
    fn test_refresh_reports_changes_only_once() {
        let mut registry = MonitorRegistry::from_monitors(two_monitors());
        assert!(!registry.refresh());
    }

    #[test]
    fn test_overrides_replace_layout() {
        let store = Arc::new(MemorySettings::new());
        settings::save_rect(store.as_ref(), &settings::rect_key(0), Rect::new(0, 0, 1280, 1024)).unwrap();
        settings::save_rect(store.as_ref(), &settings::rect_key(1), Rect::new(2000, 0, 3280, 1024)).unwrap();

        let registry = MonitorRegistry::from_monitors(two_monitors()).with_settings(store);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).rect, Rect::new(0, 0, 1280, 1024));
        assert_eq!(registry.get(0).name, "Left");
        // Slot 1 inherits the attributes of the monitor under its center
        assert_eq!(registry.get(1).name, "Right");
        assert_eq!(registry.get(1).id, 1);
        assert!((registry.get(1).scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_for_disconnected_monitor_is_skipped() {
        let store = Arc::new(MemorySettings::new());
        settings::save_rect(store.as_ref(), &settings::rect_key(0), Rect::new(0, 0, 1280, 1024)).unwrap();
        store.save(&settings::pnp_key(0), serde_json::json!("GONE0001")).unwrap();

        let registry = MonitorRegistry::from_monitors(two_monitors()).with_settings(store);
        assert_eq!(registry.get(0).rect, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn test_monitor_display_summary() {
        let mut monitor = Monitor::new(2, Rect::new(0, 0, 1920, 1080)).with_name("DELL U2412M");
        monitor.freq = 60;
        let text = monitor.to_string();
        assert!(text.contains("#2"));
        assert!(text.contains("1920x1080"));
        assert!(text.contains("DELL U2412M"));
        assert!(text.contains("60/60 Hz"));
    }
}
