//! Configuration types for Duoview.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::queue::DEFAULT_CAPACITY;
use crate::error::DuoviewResult;
use crate::gesture::GestureThresholds;
use crate::monitor::{
    BlindMonitorSource, JsonFileSettings, Monitor, MonitorRegistry, StaticMonitorSource,
};
use crate::platform::path::expand_and_resolve;
use crate::power::SleepPolicy;
use crate::tiling::{SlaveMode, SplitMode};

// ============================================================================
// Window
// ============================================================================

/// Per-window settings.
///
/// Every field can also be changed at runtime through
/// [`WinAttr`](super::WinAttr) values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowConfig {
    /// Request a quad-buffered stereo GL context.
    pub gl_quad_stereo: bool,

    /// Request a debug GL context.
    pub gl_debug: bool,

    /// Depth buffer size in bits.
    pub gl_depth_size: u8,

    /// Stencil buffer size in bits.
    pub gl_stencil_size: u8,

    /// Keep the system awake while the window is active.
    pub block_sleep_system: bool,

    /// Keep the display awake while the window is active.
    pub block_sleep_display: bool,

    /// Receive media keys even when the window is not focused.
    ///
    /// Passed to the backend in [`GlRequest`](crate::window::GlRequest) when
    /// the surface is created.
    pub global_media_keys: bool,

    /// Slave surface configuration.
    pub slave: SlaveMode,

    /// Registry index of the monitor used by an independent slave.
    pub slave_monitor: usize,

    /// How fullscreen tiling is chosen.
    pub split_mode: SplitMode,

    /// Round window sizes down to even pixel counts.
    pub even_pixels: bool,

    /// Ask the platform for exclusive fullscreen.
    pub exclusive_fullscreen: bool,

    /// Registry index of the monitor used for fullscreen.
    /// When unset, the monitor under the window center is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen_monitor: Option<usize>,

    /// Capacity of each side of the event buffer.
    pub queue_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            gl_quad_stereo: false,
            gl_debug: false,
            gl_depth_size: 24,
            gl_stencil_size: 0,
            block_sleep_system: false,
            block_sleep_display: false,
            global_media_keys: false,
            slave: SlaveMode::Off,
            slave_monitor: 1,
            split_mode: SplitMode::Auto,
            even_pixels: false,
            exclusive_fullscreen: false,
            fullscreen_monitor: None,
            queue_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl WindowConfig {
    /// Sleep blocking flags.
    #[must_use]
    pub const fn sleep_policy(&self) -> SleepPolicy {
        SleepPolicy {
            block_system: self.block_sleep_system,
            block_display: self.block_sleep_display,
        }
    }
}

// ============================================================================
// Monitors
// ============================================================================

/// Monitor layout settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Fixed monitor layout used instead of system enumeration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub layout: Vec<Monitor>,

    /// Desktop extent `[width, height]` split by blind detection when no
    /// layout is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop_extent: Option<[i32; 2]>,

    /// JSON file holding saved monitor overrides (`monitors.<index>.rect`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,
}

impl MonitorConfig {
    /// Builds a monitor registry for this configuration.
    ///
    /// A relative `settings_path` is resolved against the directory of the
    /// loaded configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings file exists but cannot be parsed.
    pub fn registry(&self) -> DuoviewResult<MonitorRegistry> {
        self.registry_in(super::get_config_path().and_then(|path| path.parent()))
    }

    /// Builds a monitor registry, resolving `settings_path` against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings file exists but cannot be parsed.
    pub fn registry_in(&self, base_dir: Option<&Path>) -> DuoviewResult<MonitorRegistry> {
        let registry = if !self.layout.is_empty() {
            MonitorRegistry::new(StaticMonitorSource::new(self.layout.clone()))
        } else if let Some([width, height]) = self.desktop_extent {
            MonitorRegistry::new(BlindMonitorSource::new(width, height))
        } else {
            MonitorRegistry::new(StaticMonitorSource::default())
        };

        match &self.settings_path {
            Some(path) => {
                let path = expand_and_resolve(path, base_dir);
                Ok(registry.with_settings(Arc::new(JsonFileSettings::open(&path)?)))
            }
            None => Ok(registry),
        }
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DuoviewConfig {
    /// Default window settings.
    pub window: WindowConfig,

    /// Touch gesture thresholds.
    pub gestures: GestureThresholds,

    /// Monitor layout.
    pub monitors: MonitorConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/duoview/config.jsonc or ~/.duoview.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".duoview.jsonc", ".duoview.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/duoview/config.jsonc` or `config.json`, when set
/// 2. `~/.config/duoview/config.jsonc` or `config.json`
/// 3. the platform config directory (`dirs::config_dir`)
/// 4. `~/.duoview.jsonc` or `~/.duoview.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_search.push(PathBuf::from(xdg_config).join("duoview"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_search.push(home.join(".config").join("duoview"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join("duoview"));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for dir in dirs_to_search {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Parses a JSONC document.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the text is not valid JSON once
/// comments are stripped.
pub fn parse_config(text: &str) -> Result<DuoviewConfig, ConfigError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` when the file does not exist, otherwise
/// I/O and parse errors.
pub fn load_config_from_path(path: &Path) -> Result<(DuoviewConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: DuoviewConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, otherwise I/O and parse errors of the first file
/// found.
pub fn load_config() -> Result<(DuoviewConfig, PathBuf), ConfigError> {
    config_paths()
        .iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, DuoviewConfig::default());
        assert_eq!(config.window.queue_capacity, 2048);
        assert_eq!(config.window.slave_monitor, 1);
    }

    #[test]
    fn test_parse_window_section_with_comments() {
        let config = parse_config(
            r#"{
                // sync strip for shutter glasses
                "window": { "slave": "hLineTop", "blockSleepDisplay": true, "splitMode": "hdmi1080" },
                /* faster taps */
                "gestures": { "doubleTapWindowSecs": 0.3 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.slave, SlaveMode::HLineTop);
        assert_eq!(config.window.split_mode, SplitMode::Hdmi1080);
        assert!(config.window.sleep_policy().block_display);
        assert!(!config.window.sleep_policy().block_system);
        assert!((config.gestures.double_tap_window_secs - 0.3).abs() < f64::EPSILON);
        assert!((config.gestures.tap_radius_dip - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(parse_config("{ window: }"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, r#"{ "window": { "evenPixels": true } }"#).unwrap();

        let (config, loaded_from) = load_config_from_path(&path).unwrap();
        assert!(config.window.even_pixels);
        assert_eq!(loaded_from, path);

        assert!(matches!(
            load_config_from_path(&dir.path().join("missing.json")),
            Err(ConfigError::NotFound)
        ));
    }

    #[test]
    fn test_monitor_layout_builds_registry() {
        let config = parse_config(
            r#"{ "monitors": { "layout": [
                { "id": 3, "rect": { "left": 0, "top": 0, "right": 1280, "bottom": 1024 } },
                { "id": 4, "rect": { "left": 1280, "top": 0, "right": 2560, "bottom": 1024 }, "isPrimary": true }
            ] } }"#,
        )
        .unwrap();

        let registry = config.monitors.registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.primary().id, 4);
        assert_eq!(registry.primary().rect, Rect::new(1280, 0, 2560, 1024));
    }

    #[test]
    fn test_desktop_extent_uses_blind_detection() {
        let config = MonitorConfig { desktop_extent: Some([3840, 1080]), ..MonitorConfig::default() };
        assert_eq!(config.registry().unwrap().len(), 2);
    }

    #[test]
    fn test_settings_path_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitors.json");
        fs::write(&path, r#"{ "monitors.0.rect": { "left": 0, "top": 0, "right": 1024, "bottom": 768 } }"#)
            .unwrap();

        let config = MonitorConfig {
            desktop_extent: Some([1920, 1080]),
            settings_path: Some(path),
            ..MonitorConfig::default()
        };
        assert_eq!(config.registry().unwrap().primary().rect, Rect::new(0, 0, 1024, 768));
    }

    #[test]
    fn test_relative_settings_path_resolves_against_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("monitors.json"),
            r#"{ "monitors.0.rect": { "left": 0, "top": 0, "right": 800, "bottom": 600 } }"#,
        )
        .unwrap();

        let config = MonitorConfig {
            desktop_extent: Some([1920, 1080]),
            settings_path: Some(PathBuf::from("monitors.json")),
            ..MonitorConfig::default()
        };
        let registry = config.registry_in(Some(dir.path())).unwrap();
        assert_eq!(registry.primary().rect, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_config_error_message() {
        assert!(ConfigError::NotFound.to_string().contains("No configuration file found"));
    }
}
