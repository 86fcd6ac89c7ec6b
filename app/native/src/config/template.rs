//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Duoview Configuration File
// ==========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Window
  // ============================================================================
  // "window": {
  //   // Request a quad-buffered stereo GL context
  //   "glQuadStereo": false,
  //
  //   // Depth and stencil buffer sizes in bits
  //   "glDepthSize": 24,
  //   "glStencilSize": 0,
  //
  //   // Keep the system or the display awake while the window is visible
  //   "blockSleepSystem": false,
  //   "blockSleepDisplay": false,
  //
  //   // Slave surface: "off", "hLineTop", "hTop2Px", "hLineBottom",
  //   // "independent", "independentMirrorX" or "independentMirrorY"
  //   "slave": "off",
  //
  //   // Monitor index used by an independent slave
  //   "slaveMonitor": 1,
  //
  //   // Fullscreen tiling: "auto", "separate", "hdmi720" or "hdmi1080"
  //   "splitMode": "auto",
  //
  //   // Round window sizes down to even pixel counts
  //   "evenPixels": false,
  //
  //   // Events buffered between two processing passes
  //   "queueCapacity": 2048
  // },

  // ============================================================================
  // Touch Gestures
  // ============================================================================
  // Distances are in device-independent pixels, angles in degrees.
  // "gestures": {
  //   "rotateDeg": { "fromIdle": 2.0, "update": 2.0, "breakOther": 20.0 },
  //   "pinchDip": { "fromIdle": 6.0, "update": 1.0, "breakOther": 20.0 },
  //   "panDip": { "fromIdle": 4.0, "update": 1.0, "breakOther": 20.0 },
  //   "rotateMinSeparationDip": 50.0,
  //   "tapRadiusDip": 20.0,
  //   "doubleTapWindowSecs": 0.5,
  //   "tapMaxDurationSecs": 0.5,
  //   "swipeDistanceDip": 150.0,
  //   "swipeToleranceDip": 50.0
  // },

  // ============================================================================
  // Monitors
  // ============================================================================
  // "monitors": {
  //   // Fixed layout instead of system enumeration
  //   "layout": [
  //     { "id": 0, "rect": { "left": 0, "top": 0, "right": 1920, "bottom": 1080 }, "isPrimary": true }
  //   ],
  //
  //   // Desktop size split into two heads for known dual-head extents
  //   "desktopExtent": [3840, 1080],
  //
  //   // File with saved overrides ("monitors.0.rect", "monitors.1.rect")
  //   "settingsPath": "~/.config/duoview/monitors.json"
  // }
}
"#
    .to_string()
}

/// Writes the template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_config_template())
}
