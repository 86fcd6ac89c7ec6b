//! Viewport calculator command.
//!
//! Prints the GL viewport of each output for a tiling mode and an eye size,
//! which is what a renderer passes to `glViewport` before drawing each eye.

use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types::CliTilingMode;
use crate::cli::output;
use crate::error::{DuoviewError, DuoviewResult};
use crate::geometry::{Rect, Viewport};
use crate::tiling::{self, TilingMode, WinId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewportReport {
    mode: TilingMode,
    window: Rect,
    master: Viewport,
    slave: Viewport,
    all: Viewport,
}

impl ViewportReport {
    fn new(mode: TilingMode, width: i32, height: i32) -> Self {
        let rect = Rect::from_origin_size(0, 0, width, height);
        Self {
            mode,
            window: tiling::tiled_window_rect(mode, rect),
            master: tiling::viewport(mode, &rect, WinId::Master),
            slave: tiling::viewport(mode, &rect, WinId::Slave),
            all: tiling::viewport(mode, &rect, WinId::All),
        }
    }
}

#[derive(Tabled)]
struct ViewportRow {
    #[tabled(rename = "Output")]
    output: &'static str,
    #[tabled(rename = "X")]
    x: i32,
    #[tabled(rename = "Y")]
    y: i32,
    #[tabled(rename = "Width")]
    width: i32,
    #[tabled(rename = "Height")]
    height: i32,
}

impl ViewportRow {
    const fn new(output: &'static str, viewport: Viewport) -> Self {
        Self {
            output,
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
        }
    }
}

/// Prints the viewports of `mode` for a `width` by `height` eye.
///
/// # Errors
///
/// Returns an error when the size is not positive.
pub fn execute(mode: CliTilingMode, width: i32, height: i32, json: bool) -> DuoviewResult<()> {
    if width <= 0 || height <= 0 {
        return Err(DuoviewError::InvalidArguments(format!(
            "Viewport size must be positive, got {width}x{height}"
        )));
    }

    let report = ViewportReport::new(mode.into(), width, height);

    if json {
        let value = serde_json::to_value(&report)
            .map_err(|e| DuoviewError::CommandError(format!("Failed to serialize viewports: {e}")))?;
        output::print_highlighted_json(&value);
        return Ok(());
    }

    let rows = vec![
        ViewportRow::new("master", report.master),
        ViewportRow::new("slave", report.slave),
        ViewportRow::new("all", report.all),
    ];
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..5)).with(Alignment::right()))
        .to_string();

    println!(
        "{} {}",
        format!("{:?}", report.mode).bold(),
        format!("(window {}x{})", report.window.width(), report.window.height()).dimmed()
    );
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_side_by_side() {
        let report = ViewportReport::new(TilingMode::MasterSlaveX, 1920, 1080);

        assert_eq!(report.window.width(), 3840);
        assert_eq!(report.master, Viewport::new(0, 0, 1920, 1080));
        assert_eq!(report.slave, Viewport::new(1920, 0, 1920, 1080));
        assert_eq!(report.all, Viewport::new(0, 0, 3840, 1080));
    }

    #[test]
    fn test_report_frame_packed() {
        let report = ViewportReport::new(TilingMode::HdmiPacked720, 1280, 1470);

        assert_eq!(report.window, Rect::from_origin_size(0, 0, 1280, 1470));
        assert_eq!(report.master, Viewport::new(0, 750, 1280, 720));
        assert_eq!(report.slave, Viewport::new(0, 0, 1280, 720));
    }

    #[test]
    fn test_rejects_empty_size() {
        let err = execute(CliTilingMode::Separate, 0, 100, false).unwrap_err();
        assert!(matches!(err, DuoviewError::InvalidArguments(_)));
    }
}
