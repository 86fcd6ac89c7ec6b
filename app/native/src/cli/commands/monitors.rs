//! Monitor listing command.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config;
use crate::error::{DuoviewError, DuoviewResult};
use crate::monitor::Monitor;

#[derive(Tabled)]
struct MonitorRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Resolution")]
    resolution: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Scale")]
    scale: String,
    #[tabled(rename = "Primary")]
    primary: String,
    #[tabled(rename = "GPU")]
    gpu: String,
}

impl MonitorRow {
    fn new(index: usize, monitor: &Monitor) -> Self {
        let rect = monitor.rect;
        Self {
            index,
            id: monitor.id,
            name: if monitor.name.is_empty() { "-".to_string() } else { monitor.name.clone() },
            resolution: format!("{}x{}", rect.width(), rect.height()),
            position: format!("{}, {}", rect.left, rect.top),
            scale: format!("{}x", monitor.effective_scale()),
            primary: output::format_bool(monitor.is_primary),
            gpu: if monitor.gpu_name.is_empty() { "-".to_string() } else { monitor.gpu_name.clone() },
        }
    }
}

/// Renders the monitor table.
fn render_table(monitors: &[Monitor]) -> String {
    let rows: Vec<MonitorRow> =
        monitors.iter().enumerate().map(|(index, monitor)| MonitorRow::new(index, monitor)).collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..2)).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..6)).with(Alignment::right()))
        .with(Modify::new(Columns::new(6..7)).with(Alignment::center()))
        .to_string()
}

/// Prints the monitors seen by the configured registry.
///
/// # Errors
///
/// Returns an error when the monitor settings file cannot be read.
pub fn execute(json: bool) -> DuoviewResult<()> {
    let registry = config::get_config().monitors.registry()?;

    if json {
        let value = serde_json::to_value(registry.as_slice())
            .map_err(|e| DuoviewError::CommandError(format!("Failed to serialize monitors: {e}")))?;
        output::print_highlighted_json(&value);
        return Ok(());
    }

    let count = registry.len();
    println!("{}", format!("Monitors ({count})").bold());
    println!("{}", render_table(registry.as_slice()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_row_formats_geometry() {
        let monitor = Monitor::new(7, Rect::new(1920, 0, 3840, 1080)).with_scale(1.5).with_name("Right");
        let row = MonitorRow::new(1, &monitor);

        assert_eq!(row.resolution, "1920x1080");
        assert_eq!(row.position, "1920, 0");
        assert_eq!(row.scale, "1.5x");
        assert_eq!(row.name, "Right");
        assert_eq!(row.gpu, "-");
    }

    #[test]
    fn test_table_lists_every_monitor() {
        let monitors = vec![
            Monitor::new(1, Rect::new(0, 0, 1920, 1080)).with_name("Left"),
            Monitor::new(2, Rect::new(1920, 0, 3840, 1080)).with_name("Right"),
        ];
        let table = render_table(&monitors);

        assert!(table.contains("Left"));
        assert!(table.contains("Right"));
        assert!(table.contains("Resolution"));
    }
}
