//! CLI output formatting.
//!
//! Highlighted JSON for `--json` output and the check marks used in tables.

use std::fmt::Write;

use colored::Colorize;
use serde_json::Value;

const INDENT: &str = "  ";

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
pub fn print_highlighted_json(value: &Value) {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    println!("{out}");
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&quoted(s).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str(&"[]".white().bold().to_string()),
        Value::Object(map) if map.is_empty() => out.push_str(&"{}".white().bold().to_string()),
        Value::Array(items) => {
            out.push_str(&"[".white().bold().to_string());
            for (i, item) in items.iter().enumerate() {
                separator(out, i, depth + 1);
                write_value(out, item, depth + 1);
            }
            closing(out, "]", depth);
        }
        Value::Object(map) => {
            out.push_str(&"{".white().bold().to_string());
            for (i, (key, item)) in map.iter().enumerate() {
                separator(out, i, depth + 1);
                let _ = write!(out, "{}{} ", quoted(key).cyan(), ":".white());
                write_value(out, item, depth + 1);
            }
            closing(out, "}", depth);
        }
    }
}

fn separator(out: &mut String, index: usize, depth: usize) {
    if index > 0 {
        out.push_str(&",".white().to_string());
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn closing(out: &mut String, bracket: &str, depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&bracket.white().bold().to_string());
}

fn quoted(s: &str) -> String { serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\"")) }

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(value: &Value) -> String {
        colored::control::set_override(false);
        let mut out = String::new();
        write_value(&mut out, value, 0);
        out
    }

    #[test]
    fn test_render_matches_pretty_json_layout() {
        let value = json!({ "id": 1, "name": "Left \"A\"", "primary": true, "gpu": null, "tags": [] });
        assert_eq!(render(&value), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_render_nested_arrays() {
        let value = json!([{ "rect": { "left": 0, "right": 1920 } }, [1.5, false]]);
        assert_eq!(render(&value), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_format_bool_true() {
        let result = format_bool(true);
        assert!(result.contains('✓'));
    }

    #[test]
    fn test_format_bool_false() {
        let result = format_bool(false);
        assert!(result.contains('✗'));
    }
}
