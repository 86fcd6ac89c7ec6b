//! `duoview config` subcommands.
//!
//! Writing the commented template, listing the search paths, printing the
//! effective configuration and validating a file without loading it.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, ConfigError, DuoviewConfig, config_paths, load_config_from_path};
use crate::error::{DuoviewError, DuoviewResult};
use crate::platform::path::expand;

/// Fallback location when no search path can be resolved.
const FALLBACK_FILE: &str = "config.jsonc";

#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write a commented configuration template.
    ///
    /// Every option (window defaults, gesture thresholds, monitor layout)
    /// is present but commented out.
    #[command(after_long_help = r#"Examples:
  duoview config init
  duoview config init --force
  duoview config init --path ~/duoview.jsonc
  duoview config init --stdout > duoview.jsonc"#)]
    Init {
        /// Replace an existing file.
        #[arg(long, short)]
        force: bool,

        /// Destination file. Defaults to the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the template instead of writing it.
        #[arg(long, conflicts_with_all = ["force", "path"])]
        stdout: bool,
    },

    /// List the search paths and mark the one in use.
    Path,

    /// Print the effective configuration, defaults included.
    Show {
        /// Output in JSON format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Validate a configuration file.
    ///
    /// Checks the active file when no path is given.
    Check {
        /// File to validate.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

/// Runs a config subcommand.
///
/// # Errors
///
/// Returns an error if a file cannot be written or fails validation.
pub fn execute(cmd: &ConfigCommands) -> DuoviewResult<()> {
    match cmd {
        ConfigCommands::Init { stdout: true, .. } => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Init { force, path, .. } => {
            let target = path.as_deref().map_or_else(default_target, expand);
            let written = init_config(&target, *force)?;
            println!("{} {}", "Created".green().bold(), written.display());
            println!("Uncomment the options you want to change.");
            Ok(())
        }
        ConfigCommands::Path => {
            print_search_paths();
            Ok(())
        }
        ConfigCommands::Show { json } => show_config(*json),
        ConfigCommands::Check { path } => {
            let Some(target) = path.as_deref().map(expand).or_else(active_file) else {
                return Err(DuoviewError::ConfigError(
                    "no configuration file to check; pass a path or run 'duoview config init'".into(),
                ));
            };
            let config = check_config(&target)?;
            println!(
                "{} {} ({} monitors in layout)",
                "Valid".green().bold(),
                target.display(),
                config.monitors.layout.len()
            );
            Ok(())
        }
    }
}

fn default_target() -> PathBuf {
    config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from(FALLBACK_FILE))
}

/// The first search path that exists.
fn active_file() -> Option<PathBuf> { config_paths().into_iter().find(|p| p.exists()) }

/// Writes the template to `target`, refusing to replace a file unless `force`.
fn init_config(target: &Path, force: bool) -> DuoviewResult<PathBuf> {
    if target.exists() && !force {
        return Err(DuoviewError::ConfigError(format!(
            "{} already exists (use --force to replace it)",
            target.display()
        )));
    }
    create_config_file(target)
        .map_err(|e| DuoviewError::ConfigError(format!("cannot write {}: {e}", target.display())))?;
    Ok(target.to_path_buf())
}

fn print_search_paths() {
    let active = active_file();
    println!("{}", "Search paths (first match wins):".bold());
    for (n, candidate) in config_paths().iter().enumerate() {
        let status = match (&active, candidate.exists()) {
            (Some(path), _) if path == candidate => "active".green().bold().to_string(),
            (_, true) => "shadowed".yellow().to_string(),
            (_, false) => "-".dimmed().to_string(),
        };
        println!("  {}. {} [{status}]", n + 1, candidate.display());
    }
    if active.is_none() {
        println!("\nNo file found; defaults are in effect.");
    }
}

fn show_config(json: bool) -> DuoviewResult<()> {
    let value = serde_json::to_value(config::get_config())?;
    if json {
        output::print_highlighted_json(&value);
        return Ok(());
    }

    match config::get_config_path() {
        Some(path) => println!("{} {}", "Loaded from".bold(), path.display()),
        None => println!("{}", "No configuration file, showing defaults".bold()),
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Parses `target` without installing it as the global configuration.
fn check_config(target: &Path) -> DuoviewResult<DuoviewConfig> {
    match load_config_from_path(target) {
        Ok((config, _)) => Ok(config),
        Err(ConfigError::NotFound) => {
            Err(DuoviewError::ConfigError(format!("{} does not exist", target.display())))
        }
        Err(err) => Err(DuoviewError::ConfigError(format!("{}: {err}", target.display()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config.jsonc");
        std::fs::write(&target, "{}").unwrap();

        let err = init_config(&target, false).unwrap_err();
        assert!(matches!(err, DuoviewError::ConfigError(_)));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn test_init_force_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("config.jsonc");

        assert_eq!(init_config(&target, true).unwrap(), target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), generate_config_template());
    }

    #[test]
    fn test_check_accepts_written_template() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config.jsonc");
        init_config(&target, false).unwrap();

        let config = check_config(&target).unwrap();
        assert_eq!(config, DuoviewConfig::default());
    }

    #[test]
    fn test_check_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("broken.jsonc");
        std::fs::write(&target, "{ \"window\": [ }").unwrap();

        let err = check_config(&target).unwrap_err();
        assert!(err.to_string().contains("broken.jsonc"));
    }

    #[test]
    fn test_check_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_config(&dir.path().join("absent.jsonc")).unwrap_err();
        assert!(matches!(err, DuoviewError::ConfigError(_)));
    }
}
