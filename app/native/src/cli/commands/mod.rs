//! CLI command definitions using Clap.
//!
//! Commands are organized into submodules:
//!
//! - `config_cmd` - Configuration file management
//! - `monitors` - Monitor listing
//! - `types` - Shared argument types
//! - `viewport` - Viewport calculator

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config;
use crate::error::{DuoviewError, DuoviewResult};

pub mod config_cmd;
pub mod monitors;
pub mod types;
pub mod viewport;

pub use config_cmd::ConfigCommands;
pub use types::CliTilingMode;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Duoview CLI - inspect monitors, viewports and configuration.
#[derive(Parser, Debug)]
#[command(name = "duoview")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// List the monitors of the configured layout.
    ///
    /// Shows position, resolution, scale and GPU of every monitor, in
    /// registry order. The index is what `slaveMonitor` and
    /// `fullscreenMonitor` refer to.
    Monitors {
        /// Output in JSON format instead of a table.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Compute the viewports of a tiling mode.
    ///
    /// Prints the master, slave and combined viewports for an eye of the
    /// given size, together with the size of the OS window covering both.
    Viewport {
        /// Tiling mode.
        #[arg(long, short, value_enum, default_value = "separate")]
        mode: CliTilingMode,

        /// Eye width in pixels (whole frame for HDMI modes).
        #[arg(long, short = 'W')]
        width: i32,

        /// Eye height in pixels (whole frame for HDMI modes).
        #[arg(long, short = 'H')]
        height: i32,

        /// Output in JSON format instead of a table.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Configuration file management commands.
    ///
    /// Create, locate, print and validate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(duoview completions --shell zsh)"
    ///   duoview completions --shell fish > ~/.config/fish/completions/duoview.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(std::path::PathBuf::from)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> DuoviewResult<()> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(DuoviewError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Monitors { json } => monitors::execute(*json),
            Commands::Viewport { mode, width, height, json } => viewport::execute(*mode, *width, *height, *json),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", config::schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "duoview", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["duoview", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_monitors_json() {
        let cli = Cli::try_parse_from(["duoview", "monitors", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Monitors { json: true }));
    }

    #[test]
    fn test_cli_parses_viewport() {
        let cli = Cli::try_parse_from([
            "duoview",
            "viewport",
            "--mode",
            "master-slave-x",
            "--width",
            "1920",
            "--height",
            "1080",
        ])
        .unwrap();
        match cli.command {
            Commands::Viewport { mode, width, height, json } => {
                assert_eq!(mode, CliTilingMode::MasterSlaveX);
                assert_eq!((width, height), (1920, 1080));
                assert!(!json);
            }
            _ => panic!("Expected Viewport command"),
        }
    }

    #[test]
    fn test_cli_viewport_defaults_to_separate() {
        let cli = Cli::try_parse_from(["duoview", "viewport", "-W", "800", "-H", "600"]).unwrap();
        assert!(matches!(cli.command, Commands::Viewport { mode: CliTilingMode::Separate, .. }));
    }

    #[test]
    fn test_cli_viewport_requires_size() {
        assert!(Cli::try_parse_from(["duoview", "viewport", "--mode", "hdmi-720"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let result =
            Cli::try_parse_from(["duoview", "viewport", "--mode", "diagonal", "-W", "1", "-H", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_config_init() {
        let cli = Cli::try_parse_from(["duoview", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init { force, path, stdout }) => {
                assert!(force);
                assert!(path.is_none());
                assert!(!stdout);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_init_stdout_conflicts_with_path() {
        let result = Cli::try_parse_from(["duoview", "config", "init", "--stdout", "--path", "x.jsonc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_config_show_and_check() {
        let cli = Cli::try_parse_from(["duoview", "config", "show", "-j"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show { json: true })));

        let cli = Cli::try_parse_from(["duoview", "config", "check", "~/duoview.jsonc"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Check { path }) => {
                assert_eq!(path, Some(std::path::PathBuf::from("~/duoview.jsonc")));
            }
            _ => panic!("Expected Config Check command"),
        }
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["duoview", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    // ========================================================================
    // --config flag tests
    // ========================================================================

    #[test]
    fn test_cli_parses_config_flag() {
        let cli = Cli::try_parse_from(["duoview", "--config", "/path/to/config.json", "schema"]).unwrap();
        assert_eq!(cli.config, Some("/path/to/config.json".to_string()));
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_config_flag_is_global() {
        let cli = Cli::try_parse_from(["duoview", "monitors", "-c", "/tmp/duoview.jsonc"]).unwrap();
        assert_eq!(cli.config_path(), Some(std::path::PathBuf::from("/tmp/duoview.jsonc")));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["duoview", "--config", "/nonexistent/duoview.jsonc", "schema"]).unwrap();
        assert!(matches!(cli.execute(), Err(DuoviewError::ConfigError(_))));
    }

    #[test]
    fn test_app_version_is_not_empty() {
        assert!(!APP_VERSION.is_empty());
    }
}
