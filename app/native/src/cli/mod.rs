//! CLI module for Duoview.
//!
//! The command-line tool inspects what a window would see: the monitor
//! layout from the configuration, the viewports of each tiling mode and the
//! configuration file itself.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::DuoviewResult;

/// Parses `std::env::args` and runs the selected command.
///
/// # Errors
///
/// Propagates the command's error; `main` reports it and exits non-zero.
pub fn run() -> DuoviewResult<()> { Cli::parse().execute() }
