#![allow(clippy::multiple_crate_versions)]

//! Duoview - command-line inspector for the Duoview window toolkit.
//!
//! Lists the configured monitor layout, computes tiling viewports and
//! manages the configuration file. Logs go to stderr; set `RUST_LOG=debug`
//! to see them.

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = duoview_lib::cli::run() {
        eprintln!("duoview: {err}");
        std::process::exit(err.exit_code());
    }
}
