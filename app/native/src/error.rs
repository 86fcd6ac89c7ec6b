//! Error types for Duoview.
//!
//! Expected runtime conditions (out-of-order key notifications, a full event
//! queue, unknown attribute keys) are never errors: they are logged and the
//! operation is skipped. The types here cover the fallible setup paths only.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while setting up or tearing down a window pipeline.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum DuoviewError {
    /// Invalid arguments passed to an API or CLI command.
    #[error("{0}")]
    InvalidArguments(String),
    /// Monitor enumeration failed.
    #[error("Monitor error: {0}")]
    MonitorError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Settings store read or write failed.
    #[error("Settings error: {0}")]
    SettingsError(String),
    /// Platform window or context operation failed.
    #[error("Platform error: {0}")]
    PlatformError(String),
    /// Sleep inhibition request failed.
    #[error("Power error: {0}")]
    PowerError(String),
    /// The native capture thread could not be started or stopped.
    #[error("Thread error: {0}")]
    ThreadError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

/// Convenience alias used across the crate.
pub type DuoviewResult<T> = Result<T, DuoviewError>;

impl DuoviewError {
    /// Creates a platform error from any message.
    pub fn platform(msg: impl Into<String>) -> Self { Self::PlatformError(msg.into()) }

    /// Creates a monitor error from any message.
    pub fn monitor(msg: impl Into<String>) -> Self { Self::MonitorError(msg.into()) }

    /// Returns true for errors after which the window cannot be used at all.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::PlatformError(_) | Self::ThreadError(_))
    }

    /// Process exit code for the CLI: 2 for fatal errors, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 { if self.is_fatal() { 2 } else { 1 } }
}

impl From<std::io::Error> for DuoviewError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for DuoviewError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<String> for DuoviewError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for DuoviewError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
