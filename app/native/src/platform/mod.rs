//! Small OS helpers shared by the window pipeline and the CLI.
//!
//! - [`thread`] - named thread spawning
//! - [`path`] - tilde expansion for configured paths

pub mod path;
pub mod thread;

pub use thread::spawn_named_thread;
