//! Path expansion for paths written in configuration files.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the home directory.
///
/// Absolute and relative paths are returned unchanged.
#[must_use]
pub fn expand(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    let text = text.trim();
    if text.is_empty() {
        return PathBuf::new();
    }
    PathBuf::from(shellexpand::tilde(text).as_ref())
}

/// Expands `path` and resolves it against `base_dir` when still relative.
#[must_use]
pub fn expand_and_resolve(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    let expanded = expand(path);
    match base_dir {
        Some(base) if !expanded.as_os_str().is_empty() && expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}
