//! Key-value settings store used to persist monitor identity and overrides.
//!
//! Keys are dotted paths such as `monitors.0.rect`. Values are JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use json_comments::StripComments;
use parking_lot::Mutex;
use serde_json::Value;

use super::Monitor;
use crate::error::{DuoviewError, DuoviewResult};
use crate::geometry::Rect;

/// External key-value store.
pub trait SettingsStore: Send + Sync + std::fmt::Debug {
    /// Reads a value.
    fn load(&self, key: &str) -> Option<Value>;

    /// Writes a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be persisted.
    fn save(&self, key: &str, value: Value) -> DuoviewResult<()>;
}

// ============================================================================
// Keys
// ============================================================================

/// Key of the saved rectangle for the monitor at `index`.
#[must_use]
pub fn rect_key(index: usize) -> String { format!("monitors.{index}.rect") }

/// Key of the saved `PnP` identity for the monitor at `index`.
#[must_use]
pub fn pnp_key(index: usize) -> String { format!("monitors.{index}.pnpid") }

/// Key of the saved scale factor for the monitor at `index`.
#[must_use]
pub fn scale_key(index: usize) -> String { format!("monitors.{index}.scale") }

/// Reads a rectangle, normalizing its edges.
#[must_use]
pub fn load_rect(store: &dyn SettingsStore, key: &str) -> Option<Rect> {
    let value = store.load(key)?;
    match serde_json::from_value::<Rect>(value) {
        Ok(rect) => Some(rect.normalized()),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring malformed rectangle in settings");
            None
        }
    }
}

/// Writes a rectangle.
///
/// # Errors
///
/// Returns an error when the store rejects the write.
pub fn save_rect(store: &dyn SettingsStore, key: &str, rect: Rect) -> DuoviewResult<()> {
    store.save(key, serde_json::to_value(rect)?)
}

/// Persists identity, rectangle and scale of the first monitors.
///
/// # Errors
///
/// Returns the first write error.
pub fn save_monitors(store: &dyn SettingsStore, monitors: &[Monitor], slots: usize) -> DuoviewResult<()> {
    for (index, monitor) in monitors.iter().take(slots).enumerate() {
        save_rect(store, &rect_key(index), monitor.rect)?;
        store.save(&pnp_key(index), Value::String(monitor.pnp_id.clone()))?;
        store.save(&scale_key(index), serde_json::to_value(monitor.scale)?)?;
    }
    Ok(())
}

// ============================================================================
// MemorySettings
// ============================================================================

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl SettingsStore for MemorySettings {
    fn load(&self, key: &str) -> Option<Value> { self.values.lock().get(key).cloned() }

    fn save(&self, key: &str, value: Value) -> DuoviewResult<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// JsonFileSettings
// ============================================================================

/// Store backed by a flat JSON object on disk.
///
/// Comments are accepted when reading. Every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileSettings {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> DuoviewResult<Self> {
        let path = path.into();
        let values = if path.exists() {
            read_values(&path)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values: Mutex::new(values) })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn write(&self, values: &BTreeMap<String, Value>) -> DuoviewResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json).map_err(|err| {
            DuoviewError::SettingsError(format!("{}: {err}", self.path.display()))
        })
    }
}

impl SettingsStore for JsonFileSettings {
    fn load(&self, key: &str) -> Option<Value> { self.values.lock().get(key).cloned() }

    fn save(&self, key: &str, value: Value) -> DuoviewResult<()> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value);
        self.write(&values)
    }
}

fn read_values(path: &Path) -> DuoviewResult<BTreeMap<String, Value>> {
    let file = File::open(path)?;
    let reader = StripComments::new(BufReader::new(file));
    serde_json::from_reader(reader)
        .map_err(|err| DuoviewError::SettingsError(format!("{}: {err}", path.display())))
}
