//! Platform sleep-inhibition backends.

use std::sync::Arc;

use keepawake::{Builder, KeepAwake};
use parking_lot::Mutex;

use super::SleepInhibition;
use crate::constants;
use crate::error::{DuoviewError, DuoviewResult};

const KEEP_AWAKE_REASON: &str = "Stereoscopic playback in progress";

/// Something that can hold the machine awake.
pub trait SleepInhibitor: std::fmt::Debug {
    /// Replaces the current inhibition with `level`.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform refuses the request.
    fn set_inhibition(&mut self, level: SleepInhibition) -> DuoviewResult<()>;
}

impl<T: SleepInhibitor + ?Sized> SleepInhibitor for Box<T> {
    fn set_inhibition(&mut self, level: SleepInhibition) -> DuoviewResult<()> {
        (**self).set_inhibition(level)
    }
}

// ============================================================================
// KeepAwakeInhibitor
// ============================================================================

/// Backend built on the system power manager.
///
/// The held [`KeepAwake`] handle is the inhibition: dropping it releases the
/// request.
#[derive(Default)]
pub struct KeepAwakeInhibitor {
    handle: Option<KeepAwake>,
}

impl KeepAwakeInhibitor {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn acquire(display: bool) -> DuoviewResult<KeepAwake> {
        Builder::default()
            .display(display)
            .idle(true)
            .sleep(true)
            .reason(KEEP_AWAKE_REASON)
            .app_name(constants::APP_NAME)
            .app_reverse_domain(constants::APP_BUNDLE_ID)
            .create()
            .map_err(|err| DuoviewError::PowerError(err.to_string()))
    }
}

impl std::fmt::Debug for KeepAwakeInhibitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeepAwakeInhibitor").field("held", &self.handle.is_some()).finish()
    }
}

impl SleepInhibitor for KeepAwakeInhibitor {
    fn set_inhibition(&mut self, level: SleepInhibition) -> DuoviewResult<()> {
        // The old handle is released only once the new one is held
        let next = match level {
            SleepInhibition::Off => None,
            SleepInhibition::System => Some(Self::acquire(false)?),
            SleepInhibition::Display => Some(Self::acquire(true)?),
        };
        self.handle = next;
        Ok(())
    }
}

// ============================================================================
// RecordingInhibitor
// ============================================================================

/// Backend that only records requests. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingInhibitor {
    calls: Arc<Mutex<Vec<SleepInhibition>>>,
    fail: bool,
}

impl RecordingInhibitor {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A recorder that rejects every request.
    #[must_use]
    pub fn failing() -> Self { Self { fail: true, ..Self::default() } }

    /// Requests received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<SleepInhibition> { self.calls.lock().clone() }

    /// Last requested level.
    #[must_use]
    pub fn last(&self) -> Option<SleepInhibition> { self.calls.lock().last().copied() }
}

impl SleepInhibitor for RecordingInhibitor {
    fn set_inhibition(&mut self, level: SleepInhibition) -> DuoviewResult<()> {
        if self.fail {
            return Err(DuoviewError::PowerError("inhibition rejected".to_string()));
        }
        self.calls.lock().push(level);
        Ok(())
    }
}
