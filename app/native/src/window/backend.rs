//! Seams between the window core and the platform.
//!
//! [`PlatformBackend`] owns the OS surface and GL context and runs on the
//! consumer thread. [`NativeEventSource`] is the native message pump and
//! runs on the capture thread, translating OS notifications into calls on a
//! [`WindowSink`].
//!
//! Real OS integrations live outside this crate. The headless and scripted
//! implementations here drive the pipeline in tests and in the CLI.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::shared::WindowSink;
use crate::config::WindowConfig;
use crate::error::{DuoviewError, DuoviewResult};
use crate::events::{Event, KeyEvent};
use crate::geometry::{PointI, Rect};

// ============================================================================
// Context request
// ============================================================================

/// Surface and GL context parameters derived from the window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlRequest {
    pub quad_stereo: bool,
    pub debug: bool,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub exclusive_fullscreen: bool,
    /// Register for media keys system-wide instead of only while focused.
    pub global_media_keys: bool,
}

impl From<&WindowConfig> for GlRequest {
    fn from(config: &WindowConfig) -> Self {
        Self {
            quad_stereo: config.gl_quad_stereo,
            debug: config.gl_debug,
            depth_bits: config.gl_depth_size,
            stencil_bits: config.gl_stencil_size,
            exclusive_fullscreen: config.exclusive_fullscreen,
            global_media_keys: config.global_media_keys,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// OS surface and rendering context of one window.
pub trait PlatformBackend: std::fmt::Debug {
    /// Creates the surface and context.
    ///
    /// # Errors
    ///
    /// Returns an error when no suitable context can be created.
    fn create(&mut self, request: &GlRequest) -> DuoviewResult<()>;

    /// Destroys the surface.
    fn close(&mut self);

    /// Binds the context to the calling thread.
    fn make_current(&mut self) -> bool;

    /// Presents the back buffer.
    fn swap(&mut self);

    /// Moves the OS window. `rect` already covers every tile.
    fn apply_placement(&mut self, rect: &Rect, fullscreen: bool);

    /// Ratio between backing-store pixels and logical pixels.
    fn backing_scale(&self) -> f64 { 1.0 }
}

/// Result of one pump iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    Continue,
    /// The native window is gone; the capture thread exits.
    Closed,
}

/// Native message pump, driven from the capture thread.
pub trait NativeEventSource: Send + std::fmt::Debug {
    /// Connects to the windowing system.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established.
    fn open(&mut self) -> DuoviewResult<()>;

    /// Waits up to `timeout` for native messages and forwards them to `sink`.
    fn pump(&mut self, sink: &WindowSink, timeout: Duration) -> PumpStatus;

    /// Disconnects. Called once on the capture thread before it exits.
    fn close(&mut self) {}
}

// ============================================================================
// HeadlessBackend
// ============================================================================

#[derive(Debug, Default)]
struct HeadlessState {
    request: Option<GlRequest>,
    open: bool,
    current: bool,
    swaps: u64,
    placements: Vec<(Rect, bool)>,
}

/// Backend without any OS surface. Records what it was asked to do.
///
/// Clones share their state, so a test can keep one to inspect the window.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    state: Arc<Mutex<HeadlessState>>,
    backing_scale: f64,
}

impl Default for HeadlessBackend {
    fn default() -> Self { Self::new() }
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState::default())),
            backing_scale: 1.0,
        }
    }

    /// Reports `scale` as backing scale factor.
    #[must_use]
    pub const fn with_backing_scale(mut self, scale: f64) -> Self {
        self.backing_scale = scale;
        self
    }

    /// Context parameters passed to the last `create`.
    #[must_use]
    pub fn request(&self) -> Option<GlRequest> { self.state.lock().request }

    /// Returns true between `create` and `close`.
    #[must_use]
    pub fn is_open(&self) -> bool { self.state.lock().open }

    /// Number of presented frames.
    #[must_use]
    pub fn swaps(&self) -> u64 { self.state.lock().swaps }

    /// Placements applied so far, with their fullscreen flag.
    #[must_use]
    pub fn placements(&self) -> Vec<(Rect, bool)> { self.state.lock().placements.clone() }

    /// Last applied placement.
    #[must_use]
    pub fn last_placement(&self) -> Option<(Rect, bool)> { self.state.lock().placements.last().copied() }
}

impl PlatformBackend for HeadlessBackend {
    fn create(&mut self, request: &GlRequest) -> DuoviewResult<()> {
        let mut state = self.state.lock();
        state.request = Some(*request);
        state.open = true;
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        state.open = false;
        state.current = false;
    }

    fn make_current(&mut self) -> bool {
        let mut state = self.state.lock();
        state.current = state.open;
        state.current
    }

    fn swap(&mut self) { self.state.lock().swaps += 1; }

    fn apply_placement(&mut self, rect: &Rect, fullscreen: bool) {
        self.state.lock().placements.push((*rect, fullscreen));
    }

    fn backing_scale(&self) -> f64 { self.backing_scale }
}

// ============================================================================
// ScriptedEventSource
// ============================================================================

/// One step replayed by [`ScriptedEventSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Post(Event),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// The native window moved or resized.
    Rect(Rect),
    /// The cursor moved, in desktop coordinates.
    Cursor(PointI),
    Locked(bool),
    FocusLost,
    Sleep(Duration),
}

/// Event source replaying a fixed script, one step per pump call.
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    steps: VecDeque<ScriptStep>,
    close_when_done: bool,
    fail_open: bool,
}

impl ScriptedEventSource {
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self { steps: steps.into_iter().collect(), ..Self::default() }
    }

    /// Reports the window closed once the script is exhausted.
    #[must_use]
    pub const fn close_when_done(mut self) -> Self {
        self.close_when_done = true;
        self
    }

    /// Makes `open` fail.
    #[must_use]
    pub const fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    fn replay(step: ScriptStep, sink: &WindowSink) {
        match step {
            ScriptStep::Post(event) => {
                sink.post(&event);
            }
            ScriptStep::KeyDown(event) => {
                sink.post_key_down(event);
            }
            ScriptStep::KeyUp(event) => {
                sink.post_key_up(event);
            }
            ScriptStep::Rect(rect) => sink.update_rect(rect),
            ScriptStep::Cursor(point) => sink.set_cursor(point),
            ScriptStep::Locked(locked) => sink.set_locked(locked),
            ScriptStep::FocusLost => sink.reset_keys(),
            ScriptStep::Sleep(duration) => std::thread::sleep(duration),
        }
    }
}

impl NativeEventSource for ScriptedEventSource {
    fn open(&mut self) -> DuoviewResult<()> {
        if self.fail_open {
            return Err(DuoviewError::platform("scripted source refused to open"));
        }
        Ok(())
    }

    fn pump(&mut self, sink: &WindowSink, timeout: Duration) -> PumpStatus {
        match self.steps.pop_front() {
            Some(step) => {
                Self::replay(step, sink);
                PumpStatus::Continue
            }
            None if self.close_when_done => PumpStatus::Closed,
            None => {
                std::thread::sleep(timeout);
                PumpStatus::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl_request_from_config() {
        let config = WindowConfig { gl_quad_stereo: true, gl_stencil_size: 8, ..WindowConfig::default() };
        let request = GlRequest::from(&config);
        assert!(request.quad_stereo);
        assert!(!request.debug);
        assert_eq!(request.depth_bits, 24);
        assert_eq!(request.stencil_bits, 8);
        assert!(!request.global_media_keys);
    }

    #[test]
    fn test_headless_backend_records_calls() {
        let mut backend = HeadlessBackend::new();
        let shared = backend.clone();

        assert!(!backend.make_current());
        backend.create(&GlRequest::from(&WindowConfig::default())).unwrap();
        assert!(backend.make_current());
        backend.swap();
        backend.swap();
        backend.apply_placement(&Rect::new(0, 0, 640, 480), false);

        assert!(shared.is_open());
        assert_eq!(shared.swaps(), 2);
        assert_eq!(shared.last_placement(), Some((Rect::new(0, 0, 640, 480), false)));

        backend.close();
        assert!(!shared.is_open());
    }

    #[test]
    fn test_backing_scale_defaults_to_one() {
        assert!((HeadlessBackend::new().backing_scale() - 1.0).abs() < f64::EPSILON);
        assert!((HeadlessBackend::new().with_backing_scale(2.0).backing_scale() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scripted_source_failing_open() {
        let mut source = ScriptedEventSource::new([]).failing_open();
        assert!(matches!(source.open(), Err(DuoviewError::PlatformError(_))));
    }
}
