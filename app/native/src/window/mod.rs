//! Window core.
//!
//! A [`Window`] lives on the consumer thread. Platform glue running on the
//! capture thread feeds it through a [`WindowSink`]; the application calls
//! [`Window::process_events`] once per frame to receive callbacks.
//!
//! ```text
//! capture thread                         consumer thread
//! ──────────────                         ───────────────
//! NativeEventSource::pump                Window::process_events
//!   └─ WindowSink::post ──► EventBuffer ──► swap ─► WindowCallbacks
//!   └─ WindowSink::update_rect ─► NativeState ─► placement, activity
//! ```
//!
//! Windows of one process share a [`DisplayContext`]: the monitor registry
//! and the number of fullscreen windows, which feeds the activity rule.

pub mod backend;
pub mod callbacks;
pub mod capture;
mod shared;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard};

pub use self::backend::{
    GlRequest, HeadlessBackend, NativeEventSource, PlatformBackend, PumpStatus, ScriptStep,
    ScriptedEventSource,
};
pub use self::callbacks::{EventRecorder, NoCallbacks, WindowCallbacks};
pub use self::capture::{CaptureThread, CaptureTiming};
pub use self::shared::{NativeState, WindowSink};
use self::shared::WindowShared;
use crate::config::{DuoviewConfig, MonitorConfig, WinAttr, WindowConfig};
use crate::constants::keys::MIN_HOLD_PROGRESS;
use crate::constants::placement::{DEFAULT_RECT, MOUSE_MOVE_EPSILON};
use crate::error::{DuoviewError, DuoviewResult};
use crate::events::{Event, EventBuffer, KeyEvent, SizeEvent, VirtKey, uptime};
use crate::geometry::{PointD, PointI, Rect, Viewport};
use crate::gesture::{GestureRecognizer, GestureThresholds, TouchContext};
use crate::monitor::MonitorRegistry;
use crate::power::{
    ActiveInputs, KeepAwakeInhibitor, PowerController, SleepInhibition, SleepInhibitor, is_window_active,
};
use crate::tiling::{
    SlaveLayout, TilingMode, WinId, align_even, detect_tiling, snap_into_monitors, tiled_window_rect,
};

// ============================================================================
// DisplayContext
// ============================================================================

/// Process-wide display state shared by every window.
#[derive(Debug)]
pub struct DisplayContext {
    monitors: RwLock<MonitorRegistry>,
    fullscreen_windows: AtomicUsize,
}

impl DisplayContext {
    #[must_use]
    pub fn new(monitors: MonitorRegistry) -> Self {
        Self {
            monitors: RwLock::new(monitors),
            fullscreen_windows: AtomicUsize::new(0),
        }
    }

    /// Builds the registry described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the monitor settings file cannot be read.
    pub fn from_config(config: &MonitorConfig) -> DuoviewResult<Self> { Ok(Self::new(config.registry()?)) }

    /// Read access to the monitor registry.
    pub fn monitors(&self) -> RwLockReadGuard<'_, MonitorRegistry> { self.monitors.read() }

    /// Re-enumerates monitors. Returns true when the layout changed.
    pub fn refresh(&self) -> bool { self.monitors.write().refresh() }

    /// Number of windows currently fullscreen.
    #[must_use]
    pub fn fullscreen_windows(&self) -> usize { self.fullscreen_windows.load(Ordering::Acquire) }

    fn enter_fullscreen(&self) { self.fullscreen_windows.fetch_add(1, Ordering::AcqRel); }

    fn leave_fullscreen(&self) {
        let _ = self
            .fullscreen_windows
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| count.checked_sub(1));
    }
}

// ============================================================================
// Window
// ============================================================================

/// Consumer side of one window.
pub struct Window {
    config: WindowConfig,
    display: Arc<DisplayContext>,
    buffer: EventBuffer,
    shared: Arc<WindowShared>,
    backend: Box<dyn PlatformBackend>,
    callbacks: Box<dyn WindowCallbacks>,
    gestures: GestureRecognizer,
    power: PowerController,
    capture: Option<CaptureThread>,

    seen_generation: u64,
    seen_activity: u64,
    last_processed: f64,

    rect_norm: Rect,
    rect_full: Rect,
    fullscreen: bool,
    locked: bool,
    tiling: TilingMode,
    monitor_index: usize,
    mouse: PointD,
    mouse_moved: bool,
    active: bool,

    started: bool,
    closed: bool,
    error_reported: bool,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("placement", &self.placement())
            .field("fullscreen", &self.fullscreen)
            .field("tiling", &self.tiling)
            .field("active", &self.active)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Creates a window with a headless backend and no callbacks.
    #[must_use]
    pub fn new(config: WindowConfig, display: Arc<DisplayContext>) -> Self {
        let buffer = EventBuffer::with_capacity(config.queue_capacity.max(1));
        let shared = Arc::new(WindowShared::new(buffer.sender()));
        let (left, top, right, bottom) = DEFAULT_RECT;
        let rect_norm = Rect::new(left, top, right, bottom);
        let monitor_index = display.monitors().index_at(rect_norm.center());
        let tiling = config.split_mode.forced_mode().unwrap_or(TilingMode::Separate);
        let inhibitor: Box<dyn SleepInhibitor> = Box::new(KeepAwakeInhibitor::new());

        Self {
            config,
            display,
            buffer,
            shared,
            backend: Box::new(HeadlessBackend::new()),
            callbacks: Box::new(NoCallbacks),
            gestures: GestureRecognizer::default(),
            power: PowerController::new(inhibitor),
            capture: None,
            seen_generation: 0,
            seen_activity: 0,
            last_processed: uptime(),
            rect_norm,
            rect_full: rect_norm,
            fullscreen: false,
            locked: false,
            tiling,
            monitor_index,
            mouse: PointD::new(0.0, 0.0),
            mouse_moved: false,
            active: false,
            started: false,
            closed: false,
            error_reported: false,
        }
    }

    /// Creates a window from the window and gesture sections of `config`.
    #[must_use]
    pub fn from_config(config: &DuoviewConfig, display: Arc<DisplayContext>) -> Self {
        Self::new(config.window.clone(), display).with_gestures(config.gestures.clone())
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl PlatformBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }

    #[must_use]
    pub fn with_inhibitor(mut self, inhibitor: impl SleepInhibitor + 'static) -> Self {
        let inhibitor: Box<dyn SleepInhibitor> = Box::new(inhibitor);
        self.power = PowerController::new(inhibitor);
        self
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: impl WindowCallbacks + 'static) -> Self {
        self.callbacks = Box::new(callbacks);
        self
    }

    #[must_use]
    pub fn with_gestures(mut self, thresholds: GestureThresholds) -> Self {
        self.gestures.set_thresholds(thresholds);
        self
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Creates the surface and starts the capture thread pumping `source`.
    ///
    /// Failures are also reported once through [`WindowCallbacks::on_error`].
    ///
    /// # Errors
    ///
    /// Returns an error when the window was already started, when the
    /// backend cannot create a context, or when the capture thread fails.
    pub fn start(&mut self, source: impl NativeEventSource + 'static) -> DuoviewResult<()> {
        if self.started {
            return Err(DuoviewError::InvalidArguments("window already started".to_string()));
        }

        if let Err(err) = self.backend.create(&GlRequest::from(&self.config)) {
            self.report_error(&err);
            return Err(err);
        }

        match CaptureThread::start(source, self.sink()) {
            Ok(thread) => self.capture = Some(thread),
            Err(err) => {
                self.backend.close();
                self.report_error(&err);
                return Err(err);
            }
        }

        self.started = true;
        self.closed = false;
        self.apply_placement();
        self.update_active_state();
        tracing::info!(placement = %self.placement(), "window started");
        Ok(())
    }

    /// Stops the capture thread. Returns false if it had to be detached.
    pub fn stop(&mut self) -> bool { self.capture.take().is_none_or(|mut thread| thread.stop()) }

    /// Stops the capture thread, releases sleep inhibition and destroys the
    /// surface. Undelivered events are discarded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        if let Err(err) = self.power.release() {
            tracing::warn!(error = %err, "failed to release sleep inhibition");
        }
        if self.fullscreen {
            self.fullscreen = false;
            self.display.leave_fullscreen();
        }
        self.buffer.swap_buffers();
        self.buffer.swap_buffers();
        self.gestures.reset();
        if self.started {
            self.backend.close();
        }
        self.started = false;
        self.closed = true;
        tracing::info!("window closed");
    }

    /// Producer handle for platform glue.
    #[must_use]
    pub fn sink(&self) -> WindowSink { WindowSink::new(Arc::clone(&self.shared)) }

    /// Queues an event from the consumer thread.
    pub fn post(&self, event: &Event) -> bool { self.sink().post(event) }

    pub fn make_current(&mut self) -> bool { self.backend.make_current() }

    pub fn swap(&mut self) { self.backend.swap(); }

    /// Blocks until something is posted or `timeout` elapses.
    ///
    /// Returns true when woken by activity.
    pub fn wait_events(&self, timeout: Duration) -> bool {
        self.shared.wait_for_activity(self.seen_activity, timeout)
    }

    // ------------------------------------------------------------------------
    // Event processing
    // ------------------------------------------------------------------------

    /// Delivers everything posted since the previous call.
    ///
    /// Returns the number of callbacks invoked.
    pub fn process_events(&mut self) -> usize {
        self.seen_activity = self.shared.activity();
        let mut dispatched = self.apply_native_state();

        self.buffer.swap_buffers();
        let now = uptime();
        let ctx = self.touch_context();

        for index in 0..self.buffer.len() {
            let Some(event) = self.buffer.event(index) else {
                break;
            };
            dispatched += Self::dispatch(
                self.callbacks.as_mut(),
                &mut self.gestures,
                &ctx,
                self.last_processed,
                event,
            );
        }

        dispatched += self.synthesize_holds(now);

        for gesture in self.gestures.flush(now) {
            self.callbacks.on_event(&gesture);
            dispatched += 1;
        }

        self.last_processed = now;
        self.update_active_state();
        dispatched
    }

    /// Feeds one raw touch snapshot to the recognizer and delivers it along
    /// with any gesture it completes. Non-touch events are ignored.
    pub fn do_touch(&mut self, event: &Event) -> usize {
        if event.as_touch().is_none() {
            return 0;
        }
        let ctx = self.touch_context();
        Self::dispatch(self.callbacks.as_mut(), &mut self.gestures, &ctx, self.last_processed, event)
    }

    fn dispatch(
        callbacks: &mut dyn WindowCallbacks,
        gestures: &mut GestureRecognizer,
        ctx: &TouchContext,
        last_processed: f64,
        event: &Event,
    ) -> usize {
        match event {
            Event::KeyUp(key) => {
                let progress = (key.time - last_processed).min(key.duration);
                let mut count = 0;
                if progress > MIN_HOLD_PROGRESS {
                    let hold = KeyEvent { progress, ..*key };
                    callbacks.on_event(&Event::KeyHold(hold));
                    count += 1;
                }
                callbacks.on_event(event);
                count + 1
            }
            Event::TouchDown(_) | Event::TouchUp(_) | Event::TouchMove(_) | Event::TouchCancel(_) => {
                let gestures = gestures.process(event, ctx);
                callbacks.on_event(event);
                for gesture in &gestures {
                    callbacks.on_event(gesture);
                }
                1 + gestures.len()
            }
            _ => {
                tracing::trace!(kind = ?event.kind(), "dispatching event");
                callbacks.on_event(event);
                1
            }
        }
    }

    /// Reports a `KeyHold` for every key still down.
    fn synthesize_holds(&mut self, now: f64) -> usize {
        let keys = self.shared.keys();
        let flags = keys.modifiers();
        let mut count = 0;
        for (key, pressed_at) in keys.pressed_keys() {
            let progress = (now - self.last_processed).min(now - pressed_at);
            if progress <= 0.0 {
                continue;
            }
            let hold = KeyEvent {
                flags,
                duration: now - pressed_at,
                progress,
                ..KeyEvent::new(now, key)
            };
            self.callbacks.on_event(&Event::KeyHold(hold));
            count += 1;
        }
        count
    }

    /// Copies the native snapshot when the capture thread published a new one.
    fn apply_native_state(&mut self) -> usize {
        self.mouse_moved = false;
        let generation = self.shared.generation();
        if generation == self.seen_generation {
            return 0;
        }
        self.seen_generation = generation;

        let native = self.shared.native();
        self.locked = native.locked;
        if let Some(rect) = native.rect
            && !self.fullscreen
        {
            self.rect_norm = rect;
        }

        let mouse = self.normalize(native.cursor);
        self.mouse_moved = (mouse.x - self.mouse.x).abs() > MOUSE_MOVE_EPSILON
            || (mouse.y - self.mouse.y).abs() > MOUSE_MOVE_EPSILON;
        self.mouse = mouse;

        self.check_monitor()
    }

    /// Emits `NewMonitor` when the window center changed monitor.
    fn check_monitor(&mut self) -> usize {
        let placement = self.placement();
        let (index, count) = {
            let monitors = self.display.monitors();
            (monitors.index_at(placement.center()), monitors.len())
        };
        if index == self.monitor_index {
            return 0;
        }

        tracing::debug!(from = self.monitor_index, to = index, "window moved to another monitor");
        self.monitor_index = index;
        if count < 2 {
            return 0;
        }
        self.callbacks.on_event(&Event::NewMonitor(SizeEvent {
            time: uptime(),
            width: placement.width(),
            height: placement.height(),
        }));
        1
    }

    fn touch_context(&self) -> TouchContext {
        let placement = self.placement();
        let scale = self.display.monitors().monitor_at(placement.center()).effective_scale();
        TouchContext::new(f64::from(placement.width()), f64::from(placement.height()), scale)
    }

    fn normalize(&self, point: PointI) -> PointD {
        let placement = self.placement();
        let width = f64::from(placement.width().max(1));
        let height = f64::from(placement.height().max(1));
        PointD::new(
            f64::from(point.x - placement.left) / width,
            f64::from(point.y - placement.top) / height,
        )
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// Cursor position relative to the placement, `(0, 0)` top-left and
    /// `(1, 1)` bottom-right.
    #[must_use]
    pub const fn mouse_pos(&self) -> PointD { self.mouse }

    /// Returns true when the cursor moved during the last `process_events`.
    #[must_use]
    pub const fn is_mouse_moved(&self) -> bool { self.mouse_moved }

    /// Current rectangle of one tile: the monitor when fullscreen, the
    /// windowed rectangle otherwise.
    #[must_use]
    pub const fn placement(&self) -> Rect { if self.fullscreen { self.rect_full } else { self.rect_norm } }

    /// Drawable box of `win` in backing-store pixels.
    #[must_use]
    pub fn viewport(&self, win: WinId) -> Viewport {
        crate::tiling::viewport(self.tiling, &self.placement(), win).scaled(self.backend.backing_scale())
    }

    /// Slave surface rectangle, or `None` when no slave is configured.
    #[must_use]
    pub fn slave_rect(&self) -> Option<Rect> {
        let monitors = self.display.monitors();
        self.slave_layout(&monitors).rect()
    }

    fn slave_layout<'a>(&self, monitors: &'a MonitorRegistry) -> SlaveLayout<'a> {
        SlaveLayout {
            mode: self.config.slave,
            rect_norm: self.rect_norm,
            rect_current: self.placement(),
            fullscreen: self.fullscreen,
            slave_monitor: self.config.slave_monitor,
            monitors,
        }
    }

    /// Switches fullscreen on or off.
    ///
    /// The target monitor is `fullscreen_monitor` when configured, else the
    /// monitor under the window center.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen == self.fullscreen {
            return;
        }

        if fullscreen {
            let target = {
                let monitors = self.display.monitors();
                match self.config.fullscreen_monitor {
                    Some(index) => monitors.get(index).rect,
                    None => monitors.monitor_at(self.rect_norm.center()).rect,
                }
            };
            self.rect_full = target;
            self.fullscreen = true;
            self.display.enter_fullscreen();
        } else {
            self.fullscreen = false;
            self.display.leave_fullscreen();
        }

        tracing::debug!(fullscreen, placement = %self.placement(), "fullscreen changed");
        self.update_tiling();
        self.apply_placement();
        self.check_monitor();
        self.update_active_state();
    }

    /// Moves the windowed rectangle.
    ///
    /// With `move_to_screen`, a rectangle whose center is off every monitor
    /// is moved onto the nearest one.
    pub fn set_placement(&mut self, rect: Rect, move_to_screen: bool) {
        let mut rect = rect.normalized();
        if move_to_screen {
            rect = snap_into_monitors(rect, &self.display.monitors());
        }
        if self.config.even_pixels {
            rect = align_even(rect);
        }

        self.rect_norm = rect;
        if !self.fullscreen {
            self.apply_placement();
            self.check_monitor();
        }
        self.update_active_state();
    }

    fn update_tiling(&mut self) {
        let tiling = match self.config.split_mode.forced_mode() {
            Some(mode) => mode,
            None if self.fullscreen && self.config.slave.is_independent() => {
                let monitors = self.display.monitors();
                if monitors.len() > 1 {
                    let layout = self.slave_layout(&monitors);
                    let slave = Rect::from_origin_size(
                        layout.left(),
                        layout.top(),
                        self.rect_full.width(),
                        self.rect_full.height(),
                    );
                    detect_tiling(&self.rect_full, &slave)
                } else {
                    TilingMode::Separate
                }
            }
            None => TilingMode::Separate,
        };

        if tiling != self.tiling {
            tracing::info!(from = ?self.tiling, to = ?tiling, "tiling mode changed");
            self.tiling = tiling;
        }
    }

    fn apply_placement(&mut self) {
        let rect = tiled_window_rect(self.tiling, self.placement());
        self.backend.apply_placement(&rect, self.fullscreen);
    }

    // ------------------------------------------------------------------------
    // Attributes and monitors
    // ------------------------------------------------------------------------

    /// Applies typed attributes and recomputes tiling and sleep inhibition.
    pub fn set_attributes(&mut self, attrs: &[WinAttr]) {
        for attr in attrs {
            tracing::debug!(?attr, "window attribute set");
            self.config.apply(*attr);
        }
        self.update_tiling();
        self.apply_placement();
        self.update_active_state();
    }

    /// Applies a raw `(key, value)` list terminated by key 0.
    ///
    /// Unknown keys and invalid values are logged and skipped.
    pub fn set_attributes_raw(&mut self, list: &[(u32, i64)]) {
        let attrs = WinAttr::from_raw_list(list);
        self.set_attributes(&attrs);
    }

    /// Re-enumerates monitors and refreshes everything derived from them.
    pub fn refresh_monitors(&mut self) -> bool {
        let changed = self.display.refresh();
        if changed {
            self.update_tiling();
            self.check_monitor();
            self.update_active_state();
        }
        changed
    }

    fn update_active_state(&mut self) {
        let active = {
            let monitors = self.display.monitors();
            is_window_active(&ActiveInputs {
                locked: self.locked,
                fullscreen: self.fullscreen,
                rect: self.rect_norm,
                monitors: monitors.as_slice(),
                fullscreen_windows: self.display.fullscreen_windows(),
            })
        };
        if active != self.active {
            tracing::debug!(active, "window activity changed");
            self.active = active;
        }

        let level = SleepInhibition::from_policy(self.config.sleep_policy(), active);
        if let Err(err) = self.power.apply(level) {
            tracing::warn!(error = %err, ?level, "failed to change sleep inhibition");
        }
    }

    fn report_error(&mut self, err: &DuoviewError) {
        tracing::error!(error = %err, "window failure");
        if !self.error_reported {
            self.error_reported = true;
            self.callbacks.on_error(err);
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Returns true when the window is visible enough to count as active.
    #[must_use]
    pub const fn is_active(&self) -> bool { self.active }

    #[must_use]
    pub const fn is_fullscreen(&self) -> bool { self.fullscreen }

    #[must_use]
    pub const fn tiling_mode(&self) -> TilingMode { self.tiling }

    /// Sleep inhibition currently requested.
    #[must_use]
    pub const fn sleep_inhibition(&self) -> SleepInhibition { self.power.current() }

    /// Keys currently held, in key-code order.
    #[must_use]
    pub fn keys_down(&self) -> Vec<VirtKey> { self.shared.keys().pressed_keys().map(|(key, _)| key).collect() }

    #[must_use]
    pub fn is_key_down(&self, key: VirtKey) -> bool { self.shared.is_key_down(key) }

    /// Current settings, including attributes applied at runtime.
    #[must_use]
    pub const fn config(&self) -> &WindowConfig { &self.config }

    #[must_use]
    pub const fn display(&self) -> &Arc<DisplayContext> { &self.display }

    /// Returns true once a `Close` event has been posted.
    #[must_use]
    pub fn is_close_requested(&self) -> bool { self.shared.close_requested() }

    /// Events dropped because the queue was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 { self.shared.dropped() }
}

impl Drop for Window {
    fn drop(&mut self) { self.close(); }
}

// ============================================================================
// Tests
// ============================================================================
