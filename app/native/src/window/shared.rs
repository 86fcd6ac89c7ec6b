//! State shared between the capture thread and the consumer thread.
//!
//! Besides the event queue, the capture thread publishes the native window
//! rectangle, the cursor position and the session lock flag. Every write
//! bumps a generation counter; the consumer copies the snapshot only after
//! observing a new generation, so these fields are eventually consistent
//! with the event stream rather than ordered with it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::events::{Event, EventSender, KeyEvent, KeysState, VirtKey};
use crate::geometry::{PointI, Rect};

/// Native window state published by the capture thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeState {
    /// Windowed rectangle in desktop coordinates.
    pub rect: Option<Rect>,
    /// Cursor position in desktop coordinates.
    pub cursor: PointI,
    /// The user session is locked.
    pub locked: bool,
}

#[derive(Debug)]
pub(crate) struct WindowShared {
    sender: EventSender,
    native: Mutex<NativeState>,
    generation: AtomicU64,
    activity: AtomicU64,
    wake_lock: Mutex<()>,
    wake: Condvar,
    keys: Mutex<KeysState>,
    close_requested: AtomicBool,
}

impl WindowShared {
    pub(crate) fn new(sender: EventSender) -> Self {
        Self {
            sender,
            native: Mutex::new(NativeState::default()),
            generation: AtomicU64::new(0),
            activity: AtomicU64::new(0),
            wake_lock: Mutex::new(()),
            wake: Condvar::new(),
            keys: Mutex::new(KeysState::new()),
            close_requested: AtomicBool::new(false),
        }
    }

    fn signal(&self) {
        self.activity.fetch_add(1, Ordering::Release);
        let _guard = self.wake_lock.lock();
        self.wake.notify_all();
    }

    fn update_native(&self, update: impl FnOnce(&mut NativeState)) {
        update(&mut self.native.lock());
        self.generation.fetch_add(1, Ordering::Release);
        self.signal();
    }

    pub(crate) fn generation(&self) -> u64 { self.generation.load(Ordering::Acquire) }

    pub(crate) fn native(&self) -> NativeState { *self.native.lock() }

    pub(crate) fn activity(&self) -> u64 { self.activity.load(Ordering::Acquire) }

    /// Blocks until the activity counter moves past `seen` or `timeout` elapses.
    pub(crate) fn wait_for_activity(&self, seen: u64, timeout: Duration) -> bool {
        let mut guard = self.wake_lock.lock();
        if self.activity() != seen {
            return true;
        }
        let result = self.wake.wait_while_for(&mut guard, |()| self.activity() == seen, timeout);
        !result.timed_out()
    }

    pub(crate) fn keys(&self) -> KeysState { self.keys.lock().clone() }

    pub(crate) fn is_key_down(&self, key: VirtKey) -> bool { self.keys.lock().is_key_down(key) }

    pub(crate) fn dropped(&self) -> u64 { self.sender.dropped() }

    pub(crate) fn close_requested(&self) -> bool { self.close_requested.load(Ordering::Acquire) }
}

// ============================================================================
// WindowSink
// ============================================================================

/// Producer handle given to the platform glue.
///
/// Every method may be called from any thread. Key methods must not be
/// called concurrently from two threads for the same window.
#[derive(Debug, Clone)]
pub struct WindowSink {
    shared: Arc<WindowShared>,
}

impl WindowSink {
    pub(crate) const fn new(shared: Arc<WindowShared>) -> Self { Self { shared } }

    /// Queues `event`. Returns false when the queue was full and the event
    /// was dropped.
    pub fn post(&self, event: &Event) -> bool {
        if matches!(event, Event::Close(_)) {
            self.shared.close_requested.store(true, Ordering::Release);
        }
        let accepted = self.shared.sender.append(event);
        self.shared.signal();
        accepted
    }

    /// Records the press and queues a `KeyDown` carrying the modifier state.
    ///
    /// Auto-repeated presses are queued too but keep the original press time.
    pub fn post_key_down(&self, mut event: KeyEvent) -> bool {
        {
            let mut keys = self.shared.keys.lock();
            keys.key_down(event.key, event.time);
            event.flags = keys.modifiers();
        }
        self.post(&Event::KeyDown(event))
    }

    /// Records the release and queues a `KeyUp` with the hold duration.
    ///
    /// A release without a matching press is logged and ignored.
    pub fn post_key_up(&self, mut event: KeyEvent) -> bool {
        {
            let mut keys = self.shared.keys.lock();
            let Some(pressed_at) = keys.key_up(event.key) else {
                tracing::debug!(key = %event.key, "key-up without key-down, ignoring");
                return false;
            };
            event.duration = (event.time - pressed_at).max(0.0);
            event.flags = keys.modifiers();
        }
        self.post(&Event::KeyUp(event))
    }

    /// Publishes a new windowed rectangle.
    pub fn update_rect(&self, rect: Rect) {
        self.shared.update_native(|state| state.rect = Some(rect));
    }

    /// Publishes the cursor position.
    pub fn set_cursor(&self, point: PointI) {
        self.shared.update_native(|state| state.cursor = point);
    }

    /// Publishes the session lock flag.
    pub fn set_locked(&self, locked: bool) {
        self.shared.update_native(|state| state.locked = locked);
    }

    /// Returns true once a `Close` event has been posted.
    #[must_use]
    pub fn is_close_requested(&self) -> bool { self.shared.close_requested() }

    /// Releases every held key. Called on focus loss.
    pub fn reset_keys(&self) {
        self.shared.keys.lock().reset();
        tracing::trace!("focus lost, key state cleared");
    }
}
