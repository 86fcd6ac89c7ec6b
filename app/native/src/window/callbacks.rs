//! Application callbacks.
//!
//! Events leave the pipeline only through [`WindowCallbacks`]. Every method
//! has an empty default, so an application implements the ones it cares
//! about. [`WindowCallbacks::on_event`] routes to the per-kind methods and
//! can be overridden to observe the whole stream instead.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DuoviewError;
use crate::events::{
    ActionEvent, BasicEvent, ClickEvent, Event, EventKind, FileDropEvent, GestureEvent, KeyEvent,
    NavigateEvent, ScrollEvent, SizeEvent, TouchEvent,
};

/// Receives the events of one window on the consumer thread.
#[allow(unused_variables)]
pub trait WindowCallbacks {
    /// Dispatches `event` to the matching method.
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Close(e) => self.on_close(e),
            Event::Pause(e) => self.on_pause(e),
            Event::Size(e) => self.on_resize(e),
            Event::NewMonitor(e) => self.on_new_monitor(e),
            Event::KeyDown(e) => self.on_key_down(e),
            Event::KeyUp(e) => self.on_key_up(e),
            Event::KeyHold(e) => self.on_key_hold(e),
            Event::MouseDown(e) => self.on_mouse_down(e),
            Event::MouseUp(e) => self.on_mouse_up(e),
            Event::TouchDown(e) | Event::TouchUp(e) | Event::TouchMove(e) | Event::TouchCancel(e) => {
                self.on_touch(event.kind(), e);
            }
            Event::GestureCancel(e)
            | Event::GestureTap(e)
            | Event::GestureDoubleTap(e)
            | Event::GesturePan(e)
            | Event::GesturePinch(e)
            | Event::GestureRotate(e) => self.on_gesture(event.kind(), e),
            Event::Scroll(e) => self.on_scroll(e),
            Event::FileDrop(e) => self.on_file_drop(e),
            Event::Navigate(e) => self.on_navigate(e),
            Event::Action(e) => self.on_action(e),
        }
    }

    fn on_close(&mut self, event: &BasicEvent) {}

    fn on_pause(&mut self, event: &BasicEvent) {}

    fn on_resize(&mut self, event: &SizeEvent) {}

    /// The window center moved onto another monitor.
    fn on_new_monitor(&mut self, event: &SizeEvent) {}

    fn on_key_down(&mut self, event: &KeyEvent) {}

    fn on_key_up(&mut self, event: &KeyEvent) {}

    fn on_key_hold(&mut self, event: &KeyEvent) {}

    fn on_mouse_down(&mut self, event: &ClickEvent) {}

    fn on_mouse_up(&mut self, event: &ClickEvent) {}

    /// Raw touch snapshot. `kind` is one of the four touch kinds.
    fn on_touch(&mut self, kind: EventKind, event: &TouchEvent) {}

    /// Recognized gesture. `kind` is one of the six gesture kinds.
    fn on_gesture(&mut self, kind: EventKind, event: &GestureEvent) {}

    fn on_scroll(&mut self, event: &ScrollEvent) {}

    fn on_file_drop(&mut self, event: &FileDropEvent) {}

    fn on_navigate(&mut self, event: &NavigateEvent) {}

    fn on_action(&mut self, event: &ActionEvent) {}

    /// A failure the window could not recover from. Reported once.
    fn on_error(&mut self, error: &DuoviewError) {}
}

/// Callbacks that ignore everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallbacks;

impl WindowCallbacks for NoCallbacks {}

/// Callbacks that keep a copy of every event and error.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<Event>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Recorded events, in dispatch order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> { self.events.lock().clone() }

    /// Kinds of the recorded events.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> { self.events.lock().iter().map(Event::kind).collect() }

    /// Number of recorded events of `kind`.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }

    /// Reported error messages.
    #[must_use]
    pub fn errors(&self) -> Vec<String> { self.errors.lock().clone() }

    pub fn clear(&self) {
        self.events.lock().clear();
        self.errors.lock().clear();
    }
}

impl WindowCallbacks for EventRecorder {
    fn on_event(&mut self, event: &Event) { self.events.lock().push(event.clone()); }

    fn on_error(&mut self, error: &DuoviewError) { self.errors.lock().push(error.to_string()); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NavigateTarget, VirtKey};
    use crate::geometry::PointD;

    #[derive(Default)]
    struct Counter {
        keys: usize,
        gestures: Vec<EventKind>,
        navigations: usize,
    }

    impl WindowCallbacks for Counter {
        fn on_key_down(&mut self, _event: &KeyEvent) { self.keys += 1; }

        fn on_key_up(&mut self, _event: &KeyEvent) { self.keys += 1; }

        fn on_gesture(&mut self, kind: EventKind, _event: &GestureEvent) { self.gestures.push(kind); }

        fn on_navigate(&mut self, _event: &NavigateEvent) { self.navigations += 1; }
    }

    #[test]
    fn test_default_dispatch_routes_by_kind() {
        let mut counter = Counter::default();
        let key = KeyEvent::new(0.0, VirtKey(b'K'));
        let gesture = GestureEvent::at(0.0, PointD::new(0.5, 0.5), true);

        counter.on_event(&Event::KeyDown(key));
        counter.on_event(&Event::KeyUp(key));
        counter.on_event(&Event::GestureTap(gesture));
        counter.on_event(&Event::GesturePinch(gesture));
        counter.on_event(&Event::Navigate(NavigateEvent { time: 0.0, target: NavigateTarget::Top }));
        counter.on_event(&Event::Pause(BasicEvent { time: 0.0 }));

        assert_eq!(counter.keys, 2);
        assert_eq!(counter.gestures, vec![EventKind::GestureTap, EventKind::GesturePinch]);
        assert_eq!(counter.navigations, 1);
    }

    #[test]
    fn test_recorder_shares_log_between_clones() {
        let recorder = EventRecorder::new();
        let mut handle = recorder.clone();
        handle.on_event(&Event::Close(BasicEvent { time: 1.0 }));
        handle.on_error(&DuoviewError::platform("no context"));

        assert_eq!(recorder.kinds(), vec![EventKind::Close]);
        assert_eq!(recorder.count(EventKind::Close), 1);
        assert_eq!(recorder.errors(), vec!["Platform error: no context".to_string()]);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
