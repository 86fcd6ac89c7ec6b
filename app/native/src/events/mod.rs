//! Window events delivered to the application.
//!
//! Platform glue turns native notifications into [`Event`] values and posts
//! them into the [`EventBuffer`]. The consumer thread swaps the buffer once
//! per tick and dispatches each event to the matching
//! [`WindowCallbacks`](crate::window::WindowCallbacks) method.
//!
//! Every payload carries `time`, seconds since the process uptime origin
//! (see [`uptime`]). Pointer coordinates are normalized to the window,
//! `(0, 0)` being the top-left corner and `(1, 1)` the bottom-right.

pub mod buffer;
pub mod keys;
pub mod touch;

use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use self::buffer::{EventBuffer, EventSender};
pub use self::keys::{KeysState, Modifiers, VirtKey};
pub use self::touch::{TouchPoint, TouchSequence};
use crate::geometry::PointD;

// ============================================================================
// Clock
// ============================================================================

static UPTIME_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed since the process uptime origin.
///
/// The origin is fixed by the first call, so the value is monotonic and
/// comparable across threads.
#[must_use]
pub fn uptime() -> f64 { UPTIME_ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() }

// ============================================================================
// Payloads
// ============================================================================

/// Payload-less event (close, pause).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicEvent {
    pub time: f64,
}

/// Window resized or moved to another monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEvent {
    pub time: f64,
    /// New width in pixels.
    pub width: i32,
    /// New height in pixels.
    pub height: i32,
}

/// Keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub time: f64,
    /// Virtual key code.
    pub key: VirtKey,
    /// Modifier state when the event was generated.
    pub flags: Modifiers,
    /// Unicode character, when the key produces one.
    pub ch: Option<char>,
    /// Time the key has been held (seconds). Filled on key-up and hold.
    pub duration: f64,
    /// Time elapsed since the previous hold report (seconds).
    pub progress: f64,
}

impl KeyEvent {
    /// Creates a key event with no modifiers or character.
    #[must_use]
    pub const fn new(time: f64, key: VirtKey) -> Self {
        Self {
            time,
            key,
            flags: Modifiers::empty(),
            ch: None,
            duration: 0.0,
            progress: 0.0,
        }
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// Mouse button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub time: f64,
    /// Normalized pointer position.
    pub point: PointD,
    /// Button that changed state.
    pub button: MouseButton,
    /// Bit set of buttons currently held.
    pub buttons: u32,
}

/// Raw touch snapshot.
///
/// For `TouchDown` the points include the new contact, for `TouchUp` they
/// exclude the lifted one, for `TouchMove` they are the full current set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub time: f64,
    pub points: TouchSequence,
}

/// Recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub time: f64,
    /// First anchor point (normalized): tap location, pan center or first finger.
    pub point_a: PointD,
    /// Second anchor point (normalized): second finger for pinch and rotate.
    pub point_b: PointD,
    /// Pan translation (normalized) since the previous report.
    pub delta: PointD,
    /// Pinch separation change in dip, or rotation angle in radians.
    pub value: f64,
    /// Whether the contacts came from a touch screen rather than a touchpad.
    pub on_screen: bool,
}

impl GestureEvent {
    /// Creates a gesture located at a single point.
    #[must_use]
    pub const fn at(time: f64, point: PointD, on_screen: bool) -> Self {
        Self {
            time,
            point_a: point,
            point_b: point,
            delta: PointD::new(0.0, 0.0),
            value: 0.0,
            on_screen,
        }
    }
}

/// Scroll wheel or touchpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollEvent {
    pub time: f64,
    /// Normalized pointer position.
    pub point: PointD,
    /// Horizontal wheel steps.
    pub steps_x: i32,
    /// Vertical wheel steps.
    pub steps_y: i32,
    /// Precise horizontal delta.
    pub delta_x: f64,
    /// Precise vertical delta.
    pub delta_y: f64,
    /// Whether the scroll comes from a multi-touch device.
    pub from_multitouch: bool,
}

/// Files dropped onto the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDropEvent {
    pub time: f64,
    /// Dropped paths, owned by the event.
    pub files: Vec<String>,
}

/// Navigation target produced by swipes and media keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigateTarget {
    Forward,
    Backward,
    Top,
    Bottom,
}

/// Navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigateEvent {
    pub time: f64,
    pub target: NavigateTarget,
}

/// Application-defined action trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub time: f64,
    pub action_id: u32,
}

// ============================================================================
// Event
// ============================================================================

/// A window event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    Close(BasicEvent),
    Pause(BasicEvent),
    Size(SizeEvent),
    NewMonitor(SizeEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    KeyHold(KeyEvent),
    MouseDown(ClickEvent),
    MouseUp(ClickEvent),
    TouchDown(TouchEvent),
    TouchUp(TouchEvent),
    TouchMove(TouchEvent),
    TouchCancel(TouchEvent),
    GestureCancel(GestureEvent),
    GestureTap(GestureEvent),
    GestureDoubleTap(GestureEvent),
    GesturePan(GestureEvent),
    GesturePinch(GestureEvent),
    GestureRotate(GestureEvent),
    Scroll(ScrollEvent),
    FileDrop(FileDropEvent),
    Navigate(NavigateEvent),
    Action(ActionEvent),
}

/// Discriminant of [`Event`], used for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Close,
    Pause,
    Size,
    NewMonitor,
    KeyDown,
    KeyUp,
    KeyHold,
    MouseDown,
    MouseUp,
    TouchDown,
    TouchUp,
    TouchMove,
    TouchCancel,
    GestureCancel,
    GestureTap,
    GestureDoubleTap,
    GesturePan,
    GesturePinch,
    GestureRotate,
    Scroll,
    FileDrop,
    Navigate,
    Action,
}

impl Event {
    /// Timestamp of the event.
    #[must_use]
    pub const fn time(&self) -> f64 {
        match self {
            Self::Close(e) | Self::Pause(e) => e.time,
            Self::Size(e) | Self::NewMonitor(e) => e.time,
            Self::KeyDown(e) | Self::KeyUp(e) | Self::KeyHold(e) => e.time,
            Self::MouseDown(e) | Self::MouseUp(e) => e.time,
            Self::TouchDown(e) | Self::TouchUp(e) | Self::TouchMove(e) | Self::TouchCancel(e) => {
                e.time
            }
            Self::GestureCancel(e)
            | Self::GestureTap(e)
            | Self::GestureDoubleTap(e)
            | Self::GesturePan(e)
            | Self::GesturePinch(e)
            | Self::GestureRotate(e) => e.time,
            Self::Scroll(e) => e.time,
            Self::FileDrop(e) => e.time,
            Self::Navigate(e) => e.time,
            Self::Action(e) => e.time,
        }
    }

    /// Kind of the event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Close(_) => EventKind::Close,
            Self::Pause(_) => EventKind::Pause,
            Self::Size(_) => EventKind::Size,
            Self::NewMonitor(_) => EventKind::NewMonitor,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::KeyHold(_) => EventKind::KeyHold,
            Self::MouseDown(_) => EventKind::MouseDown,
            Self::MouseUp(_) => EventKind::MouseUp,
            Self::TouchDown(_) => EventKind::TouchDown,
            Self::TouchUp(_) => EventKind::TouchUp,
            Self::TouchMove(_) => EventKind::TouchMove,
            Self::TouchCancel(_) => EventKind::TouchCancel,
            Self::GestureCancel(_) => EventKind::GestureCancel,
            Self::GestureTap(_) => EventKind::GestureTap,
            Self::GestureDoubleTap(_) => EventKind::GestureDoubleTap,
            Self::GesturePan(_) => EventKind::GesturePan,
            Self::GesturePinch(_) => EventKind::GesturePinch,
            Self::GestureRotate(_) => EventKind::GestureRotate,
            Self::Scroll(_) => EventKind::Scroll,
            Self::FileDrop(_) => EventKind::FileDrop,
            Self::Navigate(_) => EventKind::Navigate,
            Self::Action(_) => EventKind::Action,
        }
    }

    /// Returns the touch payload for touch events.
    #[must_use]
    pub const fn as_touch(&self) -> Option<&TouchEvent> {
        match self {
            Self::TouchDown(e) | Self::TouchUp(e) | Self::TouchMove(e) | Self::TouchCancel(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}
