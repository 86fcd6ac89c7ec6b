//! Multi-touch gesture recognition.
//!
//! [`GestureRecognizer`] consumes raw touch snapshots and produces gesture
//! events. Classification depends on how many contacts are down:
//!
//! - one contact: tap and double-tap
//! - two contacts: rotate, pinch and pan, in that priority order
//! - three contacts: horizontal and vertical swipes mapped to navigation
//!
//! Distances are measured in device independent pixels (dip) so thresholds
//! behave the same on every monitor scale.
//!
//! # Taps
//!
//! A completed tap is held back as pending. A second qualifying tap within
//! the pairing window turns both into one `GestureDoubleTap`. Otherwise the
//! pending tap is released as `GestureTap` once its window has elapsed,
//! detected on the next touch event or by [`GestureRecognizer::flush`].
//! No timer is involved.
//!
//! # Two-finger gestures
//!
//! Magnitudes are measured against an anchor snapshot taken when the
//! two-finger phase started or when the last gesture event was emitted, so
//! slow motion accumulates until it clears a threshold. See
//! [`GestureThresholds`] for the three tiers.

mod thresholds;

use smallvec::SmallVec;

pub use self::thresholds::{GestureThresholds, ThresholdTier};
use crate::events::{
    Event, GestureEvent, NavigateEvent, NavigateTarget, TouchEvent, TouchPoint, TouchSequence,
};
use crate::geometry::PointD;

/// Events produced by one recognizer call.
pub type GestureEvents = SmallVec<[Event; 4]>;

// ============================================================================
// Types
// ============================================================================

/// Continuous two-finger gesture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Rotate,
    Pinch,
    Pan,
}

/// Observable recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerState {
    /// No contact.
    Idle,
    /// Contacts down, no gesture recognized yet.
    Tracking(usize),
    /// A continuous gesture is active.
    Recognized(GestureKind),
}

/// Window geometry needed to convert normalized touch positions to dip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContext {
    /// Window width in pixels.
    pub width_px: f64,
    /// Window height in pixels.
    pub height_px: f64,
    /// Scale factor of the monitor under the window.
    pub scale: f64,
}

impl TouchContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(width_px: f64, height_px: f64, scale: f64) -> Self {
        Self { width_px, height_px, scale }
    }

    /// Converts a normalized position to dip.
    #[must_use]
    pub fn to_dip(&self, point: PointD) -> PointD {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        PointD::new(point.x * self.width_px / scale, point.y * self.height_px / scale)
    }
}

/// Single contact that may still become a tap.
#[derive(Debug, Clone, Copy)]
struct TapCandidate {
    id: i64,
    down_time: f64,
    start: PointD,
}

/// Completed tap waiting for a possible second tap.
#[derive(Debug, Clone, Copy)]
struct PendingTap {
    time: f64,
    point: PointD,
    dip: PointD,
    on_screen: bool,
}

// ============================================================================
// GestureRecognizer
// ============================================================================

/// Stateful touch classifier. Owned by the consumer thread.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
    touches: TouchSequence,
    anchor: TouchSequence,
    active: Option<GestureKind>,
    tap: Option<TapCandidate>,
    pending_tap: Option<PendingTap>,
    swipe_origin: Option<PointD>,
}

impl Default for GestureRecognizer {
    fn default() -> Self { Self::new(GestureThresholds::default()) }
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub const fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            touches: TouchSequence::new(),
            anchor: TouchSequence::new(),
            active: None,
            tap: None,
            pending_tap: None,
            swipe_origin: None,
        }
    }

    /// Active thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &GestureThresholds { &self.thresholds }

    /// Replaces the thresholds. Takes effect on the next event.
    pub const fn set_thresholds(&mut self, thresholds: GestureThresholds) {
        self.thresholds = thresholds;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RecognizerState {
        match self.active {
            Some(kind) => RecognizerState::Recognized(kind),
            None if self.touches.is_empty() => RecognizerState::Idle,
            None => RecognizerState::Tracking(self.touches.len()),
        }
    }

    /// Feeds one event. Non-touch events are ignored.
    pub fn process(&mut self, event: &Event, ctx: &TouchContext) -> GestureEvents {
        let mut out = GestureEvents::new();
        match event {
            Event::TouchDown(touch) => {
                self.flush_into(touch.time, &mut out);
                self.on_down(touch, ctx, &mut out);
            }
            Event::TouchUp(touch) => {
                self.flush_into(touch.time, &mut out);
                self.on_up(touch, ctx, &mut out);
            }
            Event::TouchMove(touch) => {
                self.flush_into(touch.time, &mut out);
                self.on_move(touch, ctx, &mut out);
            }
            Event::TouchCancel(touch) => {
                self.flush_into(touch.time, &mut out);
                self.cancel(touch, &mut out);
            }
            _ => {}
        }
        out
    }

    /// Releases a pending tap whose pairing window has elapsed at `now`.
    pub fn flush(&mut self, now: f64) -> GestureEvents {
        let mut out = GestureEvents::new();
        self.flush_into(now, &mut out);
        out
    }

    /// Drops all state without emitting anything.
    pub fn reset(&mut self) {
        self.touches = TouchSequence::new();
        self.anchor = TouchSequence::new();
        self.active = None;
        self.tap = None;
        self.pending_tap = None;
        self.swipe_origin = None;
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn on_down(&mut self, touch: &TouchEvent, ctx: &TouchContext, out: &mut GestureEvents) {
        let previous = self.touches.len();
        let points = &touch.points;

        match points.len() {
            1 if previous == 0 => {
                if self.active.take().is_some() {
                    out.push(cancel_event(touch.time, points));
                }
                self.tap = points.get(0).map(|p| TapCandidate {
                    id: p.id,
                    down_time: touch.time,
                    start: ctx.to_dip(p.point),
                });
                self.swipe_origin = None;
            }
            2 => {
                self.tap = None;
                self.swipe_origin = None;
            }
            3 => {
                self.tap = None;
                if self.active.take().is_some() {
                    out.push(cancel_event(touch.time, points));
                }
                self.swipe_origin = points.centroid().map(|c| ctx.to_dip(c));
            }
            _ => {
                self.tap = None;
                self.swipe_origin = None;
                if self.active.take().is_some() {
                    out.push(cancel_event(touch.time, points));
                }
            }
        }

        self.touches = points.clone();
        self.anchor = points.clone();
    }

    fn on_up(&mut self, touch: &TouchEvent, ctx: &TouchContext, out: &mut GestureEvents) {
        let points = &touch.points;

        if points.is_empty() {
            if let Some(tap) = self.tap.take() {
                self.finish_tap(tap, touch.time, ctx, out);
            }
            self.swipe_origin = None;
        } else if points.len() != 3 {
            self.swipe_origin = None;
        }
        // Lifting a finger ends a continuous gesture without a cancel.
        self.active = None;

        self.touches = points.clone();
        self.anchor = points.clone();
    }

    fn on_move(&mut self, touch: &TouchEvent, ctx: &TouchContext, out: &mut GestureEvents) {
        let points = &touch.points;
        if !points.same_ids(&self.touches) {
            tracing::debug!(
                expected = self.touches.len(),
                received = points.len(),
                "touch ids lost correspondence, cancelling gesture"
            );
            self.cancel(touch, out);
            return;
        }

        match points.len() {
            2 => self.classify_pair(touch, ctx, out),
            3 => self.classify_swipe(touch, ctx, out),
            _ => {}
        }
        self.touches = points.clone();
    }

    fn cancel(&mut self, touch: &TouchEvent, out: &mut GestureEvents) {
        out.push(cancel_event(touch.time, &touch.points));
        self.active = None;
        self.tap = None;
        self.swipe_origin = None;
        self.touches = touch.points.clone();
        self.anchor = touch.points.clone();
    }

    // ------------------------------------------------------------------------
    // Taps
    // ------------------------------------------------------------------------

    fn finish_tap(&mut self, tap: TapCandidate, time: f64, ctx: &TouchContext, out: &mut GestureEvents) {
        let Some(last) = self.touches.find(tap.id).copied() else {
            return;
        };
        let dip = ctx.to_dip(last.point);
        let held = time - tap.down_time;
        if held > self.thresholds.tap_max_duration_secs {
            tracing::trace!(held, "contact held too long for a tap");
            return;
        }
        if tap.start.distance(dip) > self.thresholds.tap_radius_dip {
            return;
        }

        let current = PendingTap {
            time,
            point: last.point,
            dip,
            on_screen: last.on_screen,
        };
        if let Some(previous) = self.pending_tap.take() {
            let paired = time - previous.time <= self.thresholds.double_tap_window_secs
                && previous.dip.distance(dip) <= self.thresholds.tap_radius_dip;
            if paired {
                out.push(Event::GestureDoubleTap(GestureEvent::at(
                    time,
                    current.point,
                    current.on_screen,
                )));
                return;
            }
            out.push(tap_event(&previous));
        }
        self.pending_tap = Some(current);
    }

    fn flush_into(&mut self, now: f64, out: &mut GestureEvents) {
        let expired = self
            .pending_tap
            .is_some_and(|tap| now - tap.time > self.thresholds.double_tap_window_secs);
        if expired && let Some(tap) = self.pending_tap.take() {
            out.push(tap_event(&tap));
        }
    }

    // ------------------------------------------------------------------------
    // Two fingers
    // ------------------------------------------------------------------------

    fn classify_pair(&mut self, touch: &TouchEvent, ctx: &TouchContext, out: &mut GestureEvents) {
        let Some((a1, b1)) = pair(&touch.points) else { return };
        let (Some(a0), Some(b0)) = (self.anchor.find(a1.id), self.anchor.find(b1.id)) else {
            return;
        };

        let (pa0, pb0) = (ctx.to_dip(a0.point), ctx.to_dip(b0.point));
        let (pa1, pb1) = (ctx.to_dip(a1.point), ctx.to_dip(b1.point));
        let before = pa0.vector_to(pb0);
        let after = pa1.vector_to(pb1);

        let pinch = after.length() - before.length();
        let min_sep = self.thresholds.rotate_min_separation_dip;
        let angle = if before.length() > min_sep && after.length() > min_sep {
            before.cross(after).atan2(before.dot(after))
        } else {
            0.0
        };
        let pan = pa0
            .distance(pa1)
            .min(pb0.distance(pb1))
            .min(pa0.midpoint(pb0).distance(pa1.midpoint(pb1)));

        let candidates = [
            (GestureKind::Rotate, angle.abs().to_degrees(), self.thresholds.rotate_deg),
            (GestureKind::Pinch, pinch.abs(), self.thresholds.pinch_dip),
            (GestureKind::Pan, pan, self.thresholds.pan_dip),
        ];
        let Some(kind) = candidates
            .iter()
            .find(|(kind, magnitude, tier)| *magnitude > self.limit_for(*kind, tier))
            .map(|(kind, _, _)| *kind)
        else {
            return;
        };

        if let Some(previous) = self.active
            && previous != kind
        {
            out.push(cancel_event(touch.time, &touch.points));
        }
        self.active = Some(kind);

        let on_screen = touch.points.any_on_screen();
        let mut payload = GestureEvent::at(touch.time, a1.point, on_screen);
        payload.point_b = b1.point;
        let event = match kind {
            GestureKind::Rotate => {
                payload.value = angle;
                Event::GestureRotate(payload)
            }
            GestureKind::Pinch => {
                payload.value = pinch;
                Event::GesturePinch(payload)
            }
            GestureKind::Pan => {
                let mid_before = a0.point.midpoint(b0.point);
                let mid_after = a1.point.midpoint(b1.point);
                payload.point_a = mid_after;
                payload.point_b = mid_after;
                payload.delta = mid_before.vector_to(mid_after);
                Event::GesturePan(payload)
            }
        };
        out.push(event);
        self.anchor = touch.points.clone();
    }

    fn limit_for(&self, kind: GestureKind, tier: &ThresholdTier) -> f64 {
        match self.active {
            None => tier.from_idle,
            Some(active) if active == kind => tier.update,
            Some(_) => tier.break_other,
        }
    }

    // ------------------------------------------------------------------------
    // Three fingers
    // ------------------------------------------------------------------------

    fn classify_swipe(&mut self, touch: &TouchEvent, ctx: &TouchContext, out: &mut GestureEvents) {
        let (Some(origin), Some(centroid)) = (self.swipe_origin, touch.points.centroid()) else {
            return;
        };
        let shift = origin.vector_to(ctx.to_dip(centroid));
        let distance = self.thresholds.swipe_distance_dip;
        let tolerance = self.thresholds.swipe_tolerance_dip;

        let target = if shift.y.abs() < tolerance && shift.x.abs() >= distance {
            if shift.x < 0.0 { NavigateTarget::Forward } else { NavigateTarget::Backward }
        } else if shift.x.abs() < tolerance && shift.y.abs() >= distance {
            if shift.y > 0.0 { NavigateTarget::Top } else { NavigateTarget::Bottom }
        } else {
            return;
        };

        tracing::debug!(?target, "three-finger swipe");
        out.push(Event::Navigate(NavigateEvent { time: touch.time, target }));
        self.swipe_origin = None;
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn pair(points: &TouchSequence) -> Option<(TouchPoint, TouchPoint)> {
    Some((*points.get(0)?, *points.get(1)?))
}

fn tap_event(tap: &PendingTap) -> Event {
    Event::GestureTap(GestureEvent::at(tap.time, tap.point, tap.on_screen))
}

fn cancel_event(time: f64, points: &TouchSequence) -> Event {
    let at = points.centroid().unwrap_or_default();
    Event::GestureCancel(GestureEvent::at(time, at, points.any_on_screen()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    /// 1000x1000 px window at scale 1, so 0.001 normalized == 1 dip.
    const CTX: TouchContext = TouchContext::new(1000.0, 1000.0, 1.0);

    fn seq(points: &[(i64, f64, f64)]) -> TouchSequence {
        TouchSequence::from_points(points.iter().map(|&(id, x, y)| TouchPoint::new(id, x, y)))
    }

    fn down(time: f64, points: &[(i64, f64, f64)]) -> Event {
        Event::TouchDown(TouchEvent { time, points: seq(points) })
    }

    fn up(time: f64, points: &[(i64, f64, f64)]) -> Event {
        Event::TouchUp(TouchEvent { time, points: seq(points) })
    }

    fn moved(time: f64, points: &[(i64, f64, f64)]) -> Event {
        Event::TouchMove(TouchEvent { time, points: seq(points) })
    }

    fn kinds(events: &[Event]) -> Vec<EventKind> { events.iter().map(Event::kind).collect() }

    fn count(events: &[Event], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind() == kind).count()
    }

    fn run(recognizer: &mut GestureRecognizer, events: &[Event]) -> Vec<Event> {
        events.iter().flat_map(|e| recognizer.process(e, &CTX)).collect()
    }

    /// Two fingers around `(cx, cy)` (dip) at `radius` dip, rotated by `deg`.
    fn finger_pair(cx: f64, cy: f64, radius: f64, deg: f64) -> [(i64, f64, f64); 2] {
        let (sin, cos) = deg.to_radians().sin_cos();
        [
            (1, (cx - radius * cos) / 1000.0, (cy - radius * sin) / 1000.0),
            (2, (cx + radius * cos) / 1000.0, (cy + radius * sin) / 1000.0),
        ]
    }

    fn two_finger_start(recognizer: &mut GestureRecognizer) {
        let [a, b] = finger_pair(500.0, 500.0, 100.0, 0.0);
        run(recognizer, &[down(0.0, &[a]), down(0.01, &[a, b])]);
    }

    #[test]
    fn test_double_tap_within_window() {
        let mut recognizer = GestureRecognizer::default();
        let mut events = run(&mut recognizer, &[
            down(0.0, &[(1, 0.5, 0.5)]),
            up(0.1, &[]),
            down(0.3, &[(2, 0.505, 0.5)]),
            up(0.35, &[]),
        ]);
        events.extend(recognizer.flush(2.0));

        assert_eq!(count(&events, EventKind::GestureDoubleTap), 1);
        assert_eq!(count(&events, EventKind::GestureTap), 0);
    }

    #[test]
    fn test_taps_outside_window_are_single() {
        let mut recognizer = GestureRecognizer::default();
        let mut events = run(&mut recognizer, &[
            down(0.0, &[(1, 0.5, 0.5)]),
            up(0.1, &[]),
            down(1.0, &[(2, 0.5, 0.5)]),
            up(1.1, &[]),
        ]);
        events.extend(recognizer.flush(2.0));

        assert_eq!(count(&events, EventKind::GestureTap), 2);
        assert_eq!(count(&events, EventKind::GestureDoubleTap), 0);
    }

    #[test]
    fn test_far_apart_taps_are_single() {
        let mut recognizer = GestureRecognizer::default();
        let mut events = run(&mut recognizer, &[
            down(0.0, &[(1, 0.2, 0.5)]),
            up(0.1, &[]),
            down(0.2, &[(2, 0.8, 0.5)]),
            up(0.3, &[]),
        ]);
        events.extend(recognizer.flush(1.0));
        assert_eq!(kinds(&events), vec![EventKind::GestureTap, EventKind::GestureTap]);
    }

    #[test]
    fn test_pending_tap_waits_for_window() {
        let mut recognizer = GestureRecognizer::default();
        let events = run(&mut recognizer, &[down(0.0, &[(1, 0.5, 0.5)]), up(0.1, &[])]);
        assert!(events.is_empty());
        assert!(recognizer.flush(0.4).is_empty());
        assert_eq!(kinds(&recognizer.flush(0.7)), vec![EventKind::GestureTap]);
    }

    #[test]
    fn test_long_press_is_not_a_tap() {
        let mut recognizer = GestureRecognizer::default();
        let mut events = run(&mut recognizer, &[down(0.0, &[(1, 0.5, 0.5)]), up(2.0, &[])]);
        events.extend(recognizer.flush(5.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_second_finger_cancels_tap() {
        let mut recognizer = GestureRecognizer::default();
        let mut events = run(&mut recognizer, &[
            down(0.0, &[(1, 0.5, 0.5)]),
            down(0.05, &[(1, 0.5, 0.5), (2, 0.6, 0.5)]),
            up(0.1, &[(1, 0.5, 0.5)]),
            up(0.12, &[]),
        ]);
        events.extend(recognizer.flush(2.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_pinch_needs_from_idle_threshold() {
        let mut recognizer = GestureRecognizer::default();
        two_finger_start(&mut recognizer);

        let events = run(&mut recognizer, &[moved(0.1, &finger_pair(500.0, 500.0, 101.5, 0.0))]);
        assert!(events.is_empty());
        assert_eq!(recognizer.state(), RecognizerState::Tracking(2));
    }

    #[test]
    fn test_active_pinch_tracks_small_motion() {
        let mut recognizer = GestureRecognizer::default();
        two_finger_start(&mut recognizer);

        let started = run(&mut recognizer, &[moved(0.1, &finger_pair(500.0, 500.0, 105.0, 0.0))]);
        assert_eq!(kinds(&started), vec![EventKind::GesturePinch]);

        let update = run(&mut recognizer, &[moved(0.2, &finger_pair(500.0, 500.0, 106.5, 0.0))]);
        assert_eq!(kinds(&update), vec![EventKind::GesturePinch]);
        if let Event::GesturePinch(pinch) = &update[0] {
            assert!((pinch.value - 3.0).abs() < 1e-6);
        }
        assert_eq!(recognizer.state(), RecognizerState::Recognized(GestureKind::Pinch));
    }

    #[test]
    fn test_rotation_update_is_looser_than_start() {
        let thresholds = GestureThresholds {
            rotate_deg: ThresholdTier::new(4.0, 2.0, 20.0),
            ..GestureThresholds::default()
        };

        // 3 degrees and 2 dip of pinch from idle: nothing clears its tier
        let mut idle = GestureRecognizer::new(thresholds);
        two_finger_start(&mut idle);
        let events = run(&mut idle, &[moved(0.1, &finger_pair(500.0, 500.0, 101.0, 3.0))]);
        assert!(events.is_empty());

        // The same motion while rotating continues the rotation
        let mut rotating = GestureRecognizer::new(thresholds);
        two_finger_start(&mut rotating);
        let started = run(&mut rotating, &[moved(0.1, &finger_pair(500.0, 500.0, 100.0, 10.0))]);
        assert_eq!(kinds(&started), vec![EventKind::GestureRotate]);

        let events = run(&mut rotating, &[moved(0.2, &finger_pair(500.0, 500.0, 101.0, 13.0))]);
        assert_eq!(kinds(&events), vec![EventKind::GestureRotate]);
        if let Event::GestureRotate(rotate) = &events[0] {
            assert!((rotate.value.to_degrees() - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rotation_ignored_when_fingers_close() {
        let mut recognizer = GestureRecognizer::default();
        let [a, b] = finger_pair(500.0, 500.0, 20.0, 0.0);
        run(&mut recognizer, &[down(0.0, &[a]), down(0.01, &[a, b])]);

        let events = run(&mut recognizer, &[moved(0.1, &finger_pair(500.0, 500.0, 20.0, 30.0))]);
        assert!(!events.iter().any(|e| e.kind() == EventKind::GestureRotate));
    }

    #[test]
    fn test_pan_breaks_active_pinch_only_past_break_threshold() {
        let mut recognizer = GestureRecognizer::default();
        two_finger_start(&mut recognizer);
        run(&mut recognizer, &[moved(0.1, &finger_pair(500.0, 500.0, 110.0, 0.0))]);

        // 10 dip of pan is below the break tier
        let small = run(&mut recognizer, &[moved(0.2, &finger_pair(510.0, 500.0, 110.0, 0.0))]);
        assert!(small.is_empty());

        // 25 dip from the anchor clears it
        let large = run(&mut recognizer, &[moved(0.3, &finger_pair(525.0, 500.0, 110.0, 0.0))]);
        assert_eq!(kinds(&large), vec![EventKind::GestureCancel, EventKind::GesturePan]);
        if let Event::GesturePan(pan) = &large[1] {
            assert!((pan.delta.x - 0.025).abs() < 1e-9);
        }
        assert_eq!(recognizer.state(), RecognizerState::Recognized(GestureKind::Pan));
    }

    #[test]
    fn test_three_finger_swipe_navigates_once() {
        let mut recognizer = GestureRecognizer::default();
        let start = [(1, 0.4, 0.5), (2, 0.5, 0.5), (3, 0.6, 0.5)];
        run(&mut recognizer, &[
            down(0.0, &start[..1]),
            down(0.01, &start[..2]),
            down(0.02, &start),
        ]);

        let left = [(1, 0.2, 0.51), (2, 0.3, 0.51), (3, 0.4, 0.51)];
        let further = [(1, 0.1, 0.51), (2, 0.2, 0.51), (3, 0.3, 0.51)];
        let events = run(&mut recognizer, &[moved(0.1, &left), moved(0.2, &further)]);

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::Navigate(NavigateEvent { target: NavigateTarget::Forward, .. })
        ));
    }

    #[test]
    fn test_vertical_swipe_maps_to_top() {
        let mut recognizer = GestureRecognizer::default();
        let start = [(1, 0.4, 0.3), (2, 0.5, 0.3), (3, 0.6, 0.3)];
        run(&mut recognizer, &[down(0.0, &start[..1]), down(0.01, &start[..2]), down(0.02, &start)]);

        let lower = [(1, 0.4, 0.5), (2, 0.5, 0.5), (3, 0.6, 0.5)];
        let events = run(&mut recognizer, &[moved(0.1, &lower)]);
        assert!(matches!(
            events.as_slice(),
            [Event::Navigate(NavigateEvent { target: NavigateTarget::Top, .. })]
        ));
    }

    #[test]
    fn test_unknown_touch_id_cancels() {
        let mut recognizer = GestureRecognizer::default();
        two_finger_start(&mut recognizer);
        run(&mut recognizer, &[moved(0.1, &finger_pair(500.0, 500.0, 110.0, 0.0))]);

        let events = run(&mut recognizer, &[moved(0.2, &[(1, 0.4, 0.5), (7, 0.6, 0.5)])]);
        assert_eq!(kinds(&events), vec![EventKind::GestureCancel]);
        assert_eq!(recognizer.state(), RecognizerState::Tracking(2));
    }

    #[test]
    fn test_touch_cancel_resets() {
        let mut recognizer = GestureRecognizer::default();
        two_finger_start(&mut recognizer);
        let events = run(&mut recognizer, &[Event::TouchCancel(TouchEvent {
            time: 0.2,
            points: TouchSequence::new(),
        })]);
        assert_eq!(kinds(&events), vec![EventKind::GestureCancel]);
        assert_eq!(recognizer.state(), RecognizerState::Idle);
    }

    #[test]
    fn test_dip_conversion_uses_scale() {
        let ctx = TouchContext::new(2000.0, 1000.0, 2.0);
        let dip = ctx.to_dip(PointD::new(0.5, 0.5));
        assert!((dip.x - 500.0).abs() < 1e-12);
        assert!((dip.y - 250.0).abs() < 1e-12);
    }
}
