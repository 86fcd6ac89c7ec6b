//! Capture thread lifecycle.
//!
//! The capture thread owns the [`NativeEventSource`] and pumps it until the
//! window is stopped or the source reports the native window closed.
//! [`CaptureThread::start`] returns once the source has opened (or failed
//! to); [`CaptureThread::stop`] asks the loop to exit and joins it.
//!
//! Both waits are bounded by a liveness limit checked in steps. A thread
//! that does not finish within the limit is logged as an error and detached,
//! leaking whatever it holds, so that shutdown can make progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::backend::{NativeEventSource, PumpStatus};
use super::shared::WindowSink;
use crate::constants::timing::{CAPTURE_WAIT_LIMIT_MS, CAPTURE_WAIT_STEP_MS, PUMP_TIMEOUT_MS};
use crate::error::{DuoviewError, DuoviewResult};
use crate::events::{BasicEvent, Event, uptime};
use crate::platform::spawn_named_thread;

/// Liveness limits of the capture thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTiming {
    /// Interval between two "still waiting" checks.
    pub step: Duration,
    /// Total wait before the thread is given up on.
    pub limit: Duration,
    /// Timeout passed to each pump call.
    pub pump: Duration,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(CAPTURE_WAIT_STEP_MS),
            limit: Duration::from_millis(CAPTURE_WAIT_LIMIT_MS),
            pump: Duration::from_millis(PUMP_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Starting,
    Running,
    Failed(String),
    Finished,
}

#[derive(Debug)]
struct Handshake {
    phase: Mutex<Phase>,
    changed: Condvar,
}

impl Handshake {
    fn set(&self, phase: Phase) {
        *self.phase.lock() = phase;
        self.changed.notify_all();
    }

    /// Waits in steps while `pending` holds. Returns false when the limit
    /// was reached.
    fn wait(&self, timing: CaptureTiming, pending: impl Fn(&Phase) -> bool) -> bool {
        let mut phase = self.phase.lock();
        let mut waited = Duration::ZERO;
        while pending(&phase) {
            if waited >= timing.limit {
                return false;
            }
            let step = timing.step.min(timing.limit - waited);
            let result = self.changed.wait_while_for(&mut phase, |p| pending(p), step);
            waited += step;
            if result.timed_out() && waited < timing.limit {
                tracing::warn!(waited_ms = waited.as_millis(), "capture thread still busy");
            }
        }
        true
    }
}

/// Marks the handshake failed when the capture closure unwinds, so neither
/// `start` nor `stop` sits out the full liveness limit.
struct UnwindGuard(Arc<Handshake>);

impl Drop for UnwindGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.set(Phase::Failed("capture thread panicked".to_string()));
        }
    }
}

/// Running capture thread.
#[derive(Debug)]
pub struct CaptureThread {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    handshake: Arc<Handshake>,
    timing: CaptureTiming,
}

impl CaptureThread {
    /// Spawns the capture thread with the default liveness limits.
    ///
    /// # Errors
    ///
    /// Returns an error when the thread cannot be spawned, when the source
    /// fails to open, or when opening exceeds the liveness limit.
    pub fn start<S>(source: S, sink: WindowSink) -> DuoviewResult<Self>
    where
        S: NativeEventSource + 'static,
    {
        Self::start_with_timing(source, sink, CaptureTiming::default())
    }

    /// Spawns the capture thread with explicit liveness limits.
    ///
    /// # Errors
    ///
    /// See [`CaptureThread::start`].
    pub fn start_with_timing<S>(mut source: S, sink: WindowSink, timing: CaptureTiming) -> DuoviewResult<Self>
    where
        S: NativeEventSource + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let handshake = Arc::new(Handshake {
            phase: Mutex::new(Phase::Starting),
            changed: Condvar::new(),
        });

        let handle = {
            let running = Arc::clone(&running);
            let handshake = Arc::clone(&handshake);
            spawn_named_thread("capture", move || {
                let _guard = UnwindGuard(Arc::clone(&handshake));
                if let Err(err) = source.open() {
                    handshake.set(Phase::Failed(err.to_string()));
                    return;
                }
                handshake.set(Phase::Running);
                tracing::debug!("capture thread running");

                while running.load(Ordering::Acquire) {
                    if source.pump(&sink, timing.pump) == PumpStatus::Closed {
                        tracing::debug!("native window closed");
                        if !sink.is_close_requested() {
                            sink.post(&Event::Close(BasicEvent { time: uptime() }));
                        }
                        break;
                    }
                }

                source.close();
                handshake.set(Phase::Finished);
            })
        }
        .ok_or_else(|| DuoviewError::ThreadError("failed to spawn capture thread".to_string()))?;

        let mut thread = Self {
            handle: Some(handle),
            running,
            handshake,
            timing,
        };

        if !thread.handshake.wait(timing, |phase| *phase == Phase::Starting) {
            thread.stop();
            return Err(DuoviewError::ThreadError("capture thread did not start in time".to_string()));
        }

        let phase = thread.handshake.phase.lock().clone();
        if let Phase::Failed(message) = phase {
            thread.join();
            return Err(DuoviewError::PlatformError(message));
        }

        tracing::info!("capture thread started");
        Ok(thread)
    }

    /// Returns true while the pump loop runs.
    #[must_use]
    pub fn is_running(&self) -> bool { *self.handshake.phase.lock() == Phase::Running }

    /// Stops the pump loop and joins the thread.
    ///
    /// Returns false when the thread did not finish within the liveness
    /// limit and was detached.
    pub fn stop(&mut self) -> bool {
        if self.handle.is_none() {
            return true;
        }
        self.running.store(false, Ordering::Release);

        let finished = self
            .handshake
            .wait(self.timing, |phase| matches!(phase, Phase::Starting | Phase::Running));
        if finished {
            self.join();
            tracing::debug!("capture thread stopped");
        } else {
            tracing::error!(
                limit_ms = self.timing.limit.as_millis(),
                "capture thread unresponsive, detaching it"
            );
            self.handle = None;
        }
        finished
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("capture thread panicked");
        }
    }
}

impl Drop for CaptureThread {
    fn drop(&mut self) { self.stop(); }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::events::EventBuffer;
    use crate::window::backend::ScriptedEventSource;
    use crate::window::shared::WindowShared;

    fn sink() -> (EventBuffer, WindowSink) {
        let buffer = EventBuffer::with_capacity(16);
        let sink = WindowSink::new(Arc::new(WindowShared::new(buffer.sender())));
        (buffer, sink)
    }

    fn fast() -> CaptureTiming {
        CaptureTiming {
            step: Duration::from_millis(20),
            limit: Duration::from_millis(100),
            pump: Duration::from_millis(1),
        }
    }

    /// Source whose pump never returns while `stuck` is set.
    #[derive(Debug)]
    struct StuckSource {
        stuck: Arc<AtomicBool>,
        pumps: Arc<AtomicUsize>,
    }

    impl NativeEventSource for StuckSource {
        fn open(&mut self) -> DuoviewResult<()> { Ok(()) }

        fn pump(&mut self, _sink: &WindowSink, timeout: Duration) -> PumpStatus {
            self.pumps.fetch_add(1, Ordering::SeqCst);
            while self.stuck.load(Ordering::SeqCst) {
                std::thread::sleep(timeout);
            }
            PumpStatus::Continue
        }
    }

    #[test]
    fn test_start_and_stop() {
        let (_, sink) = sink();
        let mut thread = CaptureThread::start_with_timing(ScriptedEventSource::new([]), sink, fast()).unwrap();
        assert!(thread.is_running());
        assert!(thread.stop());
        assert!(!thread.is_running());
        assert!(thread.stop());
    }

    #[test]
    fn test_open_failure_is_reported() {
        let (_, sink) = sink();
        let err = CaptureThread::start_with_timing(ScriptedEventSource::new([]).failing_open(), sink, fast())
            .unwrap_err();
        assert!(matches!(err, DuoviewError::PlatformError(_)));
    }

    #[test]
    fn test_closed_source_posts_close() {
        let (mut buffer, sink) = sink();
        let mut thread =
            CaptureThread::start_with_timing(ScriptedEventSource::new([]).close_when_done(), sink, fast()).unwrap();
        assert!(thread.stop());

        buffer.swap_buffers();
        assert!(matches!(buffer.event(0), Some(Event::Close(_))));
    }

    /// Source that panics in `open`, or in `pump` once `armed` is set.
    #[derive(Debug)]
    struct PanickingSource {
        armed: Option<Arc<AtomicBool>>,
    }

    impl NativeEventSource for PanickingSource {
        fn open(&mut self) -> DuoviewResult<()> {
            if self.armed.is_none() {
                panic!("display connection lost");
            }
            Ok(())
        }

        fn pump(&mut self, _sink: &WindowSink, timeout: Duration) -> PumpStatus {
            while let Some(armed) = &self.armed
                && !armed.load(Ordering::SeqCst)
            {
                std::thread::sleep(timeout);
            }
            panic!("message pump crashed");
        }
    }

    fn slow() -> CaptureTiming { CaptureTiming { limit: Duration::from_secs(30), ..fast() } }

    #[test]
    fn test_panic_in_open_fails_fast() {
        let (_, sink) = sink();
        let started = std::time::Instant::now();
        let err = CaptureThread::start_with_timing(PanickingSource { armed: None }, sink, slow()).unwrap_err();

        assert!(matches!(err, DuoviewError::PlatformError(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_panic_in_pump_stops_fast() {
        let (_, sink) = sink();
        let armed = Arc::new(AtomicBool::new(false));
        let source = PanickingSource { armed: Some(Arc::clone(&armed)) };
        let mut thread = CaptureThread::start_with_timing(source, sink, slow()).unwrap();
        assert!(thread.is_running());

        armed.store(true, Ordering::SeqCst);
        let started = std::time::Instant::now();
        assert!(thread.stop());
        assert!(!thread.is_running());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_unresponsive_thread_is_detached() {
        let (_, sink) = sink();
        let stuck = Arc::new(AtomicBool::new(true));
        let pumps = Arc::new(AtomicUsize::new(0));
        let source = StuckSource { stuck: Arc::clone(&stuck), pumps: Arc::clone(&pumps) };

        let mut thread = CaptureThread::start_with_timing(source, sink, fast()).unwrap();
        while pumps.load(Ordering::SeqCst) == 0 {
            std::thread::yield_now();
        }
        assert!(!thread.stop());

        // Let the detached thread exit
        stuck.store(false, Ordering::SeqCst);
    }
}
