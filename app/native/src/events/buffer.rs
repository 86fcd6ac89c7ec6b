//! Double-buffered event queue between the capture and consumer threads.
//!
//! Producers append to the write side through an [`EventSender`] from any
//! thread. The consumer owns the [`EventBuffer`] and the read side: it calls
//! [`EventBuffer::swap_buffers`] once per tick and then walks the read side
//! without taking any lock.
//!
//! # Overflow
//!
//! Each side holds at most `capacity` events. Events appended while the write
//! side is full are dropped and counted; delivery is best effort and a full
//! queue is never reported as an error.
//!
//! # Memory
//!
//! Appending clones the event, so variable-length payloads (dropped file
//! paths) are owned by the queue. They are released when the slot is
//! recycled on the next swap, or when the buffer itself is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::Event;
use crate::constants::queue::DEFAULT_CAPACITY;

// ============================================================================
// Write side
// ============================================================================

/// Write side shared by all producers.
#[derive(Debug)]
struct WriteSide {
    events: Mutex<Vec<Event>>,
    capacity: usize,
    dropped: AtomicU64,
}

impl WriteSide {
    fn append(&self, event: &Event) -> bool {
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            drop(events);
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::trace!(kind = ?event.kind(), dropped = total, "event queue full, dropping event");
            return false;
        }
        events.push(event.clone());
        true
    }
}

/// Cheap, clonable producer handle.
#[derive(Debug, Clone)]
pub struct EventSender {
    write: Arc<WriteSide>,
}

impl EventSender {
    /// Appends a copy of `event` to the write side.
    ///
    /// Returns false when the event was dropped because the queue is full.
    pub fn append(&self, event: &Event) -> bool { self.write.append(event) }

    /// Number of events dropped so far because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 { self.write.dropped.load(Ordering::Relaxed) }
}

// ============================================================================
// EventBuffer
// ============================================================================

/// Consumer side of the double buffer.
#[derive(Debug)]
pub struct EventBuffer {
    write: Arc<WriteSide>,
    read: Vec<Event>,
}

impl Default for EventBuffer {
    fn default() -> Self { Self::with_capacity(DEFAULT_CAPACITY) }
}

impl EventBuffer {
    /// Creates a buffer whose sides hold `capacity` events each.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            write: Arc::new(WriteSide {
                events: Mutex::new(Vec::with_capacity(capacity)),
                capacity,
                dropped: AtomicU64::new(0),
            }),
            read: Vec::with_capacity(capacity),
        }
    }

    /// Returns a producer handle.
    #[must_use]
    pub fn sender(&self) -> EventSender { EventSender { write: Arc::clone(&self.write) } }

    /// Appends a copy of `event` to the write side.
    pub fn append(&self, event: &Event) -> bool { self.write.append(event) }

    /// Maximum number of events per side.
    #[must_use]
    pub fn capacity(&self) -> usize { self.write.capacity }

    /// Number of events dropped so far because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 { self.write.dropped.load(Ordering::Relaxed) }

    /// Publishes everything appended since the last swap to the read side.
    ///
    /// Events left on the read side from the previous tick are released
    /// first, outside the lock.
    pub fn swap_buffers(&mut self) {
        self.read.clear();
        let mut write = self.write.events.lock();
        std::mem::swap(&mut *write, &mut self.read);
    }

    /// Number of events on the read side.
    #[must_use]
    pub fn len(&self) -> usize { self.read.len() }

    /// Returns true when the read side is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.read.is_empty() }

    /// Event at `index` on the read side.
    #[must_use]
    pub fn event(&self, index: usize) -> Option<&Event> { self.read.get(index) }

    /// Mutable access to an event on the read side.
    pub fn event_mut(&mut self, index: usize) -> Option<&mut Event> { self.read.get_mut(index) }

    /// Read-side events in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> { self.read.iter() }

    /// Discards everything on both sides.
    pub fn reset(&mut self) {
        self.read.clear();
        self.write.events.lock().clear();
    }
}
