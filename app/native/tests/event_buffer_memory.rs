//! Allocation behavior of the event double buffer.
//!
//! A counting global allocator tracks allocations made by the current
//! thread, so tests in this binary can run in parallel without seeing each
//! other's allocations.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use duoview_lib::events::{BasicEvent, Event, EventBuffer, FileDropEvent, KeyEvent, VirtKey};

// ============================================================================
// Counting allocator
// ============================================================================

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

#[allow(clippy::cast_possible_wrap)]
fn record(delta: isize, is_alloc: bool) {
    let _ = ALLOCATIONS.try_with(|count| {
        if is_alloc {
            count.set(count.get() + 1);
        }
    });
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

#[allow(clippy::cast_possible_wrap)]
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record(layout.size() as isize, true);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        record(-(layout.size() as isize), false);
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record(new_size as isize - layout.size() as isize, true);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn allocations() -> usize { ALLOCATIONS.with(Cell::get) }

fn live_bytes() -> isize { LIVE_BYTES.with(Cell::get) }

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_steady_state_swaps_do_not_allocate() {
    let mut buffer = EventBuffer::with_capacity(64);
    let key = Event::KeyDown(KeyEvent::new(0.0, VirtKey(b'A')));

    // Both sides already hold their full capacity; one round trip proves it
    for _ in 0..2 {
        for _ in 0..64 {
            buffer.append(&key);
        }
        buffer.swap_buffers();
    }

    let before = allocations();
    for tick in 0..100 {
        for n in 0..32 {
            buffer.append(&Event::Close(BasicEvent { time: f64::from(tick * 32 + n) }));
        }
        buffer.swap_buffers();
        assert_eq!(buffer.len(), 32);
    }
    assert_eq!(allocations(), before);
}

#[test]
fn test_file_drop_payloads_are_released_after_two_swaps() {
    let mut buffer = EventBuffer::with_capacity(8);
    let baseline = live_bytes();

    let drop_event = Event::FileDrop(FileDropEvent {
        time: 1.0,
        files: vec!["/tmp/left.png".to_string(), "/tmp/right.png".to_string()],
    });
    assert!(buffer.append(&drop_event));
    drop(drop_event);
    assert!(live_bytes() > baseline);

    buffer.swap_buffers();
    let Some(Event::FileDrop(event)) = buffer.event(0) else {
        panic!("expected file drop");
    };
    assert_eq!(event.files.len(), 2);

    // The first swap publishes, the second recycles the slot
    buffer.swap_buffers();
    assert!(buffer.is_empty());
    assert_eq!(live_bytes(), baseline);
}

#[test]
fn test_overflow_does_not_allocate() {
    let mut buffer = EventBuffer::with_capacity(4);
    let event = Event::Close(BasicEvent { time: 0.0 });
    for _ in 0..4 {
        assert!(buffer.append(&event));
    }

    // The first drop registers its log callsite
    assert!(!buffer.append(&event));

    let before = allocations();
    for _ in 0..99 {
        assert!(!buffer.append(&event));
    }
    assert_eq!(allocations(), before);
    assert_eq!(buffer.dropped(), 100);

    buffer.swap_buffers();
    assert_eq!(buffer.len(), 4);
}
