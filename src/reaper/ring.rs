// src/reaper/ring.rs

//! Fixed-capacity single-producer/single-consumer event ring.
//!
//! The producer is the SIGCHLD handler, the consumer is the main thread's
//! notifier. Both sides only touch atomics; the slot storage is allocated
//! once, before the handler is installed, and never resized.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::event::StatusEvent;

#[derive(Debug)]
pub struct EventRing {
    slots: Box<[AtomicU64]>,
    mask: usize,
    /// Next slot to read. Written only by the consumer.
    head: AtomicUsize,
    /// Next slot to write. Written only by the producer.
    tail: AtomicUsize,
    dropped: AtomicUsize,
    dirty: AtomicBool,
}

impl EventRing {
    /// Capacity is rounded up to a power of two (minimum 2).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        let slots = (0..capacity).map(|_| AtomicU64::new(0)).collect();
        Self {
            slots,
            mask: capacity - 1,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Producer side. Async-signal-safe: no allocation, no locks.
    ///
    /// Returns false (and counts the loss) when the ring is full. The dirty
    /// flag is raised either way.
    pub fn push(&self, event: StatusEvent) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let stored = if tail.wrapping_sub(head) >= self.slots.len() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        } else {
            self.slots[tail & self.mask].store(event.pack(), Ordering::Relaxed);
            self.tail.store(tail.wrapping_add(1), Ordering::Release);
            true
        };

        self.dirty.store(true, Ordering::Release);
        stored
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<StatusEvent> {
        loop {
            let head = self.head.load(Ordering::Relaxed);
            let tail = self.tail.load(Ordering::Acquire);
            if head == tail {
                return None;
            }

            let word = self.slots[head & self.mask].load(Ordering::Relaxed);
            self.head.store(head.wrapping_add(1), Ordering::Release);

            if let Some(event) = StatusEvent::unpack(word) {
                return Some(event);
            }
        }
    }

    /// Clear and return the dirty flag.
    ///
    /// Clear it *before* draining so that anything pushed mid-drain raises
    /// it again for the next cycle.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Number of events lost to a full ring since the last call.
    pub fn take_dropped(&self) -> usize {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
