//! Lock-Free Sample Ring Implementation

use crate::Sample;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default ring capacity (4096 samples = 32 s at 128 Hz)
pub const DEFAULT_CAPACITY: usize = 4096;

/// Lock-free SPSC ring buffer for timestamped samples.
///
/// Exactly one producer calls [`push`](SampleRing::push) and exactly one
/// consumer calls [`pop_all`](SampleRing::pop_all). `head` and `tail` are
/// unbounded monotonic counters; slot indices are `counter & mask`, which
/// requires the capacity to be a power of two (rounded up at construction).
///
/// Overflow policy is drop-oldest: when the unread span would exceed the
/// capacity, the producer advances `tail` and the oldest unread samples are
/// overwritten. This keeps memory bounded and favors recency, which is what
/// a live signal consumer wants. A consumer that must see every sample has
/// to drain at least once per `capacity()` pushes.
pub struct SampleRing {
    /// Pre-allocated slot storage, length is a power of two
    storage: Box<[Sample]>,
    /// Index mask (capacity - 1)
    mask: u64,
    /// Capacity of the buffer
    capacity: usize,
    /// Next write position (unbounded counter)
    head: AtomicU64,
    /// Next read position (unbounded counter)
    tail: AtomicU64,
    /// Total samples written (for statistics)
    total_pushed: AtomicU64,
}

impl SampleRing {
    /// Create a new ring; `capacity` is rounded up to the next power of two.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        let storage: Vec<Sample> = (0..capacity).map(|_| Sample::default()).collect();
        Self {
            storage: storage.into_boxed_slice(),
            mask: (capacity - 1) as u64,
            capacity,
            head: AtomicU64::new(0),
            tail: AtomicU64::new(0),
            total_pushed: AtomicU64::new(0),
        }
    }

    /// Create a ring with the default capacity (4096 samples)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push one sample (producer side). Never blocks, never fails, O(1).
    ///
    /// The slot write happens before the `Release` store of `head`, so a
    /// consumer that `Acquire`-loads `head` observes every slot below it.
    pub fn push(&self, sample: Sample) {
        let head = self.head.load(Ordering::Relaxed);

        // SAFETY: single producer, slots below head+capacity are ours to write
        unsafe {
            let ptr = self.storage.as_ptr() as *mut Sample;
            std::ptr::write(ptr.add((head & self.mask) as usize), sample);
        }

        let next = head + 1;
        self.head.store(next, Ordering::Release);
        self.total_pushed.fetch_add(1, Ordering::Relaxed);

        // Drop-oldest: keep the unread span within capacity
        let tail = self.tail.load(Ordering::Acquire);
        if next - tail > self.capacity as u64 {
            self.tail.store(next - self.capacity as u64, Ordering::Release);
        }
    }

    /// Drain every unread sample in write order (consumer side).
    ///
    /// Returns an empty Vec when nothing is new. Never blocks, O(k) in the
    /// number of returned samples. Samples returned across successive calls
    /// never repeat and never reorder.
    pub fn pop_all(&self) -> Vec<Sample> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        // The producer may have lapped a stale tail; clamp the drain to the
        // newest capacity-sized window so reads stay within live slots.
        let available = (head - tail).min(self.capacity as u64);
        let start = head - available;

        let mut out = Vec::with_capacity(available as usize);
        for i in 0..available {
            // SAFETY: single consumer, slots in [start, head) were published
            // by the Release store of head
            let sample = unsafe {
                let ptr = self.storage.as_ptr();
                std::ptr::read(ptr.add(((start + i) & self.mask) as usize))
            };
            out.push(sample);
        }

        self.tail.store(head, Ordering::Release);
        out
    }

    /// Number of unread samples currently buffered
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head - tail).min(self.capacity as u64) as usize
    }

    /// Check if the ring has no unread samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ring capacity after power-of-two rounding
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Total samples pushed since construction (for statistics)
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed.load(Ordering::Relaxed)
    }
}

// SAFETY: hand-off between the single producer and single consumer is done
// with acquire/release pairs on head and tail; no other shared state exists.
unsafe impl Send for SampleRing {}
unsafe impl Sync for SampleRing {}
