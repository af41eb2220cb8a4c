//! Atomic sequence counters with cache line padding to prevent false sharing.
//!
//! # Cache Line Padding and False Sharing
//!
//! Modern CPUs manage memory in cache lines (typically 64 bytes). When two
//! threads write variables that share a cache line from different cores, every
//! modification invalidates the whole line and forces the other core to
//! refresh its copy, even though the threads never touch the same variable.
//! This "false sharing" creates cache coherence traffic that would defeat the
//! sequencer's design: the cursor, the claim counter and every gating sequence
//! are hammered by different threads concurrently.
//!
//! Each [`AtomicSequence`] therefore occupies its own cache line: the counter
//! is wrapped in [`CachePadded`] and the struct is 64-byte aligned, so no two
//! sequences (and no neighbouring field) ever share a line. A unit test
//! verifies the layout.
//!
//! # Memory Ordering
//!
//! Reads use `Acquire`, writes use `Release` and read-modify-write operations
//! use `AcqRel`. Publishing a sequence is a release store of the cursor;
//! consumers that acquire-load a cursor value `>= s` therefore observe every
//! write the producer made to slot `s` before publishing.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicI64, Ordering};

pub type Sequence = i64;

/// Value of every cursor and gating sequence before anything is published.
pub const INITIAL_CURSOR_VALUE: Sequence = -1;

/// An atomic sequence counter padded to occupy a full cache line.
#[repr(align(64))]
#[derive(Debug)]
pub struct AtomicSequence {
    value: CachePadded<AtomicI64>,
}

impl AtomicSequence {
    /// Create a new sequence with an initial value.
    pub fn new(initial_value: Sequence) -> Self {
        AtomicSequence {
            value: CachePadded::new(AtomicI64::new(initial_value)),
        }
    }

    /// Get the current value of the sequence.
    pub fn get(&self) -> Sequence {
        self.value.load(Ordering::Acquire)
    }

    /// Set a new value for the sequence.
    pub fn set(&self, new_value: Sequence) {
        self.value.store(new_value, Ordering::Release);
    }

    /// Atomically replace the value if it currently equals `expected`.
    pub fn compare_and_set(&self, expected: Sequence, new_value: Sequence) -> bool {
        self.value
            .compare_exchange(expected, new_value, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Add `delta` to the sequence and return the new value.
    pub fn add_and_get(&self, delta: i64) -> Sequence {
        self.value.fetch_add(delta, Ordering::AcqRel) + delta
    }

    /// Increment the sequence by 1 and return the new value.
    pub fn increment_and_get(&self) -> Sequence {
        self.add_and_get(1)
    }
}

impl Default for AtomicSequence {
    fn default() -> Self {
        Self::new(INITIAL_CURSOR_VALUE)
    }
}

impl From<i64> for AtomicSequence {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl PartialEq for AtomicSequence {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}
