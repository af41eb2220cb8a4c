//! Claim strategies that allocate ring sequences to publishers.
//!
//! # Overview
//!
//! Claiming is the producer half of the coordination protocol: a publisher
//! asks for the next free sequence(s) and the claim strategy blocks while the
//! requested position is still a full ring ahead of the slowest consumer.
//! Publishers poll the gating sequences with a brief back-off rather than
//! parking on the waiting strategy — consumers have no way to signal a
//! producer, only the reverse.
//!
//! # Variants
//!
//! - [`SingleThreadedClaimStrategy`]: the claim counter is a plain field with
//!   no atomic read-modify-write. The type is deliberately not `Sync`, so the
//!   compiler rejects sharing a single-producer sequencer between threads.
//!   Publication stores the claimed sequence straight into the cursor.
//! - [`MultiThreadedClaimStrategy`]: sequences are allocated with an atomic
//!   fetch-add, so claims from concurrent publishers never collide. Because
//!   publications can complete out of claim order, published slots are
//!   recorded in an [`AvailableSequenceBuffer`] and the cursor only advances
//!   over the contiguous run of published slots, keeping the consumer-visible
//!   frontier gapless.

use std::cell::Cell;
use std::hint;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::sequence::{AtomicSequence, Sequence, INITIAL_CURSOR_VALUE};
use crate::traits::ClaimStrategy;
use crate::utils::{AvailableSequenceBuffer, Utils};

const FULL_RING_BACKOFF: Duration = Duration::from_micros(1);

pub struct SingleThreadedClaimStrategy {
    buffer_size: i64,
    claim_sequence: Cell<Sequence>,
    min_gating_cache: Cell<Sequence>,
}

impl SingleThreadedClaimStrategy {
    fn wait_for_free_slot(&self, sequence: Sequence, gating_sequences: &[Arc<AtomicSequence>]) {
        let wrap_point = sequence - self.buffer_size;
        if wrap_point > self.min_gating_cache.get() {
            let mut min_sequence = Utils::get_minimum_sequence(gating_sequences);
            while wrap_point > min_sequence {
                thread::sleep(FULL_RING_BACKOFF);
                min_sequence = Utils::get_minimum_sequence(gating_sequences);
            }
            self.min_gating_cache.set(min_sequence);
        }
    }
}

impl ClaimStrategy for SingleThreadedClaimStrategy {
    fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size as i64,
            claim_sequence: Cell::new(INITIAL_CURSOR_VALUE),
            min_gating_cache: Cell::new(INITIAL_CURSOR_VALUE),
        }
    }

    fn increment_and_get_n(
        &self,
        delta: i64,
        gating_sequences: &[Arc<AtomicSequence>],
    ) -> Sequence {
        let next = self.claim_sequence.get() + delta;
        self.wait_for_free_slot(next, gating_sequences);
        self.claim_sequence.set(next);
        next
    }

    fn set_sequence(&self, sequence: Sequence, gating_sequences: &[Arc<AtomicSequence>]) {
        self.wait_for_free_slot(sequence, gating_sequences);
        self.claim_sequence.set(sequence);
    }

    fn has_available_capacity(&self, gating_sequences: &[Arc<AtomicSequence>]) -> bool {
        let wrap_point = self.claim_sequence.get() + 1 - self.buffer_size;
        if wrap_point > self.min_gating_cache.get() {
            let min_sequence = Utils::get_minimum_sequence(gating_sequences);
            self.min_gating_cache.set(min_sequence);
            return wrap_point <= min_sequence;
        }
        true
    }

    fn claimed_sequence(&self) -> Sequence {
        self.claim_sequence.get()
    }

    fn publish(&self, _low: Sequence, high: Sequence, cursor: &AtomicSequence) {
        debug_assert!(
            high <= self.claim_sequence.get(),
            "published sequence {high} was never claimed"
        );
        cursor.set(high);
    }

    fn force_publish(&self, sequence: Sequence, cursor: &AtomicSequence) {
        cursor.set(sequence);
    }
}

pub struct MultiThreadedClaimStrategy {
    buffer_size: i64,
    claim_sequence: AtomicSequence,
    available: AvailableSequenceBuffer,
}

impl MultiThreadedClaimStrategy {
    fn wait_for_free_slot(&self, sequence: Sequence, gating_sequences: &[Arc<AtomicSequence>]) {
        let wrap_point = sequence - self.buffer_size;
        while wrap_point > Utils::get_minimum_sequence(gating_sequences) {
            thread::sleep(FULL_RING_BACKOFF);
        }
    }

    /// Move `cursor` forward over the contiguous run of published slots
    /// starting at `cursor + 1`. Concurrent publishers race on the CAS; a
    /// loser re-reads and re-walks, so whichever thread wins, the cursor ends
    /// at the published frontier.
    fn advance_cursor(&self, cursor: &AtomicSequence) {
        let mut current = cursor.get();
        loop {
            let mut next = current;
            while self.available.is_available(next + 1) {
                next += 1;
            }
            if next == current {
                return;
            }
            if cursor.compare_and_set(current, next) {
                current = next;
            } else {
                current = cursor.get();
            }
        }
    }
}

impl ClaimStrategy for MultiThreadedClaimStrategy {
    fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size as i64,
            claim_sequence: AtomicSequence::default(),
            available: AvailableSequenceBuffer::new(buffer_size as i64),
        }
    }

    fn increment_and_get_n(
        &self,
        delta: i64,
        gating_sequences: &[Arc<AtomicSequence>],
    ) -> Sequence {
        // Claim first, then wait for room: the counter has already moved, so
        // the allocation must eventually be used for publication.
        let next = self.claim_sequence.add_and_get(delta);
        self.wait_for_free_slot(next, gating_sequences);
        next
    }

    fn set_sequence(&self, sequence: Sequence, gating_sequences: &[Arc<AtomicSequence>]) {
        self.wait_for_free_slot(sequence, gating_sequences);
        self.claim_sequence.set(sequence);
    }

    fn has_available_capacity(&self, gating_sequences: &[Arc<AtomicSequence>]) -> bool {
        let wrap_point = self.claim_sequence.get() + 1 - self.buffer_size;
        wrap_point <= Utils::get_minimum_sequence(gating_sequences)
    }

    fn claimed_sequence(&self) -> Sequence {
        self.claim_sequence.get()
    }

    fn publisher_follows_sequence(&self, sequence: Sequence) {
        while self.claim_sequence.get() < sequence {
            hint::spin_loop();
        }
    }

    fn publish(&self, low: Sequence, high: Sequence, cursor: &AtomicSequence) {
        debug_assert!(
            high <= self.claim_sequence.get(),
            "published sequence {high} was never claimed"
        );
        self.publisher_follows_sequence(high);
        self.available.set_range(low, high);
        self.advance_cursor(cursor);
    }

    fn force_publish(&self, sequence: Sequence, cursor: &AtomicSequence) {
        // Same visibility rules as a normal publish: the cursor still only
        // moves over a contiguous run of published slots.
        self.available.set(sequence);
        self.advance_cursor(cursor);
    }
}
