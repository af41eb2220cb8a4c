//! The sequencer coordinates every claim and publication on the ring.
//!
//! # Overview
//!
//! The sequencer owns the cursor (the highest published sequence), a claim
//! strategy (how producers allocate sequences) and a waiting strategy (how
//! consumers wait for them). It serves several functions:
//!
//! 1. **Sequence allocation**: hands out unique, monotonically increasing
//!    sequence numbers to producers.
//! 2. **Capacity management**: consults the gating sequences so a producer
//!    never overwrites a slot a consumer is still reading.
//! 3. **Publication**: advances the cursor and signals blocked waiters.
//! 4. **Barrier creation**: builds the [`ProcessingSequenceBarrier`]s that
//!    consumers wait on.
//!
//! The two strategy axes are orthogonal: any claim strategy combines with any
//! waiting strategy. [`SingleProducerSequencer`] and [`MultiProducerSequencer`]
//! name the two claim variants.
//!
//! # Producer Workflow
//!
//! 1. Claim the next sequence(s) via [`Sequencer::next`] or
//!    [`Sequencer::next_batch`].
//! 2. Write the payload into the slot at `sequence & (capacity - 1)` (slot
//!    storage is the caller's concern).
//! 3. Publish via [`Sequencer::publish`] or [`Sequencer::publish_batch`] to
//!    make the sequence visible to consumers.
//!
//! # Usage Example
//! ```rust
//! use ring_sequencer::{
//!     sequencer::SingleProducerSequencer,
//!     waiting::SleepingWaitStrategy,
//! };
//!
//! let sequencer = SingleProducerSequencer::new(1024, SleepingWaitStrategy::default()).unwrap();
//! let sequence = sequencer.next();
//! sequencer.publish(sequence);
//! assert_eq!(sequencer.get_cursor(), 0);
//! ```

use std::sync::Arc;

use crate::barrier::ProcessingSequenceBarrier;
use crate::batch::BatchDescriptor;
use crate::claim::{MultiThreadedClaimStrategy, SingleThreadedClaimStrategy};
use crate::errors::{Result, SequencerError};
use crate::sequence::{AtomicSequence, Sequence, INITIAL_CURSOR_VALUE};
use crate::traits::{ClaimStrategy, WaitingStrategy};
use crate::utils::Utils;

/// A sequencer for exactly one publishing thread. Not `Sync` by construction.
pub type SingleProducerSequencer<W> = Sequencer<SingleThreadedClaimStrategy, W>;

/// A sequencer safe for concurrent publishing threads.
pub type MultiProducerSequencer<W> = Sequencer<MultiThreadedClaimStrategy, W>;

pub struct Sequencer<C: ClaimStrategy, W: WaitingStrategy> {
    buffer_size: i64,
    cursor: Arc<AtomicSequence>,
    claim_strategy: C,
    waiting_strategy: Arc<W>,
    gating_sequences: Vec<Arc<AtomicSequence>>,
}

impl<C: ClaimStrategy, W: WaitingStrategy> Sequencer<C, W> {
    /// Create a sequencer over a ring of `buffer_size` slots.
    ///
    /// The size must be a power of two so that `sequence & (buffer_size - 1)`
    /// is the slot index and wrap-around arithmetic is a single mask.
    pub fn new(buffer_size: usize, waiting_strategy: W) -> Result<Self> {
        if buffer_size == 0 || !buffer_size.is_power_of_two() {
            return Err(SequencerError::InvalidCapacity(buffer_size));
        }
        Ok(Self {
            buffer_size: buffer_size as i64,
            cursor: Arc::new(AtomicSequence::default()),
            claim_strategy: C::new(buffer_size),
            waiting_strategy: Arc::new(waiting_strategy),
            gating_sequences: Vec::new(),
        })
    }

    /// Install the gating sequences the sequencer must not overrun.
    ///
    /// Replaces any previously installed set. Must be called before the first
    /// claim; the consumers own the sequences, the sequencer only reads them.
    pub fn set_gating_sequences(&mut self, gating_sequences: Vec<Arc<AtomicSequence>>) {
        debug_assert_eq!(
            self.claim_strategy.claimed_sequence(),
            INITIAL_CURSOR_VALUE,
            "gating sequences must be installed before the first claim"
        );
        self.gating_sequences = gating_sequences;
    }

    /// Create a barrier that waits on the cursor plus the given upstream
    /// consumer sequences. The barrier shares this sequencer's waiting
    /// strategy, so publishes signal its waiters.
    pub fn new_barrier(
        &self,
        dependents: &[Arc<AtomicSequence>],
    ) -> ProcessingSequenceBarrier<W> {
        ProcessingSequenceBarrier::new(
            self.cursor.clone(),
            Vec::from(dependents),
            self.waiting_strategy.clone(),
        )
    }

    /// The highest published sequence.
    pub fn get_cursor(&self) -> Sequence {
        self.cursor.get()
    }

    /// The shared cursor counter, for wiring consumers that track it directly.
    pub fn get_cursor_sequence(&self) -> Arc<AtomicSequence> {
        self.cursor.clone()
    }

    pub fn get_capacity(&self) -> i64 {
        self.buffer_size
    }

    /// Non-blocking test for a free slot at the next claim position.
    pub fn has_available_capacity(&self) -> bool {
        self.claim_strategy
            .has_available_capacity(&self.gating_sequences)
    }

    /// Number of slots a producer could still claim without blocking.
    pub fn remaining_capacity(&self) -> i64 {
        let consumed = self.minimum_gating_sequence();
        self.buffer_size - (self.claim_strategy.claimed_sequence() - consumed)
    }

    /// Number of published slots not yet released by every consumer.
    pub fn occupied_capacity(&self) -> i64 {
        (self.cursor.get() - self.minimum_gating_sequence()).max(0)
    }

    /// Claim the next sequence. Blocks while the ring is full. The claimed
    /// sequence is not visible to consumers until it is published.
    pub fn next(&self) -> Sequence {
        self.claim_strategy.increment_and_get(&self.gating_sequences)
    }

    /// Claim a contiguous run of `batch_descriptor.size()` sequences and
    /// record the run's end in the descriptor. Blocks until the whole run
    /// fits.
    pub fn next_batch(&self, batch_descriptor: &mut BatchDescriptor) -> Result<Sequence> {
        let size = batch_descriptor.size();
        if size < 1 || size > self.buffer_size {
            return Err(SequencerError::InvalidBatchSize(size));
        }
        let end = self
            .claim_strategy
            .increment_and_get_n(size, &self.gating_sequences);
        batch_descriptor.set_end(end);
        Ok(end)
    }

    /// Force the claim counter to exactly `sequence`, still respecting the
    /// gating sequences. The cursor is unchanged; pair with
    /// [`Sequencer::force_publish`]. Intended for recovery and test harnesses.
    pub fn claim(&self, sequence: Sequence) -> Sequence {
        self.claim_strategy
            .set_sequence(sequence, &self.gating_sequences);
        sequence
    }

    /// Mark `sequence` published and wake blocked waiters.
    pub fn publish(&self, sequence: Sequence) {
        self.claim_strategy
            .publish(sequence, sequence, &self.cursor);
        self.waiting_strategy.signal_all_when_blocking();
    }

    /// Publish the whole claimed range of `batch_descriptor`.
    pub fn publish_batch(&self, batch_descriptor: &BatchDescriptor) {
        self.claim_strategy.publish(
            batch_descriptor.start(),
            batch_descriptor.end(),
            &self.cursor,
        );
        self.waiting_strategy.signal_all_when_blocking();
    }

    /// Publish `sequence` without regard to monotonic claim tracking, then
    /// wake blocked waiters. With concurrent claimants this behaves exactly
    /// like a normal publish of that sequence.
    pub fn force_publish(&self, sequence: Sequence) {
        self.claim_strategy.force_publish(sequence, &self.cursor);
        self.waiting_strategy.signal_all_when_blocking();
    }

    fn minimum_gating_sequence(&self) -> Sequence {
        if self.gating_sequences.is_empty() {
            self.cursor.get()
        } else {
            Utils::get_minimum_sequence(&self.gating_sequences)
        }
    }
}
