//! A bounded ring-buffer sequencer for Disruptor-style concurrent hand-off.
//!
//! Producers claim monotonically increasing sequence numbers in a
//! preallocated ring; consumers observe completed sequences through
//! [`SequenceBarrier`]s that wait on the producer cursor and on upstream
//! consumer sequences. No slot is overwritten before every downstream
//! consumer has released it, and no slot is read before its producer has
//! published it — using only atomic counters and a waiting strategy, with no
//! locks on the publish/consume fast path.
//!
//! Slot storage is the caller's concern: the sequencer addresses slots by
//! `sequence & (capacity - 1)` and coordinates who may read or write them.

mod barrier;
mod batch;
mod errors;
pub mod claim;
pub mod sequence;
pub mod sequencer;
pub mod traits;
pub mod utils;
pub mod waiting;

pub use barrier::ProcessingSequenceBarrier;
pub use batch::BatchDescriptor;
pub use errors::{Result, SequencerError};
pub use sequence::{AtomicSequence, Sequence, INITIAL_CURSOR_VALUE};
pub use sequencer::{MultiProducerSequencer, Sequencer, SingleProducerSequencer};
pub use traits::{ClaimStrategy, SequenceBarrier, WaitingStrategy};
