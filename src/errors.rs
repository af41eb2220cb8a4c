use thiserror::Error;

use crate::sequence::Sequence;

/// Errors surfaced by the sequencer and its barriers.
///
/// Argument validation fails at construction or claim time; `Alerted` and
/// `Timeout` are the only runtime failures and both are recoverable by the
/// waiter (clear the alert, or retry the timed wait).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("ring capacity must be a power of two, got {0}")]
    InvalidCapacity(usize),

    #[error("batch size {0} is outside 1..=capacity")]
    InvalidBatchSize(i64),

    #[error("sequence barrier alerted")]
    Alerted,

    #[error("timed out waiting for sequence {0}")]
    Timeout(Sequence),
}

/// Result type for sequencer operations.
pub type Result<T> = std::result::Result<T, SequencerError>;
