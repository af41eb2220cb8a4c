//! Sequence barriers that coordinate consumer access to published sequences.
//!
//! A [`ProcessingSequenceBarrier`] is a waitable view over the producer cursor
//! and any upstream consumer sequences a consumer depends on. Waiting returns
//! the highest sequence observed over all of them, which may exceed the
//! requested target — callers should consume up through the returned value
//! (the batching effect).
//!
//! Barriers also carry the cooperative cancellation point: `alert` sets a
//! sticky flag and wakes blocked waiters, which then fail with
//! [`SequencerError::Alerted`](crate::SequencerError) until the alert is
//! cleared.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crate::{
    errors::Result,
    sequence::{AtomicSequence, Sequence},
    traits::{SequenceBarrier, WaitingStrategy},
};

pub struct ProcessingSequenceBarrier<W: WaitingStrategy> {
    /// The producer cursor this barrier observes.
    cursor: Arc<AtomicSequence>,
    /// The cursor plus every upstream consumer sequence, waited on together.
    dependencies: Vec<Arc<AtomicSequence>>,
    waiting_strategy: Arc<W>,
    alerted: AtomicBool,
}

impl<W: WaitingStrategy> ProcessingSequenceBarrier<W> {
    pub(crate) fn new(
        cursor: Arc<AtomicSequence>,
        dependents: Vec<Arc<AtomicSequence>>,
        waiting_strategy: Arc<W>,
    ) -> Self {
        let mut dependencies = Vec::with_capacity(dependents.len() + 1);
        dependencies.push(cursor.clone());
        dependencies.extend(dependents);
        Self {
            cursor,
            dependencies,
            waiting_strategy,
            alerted: AtomicBool::new(false),
        }
    }
}

impl<W: WaitingStrategy> SequenceBarrier for ProcessingSequenceBarrier<W> {
    fn get_cursor(&self) -> Sequence {
        self.cursor.get()
    }

    fn wait_for(&self, sequence: Sequence) -> Result<Sequence> {
        self.waiting_strategy
            .wait_for(sequence, &self.dependencies, || {
                self.alerted.load(Ordering::Relaxed)
            })
    }

    fn wait_for_timeout(&self, sequence: Sequence, timeout: Duration) -> Result<Sequence> {
        self.waiting_strategy
            .wait_for_timeout(sequence, &self.dependencies, timeout, || {
                self.alerted.load(Ordering::Relaxed)
            })
    }

    fn is_alerted(&self) -> bool {
        self.alerted.load(Ordering::Acquire)
    }

    fn alert(&self) {
        self.alerted.store(true, Ordering::Release);
        self.waiting_strategy.signal_all_when_blocking();
    }

    fn clear_alert(&self) {
        self.alerted.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SequencerError;
    use crate::waiting::BusySpinWaitStrategy;
    use crate::INITIAL_CURSOR_VALUE;

    fn barrier_with_dependents(
        cursor: Sequence,
        dependents: &[Sequence],
    ) -> ProcessingSequenceBarrier<BusySpinWaitStrategy> {
        ProcessingSequenceBarrier::new(
            Arc::new(AtomicSequence::new(cursor)),
            dependents
                .iter()
                .map(|&s| Arc::new(AtomicSequence::new(s)))
                .collect(),
            Arc::new(BusySpinWaitStrategy::new()),
        )
    }

    #[test]
    fn test_wait_for_returns_sequence_when_available() {
        let barrier = barrier_with_dependents(5, &[]);
        assert_eq!(barrier.wait_for(5), Ok(5));
        assert_eq!(barrier.get_cursor(), 5);
    }

    #[test]
    fn test_waits_on_slowest_dependent() {
        // Cursor is ahead, but an upstream consumer is still on 3.
        let barrier = barrier_with_dependents(5, &[3]);
        assert_eq!(barrier.wait_for(3), Ok(3));
        assert_eq!(barrier.get_cursor(), 5);
    }

    #[test]
    fn test_alert_is_sticky_until_cleared() {
        let barrier = barrier_with_dependents(INITIAL_CURSOR_VALUE, &[]);
        assert!(!barrier.is_alerted());

        barrier.alert();
        assert!(barrier.is_alerted());
        assert_eq!(barrier.wait_for(0), Err(SequencerError::Alerted));
        // Still alerted; a second wait fails the same way.
        assert_eq!(barrier.wait_for(0), Err(SequencerError::Alerted));

        barrier.clear_alert();
        assert!(!barrier.is_alerted());
    }

    #[test]
    fn test_wait_for_timeout_expires() {
        let barrier = barrier_with_dependents(INITIAL_CURSOR_VALUE, &[]);
        assert_eq!(
            barrier.wait_for_timeout(0, Duration::from_millis(5)),
            Err(SequencerError::Timeout(0))
        );
    }
}
