use std::sync::Arc;
use std::time::Duration;

use crate::errors::Result;
use crate::sequence::{AtomicSequence, Sequence};

// A trait for providing a sequence barrier.
// # Methods
// - `get_cursor`: Returns the latest observed cursor value.
// - `wait_for`: Waits for the given sequence to be published.
// - `wait_for_timeout`: As `wait_for`, bounded by a deadline.
// - `is_alerted`: Returns true if the barrier has been alerted.
// - `alert`: Alerts the barrier and wakes blocked waiters.
// - `clear_alert`: Clears the alert.
pub trait SequenceBarrier: Send + Sync {
    fn get_cursor(&self) -> Sequence;
    fn wait_for(&self, sequence: Sequence) -> Result<Sequence>;
    fn wait_for_timeout(&self, sequence: Sequence, timeout: Duration) -> Result<Sequence>;
    fn is_alerted(&self) -> bool;
    fn alert(&self);
    fn clear_alert(&self);
}

/// A policy for allocating sequences to publishers.
///
/// Claiming blocks while the ring is full, i.e. while the requested sequence
/// is a whole ring ahead of the slowest gating sequence. Publishers are not
/// registered with the waiting strategy, so consumers cannot signal them; a
/// full ring is handled by polling the gating sequences with a brief back-off.
pub trait ClaimStrategy: Send {
    fn new(buffer_size: usize) -> Self;

    /// Allocate exactly one sequence, blocking until it fits in the ring.
    fn increment_and_get(&self, gating_sequences: &[Arc<AtomicSequence>]) -> Sequence {
        self.increment_and_get_n(1, gating_sequences)
    }

    /// Allocate a contiguous run of `delta` sequences, blocking until the
    /// whole run fits. Returns the highest allocated sequence.
    fn increment_and_get_n(&self, delta: i64, gating_sequences: &[Arc<AtomicSequence>])
        -> Sequence;

    /// Force the claim counter to exactly `sequence`, still respecting the
    /// gating sequences.
    fn set_sequence(&self, sequence: Sequence, gating_sequences: &[Arc<AtomicSequence>]);

    /// Non-blocking test for a free slot at the next claim position.
    fn has_available_capacity(&self, gating_sequences: &[Arc<AtomicSequence>]) -> bool;

    /// The highest sequence claimed so far.
    fn claimed_sequence(&self) -> Sequence;

    /// Spin until the claim counter has reached `sequence`. Only meaningful
    /// for concurrent claimants; the single-threaded strategy publishes in
    /// claim order by construction.
    fn publisher_follows_sequence(&self, _sequence: Sequence) {}

    /// Mark `[low, high]` published and move `cursor` forward as far as the
    /// published frontier allows.
    fn publish(&self, low: Sequence, high: Sequence, cursor: &AtomicSequence);

    /// Publish `sequence` without regard to monotonic claim tracking.
    fn force_publish(&self, sequence: Sequence, cursor: &AtomicSequence);
}

/// A policy for a waiter that cannot yet make progress.
/// # Methods
/// - `wait_for`: Block until the minimum over `dependencies` reaches
///   `sequence`, returning the observed minimum (which may be higher).
/// - `wait_for_timeout`: As `wait_for`, failing with `Timeout` at the deadline.
/// - `signal_all_when_blocking`: Wake all blocked waiters after a publish.
pub trait WaitingStrategy: Default + Send + Sync {
    fn new() -> Self;

    fn wait_for<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        check_alert: F,
    ) -> Result<Sequence>;

    fn wait_for_timeout<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        timeout: Duration,
        check_alert: F,
    ) -> Result<Sequence>;

    fn signal_all_when_blocking(&self);
}
