use std::hint;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::{
    errors::{Result, SequencerError},
    sequence::{AtomicSequence, Sequence},
    traits::WaitingStrategy,
    utils::Utils,
};

const SPIN_TRIES: u32 = 100;

const SLEEP_SPIN_TRIES: i32 = 200;
const SLEEP_YIELD_THRESHOLD: i32 = 100;
const INITIAL_SLEEP: Duration = Duration::from_micros(1);
const MAX_SLEEP: Duration = Duration::from_millis(1);

/// Pure spin. Lowest latency, one core pegged per waiter.
#[derive(Default)]
pub struct BusySpinWaitStrategy;

impl WaitingStrategy for BusySpinWaitStrategy {
    fn new() -> Self {
        BusySpinWaitStrategy {}
    }

    fn wait_for<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        check_alert: F,
    ) -> Result<Sequence> {
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
        }
    }

    fn wait_for_timeout<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        timeout: Duration,
        check_alert: F,
    ) -> Result<Sequence> {
        let deadline = Instant::now() + timeout;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            if Instant::now() >= deadline {
                return Err(SequencerError::Timeout(sequence));
            }
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Spin a bounded number of iterations, then yield the thread on every retry.
#[derive(Default)]
pub struct YieldingWaitStrategy;

impl YieldingWaitStrategy {
    fn back_off(counter: &mut u32) {
        if *counter > 0 {
            *counter -= 1;
            hint::spin_loop();
        } else {
            thread::yield_now();
        }
    }
}

impl WaitingStrategy for YieldingWaitStrategy {
    fn new() -> Self {
        YieldingWaitStrategy {}
    }

    fn wait_for<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        check_alert: F,
    ) -> Result<Sequence> {
        let mut counter = SPIN_TRIES;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            Self::back_off(&mut counter);
        }
    }

    fn wait_for_timeout<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        timeout: Duration,
        check_alert: F,
    ) -> Result<Sequence> {
        let deadline = Instant::now() + timeout;
        let mut counter = SPIN_TRIES;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            if Instant::now() >= deadline {
                return Err(SequencerError::Timeout(sequence));
            }
            Self::back_off(&mut counter);
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Spin, then yield, then sleep for progressively longer intervals.
///
/// The cheapest strategy in CPU terms after [`BlockingWaitStrategy`], without
/// requiring publishers to take a lock on the publish path.
#[derive(Default)]
pub struct SleepingWaitStrategy;

impl SleepingWaitStrategy {
    fn back_off(counter: &mut i32, sleep: &mut Duration) {
        if *counter > SLEEP_YIELD_THRESHOLD {
            *counter -= 1;
            hint::spin_loop();
        } else if *counter > 0 {
            *counter -= 1;
            thread::yield_now();
        } else {
            thread::sleep(*sleep);
            *sleep = (*sleep * 2).min(MAX_SLEEP);
        }
    }
}

impl WaitingStrategy for SleepingWaitStrategy {
    fn new() -> Self {
        SleepingWaitStrategy {}
    }

    fn wait_for<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        check_alert: F,
    ) -> Result<Sequence> {
        let mut counter = SLEEP_SPIN_TRIES;
        let mut sleep = INITIAL_SLEEP;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            Self::back_off(&mut counter, &mut sleep);
        }
    }

    fn wait_for_timeout<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        timeout: Duration,
        check_alert: F,
    ) -> Result<Sequence> {
        let deadline = Instant::now() + timeout;
        let mut counter = SLEEP_SPIN_TRIES;
        let mut sleep = INITIAL_SLEEP;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            if Instant::now() >= deadline {
                return Err(SequencerError::Timeout(sequence));
            }
            Self::back_off(&mut counter, &mut sleep);
        }
    }

    fn signal_all_when_blocking(&self) {}
}

/// Park on a condition variable until a publisher signals.
///
/// Publishers call [`WaitingStrategy::signal_all_when_blocking`] after every
/// cursor advance; the signal takes the same lock the waiter re-checks under,
/// so a publish between the waiter's check and its park cannot be missed.
#[derive(Default)]
pub struct BlockingWaitStrategy {
    guard: Mutex<()>,
    cvar: Condvar,
}

impl WaitingStrategy for BlockingWaitStrategy {
    fn new() -> Self {
        Default::default()
    }

    fn wait_for<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        check_alert: F,
    ) -> Result<Sequence> {
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }

            let guard = self.guard.lock().unwrap();
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            let _guard = self.cvar.wait(guard).unwrap();
        }
    }

    fn wait_for_timeout<F: Fn() -> bool>(
        &self,
        sequence: Sequence,
        dependencies: &[Arc<AtomicSequence>],
        timeout: Duration,
        check_alert: F,
    ) -> Result<Sequence> {
        let deadline = Instant::now() + timeout;
        loop {
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }

            let guard = self.guard.lock().unwrap();
            let minimum_sequence = Utils::get_minimum_sequence(dependencies);
            if minimum_sequence >= sequence {
                return Ok(minimum_sequence);
            }
            if check_alert() {
                return Err(SequencerError::Alerted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(SequencerError::Timeout(sequence));
            }
            let _guard = self.cvar.wait_timeout(guard, deadline - now).unwrap();
        }
    }

    fn signal_all_when_blocking(&self) {
        let _guard = self.guard.lock().unwrap();
        self.cvar.notify_all();
    }
}
