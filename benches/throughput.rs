use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ring_sequencer::{
    waiting::BusySpinWaitStrategy, AtomicSequence, MultiProducerSequencer, SequenceBarrier,
    SingleProducerSequencer, WaitingStrategy,
};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const BUFFER_SIZE: usize = 1024 * 16;
const ITERATIONS: i64 = 1_000_000;

fn bench_channel_spsc(c: &mut Criterion) {
    c.bench_function("channel_spsc", |b| {
        b.iter(|| {
            let (tx, rx) = mpsc::channel();
            let handle = thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    black_box(rx.recv().unwrap());
                }
            });

            for i in 0..ITERATIONS {
                tx.send(black_box(i)).unwrap();
            }
            handle.join().unwrap();
        })
    });
}

fn bench_crossbeam_spsc(c: &mut Criterion) {
    c.bench_function("crossbeam_spsc", |b| {
        b.iter(|| {
            let (tx, rx) = crossbeam_channel::bounded(BUFFER_SIZE);
            let handle = thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    black_box(rx.recv().unwrap());
                }
            });

            for i in 0..ITERATIONS {
                tx.send(black_box(i)).unwrap();
            }
            handle.join().unwrap();
        })
    });
}

fn bench_sequencer_spsc(c: &mut Criterion) {
    c.bench_function("sequencer_spsc", |b| {
        b.iter(|| {
            let mut sequencer =
                SingleProducerSequencer::new(BUFFER_SIZE, BusySpinWaitStrategy::new()).unwrap();
            let gating_sequence = Arc::new(AtomicSequence::default());
            sequencer.set_gating_sequences(vec![gating_sequence.clone()]);
            let barrier = sequencer.new_barrier(&[]);

            thread::scope(|scope| {
                let barrier_ref = &barrier;
                scope.spawn(move || {
                    let mut next = 0;
                    while next < ITERATIONS {
                        let observed = barrier_ref.wait_for(next).unwrap();
                        gating_sequence.set(observed);
                        next = black_box(observed) + 1;
                    }
                });

                for _ in 0..ITERATIONS {
                    let sequence = sequencer.next();
                    sequencer.publish(black_box(sequence));
                }
            });
        })
    });
}

fn bench_sequencer_mpsc(c: &mut Criterion) {
    const PRODUCERS: i64 = 3;

    c.bench_function("sequencer_mpsc", |b| {
        b.iter(|| {
            let mut sequencer =
                MultiProducerSequencer::new(BUFFER_SIZE, BusySpinWaitStrategy::new()).unwrap();
            let gating_sequence = Arc::new(AtomicSequence::default());
            sequencer.set_gating_sequences(vec![gating_sequence.clone()]);
            let barrier = sequencer.new_barrier(&[]);
            let total = ITERATIONS - ITERATIONS % PRODUCERS;

            thread::scope(|scope| {
                let sequencer_ref = &sequencer;
                for _ in 0..PRODUCERS {
                    scope.spawn(move || {
                        for _ in 0..total / PRODUCERS {
                            let sequence = sequencer_ref.next();
                            sequencer_ref.publish(black_box(sequence));
                        }
                    });
                }

                let barrier_ref = &barrier;
                scope.spawn(move || {
                    let mut next = 0;
                    while next < total {
                        let observed = barrier_ref.wait_for(next).unwrap();
                        gating_sequence.set(observed);
                        next = black_box(observed) + 1;
                    }
                });
            });
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(10);
    targets = bench_channel_spsc, bench_crossbeam_spsc,
              bench_sequencer_spsc, bench_sequencer_mpsc
}
criterion_main!(benches);
