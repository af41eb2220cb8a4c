use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::sequence::{AtomicSequence, Sequence};

pub struct Utils;

impl Utils {
    pub fn get_minimum_sequence(sequences: &[Arc<AtomicSequence>]) -> Sequence {
        if sequences.is_empty() {
            i64::MAX
        } else {
            sequences.iter().map(|s| s.get()).min().unwrap()
        }
    }
}

/// Tracks which ring slots hold a published value for the current lap.
///
/// Each slot stores the generation number of its most recent publication,
/// `sequence >> log2(capacity)`. A sequence is available iff its slot stores
/// exactly its own generation, so a flag left over from an earlier lap of the
/// ring can never alias a later sequence that maps to the same slot.
pub struct AvailableSequenceBuffer {
    available_buffer: Box<[CachePadded<AtomicI64>]>,
    index_mask: i64,
    index_shift: u32,
}

impl AvailableSequenceBuffer {
    pub fn new(buffer_size: i64) -> Self {
        Self {
            available_buffer: (0..buffer_size)
                .map(|_| CachePadded::new(AtomicI64::new(-1)))
                .collect(),
            index_mask: buffer_size - 1,
            index_shift: buffer_size.trailing_zeros(),
        }
    }

    pub fn set(&self, sequence: Sequence) {
        let index = (sequence & self.index_mask) as usize;
        let generation = sequence >> self.index_shift;
        unsafe {
            self.available_buffer
                .get_unchecked(index)
                .store(generation, Ordering::Release);
        }
    }

    pub fn set_range(&self, low: Sequence, high: Sequence) {
        for sequence in low..=high {
            self.set(sequence);
        }
    }

    pub fn is_available(&self, sequence: Sequence) -> bool {
        let index = (sequence & self.index_mask) as usize;
        let generation = sequence >> self.index_shift;
        unsafe {
            self.available_buffer
                .get_unchecked(index)
                .load(Ordering::Acquire)
                == generation
        }
    }
}
