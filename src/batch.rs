use crate::sequence::{Sequence, INITIAL_CURSOR_VALUE};

/// A contiguous block of sequences claimed in one operation.
///
/// The caller chooses the `size`; the sequencer fills in `end` when the block
/// is allocated, after which the descriptor spans `[start(), end()]`. Until
/// allocation, `end` holds the [`INITIAL_CURSOR_VALUE`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDescriptor {
    size: i64,
    end: Sequence,
}

impl BatchDescriptor {
    /// Create a descriptor requesting `size` sequences.
    ///
    /// The size is validated when the batch is claimed, not here.
    pub fn new(size: i64) -> Self {
        BatchDescriptor {
            size,
            end: INITIAL_CURSOR_VALUE,
        }
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// The last sequence in the block, or [`INITIAL_CURSOR_VALUE`] while
    /// unallocated.
    pub fn end(&self) -> Sequence {
        self.end
    }

    /// The first sequence in the block.
    pub fn start(&self) -> Sequence {
        self.end - self.size + 1
    }

    pub(crate) fn set_end(&mut self, end: Sequence) {
        self.end = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unallocated() {
        let batch = BatchDescriptor::new(3);
        assert_eq!(batch.size(), 3);
        assert_eq!(batch.end(), INITIAL_CURSOR_VALUE);
    }

    #[test]
    fn test_span_after_allocation() {
        let mut batch = BatchDescriptor::new(3);
        batch.set_end(9);
        assert_eq!(batch.start(), 7);
        assert_eq!(batch.end(), 9);
    }

    #[test]
    fn test_single_sequence_batch() {
        let mut batch = BatchDescriptor::new(1);
        batch.set_end(0);
        assert_eq!(batch.start(), 0);
        assert_eq!(batch.end(), 0);
    }
}
