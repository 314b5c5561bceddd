//! Result of one synchronized tick.

use bitflags::bitflags;

bitflags! {
    /// Status bits reported by [`Interpreter::step`](super::Interpreter::step).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StepStatus: u8 {
        /// No cursors remain.
        const HALTED = 1 << 0;
        /// Some cursor will consume an input byte on the next tick.
        const NEEDS_INPUT = 1 << 1;
        /// This tick produced an output byte.
        const OUTPUT = 1 << 2;
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Status bits.
    pub status: StepStatus,
    /// Output byte, present exactly when [`StepStatus::OUTPUT`] is set.
    pub output: Option<u8>,
}

impl Tick {
    pub(crate) fn halted() -> Self {
        Self {
            status: StepStatus::HALTED,
            output: None,
        }
    }

    /// No cursors remain.
    pub fn is_halted(&self) -> bool {
        self.status.contains(StepStatus::HALTED)
    }

    /// The next tick will consume an input byte.
    pub fn needs_input(&self) -> bool {
        self.status.contains(StepStatus::NEEDS_INPUT)
    }

    /// Output byte produced by this tick.
    pub fn output(&self) -> Option<u8> {
        self.output
    }
}

/// Tick-scoped output accumulator.
///
/// The first sample latches its value. A later sample that disagrees blocks
/// the latch for the rest of the tick, so the result does not depend on the
/// order cursors are visited in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum OutputLatch {
    #[default]
    Empty,
    Value(u8),
    Blocked,
}

impl OutputLatch {
    pub(crate) fn offer(&mut self, value: u8) {
        *self = match *self {
            OutputLatch::Empty => OutputLatch::Value(value),
            OutputLatch::Value(current) if current == value => OutputLatch::Value(current),
            _ => OutputLatch::Blocked,
        };
    }

    pub(crate) fn value(self) -> Option<u8> {
        match self {
            OutputLatch::Value(value) => Some(value),
            OutputLatch::Empty | OutputLatch::Blocked => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latch(samples: &[u8]) -> Option<u8> {
        let mut latch = OutputLatch::Empty;
        for &sample in samples {
            latch.offer(sample);
        }
        latch.value()
    }

    #[test]
    fn test_latch_empty() {
        assert_eq!(latch(&[]), None);
    }

    #[test]
    fn test_latch_agreeing_samples() {
        assert_eq!(latch(&[7]), Some(7));
        assert_eq!(latch(&[7, 7, 7]), Some(7));
        assert_eq!(latch(&[0, 0]), Some(0));
    }

    #[test]
    fn test_latch_conflict_blocks_permanently() {
        assert_eq!(latch(&[1, 2]), None);
        // A later sample equal to the first does not unblock.
        assert_eq!(latch(&[1, 2, 1]), None);
        assert_eq!(latch(&[1, 1, 2, 2]), None);
    }

    #[test]
    fn test_latch_is_order_independent() {
        let samples = [3u8, 3, 9];
        let mut reversed = samples;
        reversed.reverse();
        assert_eq!(latch(&samples), latch(&reversed));
        assert_eq!(latch(&[9, 3, 3]), None);
    }

    #[test]
    fn test_tick_accessors() {
        let tick = Tick {
            status: StepStatus::OUTPUT | StepStatus::NEEDS_INPUT,
            output: Some(b'A'),
        };
        assert!(!tick.is_halted());
        assert!(tick.needs_input());
        assert_eq!(tick.output(), Some(b'A'));
        assert!(Tick::halted().is_halted());
    }
}
