//! Running-average filter used on every analog channel.
//!
//! A fixed-length ring of integer samples with an incrementally maintained
//! sum. Until the ring has been filled once, the average covers only the
//! samples written so far; after that it is a true sliding window over the
//! last `N` samples.

/// Default window length for the analog channels.
pub const DEFAULT_FILTER_LEN: usize = 10;

/// Sliding-window arithmetic mean over the most recent `N` samples.
#[derive(Clone, Debug)]
pub struct RunningAverage<const N: usize> {
    ring: [i32; N],
    /// Next slot to write; also the number of valid samples while `!full`.
    cursor: usize,
    /// Sum of the valid entries in `ring`. Wider than a sample so a full
    /// window of extreme values cannot overflow.
    sum: i64,
    full: bool,
}

impl<const N: usize> RunningAverage<N> {
    /// Create an empty filter.
    pub const fn new() -> Self {
        assert!(N > 0, "filter window must hold at least one sample");
        Self {
            ring: [0; N],
            cursor: 0,
            sum: 0,
            full: false,
        }
    }

    /// Feed one sample and return the updated average.
    pub fn observe(&mut self, value: i32) -> f32 {
        if self.full {
            self.sum -= i64::from(self.ring[self.cursor]);
        }
        self.ring[self.cursor] = value;
        self.sum += i64::from(value);

        self.cursor += 1;
        if self.cursor == N {
            self.full = true;
            self.cursor = 0;
        }

        self.average()
    }

    /// Current average without adding a sample.
    ///
    /// Returns 0.0 before the first observation.
    pub fn average(&self) -> f32 {
        let divisor = if self.full { N } else { self.cursor.max(1) };
        self.sum as f32 / divisor as f32
    }

    /// Number of samples currently contributing to the average.
    pub fn len(&self) -> usize {
        if self.full {
            N
        } else {
            self.cursor
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RunningAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
