//! Bounded sample history for live display
//!
//! Every quantity keeps a rolling buffer of its last samples; the elapsed
//! time of each accepted line is kept alongside, index-aligned with every
//! buffer.

use std::collections::VecDeque;
use std::time::Instant;

/// Samples kept per quantity when nothing else is configured
pub const DEFAULT_HISTORY: usize = 600;

/// Bounded FIFO of samples; the oldest entry is evicted first
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingBuffer {
    /// Buffer keeping at most `capacity` samples; storage grows on demand
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY)),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Rolling buffers of one session
#[derive(Debug, Clone)]
pub struct History {
    start: Option<Instant>,
    times: RollingBuffer,
    series: Vec<RollingBuffer>,
}

impl History {
    /// One buffer per quantity, each holding at most `capacity` samples
    pub fn new(quantities: usize, capacity: usize) -> Self {
        Self {
            start: None,
            times: RollingBuffer::new(capacity),
            series: (0..quantities).map(|_| RollingBuffer::new(capacity)).collect(),
        }
    }

    /// Append one accepted line and return its elapsed time in seconds.
    ///
    /// The session clock starts at the first recorded line.
    pub fn record(&mut self, values: &[f64], now: Instant) -> f64 {
        debug_assert_eq!(values.len(), self.series.len());

        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start).as_secs_f64();

        self.times.push(elapsed);
        for (buffer, value) in self.series.iter_mut().zip(values) {
            buffer.push(*value);
        }
        elapsed
    }

    pub fn times(&self) -> &RollingBuffer {
        &self.times
    }

    /// Buffer of the quantity at `index` in line order
    pub fn series(&self, index: usize) -> Option<&RollingBuffer> {
        self.series.get(index)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
