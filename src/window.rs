//! Rolling sample window
//!
//! Fixed-capacity FIFO of timestamped samples backing every live chart.
//! Once full, each push evicts exactly the oldest sample.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// A scalar reading tagged with its capture time on this host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub captured_at: DateTime<Local>,
}

impl Sample {
    /// Sample captured now
    pub fn now(value: f64) -> Self {
        Self::at(value, Local::now())
    }

    /// Sample with an explicit capture time
    pub fn at(value: f64, captured_at: DateTime<Local>) -> Self {
        Self { value, captured_at }
    }
}

/// Owned, ordered copy of a window's contents (oldest first)
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    samples: Vec<Sample>,
    capacity: usize,
}

impl WindowSnapshot {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// Fixed-capacity rolling window of samples.
///
/// Insertion order is preserved and nothing is deduplicated or validated:
/// NaN and out-of-range values are stored as given.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    data: VecDeque<Sample>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` samples (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full
    pub fn push(&mut self, sample: Sample) {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(sample);
    }

    /// Append a value captured now
    pub fn push_value(&mut self, value: f64) {
        self.push(Sample::now(value));
    }

    /// Copy of the current contents for rendering
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            samples: self.data.iter().copied().collect(),
            capacity: self.capacity,
        }
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.data.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(window: &RollingWindow) -> Vec<f64> {
        window.snapshot().values()
    }

    #[test]
    fn test_push_below_capacity_keeps_all() {
        let mut window = RollingWindow::new(5);
        window.push_value(1.0);
        window.push_value(2.0);
        assert_eq!(values(&window), vec![1.0, 2.0]);
    }

    #[test]
    fn test_capacity_three_evicts_oldest() {
        let mut window = RollingWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push_value(v);
        }
        assert_eq!(values(&window), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut window = RollingWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.push_value(7.0);
        window.push_value(8.0);
        assert_eq!(values(&window), vec![8.0]);
    }

    #[test]
    fn test_nan_is_passed_through() {
        let mut window = RollingWindow::new(2);
        window.push_value(f64::NAN);
        let snapshot = window.snapshot();
        assert!(snapshot.samples()[0].value.is_nan());
    }

    #[test]
    fn test_snapshot_is_detached_from_buffer() {
        let mut window = RollingWindow::new(2);
        window.push_value(1.0);
        let snapshot = window.snapshot();
        window.push_value(2.0);
        window.push_value(3.0);
        assert_eq!(snapshot.values(), vec![1.0]);
        assert_eq!(snapshot.capacity(), 2);
    }

    #[test]
    fn test_latest_and_clear() {
        let mut window = RollingWindow::new(4);
        assert!(window.latest().is_none());
        window.push_value(5.0);
        assert_eq!(window.latest().map(|s| s.value), Some(5.0));
        window.clear();
        assert!(window.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity_and_keeps_suffix(
            capacity in 1usize..64,
            input in proptest::collection::vec(-1.0e6f64..1.0e6, 0..256),
        ) {
            let mut window = RollingWindow::new(capacity);
            for (i, v) in input.iter().enumerate() {
                window.push_value(*v);
                prop_assert!(window.len() <= capacity);
                prop_assert_eq!(window.len(), (i + 1).min(capacity));
            }
            let start = input.len().saturating_sub(capacity);
            prop_assert_eq!(values(&window), input[start..].to_vec());
        }
    }
}
