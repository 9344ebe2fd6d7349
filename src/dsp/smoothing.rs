use std::collections::VecDeque;

/// Default number of distance readings averaged together.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// Fixed-capacity moving average over the most recent readings.
///
/// Ranging hardware reports jittery distances. Averaging the last few
/// readings takes the edge off before they become pitch. While the window is
/// still filling, the mean covers whatever has arrived so far.
///
/// A capacity of 1 passes readings through unchanged.
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    readings: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingWindow {
    /// Capacity 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Add a reading, drop the oldest if over capacity, return the mean.
    pub fn push(&mut self, reading: f32) -> f32 {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
        self.readings.iter().sum::<f32>() / self.readings.len() as f32
    }

    /// Mean of the held readings, `None` before the first push.
    pub fn mean(&self) -> Option<f32> {
        if self.readings.is_empty() {
            None
        } else {
            Some(self.readings.iter().sum::<f32>() / self.readings.len() as f32)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_average_over_four() {
        let mut window = SmoothingWindow::new(4);
        let smoothed: Vec<f32> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .map(|&d| window.push(d))
            .collect();
        assert_eq!(smoothed, vec![1.0, 1.5, 2.0, 2.5, 3.5]);
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn size_one_passes_through() {
        let mut window = SmoothingWindow::new(1);
        assert_eq!(window.push(0.3), 0.3);
        assert_eq!(window.push(0.9), 0.9);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn zero_capacity_behaves_like_one() {
        let mut window = SmoothingWindow::new(0);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.push(2.0), 2.0);
    }

    #[test]
    fn mean_and_clear() {
        let mut window = SmoothingWindow::default();
        assert_eq!(window.mean(), None);
        window.push(0.2);
        window.push(0.4);
        assert!((window.mean().unwrap() - 0.3).abs() < 1e-6);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
    }
}
