//! Rolling raw-waveform window

use std::collections::VecDeque;

/// Fixed-capacity window over the most recent samples
///
/// Starts zero-filled, so a window is available from the first block on.
#[derive(Debug, Clone)]
pub struct RollingWaveform {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl RollingWaveform {
    /// Zero-filled window of `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: std::iter::repeat(0.0).take(capacity).collect(),
            capacity,
        }
    }

    /// Append samples, dropping the oldest beyond capacity
    pub fn push(&mut self, block: &[f32]) {
        if self.capacity == 0 {
            return;
        }
        let block = &block[block.len().saturating_sub(self.capacity)..];
        let overflow = (self.samples.len() + block.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(block.iter().copied());
    }

    /// Current window, oldest sample first
    pub fn window(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    /// Window length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Zero the window
    pub fn clear(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0.0);
    }
}
