//! Silence gating and edge trimming for analysis windows

/// Silence gate configuration
#[derive(Debug, Clone)]
pub struct SilenceDetector {
    /// RMS below which a window is silent (default: 0.01)
    pub rms_threshold: f32,

    /// Amplitude below which a sample counts as near zero when trimming (default: 0.2)
    pub edge_threshold: f32,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self {
            rms_threshold: 0.01,
            edge_threshold: 0.2,
        }
    }
}

impl SilenceDetector {
    /// Whether the window's RMS falls under the gate
    pub fn is_silent(&self, samples: &[f32]) -> bool {
        rms(samples) < self.rms_threshold
    }

    /// Trim the window edges
    ///
    /// Scans at most half the window from each end: the start moves to the first
    /// near-zero sample, the end to the last near-zero sample found from the back.
    /// The returned slice is `samples[start..end]`.
    pub fn trim_edges<'a>(&self, samples: &'a [f32]) -> &'a [f32] {
        let n = samples.len();
        if n == 0 {
            return samples;
        }
        let half = n / 2;

        let start = (0..half)
            .find(|&i| samples[i].abs() < self.edge_threshold)
            .unwrap_or(0);
        let end = (1..half)
            .find(|&i| samples[n - i].abs() < self.edge_threshold)
            .map(|i| n - i)
            .unwrap_or(n - 1);

        if start >= end {
            return &samples[0..0];
        }
        &samples[start..end]
    }
}

/// Root-mean-square level of a window (0 for an empty window)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}
