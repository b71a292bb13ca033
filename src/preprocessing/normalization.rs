//! Waveform normalization for analysis windows
//!
//! Pitch estimation expects samples in [-1, 1]. Windows may arrive as float samples
//! at arbitrary gain or as unsigned 8-bit analyser bytes centred on 128.
//!
//! # Example
//!
//! ```
//! use scorelens::preprocessing::normalization::{normalize_window, NormalizationMethod};
//!
//! let mut window = vec![0.0, 2.0, -4.0];
//! let gain = normalize_window(&mut window, NormalizationMethod::Peak);
//! assert_eq!(window, vec![0.0, 0.5, -1.0]);
//! assert_eq!(gain, 0.25);
//! ```

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

/// Normalization method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMethod {
    /// Scale down only when the peak exceeds 1.0
    Peak,
    /// Always scale so the peak is exactly 1.0
    PeakToUnity,
}

/// Peak absolute sample value
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Normalize a window in place and return the gain applied
///
/// Silent windows are left untouched (gain 1.0).
pub fn normalize_window(samples: &mut [f32], method: NormalizationMethod) -> f32 {
    let peak = peak(samples);
    if peak < EPSILON {
        return 1.0;
    }
    let gain = match method {
        NormalizationMethod::Peak if peak <= 1.0 => return 1.0,
        NormalizationMethod::Peak | NormalizationMethod::PeakToUnity => 1.0 / peak,
    };
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
    gain
}

/// Convert unsigned 8-bit analyser bytes to samples in [-1, 1)
pub fn bytes_to_samples(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect()
}
