//! Fundamental-frequency estimation
//!
//! Time-domain autocorrelation with parabolic peak refinement.
//!
//! # Algorithm
//!
//! 1. Normalize the window to [-1, 1] if it exceeds that range
//! 2. Silence gate: RMS below 0.01 → no pitch
//! 3. Trim window edges (near-zero threshold 0.2); fewer than 32 samples → no pitch
//! 4. Autocorrelation over lags `[0, n)`, computed as `IFFT(|FFT(x)|²)` with zero-padding
//!    to at least `2n` so the result equals the direct lag sum
//! 5. Walk forward from lag 0 while the ACF keeps decreasing (skips the zero-lag lobe)
//! 6. Take the lag of maximum ACF from there on
//! 7. Refine with a 3-point parabola around the peak
//! 8. `f0 = sample_rate / lag`
//!
//! # Example
//!
//! ```
//! use scorelens::features::pitch::PitchEstimator;
//!
//! let sample_rate = 44100;
//! let window: Vec<f32> = (0..2048)
//!     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate as f32).sin() * 0.5)
//!     .collect();
//!
//! let f0 = PitchEstimator::new().estimate(&window, sample_rate).unwrap();
//! assert!((f0 - 220.0).abs() < 3.0);
//! ```

use crate::preprocessing::normalization::{bytes_to_samples, normalize_window, NormalizationMethod};
use crate::preprocessing::silence::SilenceDetector;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Minimum trimmed window length that can carry a pitch
const MIN_TRIMMED_LEN: usize = 32;

/// Forward/inverse FFT pair for one padded autocorrelation length
#[derive(Clone)]
struct AutocorrelationPlan {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl AutocorrelationPlan {
    fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }
}

/// Autocorrelation pitch estimator
///
/// Results depend only on the window and its thresholds; a `None` result means
/// "no pitch this window". The FFT plan is kept between calls and rebuilt only when
/// the padded window length changes.
#[derive(Clone, Default)]
pub struct PitchEstimator {
    silence: SilenceDetector,
    plan: Option<AutocorrelationPlan>,
    buffer: Vec<Complex<f64>>,
}

impl std::fmt::Debug for PitchEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PitchEstimator")
            .field("silence", &self.silence)
            .field("fft_size", &self.plan.as_ref().map(|p| p.size))
            .finish()
    }
}

impl PitchEstimator {
    /// Estimator with the default gate (RMS 0.01) and trim threshold (0.2)
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with custom silence/trim thresholds
    pub fn with_silence_detector(silence: SilenceDetector) -> Self {
        Self {
            silence,
            ..Self::default()
        }
    }

    /// Estimate the fundamental frequency of a float window
    ///
    /// # Arguments
    ///
    /// * `samples` - Time-domain window (any gain)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    ///
    /// Frequency in Hz, or `None` for silence, too-short windows or no periodicity
    pub fn estimate(&mut self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        if samples.is_empty() || sample_rate == 0 {
            return None;
        }

        let mut window = samples.to_vec();
        normalize_window(&mut window, NormalizationMethod::Peak);

        if self.silence.is_silent(&window) {
            return None;
        }

        let trimmed = self.silence.trim_edges(&window);
        if trimmed.len() < MIN_TRIMMED_LEN {
            log::trace!("Pitch window too short after trim: {}", trimmed.len());
            return None;
        }

        let acf = self.autocorrelation(trimmed);
        let lag = peak_lag(&acf)?;

        let f0 = sample_rate as f64 / lag;
        log::trace!("Pitch estimate: {:.2} Hz (lag {:.3})", f0, lag);
        Some(f0 as f32)
    }

    /// Estimate from unsigned 8-bit analyser bytes (128 = zero)
    pub fn estimate_u8(&mut self, bytes: &[u8], sample_rate: u32) -> Option<f32> {
        self.estimate(&bytes_to_samples(bytes), sample_rate)
    }

    /// Linear autocorrelation `c[lag] = Σ x[i]·x[i+lag]` for `lag` in `[0, n)`
    fn autocorrelation(&mut self, signal: &[f32]) -> Vec<f64> {
        let n = signal.len();
        let fft_size = (2 * n).next_power_of_two();

        if self.plan.as_ref().map_or(true, |plan| plan.size != fft_size) {
            log::trace!("Planning autocorrelation FFT of size {}", fft_size);
            self.plan = Some(AutocorrelationPlan::new(fft_size));
        }
        let plan = match &self.plan {
            Some(plan) => plan,
            None => return Vec::new(),
        };

        self.buffer.clear();
        self.buffer
            .extend(signal.iter().map(|&x| Complex::new(x as f64, 0.0)));
        self.buffer.resize(fft_size, Complex::new(0.0, 0.0));

        plan.forward.process(&mut self.buffer);
        for x in &mut self.buffer {
            *x = *x * x.conj();
        }
        plan.inverse.process(&mut self.buffer);

        let scale = 1.0 / fft_size as f64;
        self.buffer[..n].iter().map(|x| x.re * scale).collect()
    }
}

/// Refined lag of the first periodicity peak, or `None` if only lag 0 qualifies
fn peak_lag(acf: &[f64]) -> Option<f64> {
    let size = acf.len();

    let mut d = 0;
    while d + 1 < size && acf[d] > acf[d + 1] {
        d += 1;
    }

    let mut max_value = f64::NEG_INFINITY;
    let mut max_pos = 0;
    for (lag, &value) in acf.iter().enumerate().skip(d) {
        if value > max_value {
            max_value = value;
            max_pos = lag;
        }
    }
    if max_pos == 0 {
        return None;
    }

    if max_pos + 1 < size {
        let (y1, y2, y3) = (acf[max_pos - 1], acf[max_pos], acf[max_pos + 1]);
        let a = (y1 + y3 - 2.0 * y2) / 2.0;
        let b = (y3 - y1) / 2.0;
        if a != 0.0 {
            return Some(max_pos as f64 - b / (2.0 * a));
        }
    }
    Some(max_pos as f64)
}
