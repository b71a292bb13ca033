//! Block feature extractor
//!
//! Computes one [`FeatureFrame`] per fixed-size block of mono samples, emitting only
//! the fields of the configured [`FeatureSet`].
//!
//! # Features
//!
//! - **Loudness**: RMS of the raw block
//! - **Amplitude spectrum**: unscaled `|FFT(hann · x)|` over bins `0..=N/2`
//! - **Spectral centroid**: magnitude-weighted mean bin frequency (Hz)
//! - **Chroma**: bin power folded onto the 12 pitch classes, scaled to a maximum of 1
//! - **Zero-crossing rate**: sign changes per sample
//! - **Spectral rolloff**: frequency below which 99% of the spectral power lies (Hz)
//! - **Perceptual sharpness**: Zwicker-weighted centroid of Bark-band specific loudness
//!
//! The timbre descriptor can be requested but is not produced.

use super::frame::{FeatureFrame, FeatureSet};
use crate::analysis::pitch_class::{frequency_to_midi, PitchClass};
use crate::error::TranscriptionError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Fraction of spectral power below the rolloff frequency
const ROLLOFF_FRACTION: f32 = 0.99;

/// Chroma only folds bins inside this range (Hz)
const CHROMA_MIN_HZ: f32 = 27.5;
const CHROMA_MAX_HZ: f32 = 5000.0;

const BARK_BANDS: usize = 24;

/// Per-block spectral/timbral feature extractor
pub struct FeatureExtractor {
    block_size: usize,
    sample_rate: u32,
    features: FeatureSet,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl std::fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("block_size", &self.block_size)
            .field("sample_rate", &self.sample_rate)
            .field("features", &self.features)
            .finish()
    }
}

impl FeatureExtractor {
    /// Create an extractor for blocks of `block_size` samples
    ///
    /// # Errors
    ///
    /// `SetupError` if the block size is below 2 or the sample rate is zero
    pub fn new(
        block_size: usize,
        sample_rate: u32,
        features: FeatureSet,
    ) -> Result<Self, TranscriptionError> {
        if block_size < 2 {
            return Err(TranscriptionError::SetupError(format!(
                "Block size too small: {}",
                block_size
            )));
        }
        if sample_rate == 0 {
            return Err(TranscriptionError::SetupError(
                "Sample rate must be positive".to_string(),
            ));
        }

        log::debug!(
            "Feature extractor: block {} at {} Hz, {:?}",
            block_size,
            sample_rate,
            features
        );

        let fft = FftPlanner::new().plan_fft_forward(block_size);
        let window = (0..block_size)
            .map(|i| {
                0.5 - 0.5
                    * (2.0 * std::f32::consts::PI * i as f32 / (block_size - 1) as f32).cos()
            })
            .collect();

        Ok(Self {
            block_size,
            sample_rate,
            features,
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); block_size],
        })
    }

    /// Block length in samples
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Requested feature fields
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Frequency of spectrum bin `k` in Hz
    fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate as f32 / self.block_size as f32
    }

    /// Extract features from one block
    ///
    /// Shorter blocks are zero-padded; longer ones are truncated to the block size.
    pub fn extract(&mut self, block: &[f32]) -> FeatureFrame {
        let n = self.block_size;
        let block = &block[..block.len().min(n)];
        let wants = self.features;
        let mut frame = FeatureFrame::default();

        if wants.loudness {
            frame.loudness = Some(rms_padded(block, n));
        }
        if wants.zero_crossing_rate {
            frame.zero_crossing_rate = Some(zero_crossing_rate(block, n));
        }

        let needs_spectrum = wants.amplitude_spectrum
            || wants.spectral_centroid
            || wants.chroma
            || wants.spectral_rolloff
            || wants.perceptual_sharpness;
        if !needs_spectrum {
            return frame;
        }

        let spectrum = self.magnitude_spectrum(block);

        if wants.spectral_centroid {
            frame.spectral_centroid = Some(self.centroid(&spectrum));
        }
        if wants.chroma {
            frame.chroma = Some(self.chroma(&spectrum));
        }
        if wants.spectral_rolloff {
            frame.spectral_rolloff = Some(self.rolloff(&spectrum));
        }
        if wants.perceptual_sharpness {
            frame.perceptual_sharpness = Some(self.sharpness(&spectrum));
        }
        if wants.amplitude_spectrum {
            frame.amplitude_spectrum = Some(spectrum);
        }
        frame
    }

    fn magnitude_spectrum(&mut self, block: &[f32]) -> Vec<f32> {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let x = block.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(x * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        self.buffer[..=self.block_size / 2]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    fn centroid(&self, spectrum: &[f32]) -> f32 {
        let total: f32 = spectrum.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(k, &m)| self.bin_frequency(k) * m)
            .sum();
        weighted / total
    }

    fn chroma(&self, spectrum: &[f32]) -> [f32; 12] {
        let mut chroma = [0.0f32; 12];
        for (k, &m) in spectrum.iter().enumerate().skip(1) {
            let freq = self.bin_frequency(k);
            if !(CHROMA_MIN_HZ..=CHROMA_MAX_HZ).contains(&freq) {
                continue;
            }
            let pitch = PitchClass::from_midi(frequency_to_midi(freq));
            chroma[pitch.index()] += m * m;
        }
        let max = chroma.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            for c in &mut chroma {
                *c /= max;
            }
        }
        chroma
    }

    fn rolloff(&self, spectrum: &[f32]) -> f32 {
        let total: f32 = spectrum.iter().map(|m| m * m).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let threshold = total * ROLLOFF_FRACTION;
        let mut cumulative = 0.0;
        for (k, &m) in spectrum.iter().enumerate() {
            cumulative += m * m;
            if cumulative >= threshold {
                return self.bin_frequency(k);
            }
        }
        self.bin_frequency(spectrum.len() - 1)
    }

    fn sharpness(&self, spectrum: &[f32]) -> f32 {
        let mut band_energy = [0.0f32; BARK_BANDS];
        for (k, &m) in spectrum.iter().enumerate().skip(1) {
            let band = (hz_to_bark(self.bin_frequency(k)) as usize).min(BARK_BANDS - 1);
            band_energy[band] += m * m;
        }

        let specific: Vec<f32> = band_energy.iter().map(|e| e.powf(0.23)).collect();
        let total: f32 = specific.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }

        let weighted: f32 = specific
            .iter()
            .enumerate()
            .map(|(i, &loudness)| {
                let z = (i + 1) as f32;
                let g = if z < 15.0 { 1.0 } else { 0.066 * (0.171 * z).exp() };
                z * g * loudness
            })
            .sum();
        0.11 * weighted / total
    }
}

/// Critical-band rate (Zwicker & Terhardt)
fn hz_to_bark(hz: f32) -> f32 {
    13.0 * (0.00076 * hz).atan() + 3.5 * (hz / 7500.0).powi(2).atan()
}

fn rms_padded(block: &[f32], n: usize) -> f32 {
    let energy: f32 = block.iter().map(|x| x * x).sum();
    (energy / n as f32).sqrt()
}

fn zero_crossing_rate(block: &[f32], n: usize) -> f32 {
    let crossings = block
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / n as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn all_features() -> FeatureSet {
        FeatureSet {
            loudness: true,
            amplitude_spectrum: true,
            spectral_centroid: true,
            chroma: true,
            zero_crossing_rate: true,
            spectral_rolloff: true,
            perceptual_sharpness: true,
            timbre: true,
        }
    }

    fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin() * amplitude)
            .collect()
    }

    #[test]
    fn test_invalid_setup() {
        assert!(FeatureExtractor::new(1, SR, all_features()).is_err());
        assert!(FeatureExtractor::new(512, 0, all_features()).is_err());
    }

    #[test]
    fn test_sine_features() {
        let mut extractor = FeatureExtractor::new(2048, SR, all_features()).unwrap();
        let frame = extractor.extract(&sine(440.0, 0.5, 2048));

        let loudness = frame.loudness.unwrap();
        assert!((loudness - 0.5 / 2f32.sqrt()).abs() < 0.01, "rms {}", loudness);

        let centroid = frame.spectral_centroid.unwrap();
        assert!((centroid - 440.0).abs() < 60.0, "centroid {}", centroid);

        let chroma = frame.chroma.unwrap();
        assert_eq!(crate::features::frame::dominant_chroma_bin(&chroma), PitchClass::A.index());
        assert!((chroma[PitchClass::A.index()] - 1.0).abs() < 1e-6);

        let zcr = frame.zero_crossing_rate.unwrap();
        let expected = 2.0 * 440.0 / SR as f32;
        assert!((zcr - expected).abs() < 0.003, "zcr {}", zcr);

        let rolloff = frame.spectral_rolloff.unwrap();
        assert!(rolloff > 400.0 && rolloff < 600.0, "rolloff {}", rolloff);

        assert_eq!(frame.amplitude_spectrum.unwrap().len(), 1025);
        assert!(frame.perceptual_sharpness.unwrap() > 0.0);
    }

    #[test]
    fn test_requested_subset_only() {
        let features = FeatureSet {
            loudness: true,
            zero_crossing_rate: true,
            ..FeatureSet::default()
        };
        let mut extractor = FeatureExtractor::new(512, SR, features).unwrap();
        let frame = extractor.extract(&sine(1000.0, 0.3, 512));
        assert!(frame.loudness.is_some());
        assert!(frame.zero_crossing_rate.is_some());
        assert!(frame.amplitude_spectrum.is_none());
        assert!(frame.spectral_centroid.is_none());
        assert!(frame.chroma.is_none());
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut extractor = FeatureExtractor::new(512, SR, all_features()).unwrap();
        let frame = extractor.extract(&[0.0; 512]);
        assert_eq!(frame.loudness, Some(0.0));
        assert_eq!(frame.spectral_centroid, Some(0.0));
        assert_eq!(frame.spectral_rolloff, Some(0.0));
        assert_eq!(frame.perceptual_sharpness, Some(0.0));
        assert_eq!(frame.chroma, Some([0.0; 12]));
    }

    #[test]
    fn test_short_block_is_padded() {
        let mut extractor = FeatureExtractor::new(512, SR, all_features()).unwrap();
        let frame = extractor.extract(&[0.5; 128]);
        assert_eq!(frame.amplitude_spectrum.unwrap().len(), 257);
        assert!((frame.loudness.unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_is_unscaled() {
        // a Hann-windowed sine peaks near amplitude · N / 4
        let mut extractor = FeatureExtractor::new(1024, SR, all_features()).unwrap();
        let freq = 40.0 * SR as f32 / 1024.0;
        let spectrum = extractor.extract(&sine(freq, 0.5, 1024)).amplitude_spectrum.unwrap();
        assert!((spectrum[40] - 0.5 * 1024.0 / 4.0).abs() < 2.0, "peak {}", spectrum[40]);
    }

    #[test]
    fn test_noise_onset_flux_reaches_percussion_range() {
        use crate::features::onset::SpectralFlux;

        let mut extractor = FeatureExtractor::new(512, SR, all_features()).unwrap();
        let mut state = 7u32;
        let noise: Vec<f32> = (0..512)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                ((state >> 16) as f32 / 32768.0 - 1.0) * 0.3
            })
            .collect();

        let mut flux = SpectralFlux::new();
        let silent = extractor.extract(&[0.0; 512]).amplitude_spectrum.unwrap();
        assert_eq!(flux.update(&silent), None);
        let hit = extractor.extract(&noise).amplitude_spectrum.unwrap();
        let onset = flux.update(&hit).unwrap();
        assert!(onset > 8.0, "onset flux {}", onset);
    }

    #[test]
    fn test_brighter_signal_is_sharper() {
        let mut extractor = FeatureExtractor::new(2048, SR, all_features()).unwrap();
        let low = extractor.extract(&sine(200.0, 0.5, 2048)).perceptual_sharpness.unwrap();
        let high = extractor.extract(&sine(8000.0, 0.5, 2048)).perceptual_sharpness.unwrap();
        assert!(high > low, "low {} high {}", low, high);
    }
}
