//! # ScoreLens
//!
//! Audio-to-symbol transcription: turns a recorded performance into a quantized,
//! categorized and colorized score of measures and notes.
//!
//! ## Features
//!
//! - **Measure grid**: pause-aware playback clock, BPM-derived measures split into
//!   8 subdivision slices
//! - **Classification**: per-category heuristics (keys, percussion, wind, strings,
//!   synths) over averaged slice features
//! - **Pitch**: autocorrelation fundamental-frequency estimation with chroma fallback
//! - **Harmony**: song tonic from a pitch histogram, per-measure mode detection
//! - **Color**: scale palette → song-key rotation → modal tint
//!
//! ## Quick Start
//!
//! ```no_run
//! use scorelens::{transcribe_audio, InstrumentCategory, SessionConfig};
//!
//! // Mono samples, normalized to [-1, 1]
//! let samples: Vec<f32> = vec![];
//! let sample_rate = 44100;
//!
//! let result = transcribe_audio(&samples, sample_rate, InstrumentCategory::Keys, SessionConfig::default())?;
//!
//! for measure in &result.layer.measures {
//!     println!("Measure {}: {} notes", measure.measure_number(), measure.notes().len());
//! }
//! # Ok::<(), scorelens::TranscriptionError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio block → FeatureExtractor ─┐
//! Waveform window → PitchEstimator ┴→ FeatureRecord → TranscriptionSession
//!     → FeatureBuffer (slice by clock) → seal → Classifier → KeyModeDetector
//!     → ColorResolver → Measure → Layer
//! ```
//!
//! Live hosts feed [`FeatureRecord`]s into a [`TranscriptionSession`] themselves
//! (optionally through [`session::feature_queue`]); the `transcribe_*` functions drive
//! the same session offline.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod classify;
pub mod color;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod session;

// Re-export main types
pub use analysis::instrument::{Instrument, InstrumentCategory};
pub use analysis::pitch_class::{Mode, PitchClass};
pub use analysis::result::{Layer, Measure, Note, TranscriptionMetadata, TranscriptionResult};
pub use color::{ColorDescriptor, Palette, PaletteManager, PaletteService};
pub use config::SessionConfig;
pub use error::{PaletteError, TranscriptionError};
pub use features::{FeatureFrame, FeatureRecord};
pub use session::TranscriptionSession;

use features::{FeatureExtractor, PitchEstimator};
use io::RollingWaveform;
use session::ManualTimeSource;
use std::path::Path;
use std::sync::Arc;

/// Transcribe mono audio through one instrument category
///
/// The samples are cut into `config.block_size` blocks; each block yields one feature
/// record placed on the measure grid at the block's end time. Pitched categories also
/// run pitch estimation over the latest `config.pitch_window` samples. The recording
/// ends with the input, so a trailing partial measure is not transcribed.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `category` - Instrument family to transcribe as
/// * `config` - Session configuration
///
/// # Errors
///
/// `InvalidInput` for empty or non-finite input, a zero sample rate or a zero block
/// size; `SetupError` if the feature extractor cannot be built
///
/// # Example
///
/// ```
/// use scorelens::{transcribe_audio, InstrumentCategory, SessionConfig};
///
/// let samples = vec![0.0f32; 44100 * 5]; // 5 seconds of silence
/// let result = transcribe_audio(&samples, 44100, InstrumentCategory::Wind, SessionConfig::default())?;
/// assert_eq!(result.layer.note_count(), 0);
/// # Ok::<(), scorelens::TranscriptionError>(())
/// ```
pub fn transcribe_audio(
    samples: &[f32],
    sample_rate: u32,
    category: InstrumentCategory,
    config: SessionConfig,
) -> Result<TranscriptionResult, TranscriptionError> {
    run_offline(samples, sample_rate, category, config, None)
}

/// Transcribe with the curated palette of `root`/`mode` active
pub fn transcribe_audio_with_palette(
    samples: &[f32],
    sample_rate: u32,
    category: InstrumentCategory,
    config: SessionConfig,
    root: PitchClass,
    mode: Mode,
) -> Result<TranscriptionResult, TranscriptionError> {
    run_offline(samples, sample_rate, category, config, Some((root, mode)))
}

/// Decode an audio file and transcribe it
///
/// # Errors
///
/// `DecodingError` if the file cannot be decoded, plus everything
/// [`transcribe_audio`] returns
pub fn transcribe_file(
    path: impl AsRef<Path>,
    category: InstrumentCategory,
    config: SessionConfig,
) -> Result<TranscriptionResult, TranscriptionError> {
    let (samples, sample_rate) = io::decode_audio(path)?;
    transcribe_audio(&samples, sample_rate, category, config)
}

fn run_offline(
    samples: &[f32],
    sample_rate: u32,
    category: InstrumentCategory,
    config: SessionConfig,
    palette: Option<(PitchClass, Mode)>,
) -> Result<TranscriptionResult, TranscriptionError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting transcription: {} samples at {} Hz as {}",
        samples.len(),
        sample_rate,
        category
    );

    if samples.is_empty() {
        return Err(TranscriptionError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(TranscriptionError::InvalidInput(
            "Invalid sample rate".to_string(),
        ));
    }
    if config.block_size == 0 {
        return Err(TranscriptionError::InvalidInput(
            "Block size must be positive".to_string(),
        ));
    }
    if config.beats_per_measure == 0 {
        return Err(TranscriptionError::InvalidInput(
            "Beats per measure must be positive".to_string(),
        ));
    }
    if let Some(bpm) = config.bpm.filter(|bpm| !config::is_valid_bpm(*bpm)) {
        return Err(TranscriptionError::InvalidInput(format!(
            "Invalid BPM: {}",
            bpm
        )));
    }
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(TranscriptionError::InvalidInput(
            "Audio contains non-finite samples".to_string(),
        ));
    }

    let duration_seconds = samples.len() as f64 / sample_rate as f64;
    let block_size = config.block_size;
    let block_seconds = block_size as f64 / sample_rate as f64;

    let mut extractor = FeatureExtractor::new(block_size, sample_rate, category.requested_features())?;
    let mut estimator = PitchEstimator::new();
    let mut waveform = RollingWaveform::new(config.pitch_window);

    let time = ManualTimeSource::new();
    let mut session = TranscriptionSession::new(config, Arc::new(time.clone()));
    if let Some((root, mode)) = palette {
        session.apply_local_palette(root, mode);
    }
    session.begin_recording(category, Some(duration_seconds));

    let mut blocks_processed = 0;
    for (index, block) in samples.chunks(block_size).enumerate() {
        time.set((index + 1) as f64 * block_seconds);
        waveform.push(block);

        let frame = extractor.extract(block);
        let fundamental_hz = if category.is_pitched() {
            estimator.estimate(&waveform.window(), sample_rate)
        } else {
            None
        };
        session.process(FeatureRecord::new(frame, fundamental_hz));
        blocks_processed += 1;
    }

    let bpm = session.bpm();
    let song_key = session.song_key();
    let layer = session
        .finish_recording()
        .cloned()
        .unwrap_or_else(|| Layer::new(category, Vec::new()));

    if layer.measures.is_empty() {
        log::warn!(
            "Input of {:.2}s is shorter than one {} BPM measure",
            duration_seconds,
            bpm
        );
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Transcribed {} measures / {} notes in {:.1} ms",
        layer.measures.len(),
        layer.note_count(),
        processing_time_ms
    );

    Ok(TranscriptionResult {
        layer,
        bpm,
        song_key,
        metadata: TranscriptionMetadata {
            duration_seconds,
            sample_rate,
            blocks_processed,
            processing_time_ms,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, seconds: f32, sample_rate: u32) -> Vec<f32> {
        (0..(seconds * sample_rate as f32) as usize)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_invalid_input() {
        let config = SessionConfig::default();
        assert!(matches!(
            transcribe_audio(&[], 44100, InstrumentCategory::Keys, config.clone()),
            Err(TranscriptionError::InvalidInput(_))
        ));
        assert!(matches!(
            transcribe_audio(&[0.1; 10], 0, InstrumentCategory::Keys, config.clone()),
            Err(TranscriptionError::InvalidInput(_))
        ));
        assert!(matches!(
            transcribe_audio(&[f32::NAN; 10], 44100, InstrumentCategory::Keys, config),
            Err(TranscriptionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_grid_config() {
        let samples = sine(440.0, 0.5, 22050);
        let infinite = SessionConfig {
            bpm: Some(f32::INFINITY),
            ..SessionConfig::default()
        };
        assert!(matches!(
            transcribe_audio(&samples, 22050, InstrumentCategory::Keys, infinite),
            Err(TranscriptionError::InvalidInput(_))
        ));
        let no_beats = SessionConfig {
            beats_per_measure: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            transcribe_audio(&samples, 22050, InstrumentCategory::Keys, no_beats),
            Err(TranscriptionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_short_input_gives_empty_layer() {
        let samples = sine(440.0, 1.0, 22050);
        let result = transcribe_audio(&samples, 22050, InstrumentCategory::Keys, SessionConfig::default()).unwrap();
        assert!(result.layer.measures.is_empty());
        assert_eq!(result.layer.category, InstrumentCategory::Keys);
        assert_eq!(result.bpm, 130.0);
    }

    #[test]
    fn test_palette_drives_colors() {
        let samples = sine(440.0, 4.5, 22050);
        let config = SessionConfig {
            bpm: Some(120.0),
            ..SessionConfig::default()
        };
        let result = transcribe_audio_with_palette(
            &samples,
            22050,
            InstrumentCategory::Wind,
            config,
            PitchClass::A,
            Mode::Aeolian,
        )
        .unwrap();
        let palette = Palette::local(PitchClass::A, Mode::Aeolian);
        let tonic_swatch = palette.swatches()[0];
        assert_eq!(result.layer.measures.len(), 2);
        for note in result.layer.measures.iter().flat_map(|m| m.notes()) {
            assert_eq!(note.pitch_class, Some(PitchClass::A));
            assert_eq!(note.color.h, tonic_swatch.h);
        }
    }
}
