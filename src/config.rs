//! Configuration parameters for a transcription session

/// Default tempo when neither the user nor the duration heuristic supplies one
pub const DEFAULT_BPM: f32 = 120.0;

/// Transcription session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    // Timing grid
    /// User-set tempo in BPM (default: None)
    /// When None, the tempo is estimated from the track duration if known.
    pub bpm: Option<f32>,

    /// Beats per measure (default: 4)
    pub beats_per_measure: u32,

    /// Subdivision slices per measure (default: 8)
    pub subdivisions: usize,

    // Feature extraction
    /// Samples per feature block (default: 512)
    /// One feature record is produced per block.
    pub block_size: usize,

    /// Raw waveform window used for pitch estimation (default: 2048)
    pub pitch_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bpm: None,
            beats_per_measure: 4,
            subdivisions: 8,
            block_size: 512,
            pitch_window: 2048,
        }
    }
}

impl SessionConfig {
    /// Resolve the tempo for a recording
    ///
    /// A valid user-set BPM always wins; otherwise the duration heuristic is used, and
    /// [`DEFAULT_BPM`] when the duration is unknown. Non-finite or non-positive
    /// values are ignored.
    pub fn resolve_bpm(&self, duration_seconds: Option<f64>) -> f32 {
        if let Some(bpm) = self.bpm.filter(|bpm| !is_valid_bpm(*bpm)) {
            log::warn!("Ignoring invalid BPM {}", bpm);
        }
        match (self.bpm.filter(|bpm| is_valid_bpm(*bpm)), duration_seconds) {
            (Some(bpm), _) => bpm,
            (None, Some(duration)) if duration.is_finite() => estimate_bpm_from_duration(duration),
            _ => DEFAULT_BPM,
        }
    }
}

/// Whether a tempo can drive the measure grid
pub fn is_valid_bpm(bpm: f32) -> bool {
    bpm.is_finite() && bpm > 0.0
}

/// Length of one measure in seconds: `(60 / bpm) * beats_per_measure`
///
/// A measure always spans at least one beat.
pub fn measure_duration(bpm: f32, beats_per_measure: u32) -> f64 {
    (60.0 / bpm as f64) * beats_per_measure.max(1) as f64
}

/// Coarse tempo guess from track length
///
/// Short tracks lean faster, long tracks slower.
pub fn estimate_bpm_from_duration(duration_seconds: f64) -> f32 {
    if duration_seconds < 120.0 {
        130.0
    } else if duration_seconds > 300.0 {
        100.0
    } else {
        DEFAULT_BPM
    }
}
