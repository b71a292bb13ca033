//! Per-category slice classification
//!
//! Each instrument category turns the averaged features of one subdivision slice into
//! at most one [`Note`]. Slices below the category's loudness floor (or without any
//! usable pitch information, for pitched categories) are discarded.
//!
//! # Pitch resolution
//!
//! For pitched categories a fundamental-frequency estimate wins over chroma:
//! - **f0**: `midi = 69 + 12·log2(f/440)`, pitch class and octave from `round(midi)`,
//!   height from the log-frequency position of `f` inside 80-1200 Hz
//! - **chroma**: the strongest bin gives the pitch class, the spectral centroid gives
//!   the octave band; height is category-dependent

pub mod keys;
pub mod percussion;
pub mod strings;
pub mod synths;
pub mod wind;

pub use keys::KeysClassifier;
pub use percussion::PercussionClassifier;
pub use strings::StringsClassifier;
pub use synths::SynthsClassifier;
pub use wind::WindClassifier;

use crate::analysis::instrument::{Instrument, InstrumentCategory};
use crate::analysis::pitch_class::{frequency_to_midi, midi_to_octave, PitchClass};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;
use crate::features::frame::dominant_chroma_bin;

/// Lowest frequency of the note-height scale (Hz)
const HEIGHT_MIN_HZ: f32 = 80.0;
/// Highest frequency of the note-height scale (Hz)
const HEIGHT_MAX_HZ: f32 = 1200.0;

/// Slice-to-note strategy for one instrument category
pub trait Classifier: Send + Sync {
    /// Classify one slice; `None` discards it
    fn classify(&self, slice: &SliceAverages) -> Option<Note>;
}

/// Strategy for a category
pub fn classifier_for(category: InstrumentCategory) -> &'static dyn Classifier {
    match category {
        InstrumentCategory::Keys => &KeysClassifier,
        InstrumentCategory::Percussion => &PercussionClassifier,
        InstrumentCategory::Wind => &WindClassifier,
        InstrumentCategory::Strings => &StringsClassifier,
        InstrumentCategory::Synths => &SynthsClassifier,
    }
}

/// Pitch information recovered from a slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEvidence {
    /// Averaged fundamental frequency
    Fundamental {
        /// Pitch class of the rounded MIDI note
        pitch_class: PitchClass,
        /// Octave of the rounded MIDI note
        octave: i32,
        /// Log-frequency height
        y_position: f32,
    },
    /// Dominant bin of the averaged chroma vector
    Chroma {
        /// Strongest chroma bin
        pitch_class: PitchClass,
        /// Octave band of the spectral centroid
        octave: i32,
    },
}

impl PitchEvidence {
    /// Resolve pitch from a slice, preferring the fundamental frequency
    pub fn from_slice(slice: &SliceAverages) -> Option<Self> {
        if let Some(hz) = slice.fundamental_hz.filter(|&hz| hz > 0.0) {
            let midi = frequency_to_midi(hz);
            return Some(PitchEvidence::Fundamental {
                pitch_class: PitchClass::from_midi(midi),
                octave: midi_to_octave(midi),
                y_position: frequency_to_height(hz),
            });
        }
        slice.chroma.map(|chroma| PitchEvidence::Chroma {
            pitch_class: PitchClass::from_index(dominant_chroma_bin(&chroma)),
            octave: octave_from_centroid(slice.centroid),
        })
    }

    /// Resolved pitch class
    pub fn pitch_class(&self) -> PitchClass {
        match *self {
            PitchEvidence::Fundamental { pitch_class, .. }
            | PitchEvidence::Chroma { pitch_class, .. } => pitch_class,
        }
    }

    /// Resolved octave
    pub fn octave(&self) -> i32 {
        match *self {
            PitchEvidence::Fundamental { octave, .. } | PitchEvidence::Chroma { octave, .. } => {
                octave
            }
        }
    }
}

/// Normalized height of a frequency: 0 at 1200 Hz and above, 1 at 80 Hz and below
pub fn frequency_to_height(hz: f32) -> f32 {
    let f = hz.clamp(HEIGHT_MIN_HZ, HEIGHT_MAX_HZ);
    1.0 - (f.ln() - HEIGHT_MIN_HZ.ln()) / (HEIGHT_MAX_HZ.ln() - HEIGHT_MIN_HZ.ln())
}

/// Octave band of a spectral centroid (4 when the centroid is unknown)
pub fn octave_from_centroid(centroid: f32) -> i32 {
    match centroid {
        c if c <= 0.0 || c.is_nan() => 4,
        c if c < 200.0 => 2,
        c if c < 400.0 => 3,
        c if c < 800.0 => 4,
        c if c < 1600.0 => 5,
        _ => 6,
    }
}

/// Height from the spectral centroid: 200 Hz → 0.85, 4000 Hz → 0.15, clamped
pub fn centroid_to_height(centroid: f32) -> f32 {
    map_clamped(centroid, 200.0, 4000.0, 0.85, 0.15)
}

/// Linear map of `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`, clamped to the output range
pub fn map_clamped(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let t = (value - in_lo) / (in_hi - in_lo);
    let mapped = out_lo + t * (out_hi - out_lo);
    if out_lo < out_hi {
        mapped.clamp(out_lo, out_hi)
    } else {
        mapped.clamp(out_hi, out_lo)
    }
}

/// Pitched note with resolved pitch class and octave
fn pitched_note(
    instrument: Instrument,
    slice: &SliceAverages,
    pitch: &PitchEvidence,
    y_position: f32,
) -> Note {
    let mut note = Note::new(instrument, slice.slice_index, y_position);
    note.pitch_class = Some(pitch.pitch_class());
    note.octave = Some(pitch.octave());
    note
}
