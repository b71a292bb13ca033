//! Transcription result types

use super::instrument::{Instrument, InstrumentCategory};
use super::pitch_class::PitchClass;
use crate::color::descriptor::ColorDescriptor;
use serde::{Deserialize, Serialize};

/// One symbolic note event inside a measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Canonical instrument
    pub instrument: Instrument,

    /// Pitch class (None for unpitched percussion)
    pub pitch_class: Option<PitchClass>,

    /// Octave, nominally 1-8 (None for unpitched percussion)
    pub octave: Option<i32>,

    /// Vertical position in [0, 1]; 0 is the top of the cell (high pitch)
    pub y_position: f32,

    /// Subdivision slice the note occupies
    pub slice_index: usize,

    /// Held note (drawn with a sustain line)
    pub sustained: bool,

    /// Plucked articulation (strings only)
    pub plucked: bool,

    /// Loudness/brightness proxy
    pub intensity: f32,

    /// Gradient band height as a fraction of the cell (synths only)
    pub band_height: Option<f32>,

    /// Baked color
    pub color: ColorDescriptor,

    /// Right edge of the gradient band (synths only)
    pub color_right: Option<ColorDescriptor>,
}

impl Note {
    /// Create an uncolored note; colors are baked when its measure is sealed
    pub fn new(instrument: Instrument, slice_index: usize, y_position: f32) -> Self {
        Self {
            instrument,
            pitch_class: None,
            octave: None,
            y_position: y_position.clamp(0.0, 1.0),
            slice_index,
            sustained: false,
            plucked: false,
            intensity: 0.5,
            band_height: None,
            color: ColorDescriptor::NEUTRAL,
            color_right: None,
        }
    }
}

/// A sealed measure: notes in slice order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    notes: Vec<Note>,
    measure_number: usize,
    category: InstrumentCategory,
}

impl Measure {
    /// Seal a measure. `measure_number` is 1-based.
    pub fn new(measure_number: usize, category: InstrumentCategory, notes: Vec<Note>) -> Self {
        Self {
            notes,
            measure_number,
            category,
        }
    }

    /// Notes in construction (slice) order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// 1-based measure number
    pub fn measure_number(&self) -> usize {
        self.measure_number
    }

    /// Category the measure was transcribed through
    pub fn category(&self) -> InstrumentCategory {
        self.category
    }

    /// Notes in draw order: ascending y position
    pub fn notes_by_height(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by(|a, b| {
            a.y_position
                .partial_cmp(&b.y_position)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        notes
    }

    /// Synth bands to draw: everything when there are at most three notes,
    /// otherwise the lowest, middle and highest by y position
    pub fn synth_band_selection(&self) -> Vec<&Note> {
        let sorted = self.notes_by_height();
        if sorted.len() <= 3 {
            return sorted;
        }
        vec![sorted[0], sorted[sorted.len() / 2], sorted[sorted.len() - 1]]
    }
}

/// One finished recording pass through a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Category of every measure in the layer
    pub category: InstrumentCategory,

    /// Sealed measures in order
    pub measures: Vec<Measure>,

    /// Display label
    pub label: String,
}

impl Layer {
    /// Wrap sealed measures into a layer labelled after the category
    pub fn new(category: InstrumentCategory, measures: Vec<Measure>) -> Self {
        Self {
            category,
            measures,
            label: category.label().to_string(),
        }
    }

    /// Total number of notes across all measures
    pub fn note_count(&self) -> usize {
        self.measures.iter().map(|m| m.notes().len()).sum()
    }
}

/// Result of an offline transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Transcribed layer (may hold zero measures for very short input)
    pub layer: Layer,

    /// Tempo the measure grid was built on
    pub bpm: f32,

    /// Song tonic from the global pitch histogram, if any chroma was observed
    pub song_key: Option<PitchClass>,

    /// Run metadata
    pub metadata: TranscriptionMetadata,
}

/// Offline transcription metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of feature blocks processed
    pub blocks_processed: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,
}
