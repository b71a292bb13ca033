//! Synthesizer classification

use super::{centroid_to_height, map_clamped, octave_from_centroid, Classifier, PitchEvidence};
use crate::analysis::instrument::{resolve_instrument, InstrumentCategory};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;

/// Synths strategy
///
/// Sub-type ladder: `sharpness > 2.5` lead, `centroid < 400` bass synth,
/// `flux < 0.01` pad, otherwise a generic synth. Height and octave start from the
/// centroid; a fundamental overrides pitch, octave and height while chroma only
/// overrides the pitch class. The gradient band height follows loudness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthsClassifier;

impl Classifier for SynthsClassifier {
    fn classify(&self, slice: &SliceAverages) -> Option<Note> {
        if slice.loudness < 0.005 {
            return None;
        }

        let name = if slice.sharpness > 2.5 {
            "lead"
        } else if slice.centroid < 400.0 {
            "bass_synth"
        } else if slice.flux < 0.01 {
            "pad"
        } else {
            "synth"
        };

        let mut y_position = centroid_to_height(slice.centroid);
        let mut octave = octave_from_centroid(slice.centroid);
        let pitch_class = match PitchEvidence::from_slice(slice)? {
            PitchEvidence::Fundamental {
                pitch_class,
                octave: f0_octave,
                y_position: f0_height,
            } => {
                octave = f0_octave;
                y_position = f0_height;
                pitch_class
            }
            PitchEvidence::Chroma { pitch_class, .. } => pitch_class,
        };

        let mut note = Note::new(
            resolve_instrument(name, InstrumentCategory::Synths),
            slice.slice_index,
            y_position,
        );
        note.pitch_class = Some(pitch_class);
        note.octave = Some(octave);
        note.sustained = slice.flux < 0.02;
        note.intensity = if slice.sharpness != 0.0 { slice.sharpness } else { 1.0 };
        note.band_height = Some(map_clamped(slice.loudness, 0.0, 0.3, 0.12, 0.28));
        Some(note)
    }
}
