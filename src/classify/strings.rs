//! Guitar and string classification

use super::{centroid_to_height, pitched_note, Classifier, PitchEvidence};
use crate::analysis::instrument::{resolve_instrument, InstrumentCategory};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;

/// Strings strategy
///
/// Centroid bands pick the instrument (`<400` electric bass, `<800` cello, otherwise a
/// guitar chosen by zero-crossing rate). `zcr > 0.12` marks a plucked articulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringsClassifier;

impl Classifier for StringsClassifier {
    fn classify(&self, slice: &SliceAverages) -> Option<Note> {
        if slice.loudness < 0.008 {
            return None;
        }
        let pitch = PitchEvidence::from_slice(slice)?;
        let y_position = match pitch {
            PitchEvidence::Fundamental { y_position, .. } => y_position,
            PitchEvidence::Chroma { .. } => centroid_to_height(slice.centroid),
        };

        let zcr = slice.zero_crossing_rate;
        let name = if slice.centroid < 400.0 {
            "electricbass"
        } else if slice.centroid < 800.0 {
            "cello"
        } else if zcr > 0.15 {
            "electricguitar"
        } else {
            "acousticguitar"
        };

        let mut note = pitched_note(
            resolve_instrument(name, InstrumentCategory::Strings),
            slice,
            &pitch,
            y_position,
        );
        note.sustained = slice.flux < 0.02;
        note.plucked = zcr > 0.12;
        Some(note)
    }
}
