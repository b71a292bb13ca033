//! Wind and brass classification

use super::{centroid_to_height, pitched_note, Classifier, PitchEvidence};
use crate::analysis::instrument::{resolve_instrument, InstrumentCategory};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;

/// Wind strategy: trumpet above a 1200 Hz centroid, flute below
#[derive(Debug, Clone, Copy, Default)]
pub struct WindClassifier;

impl Classifier for WindClassifier {
    fn classify(&self, slice: &SliceAverages) -> Option<Note> {
        if slice.loudness < 0.006 {
            return None;
        }
        let pitch = PitchEvidence::from_slice(slice)?;
        let y_position = match pitch {
            PitchEvidence::Fundamental { y_position, .. } => y_position,
            PitchEvidence::Chroma { .. } => centroid_to_height(slice.centroid),
        };

        let name = if slice.centroid > 1200.0 { "trumpet" } else { "flute" };
        let mut note = pitched_note(
            resolve_instrument(name, InstrumentCategory::Wind),
            slice,
            &pitch,
            y_position,
        );
        note.sustained = slice.flux < 0.03;
        Some(note)
    }
}
