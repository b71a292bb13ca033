//! Drum and percussion classification

use super::Classifier;
use crate::analysis::instrument::{resolve_instrument, InstrumentCategory};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;

/// Percussion strategy (unpitched)
///
/// Decision ladder, first match wins:
///
/// | condition                          | instrument  | height |
/// |------------------------------------|-------------|--------|
/// | `zcr > 0.15 && flux > 8`           | snare       | 0.6    |
/// | `loudness > 0.08 && centroid < 200`| bassdrum    | 0.9    |
/// | `zcr > 0.1 && flux > 5`            | hihat       | 0.4    |
/// | `zcr > 0.2`                        | tambourine  | 0.3    |
/// | otherwise                          | tambourine  | 0.5    |
#[derive(Debug, Clone, Copy, Default)]
pub struct PercussionClassifier;

impl Classifier for PercussionClassifier {
    fn classify(&self, slice: &SliceAverages) -> Option<Note> {
        if slice.loudness < 0.02 {
            return None;
        }

        let zcr = slice.zero_crossing_rate;
        let (name, y_position) = if zcr > 0.15 && slice.flux > 8.0 {
            ("snare", 0.6)
        } else if slice.loudness > 0.08 && slice.centroid < 200.0 {
            ("bassdrum", 0.9)
        } else if zcr > 0.1 && slice.flux > 5.0 {
            ("hihat", 0.4)
        } else if zcr > 0.2 {
            ("tambourine", 0.3)
        } else {
            ("tambourine", 0.5)
        };

        let mut note = Note::new(
            resolve_instrument(name, InstrumentCategory::Percussion),
            slice.slice_index,
            y_position,
        );
        note.intensity = slice.loudness;
        Some(note)
    }
}
