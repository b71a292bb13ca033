//! Keyboard and mallet classification

use super::{map_clamped, pitched_note, Classifier, PitchEvidence};
use crate::analysis::instrument::{resolve_instrument, InstrumentCategory};
use crate::analysis::result::Note;
use crate::features::buffer::SliceAverages;

/// Keys strategy
///
/// Confident when `loudness > 0.008` and `flux < 10`. Chroma-only slices place the
/// note by chroma bin (C low, B high).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysClassifier;

impl Classifier for KeysClassifier {
    fn classify(&self, slice: &SliceAverages) -> Option<Note> {
        let pitch = PitchEvidence::from_slice(slice)?;
        if !(slice.loudness > 0.008 && slice.flux < 10.0) {
            return None;
        }

        let y_position = match pitch {
            PitchEvidence::Fundamental { y_position, .. } => y_position,
            PitchEvidence::Chroma { pitch_class, .. } => {
                map_clamped(pitch_class.index() as f32, 0.0, 11.0, 0.85, 0.15)
            }
        };

        let name = if slice.centroid < 400.0 {
            "electricorgan"
        } else if slice.centroid > 2000.0 {
            "xylophone"
        } else {
            "piano"
        };

        let mut note = pitched_note(
            resolve_instrument(name, InstrumentCategory::Keys),
            slice,
            &pitch,
            y_position,
        );
        note.sustained = slice.loudness > 0.01 && slice.flux < 0.05;
        Some(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::instrument::Instrument;
    use crate::analysis::pitch_class::PitchClass;

    fn slice(loudness: f32, centroid: f32, flux: f32) -> SliceAverages {
        SliceAverages {
            slice_index: 3,
            loudness,
            centroid,
            flux,
            fundamental_hz: Some(440.0),
            ..SliceAverages::default()
        }
    }

    #[test]
    fn test_confidence_gate() {
        assert!(KeysClassifier.classify(&slice(0.008, 1000.0, 0.0)).is_none());
        assert!(KeysClassifier.classify(&slice(0.2, 1000.0, 10.0)).is_none());
        assert!(KeysClassifier.classify(&slice(0.2, 1000.0, 9.9)).is_some());
    }

    #[test]
    fn test_instrument_by_centroid() {
        let organ = KeysClassifier.classify(&slice(0.1, 300.0, 0.0)).unwrap();
        assert_eq!(organ.instrument, Instrument::ElectricOrgan);
        let piano = KeysClassifier.classify(&slice(0.1, 1000.0, 0.0)).unwrap();
        assert_eq!(piano.instrument, Instrument::Piano);
        let xylo = KeysClassifier.classify(&slice(0.1, 2500.0, 0.0)).unwrap();
        assert_eq!(xylo.instrument, Instrument::Xylophone);
    }

    #[test]
    fn test_pitch_and_sustain() {
        let note = KeysClassifier.classify(&slice(0.1, 1000.0, 0.01)).unwrap();
        assert_eq!(note.pitch_class, Some(PitchClass::A));
        assert_eq!(note.octave, Some(4));
        assert_eq!(note.slice_index, 3);
        assert!(note.sustained);

        let struck = KeysClassifier.classify(&slice(0.1, 1000.0, 2.0)).unwrap();
        assert!(!struck.sustained);
    }

    #[test]
    fn test_chroma_height_by_bin() {
        let mut chroma = [0.0; 12];
        chroma[11] = 1.0;
        let slice = SliceAverages {
            loudness: 0.1,
            centroid: 600.0,
            chroma: Some(chroma),
            ..SliceAverages::default()
        };
        let note = KeysClassifier.classify(&slice).unwrap();
        assert_eq!(note.pitch_class, Some(PitchClass::B));
        assert_eq!(note.octave, Some(4));
        assert!((note.y_position - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_no_pitch_information() {
        let slice = SliceAverages {
            loudness: 0.3,
            centroid: 600.0,
            ..SliceAverages::default()
        };
        assert!(KeysClassifier.classify(&slice).is_none());
    }
}
