//! Fixed color-theory tables
//!
//! Pitch hues follow the circle of fifths starting from C at 0°, so neighbouring keys
//! get neighbouring hues. Modes tint hue, saturation and brightness; octaves shift
//! saturation and brightness.

use crate::analysis::instrument::Instrument;
use crate::analysis::pitch_class::{Mode, PitchClass};

/// Saturation of a pitched note before octave and mode adjustments
pub const BASE_SATURATION: f32 = 92.0;

/// Brightness of a pitched note before octave and mode adjustments
pub const BASE_BRIGHTNESS: f32 = 85.0;

/// Hue used for percussion instruments missing from the hue table
pub const DEFAULT_PERCUSSION_HUE: f32 = 20.0;

/// Pitch classes in circle-of-fifths order
pub const CIRCLE_OF_FIFTHS: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::G,
    PitchClass::D,
    PitchClass::A,
    PitchClass::E,
    PitchClass::B,
    PitchClass::FSharp,
    PitchClass::CSharp,
    PitchClass::GSharp,
    PitchClass::DSharp,
    PitchClass::ASharp,
    PitchClass::F,
];

/// Hues matching [`CIRCLE_OF_FIFTHS`]
const FIFTHS_HUES: [f32; 12] = [
    0.0, 30.0, 60.0, 90.0, 150.0, 195.0, 225.0, 255.0, 285.0, 310.0, 340.0, 355.0,
];

/// Base hue of a pitch class
///
/// The same table rotates curated palettes to a root key and derives the song-key
/// hue offset (`-base_hue(tonic)`).
pub fn base_hue(pitch: PitchClass) -> f32 {
    CIRCLE_OF_FIFTHS
        .iter()
        .position(|&p| p == pitch)
        .map(|i| FIFTHS_HUES[i])
        .unwrap_or(0.0)
}

/// Hue/saturation/brightness tint of a mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalTint {
    /// Hue shift in degrees
    pub h: f32,
    /// Saturation shift
    pub s: f32,
    /// Brightness shift
    pub b: f32,
}

/// Tint applied to theory-derived colors for a mode
pub fn modal_tint(mode: Mode) -> ModalTint {
    let (h, s, b) = match mode {
        Mode::Ionian => (12.0, 15.0, 8.0),
        Mode::Mixolydian => (8.0, 12.0, 5.0),
        Mode::Lydian => (18.0, 18.0, 12.0),
        Mode::Dorian => (-5.0, 8.0, 2.0),
        Mode::Aeolian => (-12.0, -5.0, -5.0),
        Mode::Phrygian => (-20.0, -10.0, -10.0),
        Mode::Locrian => (-28.0, -20.0, -15.0),
    };
    ModalTint { h, s, b }
}

/// Saturation and brightness deltas of an octave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctaveShift {
    /// Saturation delta, -12 at octave 1 to +8 at octave 8
    pub saturation: f32,
    /// Brightness delta, -28 at octave 1 to +15 at octave 8
    pub brightness: f32,
}

/// Octave deltas; unknown octaves count as 4 and the range is clamped to 1-8
pub fn octave_shift(octave: Option<i32>) -> OctaveShift {
    let o = octave.unwrap_or(4).clamp(1, 8);
    let t = (o - 1) as f32 / 7.0;
    OctaveShift {
        saturation: t * 20.0 - 12.0,
        brightness: t * 43.0 - 28.0,
    }
}

/// Fixed hue of a percussion instrument
pub fn percussion_hue(instrument: Instrument) -> f32 {
    match instrument {
        Instrument::Kick | Instrument::BassDrum => 5.0,
        Instrument::Snare => 20.0,
        Instrument::Toms => 35.0,
        Instrument::HiHat => 50.0,
        Instrument::CrashSplash => 55.0,
        Instrument::Tambourine => 45.0,
        Instrument::Clap => 25.0,
        _ => DEFAULT_PERCUSSION_HUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_of_fifths_hues() {
        assert_eq!(base_hue(PitchClass::C), 0.0);
        assert_eq!(base_hue(PitchClass::A), 90.0);
        assert_eq!(base_hue(PitchClass::FSharp), 225.0);
        assert_eq!(base_hue(PitchClass::F), 355.0);
        // every pitch class appears exactly once
        let mut seen = [false; 12];
        for p in CIRCLE_OF_FIFTHS {
            assert!(!seen[p.index()]);
            seen[p.index()] = true;
        }
    }

    #[test]
    fn test_octave_shift_range() {
        let low = octave_shift(Some(1));
        assert_eq!(low.saturation, -12.0);
        assert_eq!(low.brightness, -28.0);

        let high = octave_shift(Some(8));
        assert!((high.saturation - 8.0).abs() < 1e-5);
        assert!((high.brightness - 15.0).abs() < 1e-5);

        assert_eq!(octave_shift(None), octave_shift(Some(4)));
        assert_eq!(octave_shift(Some(12)), high);
        assert_eq!(octave_shift(Some(-3)), low);
    }

    #[test]
    fn test_percussion_hues() {
        assert_eq!(percussion_hue(Instrument::Kick), 5.0);
        assert_eq!(percussion_hue(Instrument::HiHat), 50.0);
        assert_eq!(percussion_hue(Instrument::Piano), DEFAULT_PERCUSSION_HUE);
    }
}
