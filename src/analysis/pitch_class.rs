//! Pitch classes, diatonic modes and frequency/MIDI conversions

use serde::{Deserialize, Serialize};

/// One of the 12 octave-independent note names
///
/// Enharmonic spellings are normalized to sharps on parse ("Db" → `CSharp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    /// C
    #[serde(rename = "C")]
    C,
    /// C♯ / D♭
    #[serde(rename = "C#")]
    CSharp,
    /// D
    #[serde(rename = "D")]
    D,
    /// D♯ / E♭
    #[serde(rename = "D#")]
    DSharp,
    /// E
    #[serde(rename = "E")]
    E,
    /// F
    #[serde(rename = "F")]
    F,
    /// F♯ / G♭
    #[serde(rename = "F#")]
    FSharp,
    /// G
    #[serde(rename = "G")]
    G,
    /// G♯ / A♭
    #[serde(rename = "G#")]
    GSharp,
    /// A
    #[serde(rename = "A")]
    A,
    /// A♯ / B♭
    #[serde(rename = "A#")]
    ASharp,
    /// B
    #[serde(rename = "B")]
    B,
}

impl PitchClass {
    /// All pitch classes in semitone order, starting at C
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class for a semitone index (wraps modulo 12)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Semitone index (C = 0 … B = 11)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sharp-spelled note name (e.g. "C#")
    pub fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        NAMES[self.index()]
    }

    /// Parse a note name, normalizing flats to sharps
    ///
    /// Returns `None` for anything that is not a recognized spelling.
    ///
    /// # Example
    ///
    /// ```
    /// use scorelens::analysis::pitch_class::PitchClass;
    ///
    /// assert_eq!(PitchClass::from_name("Bb"), Some(PitchClass::ASharp));
    /// assert_eq!(PitchClass::from_name("F#"), Some(PitchClass::FSharp));
    /// assert_eq!(PitchClass::from_name("H"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let pitch = match name.trim() {
            "C" => PitchClass::C,
            "C#" | "Db" => PitchClass::CSharp,
            "D" => PitchClass::D,
            "D#" | "Eb" => PitchClass::DSharp,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "F#" | "Gb" => PitchClass::FSharp,
            "G" => PitchClass::G,
            "G#" | "Ab" => PitchClass::GSharp,
            "A" => PitchClass::A,
            "A#" | "Bb" => PitchClass::ASharp,
            "B" => PitchClass::B,
            _ => return None,
        };
        Some(pitch)
    }

    /// Pitch class of a (fractional) MIDI note number, rounded to the nearest semitone
    pub fn from_midi(midi: f32) -> Self {
        Self::from_index((midi.round() as i64).rem_euclid(12) as usize)
    }

    /// Upward distance in semitones from `root` to `self` (0..12)
    pub fn semitones_above(self, root: PitchClass) -> usize {
        (self.index() + 12 - root.index()) % 12
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a frequency in Hz to a fractional MIDI note number (A4 = 440 Hz = 69)
pub fn frequency_to_midi(frequency_hz: f32) -> f32 {
    69.0 + 12.0 * (frequency_hz / 440.0).log2()
}

/// Octave of a MIDI note number (MIDI 60 → 4)
pub fn midi_to_octave(midi: f32) -> i32 {
    (midi.round() / 12.0).floor() as i32 - 1
}

/// The seven diatonic modes, in declaration order (which is also tie-break order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major scale
    Ionian,
    /// Minor with raised sixth
    Dorian,
    /// Minor with lowered second
    Phrygian,
    /// Major with raised fourth
    Lydian,
    /// Major with lowered seventh
    Mixolydian,
    /// Natural minor
    Aeolian,
    /// Diminished fifth
    Locrian,
}

impl Mode {
    /// All modes in declaration order
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Lowercase mode name
    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "ionian",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        }
    }

    /// Parse a mode name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|m| m.name() == lower)
    }

    /// Semitone offsets of the seven scale degrees from the tonic
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a440_is_midi_69() {
        let midi = frequency_to_midi(440.0);
        assert!((midi - 69.0).abs() < 1e-4);
        assert_eq!(PitchClass::from_midi(midi), PitchClass::A);
        assert_eq!(midi_to_octave(midi), 4);
    }

    #[test]
    fn test_middle_c() {
        let midi = frequency_to_midi(261.63);
        assert_eq!(PitchClass::from_midi(midi), PitchClass::C);
        assert_eq!(midi_to_octave(midi), 4);
    }

    #[test]
    fn test_enharmonic_normalization() {
        for (flat, sharp) in [("Db", "C#"), ("Eb", "D#"), ("Gb", "F#"), ("Ab", "G#"), ("Bb", "A#")] {
            assert_eq!(PitchClass::from_name(flat), PitchClass::from_name(sharp));
        }
        assert_eq!(PitchClass::from_name("Bb").map(PitchClass::name), Some("A#"));
    }

    #[test]
    fn test_semitones_above() {
        assert_eq!(PitchClass::C.semitones_above(PitchClass::A), 3);
        assert_eq!(PitchClass::A.semitones_above(PitchClass::C), 9);
        assert_eq!(PitchClass::G.semitones_above(PitchClass::G), 0);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("Dorian"), Some(Mode::Dorian));
        assert_eq!(Mode::from_name("blues"), None);
    }
}
