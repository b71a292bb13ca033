//! Diatonic modal templates
//!
//! Each mode is a 12-bit pitch-class presence mask relative to its tonic
//! (bit `i` set ⇔ the pitch `i` semitones above the tonic is in the scale).

use crate::analysis::pitch_class::Mode;

/// Presence masks for all seven modes
#[derive(Debug, Clone)]
pub struct ModeTemplates {
    templates: [(Mode, [bool; 12]); 7],
}

impl ModeTemplates {
    /// Build the templates from each mode's interval set
    pub fn new() -> Self {
        Self {
            templates: Mode::ALL.map(|mode| (mode, Self::mask(mode))),
        }
    }

    fn mask(mode: Mode) -> [bool; 12] {
        let mut mask = [false; 12];
        for interval in mode.intervals() {
            mask[interval as usize] = true;
        }
        mask
    }

    /// Template for a mode
    pub fn get(&self, mode: Mode) -> &[bool; 12] {
        &self.templates[mode as usize].1
    }

    /// Templates in declaration order (ionian first)
    pub fn iter(&self) -> impl Iterator<Item = &(Mode, [bool; 12])> {
        self.templates.iter()
    }
}

impl Default for ModeTemplates {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(mask: &[bool; 12]) -> [u8; 12] {
        mask.map(u8::from)
    }

    #[test]
    fn test_ionian_and_locrian_masks() {
        let templates = ModeTemplates::new();
        assert_eq!(bits(templates.get(Mode::Ionian)), [1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(bits(templates.get(Mode::Locrian)), [1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0]);
        assert_eq!(bits(templates.get(Mode::Dorian)), [1, 0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_every_template_has_seven_tones() {
        for (_, mask) in ModeTemplates::new().iter() {
            assert_eq!(mask.iter().filter(|&&b| b).count(), 7);
            assert!(mask[0]);
        }
    }
}
