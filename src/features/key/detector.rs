//! Song key and per-measure mode detection
//!
//! The song tonic comes from a global pitch-class histogram fed with the dominant
//! chroma bin of every feature record. Modes are scored per measure, independently,
//! from that measure's note pitch classes against the seven modal templates.

use super::templates::ModeTemplates;
use crate::analysis::pitch_class::{Mode, PitchClass};

/// Minimum number of pitched notes a measure needs for a mode decision
const MIN_PITCHES_FOR_MODE: usize = 3;

/// Song-level pitch histogram and mode scorer
#[derive(Debug, Clone, Default)]
pub struct KeyModeDetector {
    counts: [u32; 12],
    first_seen: Vec<PitchClass>,
    tonic: Option<PitchClass>,
    templates: ModeTemplates,
}

impl KeyModeDetector {
    /// Detector with an empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one dominant-pitch observation
    pub fn observe(&mut self, pitch: PitchClass) {
        if self.counts[pitch.index()] == 0 {
            self.first_seen.push(pitch);
        }
        self.counts[pitch.index()] += 1;
    }

    /// Observation counts indexed by semitone (C = 0)
    pub fn histogram(&self) -> &[u32; 12] {
        &self.counts
    }

    /// Pitch class with the highest count; ties go to the one observed first
    pub fn leading_pitch(&self) -> Option<PitchClass> {
        most_frequent(&self.first_seen, |p| self.counts[p.index()])
    }

    /// Current song tonic (as of the last [`refresh_tonic`](Self::refresh_tonic))
    pub fn tonic(&self) -> Option<PitchClass> {
        self.tonic
    }

    /// Re-derive the tonic from the histogram
    ///
    /// Returns the new tonic only when it changed.
    pub fn refresh_tonic(&mut self) -> Option<PitchClass> {
        let leading = self.leading_pitch()?;
        if self.tonic == Some(leading) {
            return None;
        }
        self.tonic = Some(leading);
        log::info!("Song key: {}", leading);
        Some(leading)
    }

    /// Mode of one measure's pitch classes (see [`detect_mode`])
    pub fn detect_mode(&self, pitch_classes: &[PitchClass]) -> Option<Mode> {
        detect_mode(pitch_classes, &self.templates)
    }

    /// Clear the histogram and tonic
    pub fn reset(&mut self) {
        self.counts = [0; 12];
        self.first_seen.clear();
        self.tonic = None;
    }
}

/// Detect the mode of a set of pitch classes
///
/// The measure's own most frequent pitch class is taken as the local tonic (ties go
/// to the first occurrence). Pitch presence relative to that tonic is compared with
/// each modal template by counting agreeing bits; the highest count wins and ties
/// resolve in declaration order, so ionian wins default ties.
///
/// # Returns
///
/// `None` when fewer than three pitch classes are given.
///
/// # Example
///
/// ```
/// use scorelens::analysis::pitch_class::{Mode, PitchClass};
/// use scorelens::features::key::{detect_mode, ModeTemplates};
///
/// let notes: Vec<PitchClass> = ["C", "E", "G", "D", "F", "A", "B"]
///     .iter()
///     .filter_map(|n| PitchClass::from_name(n))
///     .collect();
/// assert_eq!(detect_mode(&notes, &ModeTemplates::new()), Some(Mode::Ionian));
/// ```
pub fn detect_mode(pitch_classes: &[PitchClass], templates: &ModeTemplates) -> Option<Mode> {
    if pitch_classes.len() < MIN_PITCHES_FOR_MODE {
        return None;
    }

    let mut counts = [0u32; 12];
    let mut order = Vec::with_capacity(12);
    for &p in pitch_classes {
        if counts[p.index()] == 0 {
            order.push(p);
        }
        counts[p.index()] += 1;
    }
    let tonic = most_frequent(&order, |p| counts[p.index()])?;

    let mut present = [false; 12];
    for &p in pitch_classes {
        present[p.semitones_above(tonic)] = true;
    }

    let mut best: Option<(Mode, usize)> = None;
    for (mode, template) in templates.iter() {
        let score = present
            .iter()
            .zip(template.iter())
            .filter(|(a, b)| a == b)
            .count();
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*mode, score));
        }
    }

    log::trace!(
        "Mode detection: tonic {} over {} pitches → {:?}",
        tonic,
        pitch_classes.len(),
        best
    );
    best.map(|(mode, _)| mode)
}

fn most_frequent(order: &[PitchClass], count: impl Fn(PitchClass) -> u32) -> Option<PitchClass> {
    let mut best: Option<(PitchClass, u32)> = None;
    for &p in order {
        let c = count(p);
        if best.map_or(true, |(_, best_count)| c > best_count) {
            best = Some((p, c));
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(names: &[&str]) -> Vec<PitchClass> {
        names.iter().filter_map(|n| PitchClass::from_name(n)).collect()
    }

    #[test]
    fn test_c_major_is_ionian() {
        let detector = KeyModeDetector::new();
        let notes = pitches(&["C", "E", "G", "D", "F", "A", "B"]);
        assert_eq!(detector.detect_mode(&notes), Some(Mode::Ionian));
    }

    #[test]
    fn test_a_natural_minor_is_aeolian() {
        let detector = KeyModeDetector::new();
        let notes = pitches(&["A", "A", "B", "C", "D", "E", "F", "G"]);
        assert_eq!(detector.detect_mode(&notes), Some(Mode::Aeolian));
    }

    #[test]
    fn test_d_dorian() {
        let detector = KeyModeDetector::new();
        let notes = pitches(&["D", "D", "E", "F", "G", "A", "B", "C"]);
        assert_eq!(detector.detect_mode(&notes), Some(Mode::Dorian));
    }

    #[test]
    fn test_too_few_pitches() {
        let detector = KeyModeDetector::new();
        assert_eq!(detector.detect_mode(&pitches(&["C", "E"])), None);
        assert_eq!(detector.detect_mode(&[]), None);
    }

    #[test]
    fn test_single_repeated_pitch_ties_to_ionian() {
        // only the tonic bit is set; every template agrees on 5 bits → first declared wins
        let detector = KeyModeDetector::new();
        assert_eq!(detector.detect_mode(&pitches(&["G", "G", "G"])), Some(Mode::Ionian));
    }

    #[test]
    fn test_tonic_ties_go_to_first_seen() {
        let mut detector = KeyModeDetector::new();
        detector.observe(PitchClass::E);
        detector.observe(PitchClass::C);
        detector.observe(PitchClass::C);
        detector.observe(PitchClass::E);
        assert_eq!(detector.leading_pitch(), Some(PitchClass::E));

        detector.observe(PitchClass::C);
        assert_eq!(detector.leading_pitch(), Some(PitchClass::C));
    }

    #[test]
    fn test_refresh_tonic_reports_changes_only() {
        let mut detector = KeyModeDetector::new();
        assert_eq!(detector.refresh_tonic(), None);

        detector.observe(PitchClass::G);
        assert_eq!(detector.refresh_tonic(), Some(PitchClass::G));
        assert_eq!(detector.refresh_tonic(), None);
        assert_eq!(detector.tonic(), Some(PitchClass::G));

        detector.reset();
        assert_eq!(detector.tonic(), None);
        assert_eq!(detector.histogram(), &[0; 12]);
    }
}
