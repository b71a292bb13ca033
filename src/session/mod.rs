//! Transcription session
//!
//! Owns the clock, feature buffer, key detector, palette and layers, and turns the
//! incoming feature stream into sealed, colored measures.
//!
//! # Flow per feature record
//!
//! 1. Ignored unless a recording is active and the clock is playing
//! 2. The dominant chroma bin feeds the song-key histogram
//! 3. The record lands in its (measure, subdivision) slice at the clock's elapsed time
//! 4. When a record is the first past a measure boundary, the previous measure is
//!    sealed: song key refresh, per-slice classification, mode detection, color baking
//!
//! A session is owned by a single consumer. Producers on other threads hand records
//! over through [`feature_queue`].

pub mod clock;
pub mod layers;

pub use clock::{ManualTimeSource, MonotonicTimeSource, PlaybackClock, TimeSource};
pub use layers::LayerStore;

use crate::analysis::instrument::InstrumentCategory;
use crate::analysis::pitch_class::{Mode, PitchClass};
use crate::analysis::result::{Layer, Measure};
use crate::classify::classifier_for;
use crate::color::palette::{Palette, PaletteManager, PaletteSource};
use crate::color::remote::PaletteService;
use crate::color::resolver::ColorResolver;
use crate::color::theory::base_hue;
use crate::config::{is_valid_bpm, measure_duration, SessionConfig};
use crate::features::buffer::{FeatureBuffer, SealedMeasure};
use crate::features::frame::{dominant_chroma_bin, FeatureRecord};
use crate::features::key::KeyModeDetector;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

/// Bounded single-consumer queue for feature records
pub fn feature_queue(capacity: usize) -> (Sender<FeatureRecord>, Receiver<FeatureRecord>) {
    crossbeam_channel::bounded(capacity)
}

/// Live transcription state
#[derive(Debug)]
pub struct TranscriptionSession {
    config: SessionConfig,
    bpm: f32,
    category: InstrumentCategory,
    recording: bool,
    clock: PlaybackClock,
    buffer: FeatureBuffer,
    key: KeyModeDetector,
    palettes: PaletteManager,
    key_hue_offset: f32,
    measures: Vec<Measure>,
    layers: LayerStore,
}

impl TranscriptionSession {
    /// Idle session on the given time basis
    pub fn new(config: SessionConfig, time_source: Arc<dyn TimeSource>) -> Self {
        let bpm = config.resolve_bpm(None);
        let buffer = FeatureBuffer::new(
            measure_duration(bpm, config.beats_per_measure),
            config.subdivisions,
        );
        Self {
            config,
            bpm,
            category: InstrumentCategory::Keys,
            recording: false,
            clock: PlaybackClock::new(time_source),
            buffer,
            key: KeyModeDetector::new(),
            palettes: PaletteManager::new(),
            key_hue_offset: 0.0,
            measures: Vec::new(),
            layers: LayerStore::new(),
        }
    }

    /// Start a new recording through `category`
    ///
    /// Working measures, buffers, spectral history, the pitch histogram and the song
    /// key are cleared; finished layers and the palette are kept. Without an explicit
    /// BPM the tempo is estimated from `duration_hint` (track length in seconds).
    pub fn begin_recording(&mut self, category: InstrumentCategory, duration_hint: Option<f64>) {
        self.bpm = self.config.resolve_bpm(duration_hint);
        self.category = category;
        self.clear_working_state();
        self.recording = true;
        self.clock.start();

        log::info!(
            "Transcribing {} at {} BPM ({:.3}s measures)",
            category.label(),
            self.bpm,
            self.buffer.measure_duration()
        );
    }

    fn clear_working_state(&mut self) {
        self.buffer = FeatureBuffer::new(
            measure_duration(self.bpm, self.config.beats_per_measure),
            self.config.subdivisions,
        );
        self.key.reset();
        self.measures.clear();
        self.key_hue_offset = self.palette_offset();
    }

    fn palette_offset(&self) -> f32 {
        self.palettes
            .active()
            .map(|p| -base_hue(p.root()))
            .unwrap_or(0.0)
    }

    /// Consume one feature record
    ///
    /// Returns the measure sealed by this record, if any.
    pub fn process(&mut self, record: FeatureRecord) -> Option<&Measure> {
        if !self.recording || !self.clock.is_playing() {
            return None;
        }

        if let Some(chroma) = &record.frame.chroma {
            self.key
                .observe(PitchClass::from_index(dominant_chroma_bin(chroma)));
        }

        let elapsed = self.clock.elapsed();
        let sealed = self.buffer.push(elapsed, &record)?;
        self.seal(sealed);
        self.measures.last()
    }

    /// Process every record waiting in `queue`; returns how many were taken
    pub fn drain(&mut self, queue: &Receiver<FeatureRecord>) -> usize {
        let mut taken = 0;
        while let Ok(record) = queue.try_recv() {
            self.process(record);
            taken += 1;
        }
        taken
    }

    fn seal(&mut self, sealed: SealedMeasure) {
        if let Some(tonic) = self.key.refresh_tonic() {
            self.key_hue_offset = -base_hue(tonic);
            log::debug!("Key hue offset: {}°", self.key_hue_offset);
        }

        let classifier = classifier_for(self.category);
        let mut notes: Vec<_> = sealed
            .slices
            .iter()
            .filter_map(|slice| classifier.classify(slice))
            .collect();

        let pitches: Vec<PitchClass> = notes.iter().filter_map(|n| n.pitch_class).collect();
        let mode = self.key.detect_mode(&pitches);

        let resolver = ColorResolver::new(self.palettes.active(), self.key_hue_offset);
        for note in &mut notes {
            note.color = resolver.resolve(
                note.pitch_class,
                note.octave,
                note.instrument,
                mode,
                note.intensity,
            );
            if note.instrument.is_synth() {
                note.color_right = Some(resolver.gradient_right(note.color));
            }
        }

        log::debug!(
            "Measure {}: {} notes, mode {:?}",
            sealed.index + 1,
            notes.len(),
            mode.map(Mode::name)
        );
        self.measures
            .push(Measure::new(sealed.index + 1, self.category, notes));
    }

    /// End the recording; the working measures become a layer when there are any
    ///
    /// A trailing partial measure is not sealed.
    pub fn finish_recording(&mut self) -> Option<&Layer> {
        if !self.recording {
            return None;
        }
        self.recording = false;
        self.clock.pause();

        if self.measures.is_empty() {
            log::debug!("Recording ended without sealed measures");
            return None;
        }
        let measures = std::mem::take(&mut self.measures);
        self.layers.push(Layer::new(self.category, measures));
        self.layers.last()
    }

    /// Suspend the clock; records arriving while paused are ignored
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Resume the clock
    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// Flip between paused and playing; returns whether the session now plays
    pub fn toggle_pause(&mut self) -> bool {
        if self.clock.is_playing() {
            self.pause();
        } else {
            self.resume();
        }
        self.clock.is_playing()
    }

    /// Change the tempo; the next record is placed on the new grid
    pub fn set_bpm(&mut self, bpm: f32) {
        if !is_valid_bpm(bpm) {
            log::warn!("Ignoring invalid BPM {}", bpm);
            return;
        }
        self.config.bpm = Some(bpm);
        self.bpm = bpm;
        self.buffer
            .set_measure_duration(measure_duration(bpm, self.config.beats_per_measure));
        log::info!("BPM set to {}", bpm);
    }

    /// Discard everything: working measures, layers, buffers, key state, clock
    ///
    /// The active palette survives; its variant cycle restarts.
    pub fn reset(&mut self) {
        self.recording = false;
        self.clock.pause();
        self.clock.reset();
        self.clear_working_state();
        self.layers.clear();
        self.palettes.reset_variants();
        log::info!("Session reset");
    }

    /// Activate the curated palette for a key
    pub fn apply_local_palette(&mut self, root: PitchClass, mode: Mode) -> &Palette {
        self.key_hue_offset = -base_hue(root);
        self.palettes.apply_local(root, mode)
    }

    /// Generate a palette through `service`, falling back to the curated palette
    pub fn generate_palette(
        &mut self,
        root: PitchClass,
        mode: Mode,
        service: &dyn PaletteService,
    ) -> PaletteSource {
        self.key_hue_offset = -base_hue(root);
        self.palettes.generate(root, mode, service)
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tempo of the current grid
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Category of the current (or last) recording
    pub fn category(&self) -> InstrumentCategory {
        self.category
    }

    /// Whether a recording is active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Whether the clock is running
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Playback seconds net of pauses
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Measure index of the latest record
    pub fn current_measure(&self) -> usize {
        self.buffer.current_measure()
    }

    /// Sealed measures of the active recording
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Finished layers
    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// Song tonic
    pub fn song_key(&self) -> Option<PitchClass> {
        self.key.tonic()
    }

    /// Hue rotation applied to theory colors (degrees)
    pub fn key_hue_offset(&self) -> f32 {
        self.key_hue_offset
    }

    /// Active palette
    pub fn palette(&self) -> Option<&Palette> {
        self.palettes.active()
    }

    /// Palette state, including the variant counter
    pub fn palette_manager(&self) -> &PaletteManager {
        &self.palettes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::instrument::Instrument;
    use crate::color::descriptor::{ColorDescriptor, HslColor};
    use crate::error::PaletteError;
    use crate::features::frame::FeatureFrame;

    fn session() -> (ManualTimeSource, TranscriptionSession) {
        let source = ManualTimeSource::new();
        let config = SessionConfig {
            bpm: Some(120.0),
            ..SessionConfig::default()
        };
        let session = TranscriptionSession::new(config, Arc::new(source.clone()));
        (source, session)
    }

    fn keys_record(pitch: PitchClass, hz: f32) -> FeatureRecord {
        let mut chroma = [0.0; 12];
        chroma[pitch.index()] = 1.0;
        FeatureRecord::new(
            FeatureFrame {
                loudness: Some(0.1),
                spectral_centroid: Some(1000.0),
                chroma: Some(chroma),
                amplitude_spectrum: Some(vec![0.1; 8]),
                ..FeatureFrame::default()
            },
            Some(hz),
        )
    }

    /// Feed one record per subdivision of a 2 s measure starting at `start`
    fn feed_measure(source: &ManualTimeSource, session: &mut TranscriptionSession, start: f64, pitch: PitchClass, hz: f32) {
        for s in 0..8 {
            source.set(start + s as f64 * 0.25 + 0.01);
            session.process(keys_record(pitch, hz));
        }
    }

    #[test]
    fn test_infinite_bpm_config_keeps_a_usable_grid() {
        let source = ManualTimeSource::new();
        let config = SessionConfig {
            bpm: Some(f32::INFINITY),
            beats_per_measure: 0,
            ..SessionConfig::default()
        };
        let mut session = TranscriptionSession::new(config, Arc::new(source.clone()));
        session.begin_recording(InstrumentCategory::Keys, None);
        assert_eq!(session.bpm(), crate::config::DEFAULT_BPM);

        // one-beat measures at 120 BPM: 0.5 s each
        source.set(0.1);
        assert!(session.process(keys_record(PitchClass::A, 440.0)).is_none());
        source.set(0.6);
        let sealed = session.process(keys_record(PitchClass::A, 440.0)).unwrap();
        assert_eq!(sealed.measure_number(), 1);
        assert_eq!(session.current_measure(), 1);
    }

    #[test]
    fn test_idle_session_ignores_records() {
        let (_, mut session) = session();
        assert!(session.process(keys_record(PitchClass::A, 440.0)).is_none());
        assert_eq!(session.song_key(), None);
    }

    #[test]
    fn test_measure_sealed_on_boundary() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Keys, None);
        feed_measure(&source, &mut session, 0.0, PitchClass::A, 440.0);
        assert!(session.measures().is_empty());

        source.set(2.05);
        let measure = session.process(keys_record(PitchClass::A, 440.0)).unwrap();
        assert_eq!(measure.measure_number(), 1);
        assert_eq!(measure.category(), InstrumentCategory::Keys);
        assert_eq!(measure.notes().len(), 8);

        let note = &measure.notes()[0];
        assert_eq!(note.instrument, Instrument::Piano);
        assert_eq!(note.pitch_class, Some(PitchClass::A));
        assert_eq!(note.octave, Some(4));
        // song key A rotates A to hue 0, then the ionian tint adds 12
        assert_eq!(note.color.h, 12.0);
        assert!(note.color_right.is_none());

        assert_eq!(session.song_key(), Some(PitchClass::A));
        assert_eq!(session.key_hue_offset(), -90.0);

        // further records in measure 1 do not re-seal measure 0
        source.set(2.5);
        assert!(session.process(keys_record(PitchClass::A, 440.0)).is_none());
        assert_eq!(session.measures().len(), 1);
    }

    #[test]
    fn test_paused_records_are_dropped() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Keys, None);
        source.set(0.5);
        session.process(keys_record(PitchClass::C, 261.63));
        assert!(!session.toggle_pause());

        source.set(30.0);
        assert!(session.process(keys_record(PitchClass::C, 261.63)).is_none());
        assert_eq!(session.elapsed(), 0.5);

        assert!(session.toggle_pause());
        source.set(32.0);
        let measure = session.process(keys_record(PitchClass::C, 261.63)).unwrap();
        assert_eq!(measure.measure_number(), 1);
        assert_eq!(measure.notes().len(), 1);
    }

    #[test]
    fn test_finish_recording_saves_layer() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Keys, None);
        feed_measure(&source, &mut session, 0.0, PitchClass::E, 329.63);
        feed_measure(&source, &mut session, 2.0, PitchClass::E, 329.63);

        let layer = session.finish_recording().unwrap();
        assert_eq!(layer.category, InstrumentCategory::Keys);
        assert_eq!(layer.label, "Keys and Harmonics");
        // the second measure was never crossed, so only the first is sealed
        assert_eq!(layer.measures.len(), 1);
        assert!(!session.is_recording());
        assert!(session.measures().is_empty());
        assert_eq!(session.layers().len(), 1);

        // a recording that never seals a measure leaves no layer behind
        session.begin_recording(InstrumentCategory::Wind, None);
        source.set(source.now() + 0.3);
        session.process(keys_record(PitchClass::E, 329.63));
        assert!(session.finish_recording().is_none());
        assert_eq!(session.layers().len(), 1);
    }

    #[test]
    fn test_synth_notes_get_gradient() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Synths, None);
        feed_measure(&source, &mut session, 0.0, PitchClass::D, 146.83);
        source.set(2.1);
        let measure = session.process(keys_record(PitchClass::D, 146.83)).unwrap();
        for note in measure.notes() {
            assert!(note.instrument.is_synth());
            let right = note.color_right.unwrap();
            assert_eq!(right.h, note.color.h);
            assert!(note.band_height.is_some());
        }
    }

    #[test]
    fn test_percussion_colors_ignore_key() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Percussion, None);
        let hit = FeatureRecord::new(
            FeatureFrame {
                loudness: Some(0.3),
                zero_crossing_rate: Some(0.05),
                ..FeatureFrame::default()
            },
            None,
        );
        source.set(0.1);
        session.process(hit.clone());
        source.set(2.1);
        let measure = session.process(hit).unwrap();
        let note = &measure.notes()[0];
        // no centroid requested → average 0 → bass drum
        assert_eq!(note.instrument, Instrument::BassDrum);
        assert_eq!(note.color.h, 5.0);
        assert_eq!(note.pitch_class, None);
    }

    #[test]
    fn test_set_bpm_changes_grid() {
        let (source, mut session) = session();
        session.begin_recording(InstrumentCategory::Keys, None);
        session.set_bpm(60.0);
        assert_eq!(session.bpm(), 60.0);
        source.set(3.0);
        session.process(keys_record(PitchClass::A, 440.0));
        assert_eq!(session.current_measure(), 0);

        session.set_bpm(-5.0);
        assert_eq!(session.bpm(), 60.0);
    }

    #[test]
    fn test_bpm_estimated_from_duration() {
        let source = ManualTimeSource::new();
        let mut session = TranscriptionSession::new(SessionConfig::default(), Arc::new(source));
        session.begin_recording(InstrumentCategory::Keys, Some(90.0));
        assert_eq!(session.bpm(), 130.0);
        session.begin_recording(InstrumentCategory::Keys, Some(400.0));
        assert_eq!(session.bpm(), 100.0);
    }

    struct Unreachable;

    impl PaletteService for Unreachable {
        fn generate(&self, _: &crate::color::remote::PaletteRequest) -> Result<Vec<HslColor>, PaletteError> {
            Err(PaletteError::Transport("offline".to_string()))
        }
    }

    #[test]
    fn test_palette_actions_and_reset() {
        let (source, mut session) = session();
        let outcome = session.generate_palette(PitchClass::G, Mode::Mixolydian, &Unreachable);
        assert_eq!(outcome, PaletteSource::Local);
        assert_eq!(session.key_hue_offset(), -30.0);
        assert_eq!(session.palette_manager().variant_index(), 1);

        session.begin_recording(InstrumentCategory::Keys, None);
        assert_eq!(session.key_hue_offset(), -30.0);
        feed_measure(&source, &mut session, 0.0, PitchClass::G, 196.0);
        source.set(2.1);
        let color: ColorDescriptor = session
            .process(keys_record(PitchClass::G, 196.0))
            .unwrap()
            .notes()[0]
            .color;
        // palette path: G is degree I of G mixolydian
        let swatch = session.palette().unwrap().swatches()[0];
        assert_eq!(color.h, swatch.h);
        assert_eq!(color.s, swatch.s);

        session.finish_recording();
        session.reset();
        assert!(session.layers().is_empty());
        assert!(session.measures().is_empty());
        assert_eq!(session.elapsed(), 0.0);
        assert_eq!(session.palette_manager().variant_index(), 0);
        assert!(session.palette().is_some());
    }

    #[test]
    fn test_drain_queue() {
        let (source, mut session) = session();
        let (tx, rx) = feature_queue(16);
        session.begin_recording(InstrumentCategory::Keys, None);
        source.set(0.1);
        for _ in 0..3 {
            tx.send(keys_record(PitchClass::B, 493.88)).unwrap();
        }
        assert_eq!(session.drain(&rx), 3);
        assert_eq!(session.drain(&rx), 0);
        assert_eq!(session.song_key(), None);
        source.set(2.2);
        tx.send(keys_record(PitchClass::B, 493.88)).unwrap();
        session.drain(&rx);
        assert_eq!(session.song_key(), Some(PitchClass::B));
    }
}
