//! Curated and generated scale palettes
//!
//! A palette holds seven swatches, one per scale degree of a root key and mode.
//! Curated palettes are key-agnostic and get transposed by rotating every hue by the
//! root's circle-of-fifths hue. Generated palettes come from a [`PaletteService`];
//! any service failure falls back to the curated palette.

use super::descriptor::{hsl_to_hsb, wrap_hue, ColorDescriptor};
use super::remote::{ColorScheme, PaletteRequest, PaletteService};
use super::theory::{base_hue, modal_tint};
use crate::analysis::pitch_class::{Mode, PitchClass};

/// Swatches per palette (one per scale degree)
pub const PALETTE_SIZE: usize = 7;

/// Seed-hue offsets cycled through by successive palette generations
pub const VARIANT_OFFSETS: [f32; 5] = [0.0, 40.0, 80.0, 160.0, 220.0];

/// Curated swatches of a mode, degrees I-VII, untransposed
fn curated_swatches(mode: Mode) -> [(f32, f32, f32); PALETTE_SIZE] {
    match mode {
        Mode::Ionian => [
            (38.0, 85.0, 97.0),
            (60.0, 75.0, 93.0),
            (82.0, 70.0, 88.0),
            (18.0, 80.0, 96.0),
            (5.0, 82.0, 94.0),
            (48.0, 72.0, 91.0),
            (95.0, 65.0, 85.0),
        ],
        Mode::Dorian => [
            (175.0, 68.0, 82.0),
            (158.0, 60.0, 78.0),
            (195.0, 72.0, 75.0),
            (10.0, 70.0, 90.0),
            (165.0, 65.0, 80.0),
            (28.0, 65.0, 88.0),
            (185.0, 75.0, 72.0),
        ],
        Mode::Phrygian => [
            (345.0, 85.0, 72.0),
            (28.0, 70.0, 78.0),
            (270.0, 60.0, 65.0),
            (355.0, 78.0, 68.0),
            (85.0, 55.0, 62.0),
            (260.0, 65.0, 60.0),
            (15.0, 72.0, 70.0),
        ],
        Mode::Lydian => [
            (52.0, 78.0, 99.0),
            (70.0, 65.0, 96.0),
            (220.0, 55.0, 95.0),
            (35.0, 82.0, 98.0),
            (200.0, 50.0, 97.0),
            (58.0, 70.0, 94.0),
            (240.0, 45.0, 92.0),
        ],
        Mode::Mixolydian => [
            (22.0, 82.0, 90.0),
            (42.0, 75.0, 88.0),
            (235.0, 60.0, 80.0),
            (12.0, 78.0, 88.0),
            (248.0, 55.0, 78.0),
            (32.0, 70.0, 86.0),
            (225.0, 58.0, 76.0),
        ],
        Mode::Aeolian => [
            (210.0, 65.0, 72.0),
            (228.0, 55.0, 68.0),
            (340.0, 45.0, 78.0),
            (218.0, 60.0, 70.0),
            (200.0, 58.0, 75.0),
            (350.0, 40.0, 72.0),
            (232.0, 50.0, 65.0),
        ],
        Mode::Locrian => [
            (280.0, 35.0, 52.0),
            (68.0, 45.0, 58.0),
            (295.0, 30.0, 48.0),
            (78.0, 40.0, 55.0),
            (310.0, 28.0, 44.0),
            (55.0, 35.0, 52.0),
            (265.0, 32.0, 46.0),
        ],
    }
}

/// Root key and mode from user-facing names
///
/// Unknown roots count as C and unknown modes as ionian.
pub fn parse_key_and_mode(root: &str, mode: &str) -> (PitchClass, Mode) {
    let root = PitchClass::from_name(root).unwrap_or_else(|| {
        log::warn!("Unknown palette root '{}', using C", root);
        PitchClass::C
    });
    let mode = Mode::from_name(mode).unwrap_or_else(|| {
        log::warn!("Unknown palette mode '{}', using ionian", mode);
        Mode::Ionian
    });
    (root, mode)
}

/// Scale palette tagged with its root key and mode
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    swatches: Vec<ColorDescriptor>,
    root: PitchClass,
    mode: Mode,
}

impl Palette {
    /// Palette from explicit swatches (degree order)
    pub fn new(swatches: Vec<ColorDescriptor>, root: PitchClass, mode: Mode) -> Self {
        Self {
            swatches,
            root,
            mode,
        }
    }

    /// Curated palette of `mode`, transposed to `root`
    ///
    /// # Example
    ///
    /// ```
    /// use scorelens::analysis::pitch_class::{Mode, PitchClass};
    /// use scorelens::color::palette::Palette;
    ///
    /// let palette = Palette::local(PitchClass::A, Mode::Ionian);
    /// // ionian degree I is hue 38, rotated by A's 90°
    /// assert_eq!(palette.swatches()[0].h, 128.0);
    /// ```
    pub fn local(root: PitchClass, mode: Mode) -> Self {
        let rotation = base_hue(root);
        let swatches = curated_swatches(mode)
            .iter()
            .map(|&(h, s, b)| ColorDescriptor {
                h: wrap_hue(h + rotation),
                s,
                b,
            })
            .collect();
        Self::new(swatches, root, mode)
    }

    /// Swatches in scale-degree order
    pub fn swatches(&self) -> &[ColorDescriptor] {
        &self.swatches
    }

    /// Root key
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Semitone offsets of the mode's scale degrees
    pub fn intervals(&self) -> [u8; 7] {
        self.mode.intervals()
    }

    /// Whether there is a swatch for every scale degree
    pub fn is_complete(&self) -> bool {
        self.swatches.len() >= PALETTE_SIZE
    }

    /// Scale degree closest to a pitch (circular semitone distance; first degree wins ties)
    pub fn degree_for(&self, pitch: PitchClass) -> usize {
        let distance = pitch.semitones_above(self.root) as i32;
        let mut best_degree = 0;
        let mut best_gap = 12;
        for (degree, &interval) in self.intervals().iter().enumerate() {
            let gap = (interval as i32 - distance).abs();
            let wrapped = gap.min(12 - gap);
            if wrapped < best_gap {
                best_gap = wrapped;
                best_degree = degree;
            }
        }
        best_degree
    }

    /// Swatch of the scale degree closest to a pitch
    pub fn swatch_for(&self, pitch: PitchClass) -> Option<ColorDescriptor> {
        if !self.is_complete() {
            return None;
        }
        self.swatches.get(self.degree_for(pitch)).copied()
    }
}

/// How the active palette was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSource {
    /// Generated by the palette service
    Remote,
    /// Curated palette (explicit or after a service failure)
    Local,
}

/// Active palette plus the generation variant counter
#[derive(Debug, Clone, Default)]
pub struct PaletteManager {
    active: Option<Palette>,
    variant_index: usize,
}

impl PaletteManager {
    /// Manager with no palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active palette
    pub fn active(&self) -> Option<&Palette> {
        self.active.as_ref()
    }

    /// Number of generation calls since the last reset
    pub fn variant_index(&self) -> usize {
        self.variant_index
    }

    /// Build the curated palette for a key without activating it
    pub fn build_local(root: PitchClass, mode: Mode) -> Palette {
        Palette::local(root, mode)
    }

    /// Activate the curated palette and advance the variant counter
    pub fn apply_local(&mut self, root: PitchClass, mode: Mode) -> &Palette {
        self.variant_index += 1;
        log::info!("Palette: {} {} (local)", root, mode.name());
        self.active.insert(Palette::local(root, mode))
    }

    /// Seed request for the current variant
    pub fn seed_request(&self, root: PitchClass, mode: Mode) -> PaletteRequest {
        let tint = modal_tint(mode);
        let offset = VARIANT_OFFSETS[self.variant_index % VARIANT_OFFSETS.len()];
        let hue = wrap_hue((base_hue(root) + tint.h + offset).round());
        PaletteRequest {
            seed_hue: hue as u16,
            seed_saturation: (62.0 + tint.s * 0.4).clamp(40.0, 88.0).round() as u8,
            seed_lightness: (52.0 + tint.b * 0.3).clamp(30.0, 72.0).round() as u8,
            scheme: ColorScheme::for_mode(mode),
            count: PALETTE_SIZE,
        }
    }

    /// Ask `service` for a palette, falling back to the curated one on any failure
    ///
    /// Either way the new palette replaces the active one wholesale and the variant
    /// counter advances by one.
    pub fn generate(
        &mut self,
        root: PitchClass,
        mode: Mode,
        service: &dyn PaletteService,
    ) -> PaletteSource {
        let request = self.seed_request(root, mode);
        log::debug!(
            "Requesting palette variant {}: seed {} scheme {}",
            self.variant_index + 1,
            request.seed_css(),
            request.scheme.as_str()
        );

        match service.generate(&request) {
            Ok(colors) if colors.len() >= PALETTE_SIZE => {
                let swatches = colors
                    .iter()
                    .take(PALETTE_SIZE)
                    .map(|c| hsl_to_hsb(c.h, c.s.min(88.0) / 100.0, c.l.clamp(30.0, 75.0) / 100.0))
                    .collect();
                self.active = Some(Palette::new(swatches, root, mode));
                self.variant_index += 1;
                log::info!(
                    "Palette: {} {} variant {} ({})",
                    root,
                    mode.name(),
                    self.variant_index,
                    request.scheme.as_str()
                );
                PaletteSource::Remote
            }
            Ok(colors) => {
                log::warn!(
                    "Palette service returned {} colors, using local palette",
                    colors.len()
                );
                self.apply_local(root, mode);
                PaletteSource::Local
            }
            Err(err) => {
                log::warn!("{}, using local palette", err);
                self.apply_local(root, mode);
                PaletteSource::Local
            }
        }
    }

    /// Restart the variant cycle; the active palette is kept
    pub fn reset_variants(&mut self) {
        self.variant_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::descriptor::HslColor;
    use crate::error::PaletteError;
    use std::cell::RefCell;

    struct FixedService {
        colors: Result<Vec<HslColor>, PaletteError>,
        seen: RefCell<Vec<PaletteRequest>>,
    }

    impl FixedService {
        fn new(colors: Result<Vec<HslColor>, PaletteError>) -> Self {
            Self {
                colors,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl PaletteService for FixedService {
        fn generate(&self, request: &PaletteRequest) -> Result<Vec<HslColor>, PaletteError> {
            self.seen.borrow_mut().push(request.clone());
            self.colors.clone()
        }
    }

    fn hsl(h: f32, s: f32, l: f32) -> HslColor {
        HslColor { h, s, l }
    }

    #[test]
    fn test_local_palette_rotation() {
        let c_major = Palette::local(PitchClass::C, Mode::Ionian);
        assert_eq!(c_major.swatches().len(), PALETTE_SIZE);
        assert_eq!(c_major.swatches()[0], ColorDescriptor { h: 38.0, s: 85.0, b: 97.0 });

        // 345 + 355 wraps to 340
        let f_phrygian = Palette::local(PitchClass::F, Mode::Phrygian);
        assert_eq!(f_phrygian.swatches()[0].h, 340.0);
        assert_eq!(f_phrygian.intervals(), [0, 1, 3, 5, 7, 8, 10]);
    }

    #[test]
    fn test_degree_lookup() {
        let palette = Palette::local(PitchClass::D, Mode::Ionian);
        assert_eq!(palette.degree_for(PitchClass::D), 0);
        assert_eq!(palette.degree_for(PitchClass::FSharp), 2);
        assert_eq!(palette.degree_for(PitchClass::CSharp), 6);
        // F is 3 semitones above D: equidistant from degrees II and III, first wins
        assert_eq!(palette.degree_for(PitchClass::F), 1);
        assert_eq!(palette.swatch_for(PitchClass::A), Some(palette.swatches()[4]));
    }

    #[test]
    fn test_incomplete_palette_has_no_swatches() {
        let palette = Palette::new(vec![ColorDescriptor::NEUTRAL; 3], PitchClass::C, Mode::Ionian);
        assert!(!palette.is_complete());
        assert_eq!(palette.swatch_for(PitchClass::C), None);
    }

    #[test]
    fn test_seed_request() {
        let manager = PaletteManager::new();
        // A = 90, ionian tint (+12, +15, +8)
        let request = manager.seed_request(PitchClass::A, Mode::Ionian);
        assert_eq!(request.seed_hue, 102);
        assert_eq!(request.seed_saturation, 68);
        assert_eq!(request.seed_lightness, 54);
        assert_eq!(request.scheme, ColorScheme::Analogic);
        assert_eq!(request.count, 7);

        // C locrian: (0 − 28 + 360) % 360 = 332
        let request = manager.seed_request(PitchClass::C, Mode::Locrian);
        assert_eq!(request.seed_hue, 332);
        assert_eq!(request.seed_saturation, 54);
        assert_eq!(request.seed_lightness, 48);
    }

    #[test]
    fn test_remote_success_converts_and_advances() {
        let colors = vec![hsl(200.0, 95.0, 20.0); 7];
        let service = FixedService::new(Ok(colors));
        let mut manager = PaletteManager::new();

        let source = manager.generate(PitchClass::E, Mode::Aeolian, &service);
        assert_eq!(source, PaletteSource::Remote);
        assert_eq!(manager.variant_index(), 1);

        // s clamped to 88, l raised to 30: b = 0.3 + 0.88·0.3 = 0.564, s = 2·(1 − 0.3/0.564)
        let palette = manager.active().unwrap();
        assert_eq!(palette.root(), PitchClass::E);
        assert_eq!(palette.swatches()[0], ColorDescriptor { h: 200.0, s: 94.0, b: 56.0 });

        // next call uses the +40° variant
        manager.generate(PitchClass::E, Mode::Aeolian, &service);
        let seen = service.seen.borrow();
        assert_eq!(seen[0].seed_hue, 138);
        assert_eq!(seen[1].seed_hue, 178);
    }

    #[test]
    fn test_variants_cycle_through_every_offset() {
        let up = FixedService::new(Ok(vec![hsl(10.0, 50.0, 50.0); 7]));
        let down = FixedService::new(Err(PaletteError::Transport("offline".to_string())));
        let mut manager = PaletteManager::new();
        let mut seeds = Vec::new();
        for call in 0..6 {
            // successes and fallbacks both advance the cycle
            let service = if call % 2 == 0 { &up } else { &down };
            seeds.push(manager.seed_request(PitchClass::B, Mode::Lydian).seed_hue);
            manager.generate(PitchClass::B, Mode::Lydian, service);
        }

        let base = seeds[0];
        let expected: Vec<u16> = VARIANT_OFFSETS
            .iter()
            .chain(std::iter::once(&VARIANT_OFFSETS[0]))
            .map(|offset| (base + *offset as u16) % 360)
            .collect();
        assert_eq!(seeds, expected);
        assert_eq!(manager.variant_index(), 6);

        let requested: Vec<u16> = up
            .seen
            .borrow()
            .iter()
            .chain(down.seen.borrow().iter())
            .map(|r| r.seed_hue)
            .collect();
        assert_eq!(requested.len(), 6);
        for hue in &expected {
            assert!(requested.contains(hue));
        }
    }

    #[test]
    fn test_failure_falls_back_to_local() {
        let service = FixedService::new(Err(PaletteError::Status(503)));
        let mut manager = PaletteManager::new();
        let source = manager.generate(PitchClass::G, Mode::Dorian, &service);
        assert_eq!(source, PaletteSource::Local);
        assert_eq!(manager.variant_index(), 1);
        assert_eq!(
            manager.active(),
            Some(&Palette::local(PitchClass::G, Mode::Dorian))
        );

        let short = FixedService::new(Ok(vec![hsl(0.0, 50.0, 50.0); 3]));
        assert_eq!(
            manager.generate(PitchClass::G, Mode::Dorian, &short),
            PaletteSource::Local
        );
        assert_eq!(manager.variant_index(), 2);
    }

    #[test]
    fn test_reset_variants_keeps_palette() {
        let mut manager = PaletteManager::new();
        manager.apply_local(PitchClass::C, Mode::Lydian);
        manager.apply_local(PitchClass::C, Mode::Lydian);
        assert_eq!(manager.variant_index(), 2);
        manager.reset_variants();
        assert_eq!(manager.variant_index(), 0);
        assert!(manager.active().is_some());
    }

    #[test]
    fn test_parse_key_and_mode() {
        assert_eq!(parse_key_and_mode("Bb", "Dorian"), (PitchClass::ASharp, Mode::Dorian));
        assert_eq!(parse_key_and_mode("H", "blues"), (PitchClass::C, Mode::Ionian));
    }
}
