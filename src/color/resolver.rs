//! Note color resolution
//!
//! # Resolution order
//!
//! 1. Percussion: fixed per-instrument hue, saturation from intensity, brightness
//!    from octave (default 4)
//! 2. No pitch class: neutral gray
//! 3. Active complete palette: swatch of the nearest scale degree, brightness nudged
//!    by half the octave delta
//! 4. Theory: circle-of-fifths hue rotated by the song-key offset, octave deltas on
//!    the base saturation/brightness, then the mode tint when a mode is known

use super::descriptor::{wrap_hue, ColorDescriptor};
use super::palette::Palette;
use super::theory::{
    base_hue, modal_tint, octave_shift, percussion_hue, BASE_BRIGHTNESS, BASE_SATURATION,
};
use crate::analysis::instrument::Instrument;
use crate::analysis::pitch_class::{Mode, PitchClass};

/// Stateless color resolver over the session's palette and key offset
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorResolver<'a> {
    palette: Option<&'a Palette>,
    key_hue_offset: f32,
}

impl<'a> ColorResolver<'a> {
    /// Resolver over an optional active palette and a song-key hue offset (degrees)
    pub fn new(palette: Option<&'a Palette>, key_hue_offset: f32) -> Self {
        Self {
            palette: palette.filter(|p| p.is_complete()),
            key_hue_offset,
        }
    }

    /// Whether a complete palette drives pitched colors
    pub fn has_palette(&self) -> bool {
        self.palette.is_some()
    }

    /// Color of one note
    pub fn resolve(
        &self,
        pitch_class: Option<PitchClass>,
        octave: Option<i32>,
        instrument: Instrument,
        mode: Option<Mode>,
        intensity: f32,
    ) -> ColorDescriptor {
        if instrument.is_percussion() {
            let octave = octave.unwrap_or(4) as f32;
            return ColorDescriptor {
                h: percussion_hue(instrument),
                s: (55.0 + intensity * 45.0).clamp(55.0, 100.0),
                b: (40.0 + octave * 7.8).clamp(40.0, 95.0),
            };
        }

        let Some(pitch) = pitch_class else {
            return ColorDescriptor::NEUTRAL;
        };

        let shift = octave_shift(octave);

        if let Some(swatch) = self.palette.and_then(|p| p.swatch_for(pitch)) {
            return ColorDescriptor {
                h: swatch.h,
                s: swatch.s,
                b: (swatch.b + shift.brightness * 0.5).clamp(25.0, 100.0),
            };
        }

        let mut h = wrap_hue(base_hue(pitch) + self.key_hue_offset);
        let mut s = BASE_SATURATION + shift.saturation;
        let mut b = BASE_BRIGHTNESS + shift.brightness;

        if let Some(mode) = mode {
            let tint = modal_tint(mode);
            h = wrap_hue(h + tint.h);
            s = (s + tint.s).clamp(30.0, 100.0);
            b = (b + tint.b).clamp(30.0, 100.0);
        }

        ColorDescriptor { h, s, b }
    }

    /// Right edge of a synth gradient band: the left color, desaturated and lifted
    pub fn gradient_right(&self, left: ColorDescriptor) -> ColorDescriptor {
        let (s_drop, b_lift) = if self.has_palette() {
            (18.0, 14.0)
        } else {
            (15.0, 18.0)
        };
        ColorDescriptor {
            h: left.h,
            s: (left.s - s_drop).clamp(20.0, 100.0),
            b: (left.b + b_lift).clamp(25.0, 100.0),
        }
    }
}

/// Theory-only color of a pitch (no palette, no key rotation)
///
/// ```
/// use scorelens::analysis::pitch_class::PitchClass;
/// use scorelens::color::resolver::pitch_to_color;
///
/// let c4 = pitch_to_color(PitchClass::C, Some(4), None);
/// assert_eq!(c4.h, 0.0);
/// ```
pub fn pitch_to_color(pitch: PitchClass, octave: Option<i32>, mode: Option<Mode>) -> ColorDescriptor {
    ColorResolver::default().resolve(Some(pitch), octave, Instrument::Piano, mode, 0.5)
}
