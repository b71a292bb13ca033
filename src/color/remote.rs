//! Remote palette generation contract
//!
//! A palette service receives a seed color and a scheme and answers with a list of
//! HSL colors. The only shipped implementation talks to The Color API
//! (`color-api` feature); tests and offline hosts plug in their own.

use super::descriptor::HslColor;
use crate::analysis::pitch_class::Mode;
use crate::error::PaletteError;
use serde::{Deserialize, Serialize};

/// Color-harmony scheme asked of the palette service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    /// Neighbouring hues
    Analogic,
    /// Neighbouring hues plus their complement
    AnalogicComplement,
    /// Opposite hues
    Complement,
    /// Three evenly spaced hues
    Triad,
}

impl ColorScheme {
    /// Scheme matching the character of a mode
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Ionian | Mode::Lydian => ColorScheme::Analogic,
            Mode::Mixolydian | Mode::Dorian => ColorScheme::AnalogicComplement,
            Mode::Aeolian => ColorScheme::Complement,
            Mode::Phrygian | Mode::Locrian => ColorScheme::Triad,
        }
    }

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Analogic => "analogic",
            ColorScheme::AnalogicComplement => "analogic-complement",
            ColorScheme::Complement => "complement",
            ColorScheme::Triad => "triad",
        }
    }
}

/// Seeded palette request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteRequest {
    /// Seed hue in whole degrees
    pub seed_hue: u16,
    /// Seed saturation percentage (40-88)
    pub seed_saturation: u8,
    /// Seed lightness percentage (30-72)
    pub seed_lightness: u8,
    /// Harmony scheme
    pub scheme: ColorScheme,
    /// Number of colors wanted
    pub count: usize,
}

impl PaletteRequest {
    /// Seed color in CSS notation, e.g. `hsl(102,68%,54%)`
    pub fn seed_css(&self) -> String {
        format!(
            "hsl({},{}%,{}%)",
            self.seed_hue, self.seed_saturation, self.seed_lightness
        )
    }
}

/// Something that turns a [`PaletteRequest`] into colors
pub trait PaletteService {
    /// Generate a palette; any error makes the caller fall back to a local palette
    fn generate(&self, request: &PaletteRequest) -> Result<Vec<HslColor>, PaletteError>;
}

#[derive(Deserialize)]
struct SchemeResponse {
    colors: Vec<SchemeColor>,
}

#[derive(Deserialize)]
struct SchemeColor {
    hsl: HslColor,
}

/// Parse a scheme response body (`{"colors": [{"hsl": {"h":…, "s":…, "l":…}}, …]}`)
///
/// # Errors
///
/// `Malformed` when the body is not valid JSON of that shape or carries fewer
/// than `expected` colors
pub fn parse_scheme_response(body: &str, expected: usize) -> Result<Vec<HslColor>, PaletteError> {
    let response: SchemeResponse = serde_json::from_str(body)?;
    if response.colors.len() < expected {
        return Err(PaletteError::Malformed(format!(
            "expected {} colors, got {}",
            expected,
            response.colors.len()
        )));
    }
    Ok(response.colors.into_iter().map(|c| c.hsl).collect())
}
