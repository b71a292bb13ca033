//! Instrument identifiers, instrument-family categories and the detected-name synonym table

use crate::features::frame::FeatureSet;
use serde::{Deserialize, Serialize};

/// Instrument family a recording is transcribed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentCategory {
    /// Keyboards, mallets and bells
    Keys,
    /// Unpitched drums and percussion
    Percussion,
    /// Woodwinds and brass
    Wind,
    /// Bowed and plucked strings
    Strings,
    /// Synthesizer voices
    Synths,
}

impl InstrumentCategory {
    /// All categories
    pub const ALL: [InstrumentCategory; 5] = [
        InstrumentCategory::Keys,
        InstrumentCategory::Percussion,
        InstrumentCategory::Wind,
        InstrumentCategory::Strings,
        InstrumentCategory::Synths,
    ];

    /// Lowercase category key
    pub fn name(self) -> &'static str {
        match self {
            InstrumentCategory::Keys => "keys",
            InstrumentCategory::Percussion => "percussion",
            InstrumentCategory::Wind => "wind",
            InstrumentCategory::Strings => "strings",
            InstrumentCategory::Synths => "synths",
        }
    }

    /// Parse a category key; unknown keys yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|c| c.name() == lower)
    }

    /// Human-readable label, used for layer names
    pub fn label(self) -> &'static str {
        match self {
            InstrumentCategory::Keys => "Keys and Harmonics",
            InstrumentCategory::Percussion => "Drums and Percussion",
            InstrumentCategory::Wind => "Wind and Brass",
            InstrumentCategory::Strings => "Guitar and Strings",
            InstrumentCategory::Synths => "Synthesizers",
        }
    }

    /// Instrument used when a detected name cannot be resolved
    pub fn default_instrument(self) -> Instrument {
        match self {
            InstrumentCategory::Keys => Instrument::Piano,
            InstrumentCategory::Percussion => Instrument::Kick,
            InstrumentCategory::Wind => Instrument::Flute,
            InstrumentCategory::Strings => Instrument::AcousticGuitar,
            InstrumentCategory::Synths => Instrument::Synth,
        }
    }

    /// Whether the category carries pitch (and therefore runs pitch estimation)
    pub fn is_pitched(self) -> bool {
        !matches!(self, InstrumentCategory::Percussion)
    }

    /// Feature fields the extraction collaborator should emit for this category
    pub fn requested_features(self) -> FeatureSet {
        let base = FeatureSet {
            loudness: true,
            amplitude_spectrum: true,
            ..FeatureSet::default()
        };
        match self {
            InstrumentCategory::Keys | InstrumentCategory::Wind | InstrumentCategory::Strings => {
                FeatureSet {
                    spectral_centroid: true,
                    chroma: true,
                    timbre: true,
                    ..base
                }
            }
            InstrumentCategory::Percussion => FeatureSet {
                zero_crossing_rate: true,
                spectral_rolloff: true,
                ..base
            },
            InstrumentCategory::Synths => FeatureSet {
                spectral_centroid: true,
                chroma: true,
                perceptual_sharpness: true,
                ..base
            },
        }
    }

    /// Instruments belonging to this category
    pub fn instruments(self) -> impl Iterator<Item = Instrument> {
        Instrument::ALL.into_iter().filter(move |i| i.category() == self)
    }
}

impl std::fmt::Display for InstrumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! instruments {
    ($($variant:ident => $name:literal, $category:ident;)*) => {
        /// Canonical instrument identifier used for color and rendering
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Instrument {
            $(
                #[allow(missing_docs)]
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl Instrument {
            /// Every known instrument
            pub const ALL: [Instrument; instruments!(@count $($variant)*)] = [$(Instrument::$variant),*];

            /// Canonical lowercase name (e.g. "electricguitar")
            pub fn name(self) -> &'static str {
                match self {
                    $(Instrument::$variant => $name,)*
                }
            }

            /// Category the instrument belongs to
            pub fn category(self) -> InstrumentCategory {
                match self {
                    $(Instrument::$variant => InstrumentCategory::$category,)*
                }
            }

            /// Parse a canonical name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Instrument::$variant),)*
                    _ => None,
                }
            }
        }
    };
    (@count) => { 0 };
    (@count $head:ident $($tail:ident)*) => { 1 + instruments!(@count $($tail)*) };
}

instruments! {
    Piano => "piano", Keys;
    Keyboard => "keyboard", Keys;
    Organ => "organ", Keys;
    ElectricOrgan => "electricorgan", Keys;
    Rhodes => "rhodes", Keys;
    Yamaha => "yamaha", Keys;
    Mellotron => "mellotron", Keys;
    Stylophone => "stylophone", Keys;
    Melodica => "melodica", Keys;
    Xylophone => "xylophone", Keys;
    Marimba => "marimba", Keys;
    Glockenspiel => "glockenspiel", Keys;
    TubularBells => "tubularbells", Keys;
    Chime => "chime", Keys;
    Celesta => "celesta", Keys;
    Kick => "kick", Percussion;
    BassDrum => "bassdrum", Percussion;
    Snare => "snare", Percussion;
    Toms => "toms", Percussion;
    HiHat => "hihat", Percussion;
    CrashSplash => "crashsplash", Percussion;
    Tambourine => "tambourine", Percussion;
    Clap => "clap", Percussion;
    Flute => "flute", Wind;
    Piccolo => "piccolo", Wind;
    Recorder => "recorder", Wind;
    Whistle => "whistle", Wind;
    Clarinet => "clarinet", Wind;
    Oboe => "oboe", Wind;
    Bassoon => "bassoon", Wind;
    Trumpet => "trumpet", Wind;
    AcousticGuitar => "acousticguitar", Strings;
    ElectricGuitar => "electricguitar", Strings;
    Bass => "bass", Strings;
    ElectricBass => "electricbass", Strings;
    Violin => "violin", Strings;
    Viola => "viola", Strings;
    Cello => "cello", Strings;
    Synth => "synth", Synths;
    Pad => "pad", Synths;
    Lead => "lead", Synths;
    BassSynth => "bass_synth", Synths;
    Arpeggio => "arpeggio", Synths;
}

impl Instrument {
    /// Whether the instrument is unpitched percussion
    pub fn is_percussion(self) -> bool {
        self.category() == InstrumentCategory::Percussion
    }

    /// Whether the instrument is drawn as a synth gradient band
    pub fn is_synth(self) -> bool {
        self.category() == InstrumentCategory::Synths
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Generic detected names and the canonical instrument they render as
const SYNONYMS: &[(&str, Instrument)] = &[
    ("piano", Instrument::Piano),
    ("organ", Instrument::ElectricOrgan),
    ("harpsichord", Instrument::Keyboard),
    ("accordion", Instrument::Melodica),
    ("kick", Instrument::BassDrum),
    ("snare", Instrument::Snare),
    ("hihat", Instrument::HiHat),
    ("tom", Instrument::Toms),
    ("cymbal", Instrument::CrashSplash),
    ("percussion", Instrument::Tambourine),
    ("flute", Instrument::Flute),
    ("trumpet", Instrument::Trumpet),
    ("saxophone", Instrument::Clarinet),
    ("clarinet", Instrument::Clarinet),
    ("oboe", Instrument::Oboe),
    ("horn", Instrument::Trumpet),
    ("violin", Instrument::Violin),
    ("cello", Instrument::Cello),
    ("bass", Instrument::ElectricBass),
    ("guitar", Instrument::AcousticGuitar),
    ("viola", Instrument::Viola),
    ("harp", Instrument::AcousticGuitar),
    ("synth", Instrument::Synth),
    ("pad", Instrument::Pad),
    ("lead", Instrument::Lead),
    ("bass_synth", Instrument::BassSynth),
    ("arpeggio", Instrument::Synth),
];

/// Route a detected instrument name to its canonical identifier
///
/// Synonyms are looked up first; names without a synonym pass through unchanged when
/// they are already canonical, and anything else falls back to the category default.
///
/// # Example
///
/// ```
/// use scorelens::analysis::instrument::{resolve_instrument, Instrument, InstrumentCategory};
///
/// assert_eq!(resolve_instrument("kick", InstrumentCategory::Percussion), Instrument::BassDrum);
/// assert_eq!(resolve_instrument("xylophone", InstrumentCategory::Keys), Instrument::Xylophone);
/// assert_eq!(resolve_instrument("theremin", InstrumentCategory::Wind), Instrument::Flute);
/// ```
pub fn resolve_instrument(detected: &str, category: InstrumentCategory) -> Instrument {
    SYNONYMS
        .iter()
        .find(|(name, _)| *name == detected)
        .map(|(_, instrument)| *instrument)
        .or_else(|| Instrument::from_name(detected))
        .unwrap_or_else(|| {
            log::debug!(
                "Unknown instrument '{}', using {} default",
                detected,
                category.name()
            );
            category.default_instrument()
        })
}
