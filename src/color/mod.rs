//! Note coloring
//!
//! - HSB color values and HSL conversion
//! - Circle-of-fifths, modal and octave tables
//! - Per-note color resolution (palette, then theory)
//! - Curated/generated scale palettes and the remote palette contract

#[cfg(feature = "color-api")]
pub mod color_api;
pub mod descriptor;
pub mod palette;
pub mod remote;
pub mod resolver;
pub mod theory;

pub use descriptor::{ColorDescriptor, HslColor};
pub use palette::{Palette, PaletteManager, PaletteSource};
pub use remote::{ColorScheme, PaletteRequest, PaletteService};
pub use resolver::ColorResolver;
