//! Example: Print the palette for a key and mode
//!
//! Usage:
//!   cargo run --example palette_preview -- <root> <mode> [variants]
//!   cargo run --features color-api --example palette_preview -- D lydian 3
//!
//! Without the `color-api` feature only the curated local palette is shown.

use scorelens::color::palette::parse_key_and_mode;
use scorelens::color::resolver::pitch_to_color;
use scorelens::{ColorDescriptor, Palette, PaletteManager, PitchClass};
use std::env;

fn swatch_line(label: &str, color: ColorDescriptor) {
    let [r, g, b] = color.to_rgb();
    println!(
        "  {:<4} \x1b[48;2;{};{};{}m      \x1b[0m #{:02x}{:02x}{:02x}  {}",
        label, r, g, b, r, g, b, color
    );
}

fn print_palette(palette: &Palette) {
    for (degree, (color, interval)) in palette
        .swatches()
        .iter()
        .zip(palette.intervals())
        .enumerate()
    {
        let pitch = PitchClass::from_index((palette.root().index() + interval as usize) % 12);
        swatch_line(&format!("{}{}", degree + 1, pitch), *color);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let root = args.first().map(String::as_str).unwrap_or("C");
    let mode = args.get(1).map(String::as_str).unwrap_or("ionian");
    let variants = args.get(2).map(|v| v.parse::<usize>()).transpose()?.unwrap_or(1);
    let (root, mode) = parse_key_and_mode(root, mode);

    println!("Circle-of-fifths hues:");
    for pitch in PitchClass::ALL {
        swatch_line(pitch.name(), pitch_to_color(pitch, None, None));
    }

    println!("\nLocal palette: {} {}", root, mode.name());
    print_palette(&PaletteManager::build_local(root, mode));

    #[cfg(feature = "color-api")]
    {
        let service = scorelens::color::color_api::ColorApiService::new()?;
        let mut manager = PaletteManager::new();
        for _ in 0..variants {
            let source = manager.generate(root, mode, &service);
            if let Some(palette) = manager.active() {
                println!(
                    "\nVariant {} ({:?}): {} {}",
                    manager.variant_index(),
                    source,
                    root,
                    mode.name()
                );
                print_palette(palette);
            }
        }
    }
    #[cfg(not(feature = "color-api"))]
    {
        if variants > 1 {
            eprintln!("Remote variants need the color-api feature");
        }
    }

    Ok(())
}
