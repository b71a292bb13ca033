//! Example: Transcribe a single audio file
//!
//! Usage:
//!   cargo run --release --example transcribe_file -- <file> [category] [bpm]
//!
//! `category` is one of keys, percussion, wind, strings, synths (default: keys).

use scorelens::{transcribe_file, InstrumentCategory, SessionConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let path = args
        .first()
        .ok_or("Usage: transcribe_file <file> [category] [bpm]")?;
    let category = match args.get(1) {
        Some(name) => InstrumentCategory::from_name(name)
            .ok_or_else(|| format!("Unknown category '{}'", name))?,
        None => InstrumentCategory::Keys,
    };
    let bpm = args.get(2).map(|v| v.parse::<f32>()).transpose()?;

    let config = SessionConfig {
        bpm,
        ..SessionConfig::default()
    };
    let result = transcribe_file(path, category, config)?;

    println!("{} ({})", result.layer.label, path);
    println!("  BPM: {:.1}", result.bpm);
    match result.song_key {
        Some(key) => println!("  Song key: {}", key),
        None => println!("  Song key: -"),
    }
    println!(
        "  Duration: {:.2}s, {} blocks, {:.1} ms",
        result.metadata.duration_seconds,
        result.metadata.blocks_processed,
        result.metadata.processing_time_ms
    );

    for measure in &result.layer.measures {
        let notes: Vec<String> = measure
            .notes()
            .iter()
            .map(|n| match (n.pitch_class, n.octave) {
                (Some(pc), Some(oct)) => format!("{}{}@{}", pc, oct, n.slice_index),
                _ => format!("{}@{}", n.instrument, n.slice_index),
            })
            .collect();
        println!("  [{:>3}] {}", measure.measure_number(), notes.join(" "));
    }

    Ok(())
}
