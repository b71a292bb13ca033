//! Example: Transcribe multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example transcribe_batch -- [--jobs N] [--json] [--category C] <file1> <file2> ...
//!
//! Parallelism is across files; each transcription runs on one thread.

use rayon::prelude::*;
use scorelens::{transcribe_file, InstrumentCategory, SessionConfig, TranscriptionResult};
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

fn summary_json(path: &str, result: &TranscriptionResult) -> serde_json::Value {
    serde_json::json!({
        "file": path,
        "category": result.layer.category,
        "bpm": result.bpm,
        "songKey": result.song_key,
        "measures": result.layer.measures.len(),
        "notes": result.layer.note_count(),
        "processingTimeMs": result.metadata.processing_time_ms,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut category = InstrumentCategory::Keys;
    let mut paths: Vec<String> = Vec::new();

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args.first().ok_or("--jobs requires a value")?.parse::<usize>()?;
                args.remove(0);
                jobs = Some(v.max(1));
            }
            "--category" => {
                let name = args.first().ok_or("--category requires a value")?;
                category = InstrumentCategory::from_name(name)
                    .ok_or_else(|| format!("Unknown category '{}'", name))?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: transcribe_batch [--jobs N] [--json] [--category C] <file1> <file2> ...\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --json         Emit one JSON object per line (JSONL)\n\
                     --category C   keys, percussion, wind, strings or synths\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<(String, Result<TranscriptionResult, String>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = transcribe_file(path, category, SessionConfig::default())
                    .map_err(|e| e.to_string());
                (path.clone(), result)
            })
            .collect()
    });

    for (idx, (path, result)) in outs.iter().enumerate() {
        match (result, json) {
            (Ok(r), true) => println!("{}", summary_json(path, r)),
            (Err(e), true) => println!("{}", serde_json::json!({ "file": path, "error": e })),
            (Ok(r), false) => println!(
                "[{}/{}] {}: BPM={:.1} key={} measures={} notes={} time={:.2}ms",
                idx + 1,
                outs.len(),
                path,
                r.bpm,
                r.song_key.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string()),
                r.layer.measures.len(),
                r.layer.note_count(),
                r.metadata.processing_time_ms
            ),
            (Err(e), false) => println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), path, e),
        }
    }

    let ok = outs.iter().filter(|(_, r)| r.is_ok()).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
