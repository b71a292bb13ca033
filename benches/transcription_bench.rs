//! Performance benchmarks for transcription

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scorelens::features::{FeatureExtractor, PitchEstimator};
use scorelens::{transcribe_audio, InstrumentCategory, SessionConfig};

fn generate_tone(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
    (0..(sample_rate as f32 * seconds) as usize)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 0.4
                + (2.0 * std::f32::consts::PI * freq * 2.0 * t).sin() * 0.1
        })
        .collect()
}

fn bench_pitch_estimation(c: &mut Criterion) {
    let mut estimator = PitchEstimator::new();
    let mut group = c.benchmark_group("pitch_estimation");
    for window in [1024usize, 2048, 4096] {
        let samples = generate_tone(220.0, 44100, window as f32 / 44100.0);
        group.bench_with_input(BenchmarkId::from_parameter(window), &samples, |b, samples| {
            b.iter(|| estimator.estimate(black_box(samples), black_box(44100)));
        });
    }
    group.finish();
}

fn bench_feature_extraction(c: &mut Criterion) {
    let block = generate_tone(440.0, 44100, 512.0 / 44100.0);
    let mut group = c.benchmark_group("feature_extraction");
    for category in InstrumentCategory::ALL {
        let mut extractor = FeatureExtractor::new(512, 44100, category.requested_features())
            .expect("extractor");
        group.bench_function(category.name(), |b| {
            b.iter(|| extractor.extract(black_box(&block)));
        });
    }
    group.finish();
}

fn bench_transcription(c: &mut Criterion) {
    let samples = generate_tone(440.0, 44100, 10.0);
    let config = SessionConfig {
        bpm: Some(120.0),
        ..SessionConfig::default()
    };

    let mut group = c.benchmark_group("transcription");
    group.sample_size(10);
    for category in [InstrumentCategory::Keys, InstrumentCategory::Percussion] {
        group.bench_function(category.name(), |b| {
            b.iter(|| {
                let _ = transcribe_audio(
                    black_box(&samples),
                    black_box(44100),
                    category,
                    config.clone(),
                );
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pitch_estimation,
    bench_feature_extraction,
    bench_transcription
);
criterion_main!(benches);
