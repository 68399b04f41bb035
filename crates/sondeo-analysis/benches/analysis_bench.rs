//! Criterion benchmarks for sondeo-analysis components
//!
//! Run with: cargo bench -p sondeo-analysis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sondeo_analysis::{
    bands::BandProfiler, doa::DelayAngleEstimator, doppler::VelocityEstimator,
    hybrid::HybridClassifier, pipeline::ClipAnalyzer, tracker::FrequencyTracker,
};
use sondeo_config::{AnalysisSettings, SignatureMap, default_band_table};
use sondeo_dsp::{FrameSequencer, Window};
use std::f32::consts::PI;

const SAMPLE_RATE: f32 = 44100.0;

/// Generate a test sine wave
fn generate_sine(size: usize, frequency: f32) -> Vec<f32> {
    (0..size)
        .map(|i| (2.0 * PI * frequency * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

/// Generate white noise
fn generate_noise(size: usize) -> Vec<f32> {
    let mut state = 0x12345678u32;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect()
}

// ============================================================================
// Frame sequencing benchmarks
// ============================================================================

fn bench_frame_sequencer(c: &mut Criterion) {
    let mut group = c.benchmark_group("FrameSequencer");

    let frame_lens = [1024, 2048, 4096];
    let signal = generate_sine(44100, 440.0); // 1 second

    for &frame_len in &frame_lens {
        let sequencer =
            FrameSequencer::new(SAMPLE_RATE, frame_len, frame_len / 2, Window::Hann).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(frame_len), &frame_len, |b, _| {
            b.iter(|| {
                let frames = sequencer.frames(black_box(&signal));
                black_box(frames)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Frequency tracking benchmarks
// ============================================================================

fn bench_frequency_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("FrequencyTracker");

    let lengths = [22050, 44100, 88200];
    let sequencer = FrameSequencer::new(SAMPLE_RATE, 4096, 2048, Window::Hann).unwrap();
    let tracker = FrequencyTracker::new(20.0, 20000.0);

    for &length in &lengths {
        let signal = generate_sine(length, 440.0);
        let frames = sequencer.frames(&signal);

        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, _| {
            b.iter(|| {
                let track = tracker.track_frames(
                    black_box(&frames),
                    sequencer.sample_rate(),
                    sequencer.hop_secs(),
                );
                black_box(track)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Doppler benchmarks
// ============================================================================

fn bench_velocity_estimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("VelocityEstimator");

    let sequencer = FrameSequencer::new(SAMPLE_RATE, 4096, 2048, Window::Hann).unwrap();
    let tracker = FrequencyTracker::new(20.0, 20000.0);
    let estimator = VelocityEstimator::new(343.0)
        .unwrap()
        .with_source_frequency(1000.0);

    let signal = generate_sine(88200, 1030.0);
    let track = tracker.track_clip(&sequencer, &signal);

    group.bench_function("two_seconds", |b| {
        b.iter(|| {
            let analysis = estimator.analyze(black_box(&track));
            black_box(analysis)
        })
    });

    group.finish();
}

// ============================================================================
// Direction of arrival benchmarks
// ============================================================================

fn bench_gcc_phat(c: &mut Criterion) {
    let mut group = c.benchmark_group("GccPhat");

    let sizes = [1024, 4096, 16384];
    let estimator = DelayAngleEstimator::new(SAMPLE_RATE, 0.05, 343.0).unwrap();

    for &size in &sizes {
        let first = generate_noise(size);
        let mut second = vec![0.0; 3];
        second.extend_from_slice(&first[..size - 3]);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let estimate = estimator
                    .estimate(black_box(&first), black_box(&second))
                    .unwrap();
                black_box(estimate)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Band profiling and classification benchmarks
// ============================================================================

fn bench_band_profiler(c: &mut Criterion) {
    let mut group = c.benchmark_group("BandProfiler");

    let sequencer = FrameSequencer::new(SAMPLE_RATE, 4096, 2048, Window::Hann).unwrap();
    let profiler = BandProfiler::new(default_band_table()).unwrap();
    let frames = sequencer.frames(&generate_noise(88200));

    group.bench_function("two_seconds", |b| {
        b.iter(|| {
            let profile = profiler.profile(black_box(&frames));
            black_box(profile)
        })
    });

    group.finish();
}

fn bench_hybrid_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("HybridClassifier");

    let sequencer = FrameSequencer::new(SAMPLE_RATE, 4096, 2048, Window::Hann).unwrap();
    let profiler = BandProfiler::new(default_band_table()).unwrap();
    let classifier = HybridClassifier::new(default_band_table(), SignatureMap::default()).unwrap();
    let profile = profiler.profile(&sequencer.frames(&generate_noise(44100)));

    group.bench_function("frequency_only", |b| {
        b.iter(|| {
            let result = classifier.classify(black_box(&profile), None).unwrap();
            black_box(result)
        })
    });

    group.finish();
}

// ============================================================================
// Composite pipeline benchmark
// ============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("FullPipeline");

    let lengths = [44100, 220500]; // 1 and 5 seconds
    let analyzer = ClipAnalyzer::new(&AnalysisSettings::default(), SAMPLE_RATE).unwrap();

    for &length in &lengths {
        let signal = generate_sine(length, 440.0);

        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, _| {
            b.iter(|| {
                let report = analyzer.analyze(black_box(&signal)).unwrap();
                black_box(report)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_frame_sequencer,
    bench_frequency_tracker,
    bench_velocity_estimator,
    bench_gcc_phat,
    bench_band_profiler,
    bench_hybrid_classifier,
    bench_full_pipeline,
);

criterion_main!(benches);
