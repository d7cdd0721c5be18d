//! Benchmarks for peak finding and the per-frame estimator update

use affect_monitor::estimator::{find_peaks, HeartRateEstimator};
use affect_monitor::stress::{FaceSample, StressMonitor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::time::{Duration, Instant};

/// Forehead-like signal: a slow pulse plus sensor noise
fn noisy_pulse(len: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|i| {
            let t = i as f64 / 30.0;
            120.0 + 3.0 * (t * 2.0 * std::f64::consts::PI * 1.2).sin() + rng.gen_range(-1.0..1.0)
        })
        .collect()
}

fn benchmark_find_peaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_peaks");

    for len in [30, 100, 300, 1000] {
        let signal = noisy_pulse(len);
        group.bench_with_input(BenchmarkId::new("distance_10", len), &signal, |b, signal| {
            b.iter(|| black_box(find_peaks(black_box(signal), 10)));
        });
    }

    group.finish();
}

fn benchmark_heart_rate_window(c: &mut Criterion) {
    let signal = noisy_pulse(100);

    c.bench_function("heart_rate_full_window", |b| {
        b.iter(|| {
            let start = Instant::now();
            let mut estimator = HeartRateEstimator::new(start);
            for &sample in &signal {
                estimator.observe(sample);
            }
            estimator.tick(start + Duration::from_secs(10));
            black_box(estimator.rate())
        });
    });
}

fn benchmark_monitor_update(c: &mut Criterion) {
    let signal = noisy_pulse(300);
    let mut rng = rand::thread_rng();
    let eyes: Vec<usize> = (0..signal.len()).map(|_| rng.gen_range(0..3)).collect();

    c.bench_function("stress_monitor_10s_at_30fps", |b| {
        b.iter(|| {
            let start = Instant::now();
            let mut monitor = StressMonitor::new(start);
            for (i, (&intensity, &eye_count)) in signal.iter().zip(&eyes).enumerate() {
                let now = start + Duration::from_millis(i as u64 * 33);
                let sample = FaceSample {
                    eye_count,
                    forehead_intensity: Some(intensity),
                };
                black_box(monitor.update(sample, now));
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_find_peaks,
    benchmark_heart_rate_window,
    benchmark_monitor_update
);
criterion_main!(benches);
