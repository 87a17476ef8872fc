//! Benchmarks for TIN contour extraction.
//!
//! Run with: cargo bench --package tin-contour --bench contour_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::seq::SliceRandom;
use rand::Rng;
use test_utils::{create_cone_tin, create_hills_tin};
use tin_contour::{
    contours_from_tin, crossing_segments, generate_thresholds, stitch, ContourConfig,
    DegeneratePolicy, JoinRule, StitchOptions, Triangle,
};

fn hills(n: usize) -> Vec<Triangle> {
    create_hills_tin(n, 1.0).into_iter().map(Triangle::from).collect()
}

/// Hills with random jitter on every vertex (many more short segments).
fn noisy_hills(n: usize) -> Vec<Triangle> {
    let mut rng = rand::thread_rng();
    create_hills_tin(n, 1.0)
        .into_iter()
        .map(|mut t| {
            for v in t.iter_mut() {
                v[2] += rng.gen_range(-0.05..0.05);
            }
            Triangle::from(t)
        })
        .collect()
}

// =============================================================================
// THRESHOLD GENERATION BENCHMARKS
// =============================================================================

fn bench_generate_thresholds(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_thresholds");

    for count in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("count", count), &count, |b, &count| {
            b.iter(|| generate_thresholds(black_box(count), black_box(-1.0), black_box(1.0)));
        });
    }

    group.finish();
}

// =============================================================================
// TRIANGLE INTERSECTION BENCHMARKS
// =============================================================================

fn bench_crossing_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossing_segments");

    let thresholds = generate_thresholds(10, -0.75, 0.75);

    for n in [64usize, 128, 256] {
        let tin = hills(n);
        group.throughput(Throughput::Elements((tin.len() * thresholds.len()) as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{}x{}", n, n)),
            &tin,
            |b, tin| {
                b.iter(|| {
                    crossing_segments(black_box(tin), &thresholds, DegeneratePolicy::Skip, false)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", format!("{}x{}", n, n)),
            &tin,
            |b, tin| {
                b.iter(|| {
                    crossing_segments(black_box(tin), &thresholds, DegeneratePolicy::Skip, true)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// SEGMENT STITCHING BENCHMARKS
// =============================================================================

fn bench_stitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch");

    let thresholds = generate_thresholds(10, -0.75, 0.75);

    for n in [64usize, 128] {
        let (smooth, _) = crossing_segments(&hills(n), &thresholds, DegeneratePolicy::Skip, true);
        let (noisy, _) =
            crossing_segments(&noisy_hills(n), &thresholds, DegeneratePolicy::Skip, true);

        for (name, segments) in [("smooth", smooth), ("noisy", noisy)] {
            group.throughput(Throughput::Elements(segments.len() as u64));

            for rule in [JoinRule::FirstMatch, JoinRule::Nearest] {
                let options = StitchOptions {
                    nearness: 0.5,
                    join_rule: rule,
                    ..Default::default()
                };
                group.bench_with_input(
                    BenchmarkId::new(
                        format!("{}_{}", name, rule),
                        format!("{}x{}_{}seg", n, n, segments.len()),
                    ),
                    &segments,
                    |b, segs| {
                        b.iter(|| stitch(black_box(segs.clone()), &options));
                    },
                );
            }
        }
    }

    group.finish();
}

/// Segment input order matters for first-match stitching; a shuffled list
/// defeats any locality the TIN order gives.
fn bench_stitch_shuffled(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch_shuffled");

    let thresholds = generate_thresholds(5, 1.0, 20.0);
    let (mut segments, _) = crossing_segments(
        &create_cone_tin(128, 1.0, 32.0)
            .into_iter()
            .map(Triangle::from)
            .collect::<Vec<_>>(),
        &thresholds,
        DegeneratePolicy::Skip,
        true,
    );
    segments.shuffle(&mut rand::thread_rng());

    let options = StitchOptions {
        nearness: 0.5,
        parallel: false,
        ..Default::default()
    };

    group.throughput(Throughput::Elements(segments.len() as u64));
    group.bench_function("cone_128x128", |b| {
        b.iter(|| stitch(black_box(segments.clone()), &options));
    });

    group.finish();
}

// =============================================================================
// FULL PIPELINE BENCHMARKS
// =============================================================================

fn bench_contours_from_tin(c: &mut Criterion) {
    let mut group = c.benchmark_group("contours_from_tin");
    group.sample_size(20); // Slower benchmark

    for n in [128usize, 256] {
        let tin = hills(n);

        for count in [4usize, 20] {
            let config = ContourConfig {
                threshold_count: count,
                z_min: -0.75,
                z_max: 0.75,
                nearness: 0.5,
                ..Default::default()
            };

            group.bench_with_input(
                BenchmarkId::new(format!("{}_levels", count), format!("{}x{}", n, n)),
                &(tin.clone(), config),
                |b, (tin, config)| {
                    b.iter(|| contours_from_tin(black_box(tin), black_box(config)));
                },
            );
        }
    }

    let tin = hills(256);
    let sequential = ContourConfig {
        threshold_count: 20,
        z_min: -0.75,
        z_max: 0.75,
        nearness: 0.5,
        parallel: false,
        ..Default::default()
    };
    group.bench_function("20_levels_256x256_sequential", |b| {
        b.iter(|| contours_from_tin(black_box(&tin), black_box(&sequential)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_thresholds,
    bench_crossing_segments,
    bench_stitch,
    bench_stitch_shuffled,
    bench_contours_from_tin,
);
criterion_main!(benches);
