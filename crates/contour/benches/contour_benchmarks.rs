//! Benchmarks for contour tracing, smoothing and polygon building.
//!
//! Run with: cargo bench --package contour --bench contour_benchmarks

use contour::{
    build_polygons, contour_polygons, generate_contour_levels, smooth_line, trace_contour_lines,
    trace_contour_lines_with, ContourConfig, Grid, PolyLine,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo_common::PointD;
use rand::Rng;
use test_utils::create_wave_field;

/// Smooth temperature-like field with hills and valleys.
fn smooth_grid(width: usize, height: usize) -> Grid {
    let field = create_wave_field(width, height);
    Grid::new(field.x, field.y, field.data, None).expect("valid grid")
}

/// Smooth field plus random noise, which adds many small loops and saddles.
fn noisy_grid(width: usize, height: usize) -> Grid {
    let mut rng = rand::thread_rng();
    let field = create_wave_field(width, height);
    let data = field
        .data
        .iter()
        .map(|&v| v + rng.gen_range(-5.0..5.0))
        .collect();
    Grid::new(field.x, field.y, data, None).expect("valid grid")
}

/// Smooth field with a block of missing samples in the middle.
fn holed_grid(width: usize, height: usize) -> Grid {
    let field =
        create_wave_field(width, height).with_hole(width / 3..width / 2, height / 3..height / 2, f64::NAN);
    Grid::new(field.x, field.y, field.data, None).expect("valid grid")
}

// =============================================================================
// CONTOUR LEVEL GENERATION BENCHMARKS
// =============================================================================

fn bench_generate_contour_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_contour_levels");

    let ranges = [
        (0.0, 100.0, 10.0, "0-100_by_10"),
        (0.0, 100.0, 2.0, "0-100_by_2"),
        (-50.0, 50.0, 5.0, "neg50-50_by_5"),
        (900.0, 1100.0, 4.0, "pressure_4hPa"),
    ];

    for (min, max, interval, name) in ranges {
        group.bench_with_input(
            BenchmarkId::new("levels", name),
            &(min, max, interval),
            |b, &(min, max, interval)| {
                b.iter(|| generate_contour_levels(black_box(min), black_box(max), black_box(interval)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// LINE TRACING BENCHMARKS
// =============================================================================

fn bench_trace_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_contour_lines");

    let sizes = [(64, 64), (128, 128), (256, 256)];

    for (width, height) in sizes {
        let smooth = smooth_grid(width, height);
        let noisy = noisy_grid(width, height);
        let holed = holed_grid(width, height);

        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth_single_level", format!("{}x{}", width, height)),
            &smooth,
            |b, grid| {
                b.iter(|| trace_contour_lines(black_box(grid), &[50.5]));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("noisy_single_level", format!("{}x{}", width, height)),
            &noisy,
            |b, grid| {
                b.iter(|| trace_contour_lines(black_box(grid), &[50.5]));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("missing_block", format!("{}x{}", width, height)),
            &holed,
            |b, grid| {
                b.iter(|| trace_contour_lines(black_box(grid), &[50.5]));
            },
        );
    }

    group.finish();
}

fn bench_parallel_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_levels");
    group.sample_size(20);

    let grid = noisy_grid(256, 256);
    let levels: Vec<f64> = (0..20).map(|i| 10.5 + i as f64 * 4.0).collect();

    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("20_levels", if parallel { "parallel" } else { "serial" }),
            &parallel,
            |b, &parallel| {
                b.iter(|| trace_contour_lines_with(black_box(&grid), &levels, parallel));
            },
        );
    }

    group.finish();
}

// =============================================================================
// LINE SMOOTHING BENCHMARKS
// =============================================================================

fn bench_smooth_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_line");

    let point_counts = [10, 50, 100, 500];

    for count in point_counts {
        let mut points: Vec<PointD> = (0..count)
            .map(|i| {
                let angle = (i as f64 / count as f64) * std::f64::consts::PI * 2.0;
                let radius = 100.0 + (angle * 5.0).sin() * 20.0;
                PointD::new(128.0 + radius * angle.cos(), 128.0 + radius * angle.sin())
            })
            .collect();
        points.push(points[0]);
        let line = PolyLine::new(50.0, points, true);

        for subdivisions in [1, 3, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_subdivisions", subdivisions), format!("{}_points", count)),
                &line,
                |b, line| {
                    b.iter(|| smooth_line(black_box(line), black_box(subdivisions)));
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// POLYGON BENCHMARKS
// =============================================================================

fn bench_build_polygons(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_polygons");
    group.sample_size(20); // Slower benchmark

    let levels = [20.5, 40.5, 60.5, 80.5];

    for (width, height) in [(128, 128), (256, 256)] {
        for (name, grid) in [
            ("smooth", smooth_grid(width, height)),
            ("noisy", noisy_grid(width, height)),
        ] {
            let traced = trace_contour_lines(&grid, &levels);
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}_{}lines", width, height, traced.lines.len())),
                &(grid, traced),
                |b, (grid, traced)| {
                    b.iter(|| build_polygons(black_box(grid), black_box(traced), &levels));
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// FULL PIPELINE BENCHMARKS
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_contour_pipeline");
    group.sample_size(20);

    let grid = smooth_grid(256, 256);

    let config = ContourConfig {
        interval: Some(10.0),
        smoothing: 2,
        ..ContourConfig::default()
    };
    group.bench_function("polygons_256x256_interval_10", |b| {
        b.iter(|| contour_polygons(black_box(&grid), black_box(&config)));
    });

    let dense = ContourConfig {
        interval: Some(2.0),
        ..ContourConfig::default()
    };
    group.bench_function("polygons_256x256_dense", |b| {
        b.iter(|| contour_polygons(black_box(&grid), black_box(&dense)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_contour_levels,
    bench_trace_lines,
    bench_parallel_levels,
    bench_smooth_line,
    bench_build_polygons,
    bench_full_pipeline,
);
criterion_main!(benches);
