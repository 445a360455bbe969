//! Benchmarks for forward and inverse projection.
//!
//! Run with: cargo bench --package projection --bench projection_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo_common::BoundingBox;
use projection::{Ellipsoid, Projection, ProjectionKind, ProjectionParams};
use rand::Rng;

/// Random points inside a lon/lat window.
fn random_points(count: usize, extent: &BoundingBox) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            (
                rng.gen_range(extent.min_x..extent.max_x),
                rng.gen_range(extent.min_y..extent.max_y),
            )
        })
        .collect()
}

fn projections() -> Vec<(&'static str, Projection, BoundingBox)> {
    let conus = BoundingBox::new(-125.0, 25.0, -67.0, 50.0);
    let world = BoundingBox::new(-179.0, -80.0, 179.0, 80.0);
    let arctic = BoundingBox::new(-180.0, 40.0, 180.0, 89.0);

    let build = |kind, params| Projection::new(kind, params).expect("valid projection");

    vec![
        (
            "hrrr_lcc",
            build(ProjectionKind::LambertConformalConic, ProjectionParams::hrrr()),
            conus,
        ),
        (
            "wgs84_merc",
            build(ProjectionKind::Mercator, ProjectionParams::new(Ellipsoid::wgs84())),
            world,
        ),
        (
            "polar_stere",
            build(
                ProjectionKind::Stereographic,
                ProjectionParams::new(Ellipsoid::wgs84())
                    .with_center(-105.0, 90.0)
                    .with_true_scale_lat(60.0),
            ),
            arctic,
        ),
        (
            "goes_east",
            build(ProjectionKind::Geostationary, ProjectionParams::goes_east()),
            conus,
        ),
        (
            "mollweide",
            build(ProjectionKind::Mollweide, ProjectionParams::new(Ellipsoid::sphere())),
            world,
        ),
    ]
}

// =============================================================================
// FORWARD / INVERSE BENCHMARKS
// =============================================================================

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    let count = 10_000;
    group.throughput(Throughput::Elements(count as u64));

    for (name, proj, extent) in projections() {
        let points = random_points(count, &extent);
        group.bench_with_input(BenchmarkId::new("forward", name), &points, |b, points| {
            b.iter(|| {
                for &(lon, lat) in points {
                    let _ = black_box(proj.project(black_box(lon), black_box(lat)));
                }
            });
        });
    }

    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_inverse");
    let count = 10_000;
    group.throughput(Throughput::Elements(count as u64));

    for (name, proj, extent) in projections() {
        let projected: Vec<(f64, f64)> = random_points(count, &extent)
            .into_iter()
            .filter_map(|(lon, lat)| proj.project(lon, lat).ok())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        group.bench_with_input(BenchmarkId::new("inverse", name), &projected, |b, points| {
            b.iter(|| {
                for &(x, y) in points {
                    let _ = black_box(proj.project_inverse(black_box(x), black_box(y)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// EXTENT BENCHMARKS
// =============================================================================

fn bench_project_extent(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_extent");

    for (name, proj, extent) in projections() {
        for samples in [10, 50, 200] {
            group.bench_with_input(
                BenchmarkId::new(name, samples),
                &samples,
                |b, &samples| {
                    b.iter(|| proj.project_extent(black_box(&extent), samples));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_inverse, bench_project_extent);
criterion_main!(benches);
