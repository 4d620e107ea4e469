use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use sweepdb_core::model::{Polygon, Polyline, Ring, RingRole};
use sweepdb_core::{
    status_tier, GeographicPoint, Geometry, RoadMeta, ScheduleEntity, ScheduleRegistry,
};

fn pt(lat: f64, lon: f64) -> GeographicPoint {
    GeographicPoint::new(lat, lon).unwrap()
}

/// `n` x `n` grid of 0.01 degree sections with one street per row.
fn grid(n: usize) -> Vec<ScheduleEntity> {
    let mut out = Vec::with_capacity(n * n + n);
    for row in 0..n {
        for col in 0..n {
            let (lat, lon) = (41.8 + row as f64 * 0.01, -87.8 + col as f64 * 0.01);
            let ring = Ring::new(
                vec![
                    pt(lat, lon),
                    pt(lat, lon + 0.01),
                    pt(lat + 0.01, lon + 0.01),
                    pt(lat + 0.01, lon),
                    pt(lat, lon),
                ],
                RingRole::Exterior,
            )
            .unwrap();
            let mut e = ScheduleEntity::section(row as u32, col as u32, format!("{row}/{col}"));
            e.geometries.push(Geometry::Polygon(Polygon::new(ring, Vec::new())));
            out.push(e);
        }
    }
    for row in 0..n {
        let lat = 41.8 + row as f64 * 0.01 + 0.005;
        let line = Polyline::new(vec![pt(lat, -87.8), pt(lat, -87.8 + n as f64 * 0.01)]).unwrap();
        let mut e = ScheduleEntity::road(row as u64, format!("Street {row}"), RoadMeta::default());
        e.geometries.push(Geometry::Polyline(line));
        out.push(e);
    }
    out
}

// ============================================================================
// Benchmark: Hit-testing
// ============================================================================

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");

    for n in [10usize, 30, 60] {
        let registry = ScheduleRegistry::default();
        registry.replace(grid(n));
        let snap = registry.snapshot();

        // Inside the first cell: found last, after scanning every street.
        let deep = pt(41.8025, -87.7975);
        group.bench_with_input(BenchmarkId::new("polygon", n * n), &deep, |b, p| {
            b.iter(|| black_box(snap.hit_test(black_box(p))));
        });

        let miss = pt(40.0, -80.0);
        group.bench_with_input(BenchmarkId::new("miss", n * n), &miss, |b, p| {
            b.iter(|| black_box(snap.hit_test(black_box(p))));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Status tiers
// ============================================================================

fn bench_status(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..52)
        .filter_map(|w| today.checked_add_days(chrono::Days::new(w * 7)))
        .rev()
        .collect();

    c.bench_function("status_tier_52_dates", |b| {
        b.iter(|| black_box(status_tier(black_box(&dates), today)));
    });
}

criterion_group!(benches, bench_hit_test, bench_status);
criterion_main!(benches);
