use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use geotagger::track::{TrackIndex, TrackSample, locate};
use std::hint::black_box;

/// A day of one-second samples walking north-east.
fn day_track() -> TrackIndex {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    TrackIndex::new(
        (0..86_400)
            .map(|i| TrackSample {
                timestamp: start + Duration::seconds(i),
                latitude: 52.0 + i as f64 * 1e-6,
                longitude: 4.0 + i as f64 * 1e-6,
            })
            .collect(),
    )
}

fn bench(c: &mut Criterion) {
    let track = day_track();
    let start = track.samples()[0].timestamp;

    c.bench_function("locate::early", |b| {
        let at = start + Duration::milliseconds(60_500);
        b.iter(|| locate(black_box(&track), black_box(at)));
    });

    c.bench_function("locate::late", |b| {
        let at = start + Duration::milliseconds(86_000_500);
        b.iter(|| locate(black_box(&track), black_box(at)));
    });

    c.bench_function("locate::after_track", |b| {
        let at = start + Duration::seconds(86_400 + 1_800);
        b.iter(|| locate(black_box(&track), black_box(at)));
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
