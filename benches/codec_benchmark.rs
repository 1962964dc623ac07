use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trail_tracker::metrics::codec;
use trail_tracker::metrics::{DistanceUnit, StructuredMetrics};
use trail_tracker::models::ActivityKind;

fn full_metrics() -> StructuredMetrics {
    StructuredMetrics {
        duration_hours: 1,
        duration_minutes: 30,
        distance_value: "5.2".to_string(),
        distance_unit: DistanceUnit::Miles,
        average_speed: "6.0".to_string(),
        fastest_speed: "9.5".to_string(),
        location: "Golden Gate Park".to_string(),
        notes: "Felt great, negative split on the back half".to_string(),
        ..Default::default()
    }
}

fn bench_encode(c: &mut Criterion) {
    let metrics = full_metrics();

    c.bench_function("encode_full_metrics", |b| {
        b.iter(|| codec::encode(black_box(&metrics), ActivityKind::Running))
    });
}

fn bench_decode(c: &mut Criterion) {
    let labeled = codec::encode(&full_metrics(), ActivityKind::Running);
    let legacy = "Easy 3.1 miles before work, at: Bear Creek, legs felt heavy\n\
                  then some strides on the track"
        .to_string();

    c.bench_function("decode_labeled", |b| {
        b.iter(|| codec::decode(black_box(&labeled)))
    });

    c.bench_function("decode_legacy_freeform", |b| {
        b.iter(|| codec::decode(black_box(&legacy)))
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
