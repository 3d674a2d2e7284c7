//! Latency benchmarks for artifact inference
//!
//! Measures boundary validation plus forest prediction against the bundled
//! demo artifact at a few batch sizes.
//!
//! Run with: cargo bench -p croprec-model

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use croprec_core::PredictionRequest;
use croprec_model::{load_model, Predictor};

const ARTIFACT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../models/crop_recommendation_model.json"
);

fn request(rows: usize) -> PredictionRequest {
    let column = |base: f64| (0..rows).map(move |i| base + (i % 17) as f64);
    PredictionRequest::new()
        .with_rows("N", column(60.0))
        .with_rows("P", column(30.0))
        .with_rows("K", column(25.0))
        .with_rows("temperature", column(18.5))
        .with_rows("humidity", column(55.0))
        .with_rows("ph", column(5.0))
        .with_rows("rainfall", column(90.0))
}

fn benchmark_forest_predict(c: &mut Criterion) {
    let model = load_model(ARTIFACT).expect("Failed to load demo artifact");

    let mut group = c.benchmark_group("Forest_Predict");
    group.sample_size(100);

    for rows in [1usize, 32, 1024] {
        let req = request(rows);
        group.bench_with_input(BenchmarkId::new("validate_and_predict", rows), &req, |b, req| {
            b.iter(|| {
                let table = model.schema().validate(black_box(req)).unwrap();
                model.predict(&table).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_forest_predict);
criterion_main!(benches);
