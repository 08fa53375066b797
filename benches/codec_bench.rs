// In bincol-core/benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::Rng;

use bincol::{decode, encode, encode_auto, CodecConfig, Pipeline, Step, TypedArray, ValueKind};

// --- Mock data generation ---

/// A random walk of atom-like coordinates with three decimal digits.
fn generate_coordinates(size: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    let mut current = 25.0f64;
    (0..size)
        .map(|_| {
            current += rng.random_range(-1.5..1.5);
            (current * 1000.0).round() / 1000.0
        })
        .collect()
}

/// Mostly sequential ids with occasional gaps.
fn generate_ids(size: usize) -> Vec<i32> {
    let mut rng = rand::rng();
    let mut current = 1i32;
    (0..size)
        .map(|_| {
            current += if rng.random_range(0..100) == 0 { rng.random_range(2..500) } else { 1 };
            current
        })
        .collect()
}

/// Low-cardinality labels, like residue names.
fn generate_labels(size: usize) -> Vec<String> {
    const LABELS: [&str; 6] = ["ALA", "GLY", "SER", "HOH", "LYS", "TRP"];
    let mut rng = rand::rng();
    (0..size)
        .map(|_| LABELS[rng.random_range(0..LABELS.len())].to_string())
        .collect()
}

// --- Benchmark Suite ---

const BENCH_ELEMENTS: usize = 100_000;

fn bench_explicit_pipelines(c: &mut Criterion) {
    let coordinates = TypedArray::Float64(generate_coordinates(BENCH_ELEMENTS));
    let ids = TypedArray::Int32(generate_ids(BENCH_ELEMENTS));
    let labels = TypedArray::Utf8(generate_labels(BENCH_ELEMENTS));

    let coordinate_pipeline = Pipeline::from_steps(
        ValueKind::Float,
        vec![
            Step::fixed_point(1000.0),
            Step::delta(),
            Step::integer_packing(),
            Step::byte_array(),
        ],
    )
    .unwrap();
    let id_pipeline = Pipeline::from_steps(
        ValueKind::Integer,
        vec![
            Step::delta(),
            Step::run_length(),
            Step::integer_packing(),
            Step::byte_array(),
        ],
    )
    .unwrap();
    let label_pipeline =
        Pipeline::from_steps(ValueKind::Text, vec![Step::string_array()]).unwrap();

    let encoded_coordinates = encode(&coordinates, &coordinate_pipeline).unwrap();
    let encoded_ids = encode(&ids, &id_pipeline).unwrap();
    let encoded_labels = encode(&labels, &label_pipeline).unwrap();

    let mut group = c.benchmark_group("Explicit Pipelines");
    group.throughput(Throughput::Elements(BENCH_ELEMENTS as u64));

    group.bench_function("Encode Coordinates (FP > Delta > Pack > BA)", |b| {
        b.iter(|| black_box(encode(black_box(&coordinates), &coordinate_pipeline)))
    });
    group.bench_function("Decode Coordinates (FP > Delta > Pack > BA)", |b| {
        b.iter(|| black_box(decode(black_box(&encoded_coordinates))))
    });
    group.bench_function("Encode Ids (Delta > RL > Pack > BA)", |b| {
        b.iter(|| black_box(encode(black_box(&ids), &id_pipeline)))
    });
    group.bench_function("Decode Ids (Delta > RL > Pack > BA)", |b| {
        b.iter(|| black_box(decode(black_box(&encoded_ids))))
    });
    group.bench_function("Encode Labels (StringArray)", |b| {
        b.iter(|| black_box(encode(black_box(&labels), &label_pipeline)))
    });
    group.bench_function("Decode Labels (StringArray)", |b| {
        b.iter(|| black_box(decode(black_box(&encoded_labels))))
    });

    group.finish();
}

fn bench_planner(c: &mut Criterion) {
    let coordinates = TypedArray::Float64(generate_coordinates(BENCH_ELEMENTS));
    let ids = TypedArray::Int32(generate_ids(BENCH_ELEMENTS));
    let config = CodecConfig::default();

    let mut group = c.benchmark_group("Planner");
    group.throughput(Throughput::Elements(BENCH_ELEMENTS as u64));
    group.sample_size(20);

    group.bench_function("Auto Encode Coordinates", |b| {
        b.iter(|| black_box(encode_auto(black_box(&coordinates), &config)))
    });
    group.bench_function("Auto Encode Ids", |b| {
        b.iter(|| black_box(encode_auto(black_box(&ids), &config)))
    });

    group.finish();
}

criterion_group!(benches, bench_explicit_pipelines, bench_planner);
criterion_main!(benches);
