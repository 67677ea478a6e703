use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use once_cell::sync::Lazy;
use ruleguard_core::range::{matches, RangeSpec};
use ruleguard_core::Value;
use std::hint::black_box;

/// Text values as they come out of a CSV column.
fn create_numeric_values(size: usize) -> Vec<Value> {
    (0..size)
        .map(|i| Value::Text(format!("{}", i % 200)))
        .collect()
}

/// ISO dates spread over two years.
fn create_date_values(size: usize) -> Vec<Value> {
    (0..size)
        .map(|i| {
            let month = i % 12 + 1;
            let day = i % 28 + 1;
            let year = 2023 + i % 2;
            Value::Text(format!("{year}-{month:02}-{day:02}"))
        })
        .collect()
}

static NUMERIC_VALUES: Lazy<Vec<(usize, Vec<Value>)>> = Lazy::new(|| {
    [1_000usize, 10_000, 100_000]
        .iter()
        .map(|&size| (size, create_numeric_values(size)))
        .collect()
});

static DATE_VALUES: Lazy<Vec<(usize, Vec<Value>)>> = Lazy::new(|| {
    [1_000usize, 10_000, 100_000]
        .iter()
        .map(|&size| (size, create_date_values(size)))
        .collect()
});

/// Spec parsed once per column, as the RANGE rule does.
fn bench_range_spec_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_spec_numeric");
    let spec = RangeSpec::parse("10,150").unwrap();

    for (size, values) in NUMERIC_VALUES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), values, |b, values| {
            b.iter(|| {
                let inside = values
                    .iter()
                    .filter(|v| spec.matches(v, None).unwrap_or(false))
                    .count();
                black_box(inside);
            });
        });
    }

    group.finish();
}

fn bench_range_spec_temporal(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_spec_temporal");
    let spec = RangeSpec::parse("2023-03-01,2024-09-30").unwrap();

    for (size, values) in DATE_VALUES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), values, |b, values| {
            b.iter(|| {
                let inside = values
                    .iter()
                    .filter(|v| spec.matches(v, None).unwrap_or(false))
                    .count();
                black_box(inside);
            });
        });
    }

    group.finish();
}

/// Fail-closed wrapper that re-parses the spec for every value.
fn bench_matches_with_secondary(c: &mut Criterion) {
    let mut group = c.benchmark_group("matches_with_secondary");
    let secondary = Value::Integer(4);

    for (size, values) in NUMERIC_VALUES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), values, |b, values| {
            b.iter(|| {
                let passed = values
                    .iter()
                    .filter(|v| matches(v, "10,150,2,8", Some(&secondary)))
                    .count();
                black_box(passed);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_range_spec_numeric,
    bench_range_spec_temporal,
    bench_matches_with_secondary
);
criterion_main!(benches);
