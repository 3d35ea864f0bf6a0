//! Throughput of parsing and applying operations to array documents.
//!
//! Run benchmarks: `cargo bench --bench transform_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jstream::{Engine, parse_program};
use serde_json::{Value, json};
use std::hint::black_box;

/// Generate test data records
fn generate_records(count: usize) -> Value {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Record {}", i),
                "profile": {
                    "age": i % 90,
                    "address": [
                        { "state": if i % 3 == 0 { "Tehran" } else { "Alborz" }, "zip": i * 10 },
                        { "state": "Gilan", "zip": i * 10 + 1 }
                    ]
                }
            })
        })
        .collect()
}

const OPERATIONS: &str = r#"
    filter -> profile.age >= 18 and profile.address[state == "Tehran"]
    map -> label = name || " (" || profile.age || ")"
    map -> profile.decade = profile.age / 10
    rename -> key = id
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_program", |b| {
        b.iter(|| parse_program(black_box(OPERATIONS)))
    });
}

fn bench_record_counts(c: &mut Criterion) {
    let program = parse_program(OPERATIONS).expect("benchmark program parses");
    let engine = Engine::default();
    let mut group = c.benchmark_group("record_count");

    for count in [10usize, 100, 1000, 10_000] {
        let records = generate_records(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| {
                let mut doc = records.clone();
                engine.apply_program(&mut doc, &program).expect("program applies");
                doc
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_record_counts);
criterion_main!(benches);
