use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_csv_metadata::analysis::parse_suggestions;
use rust_csv_metadata::{extract_basic_metadata, parse_csv};
use std::hint::black_box;

fn generated_csv(rows: usize) -> String {
    let mut text = String::from("id,vendor,amount,ordered_on,paid,notes\n");
    for i in 0..rows {
        text.push_str(&format!(
            "{i},\"Vendor {}, Inc\",{}.{:02},2024-{:02}-{:02},{},{}\n",
            i % 37,
            i % 5000,
            i % 100,
            i % 12 + 1,
            i % 28 + 1,
            if i % 2 == 0 { "yes" } else { "no" },
            if i % 9 == 0 { "" } else { "ok" },
        ));
    }
    text
}

fn bench_parse_and_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiling");
    for rows in [1_000usize, 10_000, 100_000] {
        let text = generated_csv(rows);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse_csv", rows), &text, |b, text| {
            b.iter(|| parse_csv(black_box(text)))
        });

        let grid = parse_csv(&text);
        group.bench_with_input(BenchmarkId::new("extract_basic_metadata", rows), &grid, |b, grid| {
            b.iter(|| extract_basic_metadata(black_box(grid)))
        });
    }
    group.finish();
}

fn bench_suggestions(c: &mut Criterion) {
    let answer: String = (1..=10)
        .map(|i| format!("{i}. **Idea {i}** - Compare \"amount\" by Vendor over time in 15 minutes.\n"))
        .collect();
    c.bench_function("parse_suggestions", |b| b.iter(|| parse_suggestions(black_box(&answer))));
}

criterion_group!(benches, bench_parse_and_extract, bench_suggestions);
criterion_main!(benches);
