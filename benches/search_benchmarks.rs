//! Performance benchmarks for contact filtering.
//!
//! The index is rebuilt on every query change, so build and query are measured
//! both separately and together, across different contact set sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use contact_book::domain::ContactId;
use contact_book::models::{Contact, NewContact};
use contact_book::search::{filter_contacts, CombineWith, SearchIndex, SearchOptions};
use std::time::Duration;

const FIRST_NAMES: [&str; 8] = ["Ann", "Bob", "Carla", "Dmitri", "Elena", "Farid", "Greta", "Hiro"];
const LAST_NAMES: [&str; 6] = ["Smith", "Jones", "Okafor", "Lindqvist", "Moreau", "Tanaka"];
const STREETS: [&str; 5] = ["Main Street", "Oak Avenue", "Harbour Way", "Elm Road", "Pine Close"];
const CITIES: [&str; 4] = ["Springfield", "Shelbyville", "Ogdenville", "Capital City"];

/// Deterministic synthetic contact set.
fn synthetic_contacts(count: usize) -> Vec<Contact> {
    (0..count)
        .map(|i| {
            let name = format!(
                "{} {}",
                FIRST_NAMES[i % FIRST_NAMES.len()],
                LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
            );
            let address = format!("{} {}", i + 1, STREETS[i % STREETS.len()]);
            let postal_code = format!("{}{} {}", (b'A' + (i % 26) as u8) as char, i % 10, i % 7);

            Contact::new(
                ContactId::from(i as u64 + 1),
                NewContact::new(name, address, postal_code, CITIES[i % CITIES.len()]),
            )
        })
        .collect()
}

/// Benchmark index construction alone.
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [100, 1_000, 5_000].iter() {
        let contacts = synthetic_contacts(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &contacts, |b, contacts| {
            b.iter(|| SearchIndex::build(black_box(contacts), SearchOptions::default()));
        });
    }

    group.finish();
}

/// Benchmark queries against a prebuilt index.
fn bench_index_query(c: &mut Criterion) {
    let contacts = synthetic_contacts(1_000);
    let index = SearchIndex::build(&contacts, SearchOptions::default());
    let mut group = c.benchmark_group("index_query");

    for query in ["an", "springfeld", "elena oak", "capital city"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, query| {
            b.iter(|| index.search(black_box(query)));
        });
    }

    group.finish();
}

/// Benchmark the full per-keystroke cycle: build, query, copy out.
fn bench_filter_per_keystroke(c: &mut Criterion) {
    let contacts = synthetic_contacts(1_000);
    let typed = ["s", "sp", "spr", "spri", "sprin", "spring"];

    c.bench_function("filter_per_keystroke", |b| {
        b.iter(|| {
            for query in typed {
                black_box(filter_contacts(&contacts, query, SearchOptions::default()));
            }
        });
    });
}

/// Benchmark AND against OR combination of multi-term queries.
fn bench_combine_modes(c: &mut Criterion) {
    let contacts = synthetic_contacts(1_000);
    let mut group = c.benchmark_group("combine_modes");

    for combine_with in [CombineWith::And, CombineWith::Or] {
        let options = SearchOptions {
            combine_with,
            ..SearchOptions::default()
        };
        group.bench_function(combine_with.to_string(), |b| {
            b.iter(|| filter_contacts(&contacts, black_box("greta harbour ogdenville"), options));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets = bench_index_build,
        bench_index_query,
        bench_filter_per_keystroke,
        bench_combine_modes
}

criterion_main!(benches);
