use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use roster::data::generate_sample_users;
use roster::export::users_to_csv;
use roster::view::{derive_view, TableQuery};
use roster::{Role, SortColumn, SortDirection, User};

fn sample(count: usize) -> Vec<User> {
    let mut rng = StdRng::seed_from_u64(7);
    generate_sample_users(count, &mut rng)
}

fn query() -> TableQuery {
    TableQuery::new(NonZeroUsize::new(25).expect("non-zero"))
}

/// Benchmark the default view: no filters, id ascending
fn bench_default_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_view_default");

    for count in [100, 1000, 10000].iter() {
        let users = sample(*count);
        let q = query();
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| derive_view(black_box(&users), black_box(&q)).total_pages);
        });
    }
    group.finish();
}

/// Benchmark search plus role filter with a descending name sort
fn bench_filtered_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_view_filtered");

    for count in [100, 1000, 10000].iter() {
        let users = sample(*count);
        let mut q = query();
        q.search = "ов".to_string();
        q.role = Some(Role::Standard);
        q.sort_column = SortColumn::Name;
        q.sort_direction = SortDirection::Desc;
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| derive_view(black_box(&users), black_box(&q)).filtered_count());
        });
    }
    group.finish();
}

/// Benchmark CSV export of the whole collection
fn bench_export(c: &mut Criterion) {
    let users = sample(1000);
    let rows: Vec<&User> = users.iter().collect();

    c.bench_function("users_to_csv_1000", |b| {
        b.iter(|| users_to_csv(black_box(&rows)));
    });
}

criterion_group!(benches, bench_default_view, bench_filtered_view, bench_export);
criterion_main!(benches);
