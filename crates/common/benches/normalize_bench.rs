use criterion::{black_box, criterion_group, criterion_main, Criterion};
use idx_common::{normalize, Language};

const SAMPLE: &str = "The quick brown fox jumps over the lazy dog, again and again, \
    while the dogs and cats watch from across the yard.";

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_english", |b| {
        b.iter(|| normalize(black_box(SAMPLE), Language::English))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
