//! Validation throughput benchmarks.


use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use xplint::{DocumentSettings, LintConfig, TextDocument, ValidatorRegistry, lint_text};

// ---------------------------------------------------------------------------
// Benchmark: single rule through the full registry
// ---------------------------------------------------------------------------

fn bench_single_rule(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_defaults();
    let text = datagen::gen_n_rules(1);

    c.bench_function("validate_single_rule", |b| {
        b.iter(|| {
            let document = TextDocument::new("file:///bench.co", "co", 1, black_box(text.as_str()));
            black_box(registry.run(&document, &DocumentSettings::default()));
        });
    });
}

// ---------------------------------------------------------------------------
// Benchmark: document size scaling
// ---------------------------------------------------------------------------

fn bench_scaling(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_defaults();
    let config = LintConfig::default();
    let mut group = c.benchmark_group("validate_rules");

    for n in [10, 100, 1000] {
        let text = datagen::gen_n_rules(n);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("count", n), &text, |b, text| {
            b.iter(|| {
                let document = TextDocument::new("file:///bench.co", "co", 1, text.as_str());
                black_box(lint_text(
                    &registry,
                    &document,
                    DocumentSettings::default(),
                    &config,
                ));
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: dialect guard (nothing applies)
// ---------------------------------------------------------------------------

fn bench_inapplicable_dialect(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_defaults();
    let text = datagen::gen_n_rules(100);

    c.bench_function("validate_normalization_dialect", |b| {
        b.iter(|| {
            let document = TextDocument::new("file:///bench.xp", "xp", 1, text.as_str());
            black_box(registry.run(&document, &DocumentSettings::default()));
        });
    });
}

criterion_group!(
    benches,
    bench_single_rule,
    bench_scaling,
    bench_inapplicable_dialect
);
criterion_main!(benches);
