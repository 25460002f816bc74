use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use inkpost_engine::{EngineKind, RenderOptions, convert, extract_headings};
mod common;

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    group.sample_size(10);

    let content = common::generate_post(100);
    for engine in [EngineKind::Builtin, EngineKind::Pulldown] {
        let options = RenderOptions {
            engine,
            ..RenderOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("engine", engine), &content, |b, md| {
            b.iter(|| std::hint::black_box(convert(std::hint::black_box(md), &options)));
        });
    }

    group.finish();
}

fn bench_toc_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("toc");
    group.sample_size(10);

    let content = common::generate_sectioned_post(50, 4);
    let html = convert(&content, &RenderOptions::default()).html;
    group.bench_function("extract_headings", |b| {
        b.iter(|| std::hint::black_box(extract_headings(std::hint::black_box(&html), 1)));
    });

    group.finish();
}

criterion_group!(benches, bench_engines, bench_toc_extraction);
criterion_main!(benches);
