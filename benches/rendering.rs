//! Benchmarks for markup rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use steamtext::markup::render;

const POST: &str = "[h1]Review[/h1]\n[b]Solid[/b] [i]game[/i], [u]really[/u].\n\
[list]\n[*]one\n[*]two\n[/list]\n[hr][/hr]\n\
[url=https://example.com]link[/url] and https://store.steampowered.com\n";

fn bench_render_post(c: &mut Criterion) {
    c.bench_function("render_post", |b| b.iter(|| render(black_box(POST))));
}

fn bench_render_long_post(c: &mut Criterion) {
    let source = POST.repeat(200);
    c.bench_function("render_long_post", |b| b.iter(|| render(black_box(&source))));
}

fn bench_render_unmatched_tokens(c: &mut Criterion) {
    let source = "[b][i][h1][spoiler]".repeat(5_000);
    c.bench_function("render_unmatched_tokens", |b| {
        b.iter(|| render(black_box(&source)))
    });
}

criterion_group!(
    benches,
    bench_render_post,
    bench_render_long_post,
    bench_render_unmatched_tokens
);
criterion_main!(benches);
