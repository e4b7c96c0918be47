//! Benchmarks for selection edits.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use steamtext::editor::{Command, Selection, apply_command};

fn bench_wrap_in_large_buffer(c: &mut Criterion) {
    let buffer = "lorem ipsum dolor sit amet ".repeat(4_000);
    let middle = buffer.len() / 2;
    let selection = Selection::new(middle - 10, middle + 10);
    c.bench_function("wrap_in_large_buffer", |b| {
        b.iter(|| apply_command(black_box(&buffer), selection, Command::Bold))
    });
}

criterion_group!(benches, bench_wrap_in_large_buffer);
criterion_main!(benches);
