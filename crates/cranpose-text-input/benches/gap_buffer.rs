use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cranpose_text_input::{GapBuffer, PartialGapBuffer, TextFieldState, TextStore};

fn document(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {i}: the quick brown fox jumps over the lazy dog\n"))
        .collect()
}

/// Types `count` characters one at a time at `index`.
fn type_at(store: &mut impl TextStore, index: usize, count: usize) {
    for i in 0..count {
        store.insert(index + i, "x").unwrap_or_default();
    }
}

fn bench_typing(c: &mut Criterion) {
    let text = document(200);
    let middle = text.chars().count() / 2;

    let mut group = c.benchmark_group("typing");
    group.bench_function("gap_buffer", |b| {
        b.iter_batched(
            || GapBuffer::from(text.as_str()),
            |mut store| {
                type_at(&mut store, middle, 100);
                black_box(store.len())
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("partial_gap_buffer", |b| {
        b.iter_batched(
            || PartialGapBuffer::new(&text),
            |mut store| {
                type_at(&mut store, middle, 100);
                black_box(store.len())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_scattered_edits(c: &mut Criterion) {
    let text = document(200);
    let len = text.chars().count();

    c.bench_function("partial_gap_buffer_scattered", |b| {
        b.iter_batched(
            || PartialGapBuffer::new(&text),
            |mut store| {
                for step in 0..50 {
                    let at = (step * 7919) % (len - 10);
                    store.replace(at, at + 3, "edit").unwrap_or_default();
                }
                black_box(store.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_state_edits(c: &mut Criterion) {
    let text = document(50);

    c.bench_function("state_type_and_undo", |b| {
        b.iter_batched(
            || TextFieldState::new(text.as_str()),
            |state| {
                for _ in 0..20 {
                    state.edit(|buffer| buffer.append("y"));
                }
                state.undo().unwrap_or_default();
                black_box(state.len())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_typing, bench_scattered_edits, bench_state_edits);
criterion_main!(benches);
