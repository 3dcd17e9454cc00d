//! Benchmarks for value formatting.
//!
//! Covers the hot paths of printing large values:
//! - Sequences of distinct elements under the default and unlimited budgets
//! - Sequences dominated by repeat runs
//! - Terminator search through long strings
//! - Structures nested in arrays

extern crate valscope;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use valscope::{
    format::fetch_string, ByteOrder, CancellationToken, Field, MemoryImage, PrintLimit,
    PrintOptions, PrintPolicy, PrintStream, Type, TypeRef, Value, ValuePrinter,
};

fn int_array(values: impl Iterator<Item = i32>) -> Value {
    let bytes: Vec<u8> = values.flat_map(i32::to_le_bytes).collect();
    let ty = Type::array_of(Type::int("int", 4, false), bytes.len() / 4);
    Value::new(ty, bytes).unwrap()
}

fn render(policy: &PrintPolicy, memory: &MemoryImage, value: &Value) -> String {
    let printer = ValuePrinter::new(policy, memory).with_byte_order(ByteOrder::Little);
    let mut out = PrintStream::new();
    printer
        .print_value(value, &mut out, PrintOptions::new())
        .unwrap();
    out.into_string()
}

/// Benchmark a 10,000 element array cut off at the default budget of 200.
fn bench_array_default_budget(c: &mut Criterion) {
    let policy = PrintPolicy::new();
    let memory = MemoryImage::new();
    let value = int_array(0..10_000);

    c.bench_function("array_default_budget", |b| {
        b.iter(|| black_box(render(&policy, &memory, black_box(&value))));
    });
}

/// Benchmark printing every element of a 10,000 element array.
fn bench_array_unlimited(c: &mut Criterion) {
    let policy = PrintPolicy::new().with_elements(0);
    let memory = MemoryImage::new();
    let value = int_array(0..10_000);

    c.bench_function("array_unlimited", |b| {
        b.iter(|| black_box(render(&policy, &memory, black_box(&value))));
    });
}

/// Benchmark an array made of long repeat runs.
fn bench_array_repeat_runs(c: &mut Criterion) {
    let policy = PrintPolicy::new().with_elements(0);
    let memory = MemoryImage::new();
    let value = int_array((0..10_000).map(|i| i / 500));

    c.bench_function("array_repeat_runs", |b| {
        b.iter(|| black_box(render(&policy, &memory, black_box(&value))));
    });
}

/// Benchmark a terminator search across many fetch chunks.
fn bench_fetch_long_string(c: &mut Criterion) {
    let mut bytes = vec![b'x'; 4096];
    bytes.push(0);
    let mut memory = MemoryImage::new();
    memory.map(0x1000, bytes, ".rodata").unwrap();
    let cancel = CancellationToken::new();

    c.bench_function("fetch_long_string", |b| {
        b.iter(|| {
            let fetched =
                fetch_string(&memory, black_box(0x1000), 0, PrintLimit::UNLIMITED, &cancel)
                    .unwrap();
            black_box(fetched)
        });
    });
}

/// Benchmark an array of pretty-printed structures.
fn bench_struct_array_pretty(c: &mut Criterion) {
    let int: TypeRef = Type::int("int", 4, false);
    let point = Type::structure(
        "point",
        8,
        vec![Field::new("x", 0, int.clone()), Field::new("y", 4, int)],
    );
    let bytes: Vec<u8> = (0..2_000i32).flat_map(i32::to_le_bytes).collect();
    let value = Value::new(Type::array_of(point, 1_000), bytes).unwrap();
    let policy = PrintPolicy::new()
        .with_elements(0)
        .with_pretty_structs(true)
        .with_pretty_arrays(true);
    let memory = MemoryImage::new();

    c.bench_function("struct_array_pretty", |b| {
        b.iter(|| black_box(render(&policy, &memory, black_box(&value))));
    });
}

criterion_group!(
    benches,
    bench_array_default_budget,
    bench_array_unlimited,
    bench_array_repeat_runs,
    bench_fetch_long_string,
    bench_struct_array_pretty,
);
criterion_main!(benches);
