//! Benchmarks to measure the compute overhead of `method_timer` logic itself.
//!
//! Spans that wrap no work at all expose the cost of starting and stopping a stopwatch,
//! which is what every call to a timed method pays on top of its own work.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use method_timer::{Timed, Timer, timed};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[derive(Debug, Default, Timed)]
struct Counter {
    timer: Timer,
    count: u64,
}

#[timed]
impl Counter {
    pub fn increment(&mut self) {
        self.count = self.count.wrapping_add(1);
    }
}

impl Counter {
    fn increment_untimed(&mut self) {
        self.count = self.count.wrapping_add(1);
    }
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("method_timer_overhead");

    // Baseline measurement - no timing at all
    group.bench_function("baseline_empty", |b| {
        b.iter(|| {
            black_box(());
        });
    });

    {
        let timer = Timer::new();

        group.bench_function("span_empty", |b| {
            b.iter(|| {
                let _span = timer.measure("empty").unwrap();
                black_box(());
            });
        });

        group.bench_function("start_stop_empty", |b| {
            b.iter(|| {
                timer.start("manual").unwrap();
                black_box(());
                timer.stop("manual").unwrap();
            });
        });
    }

    // Compare the same method body with and without the attribute.
    {
        let mut counter = Counter::default();

        group.bench_function("method_untimed", |b| {
            b.iter(|| black_box(&mut counter).increment_untimed());
        });

        group.bench_function("method_timed", |b| {
            b.iter(|| black_box(&mut counter).increment());
        });
    }

    group.finish();
}
