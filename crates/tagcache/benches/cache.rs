use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tagcache::{wrap, wrap_async, StoreRegistry};

fn bench_cached_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit_1kb", |b| {
        let registry: Arc<StoreRegistry<Vec<u8>>> = Arc::new(StoreRegistry::new());
        let cached = wrap(
            &registry,
            |n: u64| vec![n as u8; 1024],
            "bench",
            |n: &u64| n.to_string(),
            None,
        );

        // Warm the cache
        for n in 0..100 {
            cached.call(n);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cached.call(counter % 100));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_cached_hit_with_ttl(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_hit_ttl");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit_1kb_ttl", |b| {
        let registry: Arc<StoreRegistry<Vec<u8>>> = Arc::new(StoreRegistry::new());
        let cached = wrap(
            &registry,
            |n: u64| vec![n as u8; 1024],
            "bench",
            |n: &u64| n.to_string(),
            Some(Duration::from_secs(3600)),
        );

        for n in 0..100 {
            cached.call(n);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cached.call(counter % 100));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("miss");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("miss_then_fill", |b| {
        let registry: Arc<StoreRegistry<Vec<u8>>> = Arc::new(StoreRegistry::new());
        let cached = wrap(
            &registry,
            |n: u64| vec![n as u8; 1024],
            "bench",
            |n: &u64| n.to_string(),
            None,
        );

        // Every key is new, so every call recomputes
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cached.call(counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_async_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("async_hit_1kb", |b| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let registry: Arc<StoreRegistry<Vec<u8>>> = Arc::new(StoreRegistry::new());
        let cached = wrap_async(
            &registry,
            |n: u64| async move { vec![n as u8; 1024] },
            "bench",
            |n: &u64| n.to_string(),
            None,
        );

        runtime.block_on(async {
            for n in 0..100 {
                cached.call(n).await;
            }
        });

        let mut counter = 0u64;
        b.iter(|| {
            black_box(runtime.block_on(cached.call(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_hit,
    bench_cached_hit_with_ttl,
    bench_miss,
    bench_async_hit
);
criterion_main!(benches);
