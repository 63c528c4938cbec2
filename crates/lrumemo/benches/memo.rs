use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrumemo::{lru_cache, CallArgs};

fn work(n: u64) -> u64 {
    (0..64).fold(n, |acc, i| acc.wrapping_mul(31).wrapping_add(i))
}

fn bench_cached_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_call");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("call_u64_hit", |b| {
        let memo = lru_cache(1000).unwrap().decorate_infallible(work);

        // Warm the cache
        for n in 0..100 {
            memo.call(n).unwrap();
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(memo.call(counter % 100).unwrap());
            counter += 1;
        });
    });

    group.bench_function("call_args_hit", |b| {
        let memo = lru_cache(1000)
            .unwrap()
            .decorate_infallible(|args: CallArgs| args.positional().len());
        let args: Vec<CallArgs> = (0..100)
            .map(|n| CallArgs::new().arg(n).named("scale", 2).named("mode", "fast"))
            .collect();

        for a in &args {
            memo.call(a.clone()).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(memo.call(args[counter % 100].clone()).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_cache_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_miss");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("call_u64_evicting", |b| {
        let memo = lru_cache(10).unwrap().decorate_infallible(work); // Small cache

        let mut counter = 0u64;
        b.iter(|| {
            // Cycling over more keys than fit guarantees misses
            black_box(memo.call(counter % 100).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_call, bench_cache_miss);
criterion_main!(benches);
