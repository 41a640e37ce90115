use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use oa_hashmap::{BackwardShiftMap, RobinHoodMap, TombstoneMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// The same four workloads per variant: bulk insert, hot lookup, missing
// lookup, and a remove/reinsert churn that stresses the deletion policy.
macro_rules! variant_benches {
    ($f:ident, $label:expr, $map:ty) => {
        fn $f(c: &mut Criterion) {
            c.bench_function(concat!($label, "_insert_10k"), |b| {
                b.iter_batched(
                    <$map>::new,
                    |mut m| {
                        for (i, x) in lcg(1).take(10_000).enumerate() {
                            m.insert(x, i as u64);
                        }
                        black_box(m)
                    },
                    BatchSize::SmallInput,
                )
            });
            c.bench_function(concat!($label, "_emplace_hit"), |b| {
                let mut m: $map = <$map>::new();
                let keys: Vec<u64> = lcg(7).take(20_000).collect();
                for (i, &k) in keys.iter().enumerate() {
                    m.insert(k, i as u64);
                }
                let mut it = keys.iter().cycle();
                b.iter(|| {
                    let k = it.next().unwrap();
                    black_box(m.emplace(k));
                })
            });
            c.bench_function(concat!($label, "_emplace_miss"), |b| {
                let mut m: $map = <$map>::new();
                for (i, x) in lcg(11).take(10_000).enumerate() {
                    m.insert(x, i as u64);
                }
                // keys from a disjoint stream are misses with near certainty
                let mut miss = lcg(0xdead_beef);
                b.iter(|| {
                    let k = miss.next().unwrap();
                    black_box(m.emplace(&k));
                })
            });
            c.bench_function(concat!($label, "_churn_10k"), |b| {
                b.iter_batched(
                    || {
                        let mut m: $map = <$map>::new();
                        for (i, x) in lcg(3).take(10_000).enumerate() {
                            m.insert(x, i as u64);
                        }
                        m
                    },
                    |mut m| {
                        for x in lcg(3).take(10_000) {
                            m.remove(&x);
                        }
                        for (i, x) in lcg(3).take(10_000).enumerate() {
                            m.insert(x, i as u64);
                        }
                        black_box(m)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    };
}

variant_benches!(bench_tombstone, "tombstone", TombstoneMap<u64, u64>);
variant_benches!(bench_backward_shift, "backward_shift", BackwardShiftMap<u64, u64>);
variant_benches!(bench_robin_hood, "robin_hood", RobinHoodMap<u64, u64>);

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_tombstone, bench_backward_shift, bench_robin_hood
}
criterion_main!(benches);
