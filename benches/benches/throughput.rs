//! Streamtree Criterion Benchmark
//!
//! Measures block-root throughput by leaf count and worker-pool width.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use streamtree::{BytesCodec, CallerThread, Digest, Executor, Hasher};

/// Typical serialized block-item size.
const LEAF_LEN: usize = 128;

fn random_leaves(count: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let mut leaf = vec![0u8; LEAF_LEN];
            rng.fill(&mut leaf[..]);
            leaf
        })
        .collect()
}

fn block_root(input: &[Vec<u8>], executor: &Arc<dyn Executor>) -> Digest {
    let mut hasher = Hasher::new(Arc::clone(executor), BytesCodec);
    for leaf in input {
        hasher.add_leaf(leaf.clone()).unwrap();
    }
    futures::executor::block_on(hasher.root_hash()).unwrap()
}

// =============================================================================
// BENCHMARK 1: LEAF COUNT
// =============================================================================

/// Root latency as the block grows, single-threaded.
fn bench_leaf_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Leaf-Count");
    let executor: Arc<dyn Executor> = Arc::new(CallerThread);

    for count in [256, 4_096, 65_536] {
        let input = random_leaves(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, data| {
            b.iter(|| block_root(black_box(data), &executor));
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: POOL WIDTH
// =============================================================================

/// Throughput scaling across worker-pool widths for a fixed block.
fn bench_pool_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Pool-Width");
    let input = random_leaves(16_384);
    group.throughput(Throughput::Elements(16_384));

    group.bench_with_input(BenchmarkId::new("threads", 0), &input, |b, data| {
        let executor: Arc<dyn Executor> = Arc::new(CallerThread);
        b.iter(|| block_root(black_box(data), &executor));
    });

    let mut widths = vec![1, 4, num_cpus::get()];
    widths.sort_unstable();
    widths.dedup();

    for threads in widths {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let executor: Arc<dyn Executor> = Arc::new(pool);

        group.bench_with_input(BenchmarkId::new("threads", threads), &input, |b, data| {
            b.iter(|| block_root(black_box(data), &executor));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_leaf_count, bench_pool_width);
criterion_main!(benches);
