//! Cache Benchmarks
//!
//! Populates a 32 MB cache with small and large objects, reading each one back.
//!
//! Run: cargo bench -- populating

use byte_cache::{CacheStore, KB, MB};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_populate(c: &mut Criterion, name: &str, object_size: usize) {
    let payload: std::sync::Arc<[u8]> = vec![0u8; object_size].into();
    let expires_at = Utc::now() + Duration::hours(1);

    c.bench_function(name, |b| {
        let mut cache: CacheStore = CacheStore::new(32 * MB, MB);
        let mut key = 0u64;
        b.iter(|| {
            cache.set(key, payload.clone(), expires_at);
            black_box(cache.get(&key));
            key += 1;
        })
    });
}

/// 1 KB values: dominated by map and queue bookkeeping.
fn bench_populating_small_objects(c: &mut Criterion) {
    bench_populate(c, "populating_small_objects", KB);
}

/// 512 KB values: the cache holds at most 64, so nearly every set evicts.
fn bench_populating_large_objects(c: &mut Criterion) {
    bench_populate(c, "populating_large_objects", 512 * KB);
}

criterion_group!(
    benches,
    bench_populating_small_objects,
    bench_populating_large_objects
);
criterion_main!(benches);
