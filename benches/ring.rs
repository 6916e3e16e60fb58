//! Benchmarks for ring lookups and membership changes.

use {
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion},
    vnring::{HashRing, RingConfig},
};

fn ring(nodes: u64, vnodes: u32) -> HashRing<u64> {
    let config = RingConfig::new().with_virtual_node_count(vnodes);
    let ring = HashRing::with_config(config).expect("valid config");
    for id in 0..nodes {
        ring.add(id).expect("unique node");
    }
    ring
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign");
    for nodes in [4u64, 64, 1024] {
        let ring = ring(nodes, 100);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &ring, |b, ring| {
            let mut key = 0u64;
            b.iter(|| {
                key = key.wrapping_add(1);
                black_box(ring.assign(&key))
            });
        });
    }
    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_remove");
    for vnodes in [100u32, 400] {
        let ring = ring(64, vnodes);
        group.bench_with_input(BenchmarkId::from_parameter(vnodes), &ring, |b, ring| {
            b.iter(|| {
                ring.add(u64::MAX).expect("not on the ring");
                ring.remove(&u64::MAX).expect("on the ring");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assign, bench_membership);
criterion_main!(benches);
