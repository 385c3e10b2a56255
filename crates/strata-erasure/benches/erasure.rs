//! Benchmarks for erasure encoding, decoding and decode-plan construction.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use strata_erasure::{Code, DecodePlan, ErasurePattern};

fn bench_data(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF ^ seed.wrapping_mul(0x9E37_79B9);
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

/// `(m, k)` pairs covering both generator constructions.
const CONFIGS: &[(usize, usize)] = &[(9, 5), (12, 8), (20, 16)];
const STRIPE_DATA_SIZES: &[usize] = &[64 * 1024, 1024 * 1024];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("erasure_encode");
    for &(m, k) in CONFIGS {
        for &size in STRIPE_DATA_SIZES {
            let code = Code::new(m, k, size / k * k).unwrap();
            let data = bench_data(code.data_len(), k as u32);
            let label = format!("m{m}_k{k}_{size}");
            group.throughput(Throughput::Bytes(data.len() as u64));
            group.bench_with_input(BenchmarkId::new("encode", &label), &data, |b, data| {
                b.iter(|| code.encode(data).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("erasure_decode");
    for &(m, k) in CONFIGS {
        for &size in STRIPE_DATA_SIZES {
            let code = Code::new(m, k, size / k * k).unwrap();
            let data = bench_data(code.data_len(), k as u32);
            let stripe = code.encode_stripe(&data).unwrap();
            group.throughput(Throughput::Bytes(data.len() as u64));

            // No losses: a straight copy of the data region.
            let label = format!("m{m}_k{k}_{size}");
            group.bench_with_input(BenchmarkId::new("decode_none", &label), &stripe, |b, s| {
                b.iter(|| code.decode(s, &[]).unwrap());
            });

            // Lose the first m - k data shards; the plan is cached after the
            // first iteration.
            let erased: Vec<usize> = (0..m - k).collect();
            group.bench_with_input(BenchmarkId::new("decode_max_loss", &label), &stripe, |b, s| {
                b.iter(|| code.decode(s, &erased).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_plan_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_plan_build");
    for &(m, k) in &[(12, 8), (20, 16), (64, 32), (127, 100)] {
        let code = Code::new(m, k, k).unwrap();
        let erased: Vec<usize> = (0..m - k).collect();
        let pattern = ErasurePattern::new(m, k, &erased).unwrap();
        group.bench_function(BenchmarkId::new("build", format!("m{m}_k{k}")), |b| {
            b.iter(|| DecodePlan::build(code.generator(), &pattern).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_plan_build);
criterion_main!(benches);
