//! LZ77 codec benchmarks.

use bytepack_core::{Codec, CompressionConfig};
use bytepack_lz77::Lz77Codec;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Repetitive pattern, the codec's home turf.
fn repetitive(size: usize) -> Vec<u8> {
    let pattern = b"TOBEORNOTTOBEORTOBEORNOT";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        let remaining = size - data.len();
        data.extend_from_slice(&pattern[..remaining.min(pattern.len())]);
    }
    data
}

/// Reproducible pseudo-random data, the adversarial case.
fn random(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn bench_lz77(c: &mut Criterion) {
    let mut group = c.benchmark_group("lz77");
    let config = CompressionConfig::default();
    let size = 128 * 1024;

    let patterns: [(&str, fn(usize) -> Vec<u8>); 2] = [("repetitive", repetitive), ("random", random)];

    for (name, generator) in patterns {
        let data = generator(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compress", name), &data, |b, data| {
            let mut codec = Lz77Codec::new();
            b.iter(|| codec.compress(black_box(data), &config).unwrap());
        });

        let mut codec = Lz77Codec::new();
        let compressed = codec.compress(&data, &config).unwrap().data;
        group.bench_with_input(
            BenchmarkId::new("decompress", name),
            &compressed,
            |b, data| {
                let mut codec = Lz77Codec::new();
                b.iter(|| codec.decompress(black_box(data), &config).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_lz77);
criterion_main!(benches);
