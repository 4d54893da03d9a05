//! Per-byte throughput of the matching engines, benchmarked with `criterion`
//! since this crate targets stable Rust rather than `#![feature(test)]`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use dictbench::ahocorasick::AhoCorasick;
use dictbench::matcher::Matcher;
use dictbench::mpbg::MpBg;
use dictbench::patterns_tree::{self, PatternId};

fn random_dictionary(n_patterns: usize, pattern_len: usize, seed: u64) -> Vec<(u32, u32, Vec<u8>)> {
    use rand::Rng;
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    (0..n_patterns)
        .map(|i| {
            let bytes = (0..pattern_len).map(|_| rng.gen_range(b'a'..=b'd')).collect();
            (0u32, i as u32 + 1, bytes)
        })
        .collect()
}

fn random_stream(len: usize, seed: u64) -> Vec<u8> {
    use rand::Rng;
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(b'a'..=b'd')).collect()
}

fn build_engine<M: Matcher + Default>(dict: &[(u32, u32, Vec<u8>)]) -> M {
    let mut added = Vec::new();
    let _tree = patterns_tree::build(dict.iter().cloned(), |bytes: &[u8], id: PatternId| {
        added.push((bytes.to_vec(), id))
    });
    let mut engine = M::default();
    for (bytes, id) in &added {
        engine.add_pattern(bytes, *id);
    }
    engine.compile();
    engine
}

fn bench_engines(c: &mut Criterion) {
    let dict = random_dictionary(200, 17, 1);
    let stream = random_stream(200_000, 2);

    let mut group = c.benchmark_group("per_byte_throughput");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    let mut bg: MpBg = build_engine(&dict);
    group.bench_function("bg", |b| {
        b.iter(|| {
            bg.reset();
            for &byte in &stream {
                black_box(bg.read_char(byte));
            }
        })
    });

    let mut ac: AhoCorasick = build_engine(&dict);
    group.bench_function("ac", |b| {
        b.iter(|| {
            ac.reset();
            for &byte in &stream {
                black_box(ac.read_char(byte));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
