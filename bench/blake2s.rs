use criterion::*;
use libb2::utils::{cpu_name, human_readable_size};
use libb2::{_bench_main, _impl_bench_trait_for_criterion};

_impl_bench_trait_for_criterion!(Criterion);

fn bench_blake2s_hash(c: &mut impl BenchTrait, size: usize) {
    let data = vec![0u8; size];
    let mut out = [0u8; 32];

    let test_name = format!("{} blake2s hash {}", cpu_name(), human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        libb2::blake2s::Blake2s::hash(&mut out, &data, &[]).unwrap();
        std::hint::black_box(&out);
    });
}

fn bench_blake2s_hash_blake2(c: &mut impl BenchTrait, size: usize) {
    use blake2::{Blake2s256, Digest};
    let data = vec![0u8; size];

    let test_name = format!("{} blake2s(blake2) hash {}", cpu_name(), human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        std::hint::black_box(Blake2s256::digest(&data));
    });
}

fn bench_blake2s(c: &mut Criterion) {
    bench_blake2s_hash(c, 16);
    bench_blake2s_hash_blake2(c, 16);
    bench_blake2s_hash(c, 64);
    bench_blake2s_hash_blake2(c, 64);
    bench_blake2s_hash(c, 256);
    bench_blake2s_hash_blake2(c, 256);
    bench_blake2s_hash(c, 1024);
    bench_blake2s_hash_blake2(c, 1024);
    bench_blake2s_hash(c, 8192);
    bench_blake2s_hash_blake2(c, 8192);
    bench_blake2s_hash(c, 65536);
    bench_blake2s_hash_blake2(c, 65536);
}

criterion_group!(benches, bench_blake2s);
_bench_main!(
    benches,
    bench_blake2s_hash,
    bench_blake2s_hash_blake2,
);
