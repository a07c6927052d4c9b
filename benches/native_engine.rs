use argon2_worker::channel::{Credentials, HashRequest};
use argon2_worker::engine::NativeEngine;
use argon2_worker::hash::blake2b;
use argon2_worker::worker::Invoker;
use argon2_worker::{EngineConfig, Variant};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn invoker(config: EngineConfig) -> Invoker {
    let engine = NativeEngine::new(config).expect("valid configuration");
    Invoker::new(Box::new(engine), config)
}

pub fn bench_blake2b(c: &mut Criterion) {
    c.bench_function("blake2b-512 1 KiB", |b| {
        b.iter(|| blake2b(64, black_box(&[0u8; 1024])))
    });
}

pub fn bench_native_engine(c: &mut Criterion) {
    let request = HashRequest::new(1, Credentials::new("correct horse", "12345678")).unwrap();

    let mut group = c.benchmark_group("native engine");
    group.sample_size(10);

    for variant in [Variant::D, Variant::I, Variant::Id] {
        let mut small = invoker(EngineConfig {
            memory_kib: 1024,
            iterations: 1,
            variant,
            ..EngineConfig::default()
        });
        group.bench_function(format!("argon2{variant:?} 1 MiB t=1").to_lowercase(), |b| {
            b.iter(|| small.invoke(black_box(&request)).unwrap())
        });
    }

    let mut full = invoker(EngineConfig::default());
    group.bench_function("argon2d 64 MiB t=4 (default)", |b| {
        b.iter(|| full.invoke(black_box(&request)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_blake2b, bench_native_engine);
criterion_main!(benches);
