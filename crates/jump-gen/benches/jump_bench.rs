use criterion::{criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;

use jump_gen::{jump_matrix, jump_poly, Generator, GeneratorConfig, JumpKind, Transition};

fn bench_algebra(c: &mut Criterion) {
    let transition = Transition::production();
    let charpoly = transition
        .characteristic_polynomial()
        .expect("production matrix is invertible");
    let distance = BigUint::from(1u8) << 67;

    let mut group = c.benchmark_group("algebra");
    group.sample_size(10);
    group.bench_function("matrix_pow_2^67", |b| {
        b.iter(|| jump_matrix(transition.matrix(), &distance));
    });
    group.bench_function("jump_poly_2^67", |b| {
        b.iter(|| jump_poly(&charpoly, &distance));
    });
    group.bench_function("characteristic_polynomial", |b| {
        b.iter(|| transition.characteristic_polynomial());
    });
    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    group.sample_size(10);
    for kind in [JumpKind::Matrix, JumpKind::Poly] {
        group.bench_function(format!("production_{kind}"), |b| {
            b.iter(|| {
                let config = GeneratorConfig {
                    kind,
                    ..GeneratorConfig::default()
                };
                Generator::new(config)
                    .and_then(|g| g.generate())
                    .expect("production tables")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_algebra, bench_tables);
criterion_main!(benches);
