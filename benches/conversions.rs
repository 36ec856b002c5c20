//! Conversion benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench conversions
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prop_basis::formula::{BinaryOp, Formula};
use prop_basis::operators::Basis;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn random_formula(rng: &mut impl Rng, depth: u32) -> Formula {
    if depth == 0 {
        return Formula::var(format!("x{}", rng.gen_range(0..8)));
    }
    match rng.gen_range(0..8) {
        0 => Formula::not(random_formula(rng, depth - 1)),
        _ => {
            // Skip XOR and biconditional, which blow up exponentially.
            let ops = [BinaryOp::And, BinaryOp::Or, BinaryOp::Implies, BinaryOp::Nand, BinaryOp::Nor];
            let op = *ops.choose(rng).unwrap();
            Formula::binary(op, random_formula(rng, depth - 1), random_formula(rng, depth - 1))
        }
    }
}

fn bench_bases(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for depth in [6, 10, 14] {
        let formula = random_formula(&mut rng, depth);
        group.throughput(Throughput::Elements(formula.size() as u64));
        for basis in Basis::ALL {
            group.bench_with_input(BenchmarkId::new(basis.name(), depth), &formula, |b, f| {
                b.iter(|| basis.convert(f))
            });
        }
    }

    group.finish();
}

fn bench_predicted_size(c: &mut Criterion) {
    let mut formula = Formula::var("x0");
    for i in 1..64 {
        formula = Formula::xor(Formula::var(format!("x{}", i)), formula);
    }
    c.bench_function("predicted_size/xor64", |b| b.iter(|| Basis::Nand.predicted_size(&formula)));
}

criterion_group!(benches, bench_bases, bench_predicted_size);
criterion_main!(benches);
