//! Benchmarks for superposition decomposition and transfer.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use symcir_core::{Domain, DomainExpr, Quantity, Superposition};
use symcir_expr::Expr;

fn mixed_signal(ac_terms: usize) -> String {
    let mut src = String::from("5 + exp(-4*t)");
    for k in 1..=ac_terms {
        src.push_str(&format!(" + cos({k}*t)"));
    }
    src
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    for ac_terms in [1usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(ac_terms),
            &ac_terms,
            |bencher, &ac_terms| {
                let src = mixed_signal(ac_terms);
                bencher.iter(|| {
                    let v = Superposition::voltage_of(black_box(src.as_str())).unwrap();
                    v.decompose().unwrap().len()
                });
            },
        );
    }

    group.finish();
}

fn bench_transfer_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_multiply");

    for ac_terms in [1usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(ac_terms),
            &ac_terms,
            |bencher, &ac_terms| {
                let v = Superposition::voltage_of(mixed_signal(ac_terms).as_str()).unwrap();
                // RC admittance: Y(s) = 1/(1 + s)
                let s = Expr::symbol(symcir_core::registry::LAPLACE.clone());
                let y = DomainExpr::new(
                    Expr::recip(Expr::one() + s),
                    Domain::Laplace,
                    Quantity::Admittance,
                )
                .unwrap();
                bencher.iter(|| v.transfer_multiply(black_box(&y)).unwrap().len());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decompose, bench_transfer_multiply);
criterion_main!(benches);
