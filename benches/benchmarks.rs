//! Benchmarks for realroot polynomial arithmetic and root finding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use realroot::fft::{mul_fft, FftPlan};
use realroot::{Polynomial, Refinement, Solver, SolverConfig, SturmChain};

fn dense(size: usize) -> Polynomial {
    let coeffs: Vec<f64> = (0..size).map(|i| ((i * 37) % 19) as f64 - 9.0 + 0.5).collect();
    Polynomial::new(coeffs).unwrap()
}

fn bench_poly_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Poly Operations");

    let p_small = dense(16);
    let p_medium = dense(64);
    let p_large = dense(256);

    let x = 0.987;
    group.bench_function("eval_16", |bencher| {
        bencher.iter(|| black_box(&p_small).eval(black_box(x)))
    });

    group.bench_function("eval_256", |bencher| {
        bencher.iter(|| black_box(&p_large).eval(black_box(x)))
    });

    let divisor = dense(8);
    group.bench_function("div_rem_64_by_8", |bencher| {
        bencher.iter(|| black_box(&p_medium).div_rem(black_box(&divisor)))
    });

    group.bench_function("derivative_256", |bencher| {
        bencher.iter(|| black_box(&p_large).derivative())
    });

    group.finish();
}

fn bench_fft_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT Operations");

    for size in [64, 256, 1024] {
        let p = dense(size);
        group.bench_with_input(BenchmarkId::new("mul_fft", size), &p, |bencher, p| {
            bencher.iter(|| mul_fft(black_box(p), black_box(p)))
        });
    }

    let plan = FftPlan::new(1024).unwrap();
    let p = dense(512);
    group.bench_function("plan_mul_512", |bencher| {
        bencher.iter(|| plan.mul(black_box(&p), black_box(&p)))
    });

    group.finish();

    let mut group = c.benchmark_group("Naive vs FFT");
    for size in [16, 32, 64, 128, 256] {
        let p = dense(size);

        group.bench_with_input(BenchmarkId::new("naive", size), &p, |bencher, p| {
            bencher.iter(|| black_box(p).mul_naive(black_box(p)))
        });

        group.bench_with_input(BenchmarkId::new("fft", size), &p, |bencher, p| {
            bencher.iter(|| black_box(p).mul_fft(black_box(p)))
        });
    }
    group.finish();
}

fn bench_root_finding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Root Finding");

    for n in [5, 10, 15] {
        let p = Polynomial::wilkinson(n);
        group.bench_with_input(BenchmarkId::new("sturm_chain", n), &p, |bencher, p| {
            bencher.iter(|| SturmChain::new(black_box(p)))
        });
    }

    let p = Polynomial::wilkinson(10);

    group.bench_function("isolate_wilkinson_10", |bencher| {
        let mut solver = Solver::default();
        bencher.iter(|| solver.isolate_roots_within(black_box(&p), 0.0, 11.0))
    });

    for refinement in [Refinement::Bisection, Refinement::Newton] {
        let config = SolverConfig::default()
            .with_refinement(refinement)
            .with_seed(1);
        group.bench_function(format!("find_roots_wilkinson_10_{:?}", refinement), |bencher| {
            let mut solver = Solver::new(config.clone()).unwrap();
            bencher.iter(|| solver.find_roots_within(black_box(&p), 0.0, 11.0))
        });
    }

    // Cold cache: the chain is rebuilt on every query.
    group.bench_function("find_roots_wilkinson_10_uncached", |bencher| {
        let mut solver = Solver::default();
        bencher.iter(|| {
            solver.clear_cache();
            solver.find_roots_within(black_box(&p), 0.0, 11.0)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_poly_operations,
    bench_fft_operations,
    bench_root_finding,
);
criterion_main!(benches);
