use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polymin::{parse_polynomial, Differentiable};

mod common;
use common::{point, rosenbrock, rosenbrock_text};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [2, 10, 50] {
        let text = rosenbrock_text(n);
        group.bench_with_input(BenchmarkId::new("rosenbrock", n), &text, |b, text| {
            b.iter(|| black_box(parse_polynomial(black_box(text))))
        });
    }
    group.finish();
}

fn bench_differentiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("differentiate");
    for n in [2, 10, 50] {
        let f = rosenbrock(n);

        group.bench_with_input(BenchmarkId::new("gradient", n), &f, |b, f| {
            b.iter(|| black_box(f.gradient(n)))
        });

        if n <= 10 {
            group.bench_with_input(BenchmarkId::new("hessian", n), &f, |b, f| {
                b.iter(|| black_box(f.hessian(n)))
            });
        }
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for n in [2, 10, 50] {
        let f = rosenbrock(n);
        let gradient = f.gradient(n).expect("n > 0");
        let x = point(n);

        group.bench_with_input(BenchmarkId::new("value", n), &x, |b, x| {
            b.iter(|| black_box(f.value(black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("gradient", n), &x, |b, x| {
            b.iter(|| black_box(gradient.evaluate(black_box(x))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_differentiate, bench_evaluate);
criterion_main!(benches);
