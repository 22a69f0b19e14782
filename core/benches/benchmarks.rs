use criterion::{black_box, criterion_group, criterion_main, Criterion};
use minim::{evaluate_one, read_sexp, register_basis, Channels, CharSource, Environment};

fn read_one(text: &str) -> minim::Value {
    let mut src = CharSource::from_text(text);
    read_sexp(&mut src).unwrap().unwrap()
}

fn run(program: &str) -> minim::Value {
    let env = Environment::new();
    register_basis(&env);
    let mut io = Channels::new(CharSource::from_text(program), Box::new(std::io::sink()));
    let mut last = minim::Value::Nil;
    while let Some(value) = evaluate_one(&mut io, &env).unwrap() {
        last = value;
    }
    last
}

fn bench_read_small(c: &mut Criterion) {
    c.bench_function("read small expr", |b| {
        b.iter(|| black_box(read_one("(cons 1 2)")))
    });
}

fn bench_read_large_list(c: &mut Criterion) {
    let mut text = String::from("(");
    for i in 0..1000 {
        text.push_str(&i.to_string());
        text.push(' ');
    }
    text.push(')');
    c.bench_function("read large list (1000 elements)", |b| {
        b.iter(|| black_box(read_one(&text)))
    });
}

fn bench_eval_arithmetic(c: &mut Criterion) {
    c.bench_function("eval nested arithmetic", |b| {
        b.iter(|| black_box(run("(+ 1 (* 2 3) (- 10 4) (/ 20 5))")))
    });
}

fn bench_eval_recursive(c: &mut Criterion) {
    let program = "(define count (lambda (n) (if (= n 0) 'done (count (- n 1)))))
                   (count 200)";
    c.bench_function("eval recursive countdown", |b| {
        b.iter(|| black_box(run(program)))
    });
}

criterion_group!(
    benches,
    bench_read_small,
    bench_read_large_list,
    bench_eval_arithmetic,
    bench_eval_recursive
);
criterion_main!(benches);
