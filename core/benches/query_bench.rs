use boolsearch_core::{compile, evaluate, Index};
use criterion::{criterion_group, criterion_main, Criterion};

fn corpus() -> Vec<String> {
    (0..2_000)
        .map(|i| format!("d{i}\tterm{} title{}\tbody{} body{} common", i % 7, i % 13, i % 17, i % 31))
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let index = Index::build(corpus()).expect("valid corpus");
    let query = "common (term1|term3) body5|title2 (body7|body11)";
    c.bench_function("compile", |b| b.iter(|| compile(query)));
    let program = compile(query).expect("valid query");
    c.bench_function("evaluate", |b| b.iter(|| evaluate(&program, &index)));
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
