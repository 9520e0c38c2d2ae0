//! Tokenizer Benchmarks
//!
//! Run with: `cargo bench --package lexm-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lexm_lex::token::keyname::KeynameToken;
use lexm_lex::token::literal::{CharToken, StringToken};
use lexm_lex::token::numeric::NumericToken;
use lexm_lex::{extract, generate, token_ref, Scanner, TokenSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn statement_set() -> TokenSet {
    let mut set = TokenSet::new([
        token_ref(StringToken::new("let")),
        token_ref(StringToken::new("loop")),
        token_ref(KeynameToken),
        token_ref(NumericToken::default()),
    ]);
    for c in "=+-*/;(){}".chars() {
        set.push(token_ref(CharToken::new(c)));
    }
    set
}

fn lexeme_count(syntax: &TokenSet, source: &str) -> usize {
    Scanner::new(syntax).scan(source).len()
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    let syntax = statement_set();

    let source = "let total = 0x1F + 3.5e2; loop { total = total - 1; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| lexeme_count(&syntax, black_box("let x = 42;")))
    });

    group.bench_function("statements", |b| {
        b.iter(|| lexeme_count(&syntax, black_box(source)))
    });

    group.finish();
}

fn bench_large_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_large");
    let syntax = statement_set();

    let source: String = (0..500)
        .map(|i| format!("let v{i} = {i} * 0b1010 + {i}.25e-1;\n"))
        .collect();
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("generated_lines", |b| {
        b.iter(|| lexeme_count(&syntax, black_box(&source)))
    });

    group.finish();
}

fn bench_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric");
    let token = Arc::new(NumericToken::default());

    for literal in ["42", "0x7fff'ffffu", "-1.5e-3d", "077ll"] {
        group.bench_function(literal, |b| b.iter(|| extract(&token, black_box(literal))));
    }

    group.bench_function("generate", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| generate(&token, None, 1, 16, &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_scanner, bench_large_source, bench_numeric);
criterion_main!(benches);
