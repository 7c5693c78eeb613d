//! Lexer Benchmarks
//!
//! Benchmarks for the lexical analyzer.
//! Run with: `cargo bench --package rillc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rillc_lex::Lexer;

fn lexer_token_count(source: &str) -> usize {
    // Lexer implements Iterator, so we can use it directly
    Lexer::new(source).count()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "let x = 42; func main() { let y = x + 1; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    // Complex source code exercising every operator tier
    let source = r#"
        extern func print(n);

        func fibonacci(n) {
            if (n <= 1) {
                return n;
            }
            return fibonacci(n - 1) + fibonacci(n - 2);
        }

        func main() {
            let total = 0;
            repeat(10) {
                total = total + 1;
            }
            while (total > 0 && total != 3) {
                total = total - 1;
            }
            total |> print(0);
            return (5) |> ((x) => x * 2 + 1);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let very_long_variable_name = 42;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "let a = 1; let b = 2; let c = 3; let d = 4; let e = 5;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_identifiers
);
criterion_main!(benches);
