use criterion::{Criterion, criterion_group, criterion_main};
use cursorctx_core::{classify, cursor};
use std::hint::black_box;

// A large file of ordinary functions, with the cursor on a selector at the end
fn build_large_file(n_funcs: usize) -> String {
    let mut src = String::from("package main\n\nimport (\n\t\"fmt\"\n\t\"strings\"\n)\n\n");
    for i in 0..n_funcs {
        src.push_str(&format!(
            "func f{i}(s string) string {{\n\tp := Point{{X: {i}, Y: {i}}}\n\treturn strings.ToUpper(fmt.Sprint(p, s))\n}}\n\n"
        ));
    }
    src.push_str("func main() {\n\tx := strings.Repeat(\"a\", 3).");
    src
}

// One giant literal whose closers must all be balanced on the way back
fn build_deep_nesting(depth: usize) -> String {
    format!("x := {}v{}.", "f(".repeat(depth), ")".repeat(depth))
}

fn bench_classify(c: &mut Criterion) {
    let large = build_large_file(2_000);
    c.bench_function("classify_end_of_large_file", |b| {
        b.iter(|| classify(black_box(&large), black_box(large.len())))
    });

    let deep = build_deep_nesting(5_000);
    c.bench_function("classify_deep_nesting", |b| {
        b.iter(|| classify(black_box(&deep), black_box(deep.len())))
    });

    c.bench_function("scan_tokens_large_file", |b| {
        b.iter(|| cursor::TokenIterator::scan(black_box(&large), black_box(large.len())))
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
