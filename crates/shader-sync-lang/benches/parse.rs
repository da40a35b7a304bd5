use criterion::{Criterion, black_box, criterion_group, criterion_main};
use shader_sync_lang::{ParseOptions, RecognizerSet, parse};

fn synthetic_shader(declaration_count: usize) -> String {
    let mut out = String::with_capacity(declaration_count * 96);
    out.push_str("#version 450 core\n");
    for i in 0..declaration_count {
        out.push_str(&format!("uniform float param_{i};\n"));
    }
    out.push_str("void main() {\n");
    for i in 0..declaration_count {
        out.push_str(&format!(
            "    float value_{i} = param_{i} * 2.0; /* scaled */\n"
        ));
    }
    out.push_str("}\n");
    out
}

fn bench_full_parse(c: &mut Criterion) {
    let recognizers = RecognizerSet::new();
    let text = synthetic_shader(500);
    c.bench_function("parse/500_declarations", |b| {
        b.iter(|| {
            let tree = parse(black_box(&text), &recognizers, ParseOptions::default());
            black_box(tree.statement_count());
        })
    });
}

fn bench_indentation_only(c: &mut Criterion) {
    let recognizers = RecognizerSet::new();
    let text = synthetic_shader(500);
    let options = ParseOptions {
        indentation_only: true,
    };
    c.bench_function("parse/500_declarations_indentation_only", |b| {
        b.iter(|| {
            let tree = parse(black_box(&text), &recognizers, options);
            black_box(tree.statement_count());
        })
    });
}

criterion_group!(benches, bench_full_parse, bench_indentation_only);
criterion_main!(benches);
