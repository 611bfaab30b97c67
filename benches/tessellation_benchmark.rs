use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gerber_writer::font::flatten_glyph;
use gerber_writer::testing::test_font;
use gerber_writer::{FlattenOptions, GerberLayer, Position, TextOptions, TextPrimitive};

fn flatten_benchmark(c: &mut Criterion) {
    let font = test_font();
    let glyph = font.glyph("O").unwrap();
    let options = FlattenOptions::default();

    c.bench_function("flatten glyph O", |b| {
        b.iter(|| flatten_glyph(black_box(glyph), black_box(&options)))
    });
}

fn text_benchmark(c: &mut Criterion) {
    let font = Arc::new(test_font());
    let mut layer = GerberLayer::new("bench.gto");
    for row in 0..10 {
        layer.add(TextPrimitive::new(
            Position::new(0.0, row as f64 * 5.0),
            1.0,
            "OIOIOIOIOI",
            font.clone(),
            10.0,
            TextOptions::default(),
        ));
    }

    c.bench_function("write text layer", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(1 << 20);
            layer.write_gerber(&mut buffer).unwrap();
            black_box(buffer)
        })
    });
}

criterion_group!(benches, flatten_benchmark, text_benchmark);
criterion_main!(benches);
