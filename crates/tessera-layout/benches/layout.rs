//! Benchmarks for flex layout and text wrapping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_layout::{soft_wrap, Flex, FlexDirection, FlexItem, FlexJustify};

fn bench_flex(c: &mut Criterion) {
    let mut group = c.benchmark_group("flex");

    for n in [4usize, 32, 256] {
        let items: Vec<FlexItem> = (0..n)
            .map(|i| {
                if i % 3 == 0 {
                    FlexItem::new()
                } else {
                    FlexItem::new().width(2)
                }
            })
            .collect();

        for justify in [FlexJustify::Stretch, FlexJustify::SpaceBetween] {
            let flex = Flex::new().justify(justify).basis(1);
            group.bench_with_input(
                BenchmarkId::new(format!("{justify:?}"), n),
                &items,
                |b, items| b.iter(|| flex.layout(black_box(1000), black_box(40), items)),
            );
        }
    }

    let column = Flex::new().direction(FlexDirection::Column);
    let items = vec![FlexItem::new().height(1); 64];
    group.bench_function("column_64", |b| {
        b.iter(|| column.layout(black_box(80), black_box(64), &items));
    });

    group.finish();
}

fn bench_wrap(c: &mut Criterion) {
    let text = "lorem ipsum dolor sit amet ".repeat(200);
    c.bench_function("soft_wrap_80", |b| b.iter(|| soft_wrap(black_box(&text), 80)));
}

criterion_group!(benches, bench_flex, bench_wrap);
criterion_main!(benches);
