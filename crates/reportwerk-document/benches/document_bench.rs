// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the raster capture path: page planning on its own,
// and full PDF assembly for a report three A4 pages tall.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use reportwerk_core::PaperSize;
use reportwerk_document::{PdfWriter, RasterLayout};

fn bench_layout(c: &mut Criterion) {
    c.bench_function("raster layout (1588x6738)", |b| {
        b.iter(|| {
            let layout = RasterLayout::plan(black_box(1588), black_box(6738), PaperSize::A4);
            black_box(layout)
        });
    });
}

/// A 420x1782 bitmap is exactly three A4 pages at 2 px/mm.
fn bench_pdf_assembly(c: &mut Criterion) {
    let bitmap = RgbaImage::from_fn(420, 1782, |x, y| {
        if (x / 20 + y / 20) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([30, 30, 30, 255])
        }
    });

    c.bench_function("raster PDF assembly (3 pages)", |b| {
        b.iter(|| {
            let result = PdfWriter::a4().create_from_bitmap(black_box(&bitmap));
            black_box(result)
        });
    });
}

criterion_group!(benches, bench_layout, bench_pdf_assembly);
criterion_main!(benches);
