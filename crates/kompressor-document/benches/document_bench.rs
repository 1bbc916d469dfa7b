// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the kompressor-document crate. Measures how long it
// takes to parse a synthetic multi-page PDF and to extract every page signal.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use kompressor_core::StructuralReader;
use kompressor_document::PdfSignalReader;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Build a PDF with `pages` pages, each holding 40 text runs, two image paints
/// and a handful of filled rectangles.
fn synthetic_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8, 255, 255, 0],
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
    ];
    for _ in 0..40 {
        operations.push(Operation::new("Tj", vec![Object::string_literal("benchmark line")]));
    }
    operations.push(Operation::new("ET", vec![]));
    for _ in 0..2 {
        operations.push(Operation::new("Do", vec!["Im1".into()]));
    }
    for i in 0..6 {
        operations.push(Operation::new("re", vec![i.into(), i.into(), 20.into(), 20.into()]));
        operations.push(Operation::new("f", vec![]));
    }
    let encoded = Content { operations }.encode().unwrap_or_default();

    let mut kids: Vec<Object> = Vec::with_capacity(pages);
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    let _ = doc.save_to(&mut output);
    output
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Parse a 20-page document into a reader.
fn bench_open(c: &mut Criterion) {
    let bytes = synthetic_pdf(20);

    c.bench_function("pdf_signal_reader_open (20 pages)", |b| {
        b.iter(|| {
            let reader = PdfSignalReader::from_bytes("bench.pdf", black_box(&bytes));
            black_box(reader.is_ok());
        });
    });
}

/// Extract signals for every page of an already-parsed document.
fn bench_page_signals(c: &mut Criterion) {
    let bytes = synthetic_pdf(20);
    let Ok(reader) = PdfSignalReader::from_bytes("bench.pdf", &bytes) else {
        return;
    };

    c.bench_function("page_signals (20 pages)", |b| {
        b.iter(|| {
            let total: usize = (0..reader.page_count())
                .filter_map(|idx| reader.page_signal(black_box(idx)).ok())
                .map(|s| s.text_item_count + s.image_paint_ops + s.vector_ops)
                .sum();
            black_box(total);
        });
    });
}

criterion_group!(benches, bench_open, bench_page_signals);
criterion_main!(benches);
