// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the recommendation engine. Compares the
// analysis-only quick path against the full pipeline, with and without
// scoring models.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use kompressor_core::{EngineConfig, PageSignal, SignalDocument, UserPreferences};
use kompressor_engine::Engine;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Mixed document: text on every page, an image every other page.
fn mixed_document(pages: usize) -> SignalDocument {
    (0..pages).fold(
        SignalDocument::new("bench.pdf", pages as u64 * 120_000),
        |doc, page| {
            doc.with_page(PageSignal {
                text_item_count: 60,
                image_paint_ops: page % 2,
                vector_ops: 8,
            })
        },
    )
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap_or_else(|e| panic!("tokio runtime: {e}"))
}

fn ready_engine(rt: &Runtime, config: EngineConfig) -> Engine {
    rt.block_on(async {
        let engine = Engine::new(config).unwrap_or_else(|e| panic!("engine config: {e}"));
        engine
            .initialize()
            .await
            .unwrap_or_else(|e| panic!("engine init: {e}"));
        engine
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_quick_vs_full(c: &mut Criterion) {
    let rt = runtime();
    let engine = ready_engine(&rt, EngineConfig::default());
    let prefs = UserPreferences::default();

    let mut group = c.benchmark_group("pipeline");
    for pages in [10usize, 100, 500] {
        let doc = mixed_document(pages);
        group.bench_with_input(BenchmarkId::new("quick_analysis", pages), &doc, |b, doc| {
            b.iter(|| rt.block_on(engine.quick_analysis(black_box(doc))))
        });
        group.bench_with_input(BenchmarkId::new("process_file", pages), &doc, |b, doc| {
            b.iter(|| rt.block_on(engine.process_file(black_box(doc), &prefs)))
        });
    }
    group.finish();
}

fn bench_rule_based(c: &mut Criterion) {
    let rt = runtime();
    let engine = ready_engine(
        &rt,
        EngineConfig {
            enable_analyzer: false,
            enable_optimizer: false,
            enable_quality_predictor: false,
            enable_smart_presets: false,
            ..EngineConfig::default()
        },
    );
    let prefs = UserPreferences::default();
    let doc = mixed_document(100);

    c.bench_function("process_file_rule_based_100", |b| {
        b.iter(|| rt.block_on(engine.process_file(black_box(&doc), &prefs)))
    });
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

fn benches(c: &mut Criterion) {
    init_tracing();
    bench_quick_vs_full(c);
    bench_rule_based(c);
}

criterion_group!(engine_benches, benches);
criterion_main!(engine_benches);
