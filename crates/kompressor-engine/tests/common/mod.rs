// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use kompressor_core::error::{EngineError, Result};
use kompressor_core::{PageSignal, SignalDocument};
use kompressor_engine::{HeuristicBackend, ModelKind, ScoringBackend, ScoringModel};

/// One page memo, mostly text.
pub fn text_memo() -> SignalDocument {
    SignalDocument::uniform(
        "memo.pdf",
        50_000,
        1,
        PageSignal {
            text_item_count: 90,
            image_paint_ops: 0,
            vector_ops: 0,
        },
    )
}

/// 100 pages, 150 images, 40 MB.
pub fn image_catalogue() -> SignalDocument {
    let mut doc = SignalDocument::new("catalogue.pdf", 40_000_000);
    for page in 0..100 {
        doc = doc.with_page(PageSignal {
            text_item_count: 20,
            image_paint_ops: if page % 2 == 0 { 2 } else { 1 },
            vector_ops: 2,
        });
    }
    doc
}

/// Long text report with a few diagrams.
pub fn long_report(pages: usize) -> SignalDocument {
    SignalDocument::uniform(
        "report.pdf",
        pages as u64 * 40_000,
        pages,
        PageSignal {
            text_item_count: 80,
            image_paint_ops: 0,
            vector_ops: 5,
        },
    )
}

struct BrokenModel(ModelKind);

impl ScoringModel for BrokenModel {
    fn kind(&self) -> ModelKind {
        self.0
    }

    fn infer(&self, _features: &[f64]) -> Result<Vec<f64>> {
        Err(EngineError::inference(self.0.name(), "injected failure"))
    }
}

/// Heuristic backend with `failing` models replaced by ones that always error.
pub struct FaultyBackend {
    pub failing: Vec<ModelKind>,
}

impl ScoringBackend for FaultyBackend {
    fn name(&self) -> &str {
        "faulty"
    }

    fn load(&self, kind: ModelKind) -> Result<Arc<dyn ScoringModel>> {
        if self.failing.contains(&kind) {
            Ok(Arc::new(BrokenModel(kind)))
        } else {
            HeuristicBackend.load(kind)
        }
    }
}

/// Backend returning models of the wrong output width for `kind`.
pub struct MisshapenBackend {
    pub kind: ModelKind,
}

struct WideModel(ModelKind);

impl ScoringModel for WideModel {
    fn kind(&self) -> ModelKind {
        self.0
    }

    fn infer(&self, _features: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![0.5; self.0.output_width() + 1])
    }
}

impl ScoringBackend for MisshapenBackend {
    fn load(&self, kind: ModelKind) -> Result<Arc<dyn ScoringModel>> {
        if kind == self.kind {
            Ok(Arc::new(WideModel(kind)))
        } else {
            HeuristicBackend.load(kind)
        }
    }
}
