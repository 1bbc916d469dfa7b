// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural reader contract — the upstream collaborator that exposes a
// document's page count, byte size and per-page primitive counts. The engine
// never touches document bytes; it only consumes these signals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::DocumentType;

/// Raw primitive counts for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSignal {
    /// Text items (show-text runs) on the page.
    pub text_item_count: usize,
    /// Image paint operators.
    pub image_paint_ops: usize,
    /// Path construction / painting operators.
    pub vector_ops: usize,
}

/// Read-only structural view of a document.
///
/// Implementations must be cheap to query repeatedly; `page_signal` may fail
/// for individual pages without invalidating the rest of the document.
pub trait StructuralReader: Send + Sync {
    /// Display name used in logs.
    fn name(&self) -> &str {
        "document"
    }

    fn document_type(&self) -> DocumentType {
        DocumentType::Pdf
    }

    fn page_count(&self) -> usize;

    fn total_size(&self) -> u64;

    /// Signal for the page at `page_index` (0-based).
    fn page_signal(&self, page_index: usize) -> Result<PageSignal>;
}

/// A document described directly by its per-page signals.
///
/// Used when the caller already extracted structure elsewhere, and in tests.
#[derive(Debug, Clone)]
pub struct SignalDocument {
    name: String,
    document_type: DocumentType,
    total_size: u64,
    pages: Vec<std::result::Result<PageSignal, String>>,
}

impl SignalDocument {
    pub fn new(name: impl Into<String>, total_size: u64) -> Self {
        Self {
            name: name.into(),
            document_type: DocumentType::Pdf,
            total_size,
            pages: Vec::new(),
        }
    }

    /// `page_count` identical pages.
    pub fn uniform(name: impl Into<String>, total_size: u64, page_count: usize, signal: PageSignal) -> Self {
        let mut doc = Self::new(name, total_size);
        doc.pages = vec![Ok(signal); page_count];
        doc
    }

    pub fn with_page(mut self, signal: PageSignal) -> Self {
        self.pages.push(Ok(signal));
        self
    }

    /// Append a page whose signal cannot be read.
    pub fn with_unreadable_page(mut self, reason: impl Into<String>) -> Self {
        self.pages.push(Err(reason.into()));
        self
    }

    pub fn with_document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }
}

impl StructuralReader for SignalDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn document_type(&self) -> DocumentType {
        self.document_type
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn page_signal(&self, page_index: usize) -> Result<PageSignal> {
        match self.pages.get(page_index) {
            Some(Ok(signal)) => Ok(*signal),
            Some(Err(reason)) => {
                debug!(page_index, %reason, "page marked unreadable");
                Err(EngineError::StructuralRead {
                    page: page_index,
                    reason: reason.clone(),
                })
            }
            None => Err(EngineError::StructuralRead {
                page: page_index,
                reason: format!("page out of range (document has {} pages)", self.pages.len()),
            }),
        }
    }
}
