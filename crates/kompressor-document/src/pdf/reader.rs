// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF signal reader — opens a PDF with `lopdf` and derives per-page structural
// signals from each page's content stream and XObject resources.

use std::collections::HashSet;
use std::path::Path;

use kompressor_core::error::EngineError;
use kompressor_core::{DocumentType, PageSignal, StructuralReader};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use super::signal::classify_operations;

/// Resource inheritance is walked at most this many `/Parent` levels up.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Structural reader over a parsed PDF.
pub struct PdfSignalReader {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
    /// Size of the source file in bytes.
    total_size: u64,
    /// Display name (file name or caller-supplied label).
    name: String,
}

impl PdfSignalReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let total_size = std::fs::metadata(path_ref)?.len();
        let document = Document::load(path_ref).map_err(|err| {
            EngineError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        let name = path_ref
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_ref.display().to_string());

        Ok(Self::from_document(document, total_size, name))
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self, EngineError> {
        let document = Document::load_mem(data).map_err(|err| {
            EngineError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        Ok(Self::from_document(document, data.len() as u64, name.into()))
    }

    fn from_document(document: Document, total_size: u64, name: String) -> Self {
        // lopdf pages are keyed by 1-indexed page number; BTreeMap keeps them ordered.
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), total_size, "PDF loaded");

        Self {
            document,
            page_ids,
            total_size,
            name,
        }
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, page_index: usize) -> Result<ObjectId, EngineError> {
        self.page_ids
            .get(page_index)
            .copied()
            .ok_or_else(|| EngineError::StructuralRead {
                page: page_index,
                reason: format!(
                    "page out of range (document has {} pages)",
                    self.page_ids.len()
                ),
            })
    }

    /// Names of image XObjects reachable from the page's (possibly inherited)
    /// resource dictionary.
    fn image_xobject_names(&self, page_id: ObjectId) -> HashSet<Vec<u8>> {
        let mut names = HashSet::new();

        let Some(resources) = self.page_resources(page_id) else {
            return names;
        };
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
        else {
            return names;
        };

        for (name, value) in xobjects.iter() {
            let stream_dict = match self.resolve(value) {
                Some(Object::Stream(stream)) => &stream.dict,
                _ => continue,
            };
            if let Ok(Object::Name(subtype)) = stream_dict.get(b"Subtype") {
                if subtype.as_slice() == b"Image" {
                    names.insert(name.clone());
                }
            }
        }

        names
    }

    /// The page's `/Resources`, walking up `/Parent` for inherited resources.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.document.get_object(page_id).ok()?.as_dict().ok()?;

        for _ in 0..MAX_PAGE_TREE_DEPTH {
            if let Ok(resources) = node.get(b"Resources") {
                return self.resolve_dict(resources);
            }
            node = self.resolve_dict(node.get(b"Parent").ok()?)?;
        }

        None
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(object)? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl StructuralReader for PdfSignalReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn document_type(&self) -> DocumentType {
        DocumentType::Pdf
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn page_signal(&self, page_index: usize) -> Result<PageSignal, EngineError> {
        let page_id = self.page_id(page_index)?;

        let raw = self
            .document
            .get_page_content(page_id)
            .map_err(|err| EngineError::StructuralRead {
                page: page_index,
                reason: format!("cannot read content stream: {}", err),
            })?;
        let content = Content::decode(&raw).map_err(|err| EngineError::StructuralRead {
            page: page_index,
            reason: format!("cannot decode content stream: {}", err),
        })?;

        let images = self.image_xobject_names(page_id);
        let signal = classify_operations(&content.operations, &images);
        debug!(page_index, ?signal, "page signal extracted");
        Ok(signal)
    }
}
