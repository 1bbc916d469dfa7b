// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kompressor-document — Structural signal extraction for Kompressor.
//
// Reads PDF page trees and content streams with `lopdf` and reports, per page,
// how many text runs, image paints and vector paints it contains. The engine
// consumes these counts through `kompressor_core::StructuralReader`.

pub mod pdf;

pub use pdf::reader::PdfSignalReader;
