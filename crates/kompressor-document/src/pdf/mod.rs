// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page-level structural signals.

pub mod reader;
pub mod signal;

pub use reader::PdfSignalReader;
