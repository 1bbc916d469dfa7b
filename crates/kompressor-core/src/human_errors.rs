// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the compression assistant UI.
//
// `humanize_error` turns any `EngineError` into a heading, a next step and a
// severity the UI can style.

use crate::error::EngineError;

/// How the UI should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary condition; trying again may succeed.
    Transient,
    /// User must do something (pick another file, fix a setting).
    ActionRequired,
    /// Cannot be fixed by retrying, e.g. a wrong format or a broken install.
    Permanent,
}

/// Display form of an `EngineError`.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line heading.
    pub message: String,
    /// Next step for the user.
    pub suggestion: String,
    /// Whether repeating the same call can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `EngineError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &EngineError) -> HumanError {
    match err {
        // -- Lifecycle --
        EngineError::Initialization { component, .. } => HumanError {
            message: "The compression assistant couldn't start.".into(),
            suggestion: format!(
                "Reload the page and try again. If this keeps happening, smart recommendations may be unavailable on this device. ({component})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        EngineError::NotInitialized(_) => HumanError {
            message: "The compression assistant isn't ready yet.".into(),
            suggestion: "Wait a moment for it to finish loading, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Document input --
        EngineError::Validation(detail) => HumanError {
            message: "This document can't be analysed.".into(),
            suggestion: format!("Make sure the file isn't empty and has at least one page. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EngineError::UnsupportedDocument(detail) => HumanError {
            message: "Only PDF documents can get compression recommendations.".into(),
            suggestion: format!("Export or print the file to PDF and try again. (Received: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        EngineError::Pdf(_) => HumanError {
            message: "This PDF couldn't be opened for analysis.".into(),
            suggestion: "The file may be damaged or encrypted. Re-save it from a PDF viewer and analyse the copy.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // Recovered internally; only reaches the UI if something bypasses the fallbacks.
        EngineError::StructuralRead { page, .. } => HumanError {
            message: format!("Page {} couldn't be read.", page + 1),
            suggestion: "The rest of the document was still analysed. Results may be less precise.".into(),
            retriable: false,
            severity: Severity::Transient,
        },

        EngineError::Inference { .. } => HumanError {
            message: "Smart analysis wasn't available for this document.".into(),
            suggestion: "Standard settings were used instead. You can still compress the file.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Pipeline --
        EngineError::Processing { source, .. } => humanize_error(source),

        // -- Configuration / persistence --
        EngineError::Config(detail) => HumanError {
            message: "The assistant settings are invalid.".into(),
            suggestion: format!("Reset the settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EngineError::Io(io_err) => {
            use std::io::ErrorKind;
            match io_err.kind() {
                ErrorKind::NotFound => HumanError {
                    message: "The PDF is no longer where it was selected from.".into(),
                    suggestion: "Pick the document again from its new location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                },
                ErrorKind::PermissionDenied => HumanError {
                    message: "Kompressor isn't allowed to read this PDF.".into(),
                    suggestion: "Grant read access to the document, or copy it somewhere readable and analyse the copy.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                },
                _ => HumanError {
                    message: "Reading the document or settings file failed.".into(),
                    suggestion: "Retry the analysis. Repeated failures usually mean the disk is full or the file is on a disconnected drive.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                },
            }
        }

        EngineError::Serialization(_) => HumanError {
            message: "A recommendation couldn't be saved or loaded.".into(),
            suggestion: "Retry; if the settings file was edited by hand, restore it from a backup.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_action_required() {
        let advice = humanize_error(&EngineError::Validation("report.pdf has no pages".into()));
        assert_eq!(advice.severity, Severity::ActionRequired);
        assert!(!advice.retriable);
    }

    #[test]
    fn not_initialized_is_transient() {
        let advice = humanize_error(&EngineError::NotInitialized("content analyzer"));
        assert_eq!(advice.severity, Severity::Transient);
        assert!(advice.retriable);
    }

    #[test]
    fn wrapped_error_uses_root_message() {
        let err = EngineError::in_stage(
            "analysis",
            EngineError::UnsupportedDocument("image/png".into()),
        );
        let advice = humanize_error(&err);
        assert_eq!(advice.severity, Severity::Permanent);
        assert!(advice.suggestion.contains("image/png"));
    }

    #[test]
    fn page_numbers_are_one_based() {
        let err = EngineError::StructuralRead {
            page: 0,
            reason: "bad stream".into(),
        };
        assert!(humanize_error(&err).message.contains("Page 1"));
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = EngineError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
