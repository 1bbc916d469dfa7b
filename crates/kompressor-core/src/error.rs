// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kompressor.

use thiserror::Error;

/// Top-level error type for all Kompressor operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // -- Lifecycle --
    #[error("{component} initialisation failed: {reason}")]
    Initialization {
        component: &'static str,
        reason: String,
    },

    #[error("{0} is not initialised; call initialize() first")]
    NotInitialized(&'static str),

    // -- Document input --
    #[error("structural read failed on page {page}: {reason}")]
    StructuralRead { page: usize, reason: String },

    #[error("document rejected: {0}")]
    Validation(String),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Scoring --
    #[error("inference failed in {model}: {reason}")]
    Inference { model: String, reason: String },

    // -- Pipeline --
    #[error("{stage} stage failed: {source}")]
    Processing {
        stage: &'static str,
        #[source]
        source: Box<EngineError>,
    },

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Wrap an error with the pipeline stage it escaped from.
    pub fn in_stage(stage: &'static str, source: EngineError) -> Self {
        Self::Processing {
            stage,
            source: Box::new(source),
        }
    }

    /// Shorthand for an inference error raised by a named model.
    pub fn inference(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inference {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, looking through any `Processing` wrappers.
    pub fn root_cause(&self) -> &EngineError {
        match self {
            Self::Processing { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_wrapper_keeps_cause() {
        let inner = EngineError::Validation("document has no pages".into());
        let wrapped = EngineError::in_stage("analysis", inner);

        assert!(wrapped.to_string().starts_with("analysis stage failed"));
        assert!(matches!(wrapped.root_cause(), EngineError::Validation(_)));
        assert!(std::error::Error::source(&wrapped).is_some());
    }

    #[test]
    fn nested_wrappers_unwind_to_root() {
        let err = EngineError::in_stage(
            "pipeline",
            EngineError::in_stage("presets", EngineError::NotInitialized("smart presets")),
        );
        assert!(matches!(
            err.root_cause(),
            EngineError::NotInitialized("smart presets")
        ));
    }
}
