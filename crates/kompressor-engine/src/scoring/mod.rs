// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoring seam — every numeric judgement in the engine goes through a
// `ScoringModel` loaded from a pluggable `ScoringBackend`.
//
// A model maps a fixed-width feature vector to a fixed-width output vector.
// Components never call a model directly; they go through `ModelHandle`,
// which checks widths and finiteness on both sides so that a misbehaving
// backend surfaces as an `Inference` error and the stage falls back.

pub mod heuristic;

use std::sync::Arc;

use kompressor_core::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use heuristic::HeuristicBackend;

/// The ten scoring stages used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    TextClassifier,
    GraphicsAnalyzer,
    CompressionPredictor,
    SettingsOptimizer,
    OutcomePredictor,
    SizePredictor,
    QualityEstimator,
    RiskClassifier,
    PresetClassifier,
    PresetMatcher,
}

impl ModelKind {
    pub const ALL: [ModelKind; 10] = [
        Self::TextClassifier,
        Self::GraphicsAnalyzer,
        Self::CompressionPredictor,
        Self::SettingsOptimizer,
        Self::OutcomePredictor,
        Self::SizePredictor,
        Self::QualityEstimator,
        Self::RiskClassifier,
        Self::PresetClassifier,
        Self::PresetMatcher,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TextClassifier => "text_classifier",
            Self::GraphicsAnalyzer => "graphics_analyzer",
            Self::CompressionPredictor => "compression_predictor",
            Self::SettingsOptimizer => "settings_optimizer",
            Self::OutcomePredictor => "outcome_predictor",
            Self::SizePredictor => "size_predictor",
            Self::QualityEstimator => "quality_estimator",
            Self::RiskClassifier => "risk_classifier",
            Self::PresetClassifier => "preset_classifier",
            Self::PresetMatcher => "preset_matcher",
        }
    }

    /// Feature vector width.
    pub fn input_width(&self) -> usize {
        match self {
            Self::TextClassifier => 10,
            Self::GraphicsAnalyzer => 8,
            Self::CompressionPredictor => 15,
            Self::SettingsOptimizer => 20,
            Self::OutcomePredictor => 25,
            Self::SizePredictor => 18,
            Self::QualityEstimator => 22,
            Self::RiskClassifier => 20,
            Self::PresetClassifier => 16,
            Self::PresetMatcher => 20,
        }
    }

    /// Output vector width.
    pub fn output_width(&self) -> usize {
        match self {
            Self::TextClassifier => 3,
            Self::GraphicsAnalyzer => 4,
            Self::CompressionPredictor => 5,
            Self::SettingsOptimizer => 12,
            Self::OutcomePredictor => 4,
            Self::SizePredictor => 6,
            Self::QualityEstimator => 8,
            Self::RiskClassifier => 5,
            Self::PresetClassifier => 6,
            Self::PresetMatcher => 3,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A loaded scoring model.
pub trait ScoringModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Score one feature vector.
    fn infer(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Source of scoring models.
pub trait ScoringBackend: Send + Sync {
    /// Short backend name for logs and status reports.
    fn name(&self) -> &str {
        "custom"
    }

    fn load(&self, kind: ModelKind) -> Result<Arc<dyn ScoringModel>>;
}

/// A model bound to its expected shape.
#[derive(Clone)]
pub struct ModelHandle {
    kind: ModelKind,
    model: Arc<dyn ScoringModel>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle").field("kind", &self.kind).finish()
    }
}

impl ModelHandle {
    /// Load `kind` from `backend`. Any failure is an initialisation error for
    /// `component`.
    pub fn load(backend: &dyn ScoringBackend, kind: ModelKind, component: &'static str) -> Result<Self> {
        let model = backend.load(kind).map_err(|err| EngineError::Initialization {
            component,
            reason: format!("loading {kind} from {} backend: {err}", backend.name()),
        })?;
        if model.kind() != kind {
            return Err(EngineError::Initialization {
                component,
                reason: format!("backend returned {} when {kind} was requested", model.kind()),
            });
        }
        debug!(model = %kind, backend = backend.name(), "scoring model loaded");
        Ok(Self { kind, model })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Run the model with shape and finiteness checks on both sides.
    pub fn score(&self, features: &[f64]) -> Result<Vec<f64>> {
        let kind = self.kind;
        if features.len() != kind.input_width() {
            return Err(EngineError::inference(
                kind.name(),
                format!("expected {} features, got {}", kind.input_width(), features.len()),
            ));
        }
        if let Some(idx) = features.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::inference(
                kind.name(),
                format!("feature {idx} is not finite"),
            ));
        }

        let output = self.model.infer(features)?;

        if output.len() != kind.output_width() {
            return Err(EngineError::inference(
                kind.name(),
                format!("expected {} outputs, got {}", kind.output_width(), output.len()),
            ));
        }
        if let Some(idx) = output.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::inference(
                kind.name(),
                format!("output {idx} is not finite"),
            ));
        }
        Ok(output)
    }
}
