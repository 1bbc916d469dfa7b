// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kompressor engine — content-adaptive PDF compression recommendations.
//
// `Engine` runs four components in sequence: content analysis, settings
// optimisation, quality prediction and smart preset ranking. Each component
// scores through a pluggable `ScoringBackend` and falls back to closed-form
// rules when scoring is disabled or fails.

pub mod analyzer;
pub mod engine;
pub mod format;
pub mod optimizer;
pub mod predictor;
pub mod presets;
pub mod scoring;

pub use analyzer::ContentAnalyzer;
pub use engine::{
    ComponentStatus, Engine, EngineStatus, PresetComparison, ProcessingMetrics, ProcessingResult,
    QuickSummary, UiSummary,
};
pub use optimizer::SettingsOptimizer;
pub use predictor::QualityPredictor;
pub use presets::PresetGenerator;
pub use scoring::{HeuristicBackend, ModelKind, ScoringBackend, ScoringModel};
