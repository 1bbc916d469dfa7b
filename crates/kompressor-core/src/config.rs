// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, Result};

/// Weights of the four stage scores in the aggregated confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub analysis: f64,
    pub settings: f64,
    pub prediction: f64,
    pub preset: f64,
}

impl ConfidenceWeights {
    pub fn total(&self) -> f64 {
        self.analysis + self.settings + self.prediction + self.preset
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            analysis: 0.25,
            settings: 0.25,
            prediction: 0.30,
            preset: 0.20,
        }
    }
}

/// How many entries of each list the UI summary keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLimits {
    pub max_recommendations: usize,
    pub max_warnings: usize,
    pub max_insights: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_recommendations: 5,
            max_warnings: 3,
            max_insights: 4,
        }
    }
}

/// Recommendation engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initialise lazily on the first `process_file` / `quick_analysis` call.
    pub auto_initialize: bool,
    /// Load scoring models for the content analyzer.
    pub enable_analyzer: bool,
    /// Load scoring models for the settings optimizer.
    pub enable_optimizer: bool,
    /// Load scoring models for the quality predictor.
    pub enable_quality_predictor: bool,
    /// Load scoring models for the preset generator.
    pub enable_smart_presets: bool,
    /// Weights for the aggregated pipeline confidence.
    pub confidence_weights: ConfidenceWeights,
    /// List lengths kept in the UI summary.
    pub summary: SummaryLimits,
    /// Runner-up presets returned with a recommendation.
    pub max_alternatives: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_initialize: true,
            enable_analyzer: true,
            enable_optimizer: true,
            enable_quality_predictor: true,
            enable_smart_presets: true,
            confidence_weights: ConfidenceWeights::default(),
            summary: SummaryLimits::default(),
            max_alternatives: 3,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "engine config saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.confidence_weights;
        if [w.analysis, w.settings, w.prediction, w.preset]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(EngineError::Config(
                "confidence weights must be finite and non-negative".into(),
            ));
        }
        if (w.total() - 1.0).abs() > 1e-6 {
            return Err(EngineError::Config(format!(
                "confidence weights must sum to 1.0, got {:.4}",
                w.total()
            )));
        }
        let s = &self.summary;
        if s.max_recommendations == 0 || s.max_warnings == 0 || s.max_insights == 0 {
            return Err(EngineError::Config("summary limits must be at least 1".into()));
        }
        if self.max_alternatives == 0 {
            return Err(EngineError::Config("max_alternatives must be at least 1".into()));
        }
        Ok(())
    }
}
