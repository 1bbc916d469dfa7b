// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calibrated rule-based scoring backend.
//
// Each model is a small weighted combination over its feature vector. The
// feature layouts are the ones built by the components (see `features()` in
// each component module); indices below refer to those layouts. Every output
// is in [0, 1].

use std::sync::Arc;

use kompressor_core::error::{EngineError, Result};
use kompressor_core::unit;

use super::{ModelKind, ScoringBackend, ScoringModel};

/// Softmax sharpness for the preset classifier.
const CLASSIFIER_TEMPERATURE: f64 = 3.0;

/// Default backend: deterministic heuristics, always loadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBackend;

impl ScoringBackend for HeuristicBackend {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn load(&self, kind: ModelKind) -> Result<Arc<dyn ScoringModel>> {
        Ok(Arc::new(HeuristicModel { kind }))
    }
}

/// One heuristic model.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicModel {
    kind: ModelKind,
}

impl ScoringModel for HeuristicModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn infer(&self, f: &[f64]) -> Result<Vec<f64>> {
        if f.len() != self.kind.input_width() {
            return Err(EngineError::inference(
                self.kind.name(),
                format!("expected {} features, got {}", self.kind.input_width(), f.len()),
            ));
        }

        let out = match self.kind {
            ModelKind::TextClassifier => text_classifier(f),
            ModelKind::GraphicsAnalyzer => graphics_analyzer(f),
            ModelKind::CompressionPredictor => compression_predictor(f),
            ModelKind::SettingsOptimizer => settings_optimizer(f),
            ModelKind::OutcomePredictor => outcome_predictor(f),
            ModelKind::SizePredictor => size_predictor(f),
            ModelKind::QualityEstimator => quality_estimator(f),
            ModelKind::RiskClassifier => risk_classifier(f),
            ModelKind::PresetClassifier => return Ok(preset_classifier(f)),
            ModelKind::PresetMatcher => preset_matcher(f),
        };
        Ok(out.into_iter().map(unit).collect())
    }
}

// -- Content analysis ----------------------------------------------------------

/// `[text likelihood, complexity, readability]`
fn text_classifier(f: &[f64]) -> Vec<f64> {
    let density = f[0];
    let image_ratio = f[7];
    vec![
        density * (1.0 - 0.5 * image_ratio),
        0.2 + 0.55 * density + 0.15 * f[6] + 0.1 * f[3],
        0.55 + 0.4 * density - 0.2 * f[9] - 0.15 * image_ratio * (1.0 - density),
    ]
}

/// `[image compression potential, vector complexity, vector optimizability, image detail]`
fn graphics_analyzer(f: &[f64]) -> Vec<f64> {
    let has_images = f[0] > 0.0;
    let has_vectors = f[5] > 0.0;

    let potential = if has_images {
        0.55 + 0.25 * f[4] + 0.1 * f[3] + 0.1 * f[0]
    } else {
        0.1
    };
    let (complexity, optimizable) = if has_vectors {
        (0.1 + 0.5 * f[5] + 0.4 * f[6], 0.45 + 0.3 * f[6] + 0.2 * f[5])
    } else {
        (0.0, 0.0)
    };

    vec![
        potential,
        complexity,
        optimizable,
        0.3 + 0.5 * f[2] + 0.2 * (1.0 - f[4]),
    ]
}

/// `[level, quality retention, size reduction, confidence, preserve quality]`
fn compression_predictor(f: &[f64]) -> Vec<f64> {
    let level = unit(0.4 + 0.25 * f[6] + 0.15 * f[5] + 0.1 * f[12] - 0.1 * f[14]);
    vec![
        level,
        1.0 - 0.5 * level,
        0.2 + 0.35 * f[5] + 0.15 * f[12] + 0.1 * f[6],
        0.9 - 0.3 * f[13] - 0.08 * (f[0] - 0.5).abs(),
        0.2 + 0.6 * f[14] + 0.2 * (1.0 - f[11]),
    ]
}

// -- Settings -------------------------------------------------------------------

/// Twelve optimisation parameters, in settings-vector order.
fn settings_optimizer(f: &[f64]) -> Vec<f64> {
    let size_first = f[11];
    let aggressive = f[12];
    let readable = f[13];
    let potential = f[7];

    vec![
        // global compression
        0.2 + 0.3 * size_first + 0.15 * aggressive + 0.3 * f[14] - 0.1 * readable,
        // preserve quality
        0.8 - 0.5 * size_first + 0.2 * f[15] + 0.2 * readable - 0.2 * aggressive,
        // text compression
        0.35 + 0.4 * size_first + 0.1 * aggressive + 0.1 * f[2],
        // text optimise
        0.5 + 0.3 * f[3] + 0.1 * size_first - 0.2 * readable,
        // image quality
        0.95 - 0.45 * size_first - 0.15 * aggressive - 0.1 * potential + 0.1 * readable,
        // image downscale
        0.15 + 0.45 * size_first + 0.2 * aggressive + 0.2 * potential,
        // vector simplification
        0.1 + 0.4 * size_first + 0.15 * aggressive + 0.2 * f[10],
        // vector optimise
        0.3 + 0.5 * f[10] + 0.1 * size_first,
        // remove metadata
        0.45 + 0.4 * size_first + 0.1 * aggressive,
        // remove comments
        0.4 + 0.4 * size_first + 0.15 * aggressive,
        // remove unused resources
        0.6 + 0.3 * size_first + 0.1 * aggressive,
        // linearise
        0.3 + 0.4 * f[0] + 0.2 * f[5],
    ]
}

/// `[size reduction, quality loss, time factor, confidence]` from the
/// optimizer features plus the first five parameters.
fn outcome_predictor(f: &[f64]) -> Vec<f64> {
    let global = f[20];
    let preserve = f[21];
    let text_compression = f[22];
    let image_quality = f[24];
    let images_per_page = f[18];

    vec![
        0.08 + 0.4 * global + 0.2 * f[7] * (1.0 - image_quality) + 0.1 * text_compression,
        0.01 + 0.1 * global + 0.12 * (1.0 - image_quality) * images_per_page - 0.03 * preserve,
        0.2 + 0.3 * global + 0.2 * f[5],
        0.55 + 0.4 * f[17],
    ]
}

// -- Quality prediction ---------------------------------------------------------

/// `[reduction, confidence, images, text, vectors, metadata]`
fn size_predictor(f: &[f64]) -> Vec<f64> {
    let level = f[8];
    let image_ratio = f[4];
    let image_quality = f[9];

    vec![
        0.05 + 0.35 * level
            + 0.25 * image_ratio * (1.0 - image_quality)
            + 0.08 * f[11]
            + 0.05 * f[10]
            + 0.04 * f[13]
            + 0.04 * f[14],
        0.55 + 0.35 * f[17],
        image_ratio * (0.4 + 0.3 * (1.0 - image_quality)) + 0.05 * f[3],
        0.1 + 0.25 * f[2] * f[11],
        0.2 * f[6] * (0.5 + f[12]),
        0.02 + 0.06 * f[13] + 0.02 * f[14],
    ]
}

/// `[overall, visual, text, print, image, sharpness, vector, colour]`
fn quality_estimator(f: &[f64]) -> Vec<f64> {
    let image = unit(0.3 + 0.7 * f[9] - 0.1 * f[10]);
    let sharpness = unit(1.0 - 0.35 * f[12] - 0.05 * f[15] + 0.05 * f[14]);
    let vector = unit(1.0 - 0.6 * f[16] - 0.1 * (1.0 - f[17]));
    let color = unit(1.0 - 0.3 * f[7] + 0.05 * f[8]);

    let visual = 0.45 * image + 0.25 * sharpness + 0.15 * vector + 0.15 * color;
    let text = sharpness * (0.7 + 0.3 * f[2]);
    let print = 0.35 * image + 0.25 * f[11] + 0.2 * sharpness + 0.2 * vector;
    let overall = 0.35 * visual + 0.35 * text + 0.15 * print + 0.15 * color;

    vec![overall, visual, text, print, image, sharpness, vector, color]
}

/// `[risk, reversibility, structural, accessibility, searchability]`
fn risk_classifier(f: &[f64]) -> Vec<f64> {
    let level = f[0];
    vec![
        0.5 * f[16]
            + 0.25 * f[1]
            + 0.4 * (level - 0.5).max(0.0)
            + 0.15 * (1.0 - f[3]) * f[15]
            + 0.1 * (1.0 - f[11]),
        1.0 - 0.5 * f[7] - 0.2 * f[8] - 0.2 * f[9] - 0.2 * f[4] - 0.2 * f[6],
        0.3 + 0.2 * f[7] + 0.15 * f[8] + 0.15 * f[9] + 0.2 * f[10],
        1.0 - 0.2 * f[7] - 0.2 * f[5] + 0.1 * f[18],
        0.6 + 0.35 * f[13] - 0.15 * f[5],
    ]
}

// -- Presets --------------------------------------------------------------------

/// Category affinity in `PresetCategory::ALL` order, softmax-normalised.
fn preset_classifier(f: &[f64]) -> Vec<f64> {
    let logits = [
        // web
        1.0 * f[10] + 0.5 * f[3] + 0.3 * f[12],
        // print
        0.6 * f[14] + 0.3 * f[1] + 0.2 * (1.0 - f[13]),
        // archive
        1.2 * f[8] + 0.3 * f[9],
        // mobile
        0.6 * f[10] + 0.3 * f[4],
        // presentation
        1.0 * f[11] + 0.6 * f[5] + 0.2 * f[6],
        // document
        1.2 * f[0] * (1.0 - f[10]) + 0.3 * f[2],
    ];
    softmax(&logits, CLASSIFIER_TEMPERATURE)
}

/// `[match, quality fit, risk]`
fn preset_matcher(f: &[f64]) -> Vec<f64> {
    let preset_aggr = f[1];
    vec![
        0.3 + 0.2 * f[3] + 0.3 * f[4] + 0.15 * f[7] + 0.1 * f[10] + 0.05 * f[5] * preset_aggr
            - 0.1 * f[6] * preset_aggr,
        f[9] * (1.0 - 0.5 * f[2]),
        0.5 * preset_aggr + 0.5 * (1.0 - f[9]),
    ]
}

fn softmax(logits: &[f64], temperature: f64) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| ((l - max) * temperature).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
