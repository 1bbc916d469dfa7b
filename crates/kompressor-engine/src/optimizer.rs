// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings optimizer — turns a content analysis and the user's intent into a
// concrete `CompressionSettings` bundle.
//
// Scoring runs in two passes: the first produces twelve optimisation
// parameters, the second predicts the outcome from the features plus the
// leading parameters. Insights are a rule layer over the finished settings.

use kompressor_core::error::{EngineError, Result};
use kompressor_core::settings::{
    GlobalSettings, ImageSettings, SettingsInsights, SettingsPredictions, StructuralSettings,
    TextSettings, VectorSettings,
};
use kompressor_core::{
    CompressionSettings, ContentAnalysis, ImageFormat, Priority, RiskLevel, UserPreferences,
    bounded, unit,
};
use tracing::{debug, info, instrument, warn};

use crate::scoring::{ModelHandle, ModelKind, ScoringBackend};

pub const COMPONENT: &str = "settings optimizer";

/// Quality loss (percent) above which the risk tier is high.
const HIGH_RISK_LOSS_PCT: f64 = 15.0;
/// Quality loss (percent) above which the risk tier is medium.
const MEDIUM_RISK_LOSS_PCT: f64 = 8.0;

/// Parameters from the first pass that also feed the outcome pass.
const OUTCOME_PARAMS: usize = 5;

struct OptimizerModels {
    settings: ModelHandle,
    outcome: ModelHandle,
}

/// Derives per-content-type compression settings.
pub struct SettingsOptimizer {
    enabled: bool,
    initialized: bool,
    models: Option<OptimizerModels>,
}

impl SettingsOptimizer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            initialized: false,
            models: None,
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    pub async fn initialize(&mut self, backend: &dyn ScoringBackend) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        if self.enabled {
            self.models = Some(OptimizerModels {
                settings: ModelHandle::load(backend, ModelKind::SettingsOptimizer, COMPONENT)?,
                outcome: ModelHandle::load(backend, ModelKind::OutcomePredictor, COMPONENT)?,
            });
        }
        self.initialized = true;
        info!(models = self.models.is_some(), "settings optimizer initialised");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn has_models(&self) -> bool {
        self.models.is_some()
    }

    pub fn dispose(&mut self) {
        self.models = None;
        self.initialized = false;
        debug!("settings optimizer disposed");
    }

    // -- Generation -----------------------------------------------------------

    #[instrument(skip_all, fields(priority = preferences.priority.as_str()))]
    pub fn generate(
        &self,
        analysis: &ContentAnalysis,
        preferences: &UserPreferences,
    ) -> Result<CompressionSettings> {
        if !self.initialized {
            return Err(EngineError::NotInitialized(COMPONENT));
        }

        let settings = match self.models.as_ref().map(|m| scored(m, analysis, preferences)) {
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                warn!(error = %err, "settings scoring failed, using priority-based settings");
                fallback(analysis, preferences)
            }
            None => fallback(analysis, preferences),
        };

        debug!(
            level = settings.global.compression_level,
            reduction = settings.predictions.expected_size_reduction_pct,
            risk = settings.insights.risk_level.as_str(),
            "settings generated"
        );
        Ok(settings)
    }
}

// -- Feature vectors ---------------------------------------------------------------

fn features(analysis: &ContentAnalysis, preferences: &UserPreferences) -> Vec<f64> {
    let rec = &analysis.recommendation;
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    vec![
        unit(analysis.page_count as f64 / 100.0),
        unit(analysis.total_file_size_bytes as f64 / 10_000_000.0),
        analysis.text.density,
        analysis.text.complexity,
        analysis.text.readability,
        unit(analysis.images.count as f64 / 20.0),
        unit(analysis.images.total_size_bytes as f64 / 5_000_000.0),
        analysis.images.compression_potential,
        unit(analysis.vectors.count as f64 / 50.0),
        analysis.vectors.complexity,
        analysis.vectors.optimizable,
        preferences.priority.encode(),
        flag(preferences.aggressive_mode),
        flag(preferences.preserve_readability),
        rec.optimal_compression_level,
        flag(rec.preserve_quality),
        unit(rec.estimated_size_reduction_pct / 100.0),
        rec.confidence_score,
        unit(analysis.images_per_page() / 5.0),
        analysis.text.density * analysis.text.complexity,
    ]
}

// -- Scoring paths -----------------------------------------------------------------

fn scored(
    models: &OptimizerModels,
    analysis: &ContentAnalysis,
    preferences: &UserPreferences,
) -> Result<CompressionSettings> {
    let base = features(analysis, preferences);
    let params = models.settings.score(&base)?;

    let mut outcome_features = base;
    outcome_features.extend_from_slice(&params[..OUTCOME_PARAMS]);
    let outcome = models.outcome.score(&outcome_features)?;

    let pages = analysis.page_count as f64;
    let complexity = analysis.text.complexity;
    let simplification = bounded(params[6], 0.0, 0.8);
    let downscale_signal = params[5];

    let mut settings = CompressionSettings {
        global: GlobalSettings {
            compression_level: bounded(params[0], 0.1, 0.95),
            preserve_quality: params[1] > 0.5,
            aggressive_mode: preferences.aggressive_mode,
        },
        text: TextSettings {
            font_subsetting: complexity > 0.6,
            embed_fonts: complexity < 0.4,
            optimize_text: params[3] > 0.6,
            text_compression: bounded(params[2], 0.3, 0.9),
        },
        images: ImageSettings {
            quality: bounded(params[4], 0.3, 0.95),
            downscale: downscale_signal > 0.5 && analysis.images.compression_potential > 0.7,
            target_dpi: if downscale_signal > 0.7 { 150 } else { 300 },
            format: ImageFormat::Auto,
            progressive: analysis.images.count > 5,
        },
        vectors: VectorSettings {
            simplification,
            precision_digits: if simplification > 0.6 { 2 } else { 3 },
            remove_invisible: true,
            optimize_paths: params[7] > 0.5,
        },
        structural: StructuralSettings {
            remove_metadata: params[8] > 0.5,
            remove_comments: params[9] > 0.6,
            remove_unused_resources: params[10] > 0.7,
            linearize: params[11] > 0.5,
            cross_reference_streams: analysis.page_count > 10,
        },
        predictions: SettingsPredictions {
            expected_size_reduction_pct: bounded(outcome[0] * 100.0, 5.0, 80.0),
            expected_quality_loss_pct: bounded(outcome[1] * 100.0, 0.0, 30.0),
            processing_time_sec: (outcome[2] * pages * 2.0).max(1.0),
            confidence_score: bounded(outcome[3], 0.6, 0.95),
        },
        insights: SettingsInsights::pending(preferences.priority),
    }
    .normalized();

    settings.insights = insights(analysis, &settings, preferences.priority);
    Ok(settings)
}

/// Share of the maximum compression implied by a priority alone.
fn priority_factor(priority: Priority) -> f64 {
    match priority {
        Priority::Size => 0.8,
        Priority::Quality => 0.3,
        Priority::Balanced => 0.5,
    }
}

/// Settings derived from the user's priority alone. Deterministic.
pub fn fallback(analysis: &ContentAnalysis, preferences: &UserPreferences) -> CompressionSettings {
    let priority = preferences.priority;
    let aggressive = preferences.aggressive_mode;
    let pf = priority_factor(priority);
    let pages = analysis.page_count as f64;

    let mut settings = CompressionSettings {
        global: GlobalSettings {
            compression_level: if aggressive { 0.8 } else { 0.6 },
            preserve_quality: priority != Priority::Size,
            aggressive_mode: aggressive,
        },
        text: TextSettings {
            font_subsetting: true,
            embed_fonts: false,
            optimize_text: true,
            text_compression: pf,
        },
        images: ImageSettings {
            quality: (1.0 - pf).max(0.4),
            downscale: aggressive,
            target_dpi: if aggressive { 150 } else { 300 },
            format: ImageFormat::Auto,
            progressive: true,
        },
        vectors: VectorSettings {
            simplification: pf * 0.8,
            precision_digits: if aggressive { 2 } else { 3 },
            remove_invisible: true,
            optimize_paths: true,
        },
        structural: StructuralSettings {
            remove_metadata: true,
            remove_comments: true,
            remove_unused_resources: true,
            linearize: analysis.page_count > 10,
            cross_reference_streams: true,
        },
        predictions: SettingsPredictions {
            expected_size_reduction_pct: 25.0 + pf * 30.0,
            expected_quality_loss_pct: pf * 15.0,
            processing_time_sec: pages * 1.5,
            confidence_score: 0.7,
        },
        insights: SettingsInsights::pending(priority),
    }
    .normalized();

    let mut insights = insights(analysis, &settings, priority);
    if aggressive {
        insights.risk_level = insights.risk_level.max(RiskLevel::Medium);
    }
    if priority == Priority::Size {
        insights
            .warnings
            .push("Size-first settings may reduce visual quality".to_string());
    }
    settings.insights = insights;
    settings
}

// -- Insights ----------------------------------------------------------------------

/// Risk tier and advice for a finished settings bundle.
pub fn insights(
    analysis: &ContentAnalysis,
    settings: &CompressionSettings,
    priority: Priority,
) -> SettingsInsights {
    let loss = settings.predictions.expected_quality_loss_pct;
    let mut recommendations = Vec::new();
    let mut warnings = Vec::new();

    let risk_level = if loss > HIGH_RISK_LOSS_PCT {
        warnings.push(format!("Noticeable quality loss expected ({loss:.0}%)"));
        RiskLevel::High
    } else if loss > MEDIUM_RISK_LOSS_PCT {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    if analysis.images.compression_potential > 0.8 {
        recommendations.push("Images compress well; image optimisation gives the largest saving".to_string());
    }
    if analysis.text.complexity > 0.7 {
        recommendations.push("Complex typography detected; font subsetting is recommended".to_string());
    }
    if analysis.vectors.optimizable > 0.6 {
        recommendations.push("Vector graphics can be simplified without visible change".to_string());
    }
    if priority == Priority::Quality {
        recommendations.push("Quality-first settings selected; size reduction will be moderate".to_string());
    }
    if analysis.text.readability < 0.6 {
        warnings.push("Text looks scanned or OCR-derived; heavy compression may hurt legibility".to_string());
    }

    SettingsInsights {
        primary_target: priority,
        risk_level,
        recommendations,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{self, DocumentAggregate};
    use crate::scoring::HeuristicBackend;
    use crate::scoring::testing::{FaultyBackend, all_failing};
    use kompressor_core::PageSignal;

    fn text_analysis() -> ContentAnalysis {
        let page = PageSignal {
            text_item_count: 90,
            image_paint_ops: 0,
            vector_ops: 0,
        };
        analyzer::fallback(&DocumentAggregate::from_pages(50_000, vec![Some(page)]))
    }

    async fn ready(backend: &dyn ScoringBackend) -> SettingsOptimizer {
        let mut optimizer = SettingsOptimizer::new(true);
        optimizer.initialize(backend).await.unwrap();
        optimizer
    }

    #[test]
    fn generate_requires_initialization() {
        let optimizer = SettingsOptimizer::new(true);
        let err = optimizer
            .generate(&text_analysis(), &UserPreferences::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized(COMPONENT)));
    }

    #[tokio::test]
    async fn scored_settings_are_range_valid_for_every_priority() {
        let optimizer = ready(&HeuristicBackend).await;
        for priority in [Priority::Size, Priority::Quality, Priority::Balanced] {
            let settings = optimizer
                .generate(&text_analysis(), &UserPreferences::with_priority(priority))
                .unwrap();
            assert!(settings.is_range_valid(), "{priority:?}");
            assert_eq!(settings.insights.primary_target, priority);
        }
    }

    #[tokio::test]
    async fn balanced_text_document_is_low_risk() {
        let optimizer = ready(&HeuristicBackend).await;
        let settings = optimizer
            .generate(&text_analysis(), &UserPreferences::default())
            .unwrap();
        assert_eq!(settings.insights.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn outcome_failure_alone_triggers_fallback() {
        let backend = FaultyBackend {
            failing: vec![ModelKind::OutcomePredictor],
        };
        let optimizer = ready(&backend).await;
        let prefs = UserPreferences::with_priority(Priority::Quality);
        let settings = optimizer.generate(&text_analysis(), &prefs).unwrap();
        assert_eq!(settings, fallback(&text_analysis(), &prefs));
    }

    #[tokio::test]
    async fn fallback_is_repeatable() {
        let optimizer = ready(&all_failing()).await;
        let prefs = UserPreferences {
            aggressive_mode: true,
            ..UserPreferences::with_priority(Priority::Size)
        };
        let first = optimizer.generate(&text_analysis(), &prefs).unwrap();
        let second = optimizer.generate(&text_analysis(), &prefs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_follows_priority() {
        let analysis = text_analysis();
        let size = fallback(&analysis, &UserPreferences::with_priority(Priority::Size));
        let quality = fallback(&analysis, &UserPreferences::with_priority(Priority::Quality));

        assert!(!size.global.preserve_quality);
        assert!(quality.global.preserve_quality);
        assert_eq!(size.global.compression_level, 0.6);
        assert!((size.predictions.expected_size_reduction_pct - 49.0).abs() < 1e-9);
        assert!((quality.images.quality - 0.7).abs() < 1e-9);
        assert_eq!(size.insights.risk_level, RiskLevel::Medium);
        assert!(size.insights.warnings.iter().any(|w| w.contains("Size-first")));
        assert!(size.is_range_valid());
    }

    #[test]
    fn aggressive_fallback_is_at_least_medium_risk() {
        let prefs = UserPreferences {
            aggressive_mode: true,
            ..UserPreferences::with_priority(Priority::Quality)
        };
        let settings = fallback(&text_analysis(), &prefs);
        assert_eq!(settings.global.compression_level, 0.8);
        assert_eq!(settings.images.target_dpi, 150);
        assert!(settings.insights.risk_level >= RiskLevel::Medium);
    }

    #[test]
    fn insight_rules() {
        let mut analysis = text_analysis();
        analysis.images.compression_potential = 0.9;
        analysis.text.readability = 0.4;
        let mut settings = fallback(&analysis, &UserPreferences::default());
        settings.predictions.expected_quality_loss_pct = 20.0;

        let insights = insights(&analysis, &settings, Priority::Balanced);
        assert_eq!(insights.risk_level, RiskLevel::High);
        assert!(insights.recommendations.iter().any(|r| r.contains("Images compress well")));
        assert_eq!(insights.warnings.len(), 2);
    }
}
