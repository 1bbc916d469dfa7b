// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quality predictor — estimates size reduction, quality impact, performance
// and risk for applying a settings bundle to an analysed document.

use kompressor_core::error::{EngineError, Result};
use kompressor_core::prediction::{
    AdvancedMetrics, PerformanceEstimate, QualityBreakdown, QualityImpact, RiskAssessment,
    SizeBreakdown, SizeReduction, compression_ratio, final_size,
};
use kompressor_core::{
    ComplexityTier, CompressionSettings, ContentAnalysis, QualityPrediction, RiskLevel, bounded,
    unit,
};
use tracing::{debug, info, instrument, warn};

use crate::scoring::{ModelHandle, ModelKind, ScoringBackend};

pub const COMPONENT: &str = "quality predictor";

const MIB: f64 = 1_048_576.0;
/// Bits per byte, for the bit-rate reduction metric.
const BITS_PER_BYTE: f64 = 8.0;

struct PredictorModels {
    size: ModelHandle,
    quality: ModelHandle,
    risk: ModelHandle,
}

/// Predicts the outcome of a (analysis, settings) pair.
pub struct QualityPredictor {
    enabled: bool,
    initialized: bool,
    models: Option<PredictorModels>,
}

impl QualityPredictor {
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
            self.models = Some(PredictorModels {
                size: ModelHandle::load(backend, ModelKind::SizePredictor, COMPONENT)?,
                quality: ModelHandle::load(backend, ModelKind::QualityEstimator, COMPONENT)?,
                risk: ModelHandle::load(backend, ModelKind::RiskClassifier, COMPONENT)?,
            });
        }
        self.initialized = true;
        info!(models = self.models.is_some(), "quality predictor initialised");
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
        debug!("quality predictor disposed");
    }

    // -- Prediction -----------------------------------------------------------

    #[instrument(skip_all, fields(level = settings.global.compression_level))]
    pub fn predict(
        &self,
        analysis: &ContentAnalysis,
        settings: &CompressionSettings,
    ) -> Result<QualityPrediction> {
        if !self.initialized {
            return Err(EngineError::NotInitialized(COMPONENT));
        }

        let prediction = match self.models.as_ref().map(|m| scored(m, analysis, settings)) {
            Some(Ok(prediction)) => prediction,
            Some(Err(err)) => {
                warn!(error = %err, "quality scoring failed, using level-based estimates");
                fallback(analysis, settings)
            }
            None => fallback(analysis, settings),
        };

        debug!(
            reduction = prediction.size_reduction.estimated_pct,
            quality = prediction.quality_impact.overall,
            risk = prediction.risk.risk_level.as_str(),
            "prediction complete"
        );
        Ok(prediction)
    }
}

// -- Feature vectors ---------------------------------------------------------------

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

fn size_features(a: &ContentAnalysis, s: &CompressionSettings) -> Vec<f64> {
    vec![
        unit(a.page_count as f64 / 100.0),
        unit(a.total_file_size_bytes as f64 / 10_000_000.0),
        a.text.density,
        unit(a.images.count as f64 / 20.0),
        a.image_byte_ratio(),
        a.images.compression_potential,
        unit(a.vectors.count as f64 / 50.0),
        a.vectors.optimizable,
        s.global.compression_level,
        s.images.quality,
        flag(s.images.downscale),
        s.text.text_compression,
        s.vectors.simplification,
        flag(s.structural.remove_metadata),
        flag(s.structural.remove_unused_resources),
        flag(s.text.font_subsetting),
        flag(s.structural.cross_reference_streams),
        a.recommendation.confidence_score,
    ]
}

fn quality_features(a: &ContentAnalysis, s: &CompressionSettings) -> Vec<f64> {
    vec![
        a.text.density,
        a.text.complexity,
        a.text.readability,
        unit(a.images.count as f64 / 20.0),
        a.images.compression_potential,
        a.vectors.complexity,
        a.vectors.optimizable,
        s.global.compression_level,
        flag(s.global.preserve_quality),
        s.images.quality,
        flag(s.images.downscale),
        unit(f64::from(s.images.target_dpi) / 300.0),
        s.text.text_compression,
        flag(s.text.font_subsetting),
        flag(s.text.embed_fonts),
        flag(s.text.optimize_text),
        s.vectors.simplification,
        unit(f64::from(s.vectors.precision_digits) / 4.0),
        flag(s.vectors.remove_invisible),
        flag(s.images.progressive),
        a.image_byte_ratio(),
        s.insights.primary_target.encode(),
    ]
}

fn risk_features(a: &ContentAnalysis, s: &CompressionSettings) -> Vec<f64> {
    vec![
        s.global.compression_level,
        flag(s.global.aggressive_mode),
        flag(s.global.preserve_quality),
        s.images.quality,
        flag(s.images.downscale),
        s.text.text_compression,
        s.vectors.simplification,
        flag(s.structural.remove_metadata),
        flag(s.structural.remove_comments),
        flag(s.structural.remove_unused_resources),
        flag(s.structural.linearize),
        a.text.readability,
        a.text.complexity,
        a.text.density,
        a.images.compression_potential,
        unit(a.images.count as f64 / 20.0),
        unit(s.predictions.expected_quality_loss_pct / 30.0),
        unit(a.page_count as f64 / 100.0),
        flag(s.text.embed_fonts),
        flag(s.text.font_subsetting),
    ]
}

// -- Scoring paths -----------------------------------------------------------------

fn scored(
    models: &PredictorModels,
    analysis: &ContentAnalysis,
    settings: &CompressionSettings,
) -> Result<QualityPrediction> {
    let size = models.size.score(&size_features(analysis, settings))?;
    let quality = models.quality.score(&quality_features(analysis, settings))?;
    let risk = models.risk.score(&risk_features(analysis, settings))?;

    let reduction = bounded(size[0], 0.05, 0.8);
    let size_reduction = SizeReduction {
        estimated_pct: reduction * 100.0,
        estimated_final_size_bytes: final_size(analysis.total_file_size_bytes, reduction),
        confidence_level: bounded(size[1], 0.6, 0.95),
        breakdown: SizeBreakdown {
            images: size[2] * 100.0,
            text: size[3] * 100.0,
            vectors: size[4] * 100.0,
            metadata: size[5] * 100.0,
        }
        .normalized(),
    };

    let quality_impact = QualityImpact {
        overall: bounded(quality[0], 0.3, 1.0),
        visual: bounded(quality[1], 0.2, 1.0),
        text_readability: bounded(quality[2], 0.4, 1.0),
        print: bounded(quality[3], 0.3, 1.0),
        breakdown: QualityBreakdown {
            image_quality: bounded(quality[4], 0.2, 1.0),
            text_sharpness: bounded(quality[5], 0.4, 1.0),
            vector_precision: bounded(quality[6], 0.3, 1.0),
            color_accuracy: bounded(quality[7], 0.5, 1.0),
        },
    };

    let level = settings.global.compression_level;
    let performance = PerformanceEstimate {
        processing_time_sec: (analysis.page_count as f64 * 0.8 * (1.0 + level)).max(1.0),
        memory_usage_mb: (analysis.total_file_size_bytes as f64 / MIB * 2.0).max(50.0),
        complexity: if settings.global.aggressive_mode {
            ComplexityTier::High
        } else if level > 0.7 {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Low
        },
        optimized_for_web: settings.structural.linearize
            && settings.structural.cross_reference_streams,
    };

    let reversibility = unit(risk[1]);
    let structural = unit(risk[2]);
    let risk_level = RiskLevel::from_score(risk[0]);

    let mut potential_issues = Vec::new();
    let qb = &quality_impact.breakdown;
    if qb.image_quality < 0.7 {
        potential_issues.push("Image quality will drop noticeably".to_string());
    }
    if qb.text_sharpness < 0.8 {
        potential_issues.push("Text edges may soften".to_string());
    }
    if qb.vector_precision < 0.6 {
        potential_issues.push("Fine vector detail may be lost".to_string());
    }
    if reversibility < 0.5 {
        potential_issues.push("Changes cannot be fully undone; keep the original".to_string());
    }

    let mut recommendations = Vec::new();
    if quality_impact.overall > 0.8 {
        recommendations.push("Overall quality stays high".to_string());
    }
    if reduction > 0.3 {
        recommendations.push("Substantial size reduction expected".to_string());
    }
    if risk_level == RiskLevel::Low {
        recommendations.push("Settings are safe to apply".to_string());
    }
    if structural > 0.7 {
        recommendations.push("Document structure will be optimised".to_string());
    }

    Ok(QualityPrediction {
        size_reduction,
        quality_impact,
        performance,
        risk: RiskAssessment {
            risk_level,
            potential_issues,
            reversible: reversibility > 0.5,
            recommendations,
        },
        advanced: AdvancedMetrics {
            compression_ratio: compression_ratio(reduction),
            bit_rate_reduction: reduction * BITS_PER_BYTE,
            structural_optimization: structural,
            accessibility_preservation: bounded(risk[3], 0.5, 1.0),
            searchability_preservation: bounded(risk[4], 0.6, 1.0),
        },
    })
}

/// Estimates from the compression level alone. Deterministic.
pub fn fallback(analysis: &ContentAnalysis, settings: &CompressionSettings) -> QualityPrediction {
    let level = settings.global.compression_level;
    let reduction = (0.15 + level * 0.4).min(0.6);

    let risk_level = if level > 0.8 {
        RiskLevel::High
    } else if level > 0.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let mut potential_issues = Vec::new();
    if level > 0.6 {
        potential_issues.push("High compression level may cause visible quality loss".to_string());
    }

    QualityPrediction {
        size_reduction: SizeReduction {
            estimated_pct: reduction * 100.0,
            estimated_final_size_bytes: final_size(analysis.total_file_size_bytes, reduction),
            confidence_level: 0.7,
            breakdown: SizeBreakdown {
                images: 40.0,
                text: 25.0,
                vectors: 15.0,
                metadata: 10.0,
            }
            .normalized(),
        },
        quality_impact: QualityImpact {
            overall: (1.0 - level * 0.5).max(0.4),
            visual: (1.0 - level * 0.6).max(0.3),
            text_readability: (1.0 - level * 0.3).max(0.6),
            print: (1.0 - level * 0.4).max(0.4),
            breakdown: QualityBreakdown {
                image_quality: settings.images.quality.max(0.3),
                text_sharpness: (1.0 - settings.text.text_compression).max(0.5),
                vector_precision: (1.0 - settings.vectors.simplification).max(0.4),
                color_accuracy: (1.0 - level * 0.3).max(0.6),
            },
        },
        performance: PerformanceEstimate {
            processing_time_sec: analysis.page_count as f64 * 1.2,
            memory_usage_mb: (analysis.total_file_size_bytes as f64 / MIB * 1.5).max(50.0),
            complexity: if level > 0.7 {
                ComplexityTier::High
            } else {
                ComplexityTier::Medium
            },
            optimized_for_web: settings.structural.linearize,
        },
        risk: RiskAssessment {
            risk_level,
            potential_issues,
            reversible: !settings.structural.remove_metadata,
            recommendations: vec![
                "Estimates are rule-based; run a test compression to confirm".to_string(),
            ],
        },
        advanced: AdvancedMetrics {
            compression_ratio: compression_ratio(reduction),
            bit_rate_reduction: reduction * BITS_PER_BYTE,
            structural_optimization: 0.6,
            accessibility_preservation: 0.8,
            searchability_preservation: if analysis.text.density > 0.5 { 0.9 } else { 0.7 },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{self, DocumentAggregate};
    use crate::optimizer;
    use crate::scoring::HeuristicBackend;
    use crate::scoring::testing::{FaultyBackend, all_failing};
    use kompressor_core::{PageSignal, Priority, UserPreferences};

    fn analysis_with(images: usize, pages: usize) -> ContentAnalysis {
        let page = PageSignal {
            text_item_count: 60,
            image_paint_ops: images,
            vector_ops: 3,
        };
        analyzer::fallback(&DocumentAggregate::from_pages(
            4_000_000,
            vec![Some(page); pages],
        ))
    }

    fn settings_for(analysis: &ContentAnalysis, priority: Priority) -> CompressionSettings {
        optimizer::fallback(analysis, &UserPreferences::with_priority(priority))
    }

    async fn ready(backend: &dyn ScoringBackend) -> QualityPredictor {
        let mut predictor = QualityPredictor::new(true);
        predictor.initialize(backend).await.unwrap();
        predictor
    }

    #[tokio::test]
    async fn scored_predictions_are_range_valid() {
        let predictor = ready(&HeuristicBackend).await;
        for (images, priority) in [(0, Priority::Quality), (4, Priority::Balanced), (9, Priority::Size)] {
            let analysis = analysis_with(images, 12);
            let settings = settings_for(&analysis, priority);
            let prediction = predictor.predict(&analysis, &settings).unwrap();
            assert!(prediction.is_range_valid(), "{images} images, {priority:?}");
        }
    }

    #[tokio::test]
    async fn any_single_failure_falls_back_whole() {
        for kind in [ModelKind::SizePredictor, ModelKind::QualityEstimator, ModelKind::RiskClassifier] {
            let predictor = ready(&FaultyBackend { failing: vec![kind] }).await;
            let analysis = analysis_with(2, 5);
            let settings = settings_for(&analysis, Priority::Balanced);
            let prediction = predictor.predict(&analysis, &settings).unwrap();
            assert_eq!(prediction, fallback(&analysis, &settings), "{kind}");
        }
    }

    #[tokio::test]
    async fn fallback_is_repeatable() {
        let predictor = ready(&all_failing()).await;
        let analysis = analysis_with(3, 7);
        let settings = settings_for(&analysis, Priority::Size);
        let first = predictor.predict(&analysis, &settings).unwrap();
        let second = predictor.predict(&analysis, &settings).unwrap();
        assert_eq!(first, second);
        assert!(first.is_range_valid());
    }

    #[test]
    fn fallback_breakdown_respects_caps() {
        let analysis = analysis_with(1, 2);
        let prediction = fallback(&analysis, &settings_for(&analysis, Priority::Balanced));
        let breakdown = prediction.size_reduction.breakdown;
        assert!(breakdown.within_caps());
        assert_eq!(breakdown.metadata, 10.0);
    }

    #[test]
    fn fallback_formulas_follow_level() {
        let analysis = analysis_with(0, 10);
        let mut settings = settings_for(&analysis, Priority::Balanced);
        settings.global.compression_level = 0.9;

        let prediction = fallback(&analysis, &settings);
        assert!((prediction.size_reduction.estimated_pct - 51.0).abs() < 1e-9);
        assert_eq!(prediction.risk.risk_level, RiskLevel::High);
        assert_eq!(prediction.performance.complexity, ComplexityTier::High);
        assert_eq!(prediction.risk.potential_issues.len(), 1);
        assert!((prediction.performance.processing_time_sec - 12.0).abs() < 1e-9);
        assert_eq!(prediction.performance.memory_usage_mb, 50.0);
    }

    #[test]
    fn predict_requires_initialization() {
        let predictor = QualityPredictor::new(true);
        let analysis = analysis_with(0, 1);
        let settings = settings_for(&analysis, Priority::Balanced);
        assert!(matches!(
            predictor.predict(&analysis, &settings),
            Err(EngineError::NotInitialized(COMPONENT))
        ));
    }

    #[tokio::test]
    async fn heavier_settings_predict_more_reduction() {
        let predictor = ready(&HeuristicBackend).await;
        let analysis = analysis_with(5, 10);
        let light = settings_for(&analysis, Priority::Quality);
        let mut heavy = settings_for(&analysis, Priority::Size);
        heavy.global.compression_level = 0.95;

        let light = predictor.predict(&analysis, &light).unwrap();
        let heavy = predictor.predict(&analysis, &heavy).unwrap();
        assert!(heavy.size_reduction.estimated_pct > light.size_reduction.estimated_pct);
        assert!(heavy.advanced.compression_ratio > light.advanced.compression_ratio);
    }
}
