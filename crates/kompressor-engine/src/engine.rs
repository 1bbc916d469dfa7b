// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recommendation engine — owns the four components, runs the full pipeline
// per document and assembles a UI-ready result.
//
// The component set lives behind a tokio `RwLock`. Every pipeline call holds
// a read guard for its whole duration and `dispose` takes the write guard, so
// scoring models are never released while an inference is in flight.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use kompressor_core::config::{ConfidenceWeights, SummaryLimits};
use kompressor_core::error::{EngineError, Result};
use kompressor_core::{
    CompressionSettings, ContentAnalysis, ContentType, DocumentType, EngineConfig,
    PresetCategory, PresetRecommendation, QualityPrediction, RiskLevel, RunId, SmartPreset,
    StructuralReader, UserPreferences, confidence,
};
use kompressor_document::PdfSignalReader;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error, info, instrument};

use crate::analyzer::ContentAnalyzer;
use crate::format;
use crate::optimizer::SettingsOptimizer;
use crate::predictor::QualityPredictor;
use crate::presets::PresetGenerator;
use crate::scoring::{HeuristicBackend, ScoringBackend};

const ENGINE: &str = "recommendation engine";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Wall-clock time spent in each stage, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    pub analysis_ms: f64,
    pub settings_ms: f64,
    pub prediction_ms: f64,
    pub presets_ms: f64,
    pub total_ms: f64,
}

/// Headline numbers and advice for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSummary {
    pub original_size_bytes: u64,
    pub estimated_size_bytes: u64,
    pub size_reduction_pct: f64,
    pub quality_score: f64,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
}

/// Everything `process_file` produces for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub run_id: RunId,
    pub document_name: String,
    pub completed_at: DateTime<Utc>,
    pub analysis: ContentAnalysis,
    pub settings: CompressionSettings,
    pub prediction: QualityPrediction,
    pub recommendation: PresetRecommendation,
    pub presets: Vec<SmartPreset>,
    /// Weighted stage confidence, in `[0.5, 0.95]`.
    pub confidence: f64,
    pub summary: UiSummary,
    pub metrics: ProcessingMetrics,
}

impl ProcessingResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Analysis-only overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSummary {
    pub content_type: ContentType,
    pub recommended_preset: PresetCategory,
    pub page_count: usize,
    pub file_size_bytes: u64,
    pub estimated_size_reduction_pct: f64,
    pub confidence: f64,
    pub elapsed_ms: f64,
}

/// One entry of a side-by-side preset comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetComparison {
    pub preset: SmartPreset,
    pub prediction: QualityPrediction,
}

/// Whether each component has scoring models loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub analyzer: bool,
    pub optimizer: bool,
    pub quality_predictor: bool,
    pub smart_presets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub initialized: bool,
    pub backend: String,
    pub config: EngineConfig,
    pub components: ComponentStatus,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

struct Components {
    analyzer: ContentAnalyzer,
    optimizer: SettingsOptimizer,
    predictor: QualityPredictor,
    presets: PresetGenerator,
}

impl Components {
    fn status(&self) -> ComponentStatus {
        ComponentStatus {
            analyzer: self.analyzer.has_models(),
            optimizer: self.optimizer.has_models(),
            quality_predictor: self.predictor.has_models(),
            smart_presets: self.presets.has_models(),
        }
    }
}

/// Compression recommendation engine.
///
/// Construct once and share by reference; all methods take `&self`.
pub struct Engine {
    backend: Arc<dyn ScoringBackend>,
    config: RwLock<EngineConfig>,
    components: RwLock<Option<Components>>,
}

impl Engine {
    /// Engine with the built-in heuristic scoring backend.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_backend(config, Arc::new(HeuristicBackend))
    }

    pub fn with_backend(config: EngineConfig, backend: Arc<dyn ScoringBackend>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            config: RwLock::new(config),
            components: RwLock::new(None),
        })
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Load every component. Idempotent.
    #[instrument(skip_all)]
    pub async fn initialize(&self) -> Result<()> {
        let mut slot = self.components.write().await;
        if slot.is_some() {
            debug!("engine already initialised");
            return Ok(());
        }

        let config = self.config.read().await.clone();
        let backend = self.backend.as_ref();
        let mut analyzer = ContentAnalyzer::new(config.enable_analyzer);
        let mut optimizer = SettingsOptimizer::new(config.enable_optimizer);
        let mut predictor = QualityPredictor::new(config.enable_quality_predictor);
        let mut presets = PresetGenerator::new(config.enable_smart_presets, config.max_alternatives);

        let loaded = tokio::try_join!(
            analyzer.initialize(backend),
            optimizer.initialize(backend),
            predictor.initialize(backend),
            presets.initialize(backend),
        );
        if let Err(err) = loaded {
            error!(error = %err, "engine initialisation failed");
            return Err(err);
        }

        let components = Components {
            analyzer,
            optimizer,
            predictor,
            presets,
        };
        info!(backend = backend.name(), components = ?components.status(), "engine initialised");
        *slot = Some(components);
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.components.read().await.is_some()
    }

    /// Release every component's scoring models.
    ///
    /// Waits for in-flight calls to finish. Later calls re-initialise.
    #[instrument(skip_all)]
    pub async fn dispose(&self) {
        let mut slot = self.components.write().await;
        if let Some(mut components) = slot.take() {
            components.analyzer.dispose();
            components.optimizer.dispose();
            components.predictor.dispose();
            components.presets.dispose();
            info!("engine disposed");
        }
    }

    /// Read access to the components, initialising first when allowed.
    async fn ready(&self) -> Result<RwLockReadGuard<'_, Components>> {
        if let Ok(components) = RwLockReadGuard::try_map(self.components.read().await, Option::as_ref) {
            return Ok(components);
        }
        if !self.config.read().await.auto_initialize {
            return Err(EngineError::NotInitialized(ENGINE));
        }
        self.initialize().await?;
        RwLockReadGuard::try_map(self.components.read().await, Option::as_ref)
            .map_err(|_| EngineError::NotInitialized(ENGINE))
    }

    // -- Configuration --------------------------------------------------------

    pub async fn config(&self) -> EngineConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration.
    ///
    /// Component toggles and `max_alternatives` take effect at the next
    /// `initialize`; weights and summary limits apply to the next call.
    pub async fn update_config(&self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        *self.config.write().await = config;
        info!("engine config updated");
        Ok(())
    }

    pub async fn status(&self) -> EngineStatus {
        let components = self.components.read().await;
        EngineStatus {
            initialized: components.is_some(),
            backend: self.backend.name().to_string(),
            config: self.config.read().await.clone(),
            components: components.as_ref().map(Components::status).unwrap_or_default(),
        }
    }

    // -- Pipeline -------------------------------------------------------------

    /// Run the full pipeline on one document.
    ///
    /// Any failure is returned as a single `Processing` error naming the stage.
    #[instrument(skip_all, fields(document = document.name()))]
    pub async fn process_file(
        &self,
        document: &dyn StructuralReader,
        preferences: &UserPreferences,
    ) -> Result<ProcessingResult> {
        let started = Instant::now();
        validate(document).map_err(|e| EngineError::in_stage("validation", e))?;

        let components = self
            .ready()
            .await
            .map_err(|e| EngineError::in_stage("initialization", e))?;
        let config = self.config.read().await.clone();

        let stage = Instant::now();
        let analysis = components
            .analyzer
            .analyze(document)
            .await
            .map_err(|e| EngineError::in_stage("analysis", e))?;
        let analysis_ms = elapsed_ms(stage);

        let stage = Instant::now();
        let settings = components
            .optimizer
            .generate(&analysis, preferences)
            .map_err(|e| EngineError::in_stage("settings", e))?;
        let settings_ms = elapsed_ms(stage);

        let stage = Instant::now();
        let prediction = components
            .predictor
            .predict(&analysis, &settings)
            .map_err(|e| EngineError::in_stage("prediction", e))?;
        let prediction_ms = elapsed_ms(stage);

        let stage = Instant::now();
        let (recommendation, presets) = tokio::join!(
            async { components.presets.recommend_best(&analysis, preferences) },
            async { components.presets.generate_all(&analysis) },
        );
        let recommendation = recommendation.map_err(|e| EngineError::in_stage("presets", e))?;
        let presets = presets.map_err(|e| EngineError::in_stage("presets", e))?;
        let presets_ms = elapsed_ms(stage);

        let confidence = aggregate_confidence(
            &config.confidence_weights,
            &analysis,
            &settings,
            &prediction,
            &recommendation,
        );
        let summary = build_summary(&config.summary, &analysis, &settings, &prediction, &recommendation);
        let metrics = ProcessingMetrics {
            analysis_ms,
            settings_ms,
            prediction_ms,
            presets_ms,
            total_ms: elapsed_ms(started),
        };

        info!(
            original = %format::file_size(summary.original_size_bytes),
            reduction = %format::percentage(summary.size_reduction_pct),
            preset = recommendation.preset.id.as_str(),
            confidence,
            elapsed = %format::duration(metrics.total_ms),
            "document processed"
        );

        Ok(ProcessingResult {
            run_id: RunId::new(),
            document_name: document.name().to_string(),
            completed_at: Utc::now(),
            analysis,
            settings,
            prediction,
            recommendation,
            presets,
            confidence,
            summary,
            metrics,
        })
    }

    /// Open a PDF from disk and run the full pipeline on it.
    pub async fn process_path(
        &self,
        path: impl AsRef<Path>,
        preferences: &UserPreferences,
    ) -> Result<ProcessingResult> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match DocumentType::from_extension(extension) {
            Some(kind) if kind.is_analysable() => {}
            Some(kind) => {
                return Err(EngineError::in_stage(
                    "validation",
                    EngineError::UnsupportedDocument(kind.mime_type().to_string()),
                ));
            }
            None => {
                return Err(EngineError::in_stage(
                    "validation",
                    EngineError::UnsupportedDocument(format!("unknown extension {extension:?}")),
                ));
            }
        }

        let reader = PdfSignalReader::open(path).map_err(|e| EngineError::in_stage("read", e))?;
        self.process_file(&reader, preferences).await
    }

    /// Analysis only, plus a content type and a preset suggestion.
    #[instrument(skip_all, fields(document = document.name()))]
    pub async fn quick_analysis(&self, document: &dyn StructuralReader) -> Result<QuickSummary> {
        let started = Instant::now();
        validate(document)?;
        let components = self.ready().await?;
        let analysis = components.analyzer.analyze(document).await?;

        let content_type = classify_content(&analysis);
        let recommended_preset = quick_preset(content_type, &analysis);
        debug!(content_type = content_type.as_str(), preset = recommended_preset.id(), "quick analysis");

        Ok(QuickSummary {
            content_type,
            recommended_preset,
            page_count: analysis.page_count,
            file_size_bytes: analysis.total_file_size_bytes,
            estimated_size_reduction_pct: analysis.recommendation.estimated_size_reduction_pct,
            confidence: analysis.recommendation.confidence_score,
            elapsed_ms: elapsed_ms(started),
        })
    }

    /// Predictions for the named presets, in the order given. Unknown ids are skipped.
    pub async fn compare_presets(
        &self,
        ids: &[&str],
        analysis: &ContentAnalysis,
    ) -> Result<Vec<PresetComparison>> {
        let components = self.ready().await?;
        let presets = components.presets.generate_all(analysis)?;

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(preset) = presets.iter().find(|p| p.id == *id) else {
                debug!(id, "unknown preset id skipped");
                continue;
            };
            let prediction = components.predictor.predict(analysis, &preset.settings)?;
            out.push(PresetComparison {
                preset: preset.clone(),
                prediction,
            });
        }
        Ok(out)
    }

    pub async fn get_preset_by_id(
        &self,
        id: &str,
        analysis: &ContentAnalysis,
    ) -> Result<Option<SmartPreset>> {
        let components = self.ready().await?;
        components.presets.find(id, analysis)
    }
}

// ---------------------------------------------------------------------------
// Pipeline helpers
// ---------------------------------------------------------------------------

fn validate(document: &dyn StructuralReader) -> Result<()> {
    let kind = document.document_type();
    if !kind.is_analysable() {
        return Err(EngineError::UnsupportedDocument(kind.mime_type().to_string()));
    }
    if document.page_count() == 0 {
        return Err(EngineError::Validation(format!("{} has no pages", document.name())));
    }
    if document.total_size() == 0 {
        return Err(EngineError::Validation(format!("{} is empty", document.name())));
    }
    Ok(())
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

fn aggregate_confidence(
    weights: &ConfidenceWeights,
    analysis: &ContentAnalysis,
    settings: &CompressionSettings,
    prediction: &QualityPrediction,
    recommendation: &PresetRecommendation,
) -> f64 {
    confidence(
        weights.analysis * analysis.recommendation.confidence_score
            + weights.settings * settings.predictions.confidence_score
            + weights.prediction * prediction.size_reduction.confidence_level
            + weights.preset * recommendation.match_score,
    )
}

fn build_summary(
    limits: &SummaryLimits,
    analysis: &ContentAnalysis,
    settings: &CompressionSettings,
    prediction: &QualityPrediction,
    recommendation: &PresetRecommendation,
) -> UiSummary {
    let recommendations = settings
        .insights
        .recommendations
        .iter()
        .chain(&recommendation.reasoning)
        .take(limits.max_recommendations)
        .cloned()
        .collect();
    let warnings = settings
        .insights
        .warnings
        .iter()
        .chain(&recommendation.warnings)
        .chain(&prediction.risk.potential_issues)
        .take(limits.max_warnings)
        .cloned()
        .collect();

    let mut insights = Vec::new();
    if analysis.images.compression_potential > 0.7 {
        insights.push("Images have high compression potential".to_string());
    }
    if analysis.text.complexity > 0.6 {
        insights.push("Font optimisation can reduce text overhead".to_string());
    }
    if prediction.quality_impact.overall > 0.8 {
        insights.push("Compression possible while preserving quality".to_string());
    }
    if prediction.risk.risk_level == RiskLevel::Low {
        insights.push("Safe compression settings detected".to_string());
    }
    insights.truncate(limits.max_insights);

    UiSummary {
        original_size_bytes: analysis.total_file_size_bytes,
        estimated_size_bytes: prediction.size_reduction.estimated_final_size_bytes,
        size_reduction_pct: prediction.size_reduction.estimated_pct,
        quality_score: prediction.quality_impact.overall,
        recommendations,
        warnings,
        insights,
    }
}

/// Dominant content type by simple thresholds.
pub fn classify_content(analysis: &ContentAnalysis) -> ContentType {
    if analysis.images_per_page() > 1.0 {
        ContentType::ImageHeavy
    } else if analysis.vectors.count > 20 {
        ContentType::VectorHeavy
    } else if analysis.text.density > 0.7 {
        ContentType::TextHeavy
    } else {
        ContentType::Mixed
    }
}

/// Preset suggested by quick analysis.
pub fn quick_preset(content_type: ContentType, analysis: &ContentAnalysis) -> PresetCategory {
    if content_type == ContentType::ImageHeavy {
        PresetCategory::Web
    } else if analysis.page_count > 50 {
        PresetCategory::Archive
    } else if analysis.vectors.count > 10 {
        PresetCategory::Presentation
    } else {
        PresetCategory::Document
    }
}
