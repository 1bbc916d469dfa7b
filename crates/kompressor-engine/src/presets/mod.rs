// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smart preset generator — builds the six category presets for a document,
// ranks them by category affinity, and picks the best one for a user intent.

pub mod catalog;

use kompressor_core::error::{EngineError, Result};
use kompressor_core::preset::{
    Difficulty, PresetCharacteristics, PresetDisplay, PresetPredictions,
};
use kompressor_core::settings::{
    GlobalSettings, ImageSettings, SettingsInsights, SettingsPredictions, StructuralSettings,
    TextSettings, VectorSettings,
};
use kompressor_core::{
    Aggressiveness, CompressionSettings, ContentAnalysis, DeviceTarget, ImageFormat,
    PresetCategory, PresetRecommendation, Priority, RiskLevel, SmartPreset, UserPreferences,
    confidence, unit,
};
use tracing::{debug, info, instrument, warn};

use crate::scoring::{ModelHandle, ModelKind, ScoringBackend};

pub use catalog::{PresetTemplate, TEMPLATES};

pub const COMPONENT: &str = "smart presets";

/// Confidence given to every preset when classification is unavailable.
pub const FLAT_CONFIDENCE: f64 = 0.6;

struct PresetModels {
    classifier: ModelHandle,
    matcher: ModelHandle,
}

/// Generates and ranks smart presets.
pub struct PresetGenerator {
    enabled: bool,
    initialized: bool,
    max_alternatives: usize,
    models: Option<PresetModels>,
}

impl PresetGenerator {
    pub fn new(enabled: bool, max_alternatives: usize) -> Self {
        Self {
            enabled,
            initialized: false,
            max_alternatives,
            models: None,
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    pub async fn initialize(&mut self, backend: &dyn ScoringBackend) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        if self.enabled {
            self.models = Some(PresetModels {
                classifier: ModelHandle::load(backend, ModelKind::PresetClassifier, COMPONENT)?,
                matcher: ModelHandle::load(backend, ModelKind::PresetMatcher, COMPONENT)?,
            });
        }
        self.initialized = true;
        info!(models = self.models.is_some(), "smart presets initialised");
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
        debug!("smart presets disposed");
    }

    // -- Generation -----------------------------------------------------------

    /// All six presets, sorted by descending confidence.
    #[instrument(skip_all, fields(pages = analysis.page_count))]
    pub fn generate_all(&self, analysis: &ContentAnalysis) -> Result<Vec<SmartPreset>> {
        if !self.initialized {
            return Err(EngineError::NotInitialized(COMPONENT));
        }

        let confidences = match self.models.as_ref().map(|m| classify(m, analysis)) {
            Some(Ok(confidences)) => confidences,
            Some(Err(err)) => {
                warn!(error = %err, "preset classification failed, using flat confidence");
                [FLAT_CONFIDENCE; 6]
            }
            None => [FLAT_CONFIDENCE; 6],
        };

        let mut presets: Vec<SmartPreset> = TEMPLATES
            .iter()
            .map(|t| build_preset(t, analysis, confidences[t.category.index()]))
            .collect();
        presets.sort_by(|a, b| {
            b.predictions
                .confidence_score
                .total_cmp(&a.predictions.confidence_score)
        });

        debug!(top = presets[0].id.as_str(), "presets generated");
        Ok(presets)
    }

    /// The generated preset with the given id, if any.
    pub fn find(&self, id: &str, analysis: &ContentAnalysis) -> Result<Option<SmartPreset>> {
        Ok(self
            .generate_all(analysis)?
            .into_iter()
            .find(|preset| preset.id == id))
    }

    /// Best preset for `preferences`, with reasoning and runner-ups.
    #[instrument(skip_all, fields(priority = preferences.priority.as_str()))]
    pub fn recommend_best(
        &self,
        analysis: &ContentAnalysis,
        preferences: &UserPreferences,
    ) -> Result<PresetRecommendation> {
        let presets = self.generate_all(analysis)?;

        let scores = match self
            .models
            .as_ref()
            .map(|m| match_scores(m, &presets, analysis, preferences))
        {
            Some(Ok(scores)) => scores,
            Some(Err(err)) => {
                warn!(error = %err, "preset matching failed, using preference rules");
                fallback_match_scores(&presets, preferences)
            }
            None => fallback_match_scores(&presets, preferences),
        };

        let mut ranked: Vec<(SmartPreset, f64)> = presets.into_iter().zip(scores).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut ranked = ranked.into_iter();
        let Some((preset, match_score)) = ranked.next() else {
            return Err(EngineError::Validation("no presets available".into()));
        };
        let alternatives: Vec<SmartPreset> = ranked
            .take(self.max_alternatives)
            .map(|(preset, _)| preset)
            .collect();

        debug!(best = preset.id.as_str(), match_score, "preset recommended");
        Ok(PresetRecommendation {
            reasoning: reasoning(&preset, analysis, preferences),
            warnings: warnings(&preset, analysis),
            preset,
            match_score,
            alternatives,
        })
    }
}

// -- Preset construction -----------------------------------------------------------

/// Settings implied by a template, adjusted to the document.
pub fn preset_settings(template: &PresetTemplate, analysis: &ContentAnalysis) -> CompressionSettings {
    let category = template.category;
    let level = template.aggressiveness.compression_level();
    let (image_quality, text_compression) = match template.priority {
        Priority::Size => (0.5, 0.7),
        Priority::Quality => (0.9, 0.4),
        Priority::Balanced => (0.7, 0.6),
    };
    let is = |c: PresetCategory| category == c;

    CompressionSettings {
        global: GlobalSettings {
            compression_level: level,
            preserve_quality: template.priority == Priority::Quality,
            aggressive_mode: template.aggressiveness == Aggressiveness::Aggressive,
        },
        text: TextSettings {
            font_subsetting: level > 0.5,
            embed_fonts: is(PresetCategory::Print),
            optimize_text: level > 0.4,
            text_compression,
        },
        images: ImageSettings {
            quality: image_quality,
            downscale: is(PresetCategory::Mobile) || is(PresetCategory::Web),
            target_dpi: match category {
                PresetCategory::Print => 300,
                PresetCategory::Mobile => 150,
                _ => 200,
            },
            format: ImageFormat::Auto,
            progressive: is(PresetCategory::Web),
        },
        vectors: VectorSettings {
            simplification: level * 0.8,
            precision_digits: if is(PresetCategory::Print) { 3 } else { 2 },
            remove_invisible: true,
            optimize_paths: level > 0.5,
        },
        structural: StructuralSettings {
            remove_metadata: !is(PresetCategory::Archive),
            remove_comments: level > 0.6,
            remove_unused_resources: true,
            linearize: is(PresetCategory::Web),
            cross_reference_streams: analysis.page_count > 10,
        },
        predictions: SettingsPredictions {
            expected_size_reduction_pct: 30.0 + level * 40.0,
            expected_quality_loss_pct: level * 20.0,
            processing_time_sec: analysis.page_count as f64 * (0.5 + level),
            confidence_score: 0.8,
        },
        insights: SettingsInsights {
            primary_target: template.priority,
            risk_level: if template.aggressiveness == Aggressiveness::Aggressive {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            },
            recommendations: Vec::new(),
            warnings: Vec::new(),
        },
    }
    .normalized()
}

/// Build one preset with the given category confidence.
pub fn build_preset(
    template: &PresetTemplate,
    analysis: &ContentAnalysis,
    category_confidence: f64,
) -> SmartPreset {
    let category = template.category;
    let level = template.aggressiveness.compression_level();
    let pages = analysis.page_count as f64;

    SmartPreset {
        id: category.id().to_string(),
        name: template.name.to_string(),
        description: template.description.to_string(),
        category,
        characteristics: PresetCharacteristics {
            priority: template.priority,
            aggressiveness: template.aggressiveness,
            target_use_case: catalog::target_use_case(category).to_string(),
            recommended_for: owned(catalog::recommended_for(category)),
            not_recommended_for: owned(catalog::not_recommended_for(category)),
        },
        settings: preset_settings(template, analysis),
        predictions: PresetPredictions {
            expected_size_reduction_pct: (20.0 + level * 40.0 + analysis.image_byte_ratio() * 15.0)
                .min(75.0),
            expected_quality_score: (1.0 - level * 0.6).max(0.3),
            processing_time_sec: (pages * (0.5 + level * 1.5)).max(1.0),
            confidence_score: confidence(category_confidence),
        },
        display: PresetDisplay {
            icon: template.icon.to_string(),
            color: template.color.to_string(),
            tags: tags(template, analysis),
            difficulty: Difficulty::from(template.aggressiveness),
        },
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tags(template: &PresetTemplate, analysis: &ContentAnalysis) -> Vec<String> {
    let mut tags = vec![template.priority.as_str().to_string()];
    if template.aggressiveness == Aggressiveness::Aggressive {
        tags.push("max-compression".to_string());
    }
    match template.category {
        PresetCategory::Web => tags.push("fast-loading".to_string()),
        PresetCategory::Print => tags.push("print-quality".to_string()),
        _ => {}
    }
    if analysis.images.count > 10 {
        tags.push("image-heavy".to_string());
    }
    if analysis.page_count > 50 {
        tags.push("large-document".to_string());
    }
    tags
}

// -- Category affinity -------------------------------------------------------------

fn classifier_features(a: &ContentAnalysis) -> Vec<f64> {
    let rec = &a.recommendation;
    vec![
        a.text.density,
        a.text.complexity,
        a.text.readability,
        unit(a.images.count as f64 / 20.0),
        a.images.compression_potential,
        unit(a.vectors.count as f64 / 50.0),
        a.vectors.complexity,
        a.vectors.optimizable,
        unit(a.page_count as f64 / 100.0),
        unit(a.total_file_size_bytes as f64 / 10_000_000.0),
        unit(a.images_per_page() / 5.0),
        unit(a.vectors_per_page() / 20.0),
        a.image_byte_ratio(),
        rec.optimal_compression_level,
        if rec.preserve_quality { 1.0 } else { 0.0 },
        rec.confidence_score,
    ]
}

/// Per-category confidence, indexed like `PresetCategory::ALL`.
///
/// The classifier's affinities sum to one, so each is offset by 0.5 before
/// clamping; a flat affinity then lands near 0.67 rather than on the floor.
fn classify(models: &PresetModels, analysis: &ContentAnalysis) -> Result<[f64; 6]> {
    let affinity = models.classifier.score(&classifier_features(analysis))?;
    let mut out = [FLAT_CONFIDENCE; 6];
    for (slot, value) in out.iter_mut().zip(affinity) {
        *slot = confidence(0.5 + value);
    }
    Ok(out)
}

// -- Matching ----------------------------------------------------------------------

/// Whether the document's content suits the category.
pub fn category_fit(category: PresetCategory, analysis: &ContentAnalysis) -> bool {
    let images_per_page = analysis.images_per_page();
    match category {
        PresetCategory::Web | PresetCategory::Mobile => images_per_page > 1.0,
        PresetCategory::Print => analysis.recommendation.preserve_quality,
        PresetCategory::Archive => analysis.page_count > 50 && images_per_page <= 1.0,
        PresetCategory::Presentation => analysis.vectors.count > 10,
        PresetCategory::Document => analysis.text.density > 0.7 && images_per_page < 0.5,
    }
}

/// Whether the preset serves the requested device.
pub fn device_matches(category: PresetCategory, device: Option<DeviceTarget>) -> bool {
    matches!(
        (device, category),
        (Some(DeviceTarget::Mobile), PresetCategory::Mobile)
            | (Some(DeviceTarget::Print), PresetCategory::Print)
            | (Some(DeviceTarget::Web), PresetCategory::Web)
            | (
                Some(DeviceTarget::Desktop),
                PresetCategory::Document | PresetCategory::Presentation
            )
    )
}

fn matcher_features(
    preset: &SmartPreset,
    a: &ContentAnalysis,
    prefs: &UserPreferences,
) -> Vec<f64> {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let c = &preset.characteristics;
    vec![
        c.priority.encode(),
        c.aggressiveness.encode(),
        prefs.priority.encode(),
        flag(c.priority == prefs.priority),
        flag(device_matches(preset.category, prefs.device_target)),
        flag(prefs.aggressive_mode),
        flag(prefs.preserve_readability),
        flag(category_fit(preset.category, a)),
        unit(preset.predictions.expected_size_reduction_pct / 100.0),
        preset.predictions.expected_quality_score,
        preset.predictions.confidence_score,
        a.text.density,
        a.text.readability,
        unit(a.images.count as f64 / 20.0),
        a.images.compression_potential,
        unit(a.vectors.count as f64 / 50.0),
        unit(a.page_count as f64 / 100.0),
        unit(a.total_file_size_bytes as f64 / 10_000_000.0),
        unit(a.images_per_page() / 5.0),
        a.image_byte_ratio(),
    ]
}

fn match_scores(
    models: &PresetModels,
    presets: &[SmartPreset],
    analysis: &ContentAnalysis,
    prefs: &UserPreferences,
) -> Result<Vec<f64>> {
    presets
        .iter()
        .map(|preset| {
            let out = models.matcher.score(&matcher_features(preset, analysis, prefs))?;
            Ok(unit(out[0]))
        })
        .collect()
}

/// Match score from explicit preference equality alone.
pub fn fallback_match_score(preset: &SmartPreset, prefs: &UserPreferences) -> f64 {
    let mut score: f64 = 0.5;
    if preset.characteristics.priority == prefs.priority {
        score += 0.2;
    }
    if device_matches(preset.category, prefs.device_target) {
        score += 0.3;
    }
    score.min(1.0)
}

fn fallback_match_scores(presets: &[SmartPreset], prefs: &UserPreferences) -> Vec<f64> {
    presets
        .iter()
        .map(|preset| fallback_match_score(preset, prefs))
        .collect()
}

// -- Explanations ------------------------------------------------------------------

fn reasoning(preset: &SmartPreset, analysis: &ContentAnalysis, prefs: &UserPreferences) -> Vec<String> {
    let p = &preset.predictions;
    let mut out = vec![format!("{} preset selected", preset.name)];
    if p.expected_size_reduction_pct > 40.0 {
        out.push(format!(
            "High compression expected ({:.0}%)",
            p.expected_size_reduction_pct
        ));
    }
    if p.expected_quality_score > 0.8 {
        out.push("Quality will be preserved".to_string());
    }
    if analysis.images.count > 5 {
        out.push("Many images detected; image optimisation applies".to_string());
    }
    if prefs.priority == preset.characteristics.priority {
        out.push("Matches your stated priority".to_string());
    }
    out
}

fn warnings(preset: &SmartPreset, analysis: &ContentAnalysis) -> Vec<String> {
    let c = &preset.characteristics;
    let mut out = Vec::new();
    if c.aggressiveness == Aggressiveness::Aggressive {
        out.push("Aggressive compression; some quality loss is possible".to_string());
    }
    if preset.predictions.expected_quality_score < 0.6 {
        out.push("Significant quality loss expected".to_string());
    }
    if analysis.text.readability < 0.6 && c.priority == Priority::Size {
        out.push("Scanned or OCR text detected; text quality may suffer".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{self, DocumentAggregate};
    use crate::scoring::HeuristicBackend;
    use crate::scoring::testing::{FaultyBackend, all_failing};
    use kompressor_core::PageSignal;

    fn analysis(pages: usize, text: usize, images: usize, vectors: usize, size: u64) -> ContentAnalysis {
        let page = PageSignal {
            text_item_count: text,
            image_paint_ops: images,
            vector_ops: vectors,
        };
        analyzer::fallback(&DocumentAggregate::from_pages(size, vec![Some(page); pages]))
    }

    async fn ready(backend: &dyn ScoringBackend) -> PresetGenerator {
        let mut generator = PresetGenerator::new(true, 3);
        generator.initialize(backend).await.unwrap();
        generator
    }

    #[tokio::test]
    async fn six_presets_sorted_by_confidence() {
        let generator = ready(&HeuristicBackend).await;
        let presets = generator.generate_all(&analysis(3, 80, 0, 0, 90_000)).unwrap();

        assert_eq!(presets.len(), 6);
        for category in PresetCategory::ALL {
            assert_eq!(presets.iter().filter(|p| p.category == category).count(), 1);
        }
        assert!(presets.windows(2).all(|w| {
            w[0].predictions.confidence_score >= w[1].predictions.confidence_score
        }));
        assert!(presets.iter().all(|p| p.settings.is_range_valid()));
    }

    #[tokio::test]
    async fn classification_failure_gives_flat_confidence() {
        let backend = FaultyBackend {
            failing: vec![ModelKind::PresetClassifier],
        };
        let generator = ready(&backend).await;
        let presets = generator.generate_all(&analysis(2, 50, 1, 1, 200_000)).unwrap();
        assert!(presets.iter().all(|p| p.predictions.confidence_score == FLAT_CONFIDENCE));
        let ids: Vec<_> = presets.iter().map(|p| p.category).collect();
        assert_eq!(ids, PresetCategory::ALL.to_vec());
    }

    #[test]
    fn print_keeps_higher_dpi_than_web() {
        let a = analysis(5, 40, 2, 0, 1_000_000);
        let print = preset_settings(catalog::template(PresetCategory::Print), &a);
        let web = preset_settings(catalog::template(PresetCategory::Web), &a);
        let mobile = preset_settings(catalog::template(PresetCategory::Mobile), &a);

        assert_eq!(print.images.target_dpi, 300);
        assert_eq!(web.images.target_dpi, 200);
        assert_eq!(mobile.images.target_dpi, 150);
        assert!(print.text.embed_fonts);
        assert!(mobile.images.downscale);
        assert!(web.structural.linearize);
    }

    #[test]
    fn archive_keeps_metadata_and_is_medium_risk() {
        let a = analysis(60, 40, 0, 0, 5_000_000);
        let archive = build_preset(catalog::template(PresetCategory::Archive), &a, 0.7);
        assert!(!archive.settings.structural.remove_metadata);
        assert_eq!(archive.settings.insights.risk_level, RiskLevel::Medium);
        assert_eq!(archive.display.difficulty, Difficulty::Advanced);
        assert!(archive.display.tags.contains(&"max-compression".to_string()));
        assert!(archive.display.tags.contains(&"large-document".to_string()));
    }

    #[test]
    fn preset_prediction_formulas() {
        let a = analysis(4, 40, 0, 0, 400_000);
        let document = build_preset(catalog::template(PresetCategory::Document), &a, 0.99);
        let p = &document.predictions;
        assert!((p.expected_size_reduction_pct - 44.0).abs() < 1e-9);
        assert!((p.expected_quality_score - 0.64).abs() < 1e-9);
        assert!((p.processing_time_sec - 5.6).abs() < 1e-9);
        assert_eq!(p.confidence_score, 0.95);
    }

    #[test]
    fn fallback_match_rules() {
        let a = analysis(1, 90, 0, 0, 50_000);
        let mobile = build_preset(catalog::template(PresetCategory::Mobile), &a, 0.6);
        let prefs = UserPreferences {
            device_target: Some(DeviceTarget::Mobile),
            ..UserPreferences::with_priority(Priority::Size)
        };
        assert_eq!(fallback_match_score(&mobile, &prefs), 1.0);
        assert_eq!(fallback_match_score(&mobile, &UserPreferences::default()), 0.5);
    }

    #[tokio::test]
    async fn text_document_recommends_document_preset() {
        let generator = ready(&HeuristicBackend).await;
        let rec = generator
            .recommend_best(&analysis(1, 90, 0, 0, 50_000), &UserPreferences::default())
            .unwrap();
        assert_eq!(rec.preset.category, PresetCategory::Document);
        assert_eq!(rec.alternatives.len(), 3);
        assert!(rec.reasoning[0].contains("Document Standard"));
        assert!((0.0..=1.0).contains(&rec.match_score));
    }

    #[tokio::test]
    async fn matcher_failure_uses_preference_rules() {
        let backend = FaultyBackend {
            failing: vec![ModelKind::PresetMatcher],
        };
        let generator = ready(&backend).await;
        let prefs = UserPreferences {
            device_target: Some(DeviceTarget::Print),
            ..UserPreferences::with_priority(Priority::Quality)
        };
        let rec = generator.recommend_best(&analysis(3, 40, 1, 0, 300_000), &prefs).unwrap();
        assert_eq!(rec.preset.category, PresetCategory::Print);
        assert_eq!(rec.match_score, 1.0);
    }

    #[tokio::test]
    async fn fully_failing_backend_still_recommends() {
        let generator = ready(&all_failing()).await;
        let a = analysis(2, 30, 0, 0, 100_000);
        let first = generator.recommend_best(&a, &UserPreferences::default()).unwrap();
        let second = generator.recommend_best(&a, &UserPreferences::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.alternatives.len() <= 3);
    }

    #[test]
    fn warnings_flag_size_presets_on_scanned_text() {
        let mut a = analysis(1, 10, 3, 0, 400_000);
        a.text.readability = 0.4;
        let archive = build_preset(catalog::template(PresetCategory::Archive), &a, 0.6);
        let found = warnings(&archive, &a);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn generate_all_requires_initialization() {
        let generator = PresetGenerator::new(true, 3);
        assert!(matches!(
            generator.generate_all(&analysis(1, 10, 0, 0, 1_000)),
            Err(EngineError::NotInitialized(COMPONENT))
        ));
    }
}
