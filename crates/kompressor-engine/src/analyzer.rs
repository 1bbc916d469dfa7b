// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content analyzer — reads per-page structural signals, aggregates them over
// the document and scores the aggregate into a `ContentAnalysis`.
//
// A page whose signal cannot be read contributes a neutral signal instead of
// failing the document. A scoring failure switches to closed-form heuristics,
// so once the document is readable `analyze` always returns a complete,
// range-valid record.

use kompressor_core::analysis::{
    AnalysisRecommendation, ImageProfile, SmartSettingsHint, TextProfile, VectorProfile,
};
use kompressor_core::error::{EngineError, Result};
use kompressor_core::{ContentAnalysis, PageSignal, StructuralReader, per, unit};
use tracing::{debug, info, instrument, warn};

use crate::scoring::{ModelHandle, ModelKind, ScoringBackend};

pub const COMPONENT: &str = "content analyzer";

/// Text items on a page that count as a fully dense page.
const TEXT_ITEMS_FOR_FULL_DENSITY: f64 = 100.0;
/// Density assumed for a page whose signal could not be read.
const NEUTRAL_DENSITY: f64 = 0.5;
/// Estimated encoded size of one painted image.
const BYTES_PER_IMAGE: u64 = 50_000;
/// Resolution reported for documents that contain images.
const ASSUMED_IMAGE_RESOLUTION: f64 = 1920.0;
/// Give other tasks a turn after this many pages.
const YIELD_EVERY_PAGES: usize = 64;

const MB: f64 = 1_000_000.0;

/// Document-level totals built from the per-page signals.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAggregate {
    pub page_count: usize,
    pub total_size: u64,
    /// Mean per-page text density in `[0, 1]`.
    pub text_density: f64,
    pub image_count: usize,
    pub image_bytes: u64,
    pub vector_count: usize,
    /// Pages that fell back to the neutral signal.
    pub unreadable_pages: usize,
}

impl DocumentAggregate {
    /// Fold per-page results into document totals. `Err` pages count as neutral.
    pub fn from_pages<I>(total_size: u64, pages: I) -> Self
    where
        I: IntoIterator<Item = Option<PageSignal>>,
    {
        let mut agg = Self {
            page_count: 0,
            total_size,
            text_density: 0.0,
            image_count: 0,
            image_bytes: 0,
            vector_count: 0,
            unreadable_pages: 0,
        };
        let mut density_sum = 0.0;

        for page in pages {
            agg.page_count += 1;
            match page {
                Some(signal) => {
                    density_sum += page_density(&signal);
                    agg.image_count += signal.image_paint_ops;
                    agg.image_bytes += signal.image_paint_ops as u64 * BYTES_PER_IMAGE;
                    agg.vector_count += signal.vector_ops;
                }
                None => {
                    density_sum += NEUTRAL_DENSITY;
                    agg.unreadable_pages += 1;
                }
            }
        }

        agg.text_density = unit(per(density_sum, agg.page_count as f64));
        agg
    }

    fn pages(&self) -> f64 {
        self.page_count as f64
    }

    fn images_per_page(&self) -> f64 {
        per(self.image_count as f64, self.pages())
    }

    fn vectors_per_page(&self) -> f64 {
        per(self.vector_count as f64, self.pages())
    }

    fn image_byte_ratio(&self) -> f64 {
        unit(per(self.image_bytes as f64, self.total_size as f64))
    }

    fn unreadable_share(&self) -> f64 {
        per(self.unreadable_pages as f64, self.pages())
    }
}

fn page_density(signal: &PageSignal) -> f64 {
    (signal.text_item_count as f64 / TEXT_ITEMS_FOR_FULL_DENSITY).min(1.0)
}

/// The scored quantities that shape a `ContentAnalysis`.
#[derive(Debug, Clone, Copy)]
struct Scores {
    complexity: f64,
    readability: f64,
    potential: f64,
    vector_complexity: f64,
    vector_optimizable: f64,
    level: f64,
    preserve_quality: bool,
    reduction: f64,
    confidence: f64,
}

struct AnalyzerModels {
    text: ModelHandle,
    graphics: ModelHandle,
    compression: ModelHandle,
}

/// Turns structural signals into a normalised content analysis.
pub struct ContentAnalyzer {
    enabled: bool,
    initialized: bool,
    models: Option<AnalyzerModels>,
}

impl ContentAnalyzer {
    /// A disabled analyzer loads no models and always uses heuristics.
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
            self.models = Some(AnalyzerModels {
                text: ModelHandle::load(backend, ModelKind::TextClassifier, COMPONENT)?,
                graphics: ModelHandle::load(backend, ModelKind::GraphicsAnalyzer, COMPONENT)?,
                compression: ModelHandle::load(backend, ModelKind::CompressionPredictor, COMPONENT)?,
            });
        }
        self.initialized = true;
        info!(models = self.models.is_some(), "content analyzer initialised");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether scoring models are loaded (false when disabled).
    pub fn has_models(&self) -> bool {
        self.models.is_some()
    }

    pub fn dispose(&mut self) {
        self.models = None;
        self.initialized = false;
        debug!("content analyzer disposed");
    }

    // -- Analysis -------------------------------------------------------------

    /// Analyse a document.
    ///
    /// Fails only when the analyzer is not initialised; unreadable pages and
    /// scoring failures are absorbed.
    #[instrument(skip_all, fields(document = document.name(), pages = document.page_count()))]
    pub async fn analyze(&self, document: &dyn StructuralReader) -> Result<ContentAnalysis> {
        if !self.initialized {
            return Err(EngineError::NotInitialized(COMPONENT));
        }

        let page_count = document.page_count();
        let mut signals = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            match document.page_signal(page_index) {
                Ok(signal) => signals.push(Some(signal)),
                Err(err) => {
                    warn!(page_index, error = %err, "page signal unavailable, using neutral signal");
                    signals.push(None);
                }
            }
            if (page_index + 1) % YIELD_EVERY_PAGES == 0 {
                tokio::task::yield_now().await;
            }
        }

        let aggregate = DocumentAggregate::from_pages(document.total_size(), signals);
        debug!(
            density = aggregate.text_density,
            images = aggregate.image_count,
            vectors = aggregate.vector_count,
            unreadable = aggregate.unreadable_pages,
            "document aggregated"
        );
        Ok(self.analyze_aggregate(&aggregate))
    }

    /// Score an aggregate, falling back to heuristics on any scoring error.
    pub fn analyze_aggregate(&self, aggregate: &DocumentAggregate) -> ContentAnalysis {
        match self.models.as_ref().map(|models| scored(models, aggregate)) {
            Some(Ok(analysis)) => analysis,
            Some(Err(err)) => {
                warn!(error = %err, "content scoring failed, using heuristic analysis");
                fallback(aggregate)
            }
            None => fallback(aggregate),
        }
    }
}

// -- Feature vectors ---------------------------------------------------------------

fn text_features(agg: &DocumentAggregate) -> Vec<f64> {
    let pages = agg.pages();
    vec![
        agg.text_density,
        unit(pages / 100.0),
        unit(agg.total_size as f64 / (10.0 * MB)),
        unit((pages + 1.0).ln() / 10.0),
        unit(agg.text_density * pages / 10.0),
        unit(agg.images_per_page() / 5.0),
        unit(agg.vectors_per_page() / 20.0),
        agg.image_byte_ratio(),
        unit(agg.vector_count as f64 / 50.0),
        agg.unreadable_share(),
    ]
}

fn graphics_features(agg: &DocumentAggregate) -> Vec<f64> {
    vec![
        unit(agg.image_count as f64 / 20.0),
        unit(agg.image_bytes as f64 / (10.0 * MB)),
        unit(per(agg.image_bytes as f64, agg.image_count as f64) / 500_000.0),
        unit(agg.images_per_page() / 5.0),
        agg.image_byte_ratio(),
        unit(agg.vector_count as f64 / 50.0),
        unit(agg.vectors_per_page() / 20.0),
        unit(agg.pages() / 100.0),
    ]
}

fn compression_features(
    agg: &DocumentAggregate,
    complexity: f64,
    readability: f64,
    potential: f64,
) -> Vec<f64> {
    let pages = agg.pages();
    let image_dominant = agg.image_count > agg.page_count * 2;
    vec![
        agg.text_density,
        unit(agg.image_count as f64 / 20.0),
        unit(agg.vector_count as f64 / 50.0),
        unit(pages / 100.0),
        unit(agg.total_size as f64 / (10.0 * MB)),
        agg.image_byte_ratio(),
        unit(agg.images_per_page() / 5.0),
        unit(agg.vectors_per_page() / 20.0),
        unit((agg.total_size as f64 + 1.0).ln() / 20.0),
        unit(agg.text_density * pages / 20.0),
        complexity,
        readability,
        potential,
        agg.unreadable_share(),
        if image_dominant { 1.0 } else { 0.0 },
    ]
}

// -- Scoring paths -----------------------------------------------------------------

fn scored(models: &AnalyzerModels, agg: &DocumentAggregate) -> Result<ContentAnalysis> {
    let text = models.text.score(&text_features(agg))?;
    let graphics = models.graphics.score(&graphics_features(agg))?;
    let compression = models
        .compression
        .score(&compression_features(agg, text[1], text[2], graphics[0]))?;

    Ok(assemble(
        agg,
        Scores {
            complexity: text[1],
            readability: text[2],
            potential: graphics[0],
            vector_complexity: graphics[1],
            vector_optimizable: graphics[2],
            level: compression[0],
            preserve_quality: compression[4] > 0.5,
            reduction: compression[2],
            confidence: compression[3],
        },
    ))
}

/// Closed-form analysis used when scoring is unavailable.
pub fn fallback(agg: &DocumentAggregate) -> ContentAnalysis {
    let density = agg.text_density;
    let images_per_page = agg.images_per_page();

    assemble(
        agg,
        Scores {
            complexity: (density * 1.2).min(1.0),
            readability: (1.0 - density * 0.5).max(0.3),
            potential: if agg.image_count > 0 { 0.7 } else { 0.1 },
            vector_complexity: (agg.vector_count as f64 / 10.0).min(1.0),
            vector_optimizable: if agg.vector_count > 0 { 0.6 } else { 0.0 },
            level: (0.5 + images_per_page * 0.2).clamp(0.3, 0.8),
            preserve_quality: agg.image_count > agg.page_count * 2,
            reduction: (0.3 + images_per_page * 0.3).min(0.7),
            confidence: 0.75,
        },
    )
}

fn assemble(agg: &DocumentAggregate, s: Scores) -> ContentAnalysis {
    let has_images = agg.image_count > 0;

    ContentAnalysis {
        page_count: agg.page_count,
        total_file_size_bytes: agg.total_size,
        text: TextProfile {
            pages: agg.page_count,
            density: agg.text_density,
            complexity: s.complexity,
            readability: s.readability,
        },
        images: ImageProfile {
            count: agg.image_count,
            total_size_bytes: agg.image_bytes,
            average_resolution: if has_images { ASSUMED_IMAGE_RESOLUTION } else { 0.0 },
            formats: if has_images {
                vec!["JPEG".to_string(), "PNG".to_string()]
            } else {
                Vec::new()
            },
            compression_potential: s.potential,
        },
        vectors: VectorProfile {
            count: agg.vector_count,
            complexity: s.vector_complexity,
            optimizable: s.vector_optimizable,
        },
        recommendation: AnalysisRecommendation {
            optimal_compression_level: s.level,
            preserve_quality: s.preserve_quality,
            smart_settings: SmartSettingsHint {
                image_quality: (1.0 - s.level).max(0.3),
                text_optimization: s.complexity < 0.7,
                vector_optimization: s.vector_optimizable > 0.6,
                metadata_removal: true,
            },
            estimated_size_reduction_pct: s.reduction * 100.0,
            confidence_score: s.confidence,
        },
    }
    .normalized()
}
