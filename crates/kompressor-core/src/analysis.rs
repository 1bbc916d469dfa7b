// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content analysis record — the normalised structural characterisation of one
// document, produced once per analysis and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::types::{bounded, confidence, unit};

/// Text characterisation. Ratios are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProfile {
    /// Pages carrying the text (the document page count).
    pub pages: usize,
    /// Average text-item density per page.
    pub density: f64,
    /// Font / layout variety.
    pub complexity: f64,
    /// How cleanly the text reads (low for OCR output).
    pub readability: f64,
}

/// Embedded image characterisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProfile {
    pub count: usize,
    pub total_size_bytes: u64,
    pub average_resolution: f64,
    pub formats: Vec<String>,
    pub compression_potential: f64,
}

/// Vector graphics characterisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorProfile {
    pub count: usize,
    pub complexity: f64,
    pub optimizable: f64,
}

/// Coarse settings hint derived alongside the first-pass recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmartSettingsHint {
    pub image_quality: f64,
    pub text_optimization: bool,
    pub vector_optimization: bool,
    pub metadata_removal: bool,
}

/// First-pass compression recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecommendation {
    pub optimal_compression_level: f64,
    pub preserve_quality: bool,
    pub smart_settings: SmartSettingsHint,
    /// Percentage in `[0, 100]`.
    pub estimated_size_reduction_pct: f64,
    /// Always in `[0.5, 0.95]`.
    pub confidence_score: f64,
}

/// Normalised content analysis for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub page_count: usize,
    pub total_file_size_bytes: u64,
    pub text: TextProfile,
    pub images: ImageProfile,
    pub vectors: VectorProfile,
    pub recommendation: AnalysisRecommendation,
}

impl ContentAnalysis {
    /// Clamp every ratio into its declared range.
    ///
    /// Construction sites call this last so no out-of-range value escapes,
    /// whatever the scoring stage produced.
    pub fn normalized(mut self) -> Self {
        self.text.density = unit(self.text.density);
        self.text.complexity = unit(self.text.complexity);
        self.text.readability = unit(self.text.readability);
        self.images.compression_potential = unit(self.images.compression_potential);
        self.images.average_resolution = self.images.average_resolution.max(0.0);
        self.vectors.complexity = unit(self.vectors.complexity);
        self.vectors.optimizable = unit(self.vectors.optimizable);

        let rec = &mut self.recommendation;
        rec.optimal_compression_level = unit(rec.optimal_compression_level);
        rec.smart_settings.image_quality = unit(rec.smart_settings.image_quality);
        rec.estimated_size_reduction_pct = bounded(rec.estimated_size_reduction_pct, 0.0, 100.0);
        rec.confidence_score = confidence(rec.confidence_score);
        self
    }

    /// Images per page, with an empty document counted as one page.
    pub fn images_per_page(&self) -> f64 {
        crate::types::per(self.images.count as f64, self.page_count as f64)
    }

    /// Vector operators per page.
    pub fn vectors_per_page(&self) -> f64 {
        crate::types::per(self.vectors.count as f64, self.page_count as f64)
    }

    /// Share of the file taken up by image data, in `[0, 1]`.
    pub fn image_byte_ratio(&self) -> f64 {
        unit(crate::types::per(
            self.images.total_size_bytes as f64,
            self.total_file_size_bytes as f64,
        ))
    }

    /// Every ratio is in `[0, 1]` and confidence is in `[0.5, 0.95]`.
    pub fn is_range_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.text.density)
            && in_unit(self.text.complexity)
            && in_unit(self.text.readability)
            && in_unit(self.images.compression_potential)
            && in_unit(self.vectors.complexity)
            && in_unit(self.vectors.optimizable)
            && in_unit(self.recommendation.optimal_compression_level)
            && in_unit(self.recommendation.smart_settings.image_quality)
            && (0.0..=100.0).contains(&self.recommendation.estimated_size_reduction_pct)
            && (0.5..=0.95).contains(&self.recommendation.confidence_score)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_out_of_range_values() {
        let mut analysis = fixtures::sample();
        analysis.text.complexity = 1.7;
        analysis.vectors.optimizable = f64::NAN;
        analysis.recommendation.confidence_score = 0.99;
        analysis.recommendation.estimated_size_reduction_pct = 140.0;

        let analysis = analysis.normalized();
        assert_eq!(analysis.text.complexity, 1.0);
        assert_eq!(analysis.vectors.optimizable, 0.0);
        assert_eq!(analysis.recommendation.confidence_score, 0.95);
        assert_eq!(analysis.recommendation.estimated_size_reduction_pct, 100.0);
        assert!(analysis.is_range_valid());
    }

    #[test]
    fn ratios_tolerate_empty_denominators() {
        let mut analysis = fixtures::sample();
        analysis.page_count = 0;
        analysis.total_file_size_bytes = 0;
        assert_eq!(analysis.images_per_page(), 5.0);
        assert_eq!(analysis.image_byte_ratio(), 1.0);
    }
}
