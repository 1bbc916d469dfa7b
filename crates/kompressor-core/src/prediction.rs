// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size / quality / risk predictions for a (analysis, settings) pair.

use serde::{Deserialize, Serialize};

use crate::types::{ComplexityTier, RiskLevel, bounded, unit};

/// Per-content-type caps on the size-reduction breakdown, in percent.
pub const BREAKDOWN_CAPS: SizeBreakdown = SizeBreakdown {
    images: 60.0,
    text: 30.0,
    vectors: 20.0,
    metadata: 10.0,
};

/// Contribution of each content type to the size reduction, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBreakdown {
    pub images: f64,
    pub text: f64,
    pub vectors: f64,
    pub metadata: f64,
}

impl SizeBreakdown {
    pub fn total(&self) -> f64 {
        self.images + self.text + self.vectors + self.metadata
    }

    /// Clamp each share to its cap, then scale down so the total is at most 100.
    pub fn normalized(self) -> Self {
        let caps = BREAKDOWN_CAPS;
        let capped = Self {
            images: bounded(self.images, 0.0, caps.images),
            text: bounded(self.text, 0.0, caps.text),
            vectors: bounded(self.vectors, 0.0, caps.vectors),
            metadata: bounded(self.metadata, 0.0, caps.metadata),
        };
        let total = capped.total();
        if total <= 100.0 {
            return capped;
        }
        let scale = 100.0 / total;
        Self {
            images: capped.images * scale,
            text: capped.text * scale,
            vectors: capped.vectors * scale,
            metadata: capped.metadata * scale,
        }
    }

    pub fn within_caps(&self) -> bool {
        let caps = BREAKDOWN_CAPS;
        (0.0..=caps.images).contains(&self.images)
            && (0.0..=caps.text).contains(&self.text)
            && (0.0..=caps.vectors).contains(&self.vectors)
            && (0.0..=caps.metadata).contains(&self.metadata)
            && self.total() <= 100.0 + 1e-9
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReduction {
    /// Percent, in `[5, 80]`.
    pub estimated_pct: f64,
    pub estimated_final_size_bytes: u64,
    /// In `[0.5, 0.95]`.
    pub confidence_level: f64,
    pub breakdown: SizeBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub image_quality: f64,
    pub text_sharpness: f64,
    pub vector_precision: f64,
    pub color_accuracy: f64,
}

/// Quality scores; 1.0 means no loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityImpact {
    pub overall: f64,
    pub visual: f64,
    pub text_readability: f64,
    pub print: f64,
    pub breakdown: QualityBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    pub processing_time_sec: f64,
    pub memory_usage_mb: f64,
    pub complexity: ComplexityTier,
    pub optimized_for_web: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub potential_issues: Vec<String>,
    /// Whether the original can be recovered losslessly.
    pub reversible: bool,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// Original / compressed, always `>= 1`.
    pub compression_ratio: f64,
    /// Bits saved per original byte.
    pub bit_rate_reduction: f64,
    pub structural_optimization: f64,
    pub accessibility_preservation: f64,
    pub searchability_preservation: f64,
}

/// Predicted outcome of applying a settings bundle to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityPrediction {
    pub size_reduction: SizeReduction,
    pub quality_impact: QualityImpact,
    pub performance: PerformanceEstimate,
    pub risk: RiskAssessment,
    pub advanced: AdvancedMetrics,
}

impl QualityPrediction {
    pub fn is_range_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        let q = &self.quality_impact;
        let a = &self.advanced;
        (5.0..=80.0).contains(&self.size_reduction.estimated_pct)
            && (0.5..=0.95).contains(&self.size_reduction.confidence_level)
            && self.size_reduction.breakdown.within_caps()
            && in_unit(q.overall)
            && in_unit(q.visual)
            && in_unit(q.text_readability)
            && in_unit(q.print)
            && in_unit(q.breakdown.image_quality)
            && in_unit(q.breakdown.text_sharpness)
            && in_unit(q.breakdown.vector_precision)
            && in_unit(q.breakdown.color_accuracy)
            && self.performance.processing_time_sec >= 0.0
            && self.performance.memory_usage_mb >= 0.0
            && a.compression_ratio >= 1.0
            && in_unit(a.structural_optimization)
            && in_unit(a.accessibility_preservation)
            && in_unit(a.searchability_preservation)
    }
}

/// Compression ratio for a fractional reduction in `[0, 1)`.
pub fn compression_ratio(reduction: f64) -> f64 {
    1.0 / (1.0 - bounded(reduction, 0.0, 0.99))
}

/// Estimated output size for a fractional reduction.
pub fn final_size(original_bytes: u64, reduction: f64) -> u64 {
    (original_bytes as f64 * (1.0 - unit(reduction))).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_is_capped_per_type() {
        let raw = SizeBreakdown {
            images: 90.0,
            text: 10.0,
            vectors: -5.0,
            metadata: 4.0,
        };
        let normalized = raw.normalized();
        assert_eq!(normalized.images, 60.0);
        assert_eq!(normalized.vectors, 0.0);
        assert!(normalized.within_caps());
    }

    #[test]
    fn breakdown_total_is_scaled_to_one_hundred() {
        let normalized = BREAKDOWN_CAPS.normalized();
        assert!((normalized.total() - 100.0).abs() < 1e-9);
        assert!(normalized.within_caps());
        assert!(normalized.images < 60.0);
    }

    #[test]
    fn ratio_and_final_size() {
        assert!((compression_ratio(0.5) - 2.0).abs() < 1e-12);
        assert_eq!(compression_ratio(0.0), 1.0);
        assert_eq!(final_size(1_000, 0.25), 750);
    }
}
