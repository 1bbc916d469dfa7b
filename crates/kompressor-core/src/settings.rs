// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Concrete per-content-type compression settings, ready to hand to the
// byte-level compressor.

use serde::{Deserialize, Serialize};

use crate::types::{ImageFormat, Priority, RiskLevel, bounded, confidence, unit};

/// Inclusive bounds of `GlobalSettings::compression_level`.
pub const COMPRESSION_LEVEL_RANGE: (f64, f64) = (0.1, 0.95);
/// Inclusive bounds of `SettingsPredictions::expected_size_reduction_pct`.
pub const SIZE_REDUCTION_RANGE: (f64, f64) = (5.0, 80.0);
/// Inclusive bounds of `SettingsPredictions::expected_quality_loss_pct`.
pub const QUALITY_LOSS_RANGE: (f64, f64) = (0.0, 30.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub compression_level: f64,
    pub preserve_quality: bool,
    pub aggressive_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSettings {
    pub font_subsetting: bool,
    pub embed_fonts: bool,
    pub optimize_text: bool,
    pub text_compression: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    pub quality: f64,
    pub downscale: bool,
    pub target_dpi: u32,
    pub format: ImageFormat,
    pub progressive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSettings {
    pub simplification: f64,
    pub precision_digits: u8,
    pub remove_invisible: bool,
    pub optimize_paths: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralSettings {
    pub remove_metadata: bool,
    pub remove_comments: bool,
    pub remove_unused_resources: bool,
    pub linearize: bool,
    pub cross_reference_streams: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPredictions {
    pub expected_size_reduction_pct: f64,
    pub expected_quality_loss_pct: f64,
    pub processing_time_sec: f64,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsInsights {
    pub primary_target: Priority,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

impl SettingsInsights {
    /// Insights placeholder used before the rule layer runs.
    pub fn pending(primary_target: Priority) -> Self {
        Self {
            primary_target,
            risk_level: RiskLevel::Low,
            recommendations: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Complete compression settings for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub global: GlobalSettings,
    pub text: TextSettings,
    pub images: ImageSettings,
    pub vectors: VectorSettings,
    pub structural: StructuralSettings,
    pub predictions: SettingsPredictions,
    pub insights: SettingsInsights,
}

impl CompressionSettings {
    /// Clamp every numeric field into its declared range.
    pub fn normalized(mut self) -> Self {
        let (lo, hi) = COMPRESSION_LEVEL_RANGE;
        self.global.compression_level = bounded(self.global.compression_level, lo, hi);
        self.text.text_compression = unit(self.text.text_compression);
        self.images.quality = unit(self.images.quality);
        self.vectors.simplification = unit(self.vectors.simplification);

        let p = &mut self.predictions;
        let (lo, hi) = SIZE_REDUCTION_RANGE;
        p.expected_size_reduction_pct = bounded(p.expected_size_reduction_pct, lo, hi);
        let (lo, hi) = QUALITY_LOSS_RANGE;
        p.expected_quality_loss_pct = bounded(p.expected_quality_loss_pct, lo, hi);
        p.processing_time_sec = bounded(p.processing_time_sec, 0.0, f64::MAX);
        p.confidence_score = confidence(p.confidence_score);
        self
    }

    pub fn is_range_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        let (lo, hi) = COMPRESSION_LEVEL_RANGE;
        let (size_lo, size_hi) = SIZE_REDUCTION_RANGE;
        let (loss_lo, loss_hi) = QUALITY_LOSS_RANGE;
        (lo..=hi).contains(&self.global.compression_level)
            && in_unit(self.text.text_compression)
            && in_unit(self.images.quality)
            && in_unit(self.vectors.simplification)
            && (size_lo..=size_hi).contains(&self.predictions.expected_size_reduction_pct)
            && (loss_lo..=loss_hi).contains(&self.predictions.expected_quality_loss_pct)
            && self.predictions.processing_time_sec >= 0.0
            && (0.5..=0.95).contains(&self.predictions.confidence_score)
    }
}
