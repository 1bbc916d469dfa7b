// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared domain enums, identifiers and numeric helpers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one `process_file` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    PlainText,
    /// Office formats that must be converted before analysis.
    Office,
}

impl DocumentType {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::PlainText => "text/plain",
            Self::Office => "application/octet-stream",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "txt" => Some(Self::PlainText),
            "docx" | "doc" | "xlsx" | "xls" | "pptx" | "ppt" | "odt" | "ods" => {
                Some(Self::Office)
            }
            _ => None,
        }
    }

    /// Whether the recommendation engine can analyse this type.
    pub fn is_analysable(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// What the user wants to optimise for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Size,
    Quality,
    #[default]
    Balanced,
}

impl Priority {
    /// Numeric encoding used in feature vectors (size=1, quality=0, balanced=0.5).
    pub fn encode(&self) -> f64 {
        match self {
            Self::Size => 1.0,
            Self::Quality => 0.0,
            Self::Balanced => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Quality => "quality",
            Self::Balanced => "balanced",
        }
    }
}

/// How hard a preset pushes compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Conservative,
    Moderate,
    Aggressive,
}

impl Aggressiveness {
    /// Global compression level implied by this tier.
    pub fn compression_level(&self) -> f64 {
        match self {
            Self::Conservative => 0.3,
            Self::Moderate => 0.6,
            Self::Aggressive => 0.85,
        }
    }

    /// Numeric encoding used in feature vectors.
    pub fn encode(&self) -> f64 {
        match self {
            Self::Conservative => 0.0,
            Self::Moderate => 0.5,
            Self::Aggressive => 1.0,
        }
    }
}

/// Three-way risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a scored risk value: `<0.3` low, `<0.7` medium, else high.
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Self::Low
        } else if score < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Processing complexity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
}

/// Target image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Auto,
    Jpeg,
    Png,
    Webp,
}

/// Device the compressed document is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTarget {
    Desktop,
    Mobile,
    Print,
    Web,
}

/// Dominant content of a document, as reported by quick analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    TextHeavy,
    ImageHeavy,
    VectorHeavy,
    Mixed,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextHeavy => "text-heavy",
            Self::ImageHeavy => "image-heavy",
            Self::VectorHeavy => "vector-heavy",
            Self::Mixed => "mixed",
        }
    }
}

/// User intent passed into settings generation and preset matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub priority: Priority,
    #[serde(default)]
    pub aggressive_mode: bool,
    #[serde(default)]
    pub preserve_readability: bool,
    #[serde(default)]
    pub device_target: Option<DeviceTarget>,
    #[serde(default)]
    pub use_case: Option<String>,
}

impl UserPreferences {
    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }
}

/// Clamp `value` into `[lo, hi]`, mapping NaN to `lo`.
pub fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

/// Clamp into `[0, 1]`.
pub fn unit(value: f64) -> f64 {
    bounded(value, 0.0, 1.0)
}

/// Bound a confidence score into `[0.5, 0.95]`.
pub fn confidence(value: f64) -> f64 {
    bounded(value, 0.5, 0.95)
}

/// `num / den`, treating a zero denominator as one.
pub fn per(num: f64, den: f64) -> f64 {
    num / den.max(1.0)
}
