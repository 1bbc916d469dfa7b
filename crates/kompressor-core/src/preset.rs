// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smart presets — named, self-contained settings bundles — and the
// recommendation wrapper returned for a given user intent.

use serde::{Deserialize, Serialize};

use crate::settings::CompressionSettings;
use crate::types::{Aggressiveness, Priority};

/// The six canonical preset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Web,
    Print,
    Archive,
    Mobile,
    Presentation,
    Document,
}

impl PresetCategory {
    /// Canonical order; also the index order of the category affinity vector.
    pub const ALL: [PresetCategory; 6] = [
        Self::Web,
        Self::Print,
        Self::Archive,
        Self::Mobile,
        Self::Presentation,
        Self::Document,
    ];

    /// Stable preset id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Print => "print",
            Self::Archive => "archive",
            Self::Mobile => "mobile",
            Self::Presentation => "presentation",
            Self::Document => "document",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Position in [`PresetCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Web => 0,
            Self::Print => 1,
            Self::Archive => 2,
            Self::Mobile => 3,
            Self::Presentation => 4,
            Self::Document => 5,
        }
    }
}

impl std::fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// How much compression know-how a preset assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<Aggressiveness> for Difficulty {
    fn from(tier: Aggressiveness) -> Self {
        match tier {
            Aggressiveness::Conservative => Self::Beginner,
            Aggressiveness::Moderate => Self::Intermediate,
            Aggressiveness::Aggressive => Self::Advanced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetCharacteristics {
    pub priority: Priority,
    pub aggressiveness: Aggressiveness,
    pub target_use_case: String,
    pub recommended_for: Vec<String>,
    pub not_recommended_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetPredictions {
    pub expected_size_reduction_pct: f64,
    pub expected_quality_score: f64,
    pub processing_time_sec: f64,
    /// Category affinity, in `[0.5, 0.95]`.
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDisplay {
    pub icon: String,
    pub color: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
}

/// A named, ready-to-apply compression preset tailored to one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: PresetCategory,
    pub characteristics: PresetCharacteristics,
    pub settings: CompressionSettings,
    pub predictions: PresetPredictions,
    pub display: PresetDisplay,
}

/// Best preset for a user intent plus ranked runner-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecommendation {
    pub preset: SmartPreset,
    /// In `[0, 1]`.
    pub match_score: f64,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
    /// At most three.
    pub alternatives: Vec<SmartPreset>,
}
