// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kompressor — Core value types, errors and configuration shared by the
// document reader and the recommendation engine.

pub mod analysis;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod prediction;
pub mod preset;
pub mod reader;
pub mod settings;
pub mod types;

pub use analysis::ContentAnalysis;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use prediction::QualityPrediction;
pub use preset::{PresetCategory, PresetRecommendation, SmartPreset};
pub use reader::{PageSignal, SignalDocument, StructuralReader};
pub use settings::CompressionSettings;
pub use types::*;
