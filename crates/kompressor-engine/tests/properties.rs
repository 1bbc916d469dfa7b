// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Range properties of the full pipeline over arbitrary documents.

use kompressor_core::{
    DeviceTarget, EngineConfig, PageSignal, Priority, SignalDocument, UserPreferences,
};
use kompressor_engine::{Engine, ProcessingResult};
use proptest::prelude::*;

fn page() -> impl Strategy<Value = PageSignal> {
    (0usize..300, 0usize..6, 0usize..60).prop_map(|(text, images, vectors)| PageSignal {
        text_item_count: text,
        image_paint_ops: images,
        vector_ops: vectors,
    })
}

fn preferences() -> impl Strategy<Value = UserPreferences> {
    (
        prop::sample::select(vec![Priority::Size, Priority::Quality, Priority::Balanced]),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(prop::sample::select(vec![
            DeviceTarget::Desktop,
            DeviceTarget::Mobile,
            DeviceTarget::Print,
            DeviceTarget::Web,
        ])),
    )
        .prop_map(|(priority, aggressive_mode, preserve_readability, device_target)| {
            UserPreferences {
                priority,
                aggressive_mode,
                preserve_readability,
                device_target,
                use_case: None,
            }
        })
}

fn process(config: EngineConfig, doc: &SignalDocument, prefs: &UserPreferences) -> ProcessingResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(async {
        let engine = Engine::new(config).unwrap();
        engine.process_file(doc, prefs).await.unwrap()
    })
}

fn check_ranges(result: &ProcessingResult) -> Result<(), TestCaseError> {
    prop_assert!(result.analysis.is_range_valid());
    prop_assert!(result.settings.is_range_valid());
    prop_assert!(result.prediction.is_range_valid());
    prop_assert!(result.prediction.size_reduction.breakdown.within_caps());
    prop_assert!((0.5..=0.95).contains(&result.confidence));
    prop_assert!((0.0..=1.0).contains(&result.recommendation.match_score));
    prop_assert_eq!(result.presets.len(), 6);
    for preset in &result.presets {
        prop_assert!((0.5..=0.95).contains(&preset.predictions.confidence_score));
        prop_assert!(preset.settings.is_range_valid());
    }
    prop_assert!(result.summary.recommendations.len() <= 5);
    prop_assert!(result.summary.warnings.len() <= 3);
    prop_assert!(result.summary.insights.len() <= 4);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scored_pipeline_stays_in_range(
        pages in prop::collection::vec(page(), 1..40),
        size in 1u64..200_000_000,
        prefs in preferences(),
    ) {
        let doc = SignalDocument::new("prop.pdf", size);
        let doc = pages.into_iter().fold(doc, SignalDocument::with_page);
        let result = process(EngineConfig::default(), &doc, &prefs);
        check_ranges(&result)?;
    }

    #[test]
    fn rule_based_pipeline_stays_in_range(
        pages in prop::collection::vec(page(), 1..40),
        size in 1u64..200_000_000,
        prefs in preferences(),
    ) {
        let config = EngineConfig {
            enable_analyzer: false,
            enable_optimizer: false,
            enable_quality_predictor: false,
            enable_smart_presets: false,
            ..EngineConfig::default()
        };
        let doc = SignalDocument::new("prop.pdf", size);
        let doc = pages.into_iter().fold(doc, SignalDocument::with_page);
        let result = process(config, &doc, &prefs);
        check_ranges(&result)?;
    }

    #[test]
    fn processing_is_repeatable(
        pages in prop::collection::vec(page(), 1..10),
        size in 1u64..50_000_000,
        prefs in preferences(),
    ) {
        let doc = SignalDocument::new("prop.pdf", size);
        let doc = pages.into_iter().fold(doc, SignalDocument::with_page);
        let first = process(EngineConfig::default(), &doc, &prefs);
        let second = process(EngineConfig::default(), &doc, &prefs);
        prop_assert_eq!(first.analysis, second.analysis);
        prop_assert_eq!(first.settings, second.settings);
        prop_assert_eq!(first.prediction, second.prediction);
        prop_assert_eq!(first.recommendation, second.recommendation);
    }
}
