// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The six fixed preset templates and their descriptive text.

use kompressor_core::{Aggressiveness, PresetCategory, Priority};

/// Fixed identity and intent of one preset category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetTemplate {
    pub category: PresetCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    pub aggressiveness: Aggressiveness,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Templates in `PresetCategory::ALL` order.
pub const TEMPLATES: [PresetTemplate; 6] = [
    PresetTemplate {
        category: PresetCategory::Web,
        name: "Web Optimized",
        description: "Tuned for on-screen viewing and fast loading",
        priority: Priority::Balanced,
        aggressiveness: Aggressiveness::Moderate,
        icon: "🌐",
        color: "blue",
    },
    PresetTemplate {
        category: PresetCategory::Print,
        name: "Print Quality",
        description: "Keeps print resolution and fine detail",
        priority: Priority::Quality,
        aggressiveness: Aggressiveness::Conservative,
        icon: "🖨️",
        color: "green",
    },
    PresetTemplate {
        category: PresetCategory::Archive,
        name: "Archive Compression",
        description: "Maximum compression for long-term storage",
        priority: Priority::Size,
        aggressiveness: Aggressiveness::Aggressive,
        icon: "📦",
        color: "purple",
    },
    PresetTemplate {
        category: PresetCategory::Mobile,
        name: "Mobile Friendly",
        description: "Small files for phones and tablets",
        priority: Priority::Size,
        aggressiveness: Aggressiveness::Moderate,
        icon: "📱",
        color: "orange",
    },
    PresetTemplate {
        category: PresetCategory::Presentation,
        name: "Presentation Mode",
        description: "Visual clarity first, for slides and screen sharing",
        priority: Priority::Quality,
        aggressiveness: Aggressiveness::Conservative,
        icon: "📊",
        color: "red",
    },
    PresetTemplate {
        category: PresetCategory::Document,
        name: "Document Standard",
        description: "Balanced settings for everyday documents",
        priority: Priority::Balanced,
        aggressiveness: Aggressiveness::Moderate,
        icon: "📄",
        color: "gray",
    },
];

pub fn template(category: PresetCategory) -> &'static PresetTemplate {
    &TEMPLATES[category.index()]
}

pub fn target_use_case(category: PresetCategory) -> &'static str {
    match category {
        PresetCategory::Web => "Fast viewing on websites",
        PresetCategory::Print => "High-quality printing",
        PresetCategory::Archive => "Long-term archiving",
        PresetCategory::Mobile => "Viewing on mobile devices",
        PresetCategory::Presentation => "Presentations and screen sharing",
        PresetCategory::Document => "General document use",
    }
}

pub fn recommended_for(category: PresetCategory) -> &'static [&'static str] {
    match category {
        PresetCategory::Web => &["Website uploads", "Email attachments", "Online sharing"],
        PresetCategory::Print => &["Printing", "High resolution required", "Detail matters"],
        PresetCategory::Archive => &["Long-term storage", "Backups", "Saving disk space"],
        PresetCategory::Mobile => &["Mobile viewing", "Limited bandwidth", "Quick access"],
        PresetCategory::Presentation => &["Screen presentations", "Projectors", "Video calls"],
        PresetCategory::Document => &["Everyday use", "Office documents", "Standard sharing"],
    }
}

pub fn not_recommended_for(category: PresetCategory) -> &'static [&'static str] {
    match category {
        PresetCategory::Web => &["High-quality printing", "Detailed graphics work"],
        PresetCategory::Print => &["Fast web loading", "Mobile viewing"],
        PresetCategory::Archive => &["Frequently opened files", "Quality-critical work"],
        PresetCategory::Mobile => &["Printing", "High resolution required"],
        PresetCategory::Presentation => &["Printing", "Close inspection"],
        PresetCategory::Document => &["Special requirements", "Extreme optimisation"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_follow_category_order() {
        for (template, category) in TEMPLATES.iter().zip(PresetCategory::ALL) {
            assert_eq!(template.category, category);
            assert!(!recommended_for(category).is_empty());
        }
    }

    #[test]
    fn archive_is_the_only_aggressive_template() {
        let aggressive: Vec<_> = TEMPLATES
            .iter()
            .filter(|t| t.aggressiveness == Aggressiveness::Aggressive)
            .map(|t| t.category)
            .collect();
        assert_eq!(aggressive, vec![PresetCategory::Archive]);
    }
}
