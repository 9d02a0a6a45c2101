use super::{StrategyCategory, StrategySet};
use crate::repository::{Inspection, LicenseKind};
use serde::{Deserialize, Serialize};

/// Considerations and recommendations attached to a strategy set
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether a license was found in the repository
    pub has_license: bool,
    /// License files found in the repository
    pub license_files: Vec<String>,
    /// License family, only set by the legal evaluation of a repository
    pub license_type: Option<LicenseKind>,
    pub considerations: Vec<String>,
    pub recommendations: Vec<String>,
}

const ETHICAL_BASELINE: &[&str] = &[
    "Respect the original creator's intellectual property rights",
    "Give proper attribution to the original creators",
    "Ensure that monetization strategies do not mislead users about the relationship with the original project",
    "Be transparent about any modifications made to the original code",
    "Consider the impact of monetization on the open-source community",
];

const LEGAL_BASELINE: &[&str] = &[
    "Comply with the terms of the repository's license",
    "Ensure that monetization strategies do not infringe on trademarks or patents",
    "Adhere to relevant data protection and privacy laws",
    "Comply with platform-specific terms of service for content distribution",
    "Consider tax implications of monetization strategies",
];

const NO_LICENSE: &str = "The repository does not have a clear license, which may limit monetization options";
const CLARIFY_LICENSE: &str = "Contact the repository owner to clarify licensing terms before monetization";
const KEEP_NOTICE: &str = "Include the original license and copyright notice in any distribution";

fn ethical_category_notes(category: StrategyCategory) -> &'static [&'static str] {
    match category {
        StrategyCategory::ContentRepurposing => &["Ensure that content repurposing does not misrepresent the original content"],
        StrategyCategory::CourseCreation => &["Clearly distinguish between original content and added educational material"],
        StrategyCategory::ApplicationDevelopment => &["Respect the terms of the license for derivative works"],
        StrategyCategory::Consulting => &["Be transparent about the relationship with the original project"],
        StrategyCategory::AffiliateMarketing => &["Disclose affiliate relationships to users"],
    }
}

fn legal_category_notes(category: StrategyCategory) -> &'static [&'static str] {
    match category {
        StrategyCategory::ContentRepurposing => &[
            "Ensure that content repurposing complies with copyright law",
            "Consider fair use/fair dealing provisions for educational content",
        ],
        StrategyCategory::CourseCreation => &[
            "Comply with educational licensing requirements",
            "Consider trademark issues when referencing technologies",
        ],
        StrategyCategory::ApplicationDevelopment => &[
            "Ensure that derivative applications comply with the original license",
            "Consider patent implications for commercial applications",
        ],
        StrategyCategory::Consulting => &[
            "Clearly define the scope of consulting services in contracts",
            "Consider non-disclosure agreements for client projects",
        ],
        StrategyCategory::AffiliateMarketing => &[
            "Comply with disclosure requirements for affiliate marketing",
            "Adhere to platform-specific affiliate marketing policies",
        ],
    }
}

/// `(considerations, recommendations)` for a license family
fn license_terms(kind: LicenseKind) -> (&'static [&'static str], &'static [&'static str]) {
    match kind {
        LicenseKind::Mit => (&["MIT License allows commercial use with attribution"], &[KEEP_NOTICE]),
        LicenseKind::Apache => (
            &[
                "Apache License allows commercial use with attribution",
                "Must include a copy of the license in any distribution",
                "Must state changes made to the original code",
            ],
            &[],
        ),
        LicenseKind::Gpl => (
            &[
                "GPL requires derivative works to be distributed under the same license",
                "Source code of derivative works must be made available",
            ],
            &["Consider consulting with a legal expert before monetizing GPL-licensed code"],
        ),
        LicenseKind::Bsd => (&["BSD License allows commercial use with attribution"], &[KEEP_NOTICE]),
        LicenseKind::Mozilla => (
            &[
                "Mozilla Public License requires modifications to be released under the same license",
                "Can combine with proprietary code under certain conditions",
            ],
            &[],
        ),
        LicenseKind::Unknown => (
            &["The repository has a license, but the type could not be determined"],
            &["Review the license carefully or consult with a legal expert before monetization"],
        ),
        LicenseKind::None => (&[NO_LICENSE], &[CLARIFY_LICENSE]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Categories that produced at least one strategy
fn used_categories(strategies: &StrategySet) -> impl Iterator<Item = StrategyCategory> + '_ {
    strategies
        .categories
        .iter()
        .filter(|c| !c.strategies.is_empty())
        .map(|c| c.category)
}

fn base_evaluation(inspection: Option<&Inspection>, baseline: &[&str]) -> Evaluation {
    Evaluation {
        has_license: inspection.map_or(false, |i| i.license.is_present()),
        license_files: inspection.map(|i| i.key_files.license.clone()).unwrap_or_default(),
        considerations: strings(baseline),
        ..Evaluation::default()
    }
}

/// Ethical considerations for the strategies
///
/// Repository license notes are only added when a repository was inspected.
pub fn evaluate_ethics(strategies: &StrategySet, inspection: Option<&Inspection>) -> Evaluation {
    let mut evaluation = base_evaluation(inspection, ETHICAL_BASELINE);

    if inspection.is_some() {
        if evaluation.has_license {
            evaluation
                .considerations
                .push("Adhere to the specific terms of the repository's license".to_string());
        } else {
            evaluation.considerations.push(NO_LICENSE.to_string());
            evaluation.recommendations.push(CLARIFY_LICENSE.to_string());
        }
    }

    for category in used_categories(strategies) {
        evaluation.considerations.extend(strings(ethical_category_notes(category)));
    }
    evaluation
}

/// Legal considerations for the strategies, including the repository license
pub fn evaluate_legal(strategies: &StrategySet, inspection: Option<&Inspection>) -> Evaluation {
    let mut evaluation = base_evaluation(inspection, LEGAL_BASELINE);

    if let Some(inspection) = inspection {
        let (considerations, recommendations) = license_terms(inspection.license);
        evaluation.license_type = Some(inspection.license);
        evaluation.considerations.extend(strings(considerations));
        evaluation.recommendations.extend(strings(recommendations));
    }

    for category in used_categories(strategies) {
        evaluation.considerations.extend(strings(legal_category_notes(category)));
    }
    evaluation
}
