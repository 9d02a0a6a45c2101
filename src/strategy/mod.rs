//! Monetization strategies generated from a video's analysis and its repositories.

/// Ethical and legal evaluation
pub mod evaluation;
/// Monetization plan assembly
pub mod plan;
/// Strategy templates per category
pub mod templates;

use crate::clients::youtube::VideoRecord;
use crate::repository::{ApplicationType, Inspection, RepositoryRecord};
use crate::transcript::TranscriptAnalysis;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use evaluation::{evaluate_ethics, evaluate_legal, Evaluation};
pub use plan::{create_monetization_plan, revenue_rank, MonetizationPlan};

/// One templated monetization suggestion
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub title: String,
    pub description: String,
    /// Key of the category that produced it, e.g. `course_creation`
    pub category: String,
    pub platforms: Vec<String>,
    /// Free text such as `Medium to High`
    pub revenue_estimate: String,
    pub time_investment: String,
    pub steps: Vec<String>,
}

/// The five families of strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    /// Turning the material into other content formats
    ContentRepurposing,
    /// Courses, starter kits and workshops
    CourseCreation,
    /// Products built on a repository
    ApplicationDevelopment,
    /// Selling expertise
    Consulting,
    /// Promoting related tools and services
    AffiliateMarketing,
}

impl StrategyCategory {
    /// Every category in report order
    pub const ALL: [StrategyCategory; 5] = [
        StrategyCategory::ContentRepurposing,
        StrategyCategory::CourseCreation,
        StrategyCategory::ApplicationDevelopment,
        StrategyCategory::Consulting,
        StrategyCategory::AffiliateMarketing,
    ];

    /// Stable key used in JSON output and in `StrategyRecord::category`
    pub fn key(&self) -> &'static str {
        match self {
            Self::ContentRepurposing => "content_repurposing",
            Self::CourseCreation => "course_creation",
            Self::ApplicationDevelopment => "application_development",
            Self::Consulting => "consulting",
            Self::AffiliateMarketing => "affiliate_marketing",
        }
    }

    /// Heading shown in reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContentRepurposing => "Content Repurposing",
            Self::CourseCreation => "Educational Products",
            Self::ApplicationDevelopment => "Application Development",
            Self::Consulting => "Technical Consulting",
            Self::AffiliateMarketing => "Affiliate Marketing",
        }
    }

    /// One-line summary of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::ContentRepurposing => "Transform extracted knowledge into different content formats.",
            Self::CourseCreation => "Create educational content based on technical knowledge.",
            Self::ApplicationDevelopment => "Build and monetize applications based on repositories.",
            Self::Consulting => "Offer expertise based on knowledge of specific technologies.",
            Self::AffiliateMarketing => "Promote related products or services with affiliate programs.",
        }
    }

    /// Category for a `StrategyRecord::category` key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for StrategyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A repository as the strategy templates see it
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRepository {
    /// Repository name without the owner
    pub name: String,
    pub application_type: ApplicationType,
}

/// Inputs the templates interpolate
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyContext {
    pub video_id: String,
    pub video_title: String,
    pub technologies: Vec<String>,
    pub keywords: Vec<String>,
    pub repositories: Vec<StrategyRepository>,
}

impl StrategyContext {
    /// Context for a processed video and the repositories it links to
    pub fn from_video(video: &VideoRecord, analysis: &TranscriptAnalysis, repositories: &[RepositoryRecord]) -> Self {
        Self {
            video_id: video.video_id.clone(),
            video_title: video.title.clone(),
            technologies: analysis.technologies.clone(),
            keywords: analysis.keywords.clone(),
            repositories: repositories.iter().map(StrategyRepository::from).collect(),
        }
    }

    /// Context for a repository analysed on its own
    ///
    /// Technologies are the primary language followed by the detected frameworks.
    pub fn from_repository(record: &RepositoryRecord) -> Self {
        let mut technologies: Vec<String> = record.primary_language().map(str::to_string).into_iter().collect();
        for framework in &record.frameworks {
            if !technologies.iter().any(|t| t.eq_ignore_ascii_case(framework)) {
                technologies.push(framework.clone());
            }
        }

        Self {
            video_title: record.full_name(),
            technologies,
            repositories: vec![StrategyRepository::from(record)],
            ..Self::default()
        }
    }
}

impl From<&RepositoryRecord> for StrategyRepository {
    fn from(record: &RepositoryRecord) -> Self {
        Self {
            name: record.repo.clone(),
            application_type: record.application_type(),
        }
    }
}

/// The strategies of one category
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStrategies {
    pub category: StrategyCategory,
    pub name: String,
    pub description: String,
    pub strategies: Vec<StrategyRecord>,
}

/// The strategy suggested first
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedStrategy {
    pub category: StrategyCategory,
    pub strategy: StrategyRecord,
}

/// Output of [`generate_strategies`]
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySet {
    pub video_id: String,
    pub video_title: String,
    /// One entry per category, in [`StrategyCategory::ALL`] order
    pub categories: Vec<CategoryStrategies>,
    pub recommended_strategy: Option<RecommendedStrategy>,
}

impl StrategySet {
    /// Strategies of one category, empty if it produced none
    pub fn strategies(&self, category: StrategyCategory) -> &[StrategyRecord] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(&[], |c| c.strategies.as_slice())
    }

    /// Every strategy in category order
    pub fn all(&self) -> impl Iterator<Item = &StrategyRecord> {
        self.categories.iter().flat_map(|c| c.strategies.iter())
    }

    /// Total number of strategies
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.strategies.len()).sum()
    }

    /// Whether no category produced anything
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs every category generator and picks a recommendation
///
/// Application development is recommended when the context has
/// repositories, course creation otherwise.
pub fn generate_strategies(context: &StrategyContext) -> StrategySet {
    let categories: Vec<CategoryStrategies> = StrategyCategory::ALL
        .into_iter()
        .map(|category| CategoryStrategies {
            category,
            name: category.name().to_string(),
            description: category.description().to_string(),
            strategies: templates::generate(category, context),
        })
        .collect();

    let first = |category: StrategyCategory| {
        categories
            .iter()
            .find(|c| c.category == category)
            .and_then(|c| c.strategies.first())
            .map(|strategy| RecommendedStrategy { category, strategy: strategy.clone() })
    };

    let recommended_strategy = if context.repositories.is_empty() {
        None
    } else {
        first(StrategyCategory::ApplicationDevelopment)
    }
    .or_else(|| first(StrategyCategory::CourseCreation))
    .or_else(|| first(StrategyCategory::ContentRepurposing));

    log::info!(
        "Generated {} monetization strategies for '{}'",
        categories.iter().map(|c| c.strategies.len()).sum::<usize>(),
        context.video_title
    );

    StrategySet {
        video_id: context.video_id.clone(),
        video_title: context.video_title.clone(),
        categories,
        recommended_strategy,
    }
}

/// Everything written to `monetization_strategies.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetizationStrategies {
    pub strategy_set: StrategySet,
    pub ethical_evaluation: Evaluation,
    pub legal_evaluation: Evaluation,
    pub monetization_plan: MonetizationPlan,
}

/// Strategies, both evaluations and the plan in one step
///
/// `inspection` is the inspection of the first repository, if any.
pub fn build_monetization(context: &StrategyContext, inspection: Option<&Inspection>) -> MonetizationStrategies {
    let strategy_set = generate_strategies(context);
    let ethical_evaluation = evaluate_ethics(&strategy_set, inspection);
    let legal_evaluation = evaluate_legal(&strategy_set, inspection);
    let monetization_plan = create_monetization_plan(&strategy_set, &ethical_evaluation, &legal_evaluation);

    MonetizationStrategies {
        strategy_set,
        ethical_evaluation,
        legal_evaluation,
        monetization_plan,
    }
}
