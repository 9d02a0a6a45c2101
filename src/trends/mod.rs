//! Technology trend, market fit and content popularity analysis.

/// Static job market snapshot
pub mod market;
/// Trend report assembly and Markdown
pub mod report;

pub use market::{Level, MarketData, MarketDataProvider, StaticMarketData};
pub use report::{generate_trend_report, render_trend_markdown, TrendReport, TrendSummary};

use crate::clients::youtube::VideoRecord;
use crate::clients::{CommunityStats, NoCommunityStats};
use crate::repository::{ApplicationType, RepositoryRecord};
use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Technologies whose npm download counts are worth fetching
const NPM_PACKAGES: &[&str] = &["react", "angular", "vue", "express", "next.js", "gatsby"];

/// Job market figures for one technology
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMarket {
    pub job_count: u64,
    pub average_salary: u64,
    pub growth_rate: Option<Level>,
}

/// Weighted score for one technology
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyScore {
    pub technology: String,
    pub overall_score: f64,
    pub job_market_score: f64,
    pub interest_score: f64,
    pub stack_overflow_score: f64,
}

/// The best-ranked technology
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTechnology {
    pub name: String,
    pub overall_score: f64,
    pub job_market: JobMarket,
    pub monetization_potential: Level,
}

/// Trend figures and ranking for a set of technologies
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnologyTrends {
    pub technologies: Vec<String>,
    pub analysis_date: String,
    pub job_market: BTreeMap<String, JobMarket>,
    pub interest_scores: BTreeMap<String, u32>,
    pub stack_overflow: BTreeMap<String, u64>,
    pub npm_downloads: BTreeMap<String, u64>,
    /// Highest score first; equal scores keep input order
    pub ranking: Vec<TechnologyScore>,
    pub top_technology: Option<TopTechnology>,
}

impl TechnologyTrends {
    /// Score entry of `technology`
    pub fn score(&self, technology: &str) -> Option<&TechnologyScore> {
        self.ranking.iter().find(|s| s.technology == technology)
    }
}

/// Stars and forks combined into one popularity rating
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryPopularity {
    pub stars: u64,
    pub forks: u64,
    pub score: f64,
    pub level: Level,
}

/// How crowded the market for this kind of application is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketGap {
    /// Plenty of similar applications
    Saturated,
    /// Demand outstrips good options
    Opportunity,
    /// The whole market is expanding
    Growing,
    /// No signal
    Unknown,
}

impl MarketGap {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketGap::Saturated => "saturated",
            MarketGap::Opportunity => "opportunity",
            MarketGap::Growing => "growing",
            MarketGap::Unknown => "unknown",
        }
    }
}

/// Market fit of one repository
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketFit {
    pub repository: String,
    pub primary_language: String,
    pub application_type: ApplicationType,
    pub popularity: RepositoryPopularity,
    /// Trends for the primary language, when it is known
    pub language_trends: Option<TechnologyTrends>,
    pub monetization_potential: Level,
    pub market_gap: MarketGap,
    pub recommendations: Vec<String>,
}

/// Audience engagement figures of a video
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// Likes plus comments per hundred views, two decimals
    pub engagement_rate: f64,
}

/// How well a video's audience responded
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPopularity {
    pub metrics: EngagementMetrics,
    pub popularity_level: Level,
    pub insights: Vec<String>,
}

/// A technology whose demand is growing
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub technology: String,
    pub opportunity: String,
    pub recommendation: String,
}

/// Growth opportunities across technologies plus the repository's fit
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketOpportunities {
    pub repository_market_fit: Option<MarketFit>,
    pub emerging_opportunities: Vec<Opportunity>,
}

/// Combines static market data with live community signals
pub struct TrendAnalyzer {
    market: Box<dyn MarketDataProvider>,
    stats: Box<dyn CommunityStats>,
}

impl TrendAnalyzer {
    /// Creates an analyzer over the given sources
    pub fn new(market: Box<dyn MarketDataProvider>, stats: Box<dyn CommunityStats>) -> Self {
        Self { market, stats }
    }

    /// Built-in market data and no network access
    pub fn offline() -> Self {
        Self::new(Box::new(StaticMarketData), Box::new(NoCommunityStats))
    }

    /// Job market figures; zero with no growth rating when unknown
    pub fn job_market(&self, technology: &str) -> JobMarket {
        self.market
            .lookup(technology)
            .map(|m| JobMarket {
                job_count: m.job_count,
                average_salary: m.average_salary,
                growth_rate: Some(m.growth()),
            })
            .unwrap_or_default()
    }

    /// Scores and ranks `technologies`
    ///
    /// score = jobs / 10000 * 0.5 + interest / 20 * 0.3 + questions / 1000 * 0.2
    pub async fn analyze_technology_trends(&self, technologies: &[String]) -> TechnologyTrends {
        let mut trends = TechnologyTrends {
            technologies: technologies.to_vec(),
            analysis_date: Local::now().to_rfc3339(),
            ..TechnologyTrends::default()
        };

        for tech in technologies {
            let market = self.market.lookup(tech);
            let job_market = self.job_market(tech);
            let interest = market.map_or(0, |m| m.interest_score);
            let questions = self.stats.stack_overflow_questions(&stack_overflow_tag(tech)).await;

            let lowered = tech.to_lowercase();
            if NPM_PACKAGES.contains(&lowered.as_str()) {
                let package = if lowered == "next.js" { "next" } else { lowered.as_str() };
                let downloads = self.stats.npm_downloads(package).await;
                trends.npm_downloads.insert(tech.clone(), downloads);
            }

            let job_market_score = job_market.job_count as f64 / 10_000.0;
            let interest_score = f64::from(interest) / 20.0;
            let stack_overflow_score = questions as f64 / 1_000.0;

            trends.ranking.push(TechnologyScore {
                technology: tech.clone(),
                overall_score: job_market_score * 0.5 + interest_score * 0.3 + stack_overflow_score * 0.2,
                job_market_score,
                interest_score,
                stack_overflow_score,
            });
            trends.job_market.insert(tech.clone(), job_market);
            trends.interest_scores.insert(tech.clone(), interest);
            trends.stack_overflow.insert(tech.clone(), questions);
        }

        trends
            .ranking
            .sort_by(|a, b| b.overall_score.partial_cmp(&a.overall_score).unwrap_or(Ordering::Equal));

        trends.top_technology = trends.ranking.first().map(|top| TopTechnology {
            name: top.technology.clone(),
            overall_score: top.overall_score,
            job_market: trends.job_market.get(&top.technology).copied().unwrap_or_default(),
            monetization_potential: Level::from_thresholds(top.overall_score, 7.0, 4.0),
        });

        info!(
            "Ranked {} technologies, top: {}",
            trends.ranking.len(),
            trends.top_technology.as_ref().map_or("none", |t| t.name.as_str())
        );
        trends
    }

    /// Popularity, potential and market gap of a repository
    pub async fn analyze_repository_market_fit(&self, repo: &RepositoryRecord) -> MarketFit {
        let stars = repo.stars();
        let forks = repo.forks();
        let score = stars as f64 * 0.7 + forks as f64 * 0.3;
        let app = repo.application_type();

        let primary_language = repo.primary_language().unwrap_or("Unknown").to_string();
        let language_trends = if primary_language == "Unknown" {
            None
        } else {
            Some(self.analyze_technology_trends(std::slice::from_ref(&primary_language)).await)
        };

        let monetization_potential = match app {
            ApplicationType::SpringBoot | ApplicationType::Unknown => Level::Low,
            _ => Level::High,
        };

        let market_gap = match app {
            _ if app.is_frontend() && stars < 100 => MarketGap::Saturated,
            ApplicationType::Django | ApplicationType::Flask | ApplicationType::FastApi | ApplicationType::Express
                if stars > 100 =>
            {
                MarketGap::Opportunity
            }
            _ if app.is_machine_learning() => MarketGap::Growing,
            _ => MarketGap::Unknown,
        };

        let mut recommendations = Vec::new();
        if monetization_potential == Level::High {
            recommendations.push("Consider developing a SaaS product with a freemium model".to_string());
            recommendations.push("Create a hosted version with additional features".to_string());
        }
        if app.is_machine_learning() {
            recommendations.push("Develop an API service for the ML models".to_string());
            recommendations.push("Create training materials and workshops".to_string());
        }

        MarketFit {
            repository: repo.full_name(),
            primary_language,
            application_type: app,
            popularity: RepositoryPopularity {
                stars,
                forks,
                score,
                level: Level::from_thresholds(score, 1000.0, 100.0),
            },
            language_trends,
            monetization_potential,
            market_gap,
            recommendations,
        }
    }

    /// Engagement rate and what it suggests
    pub fn analyze_content_popularity(&self, video: &VideoRecord) -> ContentPopularity {
        let engagement_rate = if video.view_count > 0 {
            let rate = (video.like_count + video.comment_count) as f64 / video.view_count as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };
        let popularity_level = Level::from_thresholds(engagement_rate, 5.0, 2.0);

        let insights = match popularity_level {
            Level::High => [
                "High engagement indicates strong audience interest in this content.",
                "Consider creating more content on this topic or related technologies.",
            ],
            Level::Medium => [
                "Moderate engagement suggests potential interest in this content.",
                "Consider optimizing content to increase engagement.",
            ],
            Level::Low => [
                "Low engagement may indicate limited audience interest in this content.",
                "Consider focusing on more popular topics or improving content quality.",
            ],
        };

        ContentPopularity {
            metrics: EngagementMetrics {
                view_count: video.view_count,
                like_count: video.like_count,
                comment_count: video.comment_count,
                engagement_rate,
            },
            popularity_level,
            insights: insights.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Growth opportunities for each technology, plus the repository's market fit
    pub async fn analyze_market_opportunities(
        &self,
        technologies: &[String],
        repo: Option<&RepositoryRecord>,
    ) -> MarketOpportunities {
        let repository_market_fit = match repo {
            Some(repo) => Some(self.analyze_repository_market_fit(repo).await),
            None => None,
        };

        let emerging_opportunities = technologies
            .iter()
            .filter_map(|tech| match self.job_market(tech).growth_rate? {
                Level::High => Some(Opportunity {
                    technology: tech.clone(),
                    opportunity: format!("Rapidly growing demand for {} solutions", tech),
                    recommendation: format!("Prioritize {} features in monetization strategy", tech),
                }),
                Level::Medium => Some(Opportunity {
                    technology: tech.clone(),
                    opportunity: format!("Steady growth in {} adoption", tech),
                    recommendation: format!("Include {} as part of broader monetization strategy", tech),
                }),
                Level::Low => None,
            })
            .collect();

        MarketOpportunities {
            repository_market_fit,
            emerging_opportunities,
        }
    }
}

/// Stack Overflow tag for a technology name
fn stack_overflow_tag(technology: &str) -> String {
    technology.trim().to_lowercase().replace(' ', "-")
}
